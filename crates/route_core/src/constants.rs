/// Edge weight type. Costs are travel times in minutes.
pub type Weight = f64;

/// Mean earth radius in kilometers used by the great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Two costs closer than this are considered equal when comparing strategies.
pub const COST_EPSILON: Weight = 1e-6;
