use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Road categories known to the cost model, named after the OSM `highway` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    Road,
    Unclassified,
    Residential,
    Unsurfaced,
    LivingStreet,
    Service,
}

impl RoadType {
    /// Fastest velocity any road type is driven at, in km/h.
    pub const MAX_VELOCITY: f64 = 100.0;

    // Returns the average road velocity in km/h
    // Matches the speeds the graph builder assigns when computing base costs.
    pub fn velocity(&self) -> f64 {
        match self {
            RoadType::Motorway => 100.0,
            RoadType::Trunk => 100.0,
            RoadType::Primary => 60.0,
            RoadType::Secondary => 50.0,
            RoadType::Tertiary => 40.0,
            RoadType::MotorwayLink => 60.0,
            RoadType::TrunkLink => 50.0,
            RoadType::PrimaryLink => 50.0,
            RoadType::SecondaryLink => 40.0,
            RoadType::Road => 40.0,
            RoadType::Unclassified => 40.0,
            RoadType::Residential => 30.0,
            RoadType::Unsurfaced => 30.0,
            RoadType::LivingStreet => 10.0,
            RoadType::Service => 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoadType::Motorway => "motorway",
            RoadType::Trunk => "trunk",
            RoadType::Primary => "primary",
            RoadType::Secondary => "secondary",
            RoadType::Tertiary => "tertiary",
            RoadType::MotorwayLink => "motorway_link",
            RoadType::TrunkLink => "trunk_link",
            RoadType::PrimaryLink => "primary_link",
            RoadType::SecondaryLink => "secondary_link",
            RoadType::Road => "road",
            RoadType::Unclassified => "unclassified",
            RoadType::Residential => "residential",
            RoadType::Unsurfaced => "unsurfaced",
            RoadType::LivingStreet => "living_street",
            RoadType::Service => "service",
        }
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadType {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "motorway" => Ok(RoadType::Motorway),
            "trunk" => Ok(RoadType::Trunk),
            "primary" => Ok(RoadType::Primary),
            "secondary" => Ok(RoadType::Secondary),
            "tertiary" => Ok(RoadType::Tertiary),
            "motorway_link" => Ok(RoadType::MotorwayLink),
            "trunk_link" => Ok(RoadType::TrunkLink),
            "primary_link" => Ok(RoadType::PrimaryLink),
            "secondary_link" => Ok(RoadType::SecondaryLink),
            "road" => Ok(RoadType::Road),
            "unclassified" => Ok(RoadType::Unclassified),
            "residential" => Ok(RoadType::Residential),
            "unsurfaced" => Ok(RoadType::Unsurfaced),
            "living_street" => Ok(RoadType::LivingStreet),
            "service" => Ok(RoadType::Service),
            _ => Err(RoutingError::InvalidArgument(format!(
                "Failed to parse road type '{}'",
                s
            ))),
        }
    }
}
