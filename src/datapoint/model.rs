//! # Datapoint Model
//!
//! Record shape, schema defaults, and the public projection.
//!
//! Every numeric reading defaults to 0 and both enums default to `Error`.
//! Timestamps are kept at millisecond precision so that a `createdAt`
//! value echoed back by a client compares equal to the stored one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::id::DatapointId;

/// Compass direction of the wind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    South,
    East,
    West,
    #[default]
    Error,
}

impl WindDirection {
    pub const ALL: [WindDirection; 5] = [
        WindDirection::North,
        WindDirection::South,
        WindDirection::East,
        WindDirection::West,
        WindDirection::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::South => "South",
            WindDirection::East => "East",
            WindDirection::West => "West",
            WindDirection::Error => "Error",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Light condition at the time of the reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayNight {
    Day,
    Night,
    #[default]
    Error,
}

impl DayNight {
    pub const ALL: [DayNight; 3] = [DayNight::Day, DayNight::Night, DayNight::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayNight::Day => "Day",
            DayNight::Night => "Night",
            DayNight::Error => "Error",
        }
    }
}

impl fmt::Display for DayNight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayNight {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// A string that names no variant of the target enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant {0:?}")]
pub struct UnknownVariant(pub String);

/// Current time, truncated to storage precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Validated, caller-supplied data fields.
///
/// `None` means the caller did not send the field. Only these seven
/// fields can ever be written by a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatapointFields {
    pub windspeed: Option<f64>,
    pub winddirection: Option<WindDirection>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub barpressure: Option<f64>,
    pub altitude: Option<f64>,
    pub daynight: Option<DayNight>,
}

/// One persisted sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datapoint {
    pub id: DatapointId,
    pub windspeed: f64,
    pub winddirection: WindDirection,
    pub temperature: f64,
    pub humidity: f64,
    pub barpressure: f64,
    pub altitude: f64,
    pub daynight: DayNight,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Datapoint {
    /// Build a record from schema defaults overlaid with `fields`
    pub fn new(id: DatapointId, fields: &DatapointFields, at: DateTime<Utc>) -> Self {
        let mut datapoint = Self {
            id,
            windspeed: 0.0,
            winddirection: WindDirection::default(),
            temperature: 0.0,
            humidity: 0.0,
            barpressure: 0.0,
            altitude: 0.0,
            daynight: DayNight::default(),
            created_at: at,
            updated_at: at,
        };
        datapoint.apply(fields);
        datapoint
    }

    /// Overwrite the fields present in `fields`, leaving the rest untouched
    pub fn apply(&mut self, fields: &DatapointFields) {
        if let Some(v) = fields.windspeed {
            self.windspeed = v;
        }
        if let Some(v) = fields.winddirection {
            self.winddirection = v;
        }
        if let Some(v) = fields.temperature {
            self.temperature = v;
        }
        if let Some(v) = fields.humidity {
            self.humidity = v;
        }
        if let Some(v) = fields.barpressure {
            self.barpressure = v;
        }
        if let Some(v) = fields.altitude {
            self.altitude = v;
        }
        if let Some(v) = fields.daynight {
            self.daynight = v;
        }
    }

    /// Public view of this record
    pub fn transform(&self) -> DatapointView {
        DatapointView {
            id: self.id,
            windspeed: self.windspeed,
            winddirection: self.winddirection,
            temperature: self.temperature,
            humidity: self.humidity,
            barpressure: self.barpressure,
            altitude: self.altitude,
            daynight: self.daynight,
            created_at: self.created_at,
        }
    }
}

/// Public API representation of a datapoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatapointView {
    pub id: DatapointId,
    pub windspeed: f64,
    pub winddirection: WindDirection,
    pub temperature: f64,
    pub humidity: f64,
    pub barpressure: f64,
    pub altitude: f64,
    pub daynight: DayNight,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
