//! Travel mode to average speed mapping.
//!
//! The engine's contract with a directions provider is purely
//! "distance, mode -> duration seconds". [`ConstantSpeedModel`] is the
//! built-in stand-in; a production deployment may implement [`SpeedModel`]
//! against a live ETA provider without touching the rest of the pipeline.

use serde::{Deserialize, Serialize};

/// Supported travel modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Bicycling,
    Transit,
    #[default]
    Driving,
}

impl TransportMode {
    /// Parse a mode string, defaulting to driving for unrecognized input.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "walking" => Self::Walking,
            "bicycling" => Self::Bicycling,
            "transit" => Self::Transit,
            _ => Self::Driving,
        }
    }
}

/// Maps a travel mode to an average speed in meters per second.
pub trait SpeedModel {
    /// Average speed for the mode in m/s.
    fn speed(&self, mode: TransportMode) -> f64;

    /// Travel time in seconds to cover `distance` meters at the mode's speed.
    fn duration(&self, distance: f64, mode: TransportMode) -> f64 {
        distance / self.speed(mode)
    }
}

/// Fixed-table speed model.
///
/// walking 1.4, bicycling 4.2, transit 8.3, driving 13.9 m/s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSpeedModel;

impl SpeedModel for ConstantSpeedModel {
    fn speed(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walking => 1.4,
            TransportMode::Bicycling => 4.2,
            TransportMode::Transit => 8.3,
            TransportMode::Driving => 13.9,
        }
    }
}
