#![forbid(unsafe_code)]

//! keydrop public facade crate.
//!
//! Re-exports the geometry, key event, collision, and sensor types under one
//! roof and adds a crate-level error type plus a prelude.
//!
//! ```
//! use keydrop::prelude::*;
//!
//! let sensor = KeyboardSensor::try_from_config(KeyboardSensorConfig::default())
//!     .expect("default config is valid")
//!     .with_collision_detection(with_fallback(rect_intersection, closest_center));
//! assert!(!sensor.is_dragging());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use keydrop_core::config::ConfigError;
pub use keydrop_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use keydrop_core::geometry::{Point, Rect};
#[cfg(feature = "tracing-json")]
pub use keydrop_core::logging::init_json_subscriber;

// --- Sensor re-exports -----------------------------------------------------

pub use keydrop_sensors::collision::{
    Collision, CollisionArgs, CollisionData, CollisionDetection, DroppableEntry, DroppableId,
    DroppableMap, DroppableRegistry, Fallback, Filtered, Partitioned, closest_center,
    closest_corners, filtered, first_collision, partitioned, pointer_within, rect_intersection,
    sort_collisions_desc, with_fallback,
};
pub use keydrop_sensors::coordinates::{
    ArrowKeyCoordinates, CoordinatesArgs, CoordinatesContext, CoordinatesGetter, Direction,
    DroppableJumpCoordinates,
};
pub use keydrop_sensors::keyboard::{
    CancelReason, DragEvent, DragSession, DraggableId, KeyResponse, KeyboardCodes,
    KeyboardSensor, KeyboardSensorConfig, KeyboardSensorConfigParse, SensorHost,
};
pub use keydrop_sensors::scroll::{
    ScrollAncestorId, ScrollBehavior, ScrollCoordinator, ScrollHost, ScrollMetrics, ScrollRequest,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for keydrop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Sensor configuration was rejected; every violation is listed.
    Config(Vec<ConfigError>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(errors) => {
                write!(f, "invalid keyboard sensor config")?;
                for (i, err) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{err}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(vec![err])
    }
}

/// Standard result type for keydrop APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a sensor from environment variables, failing on any diagnostic.
///
/// Unlike [`KeyboardSensorConfig::from_env`], malformed values are reported
/// instead of silently replaced by defaults.
pub fn sensor_from_env() -> Result<KeyboardSensor> {
    let parsed = KeyboardSensorConfig::from_env_with_diagnostics();
    if !parsed.errors.is_empty() {
        return Err(Error::Config(parsed.errors));
    }
    Ok(KeyboardSensor::try_from_config(parsed.config)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Collision, CollisionDetection, DragEvent, DraggableId, DroppableId, DroppableMap,
        DroppableRegistry, Error, Event, KeyCode, KeyEvent, KeyboardSensor,
        KeyboardSensorConfig, Point, Rect, Result, ScrollAncestorId, ScrollBehavior, ScrollHost,
        ScrollMetrics, SensorHost, closest_center, closest_corners, pointer_within,
        rect_intersection, with_fallback,
    };

    pub use crate::{core, sensors};
}

pub use keydrop_core as core;
pub use keydrop_sensors as sensors;
