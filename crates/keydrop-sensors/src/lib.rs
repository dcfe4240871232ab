#![forbid(unsafe_code)]

//! Keyboard drag sensor, collision detection, and scroll coordination.

pub mod collision;
pub mod coordinates;
pub mod keyboard;
pub mod scroll;

pub use collision::{
    Collision, CollisionArgs, CollisionData, CollisionDetection, DroppableEntry, DroppableId,
    DroppableMap, DroppableRegistry, Fallback, Filtered, Partitioned, closest_center,
    closest_corners, filtered, first_collision, partitioned, pointer_within, rect_intersection,
    sort_collisions_desc, with_fallback,
};
pub use coordinates::{
    ArrowKeyCoordinates, CoordinatesArgs, CoordinatesContext, CoordinatesGetter, Direction,
    DroppableJumpCoordinates,
};
pub use keyboard::{
    CancelReason, DragEvent, DragSession, DraggableId, KeyResponse, KeyboardCodes,
    KeyboardSensor, KeyboardSensorConfig, KeyboardSensorConfigParse, SensorHost,
};
pub use scroll::{
    ScrollAncestorId, ScrollBehavior, ScrollCoordinator, ScrollHost, ScrollMetrics, ScrollRequest,
};
