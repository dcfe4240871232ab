#![forbid(unsafe_code)]

//! Keyboard sensor: drives a drag lifecycle from discrete key presses.
//!
//! # State machine
//!
//! ```text
//!            start key on a registered activator
//!   Idle ───────────────────────────────────────────▶ Dragging
//!    ▲                                                  │  │
//!    │        end key ─▶ DragEnd                        │  │ movement key
//!    └──────── cancel key / resize / focus loss ◀───────┘  └─▶ DragMove (stays Dragging)
//!                        ─▶ DragCancel
//! ```
//!
//! # Invariants
//!
//! 1. At most one [`DragSession`] exists per sensor; it is created on start
//!    and dropped on end or cancel.
//! 2. Each drag emits exactly one `Start`, zero or more `Move`, and exactly
//!    one `End` or `Cancel`.
//! 3. A start key while dragging never nests a second drag.
//! 4. End keys take precedence over cancel keys, which take precedence over
//!    start keys and movement.
//! 5. Key releases are ignored; presses and auto-repeats are processed in
//!    delivery order.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Start on unregistered node | origin has no activator rect | Key ignored, stays Idle |
//! | Getter returns `None` or non-finite point | unhandled key | Key ignored, no move |
//! | Droppable unmeasurable | registry returns `None` | Excluded from collisions |
//! | Window resized / focus lost | host layout invalidated | `DragCancel` emitted |

use std::env;
use std::fmt;

use keydrop_core::config::{ConfigError, parse_positive_f64};
use keydrop_core::event::{Event, KeyCode, KeyEvent};
use keydrop_core::geometry::{Point, Rect};

use crate::collision::{
    Collision, CollisionArgs, CollisionDetection, DroppableEntry, DroppableRegistry,
    first_collision, rect_intersection,
};
use crate::coordinates::{
    ArrowKeyCoordinates, CoordinatesArgs, CoordinatesContext, CoordinatesGetter, DEFAULT_STEP,
};
use crate::scroll::{
    ScrollAncestorId, ScrollBehavior, ScrollCoordinator, ScrollHost, ScrollRequest,
};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque identifier of a draggable item (and its activator node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraggableId(pub u64);

impl From<u64> for DraggableId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const ENV_START_KEYS: &str = "KEYDROP_START_KEYS";
pub const ENV_CANCEL_KEYS: &str = "KEYDROP_CANCEL_KEYS";
pub const ENV_END_KEYS: &str = "KEYDROP_END_KEYS";
pub const ENV_SCROLL_BEHAVIOR: &str = "KEYDROP_SCROLL_BEHAVIOR";
pub const ENV_STEP: &str = "KEYDROP_STEP";

/// Which keys start, cancel, and end a drag.
///
/// Movement keys are not listed here; they belong to the coordinates getter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardCodes {
    pub start: Vec<KeyCode>,
    pub cancel: Vec<KeyCode>,
    pub end: Vec<KeyCode>,
}

impl Default for KeyboardCodes {
    fn default() -> Self {
        Self {
            start: vec![KeyCode::SPACE, KeyCode::Enter],
            cancel: vec![KeyCode::Escape],
            end: vec![KeyCode::SPACE, KeyCode::Enter],
        }
    }
}

impl KeyboardCodes {
    #[must_use]
    pub fn is_start(&self, code: KeyCode) -> bool {
        self.start.contains(&code)
    }

    #[must_use]
    pub fn is_cancel(&self, code: KeyCode) -> bool {
        self.cancel.contains(&code)
    }

    #[must_use]
    pub fn is_end(&self, code: KeyCode) -> bool {
        self.end.contains(&code)
    }
}

/// Keyboard sensor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardSensorConfig {
    pub keyboard_codes: KeyboardCodes,
    pub scroll_behavior: ScrollBehavior,
    /// Step used by the default arrow-key coordinates getter.
    pub step: f64,
}

impl Default for KeyboardSensorConfig {
    fn default() -> Self {
        Self {
            keyboard_codes: KeyboardCodes::default(),
            scroll_behavior: ScrollBehavior::Smooth,
            step: DEFAULT_STEP,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct KeyboardSensorConfigParse {
    pub config: KeyboardSensorConfig,
    pub errors: Vec<ConfigError>,
}

impl KeyboardSensorConfig {
    /// Parse config from environment variables, keeping defaults for
    /// anything missing or malformed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> KeyboardSensorConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        let codes = &self.keyboard_codes;
        validate_non_empty("keyboard_codes.start", &codes.start, &mut errors);
        validate_non_empty("keyboard_codes.cancel", &codes.cancel, &mut errors);
        validate_non_empty("keyboard_codes.end", &codes.end, &mut errors);
        let shared: Vec<KeyCode> = codes
            .cancel
            .iter()
            .copied()
            .filter(|code| codes.end.contains(code))
            .collect();
        if !shared.is_empty() {
            errors.push(ConfigError::new(
                "keyboard_codes.cancel",
                join_key_names(&shared),
                "cancel keys must not also end the drag",
            ));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            errors.push(ConfigError::new(
                "step",
                self.step.to_string(),
                "must be a finite number > 0",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_non_empty(field: &'static str, codes: &[KeyCode], errors: &mut Vec<ConfigError>) {
    if codes.is_empty() {
        errors.push(ConfigError::new(field, "", "must list at least one key"));
    }
}

fn join_key_names(codes: &[KeyCode]) -> String {
    codes
        .iter()
        .map(KeyCode::name)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_key_list(value: &str) -> Option<Vec<KeyCode>> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(KeyCode::parse)
        .collect()
}

fn from_env_with<F>(mut get: F) -> KeyboardSensorConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = KeyboardSensorConfig::default();
    let mut errors = Vec::new();

    for (key, field) in [
        (ENV_START_KEYS, "keyboard_codes.start"),
        (ENV_CANCEL_KEYS, "keyboard_codes.cancel"),
        (ENV_END_KEYS, "keyboard_codes.end"),
    ] {
        let Some(value) = get(key) else {
            continue;
        };
        match parse_key_list(&value) {
            Some(codes) => {
                let slot = match key {
                    ENV_START_KEYS => &mut config.keyboard_codes.start,
                    ENV_CANCEL_KEYS => &mut config.keyboard_codes.cancel,
                    _ => &mut config.keyboard_codes.end,
                };
                *slot = codes;
            }
            None => errors.push(ConfigError::new(
                field,
                value,
                "expected comma-separated key names (Space,Enter,Escape,ArrowUp,...)",
            )),
        }
    }

    if let Some(value) = get(ENV_SCROLL_BEHAVIOR) {
        match ScrollBehavior::parse(&value) {
            Some(parsed) => config.scroll_behavior = parsed,
            None => errors.push(ConfigError::new(
                "scroll_behavior",
                value,
                "expected smooth|auto",
            )),
        }
    }

    if let Some(value) = get(ENV_STEP) {
        match parse_positive_f64(&value) {
            Some(parsed) => config.step = parsed,
            None => errors.push(ConfigError::new(
                "step",
                value,
                "expected positive number",
            )),
        }
    }

    if let Err(mut violations) = config.validate() {
        errors.append(&mut violations);
    }

    KeyboardSensorConfigParse { config, errors }
}

// ---------------------------------------------------------------------------
// Host contract
// ---------------------------------------------------------------------------

/// Everything the sensor needs from its surroundings.
pub trait SensorHost: ScrollHost {
    /// Rectangle of a registered draggable activator, `None` if `draggable`
    /// is not one (or cannot be measured).
    fn activator_rect(&self, draggable: DraggableId) -> Option<Rect>;

    /// The live droppable registry.
    fn droppables(&self) -> &dyn DroppableRegistry;

    /// Scrollable ancestors of the draggable, nearest first.
    fn scrollable_ancestors(&self, _draggable: DraggableId) -> Vec<ScrollAncestorId> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Session and events
// ---------------------------------------------------------------------------

/// State of an active keyboard drag. Exists only while dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    active: DraggableId,
    initial_rect: Rect,
    current_coordinates: Point,
    scroll_ancestors: Vec<ScrollAncestorId>,
    scroll_behavior: ScrollBehavior,
    collisions: Vec<Collision>,
    last_scroll: Option<ScrollRequest>,
}

impl DragSession {
    #[must_use]
    pub fn active(&self) -> DraggableId {
        self.active
    }

    /// Rectangle snapshot taken when the drag started.
    #[must_use]
    pub fn initial_rect(&self) -> Rect {
        self.initial_rect
    }

    /// Coordinates at activation (top-left of the initial rectangle).
    #[must_use]
    pub fn initial_coordinates(&self) -> Point {
        self.initial_rect.origin()
    }

    #[must_use]
    pub fn current_coordinates(&self) -> Point {
        self.current_coordinates
    }

    /// Active rectangle at the current coordinates.
    #[must_use]
    pub fn active_rect(&self) -> Rect {
        self.initial_rect.at(self.current_coordinates)
    }

    #[must_use]
    pub fn scroll_ancestors(&self) -> &[ScrollAncestorId] {
        &self.scroll_ancestors
    }

    #[must_use]
    pub fn scroll_behavior(&self) -> ScrollBehavior {
        self.scroll_behavior
    }

    /// Collisions at the current coordinates, best first.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Scroll request issued by the most recent move, if it issued one.
    #[must_use]
    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }
}

/// Why a drag was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// A cancel key was pressed.
    Key,
    /// The window was resized.
    Resize,
    /// The window lost focus.
    FocusLost,
    /// [`KeyboardSensor::cancel`] was called.
    Programmatic,
}

impl CancelReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Resize => "resize",
            Self::FocusLost => "focus_lost",
            Self::Programmatic => "programmatic",
        }
    }
}

/// Lifecycle notifications for collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Start {
        active: DraggableId,
        coordinates: Point,
    },
    Move {
        active: DraggableId,
        coordinates: Point,
        collisions: Vec<Collision>,
    },
    Cancel {
        active: DraggableId,
        reason: CancelReason,
    },
    End {
        active: DraggableId,
        coordinates: Point,
        over: Option<Collision>,
    },
}

impl DragEvent {
    #[must_use]
    pub fn active(&self) -> DraggableId {
        match self {
            Self::Start { active, .. }
            | Self::Move { active, .. }
            | Self::Cancel { active, .. }
            | Self::End { active, .. } => *active,
        }
    }
}

/// Outcome of feeding one event to the sensor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyResponse {
    /// The host should suppress the key's default action.
    pub consumed: bool,
    pub event: Option<DragEvent>,
}

impl KeyResponse {
    /// The sensor did nothing with the event.
    #[must_use]
    pub fn ignored() -> Self {
        Self::default()
    }

    fn consumed(event: DragEvent) -> Self {
        Self {
            consumed: true,
            event: Some(event),
        }
    }

    fn passive(event: DragEvent) -> Self {
        Self {
            consumed: false,
            event: Some(event),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyboardSensor
// ---------------------------------------------------------------------------

/// Turns key presses into drag lifecycle events.
pub struct KeyboardSensor {
    config: KeyboardSensorConfig,
    coordinates: Box<dyn CoordinatesGetter>,
    collision_detection: Box<dyn CollisionDetection>,
    scroll: ScrollCoordinator,
    session: Option<DragSession>,
}

impl fmt::Debug for KeyboardSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardSensor")
            .field("config", &self.config)
            .field("scroll", &self.scroll)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for KeyboardSensor {
    fn default() -> Self {
        Self::new(KeyboardSensorConfig::default())
    }
}

impl KeyboardSensor {
    /// Create a sensor with the arrow-key getter and rectangle intersection.
    #[must_use]
    pub fn new(config: KeyboardSensorConfig) -> Self {
        Self {
            coordinates: Box::new(ArrowKeyCoordinates::new(config.step)),
            collision_detection: Box::new(rect_intersection),
            scroll: ScrollCoordinator::new(config.scroll_behavior),
            config,
            session: None,
        }
    }

    /// Create a sensor after validating the config.
    pub fn try_from_config(config: KeyboardSensorConfig) -> Result<Self, Vec<ConfigError>> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replace the coordinates getter.
    #[must_use]
    pub fn with_coordinates_getter(mut self, getter: impl CoordinatesGetter + 'static) -> Self {
        self.coordinates = Box::new(getter);
        self
    }

    /// Replace the collision detection strategy.
    #[must_use]
    pub fn with_collision_detection(
        mut self,
        strategy: impl CollisionDetection + 'static,
    ) -> Self {
        self.collision_detection = Box::new(strategy);
        self
    }

    #[must_use]
    pub fn config(&self) -> &KeyboardSensorConfig {
        &self.config
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use = "use the returned session (if any)"]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Feed any input event.
    ///
    /// Resize and focus loss cancel an active drag; they are never consumed.
    pub fn handle_event<H>(
        &mut self,
        origin: Option<DraggableId>,
        event: &Event,
        host: &mut H,
    ) -> KeyResponse
    where
        H: SensorHost + ?Sized,
    {
        match event {
            Event::Key(key) => self.handle_key(origin, key, host),
            Event::Resize { .. } => self.cancel_with(CancelReason::Resize),
            Event::Focus(false) => self.cancel_with(CancelReason::FocusLost),
            Event::Focus(true) => KeyResponse::ignored(),
        }
    }

    /// Feed a key event. `origin` is the draggable activator the key was
    /// delivered to, if any.
    pub fn handle_key<H>(
        &mut self,
        origin: Option<DraggableId>,
        event: &KeyEvent,
        host: &mut H,
    ) -> KeyResponse
    where
        H: SensorHost + ?Sized,
    {
        if !event.is_key_down() {
            return KeyResponse::ignored();
        }
        if self.session.is_some() {
            self.handle_dragging_key(event, host)
        } else {
            self.handle_idle_key(origin, event, host)
        }
    }

    /// Cancel the active drag, if any.
    pub fn cancel(&mut self) -> Option<DragEvent> {
        self.cancel_with(CancelReason::Programmatic).event
    }

    fn handle_idle_key<H>(
        &mut self,
        origin: Option<DraggableId>,
        event: &KeyEvent,
        host: &mut H,
    ) -> KeyResponse
    where
        H: SensorHost + ?Sized,
    {
        if !self.config.keyboard_codes.is_start(event.code) {
            return KeyResponse::ignored();
        }
        let Some(active) = origin else {
            return KeyResponse::ignored();
        };
        let Some(initial_rect) = host.activator_rect(active).filter(Rect::is_finite) else {
            keydrop_core::trace!(active = active.0, "start key on unregistered activator");
            return KeyResponse::ignored();
        };

        let coordinates = initial_rect.origin();
        let collisions = self.detect(initial_rect, host.droppables());
        self.session = Some(DragSession {
            active,
            initial_rect,
            current_coordinates: coordinates,
            scroll_ancestors: host.scrollable_ancestors(active),
            scroll_behavior: self.config.scroll_behavior,
            collisions,
            last_scroll: None,
        });

        keydrop_core::debug!(
            active = active.0,
            x = coordinates.x,
            y = coordinates.y,
            "keyboard drag start"
        );
        KeyResponse::consumed(DragEvent::Start {
            active,
            coordinates,
        })
    }

    fn handle_dragging_key<H>(&mut self, event: &KeyEvent, host: &mut H) -> KeyResponse
    where
        H: SensorHost + ?Sized,
    {
        let codes = &self.config.keyboard_codes;
        if codes.is_end(event.code) {
            return self.end(host);
        }
        if codes.is_cancel(event.code) {
            let mut response = self.cancel_with(CancelReason::Key);
            response.consumed = true;
            return response;
        }
        if codes.is_start(event.code) {
            keydrop_core::trace!(key = %event.code.name(), "start key ignored while dragging");
            return KeyResponse::ignored();
        }

        let Some(session) = self.session.as_mut() else {
            return KeyResponse::ignored();
        };
        let droppables = host.droppables().entries();
        let next = self.coordinates.next_coordinates(
            event,
            &CoordinatesArgs {
                current_coordinates: session.current_coordinates,
                active: session.active,
                context: CoordinatesContext {
                    active_rect: session.active_rect(),
                    droppable_containers: &droppables,
                    collisions: &session.collisions,
                },
            },
        );
        let Some(coordinates) = next.filter(Point::is_finite) else {
            keydrop_core::trace!(key = %event.code.name(), "key produced no movement");
            return KeyResponse::ignored();
        };

        session.current_coordinates = coordinates;
        let active_rect = session.active_rect();
        let collisions = detect_with(
            self.collision_detection.as_ref(),
            active_rect,
            &droppables,
        );
        session.collisions.clone_from(&collisions);
        let active = session.active;

        session.last_scroll =
            self.scroll
                .bring_into_view(&active_rect, &session.scroll_ancestors, host);

        keydrop_core::debug!(
            active = active.0,
            x = coordinates.x,
            y = coordinates.y,
            collisions = collisions.len(),
            scrolled = session.last_scroll.is_some(),
            "keyboard drag move"
        );
        KeyResponse::consumed(DragEvent::Move {
            active,
            coordinates,
            collisions,
        })
    }

    fn end<H>(&mut self, host: &mut H) -> KeyResponse
    where
        H: SensorHost + ?Sized,
    {
        let Some(session) = self.session.take() else {
            return KeyResponse::ignored();
        };
        let collisions = self.detect(session.active_rect(), host.droppables());
        let over = first_collision(&collisions);

        keydrop_core::debug!(
            active = session.active.0,
            over = ?over.map(|c| c.id.0),
            "keyboard drag end"
        );
        KeyResponse::consumed(DragEvent::End {
            active: session.active,
            coordinates: session.current_coordinates,
            over,
        })
    }

    fn cancel_with(&mut self, reason: CancelReason) -> KeyResponse {
        let Some(session) = self.session.take() else {
            return KeyResponse::ignored();
        };
        keydrop_core::debug!(
            active = session.active.0,
            reason = reason.as_str(),
            "keyboard drag cancel"
        );
        KeyResponse::passive(DragEvent::Cancel {
            active: session.active,
            reason,
        })
    }

    fn detect(&self, active_rect: Rect, registry: &dyn DroppableRegistry) -> Vec<Collision> {
        detect_with(
            self.collision_detection.as_ref(),
            active_rect,
            &registry.entries(),
        )
    }
}

fn detect_with(
    strategy: &dyn CollisionDetection,
    active_rect: Rect,
    droppables: &[DroppableEntry],
) -> Vec<Collision> {
    let span = keydrop_core::debug_span!("collision_detect", droppables = droppables.len());
    let _guard = span.enter();
    strategy.detect(&CollisionArgs::new(active_rect, droppables))
}
