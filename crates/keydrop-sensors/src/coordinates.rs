#![forbid(unsafe_code)]

//! Coordinates getters: map a key press to the next drag coordinates.
//!
//! A getter returns `None` for keys it does not handle, which tells the
//! sensor to leave the drag where it is. Getters never mutate the sensor;
//! they may read the layout snapshot passed in [`CoordinatesContext`].

use keydrop_core::event::{KeyCode, KeyEvent};
use keydrop_core::geometry::{Point, Rect};

use crate::collision::{Collision, CollisionArgs, DroppableEntry, closest_corners};
use crate::keyboard::DraggableId;

/// Default distance moved per arrow key press.
pub const DEFAULT_STEP: f64 = 25.0;

/// Step multiplier applied while Shift is held.
pub const SHIFT_STEP_MULTIPLIER: f64 = 4.0;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Arrow direction of a movement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Direction of an arrow key, `None` for every other key.
    #[must_use]
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Unit offset in screen space (`y` grows downwards).
    #[must_use]
    pub const fn unit(self) -> Point {
        match self {
            Self::Up => Point::new(0.0, -1.0),
            Self::Down => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }

    /// Whether `candidate` lies strictly past `from` in this direction,
    /// comparing leading edges.
    fn is_ahead(self, from: &Rect, candidate: &Rect) -> bool {
        match self {
            Self::Up => candidate.top < from.top,
            Self::Down => candidate.top > from.top,
            Self::Left => candidate.left < from.left,
            Self::Right => candidate.left > from.left,
        }
    }
}

// ---------------------------------------------------------------------------
// Getter contract
// ---------------------------------------------------------------------------

/// Read-only layout snapshot available to a getter.
#[derive(Debug, Clone, Copy)]
pub struct CoordinatesContext<'a> {
    /// Active rectangle at the current coordinates.
    pub active_rect: Rect,
    pub droppable_containers: &'a [DroppableEntry],
    /// Collisions computed for the current coordinates.
    pub collisions: &'a [Collision],
}

/// Arguments passed to a [`CoordinatesGetter`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinatesArgs<'a> {
    pub current_coordinates: Point,
    pub active: DraggableId,
    pub context: CoordinatesContext<'a>,
}

/// Maps a key event to the next drag coordinates.
pub trait CoordinatesGetter {
    /// Next coordinates, or `None` when the key does not move the drag.
    fn next_coordinates(&self, event: &KeyEvent, args: &CoordinatesArgs<'_>) -> Option<Point>;
}

impl<F> CoordinatesGetter for F
where
    F: Fn(&KeyEvent, &CoordinatesArgs<'_>) -> Option<Point>,
{
    fn next_coordinates(&self, event: &KeyEvent, args: &CoordinatesArgs<'_>) -> Option<Point> {
        self(event, args)
    }
}

// ---------------------------------------------------------------------------
// Built-in getters
// ---------------------------------------------------------------------------

/// Moves a fixed step along the axis of the pressed arrow key.
///
/// Holding Shift multiplies the step by `shift_multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowKeyCoordinates {
    pub step: f64,
    pub shift_multiplier: f64,
}

impl Default for ArrowKeyCoordinates {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl ArrowKeyCoordinates {
    #[must_use]
    pub const fn new(step: f64) -> Self {
        Self {
            step,
            shift_multiplier: SHIFT_STEP_MULTIPLIER,
        }
    }

    #[must_use]
    pub const fn with_shift_multiplier(mut self, multiplier: f64) -> Self {
        self.shift_multiplier = multiplier;
        self
    }

    /// Distance moved by `event`.
    #[must_use]
    pub fn step_for(&self, event: &KeyEvent) -> f64 {
        if event.shift() {
            self.step * self.shift_multiplier
        } else {
            self.step
        }
    }
}

impl CoordinatesGetter for ArrowKeyCoordinates {
    fn next_coordinates(&self, event: &KeyEvent, args: &CoordinatesArgs<'_>) -> Option<Point> {
        let unit = Direction::from_key(event.code)?.unit();
        let step = self.step_for(event);
        Some(Point::new(
            args.current_coordinates.x + unit.x * step,
            args.current_coordinates.y + unit.y * step,
        ))
    }
}

/// Jumps to the nearest droppable ahead in the pressed direction.
///
/// Candidates are droppables whose leading edge lies strictly past the
/// active rectangle's; the closest by summed corner distance wins and the
/// drag moves onto its top-left corner. Returns `None` when nothing lies
/// ahead, so the drag stays on the last target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DroppableJumpCoordinates;

impl CoordinatesGetter for DroppableJumpCoordinates {
    fn next_coordinates(&self, event: &KeyEvent, args: &CoordinatesArgs<'_>) -> Option<Point> {
        let direction = Direction::from_key(event.code)?;
        let active = args.context.active_rect;

        let ahead: Vec<DroppableEntry> = args
            .context
            .droppable_containers
            .iter()
            .filter(|entry| {
                entry
                    .measurable_rect()
                    .is_some_and(|rect| direction.is_ahead(&active, &rect))
            })
            .copied()
            .collect();

        let best = closest_corners(&CollisionArgs::new(active, &ahead))
            .into_iter()
            .next()?;
        best.data
            .droppable_container
            .measurable_rect()
            .map(|rect| rect.origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::DroppableId;
    use keydrop_core::event::Modifiers;

    fn args<'a>(current: Point, droppables: &'a [DroppableEntry]) -> CoordinatesArgs<'a> {
        CoordinatesArgs {
            current_coordinates: current,
            active: DraggableId(1),
            context: CoordinatesContext {
                active_rect: Rect::new(current.x, current.y, 10.0, 10.0),
                droppable_containers: droppables,
                collisions: &[],
            },
        }
    }

    #[test]
    fn arrow_keys_move_default_step() {
        let getter = ArrowKeyCoordinates::default();
        let a = args(Point::new(100.0, 100.0), &[]);
        let next = |code| getter.next_coordinates(&KeyEvent::new(code), &a);
        assert_eq!(next(KeyCode::Right), Some(Point::new(125.0, 100.0)));
        assert_eq!(next(KeyCode::Left), Some(Point::new(75.0, 100.0)));
        assert_eq!(next(KeyCode::Up), Some(Point::new(100.0, 75.0)));
        assert_eq!(next(KeyCode::Down), Some(Point::new(100.0, 125.0)));
    }

    #[test]
    fn non_arrow_keys_do_not_move() {
        let getter = ArrowKeyCoordinates::default();
        let a = args(Point::new(0.0, 0.0), &[]);
        assert_eq!(getter.next_coordinates(&KeyEvent::new(KeyCode::Char('a')), &a), None);
        assert_eq!(getter.next_coordinates(&KeyEvent::new(KeyCode::Tab), &a), None);
    }

    #[test]
    fn custom_step() {
        let getter = ArrowKeyCoordinates::new(8.0);
        let a = args(Point::new(0.0, 0.0), &[]);
        assert_eq!(
            getter.next_coordinates(&KeyEvent::new(KeyCode::Down), &a),
            Some(Point::new(0.0, 8.0))
        );
    }

    #[test]
    fn shift_multiplies_step() {
        let getter = ArrowKeyCoordinates::default();
        let a = args(Point::new(100.0, 100.0), &[]);
        let shifted = KeyEvent::new(KeyCode::Right).with_modifiers(Modifiers::SHIFT);
        assert_eq!(getter.next_coordinates(&shifted, &a), Some(Point::new(200.0, 100.0)));

        let ctrl = KeyEvent::new(KeyCode::Up).with_modifiers(Modifiers::CTRL);
        assert_eq!(getter.next_coordinates(&ctrl, &a), Some(Point::new(100.0, 75.0)));

        let slow = ArrowKeyCoordinates::new(10.0).with_shift_multiplier(0.5);
        let shifted_left = KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT);
        assert_eq!(slow.next_coordinates(&shifted_left, &a), Some(Point::new(95.0, 100.0)));
    }

    fn vim_left(event: &KeyEvent, args: &CoordinatesArgs<'_>) -> Option<Point> {
        (event.code == KeyCode::Char('h')).then(|| args.current_coordinates + Point::new(-1.0, 0.0))
    }

    #[test]
    fn plain_functions_are_getters() {
        let a = args(Point::new(5.0, 5.0), &[]);
        assert_eq!(
            vim_left.next_coordinates(&KeyEvent::new(KeyCode::Char('h')), &a),
            Some(Point::new(4.0, 5.0))
        );
        assert_eq!(vim_left.next_coordinates(&KeyEvent::new(KeyCode::Right), &a), None);
    }

    #[test]
    fn jump_moves_to_nearest_droppable_ahead() {
        let droppables = vec![
            DroppableEntry::new(DroppableId(1), Some(Rect::new(0.0, 0.0, 10.0, 10.0))),
            DroppableEntry::new(DroppableId(2), Some(Rect::new(0.0, 40.0, 10.0, 10.0))),
            DroppableEntry::new(DroppableId(3), Some(Rect::new(0.0, 20.0, 10.0, 10.0))),
            DroppableEntry::new(DroppableId(4), Some(Rect::new(50.0, 0.0, 10.0, 10.0))),
        ];
        let getter = DroppableJumpCoordinates;
        let a = args(Point::new(0.0, 0.0), &droppables);
        assert_eq!(
            getter.next_coordinates(&KeyEvent::new(KeyCode::Down), &a),
            Some(Point::new(0.0, 20.0))
        );
        assert_eq!(
            getter.next_coordinates(&KeyEvent::new(KeyCode::Right), &a),
            Some(Point::new(50.0, 0.0))
        );
        assert_eq!(getter.next_coordinates(&KeyEvent::new(KeyCode::Up), &a), None);
    }

    #[test]
    fn jump_skips_disabled_droppables() {
        let droppables = vec![
            DroppableEntry::new(DroppableId(1), Some(Rect::new(0.0, 20.0, 10.0, 10.0)))
                .with_disabled(true),
            DroppableEntry::new(DroppableId(2), Some(Rect::new(0.0, 60.0, 10.0, 10.0))),
        ];
        let a = args(Point::new(0.0, 0.0), &droppables);
        assert_eq!(
            DroppableJumpCoordinates.next_coordinates(&KeyEvent::new(KeyCode::Down), &a),
            Some(Point::new(0.0, 60.0))
        );
    }

    #[test]
    fn direction_helpers() {
        assert_eq!(Direction::from_key(KeyCode::Up), Some(Direction::Up));
        assert_eq!(Direction::from_key(KeyCode::Enter), None);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert!(Direction::Down.is_vertical());
        assert!(!Direction::Right.is_vertical());
    }
}
