#![forbid(unsafe_code)]

//! Collision detection strategies.
//!
//! A strategy receives the active rectangle, a point-in-time snapshot of the
//! droppable registry, and (optionally) the pointer position, and returns the
//! droppables it considers hit, best match first.
//!
//! # Strategies
//!
//! | Strategy | Hit when | `value` | Empty when |
//! |----------|----------|---------|------------|
//! | [`rect_intersection`] | rectangles overlap on both axes | overlap area / active area | nothing overlaps |
//! | [`closest_center`] | always | `-distance(center, center)` | no measurable droppable |
//! | [`closest_corners`] | always | `-sum(corner distances)` | no measurable droppable |
//! | [`pointer_within`] | pointer inside rect (inclusive) | `-area` (smallest container first) | no pointer |
//!
//! # Invariants
//!
//! 1. Results are sorted by [`sort_collisions_desc`]; the sort is stable, so
//!    equal values keep registration order.
//! 2. Droppables without a rectangle, with a non-finite rectangle, or marked
//!    disabled never appear in a result.
//! 3. Strategies are pure: the same arguments always give the same result.
//!
//! # Composition
//!
//! [`filtered`], [`with_fallback`] and [`partitioned`] wrap strategies into
//! new ones. Any `Fn(&CollisionArgs) -> Vec<Collision>` is a strategy.

use std::cmp::Ordering;
use std::collections::HashMap;

use keydrop_core::geometry::{Point, Rect, center, corners, distance};

// ---------------------------------------------------------------------------
// Identifiers and registry
// ---------------------------------------------------------------------------

/// Opaque identifier of a droppable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DroppableId(pub u64);

impl From<u64> for DroppableId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A droppable as seen by collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroppableEntry {
    pub id: DroppableId,
    /// `None` when the droppable cannot currently be measured.
    pub rect: Option<Rect>,
    /// Disabled droppables never collide.
    pub disabled: bool,
}

impl DroppableEntry {
    #[must_use]
    pub fn new(id: impl Into<DroppableId>, rect: Option<Rect>) -> Self {
        Self {
            id: id.into(),
            rect,
            disabled: false,
        }
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The rectangle, if this entry may take part in collision detection.
    #[must_use]
    pub fn measurable_rect(&self) -> Option<Rect> {
        if self.disabled {
            return None;
        }
        self.rect.filter(Rect::is_finite)
    }
}

/// Read interface of the live droppable registry.
///
/// The registry belongs to the host; sensors only ever read from it.
pub trait DroppableRegistry {
    /// Current rectangle of a droppable, `None` if unknown or unmeasurable.
    fn rect(&self, id: DroppableId) -> Option<Rect>;

    /// Registered droppables in registration order.
    fn ids(&self) -> Vec<DroppableId>;

    /// Whether the droppable currently refuses drops.
    fn is_disabled(&self, _id: DroppableId) -> bool {
        false
    }

    /// Point-in-time snapshot of every registered droppable.
    fn entries(&self) -> Vec<DroppableEntry> {
        self.ids()
            .into_iter()
            .map(|id| DroppableEntry::new(id, self.rect(id)).with_disabled(self.is_disabled(id)))
            .collect()
    }
}

/// Insertion-ordered in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct DroppableMap {
    order: Vec<DroppableId>,
    slots: HashMap<DroppableId, Slot>,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    rect: Option<Rect>,
    disabled: bool,
}

impl DroppableMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a droppable, or replace its rectangle if already registered.
    /// Re-registration keeps the original position in the order.
    pub fn insert(&mut self, id: impl Into<DroppableId>, rect: Option<Rect>) {
        let id = id.into();
        match self.slots.get_mut(&id) {
            Some(slot) => slot.rect = rect,
            None => {
                self.order.push(id);
                self.slots.insert(
                    id,
                    Slot {
                        rect,
                        disabled: false,
                    },
                );
            }
        }
    }

    /// Unregister a droppable. Returns `true` if it was registered.
    pub fn remove(&mut self, id: impl Into<DroppableId>) -> bool {
        let id = id.into();
        if self.slots.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        true
    }

    /// Update the rectangle of a registered droppable. Returns `false` if the
    /// id is unknown.
    pub fn set_rect(&mut self, id: impl Into<DroppableId>, rect: Option<Rect>) -> bool {
        match self.slots.get_mut(&id.into()) {
            Some(slot) => {
                slot.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Enable or disable a registered droppable. Returns `false` if the id is
    /// unknown.
    pub fn set_disabled(&mut self, id: impl Into<DroppableId>, disabled: bool) -> bool {
        match self.slots.get_mut(&id.into()) {
            Some(slot) => {
                slot.disabled = disabled;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl DroppableRegistry for DroppableMap {
    fn rect(&self, id: DroppableId) -> Option<Rect> {
        self.slots.get(&id).and_then(|slot| slot.rect)
    }

    fn ids(&self) -> Vec<DroppableId> {
        self.order.clone()
    }

    fn is_disabled(&self, id: DroppableId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.disabled)
    }
}

// ---------------------------------------------------------------------------
// Collision
// ---------------------------------------------------------------------------

/// Ranking payload of a collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    pub droppable_container: DroppableEntry,
    /// Strategy-specific score; larger is better within one invocation.
    pub value: f64,
}

/// A candidate drop target produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub id: DroppableId,
    pub data: CollisionData,
}

impl Collision {
    #[must_use]
    pub fn new(droppable_container: DroppableEntry, value: f64) -> Self {
        Self {
            id: droppable_container.id,
            data: CollisionData {
                droppable_container,
                value,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.data.value
    }
}

/// Canonical comparator: descending by `data.value`.
///
/// Use with a stable sort so equal values keep their incoming order.
/// `-0.0` and `+0.0` compare equal.
#[must_use]
pub fn sort_collisions_desc(a: &Collision, b: &Collision) -> Ordering {
    // -0.0 + 0.0 is +0.0.
    (b.data.value + 0.0).total_cmp(&(a.data.value + 0.0))
}

/// Best collision of a ranked list.
#[must_use]
pub fn first_collision(collisions: &[Collision]) -> Option<Collision> {
    collisions.first().copied()
}

// ---------------------------------------------------------------------------
// Strategy contract
// ---------------------------------------------------------------------------

/// Input to a collision detection strategy.
#[derive(Debug, Clone, Copy)]
pub struct CollisionArgs<'a> {
    pub active_rect: Rect,
    pub droppable_containers: &'a [DroppableEntry],
    pub pointer_coordinates: Option<Point>,
}

impl<'a> CollisionArgs<'a> {
    #[must_use]
    pub fn new(active_rect: Rect, droppable_containers: &'a [DroppableEntry]) -> Self {
        Self {
            active_rect,
            droppable_containers,
            pointer_coordinates: None,
        }
    }

    #[must_use]
    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer_coordinates = Some(pointer);
        self
    }

    fn measurable(&self) -> impl Iterator<Item = (&'a DroppableEntry, Rect)> + 'a {
        self.droppable_containers
            .iter()
            .filter_map(|entry| entry.measurable_rect().map(|rect| (entry, rect)))
    }
}

/// A collision detection strategy.
pub trait CollisionDetection {
    /// Ranked collisions, best first. May be empty.
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision>;
}

impl<F> CollisionDetection for F
where
    F: Fn(&CollisionArgs<'_>) -> Vec<Collision>,
{
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        self(args)
    }
}

fn ranked(mut collisions: Vec<Collision>) -> Vec<Collision> {
    collisions.sort_by(sort_collisions_desc);
    collisions
}

// ---------------------------------------------------------------------------
// Built-in strategies
// ---------------------------------------------------------------------------

/// Droppables whose rectangle overlaps the active rectangle, ranked by the
/// fraction of the active rectangle they cover.
#[must_use]
pub fn rect_intersection(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let active = args.active_rect;
    if !active.is_finite() {
        return Vec::new();
    }
    ranked(
        args.measurable()
            .filter_map(|(entry, rect)| {
                let overlap = active.intersection_opt(&rect)?;
                Some(Collision::new(*entry, coverage_ratio(&active, &overlap)))
            })
            .collect(),
    )
}

/// Fraction of `active` covered by `overlap`, in (0, 1].
///
/// Computed per axis so a zero-length active axis counts as fully covered
/// instead of dividing by a zero area.
fn coverage_ratio(active: &Rect, overlap: &Rect) -> f64 {
    let axis = |part: f64, whole: f64| if whole > 0.0 { part / whole } else { 1.0 };
    let ratio = axis(overlap.width, active.width) * axis(overlap.height, active.height);
    ratio.clamp(f64::MIN_POSITIVE, 1.0)
}

/// Every measurable droppable, nearest center first.
#[must_use]
pub fn closest_center(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let origin = center(&args.active_rect);
    ranked(
        args.measurable()
            .map(|(entry, rect)| Collision::new(*entry, -distance(origin, center(&rect))))
            .collect(),
    )
}

/// Every measurable droppable, smallest summed corner-to-corner distance first.
#[must_use]
pub fn closest_corners(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let active = corners(&args.active_rect);
    ranked(
        args.measurable()
            .map(|(entry, rect)| {
                let sum: f64 = active
                    .iter()
                    .zip(corners(&rect))
                    .map(|(a, b)| distance(*a, b))
                    .sum();
                Collision::new(*entry, -sum)
            })
            .collect(),
    )
}

/// Droppables containing the pointer, smallest (innermost) container first.
///
/// Returns nothing without pointer coordinates, so keyboard-driven drags
/// must compose this with a fallback strategy.
#[must_use]
pub fn pointer_within(args: &CollisionArgs<'_>) -> Vec<Collision> {
    let Some(pointer) = args.pointer_coordinates.filter(Point::is_finite) else {
        return Vec::new();
    };
    ranked(
        args.measurable()
            .filter(|(_, rect)| rect.contains_point(pointer))
            .map(|(entry, rect)| Collision::new(*entry, -rect.area()))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Restricts the droppables a strategy sees.
#[derive(Debug, Clone)]
pub struct Filtered<P, A> {
    predicate: P,
    inner: A,
}

/// Run `inner` only over droppables accepted by `predicate`.
pub fn filtered<P, A>(predicate: P, inner: A) -> Filtered<P, A>
where
    P: Fn(&DroppableEntry) -> bool,
    A: CollisionDetection,
{
    Filtered { predicate, inner }
}

impl<P, A> CollisionDetection for Filtered<P, A>
where
    P: Fn(&DroppableEntry) -> bool,
    A: CollisionDetection,
{
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let subset: Vec<DroppableEntry> = args
            .droppable_containers
            .iter()
            .filter(|entry| (self.predicate)(entry))
            .copied()
            .collect();
        self.inner.detect(&CollisionArgs {
            droppable_containers: &subset,
            ..*args
        })
    }
}

/// Tries `primary`, consulting `fallback` only when it finds nothing.
#[derive(Debug, Clone)]
pub struct Fallback<A, B> {
    primary: A,
    fallback: B,
}

/// Compose two strategies: `fallback` runs only if `primary` returns empty.
pub fn with_fallback<A, B>(primary: A, fallback: B) -> Fallback<A, B>
where
    A: CollisionDetection,
    B: CollisionDetection,
{
    Fallback { primary, fallback }
}

impl<A, B> CollisionDetection for Fallback<A, B>
where
    A: CollisionDetection,
    B: CollisionDetection,
{
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let collisions = self.primary.detect(args);
        if collisions.is_empty() {
            self.fallback.detect(args)
        } else {
            collisions
        }
    }
}

type GroupPredicate = Box<dyn Fn(&DroppableEntry) -> bool>;

/// Partitions droppables into disjoint groups, each with its own strategy.
///
/// Each droppable goes to the first group whose predicate accepts it;
/// droppables no group accepts are ignored. Group results are concatenated
/// and re-ranked with [`sort_collisions_desc`].
#[derive(Default)]
pub struct Partitioned {
    groups: Vec<(GroupPredicate, Box<dyn CollisionDetection>)>,
}

impl std::fmt::Debug for Partitioned {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioned")
            .field("groups", &self.groups.len())
            .finish()
    }
}

/// Start an empty partitioned strategy.
#[must_use]
pub fn partitioned() -> Partitioned {
    Partitioned::default()
}

impl Partitioned {
    /// Add a group handled by `strategy`.
    #[must_use]
    pub fn group<P, A>(mut self, predicate: P, strategy: A) -> Self
    where
        P: Fn(&DroppableEntry) -> bool + 'static,
        A: CollisionDetection + 'static,
    {
        self.groups.push((Box::new(predicate), Box::new(strategy)));
        self
    }
}

impl CollisionDetection for Partitioned {
    fn detect(&self, args: &CollisionArgs<'_>) -> Vec<Collision> {
        let mut buckets: Vec<Vec<DroppableEntry>> = vec![Vec::new(); self.groups.len()];
        for entry in args.droppable_containers {
            if let Some(slot) = self.groups.iter().position(|(accepts, _)| accepts(entry)) {
                buckets[slot].push(*entry);
            }
        }

        let mut collisions = Vec::new();
        for ((_, strategy), bucket) in self.groups.iter().zip(&buckets) {
            if bucket.is_empty() {
                continue;
            }
            collisions.extend(strategy.detect(&CollisionArgs {
                droppable_containers: bucket,
                ..*args
            }));
        }
        ranked(collisions)
    }
}
