#![forbid(unsafe_code)]

//! Scroll coordination while dragging.
//!
//! When the active rectangle crosses the visible edge of a scrollable
//! ancestor, the coordinator asks the nearest ancestor that can still move in
//! that direction to scroll just far enough to reveal it again.
//!
//! Requests are fire-and-forget: the host may animate a `Smooth` scroll over
//! several frames, and the new offset is picked up on the next layout read.
//! Nothing here waits for the scroll to finish.

use keydrop_core::geometry::{Point, Rect};

/// How a scroll request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollBehavior {
    /// Animated scroll.
    #[default]
    Smooth,
    /// Jump immediately.
    Auto,
}

impl ScrollBehavior {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Auto => "auto",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smooth" => Some(Self::Smooth),
            "auto" | "instant" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Opaque handle to a scrollable ancestor owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScrollAncestorId(pub u64);

/// Point-in-time scroll state of one ancestor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Visible region, in the same coordinate space as drag rectangles.
    pub viewport: Rect,
    /// Current scroll offset.
    pub offset: Point,
    /// Largest reachable offset on each axis.
    pub max_offset: Point,
}

impl ScrollMetrics {
    /// Clamp a candidate offset to the scrollable range.
    #[must_use]
    pub fn clamp(&self, offset: Point) -> Point {
        Point::new(
            offset.x.clamp(0.0, self.max_offset.x.max(0.0)),
            offset.y.clamp(0.0, self.max_offset.y.max(0.0)),
        )
    }
}

/// Scroll side of the host.
pub trait ScrollHost {
    /// Current metrics of an ancestor, `None` if it can no longer be measured.
    fn scroll_metrics(&self, ancestor: ScrollAncestorId) -> Option<ScrollMetrics>;

    /// Ask an ancestor to scroll to `offset`. Must not block.
    fn scroll_to(&mut self, ancestor: ScrollAncestorId, offset: Point, behavior: ScrollBehavior);
}

/// A scroll request that was issued to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub ancestor: ScrollAncestorId,
    pub from: Point,
    pub to: Point,
    pub behavior: ScrollBehavior,
}

/// Issues scroll requests that keep the active rectangle visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollCoordinator {
    behavior: ScrollBehavior,
}

impl ScrollCoordinator {
    #[must_use]
    pub const fn new(behavior: ScrollBehavior) -> Self {
        Self { behavior }
    }

    #[must_use]
    pub const fn behavior(&self) -> ScrollBehavior {
        self.behavior
    }

    /// Scroll the nearest ancestor whose boundary `rect` crosses.
    ///
    /// `ancestors` must be ordered nearest-first. Ancestors that are not
    /// crossed, cannot be measured, or are already scrolled to their limit
    /// in the crossing direction are passed over. At most one request is
    /// issued.
    pub fn bring_into_view<H>(
        &self,
        rect: &Rect,
        ancestors: &[ScrollAncestorId],
        host: &mut H,
    ) -> Option<ScrollRequest>
    where
        H: ScrollHost + ?Sized,
    {
        if !rect.is_finite() {
            return None;
        }

        for &ancestor in ancestors {
            let Some(metrics) = host.scroll_metrics(ancestor) else {
                continue;
            };
            let overflow = overflow(rect, &metrics.viewport);
            if overflow == Point::ZERO {
                continue;
            }

            let target = metrics.clamp(metrics.offset + overflow);
            if target == metrics.offset {
                keydrop_core::trace!(ancestor = ancestor.0, "scroll ancestor at limit");
                continue;
            }

            host.scroll_to(ancestor, target, self.behavior);
            keydrop_core::trace!(
                ancestor = ancestor.0,
                to_x = target.x,
                to_y = target.y,
                behavior = self.behavior.as_str(),
                "scroll requested"
            );
            return Some(ScrollRequest {
                ancestor,
                from: metrics.offset,
                to: target,
                behavior: self.behavior,
            });
        }
        None
    }
}

/// Signed distance `rect` sticks out of `viewport` on each axis.
///
/// A rectangle larger than the viewport aligns its leading edge.
fn overflow(rect: &Rect, viewport: &Rect) -> Point {
    let axis = |start: f64, end: f64, view_start: f64, view_end: f64| {
        if start < view_start {
            start - view_start
        } else if end > view_end {
            (end - view_end).min(start - view_start)
        } else {
            0.0
        }
    };
    Point::new(
        axis(rect.left, rect.right(), viewport.left, viewport.right()),
        axis(rect.top, rect.bottom(), viewport.top, viewport.bottom()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Host {
        metrics: HashMap<ScrollAncestorId, ScrollMetrics>,
        requests: Vec<(ScrollAncestorId, Point, ScrollBehavior)>,
    }

    impl ScrollHost for Host {
        fn scroll_metrics(&self, ancestor: ScrollAncestorId) -> Option<ScrollMetrics> {
            self.metrics.get(&ancestor).copied()
        }

        fn scroll_to(&mut self, ancestor: ScrollAncestorId, offset: Point, behavior: ScrollBehavior) {
            self.requests.push((ancestor, offset, behavior));
        }
    }

    fn metrics(viewport: Rect, offset: Point, max: Point) -> ScrollMetrics {
        ScrollMetrics {
            viewport,
            offset,
            max_offset: max,
        }
    }

    #[test]
    fn inside_viewport_requests_nothing() {
        let mut host = Host::default();
        host.metrics.insert(
            ScrollAncestorId(1),
            metrics(Rect::from_size(100.0, 100.0), Point::ZERO, Point::new(0.0, 500.0)),
        );
        let coordinator = ScrollCoordinator::default();
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(coordinator.bring_into_view(&rect, &[ScrollAncestorId(1)], &mut host), None);
        assert!(host.requests.is_empty());
    }

    #[test]
    fn crossing_bottom_scrolls_down_by_overflow() {
        let mut host = Host::default();
        host.metrics.insert(
            ScrollAncestorId(1),
            metrics(Rect::from_size(100.0, 100.0), Point::new(0.0, 40.0), Point::new(0.0, 500.0)),
        );
        let coordinator = ScrollCoordinator::new(ScrollBehavior::Auto);
        let rect = Rect::new(10.0, 90.0, 20.0, 20.0);
        let request = coordinator
            .bring_into_view(&rect, &[ScrollAncestorId(1)], &mut host)
            .expect("scroll request");
        assert_eq!(request.from, Point::new(0.0, 40.0));
        assert_eq!(request.to, Point::new(0.0, 50.0));
        assert_eq!(
            host.requests,
            vec![(ScrollAncestorId(1), Point::new(0.0, 50.0), ScrollBehavior::Auto)]
        );
    }

    #[test]
    fn crossing_top_is_clamped_to_zero() {
        let mut host = Host::default();
        host.metrics.insert(
            ScrollAncestorId(1),
            metrics(Rect::from_size(100.0, 100.0), Point::new(0.0, 5.0), Point::new(0.0, 500.0)),
        );
        let rect = Rect::new(10.0, -30.0, 20.0, 20.0);
        let request = ScrollCoordinator::default()
            .bring_into_view(&rect, &[ScrollAncestorId(1)], &mut host)
            .expect("scroll request");
        assert_eq!(request.to, Point::ZERO);
        assert_eq!(request.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn ancestor_at_limit_defers_to_outer() {
        let mut host = Host::default();
        host.metrics.insert(
            ScrollAncestorId(1),
            metrics(Rect::from_size(100.0, 100.0), Point::new(0.0, 200.0), Point::new(0.0, 200.0)),
        );
        host.metrics.insert(
            ScrollAncestorId(2),
            metrics(Rect::from_size(100.0, 100.0), Point::ZERO, Point::new(0.0, 1000.0)),
        );
        host.metrics.insert(
            ScrollAncestorId(3),
            metrics(Rect::from_size(100.0, 100.0), Point::ZERO, Point::new(0.0, 1000.0)),
        );
        let rect = Rect::new(0.0, 95.0, 10.0, 10.0);
        let chain = [ScrollAncestorId(9), ScrollAncestorId(1), ScrollAncestorId(2), ScrollAncestorId(3)];
        let request = ScrollCoordinator::default()
            .bring_into_view(&rect, &chain, &mut host)
            .expect("scroll request");
        assert_eq!(request.ancestor, ScrollAncestorId(2));
        assert_eq!(host.requests.len(), 1);
    }

    #[test]
    fn oversized_rect_aligns_leading_edge() {
        let viewport = Rect::from_size(100.0, 100.0);
        let rect = Rect::new(10.0, 0.0, 300.0, 10.0);
        assert_eq!(overflow(&rect, &viewport), Point::new(10.0, 0.0));
    }

    #[test]
    fn behavior_parse_and_str() {
        assert_eq!(ScrollBehavior::parse("Smooth"), Some(ScrollBehavior::Smooth));
        assert_eq!(ScrollBehavior::parse(" auto "), Some(ScrollBehavior::Auto));
        assert_eq!(ScrollBehavior::parse("jumpy"), None);
        assert_eq!(ScrollBehavior::Auto.as_str(), "auto");
        assert_eq!(ScrollBehavior::default(), ScrollBehavior::Smooth);
    }
}
