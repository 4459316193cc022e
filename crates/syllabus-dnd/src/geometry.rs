#![forbid(unsafe_code)]

//! Geometric collision candidates for hosts without their own ranking.
//!
//! Drag frameworks normally hand the resolver a candidate set and a
//! nearest-center ranking. [`CollisionFrame`] derives both from registered
//! drop-target rectangles and the rectangle of the dragged item, so headless
//! hosts and tests can drive the resolver with plain layout data.
//!
//! Ranking is by squared distance between centers; ties keep registration
//! order, which makes the output deterministic for identical layouts.

use syllabus_core::{DropTarget, ModuleId};

use crate::collision::CollisionInput;

/// Axis-aligned rectangle in host (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Positive-area overlap test. Touching edges do not collide.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open point containment.
    #[must_use]
    pub fn contains_point(&self, (x, y): (f32, f32)) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Squared distance between the two centers.
    #[must_use]
    pub fn center_distance_sq(&self, other: &Rect) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = ax - bx;
        let dy = ay - by;
        dx * dx + dy * dy
    }
}

/// One droppable element and its last measured rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTarget {
    pub target: DropTarget,
    pub rect: Rect,
}

/// Measured drop targets for one drag.
#[derive(Debug, Clone, Default)]
pub struct CollisionFrame {
    targets: Vec<RegisteredTarget>,
}

impl CollisionFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-measure) a target. Re-registering an id replaces its
    /// rectangle but keeps its original registration slot.
    pub fn register(&mut self, target: DropTarget, rect: Rect) {
        match self
            .targets
            .iter_mut()
            .find(|registered| registered.target == target)
        {
            Some(registered) => registered.rect = rect,
            None => self.targets.push(RegisteredTarget { target, rect }),
        }
    }

    /// Drop a target, e.g. when its element unmounts.
    pub fn unregister(&mut self, target: &DropTarget) {
        self.targets.retain(|registered| &registered.target != target);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Build the resolver input for the dragged item's current rectangle.
    ///
    /// `colliding` holds every target overlapping `active` in registration
    /// order. `nearest_center` ranks *all* registered targets by center
    /// distance, like the framework's closest-center fallback. `nested` maps
    /// each lesson to the first registered module zone containing its center.
    #[must_use]
    pub fn detect(&self, active: Rect) -> CollisionInput {
        let colliding = self
            .targets
            .iter()
            .filter(|registered| registered.rect.intersects(&active))
            .map(|registered| registered.target.clone())
            .collect();

        let mut ranked: Vec<(f32, usize)> = self
            .targets
            .iter()
            .enumerate()
            .map(|(slot, registered)| (registered.rect.center_distance_sq(&active), slot))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let nearest_center = ranked
            .into_iter()
            .map(|(_, slot)| self.targets[slot].target.clone())
            .collect();

        let nested = self
            .targets
            .iter()
            .filter_map(|registered| match &registered.target {
                DropTarget::Lesson(lesson) => self
                    .enclosing_zone(&registered.rect)
                    .map(|module| (lesson.clone(), module.clone())),
                _ => None,
            })
            .collect();

        CollisionInput {
            colliding,
            nearest_center,
            nested,
        }
    }

    fn enclosing_zone(&self, rect: &Rect) -> Option<&ModuleId> {
        let center = rect.center();
        self.targets
            .iter()
            .find_map(|registered| match &registered.target {
                DropTarget::ModuleZone(module) if registered.rect.contains_point(center) => {
                    Some(module)
                }
                _ => None,
            })
    }
}
