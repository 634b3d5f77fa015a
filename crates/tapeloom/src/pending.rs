//! View-only parameters carried across one model call.
//!
//! The model's creation mutators take no geometry or colors, yet the node,
//! edge or head they end up creating needs them. The editor fills a
//! [`PendingCreation`] right before the call, hands it to the
//! [`EventBus`](crate::bus::EventBus) for that call only, and the
//! notification handler takes what it needs out of it. Whatever is left
//! when the call returns is dropped.

use tapeloom_core::{color::Color, geometry::Point};

/// Single-slot-per-kind creation parameters.
///
/// Each `take_*` method empties its slot, so a value is consumed at most
/// once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingCreation {
    position: Option<Point>,
    control1: Option<Point>,
    control2: Option<Point>,
    head_color: Option<Color>,
}

impl PendingCreation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for a state about to be created at `position`.
    pub fn for_state(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Parameters for a transition about to be created, with optional
    /// user-dragged control points in diagram coordinates.
    pub fn for_transition(control1: Option<Point>, control2: Option<Point>) -> Self {
        Self {
            control1,
            control2,
            ..Self::default()
        }
    }

    /// Parameters for a head about to be created.
    pub fn for_head(color: Option<Color>) -> Self {
        Self {
            head_color: color,
            ..Self::default()
        }
    }

    pub fn take_position(&mut self) -> Option<Point> {
        self.position.take()
    }

    /// Takes both control slots at once: a transition consumes them together.
    pub fn take_controls(&mut self) -> (Option<Point>, Option<Point>) {
        (self.control1.take(), self.control2.take())
    }

    pub fn take_head_color(&mut self) -> Option<Color> {
        self.head_color.take()
    }

    /// Whether every slot has been consumed.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.control1.is_none()
            && self.control2.is_none()
            && self.head_color.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
