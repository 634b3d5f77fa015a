//! Tapeloom Core Types and Definitions
//!
//! This crate provides the leaf building blocks of the Tapeloom automaton
//! editor. It includes:
//!
//! - **Geometry**: Points, vector helpers and grid snapping ([`geometry`] module)
//! - **Curves**: Transition curve engine: anchors, default control points,
//!   self-loops, arrowheads and label placement ([`curve`] module)
//! - **Registry**: Exclusive bidirectional identity maps ([`registry::Registry`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod curve;
pub mod geometry;
pub mod registry;
