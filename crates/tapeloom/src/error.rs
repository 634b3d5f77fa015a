//! Error types for Tapeloom operations.
//!
//! - [`ConsistencyError`]: the diagram and the model disagree. Raised while a
//!   notification is handled and fatal to the editing session.
//! - [`EditorError`]: why an edit intent was refused, including the model's
//!   own rejection passed through unchanged.
//! - [`TapeloomError`]: the crate-boundary error used by the scenario runner
//!   and the exporter.

use std::{error::Error as StdError, io};

use thiserror::Error;

use tapeloom_core::{color::Color, registry::RegistryError};

use crate::{
    diagram::{EdgeId, NodeId},
    model::{HeadRef, StateId, TapeId, TransitionId},
};

/// The diagram no longer mirrors the model.
///
/// This can only happen if the model reports an entity the diagram never
/// saw, or reuses an id. Nothing is skipped: the first such error stops
/// delivery and the editor refuses every later intent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("identity registry out of sync: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0} has no diagram node")]
    MissingNode(NodeId),

    #[error("{0} has no diagram edge")]
    MissingEdge(EdgeId),

    #[error("{state} removed while {count} transition(s) still reference it")]
    DanglingEdges { state: StateId, count: usize },

    #[error("{transition} displays no {head}")]
    UnknownHead {
        transition: TransitionId,
        head: HeadRef,
    },

    #[error("{transition} displays no {tape}")]
    UnknownTape {
        transition: TransitionId,
        tape: TapeId,
    },

    #[error("{transition} has no action at index {index}")]
    UnknownAction {
        transition: TransitionId,
        index: usize,
    },

    #[error("{transition} displays {displayed} action(s) that do not match the model's {expected}")]
    ActionsOutOfSync {
        transition: TransitionId,
        displayed: usize,
        expected: usize,
    },

    #[error("head palette is exhausted and no color was supplied for {0}")]
    NoHeadColor(HeadRef),
}

/// Why an edit intent was refused.
///
/// `E` is the model's error type.
#[derive(Debug, Error)]
pub enum EditorError<E>
where
    E: StdError + 'static,
{
    #[error("an animation is in progress, edit refused")]
    Busy,

    #[error("editing session stopped after a consistency failure: {0}")]
    Poisoned(ConsistencyError),

    #[error("{0} is not part of the diagram")]
    UnknownElement(String),

    #[error("color {0} is already used by another head")]
    ColorTaken(Color),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    Model(E),
}

/// The main error type for Tapeloom operations.
#[derive(Debug, Error)]
pub enum TapeloomError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Edit failed at step {step}: {message}")]
    Edit { step: usize, message: String },

    #[error("Export error: {0}")]
    Export(Box<dyn StdError>),
}

impl From<crate::export::Error> for TapeloomError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
