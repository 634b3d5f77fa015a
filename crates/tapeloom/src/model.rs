//! The interface between the editor and an automaton model.
//!
//! The editor never owns automaton semantics. It talks to any type that
//! implements [`AutomatonModel`]: it calls a mutator, and the model reports
//! what actually changed by publishing [`Notification`]s on the
//! [`EventBus`] it receives, before returning.
//!
//! Identifiers issued by the model ([`StateId`], [`TransitionId`],
//! [`TapeId`] and head indices) are opaque to the editor: it only compares
//! them and uses them as registry keys.
//!
//! [`Notification`]: crate::bus::Notification

use std::{collections::BTreeSet, error::Error, fmt};

use serde::Deserialize;

use crate::bus::EventBus;

macro_rules! model_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

model_id!(
    /// Handle of a state, issued by the model.
    StateId,
    "state"
);
model_id!(
    /// Handle of a transition, issued by the model.
    TransitionId,
    "transition"
);
model_id!(
    /// Handle of a tape, issued by the model.
    TapeId,
    "tape"
);

/// A head, addressed by its tape and its index on that tape.
///
/// Head indices are positional: removing a head shifts the index of every
/// later head on the same tape down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadRef {
    tape: TapeId,
    head: usize,
}

impl HeadRef {
    pub fn new(tape: TapeId, head: usize) -> Self {
        Self { tape, head }
    }

    pub fn tape(self) -> TapeId {
        self.tape
    }

    pub fn head(self) -> usize {
        self.head
    }
}

impl fmt::Display for HeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/head#{}", self.tape, self.head)
    }
}

/// Glyph shown for the blank symbol.
pub const BLANK_GLYPH: &str = "∅";

/// A symbol a head may read or write. Blank sorts after every symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadSymbol {
    Symbol(String),
    Blank,
}

impl ReadSymbol {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Self::Symbol(symbol.into())
    }

    /// The alphabet symbol, or `None` for the blank.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(symbol) => Some(symbol),
            Self::Blank => None,
        }
    }
}

impl From<Option<String>> for ReadSymbol {
    fn from(symbol: Option<String>) -> Self {
        symbol.map_or(Self::Blank, Self::Symbol)
    }
}

impl fmt::Display for ReadSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(symbol) => f.write_str(symbol),
            Self::Blank => f.write_str(BLANK_GLYPH),
        }
    }
}

/// Head movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Left => "⇐",
            Self::Right => "⇒",
            Self::Up => "⇑",
            Self::Down => "⇓",
        }
    }
}

/// What an action does to its head.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move(Direction),
    Write(ReadSymbol),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => f.write_str(direction.glyph()),
            Self::Write(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// One entry of a transition's ordered action list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    head: HeadRef,
    kind: ActionKind,
}

impl Action {
    pub fn new(head: HeadRef, kind: ActionKind) -> Self {
        Self { head, kind }
    }

    pub fn head(&self) -> HeadRef {
        self.head
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub(crate) fn head_mut(&mut self) -> &mut HeadRef {
        &mut self.head
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ActionKind {
        &mut self.kind
    }
}

/// Read-only access to a model, handed to subscribers while a
/// notification is delivered.
pub trait MachineView {
    /// Name of a state, if the model gave it one.
    fn state_name(&self, state: StateId) -> Option<String>;

    /// Names of every named state.
    fn state_names(&self) -> Vec<String>;

    fn is_initial(&self, state: StateId) -> bool;

    fn is_final(&self, state: StateId) -> bool;

    fn is_accepting(&self, state: StateId) -> bool;

    /// Source and target states of a transition.
    fn transition_endpoints(&self, transition: TransitionId) -> Option<(StateId, StateId)>;

    /// Every tape in order, with its number of heads.
    fn tapes(&self) -> Vec<(TapeId, usize)>;

    /// Symbols a transition head reacts to, or `None` if the transition or
    /// head does not exist.
    fn read_symbols(
        &self,
        transition: TransitionId,
        head: HeadRef,
    ) -> Option<BTreeSet<ReadSymbol>>;

    /// Ordered actions of a transition.
    fn actions(&self, transition: TransitionId) -> Vec<Action>;

    /// Symbols of the machine alphabet, in insertion order.
    fn alphabet(&self) -> Vec<String>;
}

/// A mutable automaton model.
///
/// Every mutator must publish the notifications describing its effect on
/// `bus` before returning, in the order the changes happen, and must
/// publish nothing when it fails.
pub trait AutomatonModel: MachineView {
    /// Rejection reasons. Passed through the editor unchanged.
    type Error: Error + 'static;

    fn add_state(
        &mut self,
        name: Option<&str>,
        bus: &mut EventBus<'_>,
    ) -> Result<StateId, Self::Error>;

    /// Removes a state together with every transition touching it.
    fn remove_state(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;

    fn rename_state(
        &mut self,
        state: StateId,
        name: &str,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn add_transition(
        &mut self,
        input: StateId,
        output: StateId,
        bus: &mut EventBus<'_>,
    ) -> Result<TransitionId, Self::Error>;

    fn remove_transition(
        &mut self,
        transition: TransitionId,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn toggle_final(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;

    fn toggle_accepting(
        &mut self,
        state: StateId,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn toggle_initial(&mut self, state: StateId, bus: &mut EventBus<'_>)
    -> Result<(), Self::Error>;

    fn add_read_symbol(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn remove_read_symbol(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn add_action(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        kind: ActionKind,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn remove_action(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        kind: ActionKind,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn add_tape(&mut self, bus: &mut EventBus<'_>) -> Result<TapeId, Self::Error>;

    fn remove_tape(&mut self, tape: TapeId, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;

    /// Appends a head to a tape and returns its index.
    fn add_head(&mut self, tape: TapeId, bus: &mut EventBus<'_>) -> Result<usize, Self::Error>;

    fn remove_head(&mut self, head: HeadRef, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;

    fn add_symbol(&mut self, symbol: &str, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;

    fn edit_symbol(
        &mut self,
        previous: &str,
        symbol: &str,
        bus: &mut EventBus<'_>,
    ) -> Result<(), Self::Error>;

    fn remove_symbol(&mut self, symbol: &str, bus: &mut EventBus<'_>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_sorts_last() {
        let set: BTreeSet<ReadSymbol> = [
            ReadSymbol::Blank,
            ReadSymbol::symbol("b"),
            ReadSymbol::symbol("a"),
        ]
        .into_iter()
        .collect();

        let ordered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["a", "b", "∅"]);
    }

    #[test]
    fn test_action_kind_glyphs() {
        assert_eq!(ActionKind::Move(Direction::Left).to_string(), "⇐");
        assert_eq!(ActionKind::Move(Direction::Down).to_string(), "⇓");
        assert_eq!(ActionKind::Write(ReadSymbol::symbol("1")).to_string(), "1");
        assert_eq!(ActionKind::Write(ReadSymbol::Blank).to_string(), "∅");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(StateId::new(3).to_string(), "state#3");
        assert_eq!(
            HeadRef::new(TapeId::new(1), 2).to_string(),
            "tape#1/head#2"
        );
    }

    #[test]
    fn test_read_symbol_from_option() {
        assert_eq!(ReadSymbol::from(None), ReadSymbol::Blank);
        assert_eq!(
            ReadSymbol::from(Some("x".to_string())).as_symbol(),
            Some("x")
        );
    }
}
