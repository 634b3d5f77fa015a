//! Scripted editing sessions.
//!
//! A [`Scenario`] is an ordered list of [`Step`]s, each one a user gesture
//! or edit intent. Replaying it drives an [`Editor`] exactly like
//! interactive use would. States are referred to by their displayed name,
//! tapes and transitions by a name given when the scenario creates them.
//!
//! ```toml
//! [[step]]
//! op = "tape"
//! name = "main"
//!
//! [[step]]
//! op = "head"
//! tape = "main"
//!
//! [[step]]
//! op = "state"
//! name = "q0"
//! x = 0.0
//! y = 0.0
//!
//! [[step]]
//! op = "connect"
//! name = "t"
//! from = "q0"
//! to = "q0"
//!
//! [[step]]
//! op = "action"
//! transition = "t"
//! tape = "main"
//! head = 0
//! action = { move = "right" }
//! ```

use std::collections::HashMap;

use log::{debug, info};
use serde::Deserialize;

use tapeloom_core::{color::Color, geometry::Point};

use crate::{
    diagram::{EdgeId, NodeId},
    editor::Editor,
    error::TapeloomError,
    model::{ActionKind, AutomatonModel, Direction, HeadRef, ReadSymbol, TapeId, TransitionId},
};

/// What an `action` step does to its head.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpec {
    Move(Direction),
    Write(String),
    WriteBlank,
}

impl From<&ActionSpec> for ActionKind {
    fn from(spec: &ActionSpec) -> Self {
        match spec {
            ActionSpec::Move(direction) => Self::Move(*direction),
            ActionSpec::Write(symbol) => Self::Write(ReadSymbol::symbol(symbol.as_str())),
            ActionSpec::WriteBlank => Self::Write(ReadSymbol::Blank),
        }
    }
}

/// One scripted gesture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tape {
        name: String,
    },
    RemoveTape {
        tape: String,
    },
    Head {
        tape: String,
        #[serde(default)]
        color: Option<Color>,
    },
    RemoveHead {
        tape: String,
        head: usize,
    },
    HeadColor {
        tape: String,
        head: usize,
        color: Color,
    },
    Symbol {
        symbol: String,
    },
    EditSymbol {
        previous: String,
        symbol: String,
    },
    RemoveSymbol {
        symbol: String,
    },
    State {
        #[serde(default)]
        name: Option<String>,
        x: f32,
        y: f32,
    },
    RemoveState {
        state: String,
    },
    Rename {
        state: String,
        name: String,
    },
    Move {
        state: String,
        x: f32,
        y: f32,
    },
    ToggleInitial {
        state: String,
    },
    ToggleFinal {
        state: String,
    },
    ToggleAccepting {
        state: String,
    },
    Connect {
        #[serde(default)]
        name: Option<String>,
        from: String,
        to: String,
        #[serde(default)]
        control1: Option<(f32, f32)>,
        #[serde(default)]
        control2: Option<(f32, f32)>,
    },
    RemoveTransition {
        transition: String,
    },
    Read {
        transition: String,
        tape: String,
        head: usize,
        /// Omitted for the blank symbol.
        #[serde(default)]
        symbol: Option<String>,
    },
    RemoveRead {
        transition: String,
        tape: String,
        head: usize,
        #[serde(default)]
        symbol: Option<String>,
    },
    Action {
        transition: String,
        tape: String,
        head: usize,
        action: ActionSpec,
    },
    RemoveAction {
        transition: String,
        tape: String,
        head: usize,
        action: ActionSpec,
    },
}

/// An ordered list of steps, deserialized from `[[step]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Replays every step against `editor`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`TapeloomError::Edit`] naming the 1-based step that failed:
    /// an unknown name, or an intent the editor or model refused.
    pub fn replay<M: AutomatonModel>(&self, editor: &mut Editor<M>) -> Result<(), TapeloomError> {
        info!(steps = self.steps.len(); "Replaying scenario");
        let mut names = Names::default();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index + 1, op:? = step; "Replaying step");
            names
                .apply(editor, step)
                .map_err(|message| TapeloomError::Edit {
                    step: index + 1,
                    message,
                })?;
        }

        info!(
            nodes = editor.diagram().node_count(),
            edges = editor.diagram().edge_count();
            "Scenario replayed"
        );
        Ok(())
    }
}

/// Names given to tapes and transitions while replaying.
#[derive(Debug, Default)]
struct Names {
    tapes: HashMap<String, TapeId>,
    transitions: HashMap<String, TransitionId>,
}

impl Names {
    fn tape(&self, name: &str) -> Result<TapeId, String> {
        self.tapes
            .get(name)
            .copied()
            .ok_or_else(|| format!("unknown tape `{name}`"))
    }

    fn head(&self, tape: &str, head: usize) -> Result<HeadRef, String> {
        Ok(HeadRef::new(self.tape(tape)?, head))
    }

    fn edge<M: AutomatonModel>(&self, editor: &Editor<M>, name: &str) -> Result<EdgeId, String> {
        let transition = self
            .transitions
            .get(name)
            .ok_or_else(|| format!("unknown transition `{name}`"))?;
        editor
            .diagram()
            .edge_for_transition(*transition)
            .map_err(|_| format!("transition `{name}` is no longer in the diagram"))
    }

    fn node<M: AutomatonModel>(editor: &Editor<M>, name: &str) -> Result<NodeId, String> {
        editor
            .diagram()
            .find_node_by_name(name)
            .ok_or_else(|| format!("unknown state `{name}`"))
    }

    fn apply<M: AutomatonModel>(&mut self, editor: &mut Editor<M>, step: &Step) -> Result<(), String> {
        let refused = |err: crate::error::EditorError<M::Error>| err.to_string();

        match step {
            Step::Tape { name } => {
                let tape = editor.request_add_tape().map_err(refused)?;
                self.tapes.insert(name.clone(), tape);
            }
            Step::RemoveTape { tape } => {
                let id = self.tape(tape)?;
                editor.request_remove_tape(id).map_err(refused)?;
                self.tapes.remove(tape);
            }
            Step::Head { tape, color } => {
                let id = self.tape(tape)?;
                editor.request_add_head(id, *color).map_err(refused)?;
            }
            Step::RemoveHead { tape, head } => {
                let head = self.head(tape, *head)?;
                editor.request_remove_head(head).map_err(refused)?;
            }
            Step::HeadColor { tape, head, color } => {
                let head = self.head(tape, *head)?;
                editor
                    .request_edit_head_color(head, *color)
                    .map_err(refused)?;
            }
            Step::Symbol { symbol } => editor.request_add_symbol(symbol).map_err(refused)?,
            Step::EditSymbol { previous, symbol } => editor
                .request_edit_symbol(previous, symbol)
                .map_err(refused)?,
            Step::RemoveSymbol { symbol } => {
                editor.request_remove_symbol(symbol).map_err(refused)?
            }
            Step::State { name, x, y } => {
                editor
                    .request_add_state(*x, *y, name.as_deref())
                    .map_err(refused)?;
            }
            Step::RemoveState { state } => {
                let node = Self::node(editor, state)?;
                editor.request_remove_state(node).map_err(refused)?;
            }
            Step::Rename { state, name } => {
                let node = Self::node(editor, state)?;
                editor.request_rename_state(node, name).map_err(refused)?;
            }
            Step::Move { state, x, y } => {
                let node = Self::node(editor, state)?;
                editor
                    .drag_node(node, Point::new(*x, *y))
                    .map_err(refused)?;
            }
            Step::ToggleInitial { state } => {
                let node = Self::node(editor, state)?;
                editor.request_toggle_initial(node).map_err(refused)?;
            }
            Step::ToggleFinal { state } => {
                let node = Self::node(editor, state)?;
                editor.request_toggle_final(node).map_err(refused)?;
            }
            Step::ToggleAccepting { state } => {
                let node = Self::node(editor, state)?;
                editor.request_toggle_accepting(node).map_err(refused)?;
            }
            Step::Connect {
                name,
                from,
                to,
                control1,
                control2,
            } => {
                let source = Self::node(editor, from)?;
                let target = Self::node(editor, to)?;
                let transition = editor
                    .request_connect(
                        source,
                        target,
                        control1.map(Point::from),
                        control2.map(Point::from),
                    )
                    .map_err(refused)?;
                if let Some(name) = name {
                    self.transitions.insert(name.clone(), transition);
                }
            }
            Step::RemoveTransition { transition } => {
                let edge = self.edge(editor, transition)?;
                editor.request_remove_transition(edge).map_err(refused)?;
                self.transitions.remove(transition);
            }
            Step::Read {
                transition,
                tape,
                head,
                symbol,
            } => {
                let edge = self.edge(editor, transition)?;
                let head = self.head(tape, *head)?;
                editor
                    .request_add_read_symbol(edge, head, ReadSymbol::from(symbol.clone()))
                    .map_err(refused)?;
            }
            Step::RemoveRead {
                transition,
                tape,
                head,
                symbol,
            } => {
                let edge = self.edge(editor, transition)?;
                let head = self.head(tape, *head)?;
                editor
                    .request_remove_read_symbol(edge, head, ReadSymbol::from(symbol.clone()))
                    .map_err(refused)?;
            }
            Step::Action {
                transition,
                tape,
                head,
                action,
            } => {
                let edge = self.edge(editor, transition)?;
                let head = self.head(tape, *head)?;
                editor
                    .request_add_action(edge, head, action.into())
                    .map_err(refused)?;
            }
            Step::RemoveAction {
                transition,
                tape,
                head,
                action,
            } => {
                let edge = self.edge(editor, transition)?;
                let head = self.head(tape, *head)?;
                editor
                    .request_remove_action(edge, head, action.into())
                    .map_err(refused)?;
            }
        }
        Ok(())
    }
}
