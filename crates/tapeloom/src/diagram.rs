//! The diagram container: the visual mirror of an automaton model.
//!
//! A [`Diagram`] never creates or destroys an element on its own. Every node
//! and edge exists because the model published a notification for it, and
//! the diagram learned about it as a [`Subscriber`]. Three identity
//! registries tie the two worlds together:
//!
//! - states to nodes,
//! - transitions to edges,
//! - heads to their display colors.
//!
//! Geometry is never cached. Node positions and control offsets are the
//! only stored shape data; anchors, arrowheads and label placement are
//! derived on demand by [`Diagram::edge_geometry`].

mod display;
pub(crate) mod naming;

pub use display::{ActionDisplay, HeadDisplay, TransitionDisplay};

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use tapeloom_core::{
    color::Color,
    curve::{self, ControlOffsets, CurveStyle, EdgeGeometry, Endpoints},
    geometry::Point,
    registry::{Registry, RegistryError},
};

use crate::{
    bus::{Notification, NotificationKind, Subscriber, Subscription},
    error::ConsistencyError,
    model::{Action, HeadRef, MachineView, ReadSymbol, StateId, TapeId, TransitionId},
    pending::PendingCreation,
};

/// Grid pitch used when none is configured.
pub const DEFAULT_GRID_PITCH: f32 = 10.0;

/// Colors handed out, in order, to heads created without an explicit one.
pub const DEFAULT_HEAD_PALETTE: [&str; 9] = [
    "black",
    "blue",
    "blueviolet",
    "brown",
    "cadetblue",
    "chocolate",
    "crimson",
    "darkgray",
    "red",
];

/// Upper bound on generated fallback colors once the palette is used up.
const GENERATED_COLOR_ATTEMPTS: u32 = 4096;

/// Parses [`DEFAULT_HEAD_PALETTE`].
pub fn default_palette() -> Vec<Color> {
    DEFAULT_HEAD_PALETTE
        .iter()
        .filter_map(|name| Color::new(name).ok())
        .collect()
}

macro_rules! diagram_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(raw: u32) -> Self {
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

diagram_id!(
    /// Handle of a diagram node. Issued by the diagram, never reused.
    NodeId,
    "node"
);
diagram_id!(
    /// Handle of a diagram edge. Issued by the diagram, never reused.
    EdgeId,
    "edge"
);

/// The final/accepting tri-state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminal {
    #[default]
    None,
    Final,
    Accepting,
}

impl Terminal {
    fn from_flags(is_final: bool, is_accepting: bool) -> Self {
        match (is_final, is_accepting) {
            (_, true) => Self::Accepting,
            (true, false) => Self::Final,
            (false, false) => Self::None,
        }
    }
}

/// The element currently selected in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Node(NodeId),
    Edge(EdgeId),
}

/// Visual state.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    position: Point,
    name: String,
    initial: bool,
    terminal: Terminal,
    selected: bool,
}

impl DiagramNode {
    /// Center of the node, always on a grid cell corner.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Visual transition.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    source: NodeId,
    target: NodeId,
    controls: ControlOffsets,
    display: TransitionDisplay,
    selected: bool,
}

impl DiagramEdge {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Whether both ends are the same node.
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn controls(&self) -> ControlOffsets {
        self.controls
    }

    pub fn display(&self) -> &TransitionDisplay {
        &self.display
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }
}

/// Every notification kind the diagram reacts to.
///
/// Alphabet additions and removals change nothing visible: removals are
/// preceded by the read-symbol and action removals they imply.
const DIAGRAM_KINDS: &[NotificationKind] = &[
    NotificationKind::StateAdded,
    NotificationKind::StateRemoved,
    NotificationKind::StateRenamed,
    NotificationKind::TransitionAdded,
    NotificationKind::TransitionRemoved,
    NotificationKind::InitialSet,
    NotificationKind::InitialUnset,
    NotificationKind::FinalSet,
    NotificationKind::FinalUnset,
    NotificationKind::AcceptingSet,
    NotificationKind::AcceptingUnset,
    NotificationKind::ReadSymbolAdded,
    NotificationKind::ReadSymbolRemoved,
    NotificationKind::ActionAdded,
    NotificationKind::ActionRemoved,
    NotificationKind::TapeAdded,
    NotificationKind::TapeRemoved,
    NotificationKind::HeadAdded,
    NotificationKind::HeadRemoved,
    NotificationKind::SymbolEdited,
];

/// The diagram container.
#[derive(Debug, Clone)]
pub struct Diagram {
    style: CurveStyle,
    grid_pitch: f32,
    palette: Vec<Color>,
    nodes: IndexMap<NodeId, DiagramNode>,
    edges: IndexMap<EdgeId, DiagramEdge>,
    states: Registry<StateId, NodeId>,
    transitions: Registry<TransitionId, EdgeId>,
    head_colors: Registry<HeadRef, Color>,
    selection: Option<Selection>,
    next_node: u32,
    next_edge: u32,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(CurveStyle::default(), DEFAULT_GRID_PITCH, default_palette())
    }
}

impl Diagram {
    pub fn new(style: CurveStyle, grid_pitch: f32, palette: Vec<Color>) -> Self {
        Self {
            style,
            grid_pitch,
            palette,
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            states: Registry::new(),
            transitions: Registry::new(),
            head_colors: Registry::new(),
            selection: None,
            next_node: 0,
            next_edge: 0,
        }
    }

    pub fn style(&self) -> &CurveStyle {
        &self.style
    }

    pub fn grid_pitch(&self) -> f32 {
        self.grid_pitch
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DiagramNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &DiagramEdge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    pub fn node(&self, node: NodeId) -> Option<&DiagramNode> {
        self.nodes.get(&node)
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&DiagramEdge> {
        self.edges.get(&edge)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_for_state(&self, state: StateId) -> Result<NodeId, RegistryError> {
        self.states.by_key(&state).copied()
    }

    pub fn state_for_node(&self, node: NodeId) -> Result<StateId, RegistryError> {
        self.states.by_value(&node).copied()
    }

    pub fn edge_for_transition(&self, transition: TransitionId) -> Result<EdgeId, RegistryError> {
        self.transitions.by_key(&transition).copied()
    }

    pub fn transition_for_edge(&self, edge: EdgeId) -> Result<TransitionId, RegistryError> {
        self.transitions.by_value(&edge).copied()
    }

    pub fn head_color(&self, head: HeadRef) -> Result<Color, RegistryError> {
        self.head_colors.by_key(&head).copied()
    }

    /// Whether some head already displays `color`.
    pub fn is_color_used(&self, color: &Color) -> bool {
        self.head_colors.contains_value(color)
    }

    /// Every head with its color, ordered by tape and index.
    pub fn heads(&self) -> Vec<(HeadRef, Color)> {
        let mut heads: Vec<(HeadRef, Color)> = self
            .head_colors
            .iter()
            .map(|(head, color)| (*head, *color))
            .collect();
        heads.sort_by_key(|(head, _)| *head);
        heads
    }

    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Node centers an edge connects. Self-loops are recognized by identity.
    pub fn endpoints(&self, edge: EdgeId) -> Option<Endpoints> {
        let edge = self.edges.get(&edge)?;
        let source = self.nodes.get(&edge.source)?.position;
        if edge.is_loop() {
            return Some(Endpoints::looping(source));
        }
        let target = self.nodes.get(&edge.target)?.position;
        Some(Endpoints::between(source, target))
    }

    /// Derives the current curve, arrowhead and label placement of an edge.
    pub fn edge_geometry(&self, edge: EdgeId) -> Option<EdgeGeometry> {
        let endpoints = self.endpoints(edge)?;
        let controls = self.edges.get(&edge)?.controls;
        Some(curve::edge_geometry(endpoints, controls, &self.style))
    }

    /// Both control points of an edge in diagram coordinates.
    pub fn control_points(&self, edge: EdgeId) -> Option<(Point, Point)> {
        let endpoints = self.endpoints(edge)?;
        Some(self.edges.get(&edge)?.controls.to_absolute(endpoints))
    }

    /// Moves a node to the grid cell containing `position`. Its control
    /// points move along with it.
    pub(crate) fn move_node(&mut self, node: NodeId, position: Point) -> bool {
        let snapped = position.snap_to_grid(self.grid_pitch);
        match self.nodes.get_mut(&node) {
            Some(entry) => {
                entry.position = snapped;
                debug!(node:%, x = snapped.x(), y = snapped.y(); "Node moved");
                true
            }
            None => false,
        }
    }

    pub(crate) fn move_control1(&mut self, edge: EdgeId, point: Point) -> bool {
        self.move_control(edge, |controls, endpoints| {
            controls.with_control1_at(endpoints, point)
        })
    }

    pub(crate) fn move_control2(&mut self, edge: EdgeId, point: Point) -> bool {
        self.move_control(edge, |controls, endpoints| {
            controls.with_control2_at(endpoints, point)
        })
    }

    fn move_control(
        &mut self,
        edge: EdgeId,
        update: impl FnOnce(ControlOffsets, Endpoints) -> ControlOffsets,
    ) -> bool {
        let Some(endpoints) = self.endpoints(edge) else {
            return false;
        };
        match self.edges.get_mut(&edge) {
            Some(entry) => {
                entry.controls = update(entry.controls, endpoints);
                debug!(edge:%; "Control point moved");
                true
            }
            None => false,
        }
    }

    /// Replaces the selection. Returns `false`, leaving the selection
    /// untouched, if the element does not exist.
    pub(crate) fn select(&mut self, selection: Option<Selection>) -> bool {
        let exists = match selection {
            Some(Selection::Node(node)) => self.nodes.contains_key(&node),
            Some(Selection::Edge(edge)) => self.edges.contains_key(&edge),
            None => true,
        };
        if !exists {
            return false;
        }

        self.set_selected(self.selection, false);
        self.set_selected(selection, true);
        self.selection = selection;
        true
    }

    fn set_selected(&mut self, selection: Option<Selection>, selected: bool) {
        match selection {
            Some(Selection::Node(node)) => {
                if let Some(entry) = self.nodes.get_mut(&node) {
                    entry.selected = selected;
                }
            }
            Some(Selection::Edge(edge)) => {
                if let Some(entry) = self.edges.get_mut(&edge) {
                    entry.selected = selected;
                }
            }
            None => {}
        }
    }

    /// Rebinds a head to another color and repaints every display.
    pub(crate) fn recolor_head(&mut self, head: HeadRef, color: Color) -> Result<(), RegistryError> {
        let current = self.head_color(head)?;
        if current == color {
            return Ok(());
        }
        if self.head_colors.contains_value(&color) {
            return Err(RegistryError::DuplicateBinding(format!("{color:?}")));
        }

        self.head_colors.remove(&head)?;
        self.head_colors.put(head, color)?;
        for edge in self.edges.values_mut() {
            edge.display.recolor_head(head, color);
        }
        debug!(head:%, color:%; "Head recolored");
        Ok(())
    }

    fn allocate_node(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;
        id
    }

    fn allocate_edge(&mut self) -> EdgeId {
        let id = EdgeId::new(self.next_edge);
        self.next_edge += 1;
        id
    }

    fn node_mut_for(&mut self, state: StateId) -> Result<&mut DiagramNode, ConsistencyError> {
        let node = *self.states.by_key(&state)?;
        self.nodes
            .get_mut(&node)
            .ok_or(ConsistencyError::MissingNode(node))
    }

    fn display_mut_for(
        &mut self,
        transition: TransitionId,
    ) -> Result<&mut TransitionDisplay, ConsistencyError> {
        let edge = *self.transitions.by_key(&transition)?;
        self.edges
            .get_mut(&edge)
            .map(|entry| &mut entry.display)
            .ok_or(ConsistencyError::MissingEdge(edge))
    }

    /// Applies `apply` to every display, failing on the first edge it
    /// reports as inconsistent.
    fn update_displays(
        &mut self,
        mut apply: impl FnMut(&mut TransitionDisplay) -> bool,
        failure: impl Fn(TransitionId) -> ConsistencyError,
    ) -> Result<(), ConsistencyError> {
        for (edge, entry) in self.edges.iter_mut() {
            if !apply(&mut entry.display) {
                let transition = *self.transitions.by_value(edge)?;
                return Err(failure(transition));
            }
        }
        Ok(())
    }

    /// Picks the color of a head created without an explicit one: the
    /// first unused palette entry, then generated colors.
    fn next_head_color(&self) -> Option<Color> {
        let unused = |color: &Color| !self.head_colors.contains_value(color);
        self.palette.iter().copied().find(unused).or_else(|| {
            (0..GENERATED_COLOR_ATTEMPTS)
                .filter_map(|k| {
                    let css = format!(
                        "rgb({}, {}, {})",
                        (k * 67) % 256,
                        (k * 139 + 40) % 256,
                        (k * 199 + 80) % 256
                    );
                    Color::new(&css).ok()
                })
                .find(unused)
        })
    }

    fn on_state_added(
        &mut self,
        state: StateId,
        model: &dyn MachineView,
        pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError> {
        let position = pending
            .take_position()
            .unwrap_or_default()
            .snap_to_grid(self.grid_pitch);
        let name = model.state_name(state).unwrap_or_else(|| {
            naming::first_free_name(|name| self.nodes.values().any(|node| node.name == name))
        });

        let node = self.allocate_node();
        self.states.put(state, node)?;
        self.nodes.insert(
            node,
            DiagramNode {
                position,
                name,
                initial: model.is_initial(state),
                terminal: Terminal::from_flags(model.is_final(state), model.is_accepting(state)),
                selected: false,
            },
        );

        debug!(state:%, node:%, x = position.x(), y = position.y(); "Node created");
        Ok(())
    }

    fn on_state_removed(&mut self, state: StateId) -> Result<(), ConsistencyError> {
        let node = *self.states.by_key(&state)?;
        let count = self
            .edges
            .values()
            .filter(|edge| edge.source == node || edge.target == node)
            .count();
        if count > 0 {
            return Err(ConsistencyError::DanglingEdges { state, count });
        }

        self.states.remove(&state)?;
        self.nodes
            .shift_remove(&node)
            .ok_or(ConsistencyError::MissingNode(node))?;
        if self.selection == Some(Selection::Node(node)) {
            self.selection = None;
        }

        debug!(state:%, node:%; "Node destroyed");
        Ok(())
    }

    fn on_state_renamed(
        &mut self,
        state: StateId,
        model: &dyn MachineView,
    ) -> Result<(), ConsistencyError> {
        let name = model.state_name(state);
        let node = self.node_mut_for(state)?;
        if let Some(name) = name {
            node.name = name;
        }
        Ok(())
    }

    fn on_transition_added(
        &mut self,
        transition: TransitionId,
        input: StateId,
        output: StateId,
        model: &dyn MachineView,
        pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError> {
        let source = *self.states.by_key(&input)?;
        let target = *self.states.by_key(&output)?;
        let source_center = self
            .nodes
            .get(&source)
            .ok_or(ConsistencyError::MissingNode(source))?
            .position;
        let target_center = self
            .nodes
            .get(&target)
            .ok_or(ConsistencyError::MissingNode(target))?
            .position;
        let endpoints = if source == target {
            Endpoints::looping(source_center)
        } else {
            Endpoints::between(source_center, target_center)
        };

        let (default1, default2) =
            curve::default_controls(endpoints, &self.style).to_absolute(endpoints);
        let (control1, control2) = pending.take_controls();
        let controls = ControlOffsets::from_absolute(
            endpoints,
            control1.unwrap_or(default1),
            control2.unwrap_or(default2),
        );

        let display = self.replicate_display(transition, model)?;

        let edge = self.allocate_edge();
        self.transitions.put(transition, edge)?;
        self.edges.insert(
            edge,
            DiagramEdge {
                source,
                target,
                controls,
                display,
                selected: false,
            },
        );

        debug!(transition:%, edge:%, source:%, target:%; "Edge created");
        Ok(())
    }

    /// Builds a display holding every tape and head the model has now,
    /// with whatever payload the transition already carries.
    fn replicate_display(
        &self,
        transition: TransitionId,
        model: &dyn MachineView,
    ) -> Result<TransitionDisplay, ConsistencyError> {
        let mut display = TransitionDisplay::new();
        for (tape, count) in model.tapes() {
            display.add_tape(tape);
            for index in 0..count {
                let head = HeadRef::new(tape, index);
                display.add_head(head, self.head_color(head)?);
                for symbol in model.read_symbols(transition, head).unwrap_or_default() {
                    display.add_read_symbol(head, symbol);
                }
            }
        }
        for action in model.actions(transition) {
            let color = self.head_color(action.head())?;
            display.push_action(ActionDisplay::new(
                action.head(),
                color,
                action.kind().clone(),
            ));
        }
        Ok(display)
    }

    fn on_transition_removed(&mut self, transition: TransitionId) -> Result<(), ConsistencyError> {
        let edge = self.transitions.remove(&transition)?;
        self.edges
            .shift_remove(&edge)
            .ok_or(ConsistencyError::MissingEdge(edge))?;
        if self.selection == Some(Selection::Edge(edge)) {
            self.selection = None;
        }

        debug!(transition:%, edge:%; "Edge destroyed");
        Ok(())
    }

    fn on_read_symbol_added(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: &ReadSymbol,
    ) -> Result<(), ConsistencyError> {
        if self
            .display_mut_for(transition)?
            .add_read_symbol(head, symbol.clone())
        {
            Ok(())
        } else {
            Err(ConsistencyError::UnknownHead { transition, head })
        }
    }

    fn on_read_symbol_removed(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: &ReadSymbol,
    ) -> Result<(), ConsistencyError> {
        if self
            .display_mut_for(transition)?
            .remove_read_symbol(head, symbol)
        {
            Ok(())
        } else {
            Err(ConsistencyError::UnknownHead { transition, head })
        }
    }

    fn on_action_added(
        &mut self,
        transition: TransitionId,
        action: &Action,
        model: &dyn MachineView,
    ) -> Result<(), ConsistencyError> {
        let color = self.head_color(action.head())?;
        let display = self.display_mut_for(transition)?;
        display.push_action(ActionDisplay::new(
            action.head(),
            color,
            action.kind().clone(),
        ));
        check_actions(transition, display, model)
    }

    fn on_action_removed(
        &mut self,
        transition: TransitionId,
        index: usize,
        model: &dyn MachineView,
    ) -> Result<(), ConsistencyError> {
        let display = self.display_mut_for(transition)?;
        display
            .remove_action(index)
            .ok_or(ConsistencyError::UnknownAction { transition, index })?;
        check_actions(transition, display, model)
    }

    fn on_tape_added(&mut self, tape: TapeId) -> Result<(), ConsistencyError> {
        for edge in self.edges.values_mut() {
            edge.display.add_tape(tape);
        }
        Ok(())
    }

    fn on_tape_removed(&mut self, tape: TapeId) -> Result<(), ConsistencyError> {
        self.update_displays(
            |display| display.remove_tape(tape),
            |transition| ConsistencyError::UnknownTape { transition, tape },
        )
    }

    fn on_head_added(
        &mut self,
        head: HeadRef,
        pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError> {
        let color = pending
            .take_head_color()
            .or_else(|| self.next_head_color())
            .ok_or(ConsistencyError::NoHeadColor(head))?;
        self.head_colors.put(head, color)?;

        self.update_displays(
            |display| display.add_head(head, color),
            |transition| ConsistencyError::UnknownHead { transition, head },
        )?;

        debug!(head:%, color:%; "Head color bound");
        Ok(())
    }

    /// Unbinds the head's color and shifts the bindings of the later heads
    /// on the same tape down by one.
    fn on_head_removed(&mut self, head: HeadRef) -> Result<(), ConsistencyError> {
        self.head_colors.remove(&head)?;

        let mut shifted: Vec<(HeadRef, Color)> = self
            .head_colors
            .iter()
            .filter(|(h, _)| h.tape() == head.tape() && h.head() > head.head())
            .map(|(h, color)| (*h, *color))
            .collect();
        shifted.sort_by_key(|(h, _)| *h);
        for (h, color) in shifted {
            self.head_colors.remove(&h)?;
            self.head_colors
                .put(HeadRef::new(h.tape(), h.head() - 1), color)?;
        }

        self.update_displays(
            |display| display.remove_head(head),
            |transition| ConsistencyError::UnknownHead { transition, head },
        )?;

        debug!(head:%; "Head color unbound");
        Ok(())
    }

    fn on_symbol_edited(&mut self, previous: &str, symbol: &str) -> Result<(), ConsistencyError> {
        for edge in self.edges.values_mut() {
            edge.display.rename_symbol(previous, symbol);
        }
        Ok(())
    }
}

/// Compares the actions a display shows with the model's, by head and kind.
fn check_actions(
    transition: TransitionId,
    display: &TransitionDisplay,
    model: &dyn MachineView,
) -> Result<(), ConsistencyError> {
    let expected = model.actions(transition);
    let displayed = display.actions();
    let matches = displayed.len() == expected.len()
        && displayed
            .iter()
            .zip(&expected)
            .all(|(shown, action)| shown.head() == action.head() && shown.kind() == action.kind());
    if matches {
        Ok(())
    } else {
        Err(ConsistencyError::ActionsOutOfSync {
            transition,
            displayed: displayed.len(),
            expected: expected.len(),
        })
    }
}

impl Subscriber for Diagram {
    fn subscription(&self) -> Subscription {
        Subscription::new(DIAGRAM_KINDS)
    }

    fn on_notification(
        &mut self,
        notification: &Notification,
        model: &dyn MachineView,
        pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError> {
        trace!(notification:?; "Diagram handling notification");
        match notification {
            Notification::StateAdded { state } => self.on_state_added(*state, model, pending),
            Notification::StateRemoved { state } => self.on_state_removed(*state),
            Notification::StateRenamed { state } => self.on_state_renamed(*state, model),
            Notification::TransitionAdded {
                transition,
                input,
                output,
            } => self.on_transition_added(*transition, *input, *output, model, pending),
            Notification::TransitionRemoved { transition } => {
                self.on_transition_removed(*transition)
            }
            Notification::InitialSet { state } => {
                self.node_mut_for(*state)?.initial = true;
                Ok(())
            }
            Notification::InitialUnset { state } => {
                self.node_mut_for(*state)?.initial = false;
                Ok(())
            }
            Notification::FinalSet { state } => {
                let node = self.node_mut_for(*state)?;
                if node.terminal == Terminal::None {
                    node.terminal = Terminal::Final;
                }
                Ok(())
            }
            Notification::FinalUnset { state } => {
                self.node_mut_for(*state)?.terminal = Terminal::None;
                Ok(())
            }
            Notification::AcceptingSet { state } => {
                self.node_mut_for(*state)?.terminal = Terminal::Accepting;
                Ok(())
            }
            Notification::AcceptingUnset { state } => {
                let node = self.node_mut_for(*state)?;
                if node.terminal == Terminal::Accepting {
                    node.terminal = Terminal::Final;
                }
                Ok(())
            }
            Notification::ReadSymbolAdded {
                transition,
                head,
                symbol,
            } => self.on_read_symbol_added(*transition, *head, symbol),
            Notification::ReadSymbolRemoved {
                transition,
                head,
                symbol,
            } => self.on_read_symbol_removed(*transition, *head, symbol),
            Notification::ActionAdded { transition, action } => {
                self.on_action_added(*transition, action, model)
            }
            Notification::ActionRemoved { transition, index } => {
                self.on_action_removed(*transition, *index, model)
            }
            Notification::TapeAdded { tape } => self.on_tape_added(*tape),
            Notification::TapeRemoved { tape } => self.on_tape_removed(*tape),
            Notification::HeadAdded { head } => self.on_head_added(*head, pending),
            Notification::HeadRemoved { head } => self.on_head_removed(*head),
            Notification::SymbolEdited { previous, symbol } => {
                self.on_symbol_edited(previous, symbol)
            }
            Notification::SymbolAdded { .. } | Notification::SymbolRemoved { .. } => Ok(()),
        }
    }
}
