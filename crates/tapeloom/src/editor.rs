//! Edit intents: the only way user gestures reach the model.
//!
//! An [`Editor`] owns a model and its [`Diagram`]. Each intent resolves the
//! diagram elements it names to model ids, stashes any view-only creation
//! parameters in a [`PendingCreation`], and calls exactly one model mutator
//! through a fresh [`EventBus`] with the diagram subscribed. The diagram is
//! therefore updated by the model's own notifications before the intent
//! returns.
//!
//! Intents validate nothing about the automaton itself: rejections come from
//! the model and are returned unchanged as [`EditorError::Model`]. A
//! [`ConsistencyError`] raised while the diagram handles a notification
//! poisons the editor, and every later intent fails with
//! [`EditorError::Poisoned`].

use std::collections::BTreeSet;

use log::{debug, error, info, warn};

use tapeloom_core::{color::Color, geometry::Point};

use crate::{
    bus::EventBus,
    diagram::{Diagram, EdgeId, NodeId, Selection, naming},
    error::{ConsistencyError, EditorError},
    model::{ActionKind, AutomatonModel, HeadRef, ReadSymbol, StateId, TapeId, TransitionId},
    pending::PendingCreation,
};

/// Zoom change of one zoom step.
pub const ZOOM_STEP: f32 = 0.1;

/// Smallest zoom factor.
pub const MIN_ZOOM: f32 = 0.3;

/// Pan offset and zoom factor mapping screen points onto the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    offset: Point,
    zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&mut self, delta: Point) {
        self.offset = self.offset.add_point(delta);
    }

    pub fn zoom_in(&mut self) {
        self.zoom += ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Maps a screen point to diagram coordinates.
    pub fn to_diagram(&self, screen: Point) -> Point {
        screen.sub_point(self.offset).scale(1.0 / self.zoom)
    }

    /// Maps a diagram point to screen coordinates.
    pub fn to_screen(&self, point: Point) -> Point {
        point.scale(self.zoom).add_point(self.offset)
    }
}

/// Shorthand for the result of an intent on model `M`.
pub type EditResult<T, M> = Result<T, EditorError<<M as AutomatonModel>::Error>>;

/// A model together with the diagram mirroring it.
#[derive(Debug)]
pub struct Editor<M: AutomatonModel> {
    model: M,
    diagram: Diagram,
    viewport: Viewport,
    busy: bool,
    poisoned: Option<ConsistencyError>,
}

impl<M: AutomatonModel + Default> Default for Editor<M> {
    fn default() -> Self {
        Self::new(M::default(), Diagram::default())
    }
}

impl<M: AutomatonModel> Editor<M> {
    /// Wraps a model and a diagram already mirroring it.
    pub fn new(model: M, diagram: Diagram) -> Self {
        Self {
            model,
            diagram,
            viewport: Viewport::default(),
            busy: false,
            poisoned: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks an animation as running. While busy, every intent and gesture
    /// is refused with [`EditorError::Busy`].
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// The consistency failure that stopped this session, if any.
    pub fn poisoned(&self) -> Option<&ConsistencyError> {
        self.poisoned.as_ref()
    }

    fn check_ready(&self) -> EditResult<(), M> {
        if let Some(err) = &self.poisoned {
            return Err(EditorError::Poisoned(err.clone()));
        }
        if self.busy {
            warn!("Edit refused while busy");
            return Err(EditorError::Busy);
        }
        Ok(())
    }

    /// Calls one model mutator with the diagram listening.
    fn dispatch<T>(
        &mut self,
        pending: PendingCreation,
        call: impl FnOnce(&mut M, &mut EventBus<'_>) -> Result<T, M::Error>,
    ) -> EditResult<T, M> {
        self.check_ready()?;

        let model = &mut self.model;
        let diagram = &mut self.diagram;
        let mut bus = EventBus::new(pending);
        bus.subscribe(diagram);
        let result = call(model, &mut bus);

        match bus.finish() {
            Ok(leftover) => {
                if !leftover.is_empty() {
                    warn!(leftover:?; "Unconsumed creation parameters dropped");
                }
            }
            Err(err) => return Err(self.poison(err)),
        }

        result.map_err(EditorError::Model)
    }

    fn poison(&mut self, err: ConsistencyError) -> EditorError<M::Error> {
        error!(err:err; "Diagram out of sync with model, session stopped");
        self.poisoned = Some(err.clone());
        EditorError::Consistency(err)
    }

    fn free_state_name(&self) -> String {
        let taken = self.model.state_names();
        naming::first_free_name(|name| {
            taken.iter().any(|existing| existing == name)
                || self.diagram.find_node_by_name(name).is_some()
        })
    }

    fn state_of(&self, node: NodeId) -> EditResult<StateId, M> {
        self.diagram
            .state_for_node(node)
            .map_err(|_| EditorError::UnknownElement(node.to_string()))
    }

    fn transition_of(&self, edge: EdgeId) -> EditResult<TransitionId, M> {
        self.diagram
            .transition_for_edge(edge)
            .map_err(|_| EditorError::UnknownElement(edge.to_string()))
    }

    /// Adds a state whose node lands on the grid cell containing `(x, y)`,
    /// in diagram coordinates.
    ///
    /// Without a `name`, the first sequence name unused by both the model and
    /// the diagram is passed to the model.
    pub fn request_add_state(&mut self, x: f32, y: f32, name: Option<&str>) -> EditResult<StateId, M> {
        let position = Point::new(x, y);
        let name = match name {
            Some(name) => name.to_string(),
            None => self.free_state_name(),
        };
        let state = self.dispatch(PendingCreation::for_state(position), |model, bus| {
            model.add_state(Some(&name), bus)
        })?;
        info!(state:%, x, y; "State added");
        Ok(state)
    }

    /// Adds a state at a screen position, mapped through the viewport.
    pub fn request_add_state_at_screen(
        &mut self,
        screen: Point,
        name: Option<&str>,
    ) -> EditResult<StateId, M> {
        let position = self.viewport.to_diagram(screen);
        self.request_add_state(position.x(), position.y(), name)
    }

    pub fn request_remove_state(&mut self, node: NodeId) -> EditResult<(), M> {
        let state = self.state_of(node)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_state(state, bus)
        })?;
        info!(state:%; "State removed");
        Ok(())
    }

    pub fn request_rename_state(&mut self, node: NodeId, name: &str) -> EditResult<(), M> {
        let state = self.state_of(node)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.rename_state(state, name, bus)
        })?;
        info!(state:%, name; "State renamed");
        Ok(())
    }

    /// Connects two nodes. Missing control points, in diagram coordinates,
    /// are derived from the node positions.
    pub fn request_connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        control1: Option<Point>,
        control2: Option<Point>,
    ) -> EditResult<TransitionId, M> {
        let input = self.state_of(source)?;
        let output = self.state_of(target)?;
        let transition = self.dispatch(
            PendingCreation::for_transition(control1, control2),
            |model, bus| model.add_transition(input, output, bus),
        )?;
        info!(transition:%, input:%, output:%; "Transition added");
        Ok(transition)
    }

    pub fn request_remove_transition(&mut self, edge: EdgeId) -> EditResult<(), M> {
        let transition = self.transition_of(edge)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_transition(transition, bus)
        })?;
        info!(transition:%; "Transition removed");
        Ok(())
    }

    pub fn request_toggle_final(&mut self, node: NodeId) -> EditResult<(), M> {
        let state = self.state_of(node)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.toggle_final(state, bus)
        })
    }

    pub fn request_toggle_accepting(&mut self, node: NodeId) -> EditResult<(), M> {
        let state = self.state_of(node)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.toggle_accepting(state, bus)
        })
    }

    pub fn request_toggle_initial(&mut self, node: NodeId) -> EditResult<(), M> {
        let state = self.state_of(node)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.toggle_initial(state, bus)
        })
    }

    pub fn request_add_read_symbol(
        &mut self,
        edge: EdgeId,
        head: HeadRef,
        symbol: ReadSymbol,
    ) -> EditResult<(), M> {
        let transition = self.transition_of(edge)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.add_read_symbol(transition, head, symbol, bus)
        })
    }

    pub fn request_remove_read_symbol(
        &mut self,
        edge: EdgeId,
        head: HeadRef,
        symbol: ReadSymbol,
    ) -> EditResult<(), M> {
        let transition = self.transition_of(edge)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_read_symbol(transition, head, symbol, bus)
        })
    }

    pub fn request_add_action(
        &mut self,
        edge: EdgeId,
        head: HeadRef,
        kind: ActionKind,
    ) -> EditResult<(), M> {
        let transition = self.transition_of(edge)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.add_action(transition, head, kind, bus)
        })
    }

    pub fn request_remove_action(
        &mut self,
        edge: EdgeId,
        head: HeadRef,
        kind: ActionKind,
    ) -> EditResult<(), M> {
        let transition = self.transition_of(edge)?;
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_action(transition, head, kind, bus)
        })
    }

    pub fn request_add_tape(&mut self) -> EditResult<TapeId, M> {
        let tape = self.dispatch(PendingCreation::new(), |model, bus| model.add_tape(bus))?;
        info!(tape:%; "Tape added");
        Ok(tape)
    }

    pub fn request_remove_tape(&mut self, tape: TapeId) -> EditResult<(), M> {
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_tape(tape, bus)
        })?;
        info!(tape:%; "Tape removed");
        Ok(())
    }

    /// Adds a head to a tape. Without a color, the head gets the first
    /// palette color no other head uses.
    pub fn request_add_head(&mut self, tape: TapeId, color: Option<Color>) -> EditResult<HeadRef, M> {
        self.check_ready()?;
        if let Some(color) = color {
            if self.diagram.is_color_used(&color) {
                return Err(EditorError::ColorTaken(color));
            }
        }
        let index = self.dispatch(PendingCreation::for_head(color), |model, bus| {
            model.add_head(tape, bus)
        })?;
        let head = HeadRef::new(tape, index);
        info!(head:%; "Head added");
        Ok(head)
    }

    pub fn request_remove_head(&mut self, head: HeadRef) -> EditResult<(), M> {
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_head(head, bus)
        })?;
        info!(head:%; "Head removed");
        Ok(())
    }

    /// Changes the color a head is drawn with. The model is not involved.
    pub fn request_edit_head_color(&mut self, head: HeadRef, color: Color) -> EditResult<(), M> {
        self.check_ready()?;
        let current = self
            .diagram
            .head_color(head)
            .map_err(|_| EditorError::UnknownElement(head.to_string()))?;
        if current != color && self.diagram.is_color_used(&color) {
            return Err(EditorError::ColorTaken(color));
        }
        if let Err(err) = self.diagram.recolor_head(head, color) {
            return Err(self.poison(err.into()));
        }
        Ok(())
    }

    pub fn request_add_symbol(&mut self, symbol: &str) -> EditResult<(), M> {
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.add_symbol(symbol, bus)
        })
    }

    pub fn request_edit_symbol(&mut self, previous: &str, symbol: &str) -> EditResult<(), M> {
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.edit_symbol(previous, symbol, bus)
        })
    }

    pub fn request_remove_symbol(&mut self, symbol: &str) -> EditResult<(), M> {
        self.dispatch(PendingCreation::new(), |model, bus| {
            model.remove_symbol(symbol, bus)
        })
    }

    /// Symbols a transition head reacts to, answered by the model.
    pub fn read_symbols(&self, edge: EdgeId, head: HeadRef) -> EditResult<BTreeSet<ReadSymbol>, M> {
        let transition = self.transition_of(edge)?;
        self.model
            .read_symbols(transition, head)
            .ok_or_else(|| EditorError::UnknownElement(head.to_string()))
    }

    /// Moves a node to the grid cell containing `position`.
    pub fn drag_node(&mut self, node: NodeId, position: Point) -> EditResult<(), M> {
        self.check_ready()?;
        if self.diagram.move_node(node, position) {
            Ok(())
        } else {
            Err(EditorError::UnknownElement(node.to_string()))
        }
    }

    pub fn drag_control1(&mut self, edge: EdgeId, point: Point) -> EditResult<(), M> {
        self.check_ready()?;
        if self.diagram.move_control1(edge, point) {
            Ok(())
        } else {
            Err(EditorError::UnknownElement(edge.to_string()))
        }
    }

    pub fn drag_control2(&mut self, edge: EdgeId, point: Point) -> EditResult<(), M> {
        self.check_ready()?;
        if self.diagram.move_control2(edge, point) {
            Ok(())
        } else {
            Err(EditorError::UnknownElement(edge.to_string()))
        }
    }

    pub fn select(&mut self, selection: Option<Selection>) -> EditResult<(), M> {
        self.check_ready()?;
        if self.diagram.select(selection) {
            Ok(())
        } else {
            Err(EditorError::UnknownElement(format!("{selection:?}")))
        }
    }

    pub fn pan(&mut self, delta: Point) -> EditResult<(), M> {
        self.check_ready()?;
        self.viewport.pan(delta);
        Ok(())
    }

    pub fn zoom_in(&mut self) -> EditResult<(), M> {
        self.check_ready()?;
        self.viewport.zoom_in();
        debug!(zoom = self.viewport.zoom(); "Zoomed in");
        Ok(())
    }

    pub fn zoom_out(&mut self) -> EditResult<(), M> {
        self.check_ready()?;
        self.viewport.zoom_out();
        debug!(zoom = self.viewport.zoom(); "Zoomed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;
    use crate::{
        bus::EventBus,
        machine::{Machine, MachineError},
        model::{AutomatonModel, Direction, MachineView},
    };

    fn editor() -> Editor<Machine> {
        Editor::default()
    }

    #[test]
    fn test_add_state_and_connect() {
        let mut editor = editor();
        let a = editor.request_add_state(0.0, 0.0, Some("A")).unwrap();
        let b = editor.request_add_state(100.0, 0.0, Some("B")).unwrap();
        let node_a = editor.diagram().node_for_state(a).unwrap();
        let node_b = editor.diagram().node_for_state(b).unwrap();

        let t = editor.request_connect(node_a, node_b, None, None).unwrap();
        let edge = editor.diagram().edge_for_transition(t).unwrap();
        assert_eq!(editor.diagram().edge(edge).unwrap().source(), node_a);
        assert_eq!(editor.model().transition_endpoints(t), Some((a, b)));
    }

    #[test]
    fn test_model_rejection_leaves_diagram_untouched() {
        let mut editor = editor();
        editor.request_add_state(0.0, 0.0, Some("A")).unwrap();

        let err = editor.request_add_state(50.0, 50.0, Some("A")).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Model(MachineError::DuplicateStateName(_))
        ));
        assert_eq!(editor.diagram().node_count(), 1);
        assert!(editor.poisoned().is_none());
    }

    #[test]
    fn test_unnamed_state_gets_name_known_to_model() {
        let mut editor = editor();
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let node_a = editor.diagram().node_for_state(a).unwrap();
        assert_eq!(editor.model().state_name(a).as_deref(), Some("A"));
        assert_eq!(editor.diagram().node(node_a).unwrap().name(), "A");

        let err = editor
            .request_add_state(100.0, 0.0, Some("A"))
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::Model(MachineError::DuplicateStateName(_))
        ));

        let b = editor.request_add_state(100.0, 0.0, None).unwrap();
        let node_b = editor.diagram().node_for_state(b).unwrap();
        assert_eq!(editor.model().state_name(b).as_deref(), Some("B"));
        assert!(matches!(
            editor.request_rename_state(node_b, "A"),
            Err(EditorError::Model(MachineError::DuplicateStateName(_)))
        ));
        assert_eq!(editor.diagram().node(node_b).unwrap().name(), "B");
    }

    #[test]
    fn test_generated_name_skips_names_taken_by_hand() {
        let mut editor = editor();
        editor.request_add_state(0.0, 0.0, Some("A")).unwrap();
        editor.request_add_state(50.0, 0.0, Some("C")).unwrap();

        let b = editor.request_add_state(100.0, 0.0, None).unwrap();
        let d = editor.request_add_state(150.0, 0.0, None).unwrap();
        assert_eq!(editor.model().state_name(b).as_deref(), Some("B"));
        assert_eq!(editor.model().state_name(d).as_deref(), Some("D"));
    }

    #[test]
    fn test_busy_refuses_intents_and_gestures() {
        let mut editor = editor();
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let node = editor.diagram().node_for_state(a).unwrap();

        editor.set_busy(true);
        assert!(matches!(
            editor.request_add_state(10.0, 10.0, None),
            Err(EditorError::Busy)
        ));
        assert!(matches!(
            editor.drag_node(node, Point::new(40.0, 40.0)),
            Err(EditorError::Busy)
        ));
        assert!(matches!(editor.zoom_in(), Err(EditorError::Busy)));
        assert_eq!(editor.diagram().node_count(), 1);

        editor.set_busy(false);
        editor.drag_node(node, Point::new(44.0, 47.0)).unwrap();
        assert_eq!(
            editor.diagram().node(node).unwrap().position(),
            Point::new(40.0, 40.0)
        );
    }

    #[test]
    fn test_drag_control_points() {
        let mut editor = editor();
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let b = editor.request_add_state(200.0, 0.0, None).unwrap();
        let node_a = editor.diagram().node_for_state(a).unwrap();
        let node_b = editor.diagram().node_for_state(b).unwrap();
        let t = editor.request_connect(node_a, node_b, None, None).unwrap();
        let edge = editor.diagram().edge_for_transition(t).unwrap();

        editor.drag_control1(edge, Point::new(50.0, -60.0)).unwrap();
        editor.drag_control2(edge, Point::new(150.0, -60.0)).unwrap();
        let (c1, c2) = editor.diagram().control_points(edge).unwrap();
        assert!(approx_eq!(f32, c1.x(), 50.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, c1.y(), -60.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, c2.x(), 150.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, c2.y(), -60.0, epsilon = 1e-4));

        editor.set_busy(true);
        assert!(editor.is_busy());
        assert!(matches!(
            editor.drag_control1(edge, Point::new(0.0, 0.0)),
            Err(EditorError::Busy)
        ));
        editor.set_busy(false);
        assert!(matches!(
            editor.drag_control2(EdgeId::new(9), Point::new(0.0, 0.0)),
            Err(EditorError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_unknown_node_is_refused_locally() {
        let mut editor = editor();
        let err = editor.request_toggle_final(NodeId::new(5)).unwrap_err();
        assert!(matches!(err, EditorError::UnknownElement(_)));
        assert!(editor.poisoned().is_none());
    }

    #[test]
    fn test_out_of_sync_model_poisons_session() {
        // The diagram never saw this tape and head.
        let mut machine = Machine::new();
        let mut bus = EventBus::detached();
        let tape = machine.add_tape(&mut bus).unwrap();
        machine.add_head(tape, &mut bus).unwrap();
        drop(bus);

        let mut editor = Editor::new(machine, Diagram::default());
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let node = editor.diagram().node_for_state(a).unwrap();

        let err = editor.request_connect(node, node, None, None).unwrap_err();
        assert!(matches!(err, EditorError::Consistency(_)));
        assert!(editor.poisoned().is_some());

        assert!(matches!(
            editor.request_add_state(0.0, 0.0, None),
            Err(EditorError::Poisoned(_))
        ));
    }

    #[test]
    fn test_add_head_rejects_taken_color() {
        let mut editor = editor();
        let tape = editor.request_add_tape().unwrap();
        let blue = Color::new("blue").unwrap();
        editor.request_add_head(tape, Some(blue)).unwrap();

        assert!(matches!(
            editor.request_add_head(tape, Some(blue)),
            Err(EditorError::ColorTaken(_))
        ));

        // Without a color the first unused palette entry is taken.
        let head = editor.request_add_head(tape, None).unwrap();
        assert_eq!(
            editor.diagram().head_color(head),
            Ok(Color::new("black").unwrap())
        );
        assert!(matches!(
            editor.request_edit_head_color(head, blue),
            Err(EditorError::ColorTaken(_))
        ));
        editor
            .request_edit_head_color(head, Color::new("orange").unwrap())
            .unwrap();
    }

    #[test]
    fn test_head_intents_check_session_before_color() {
        let mut editor = editor();
        let tape = editor.request_add_tape().unwrap();
        let blue = Color::new("blue").unwrap();
        let head = editor.request_add_head(tape, Some(blue)).unwrap();
        let other = editor.request_add_head(tape, None).unwrap();

        editor.set_busy(true);
        assert!(matches!(
            editor.request_add_head(tape, Some(blue)),
            Err(EditorError::Busy)
        ));
        assert!(matches!(
            editor.request_edit_head_color(other, blue),
            Err(EditorError::Busy)
        ));
        editor.set_busy(false);

        // Poison the session through a connect the diagram cannot mirror.
        let mut bus = EventBus::detached();
        let hidden = editor.model.add_tape(&mut bus).unwrap();
        editor.model.add_head(hidden, &mut bus).unwrap();
        drop(bus);
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let node = editor.diagram().node_for_state(a).unwrap();
        assert!(matches!(
            editor.request_connect(node, node, None, None),
            Err(EditorError::Consistency(_))
        ));

        assert!(matches!(
            editor.request_add_head(tape, Some(blue)),
            Err(EditorError::Poisoned(_))
        ));
        assert!(matches!(
            editor.request_edit_head_color(head, Color::new("orange").unwrap()),
            Err(EditorError::Poisoned(_))
        ));
        assert_eq!(editor.diagram().head_color(head), Ok(blue));
    }

    #[test]
    fn test_read_symbols_query() {
        let mut editor = editor();
        let tape = editor.request_add_tape().unwrap();
        let head = editor.request_add_head(tape, None).unwrap();
        editor.request_add_symbol("1").unwrap();
        let a = editor.request_add_state(0.0, 0.0, None).unwrap();
        let node = editor.diagram().node_for_state(a).unwrap();
        let t = editor.request_connect(node, node, None, None).unwrap();
        let edge = editor.diagram().edge_for_transition(t).unwrap();

        editor
            .request_add_read_symbol(edge, head, ReadSymbol::symbol("1"))
            .unwrap();
        editor
            .request_add_action(edge, head, ActionKind::Move(Direction::Left))
            .unwrap();

        editor.set_busy(true);
        let symbols = editor.read_symbols(edge, head).unwrap();
        assert_eq!(symbols.into_iter().collect::<Vec<_>>(), [ReadSymbol::symbol("1")]);
        assert!(matches!(
            editor.read_symbols(edge, HeadRef::new(tape, 4)),
            Err(EditorError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_viewport_zoom_has_floor() {
        let mut viewport = Viewport::default();
        for _ in 0..20 {
            viewport.zoom_out();
        }
        assert!(approx_eq!(f32, viewport.zoom(), MIN_ZOOM));

        viewport.zoom_in();
        assert!(approx_eq!(f32, viewport.zoom(), 0.4, epsilon = 1e-6));
    }

    #[test]
    fn test_screen_position_goes_through_viewport() {
        let mut editor = editor();
        editor.pan(Point::new(100.0, 50.0)).unwrap();

        let state = editor
            .request_add_state_at_screen(Point::new(135.0, 77.0), None)
            .unwrap();
        let node = editor.diagram().node_for_state(state).unwrap();
        assert_eq!(
            editor.diagram().node(node).unwrap().position(),
            Point::new(30.0, 20.0)
        );

        let viewport = editor.viewport();
        assert_eq!(viewport.to_screen(viewport.to_diagram(Point::new(10.0, 10.0))), Point::new(10.0, 10.0));
    }
}
