//! Per-edge mirror of a transition's payload, kept for rendering only.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use tapeloom_core::color::Color;

use crate::model::{ActionKind, BLANK_GLYPH, HeadRef, ReadSymbol, TapeId};

/// What one head of one transition reacts to.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadDisplay {
    color: Color,
    symbols: BTreeSet<ReadSymbol>,
}

impl HeadDisplay {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            symbols: BTreeSet::new(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn symbols(&self) -> &BTreeSet<ReadSymbol> {
        &self.symbols
    }

    /// Symbols joined with `|`, or the blank placeholder when there are
    /// none.
    pub fn label(&self) -> String {
        if self.symbols.is_empty() {
            return BLANK_GLYPH.to_string();
        }
        self.symbols
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// One entry of the displayed action list.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDisplay {
    head: HeadRef,
    color: Color,
    kind: ActionKind,
}

impl ActionDisplay {
    pub fn new(head: HeadRef, color: Color, kind: ActionKind) -> Self {
        Self { head, color, kind }
    }

    pub fn head(&self) -> HeadRef {
        self.head
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn glyph(&self) -> String {
        self.kind.to_string()
    }
}

/// Read symbols per tape and head, plus the ordered action list.
///
/// Heads are stored positionally, so removing one shifts the later heads of
/// the same tape exactly like the model does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionDisplay {
    tapes: IndexMap<TapeId, Vec<HeadDisplay>>,
    actions: Vec<ActionDisplay>,
}

impl TransitionDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tapes(&self) -> impl Iterator<Item = (TapeId, &[HeadDisplay])> {
        self.tapes.iter().map(|(tape, heads)| (*tape, heads.as_slice()))
    }

    pub fn head(&self, head: HeadRef) -> Option<&HeadDisplay> {
        self.tapes.get(&head.tape())?.get(head.head())
    }

    pub fn read_symbols(&self, head: HeadRef) -> Option<&BTreeSet<ReadSymbol>> {
        self.head(head).map(HeadDisplay::symbols)
    }

    pub fn actions(&self) -> &[ActionDisplay] {
        &self.actions
    }

    /// Every head label, tape by tape, separated by spaces.
    pub fn read_summary(&self) -> String {
        self.tapes
            .values()
            .flatten()
            .map(HeadDisplay::label)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Action glyphs separated by spaces, or the blank placeholder.
    pub fn action_summary(&self) -> String {
        if self.actions.is_empty() {
            return BLANK_GLYPH.to_string();
        }
        self.actions
            .iter()
            .map(ActionDisplay::glyph)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text of the edge label.
    pub fn summary(&self) -> String {
        format!("{} / {}", self.read_summary(), self.action_summary())
    }

    pub(crate) fn add_tape(&mut self, tape: TapeId) {
        self.tapes.entry(tape).or_default();
    }

    pub(crate) fn remove_tape(&mut self, tape: TapeId) -> bool {
        self.actions.retain(|action| action.head.tape() != tape);
        self.tapes.shift_remove(&tape).is_some()
    }

    /// Appends a head; `head` must be the next free index on its tape.
    pub(crate) fn add_head(&mut self, head: HeadRef, color: Color) -> bool {
        match self.tapes.get_mut(&head.tape()) {
            Some(heads) if heads.len() == head.head() => {
                heads.push(HeadDisplay::new(color));
                true
            }
            _ => false,
        }
    }

    pub(crate) fn remove_head(&mut self, head: HeadRef) -> bool {
        let Some(heads) = self.tapes.get_mut(&head.tape()) else {
            return false;
        };
        if head.head() >= heads.len() {
            return false;
        }
        heads.remove(head.head());

        self.actions.retain(|action| action.head != head);
        for action in self.actions.iter_mut() {
            if action.head.tape() == head.tape() && action.head.head() > head.head() {
                action.head = HeadRef::new(head.tape(), action.head.head() - 1);
            }
        }
        true
    }

    pub(crate) fn recolor_head(&mut self, head: HeadRef, color: Color) -> bool {
        let Some(display) = self
            .tapes
            .get_mut(&head.tape())
            .and_then(|heads| heads.get_mut(head.head()))
        else {
            return false;
        };
        display.color = color;
        for action in self.actions.iter_mut().filter(|action| action.head == head) {
            action.color = color;
        }
        true
    }

    /// Inserts a read symbol. Returns `false` if the head is not displayed.
    pub(crate) fn add_read_symbol(&mut self, head: HeadRef, symbol: ReadSymbol) -> bool {
        self.head_mut(head)
            .map(|display| display.symbols.insert(symbol))
            .is_some()
    }

    pub(crate) fn remove_read_symbol(&mut self, head: HeadRef, symbol: &ReadSymbol) -> bool {
        self.head_mut(head)
            .map(|display| display.symbols.remove(symbol))
            .is_some()
    }

    pub(crate) fn push_action(&mut self, action: ActionDisplay) {
        self.actions.push(action);
    }

    pub(crate) fn remove_action(&mut self, index: usize) -> Option<ActionDisplay> {
        (index < self.actions.len()).then(|| self.actions.remove(index))
    }

    /// Rewrites an alphabet symbol in read sets and write actions.
    pub(crate) fn rename_symbol(&mut self, previous: &str, symbol: &str) {
        let old = ReadSymbol::symbol(previous);
        let new = ReadSymbol::symbol(symbol);
        for display in self.tapes.values_mut().flatten() {
            if display.symbols.remove(&old) {
                display.symbols.insert(new.clone());
            }
        }
        for action in self.actions.iter_mut() {
            if let ActionKind::Write(written) = &mut action.kind {
                if *written == old {
                    *written = new.clone();
                }
            }
        }
    }

    fn head_mut(&mut self, head: HeadRef) -> Option<&mut HeadDisplay> {
        self.tapes.get_mut(&head.tape())?.get_mut(head.head())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn color(name: &str) -> Color {
        Color::new(name).unwrap()
    }

    fn display_with_heads(count: usize) -> (TransitionDisplay, TapeId) {
        let tape = TapeId::new(0);
        let mut display = TransitionDisplay::new();
        display.add_tape(tape);
        for index in 0..count {
            assert!(display.add_head(HeadRef::new(tape, index), color("blue")));
        }
        (display, tape)
    }

    #[test]
    fn test_empty_display_uses_blank_placeholder() {
        let (display, _) = display_with_heads(2);
        assert_eq!(display.read_summary(), "∅ ∅");
        assert_eq!(display.action_summary(), "∅");
        assert_eq!(display.summary(), "∅ ∅ / ∅");
    }

    #[test]
    fn test_read_symbols_round_trip_to_placeholder() {
        let (mut display, tape) = display_with_heads(1);
        let head = HeadRef::new(tape, 0);

        assert!(display.add_read_symbol(head, ReadSymbol::symbol("1")));
        assert!(display.add_read_symbol(head, ReadSymbol::Blank));
        assert!(display.add_read_symbol(head, ReadSymbol::symbol("0")));
        assert_eq!(display.read_summary(), "0|1|∅");

        for symbol in [
            ReadSymbol::symbol("0"),
            ReadSymbol::symbol("1"),
            ReadSymbol::Blank,
        ] {
            assert!(display.remove_read_symbol(head, &symbol));
        }
        assert_eq!(display.read_summary(), "∅");
    }

    #[test]
    fn test_unknown_head_is_reported() {
        let (mut display, tape) = display_with_heads(1);
        assert!(!display.add_read_symbol(HeadRef::new(tape, 3), ReadSymbol::Blank));
        assert!(!display.add_head(HeadRef::new(tape, 5), color("red")));
        assert!(!display.add_head(HeadRef::new(TapeId::new(7), 0), color("red")));
    }

    #[test]
    fn test_remove_head_shifts_actions() {
        let (mut display, tape) = display_with_heads(3);
        let right = ActionKind::Move(Direction::Right);
        display.push_action(ActionDisplay::new(
            HeadRef::new(tape, 0),
            color("blue"),
            right.clone(),
        ));
        display.push_action(ActionDisplay::new(
            HeadRef::new(tape, 2),
            color("blue"),
            ActionKind::Write(ReadSymbol::symbol("x")),
        ));

        assert!(display.remove_head(HeadRef::new(tape, 1)));
        assert_eq!(display.tapes().next().map(|(_, heads)| heads.len()), Some(2));
        assert_eq!(display.actions()[1].head(), HeadRef::new(tape, 1));
        assert_eq!(display.action_summary(), "⇒ x");
    }

    #[test]
    fn test_remove_action_by_index() {
        let (mut display, tape) = display_with_heads(1);
        let head = HeadRef::new(tape, 0);
        display.push_action(ActionDisplay::new(
            head,
            color("blue"),
            ActionKind::Move(Direction::Left),
        ));

        assert!(display.remove_action(3).is_none());
        assert!(display.remove_action(0).is_some());
        assert!(display.actions().is_empty());
    }

    #[test]
    fn test_rename_symbol_everywhere() {
        let (mut display, tape) = display_with_heads(1);
        let head = HeadRef::new(tape, 0);
        display.add_read_symbol(head, ReadSymbol::symbol("a"));
        display.push_action(ActionDisplay::new(
            head,
            color("blue"),
            ActionKind::Write(ReadSymbol::symbol("a")),
        ));

        display.rename_symbol("a", "b");
        assert_eq!(display.summary(), "b / b");
    }

    #[test]
    fn test_recolor_head_updates_actions() {
        let (mut display, tape) = display_with_heads(1);
        let head = HeadRef::new(tape, 0);
        display.push_action(ActionDisplay::new(
            head,
            color("blue"),
            ActionKind::Move(Direction::Up),
        ));

        assert!(display.recolor_head(head, color("crimson")));
        assert_eq!(display.head(head).map(HeadDisplay::color), Some(color("crimson")));
        assert_eq!(display.actions()[0].color(), color("crimson"));
    }
}
