//! In-memory reference automaton model.
//!
//! [`Machine`] stores states, transitions, tapes and the alphabet, and
//! implements [`AutomatonModel`] with the conventions the editor relies on:
//!
//! - ids are never reused, so a stale id can never alias a new entity;
//! - removals cascade, and every dependent change is published before the
//!   removal itself (transitions before their state, read symbols and
//!   actions before their head, tape or alphabet symbol);
//! - final and accepting form one tri-state: setting accepting implies
//!   final, and unsetting final implies unsetting accepting;
//! - redundant edits (adding a read symbol twice, removing an absent one)
//!   succeed silently and publish nothing.
//!
//! Execution semantics are out of scope: the machine only stores what the
//! editor shows.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::{
    bus::{EventBus, Notification},
    model::{
        Action, ActionKind, AutomatonModel, HeadRef, MachineView, ReadSymbol, StateId, TapeId,
        TransitionId,
    },
};

/// Why the reference machine rejected a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("unknown {0}")]
    UnknownState(StateId),

    #[error("unknown {0}")]
    UnknownTransition(TransitionId),

    #[error("unknown {0}")]
    UnknownTape(TapeId),

    #[error("unknown {0}")]
    UnknownHead(HeadRef),

    #[error("a state named `{0}` already exists")]
    DuplicateStateName(String),

    #[error("symbol `{0}` is not in the alphabet")]
    SymbolNotInAlphabet(String),

    #[error("symbol `{0}` is already in the alphabet")]
    DuplicateSymbol(String),

    #[error("symbols and state names must not be empty")]
    EmptyName,

    #[error("{transition} has no `{kind}` action on {head}")]
    NoSuchAction {
        transition: TransitionId,
        head: HeadRef,
        kind: String,
    },
}

#[derive(Debug, Clone, Default)]
struct StateRecord {
    name: Option<String>,
    initial: bool,
    is_final: bool,
    accepting: bool,
}

#[derive(Debug, Clone)]
struct TransitionRecord {
    input: StateId,
    output: StateId,
    reads: BTreeMap<HeadRef, BTreeSet<ReadSymbol>>,
    actions: Vec<Action>,
}

/// The reference automaton model.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    states: IndexMap<StateId, StateRecord>,
    transitions: IndexMap<TransitionId, TransitionRecord>,
    tapes: IndexMap<TapeId, usize>,
    alphabet: Vec<String>,
    next_state: u32,
    next_transition: u32,
    next_tape: u32,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Transitions leaving or entering `state`, in creation order.
    pub fn transitions_of(&self, state: StateId) -> Vec<TransitionId> {
        self.transitions
            .iter()
            .filter(|(_, record)| record.input == state || record.output == state)
            .map(|(id, _)| *id)
            .collect()
    }

    fn emit(&self, bus: &mut EventBus<'_>, notification: Notification) {
        bus.publish(notification, self);
    }

    fn state(&self, state: StateId) -> Result<&StateRecord, MachineError> {
        self.states
            .get(&state)
            .ok_or(MachineError::UnknownState(state))
    }

    fn state_mut(&mut self, state: StateId) -> Result<&mut StateRecord, MachineError> {
        self.states
            .get_mut(&state)
            .ok_or(MachineError::UnknownState(state))
    }

    fn transition(&self, transition: TransitionId) -> Result<&TransitionRecord, MachineError> {
        self.transitions
            .get(&transition)
            .ok_or(MachineError::UnknownTransition(transition))
    }

    fn transition_mut(
        &mut self,
        transition: TransitionId,
    ) -> Result<&mut TransitionRecord, MachineError> {
        self.transitions
            .get_mut(&transition)
            .ok_or(MachineError::UnknownTransition(transition))
    }

    fn check_head(&self, head: HeadRef) -> Result<(), MachineError> {
        let count = self
            .tapes
            .get(&head.tape())
            .ok_or(MachineError::UnknownTape(head.tape()))?;
        if head.head() >= *count {
            return Err(MachineError::UnknownHead(head));
        }
        Ok(())
    }

    fn check_symbol(&self, symbol: &ReadSymbol) -> Result<(), MachineError> {
        match symbol.as_symbol() {
            Some(s) if !self.alphabet.iter().any(|known| known == s) => {
                Err(MachineError::SymbolNotInAlphabet(s.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn check_name_free(&self, name: &str, except: Option<StateId>) -> Result<(), MachineError> {
        if name.is_empty() {
            return Err(MachineError::EmptyName);
        }
        let taken = self
            .states
            .iter()
            .any(|(id, record)| Some(*id) != except && record.name.as_deref() == Some(name));
        if taken {
            return Err(MachineError::DuplicateStateName(name.to_string()));
        }
        Ok(())
    }

    fn set_final(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        let record = self.state_mut(state)?;
        if record.is_final {
            return Ok(());
        }
        record.is_final = true;
        self.emit(bus, Notification::FinalSet { state });
        Ok(())
    }

    /// Also unsets accepting, which cannot hold without final.
    fn unset_final(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        self.unset_accepting(state, bus)?;
        let record = self.state_mut(state)?;
        if !record.is_final {
            return Ok(());
        }
        record.is_final = false;
        self.emit(bus, Notification::FinalUnset { state });
        Ok(())
    }

    /// Also sets final, which accepting implies.
    fn set_accepting(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        self.set_final(state, bus)?;
        let record = self.state_mut(state)?;
        if record.accepting {
            return Ok(());
        }
        record.accepting = true;
        self.emit(bus, Notification::AcceptingSet { state });
        Ok(())
    }

    fn unset_accepting(
        &mut self,
        state: StateId,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        let record = self.state_mut(state)?;
        if !record.accepting {
            return Ok(());
        }
        record.accepting = false;
        self.emit(bus, Notification::AcceptingUnset { state });
        Ok(())
    }

    fn drop_transition(&mut self, transition: TransitionId, bus: &mut EventBus<'_>) {
        if self.transitions.shift_remove(&transition).is_some() {
            self.emit(bus, Notification::TransitionRemoved { transition });
        }
    }

    /// Removes every read symbol matching `strip` from every transition,
    /// one notification per symbol.
    fn strip_read_symbols(
        &mut self,
        bus: &mut EventBus<'_>,
        strip: impl Fn(HeadRef, &ReadSymbol) -> bool,
    ) {
        let matches: Vec<(TransitionId, HeadRef, ReadSymbol)> = self
            .transitions
            .iter()
            .flat_map(|(id, record)| {
                record.reads.iter().flat_map(move |(head, symbols)| {
                    symbols.iter().map(move |symbol| (*id, *head, symbol.clone()))
                })
            })
            .filter(|(_, head, symbol)| strip(*head, symbol))
            .collect();

        for (transition, head, symbol) in matches {
            if let Some(symbols) = self
                .transitions
                .get_mut(&transition)
                .and_then(|record| record.reads.get_mut(&head))
            {
                symbols.remove(&symbol);
            }
            self.emit(
                bus,
                Notification::ReadSymbolRemoved {
                    transition,
                    head,
                    symbol,
                },
            );
        }
    }

    /// Removes every action matching `strip` from every transition. Actions
    /// are removed from the back so each published index is the position
    /// the action had at that moment.
    fn strip_actions(&mut self, bus: &mut EventBus<'_>, strip: impl Fn(&Action) -> bool) {
        let ids: Vec<TransitionId> = self.transitions.keys().copied().collect();
        for transition in ids {
            loop {
                let Some(record) = self.transitions.get_mut(&transition) else {
                    break;
                };
                let Some(index) = record.actions.iter().rposition(&strip) else {
                    break;
                };
                record.actions.remove(index);
                self.emit(bus, Notification::ActionRemoved { transition, index });
            }
        }
    }

    fn drop_head(&mut self, head: HeadRef, bus: &mut EventBus<'_>) {
        self.strip_read_symbols(bus, |h, _| h == head);
        self.strip_actions(bus, |action| action.head() == head);

        let shifted = |h: HeadRef| {
            if h.tape() == head.tape() && h.head() > head.head() {
                HeadRef::new(h.tape(), h.head() - 1)
            } else {
                h
            }
        };
        for record in self.transitions.values_mut() {
            record.reads.remove(&head);
            record.reads = std::mem::take(&mut record.reads)
                .into_iter()
                .map(|(h, symbols)| (shifted(h), symbols))
                .collect();
            for action in record.actions.iter_mut() {
                *action.head_mut() = shifted(action.head());
            }
        }

        if let Some(count) = self.tapes.get_mut(&head.tape()) {
            *count = count.saturating_sub(1);
        }
        debug!(head:%; "Head removed");
        self.emit(bus, Notification::HeadRemoved { head });
    }
}

impl MachineView for Machine {
    fn state_name(&self, state: StateId) -> Option<String> {
        self.states.get(&state).and_then(|record| record.name.clone())
    }

    fn state_names(&self) -> Vec<String> {
        self.states
            .values()
            .filter_map(|record| record.name.clone())
            .collect()
    }

    fn is_initial(&self, state: StateId) -> bool {
        self.states.get(&state).is_some_and(|record| record.initial)
    }

    fn is_final(&self, state: StateId) -> bool {
        self.states.get(&state).is_some_and(|record| record.is_final)
    }

    fn is_accepting(&self, state: StateId) -> bool {
        self.states.get(&state).is_some_and(|record| record.accepting)
    }

    fn transition_endpoints(&self, transition: TransitionId) -> Option<(StateId, StateId)> {
        self.transitions
            .get(&transition)
            .map(|record| (record.input, record.output))
    }

    fn tapes(&self) -> Vec<(TapeId, usize)> {
        self.tapes.iter().map(|(id, count)| (*id, *count)).collect()
    }

    fn read_symbols(
        &self,
        transition: TransitionId,
        head: HeadRef,
    ) -> Option<BTreeSet<ReadSymbol>> {
        let record = self.transitions.get(&transition)?;
        self.check_head(head).ok()?;
        Some(record.reads.get(&head).cloned().unwrap_or_default())
    }

    fn actions(&self, transition: TransitionId) -> Vec<Action> {
        self.transitions
            .get(&transition)
            .map(|record| record.actions.clone())
            .unwrap_or_default()
    }

    fn alphabet(&self) -> Vec<String> {
        self.alphabet.clone()
    }
}

impl AutomatonModel for Machine {
    type Error = MachineError;

    fn add_state(
        &mut self,
        name: Option<&str>,
        bus: &mut EventBus<'_>,
    ) -> Result<StateId, MachineError> {
        if let Some(name) = name {
            self.check_name_free(name, None)?;
        }

        let state = StateId::new(self.next_state);
        self.next_state += 1;
        self.states.insert(
            state,
            StateRecord {
                name: name.map(str::to_string),
                ..StateRecord::default()
            },
        );

        self.emit(bus, Notification::StateAdded { state });
        Ok(state)
    }

    fn remove_state(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        self.state(state)?;

        for transition in self.transitions_of(state) {
            self.drop_transition(transition, bus);
        }
        self.states.shift_remove(&state);

        self.emit(bus, Notification::StateRemoved { state });
        Ok(())
    }

    fn rename_state(
        &mut self,
        state: StateId,
        name: &str,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.state(state)?;
        self.check_name_free(name, Some(state))?;

        self.state_mut(state)?.name = Some(name.to_string());
        self.emit(bus, Notification::StateRenamed { state });
        Ok(())
    }

    fn add_transition(
        &mut self,
        input: StateId,
        output: StateId,
        bus: &mut EventBus<'_>,
    ) -> Result<TransitionId, MachineError> {
        self.state(input)?;
        self.state(output)?;

        let transition = TransitionId::new(self.next_transition);
        self.next_transition += 1;
        self.transitions.insert(
            transition,
            TransitionRecord {
                input,
                output,
                reads: BTreeMap::new(),
                actions: Vec::new(),
            },
        );

        self.emit(
            bus,
            Notification::TransitionAdded {
                transition,
                input,
                output,
            },
        );
        Ok(transition)
    }

    fn remove_transition(
        &mut self,
        transition: TransitionId,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.transition(transition)?;
        self.drop_transition(transition, bus);
        Ok(())
    }

    /// Accepting drops back to final; otherwise final is flipped.
    fn toggle_final(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        let record = self.state(state)?;
        if record.accepting {
            self.unset_accepting(state, bus)
        } else if record.is_final {
            self.unset_final(state, bus)
        } else {
            self.set_final(state, bus)
        }
    }

    /// Accepting drops to neither; otherwise the state becomes accepting.
    fn toggle_accepting(
        &mut self,
        state: StateId,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        if self.state(state)?.accepting {
            self.unset_final(state, bus)
        } else {
            self.set_accepting(state, bus)
        }
    }

    fn toggle_initial(&mut self, state: StateId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        let record = self.state_mut(state)?;
        record.initial = !record.initial;
        let notification = if record.initial {
            Notification::InitialSet { state }
        } else {
            Notification::InitialUnset { state }
        };
        self.emit(bus, notification);
        Ok(())
    }

    fn add_read_symbol(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.transition(transition)?;
        self.check_head(head)?;
        self.check_symbol(&symbol)?;

        let inserted = self
            .transition_mut(transition)?
            .reads
            .entry(head)
            .or_default()
            .insert(symbol.clone());
        if inserted {
            self.emit(
                bus,
                Notification::ReadSymbolAdded {
                    transition,
                    head,
                    symbol,
                },
            );
        }
        Ok(())
    }

    fn remove_read_symbol(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.transition(transition)?;
        self.check_head(head)?;

        let removed = self
            .transition_mut(transition)?
            .reads
            .get_mut(&head)
            .is_some_and(|symbols| symbols.remove(&symbol));
        if removed {
            self.emit(
                bus,
                Notification::ReadSymbolRemoved {
                    transition,
                    head,
                    symbol,
                },
            );
        }
        Ok(())
    }

    fn add_action(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        kind: ActionKind,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.transition(transition)?;
        self.check_head(head)?;
        if let ActionKind::Write(symbol) = &kind {
            self.check_symbol(symbol)?;
        }

        let action = Action::new(head, kind);
        self.transition_mut(transition)?.actions.push(action.clone());
        self.emit(bus, Notification::ActionAdded { transition, action });
        Ok(())
    }

    /// Removes the most recent matching action.
    fn remove_action(
        &mut self,
        transition: TransitionId,
        head: HeadRef,
        kind: ActionKind,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        self.check_head(head)?;
        let record = self.transition_mut(transition)?;
        let index = record
            .actions
            .iter()
            .rposition(|action| action.head() == head && *action.kind() == kind)
            .ok_or_else(|| MachineError::NoSuchAction {
                transition,
                head,
                kind: kind.to_string(),
            })?;

        record.actions.remove(index);
        self.emit(bus, Notification::ActionRemoved { transition, index });
        Ok(())
    }

    fn add_tape(&mut self, bus: &mut EventBus<'_>) -> Result<TapeId, MachineError> {
        let tape = TapeId::new(self.next_tape);
        self.next_tape += 1;
        self.tapes.insert(tape, 0);

        self.emit(bus, Notification::TapeAdded { tape });
        Ok(tape)
    }

    fn remove_tape(&mut self, tape: TapeId, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        let count = *self.tapes.get(&tape).ok_or(MachineError::UnknownTape(tape))?;

        for head in (0..count).rev() {
            self.drop_head(HeadRef::new(tape, head), bus);
        }
        self.tapes.shift_remove(&tape);

        self.emit(bus, Notification::TapeRemoved { tape });
        Ok(())
    }

    fn add_head(&mut self, tape: TapeId, bus: &mut EventBus<'_>) -> Result<usize, MachineError> {
        let count = self
            .tapes
            .get_mut(&tape)
            .ok_or(MachineError::UnknownTape(tape))?;
        let index = *count;
        *count += 1;

        self.emit(
            bus,
            Notification::HeadAdded {
                head: HeadRef::new(tape, index),
            },
        );
        Ok(index)
    }

    fn remove_head(&mut self, head: HeadRef, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        self.check_head(head)?;
        self.drop_head(head, bus);
        Ok(())
    }

    fn add_symbol(&mut self, symbol: &str, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        if symbol.is_empty() {
            return Err(MachineError::EmptyName);
        }
        if self.alphabet.iter().any(|known| known == symbol) {
            return Err(MachineError::DuplicateSymbol(symbol.to_string()));
        }

        self.alphabet.push(symbol.to_string());
        self.emit(
            bus,
            Notification::SymbolAdded {
                symbol: symbol.to_string(),
            },
        );
        Ok(())
    }

    /// Renames a symbol everywhere it is used, keeping its position in the
    /// alphabet and in every action list.
    fn edit_symbol(
        &mut self,
        previous: &str,
        symbol: &str,
        bus: &mut EventBus<'_>,
    ) -> Result<(), MachineError> {
        let position = self
            .alphabet
            .iter()
            .position(|known| known == previous)
            .ok_or_else(|| MachineError::SymbolNotInAlphabet(previous.to_string()))?;
        if symbol.is_empty() {
            return Err(MachineError::EmptyName);
        }
        if previous == symbol {
            return Ok(());
        }
        if self.alphabet.iter().any(|known| known == symbol) {
            return Err(MachineError::DuplicateSymbol(symbol.to_string()));
        }

        self.alphabet[position] = symbol.to_string();
        let old = ReadSymbol::symbol(previous);
        let new = ReadSymbol::symbol(symbol);
        for record in self.transitions.values_mut() {
            for symbols in record.reads.values_mut() {
                if symbols.remove(&old) {
                    symbols.insert(new.clone());
                }
            }
            for action in record.actions.iter_mut() {
                if let ActionKind::Write(written) = action.kind_mut() {
                    if *written == old {
                        *written = new.clone();
                    }
                }
            }
        }

        self.emit(
            bus,
            Notification::SymbolEdited {
                previous: previous.to_string(),
                symbol: symbol.to_string(),
            },
        );
        Ok(())
    }

    fn remove_symbol(&mut self, symbol: &str, bus: &mut EventBus<'_>) -> Result<(), MachineError> {
        let position = self
            .alphabet
            .iter()
            .position(|known| known == symbol)
            .ok_or_else(|| MachineError::SymbolNotInAlphabet(symbol.to_string()))?;

        let target = ReadSymbol::symbol(symbol);
        self.strip_read_symbols(bus, |_, read| *read == target);
        self.strip_actions(bus, |action| {
            matches!(action.kind(), ActionKind::Write(written) if *written == target)
        });
        self.alphabet.remove(position);

        self.emit(
            bus,
            Notification::SymbolRemoved {
                symbol: symbol.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bus::{NotificationKind as Kind, Recorder},
        model::Direction,
    };

    /// Runs one mutation against the machine with a recorder attached.
    fn record<T>(
        machine: &mut Machine,
        mutate: impl FnOnce(&mut Machine, &mut EventBus<'_>) -> Result<T, MachineError>,
    ) -> (Result<T, MachineError>, Vec<Notification>) {
        let mut recorder = Recorder::new();
        let result = {
            let mut bus = EventBus::detached();
            bus.subscribe(&mut recorder);
            let result = mutate(machine, &mut bus);
            bus.finish().unwrap();
            result
        };
        (result, recorder.notifications().to_vec())
    }

    fn kinds(notifications: &[Notification]) -> Vec<Kind> {
        notifications.iter().map(Notification::kind).collect()
    }

    fn setup() -> (Machine, StateId, StateId, TransitionId, HeadRef) {
        let mut machine = Machine::new();
        let mut bus = EventBus::detached();
        let a = machine.add_state(Some("A"), &mut bus).unwrap();
        let b = machine.add_state(Some("B"), &mut bus).unwrap();
        let t = machine.add_transition(a, b, &mut bus).unwrap();
        let tape = machine.add_tape(&mut bus).unwrap();
        let head = HeadRef::new(tape, machine.add_head(tape, &mut bus).unwrap());
        machine.add_symbol("0", &mut bus).unwrap();
        machine.add_symbol("1", &mut bus).unwrap();
        (machine, a, b, t, head)
    }

    #[test]
    fn test_add_state_rejects_duplicate_name_silently() {
        let mut machine = Machine::new();
        let (first, _) = record(&mut machine, |m, bus| m.add_state(Some("A"), bus));
        assert_eq!(first, Ok(StateId::new(0)));

        let (second, notifications) = record(&mut machine, |m, bus| m.add_state(Some("A"), bus));
        assert_eq!(
            second,
            Err(MachineError::DuplicateStateName("A".to_string()))
        );
        assert!(notifications.is_empty());
        assert_eq!(machine.state_count(), 1);
    }

    #[test]
    fn test_unnamed_states_are_allowed() {
        let mut machine = Machine::new();
        let mut bus = EventBus::detached();
        let a = machine.add_state(None, &mut bus).unwrap();
        let b = machine.add_state(None, &mut bus).unwrap();
        assert_ne!(a, b);
        assert_eq!(machine.state_name(a), None);
    }

    #[test]
    fn test_toggle_final_and_accepting_tri_state() {
        let (mut machine, a, ..) = setup();

        let (_, n) = record(&mut machine, |m, bus| m.toggle_accepting(a, bus));
        assert_eq!(kinds(&n), [Kind::FinalSet, Kind::AcceptingSet]);
        assert!(machine.is_final(a) && machine.is_accepting(a));

        // Accepting drops back to plain final.
        let (_, n) = record(&mut machine, |m, bus| m.toggle_final(a, bus));
        assert_eq!(kinds(&n), [Kind::AcceptingUnset]);
        assert!(machine.is_final(a) && !machine.is_accepting(a));

        let (_, n) = record(&mut machine, |m, bus| m.toggle_final(a, bus));
        assert_eq!(kinds(&n), [Kind::FinalUnset]);
        assert!(!machine.is_final(a));

        machine
            .toggle_accepting(a, &mut EventBus::detached())
            .unwrap();
        let (_, n) = record(&mut machine, |m, bus| m.toggle_accepting(a, bus));
        assert_eq!(kinds(&n), [Kind::AcceptingUnset, Kind::FinalUnset]);
    }

    #[test]
    fn test_toggle_initial_flips() {
        let (mut machine, a, ..) = setup();
        let (_, n) = record(&mut machine, |m, bus| m.toggle_initial(a, bus));
        assert_eq!(kinds(&n), [Kind::InitialSet]);
        let (_, n) = record(&mut machine, |m, bus| m.toggle_initial(a, bus));
        assert_eq!(kinds(&n), [Kind::InitialUnset]);
    }

    #[test]
    fn test_read_symbols_are_a_set() {
        let (mut machine, _, _, t, head) = setup();

        let (_, n) = record(&mut machine, |m, bus| {
            m.add_read_symbol(t, head, ReadSymbol::symbol("1"), bus)
        });
        assert_eq!(kinds(&n), [Kind::ReadSymbolAdded]);

        let (_, n) = record(&mut machine, |m, bus| {
            m.add_read_symbol(t, head, ReadSymbol::symbol("1"), bus)
        });
        assert!(n.is_empty());

        let (result, _) = record(&mut machine, |m, bus| {
            m.add_read_symbol(t, head, ReadSymbol::symbol("7"), bus)
        });
        assert_eq!(
            result,
            Err(MachineError::SymbolNotInAlphabet("7".to_string()))
        );

        machine
            .add_read_symbol(t, head, ReadSymbol::Blank, &mut EventBus::detached())
            .unwrap();
        let symbols = machine.read_symbols(t, head).unwrap();
        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            [ReadSymbol::symbol("1"), ReadSymbol::Blank]
        );
    }

    #[test]
    fn test_remove_action_takes_last_match() {
        let (mut machine, _, _, t, head) = setup();
        let right = ActionKind::Move(Direction::Right);
        let mut bus = EventBus::detached();
        machine.add_action(t, head, right.clone(), &mut bus).unwrap();
        machine
            .add_action(t, head, ActionKind::Write(ReadSymbol::symbol("0")), &mut bus)
            .unwrap();
        machine.add_action(t, head, right.clone(), &mut bus).unwrap();

        let (_, n) = record(&mut machine, |m, bus| {
            m.remove_action(t, head, right.clone(), bus)
        });
        assert_eq!(
            n,
            [Notification::ActionRemoved {
                transition: t,
                index: 2
            }]
        );

        let (result, n) = record(&mut machine, |m, bus| {
            m.remove_action(t, head, ActionKind::Move(Direction::Up), bus)
        });
        assert!(matches!(result, Err(MachineError::NoSuchAction { .. })));
        assert!(n.is_empty());
    }

    #[test]
    fn test_remove_state_removes_transitions_first() {
        let (mut machine, a, b, t, _) = setup();
        let loop_t = machine
            .add_transition(b, b, &mut EventBus::detached())
            .unwrap();

        let (_, n) = record(&mut machine, |m, bus| m.remove_state(b, bus));
        assert_eq!(
            n,
            [
                Notification::TransitionRemoved { transition: t },
                Notification::TransitionRemoved { transition: loop_t },
                Notification::StateRemoved { state: b },
            ]
        );
        assert_eq!(machine.transition_count(), 0);
        assert!(machine.transitions_of(a).is_empty());

        // Ids are never reused.
        let c = machine.add_state(None, &mut EventBus::detached()).unwrap();
        assert_eq!(c, StateId::new(2));
    }

    #[test]
    fn test_remove_head_strips_then_shifts() {
        let (mut machine, _, _, t, head0) = setup();
        let mut bus = EventBus::detached();
        let head1 = HeadRef::new(head0.tape(), machine.add_head(head0.tape(), &mut bus).unwrap());
        machine
            .add_read_symbol(t, head0, ReadSymbol::symbol("0"), &mut bus)
            .unwrap();
        machine
            .add_read_symbol(t, head1, ReadSymbol::symbol("1"), &mut bus)
            .unwrap();
        machine
            .add_action(t, head0, ActionKind::Move(Direction::Left), &mut bus)
            .unwrap();
        machine
            .add_action(t, head1, ActionKind::Move(Direction::Right), &mut bus)
            .unwrap();
        drop(bus);

        let (_, n) = record(&mut machine, |m, bus| m.remove_head(head0, bus));
        assert_eq!(
            kinds(&n),
            [Kind::ReadSymbolRemoved, Kind::ActionRemoved, Kind::HeadRemoved]
        );
        assert_eq!(
            n[1],
            Notification::ActionRemoved {
                transition: t,
                index: 0
            }
        );

        // The former head 1 is now head 0.
        assert_eq!(
            machine.read_symbols(t, head0).unwrap().into_iter().collect::<Vec<_>>(),
            [ReadSymbol::symbol("1")]
        );
        assert_eq!(machine.actions(t)[0].head(), head0);
        assert!(machine.read_symbols(t, head1).is_none());
    }

    #[test]
    fn test_remove_tape_removes_heads_last_first() {
        let (mut machine, _, _, _, head0) = setup();
        machine
            .add_head(head0.tape(), &mut EventBus::detached())
            .unwrap();

        let (_, n) = record(&mut machine, |m, bus| m.remove_tape(head0.tape(), bus));
        assert_eq!(
            n,
            [
                Notification::HeadRemoved {
                    head: HeadRef::new(head0.tape(), 1)
                },
                Notification::HeadRemoved { head: head0 },
                Notification::TapeRemoved {
                    tape: head0.tape()
                },
            ]
        );
        assert!(machine.tapes().is_empty());
    }

    #[test]
    fn test_remove_symbol_cascades() {
        let (mut machine, _, _, t, head) = setup();
        let mut bus = EventBus::detached();
        machine
            .add_read_symbol(t, head, ReadSymbol::symbol("1"), &mut bus)
            .unwrap();
        machine
            .add_action(t, head, ActionKind::Write(ReadSymbol::symbol("1")), &mut bus)
            .unwrap();
        drop(bus);

        let (_, n) = record(&mut machine, |m, bus| m.remove_symbol("1", bus));
        assert_eq!(
            kinds(&n),
            [
                Kind::ReadSymbolRemoved,
                Kind::ActionRemoved,
                Kind::SymbolRemoved
            ]
        );
        assert_eq!(machine.alphabet(), ["0"]);
    }

    #[test]
    fn test_edit_symbol_rewrites_in_place() {
        let (mut machine, _, _, t, head) = setup();
        let mut bus = EventBus::detached();
        machine
            .add_read_symbol(t, head, ReadSymbol::symbol("1"), &mut bus)
            .unwrap();
        machine
            .add_action(t, head, ActionKind::Write(ReadSymbol::symbol("1")), &mut bus)
            .unwrap();
        drop(bus);

        let (_, n) = record(&mut machine, |m, bus| m.edit_symbol("1", "x", bus));
        assert_eq!(kinds(&n), [Kind::SymbolEdited]);
        assert_eq!(machine.alphabet(), ["0", "x"]);
        assert!(
            machine
                .read_symbols(t, head)
                .unwrap()
                .contains(&ReadSymbol::symbol("x"))
        );
        assert_eq!(
            *machine.actions(t)[0].kind(),
            ActionKind::Write(ReadSymbol::symbol("x"))
        );

        let (result, _) = record(&mut machine, |m, bus| m.edit_symbol("0", "x", bus));
        assert_eq!(result, Err(MachineError::DuplicateSymbol("x".to_string())));
    }

    #[test]
    fn test_unknown_entities_are_rejected() {
        let (mut machine, a, ..) = setup();
        let mut bus = EventBus::detached();
        assert_eq!(
            machine.add_transition(a, StateId::new(42), &mut bus),
            Err(MachineError::UnknownState(StateId::new(42)))
        );
        assert_eq!(
            machine.add_head(TapeId::new(9), &mut bus),
            Err(MachineError::UnknownTape(TapeId::new(9)))
        );
        assert_eq!(bus.published(), 0);
    }
}
