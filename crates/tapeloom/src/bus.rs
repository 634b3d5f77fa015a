//! Typed change notifications and their synchronous delivery.
//!
//! The model describes every change it makes as a [`Notification`] and
//! publishes it on the [`EventBus`] handed to the mutator. Delivery happens
//! immediately, on the caller's stack, in publishing order: by the time a
//! mutator returns, every subscriber has already reacted.
//!
//! A bus lives for exactly one model call. It also owns the
//! [`PendingCreation`] parameters of that call and lends them to
//! subscribers, so creation parameters can never leak into an unrelated
//! call.

use log::{error, trace};

use crate::{
    error::ConsistencyError,
    model::{Action, HeadRef, MachineView, ReadSymbol, StateId, TapeId, TransitionId},
    pending::PendingCreation,
};

/// A change the model has already made.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    StateAdded {
        state: StateId,
    },
    StateRemoved {
        state: StateId,
    },
    StateRenamed {
        state: StateId,
    },
    TransitionAdded {
        transition: TransitionId,
        input: StateId,
        output: StateId,
    },
    TransitionRemoved {
        transition: TransitionId,
    },
    InitialSet {
        state: StateId,
    },
    InitialUnset {
        state: StateId,
    },
    FinalSet {
        state: StateId,
    },
    FinalUnset {
        state: StateId,
    },
    AcceptingSet {
        state: StateId,
    },
    AcceptingUnset {
        state: StateId,
    },
    ReadSymbolAdded {
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
    },
    ReadSymbolRemoved {
        transition: TransitionId,
        head: HeadRef,
        symbol: ReadSymbol,
    },
    ActionAdded {
        transition: TransitionId,
        action: Action,
    },
    ActionRemoved {
        transition: TransitionId,
        index: usize,
    },
    TapeAdded {
        tape: TapeId,
    },
    TapeRemoved {
        tape: TapeId,
    },
    HeadAdded {
        head: HeadRef,
    },
    HeadRemoved {
        head: HeadRef,
    },
    SymbolAdded {
        symbol: String,
    },
    SymbolEdited {
        previous: String,
        symbol: String,
    },
    SymbolRemoved {
        symbol: String,
    },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::StateAdded { .. } => NotificationKind::StateAdded,
            Self::StateRemoved { .. } => NotificationKind::StateRemoved,
            Self::StateRenamed { .. } => NotificationKind::StateRenamed,
            Self::TransitionAdded { .. } => NotificationKind::TransitionAdded,
            Self::TransitionRemoved { .. } => NotificationKind::TransitionRemoved,
            Self::InitialSet { .. } => NotificationKind::InitialSet,
            Self::InitialUnset { .. } => NotificationKind::InitialUnset,
            Self::FinalSet { .. } => NotificationKind::FinalSet,
            Self::FinalUnset { .. } => NotificationKind::FinalUnset,
            Self::AcceptingSet { .. } => NotificationKind::AcceptingSet,
            Self::AcceptingUnset { .. } => NotificationKind::AcceptingUnset,
            Self::ReadSymbolAdded { .. } => NotificationKind::ReadSymbolAdded,
            Self::ReadSymbolRemoved { .. } => NotificationKind::ReadSymbolRemoved,
            Self::ActionAdded { .. } => NotificationKind::ActionAdded,
            Self::ActionRemoved { .. } => NotificationKind::ActionRemoved,
            Self::TapeAdded { .. } => NotificationKind::TapeAdded,
            Self::TapeRemoved { .. } => NotificationKind::TapeRemoved,
            Self::HeadAdded { .. } => NotificationKind::HeadAdded,
            Self::HeadRemoved { .. } => NotificationKind::HeadRemoved,
            Self::SymbolAdded { .. } => NotificationKind::SymbolAdded,
            Self::SymbolEdited { .. } => NotificationKind::SymbolEdited,
            Self::SymbolRemoved { .. } => NotificationKind::SymbolRemoved,
        }
    }
}

/// Payload-free mirror of [`Notification`], used to subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    StateAdded,
    StateRemoved,
    StateRenamed,
    TransitionAdded,
    TransitionRemoved,
    InitialSet,
    InitialUnset,
    FinalSet,
    FinalUnset,
    AcceptingSet,
    AcceptingUnset,
    ReadSymbolAdded,
    ReadSymbolRemoved,
    ActionAdded,
    ActionRemoved,
    TapeAdded,
    TapeRemoved,
    HeadAdded,
    HeadRemoved,
    SymbolAdded,
    SymbolEdited,
    SymbolRemoved,
}

impl NotificationKind {
    pub const ALL: &'static [NotificationKind] = &[
        Self::StateAdded,
        Self::StateRemoved,
        Self::StateRenamed,
        Self::TransitionAdded,
        Self::TransitionRemoved,
        Self::InitialSet,
        Self::InitialUnset,
        Self::FinalSet,
        Self::FinalUnset,
        Self::AcceptingSet,
        Self::AcceptingUnset,
        Self::ReadSymbolAdded,
        Self::ReadSymbolRemoved,
        Self::ActionAdded,
        Self::ActionRemoved,
        Self::TapeAdded,
        Self::TapeRemoved,
        Self::HeadAdded,
        Self::HeadRemoved,
        Self::SymbolAdded,
        Self::SymbolEdited,
        Self::SymbolRemoved,
    ];
}

/// The fixed set of kinds a subscriber wants delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    kinds: &'static [NotificationKind],
}

impl Subscription {
    pub const ALL: Subscription = Subscription::new(NotificationKind::ALL);

    pub const fn new(kinds: &'static [NotificationKind]) -> Self {
        Self { kinds }
    }

    pub fn contains(&self, kind: NotificationKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> &'static [NotificationKind] {
        self.kinds
    }
}

/// Receives notifications while a model call is in progress.
///
/// Handlers must only update local state: calling back into the model from
/// a handler is impossible by construction, since the model is only
/// reachable through the read-only [`MachineView`].
pub trait Subscriber {
    fn subscription(&self) -> Subscription;

    fn on_notification(
        &mut self,
        notification: &Notification,
        model: &dyn MachineView,
        pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError>;
}

/// Synchronous, single-call notification channel.
pub struct EventBus<'a> {
    subscribers: Vec<&'a mut dyn Subscriber>,
    pending: PendingCreation,
    fault: Option<ConsistencyError>,
    published: usize,
}

impl<'a> EventBus<'a> {
    /// Creates a bus carrying the creation parameters of one model call.
    pub fn new(pending: PendingCreation) -> Self {
        Self {
            subscribers: Vec::new(),
            pending,
            fault: None,
            published: 0,
        }
    }

    /// A bus nobody listens to, for driving a model on its own.
    pub fn detached() -> Self {
        Self::new(PendingCreation::default())
    }

    pub fn subscribe(&mut self, subscriber: &'a mut dyn Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Delivers `notification` to every interested subscriber, in
    /// subscription order.
    ///
    /// After the first handler failure the bus is faulted: the failure is
    /// kept for [`finish`](Self::finish) and later notifications are still
    /// counted but no longer delivered.
    pub fn publish(&mut self, notification: Notification, model: &dyn MachineView) {
        self.published += 1;
        let kind = notification.kind();

        if self.fault.is_some() {
            trace!(kind:?; "Bus faulted, notification dropped");
            return;
        }

        trace!(kind:?, notification:?; "Delivering notification");
        for subscriber in self.subscribers.iter_mut() {
            if !subscriber.subscription().contains(kind) {
                continue;
            }
            if let Err(err) = subscriber.on_notification(&notification, model, &mut self.pending) {
                error!(kind:?, err:err; "Notification handler failed");
                self.fault = Some(err);
                return;
            }
        }
    }

    /// Number of notifications published so far.
    pub fn published(&self) -> usize {
        self.published
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Ends the call, returning the unconsumed creation parameters or the
    /// first handler failure.
    pub fn finish(self) -> Result<PendingCreation, ConsistencyError> {
        match self.fault {
            Some(err) => Err(err),
            None => Ok(self.pending),
        }
    }
}

/// Subscriber that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    notifications: Vec<Notification>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.notifications.iter().map(Notification::kind).collect()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl Subscriber for Recorder {
    fn subscription(&self) -> Subscription {
        Subscription::ALL
    }

    fn on_notification(
        &mut self,
        notification: &Notification,
        _model: &dyn MachineView,
        _pending: &mut PendingCreation,
    ) -> Result<(), ConsistencyError> {
        self.notifications.push(notification.clone());
        Ok(())
    }
}
