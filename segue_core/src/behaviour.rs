// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation behaviours: dependent references that navigate when triggered.
//!
//! A behaviour belongs to a *control* node (the panel its button lives on)
//! and optionally names a *connect* node (where it leads). Registered as a
//! dependent reference on the control node, it is active exactly while the
//! control node's references are active, and only an active behaviour
//! performs.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::network::Network;
use crate::node::NodeId;
use crate::reference::DependentReference;
use crate::transition::{Direction, LinkedTransition, NavigationTransition};

/// Callback run by [`NavigationAction::Event`].
pub type NavigationCallback = Box<dyn FnMut(&mut Network)>;

/// What a behaviour does when performed.
pub enum NavigationAction {
    /// Open the connect node, which must be a descendant of the control node.
    Forward,
    /// Step back.
    ///
    /// With a connect node, jump to it. With `local_back`, close the control
    /// node and open its logical parent instead of the previous history
    /// entry.
    Back {
        /// Prefer the control node's parent over history.
        local_back: bool,
    },
    /// Open any connect node.
    Public,
    /// Run a callback.
    Event(NavigationCallback),
}

impl fmt::Debug for NavigationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("Forward"),
            Self::Back { local_back } => f
                .debug_struct("Back")
                .field("local_back", local_back)
                .finish(),
            Self::Public => f.write_str("Public"),
            Self::Event(_) => f.write_str("Event(..)"),
        }
    }
}

/// A navigation trigger bound to a control node.
#[derive(Debug)]
pub struct NavigationBehaviour {
    control: NodeId,
    connect: Option<NodeId>,
    action: NavigationAction,
    transition: Option<NavigationTransition>,
    active: bool,
}

enum Plan {
    Forward(NodeId),
    Public(NodeId),
    Back {
        connect: Option<NodeId>,
        local_back: bool,
    },
    Event,
}

impl NavigationBehaviour {
    fn new(control: NodeId, connect: Option<NodeId>, action: NavigationAction) -> Self {
        Self {
            control,
            connect,
            action,
            transition: None,
            active: false,
        }
    }

    /// Opens `connect` forward from `control`.
    #[must_use]
    pub fn forward(control: NodeId, connect: NodeId) -> Self {
        Self::new(control, Some(connect), NavigationAction::Forward)
    }

    /// Opens `connect` from `control`, wherever it lives.
    #[must_use]
    pub fn public(control: NodeId, connect: NodeId) -> Self {
        Self::new(control, Some(connect), NavigationAction::Public)
    }

    /// Steps back through history.
    #[must_use]
    pub fn back(control: NodeId) -> Self {
        Self::new(control, None, NavigationAction::Back { local_back: false })
    }

    /// Jumps back to `connect`.
    #[must_use]
    pub fn back_to(control: NodeId, connect: NodeId) -> Self {
        Self::new(
            control,
            Some(connect),
            NavigationAction::Back { local_back: false },
        )
    }

    /// Closes `control` and opens its logical parent.
    #[must_use]
    pub fn local_back(control: NodeId) -> Self {
        Self::new(control, None, NavigationAction::Back { local_back: true })
    }

    /// Runs `callback` when performed.
    #[must_use]
    pub fn event(control: NodeId, callback: impl FnMut(&mut Network) + 'static) -> Self {
        Self::new(control, None, NavigationAction::Event(Box::new(callback)))
    }

    /// Attaches a paired transition, applied before each navigation.
    #[must_use]
    pub fn with_transition(mut self, transition: NavigationTransition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// The control node.
    #[must_use]
    pub fn control(&self) -> NodeId {
        self.control
    }

    /// The connect node, if set.
    #[must_use]
    pub fn connect(&self) -> Option<NodeId> {
        self.connect
    }

    /// Replaces the connect node. `None` leaves it unchanged.
    pub fn set_connect(&mut self, connect: Option<NodeId>) {
        if connect.is_some() {
            self.connect = connect;
        }
    }

    /// The configured action.
    #[must_use]
    pub fn action(&self) -> &NavigationAction {
        &self.action
    }

    /// Whether the behaviour currently performs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The externally driven half of the attached transition, aimed at the
    /// connect node unless the transition overrides it.
    #[must_use]
    pub fn linked_transition(&self) -> Option<LinkedTransition> {
        self.transition.map(|t| t.linked(self.connect))
    }

    /// Performs the behaviour against `network`.
    ///
    /// Returns `false` if the behaviour is inactive or the navigation failed.
    pub fn perform(&mut self, network: &mut Network) -> bool {
        let Some(plan) = self.prepare(network) else {
            return false;
        };
        match plan {
            Plan::Event => {
                if let NavigationAction::Event(callback) = &mut self.action {
                    callback(network);
                }
                true
            }
            plan => execute(self.control, plan, network),
        }
    }

    /// Performs a behaviour that is also registered as a dependent
    /// reference.
    ///
    /// The borrow is released before navigating, so the cascade can
    /// deactivate this behaviour along with the rest of the control node's
    /// references.
    pub fn perform_shared(behaviour: &Rc<RefCell<Self>>, network: &mut Network) -> bool {
        let (control, plan) = {
            let mut this = behaviour.borrow_mut();
            let Some(plan) = this.prepare(network) else {
                return false;
            };
            (this.control, plan)
        };
        match plan {
            Plan::Event => {
                let taken = {
                    let mut this = behaviour.borrow_mut();
                    match &mut this.action {
                        NavigationAction::Event(callback) => {
                            Some(core::mem::replace(callback, Box::new(|_: &mut Network| {})))
                        }
                        _ => None,
                    }
                };
                if let Some(mut callback) = taken {
                    callback(network);
                    if let NavigationAction::Event(slot) = &mut behaviour.borrow_mut().action {
                        *slot = callback;
                    }
                }
                true
            }
            plan => execute(control, plan, network),
        }
    }

    /// Checks activity, applies the attached transition, and decides what to
    /// do.
    fn prepare(&mut self, network: &mut Network) -> Option<Plan> {
        if !self.active {
            return None;
        }
        if let NavigationAction::Event(_) = self.action {
            return Some(Plan::Event);
        }
        if let Some(transition) = self.transition {
            let destination = self.connect.or_else(|| network.peek_last());
            if let Some(destination) = destination {
                network.propagate_transition(
                    destination,
                    Direction::Show,
                    Some(transition.to_meta()),
                );
            }
            network.propagate_transition(
                self.control,
                Direction::Hide,
                Some(transition.from_meta()),
            );
        }
        Some(match self.action {
            NavigationAction::Forward => Plan::Forward(self.connect?),
            NavigationAction::Public => Plan::Public(self.connect?),
            NavigationAction::Back { local_back } => Plan::Back {
                connect: self.connect,
                local_back,
            },
            NavigationAction::Event(_) => Plan::Event,
        })
    }
}

fn execute(control: NodeId, plan: Plan, network: &mut Network) -> bool {
    match plan {
        Plan::Forward(connect) => network.open_forward(control, connect),
        Plan::Public(connect) => {
            let hide_self = network.store().config(control).hide_on_further_open;
            network.open_public(control, connect, hide_self)
        }
        Plan::Back {
            connect: Some(connect),
            local_back: false,
        } => network.navigate_to(connect, false),
        Plan::Back {
            local_back: true, ..
        } => {
            if !network.deregister_navigation(control, 0) {
                return network.home();
            }
            match network.store().parent(control) {
                Some(parent) => network.register_navigation(parent),
                None => false,
            }
        }
        Plan::Back { .. } => network.back(),
        Plan::Event => true,
    }
}

impl DependentReference for NavigationBehaviour {
    fn activate(&mut self, _behaviour_also: bool) {
        self.active = true;
    }

    fn deactivate(&mut self, _behaviour_also: bool) {
        self.active = false;
    }
}
