// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependent references: external elements mirroring a node's usable state.
//!
//! A node activates its references when shown (unless its config says
//! otherwise) and always deactivates them when hidden. Nodes hold only weak
//! handles, so a reference that has been dropped elsewhere is skipped and
//! pruned.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// An external element whose enabled state follows a node's visibility.
pub trait DependentReference {
    /// Called when the owning node becomes usable. `behaviour_also` asks the
    /// reference to re-enable its attached behaviour (e.g. button
    /// interactivity) as well as its own state.
    fn activate(&mut self, behaviour_also: bool);

    /// Called when the owning node is hidden or suppresses its references.
    fn deactivate(&mut self, behaviour_also: bool);
}

/// Weak, de-duplicated set of dependent references for one node.
#[derive(Default)]
pub(crate) struct ReferenceSet {
    refs: Vec<Weak<RefCell<dyn DependentReference>>>,
}

impl fmt::Debug for ReferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSet")
            .field("len", &self.refs.len())
            .finish()
    }
}

impl ReferenceSet {
    /// Adds `reference` unless it is already present. Returns whether it was
    /// added.
    pub(crate) fn insert(&mut self, reference: &Rc<RefCell<dyn DependentReference>>) -> bool {
        self.prune();
        let weak = Rc::downgrade(reference);
        if self.refs.iter().any(|r| Weak::ptr_eq(r, &weak)) {
            return false;
        }
        self.refs.push(weak);
        true
    }

    /// Number of references that are still alive.
    pub(crate) fn live_count(&self) -> usize {
        self.refs.iter().filter(|r| r.strong_count() > 0).count()
    }

    /// Activates (`true`) or deactivates (`false`) every live reference.
    ///
    /// A reference that is currently borrowed (for example one that is
    /// performing the navigation causing this broadcast) is skipped.
    pub(crate) fn broadcast(&mut self, flag: bool) {
        self.prune();
        for weak in &self.refs {
            let Some(cell) = weak.upgrade() else {
                continue;
            };
            let Ok(mut reference) = cell.try_borrow_mut() else {
                continue;
            };
            if flag {
                reference.activate(true);
            } else {
                reference.deactivate(true);
            }
        }
    }

    fn prune(&mut self) {
        self.refs.retain(|r| r.strong_count() > 0);
    }
}
