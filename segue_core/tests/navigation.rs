// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end navigation flows over a prepared network.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Vec2};
use segue_core::backend::{Surface, SurfacePresenter};
use segue_core::lineage::{ContainerId, Lineage, LineageError, SceneTree};
use segue_core::network::{Network, NetworkConfig};
use segue_core::node::{NodeConfig, NodeId, NodeKind};
use segue_core::reference::DependentReference;
use segue_core::transition::{Direction, Easing, TransitionMeta, TransitionValue};

type Log = Rc<RefCell<Vec<(&'static str, bool)>>>;

/// Records every activation and deactivation it receives.
struct Listener {
    name: &'static str,
    log: Log,
}

impl DependentReference for Listener {
    fn activate(&mut self, _behaviour_also: bool) {
        self.log.borrow_mut().push((self.name, true));
    }

    fn deactivate(&mut self, _behaviour_also: bool) {
        self.log.borrow_mut().push((self.name, false));
    }
}

fn listen(
    net: &mut Network,
    node: NodeId,
    name: &'static str,
    log: &Log,
) -> Rc<RefCell<Listener>> {
    let listener = Rc::new(RefCell::new(Listener {
        name,
        log: log.clone(),
    }));
    assert!(net.register_dependent_reference(node, &listener));
    listener
}

struct Flat {
    net: Network,
    root: NodeId,
    a: NodeId,
    b: NodeId,
    c: NodeId,
}

/// `Root > {A, B, C}`, prepared with the root as start.
fn flat() -> Flat {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let a = tree.add_node(tree.root(), "A", NodeConfig::PLAIN);
    let b = tree.add_node(tree.root(), "B", NodeConfig::PLAIN);
    let c = tree.add_node(tree.root(), "C", NodeConfig::PLAIN);
    let mut net = Network::new(NetworkConfig::new());
    let lineage = net.prepare(&mut tree, None).unwrap();
    Flat {
        root: lineage.root(),
        a: lineage.node_for(a).unwrap(),
        b: lineage.node_for(b).unwrap(),
        c: lineage.node_for(c).unwrap(),
        net,
    }
}

#[test]
fn prepare_hides_everything_but_the_root() {
    let Flat { net, root, a, b, c } = flat();
    assert_eq!(net.history(), &[root]);
    assert_eq!(net.start(), Some(root));
    assert!(net.store().is_shown(root));
    for node in [a, b, c] {
        assert!(!net.store().is_shown(node));
        assert!(net.store().opacity(node).abs() < 1e-6);
    }
}

#[test]
fn show_is_idempotent_without_transition() {
    let Flat { mut net, a, .. } = flat();
    net.show(a, false);
    let first = (
        net.store().is_shown(a),
        net.store().opacity(a),
        net.store().position(a),
    );
    net.show(a, false);
    let second = (
        net.store().is_shown(a),
        net.store().opacity(a),
        net.store().position(a),
    );
    assert_eq!(first, second);
}

#[test]
fn stack_push_then_back_to_root() {
    let Flat {
        mut net,
        root,
        a,
        b,
        c,
    } = flat();
    assert!(net.register_navigation(a));
    assert!(net.register_navigation(b));
    assert!(net.register_navigation(c));
    assert_eq!(net.history(), &[root, a, b, c]);
    assert_eq!(net.peek_last(), Some(b));

    assert!(net.back());
    assert_eq!(net.history(), &[root, a, b]);
    assert!(!net.store().is_shown(c));
    assert!(net.store().is_shown(b));
    assert!(net.back());
    assert!(net.back());
    assert_eq!(net.history(), &[root]);
    assert!(!net.back());
    assert_eq!(net.history(), &[root]);
    assert_eq!(net.peek_last(), None);
}

#[test]
fn root_is_never_deregistered() {
    let Flat {
        mut net,
        root,
        a,
        b,
        ..
    } = flat();
    assert!(!net.deregister_navigation(root, 0));
    assert!(!net.deregister_navigation(root, 1));
    net.register_navigation(a);
    net.register_navigation(b);
    assert!(!net.deregister_navigation(root, 0));
    assert_eq!(net.history(), &[root, a, b]);
}

#[test]
fn deregister_absent_node_fails() {
    let Flat {
        mut net, root, a, b, ..
    } = flat();
    net.register_navigation(a);
    assert!(!net.deregister_navigation(b, 0));
    assert_eq!(net.history(), &[root, a]);
}

#[test]
fn navigate_to_pops_in_order() {
    let Flat {
        mut net,
        root,
        a,
        b,
        c,
    } = flat();
    net.register_navigation(a);
    net.register_navigation(b);
    net.register_navigation(c);

    let log: Log = Rc::default();
    let _pa = listen(&mut net, a, "A", &log);
    let _pb = listen(&mut net, b, "B", &log);
    let _pc = listen(&mut net, c, "C", &log);

    assert!(net.navigate_to(a, false));
    assert_eq!(net.history(), &[root, a]);
    assert_eq!(
        *log.borrow(),
        vec![("C", false), ("B", false), ("A", true)]
    );
    assert!(net.store().is_shown(a));
    assert!(!net.store().is_shown(b));

    // A second registration of `a` is a jump, not a push.
    assert!(net.register_navigation(a));
    assert_eq!(net.history(), &[root, a]);
}

#[test]
fn navigate_to_unknown_requires_force() {
    let Flat {
        mut net, root, a, ..
    } = flat();
    assert!(!net.navigate_to(a, false));
    assert_eq!(net.history(), &[root]);
    assert!(net.navigate_to(a, true));
    assert_eq!(net.history(), &[root, a]);
}

#[test]
fn deregister_with_offset_keeps_node() {
    let Flat {
        mut net,
        root,
        a,
        b,
        c,
    } = flat();
    net.register_navigation(a);
    net.register_navigation(b);
    net.register_navigation(c);
    assert!(net.deregister_navigation(b, 0));
    assert_eq!(net.history(), &[root, a]);

    net.register_navigation(b);
    net.register_navigation(c);
    assert!(net.deregister_navigation(b, 1));
    assert_eq!(net.history(), &[root, a, b]);
}

#[test]
fn home_returns_to_root() {
    let Flat {
        mut net,
        root,
        a,
        b,
        c,
    } = flat();
    net.register_navigation(a);
    net.register_navigation(b);
    net.register_navigation(c);
    assert!(net.home());
    assert_eq!(net.history(), &[root]);
    for node in [a, b, c] {
        assert!(!net.store().is_shown(node));
    }
}

#[test]
fn untracked_navigation_leaves_history_alone() {
    let Flat {
        mut net, root, a, b, ..
    } = flat();
    net.register_navigation(a);
    assert!(net.register_untracked(b));
    assert!(net.store().is_shown(b));
    assert_eq!(net.untracked(), &[b]);
    assert_eq!(net.history(), &[root, a]);

    assert!(net.deregister_untracked(b));
    assert!(!net.store().is_shown(b));
    assert!(net.untracked().is_empty());
}

#[test]
fn hide_siblings_on_open() {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let s1 = tree.add_node(tree.root(), "S1", NodeConfig::PLAIN);
    let s2 = tree.add_node(tree.root(), "S2", NodeConfig::PLAIN);
    let x = tree.add_node(tree.root(), "X", NodeConfig::SCREEN);
    let mut net = Network::default();
    let lineage = net.prepare(&mut tree, None).unwrap();
    let [s1, s2, x] = [s1, s2, x].map(|c| lineage.node_for(c).unwrap());

    net.show(s1, false);
    net.show(s2, false);
    net.show(x, false);
    assert!(!net.store().is_shown(s1));
    assert!(!net.store().is_shown(s2));
    assert!(net.store().is_shown(x));
}

struct Relay {
    net: Network,
    lineage: Lineage<ContainerId>,
    q: ContainerId,
    p: ContainerId,
    n: ContainerId,
}

/// `Root > Q (passthrough) > P (passthrough) > N`.
fn relay() -> Relay {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let q = tree.add_passthrough(tree.root(), "Q");
    let p = tree.add_passthrough(q, "P");
    let n = tree.add_node(p, "N", NodeConfig::PLAIN);
    let mut net = Network::default();
    let lineage = net.prepare(&mut tree, None).unwrap();
    Relay {
        net,
        lineage,
        q,
        p,
        n,
    }
}

#[test]
fn passthrough_forwarding_is_transitive() {
    let Relay {
        mut net,
        lineage,
        q,
        p,
        n,
    } = relay();
    let [q, p, n] = [q, p, n].map(|c| lineage.node_for(c).unwrap());
    assert_eq!(net.store().kind(p), NodeKind::Passthrough);
    assert!(!net.store().is_shown(p));

    let log: Log = Rc::default();
    let _pp = listen(&mut net, p, "P", &log);
    let _pq = listen(&mut net, q, "Q", &log);

    net.show(n, false);
    assert!(net.store().is_shown(p));
    assert!(net.store().is_shown(q));
    assert_eq!(*log.borrow(), vec![("P", true), ("Q", true)]);

    log.borrow_mut().clear();
    net.hide(n, true);
    assert!(!net.store().is_shown(p));
    assert!(!net.store().is_shown(q));
    assert_eq!(*log.borrow(), vec![("P", false), ("Q", false)]);
}

#[test]
fn lineage_skips_passthrough() {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let pa = tree.add_passthrough(tree.root(), "PassthroughA");
    let x = tree.add_node(pa, "NodeX", NodeConfig::PLAIN);
    let mut net = Network::default();
    let lineage = net.prepare(&mut tree, None).unwrap();

    let root = lineage.root();
    let pa = lineage.node_for(pa).unwrap();
    let x = lineage.node_for(x).unwrap();
    let store = net.store();
    assert_eq!(store.parent(x), Some(root));
    assert_eq!(store.ancestor_passthrough(x), Some(pa));
    assert_eq!(store.children(root).collect::<Vec<_>>(), vec![x]);
    assert!(store.ids().all(|id| !store.children(id).any(|c| c == pa)));
    assert!(tree.is_active(tree.root()));
}

#[test]
fn show_transition_converges() {
    let Flat { mut net, a, .. } = flat();
    let meta = TransitionMeta::new(
        Duration::from_secs(1),
        TransitionValue::new(Point::ZERO, Vec2::new(100.0, 0.0), Easing::Linear, false),
    );
    net.propagate_transition(a, Direction::Show, Some(meta));
    net.register_navigation(a);

    assert_eq!(net.store().position(a), Point::new(0.0, 0.0));
    assert!(!net.store().is_interactable(a));

    net.advance(Duration::from_millis(500));
    assert_eq!(net.store().position(a), Point::new(50.0, 0.0));
    assert!(!net.store().is_interactable(a));

    net.advance(Duration::from_millis(500));
    assert_eq!(net.store().position(a), Point::new(100.0, 0.0));
    assert!(net.store().is_interactable(a));
    assert_eq!(net.runner().active_count(), 0);
}

#[test]
fn retriggered_transition_replaces_the_old_run() {
    let Flat { mut net, a, .. } = flat();
    let meta = TransitionMeta::fade_only(Duration::from_secs(1));
    net.propagate_transition(a, Direction::Show, Some(meta));
    net.propagate_transition(a, Direction::Hide, Some(meta));

    net.register_navigation(a);
    net.advance(Duration::from_millis(500));
    let mid = net.store().opacity(a);
    assert!((mid - 0.5).abs() < 1e-6);

    net.back();
    assert_eq!(net.runner().active_count(), 1);
    net.advance(Duration::from_millis(500));
    // The hide run fades from where the show run stopped.
    assert!((net.store().opacity(a) - 0.25).abs() < 1e-6);
    net.advance(Duration::from_millis(500));
    assert!(net.store().opacity(a).abs() < 1e-6);
    assert_eq!(net.runner().active_count(), 0);
}

#[test]
fn interrupted_hide_slide_does_not_strand_the_panel() {
    let Flat { mut net, a, .. } = flat();
    let slide = TransitionMeta::new(
        Duration::from_secs(1),
        TransitionValue::new(Point::ZERO, Vec2::new(100.0, 0.0), Easing::Linear, true),
    );
    net.register_navigation(a);
    net.propagate_transition(a, Direction::Hide, Some(slide));

    assert!(net.back());
    net.advance(Duration::from_millis(500));
    assert_eq!(net.store().position(a), Point::new(50.0, 0.0));

    // The show meta is instant and carries no position.
    assert!(net.register_navigation(a));
    assert!(net.store().is_shown(a));
    assert!((net.store().opacity(a) - 1.0).abs() < 1e-6);
    assert_eq!(net.store().position(a), Point::ZERO);
    assert_eq!(net.runner().active_count(), 0);
}

#[test]
fn prepare_with_nested_start() {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let menu = tree.add_node(tree.root(), "Menu", NodeConfig::PLAIN);
    let settings = tree.add_node(menu, "Settings", NodeConfig::PLAIN);
    let mut net = Network::default();
    let lineage = net.prepare(&mut tree, Some(settings)).unwrap();

    let root = lineage.root();
    let menu = lineage.node_for(menu).unwrap();
    let settings = lineage.node_for(settings).unwrap();
    assert_eq!(net.history(), &[root, settings]);
    assert_eq!(net.start(), Some(settings));
    assert!(net.store().is_shown(menu));
    assert!(net.store().is_shown(settings));
    assert!(net.back());
    assert_eq!(net.current(), Some(root));
}

#[test]
fn prepare_runs_once() {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let mut net = Network::default();
    net.prepare(&mut tree, None).unwrap();
    let err = net.prepare(&mut tree, None).unwrap_err();
    assert_eq!(err, LineageError::AlreadyPrepared);
}

#[test]
fn prepare_rejects_bad_configuration() {
    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let overlay = tree.add_passthrough(tree.root(), "Overlay");
    tree.set_image(overlay, true);
    let mut net = Network::default();
    let err = net.prepare(&mut tree, None).unwrap_err();
    assert!(matches!(err, LineageError::PassthroughWithImage { .. }));
    assert_eq!(err.to_string(), "passthrough container `Overlay` must not carry an image");

    let mut tree = SceneTree::new("Root", NodeConfig::PLAIN);
    let layout = tree.add_plain(tree.root(), "Layout");
    let err = Network::default().prepare(&mut tree, Some(layout)).unwrap_err();
    assert_eq!(
        err,
        LineageError::UnknownStart {
            name: "Layout".into()
        }
    );
}

#[derive(Default)]
struct Widgets {
    opacity: Vec<(NodeId, f32)>,
    interactable: Vec<(NodeId, bool)>,
}

impl Surface for Widgets {
    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        self.opacity.push((node, opacity));
    }
    fn set_anchored_position(&mut self, _node: NodeId, _position: Point) {}
    fn set_interactable(&mut self, node: NodeId, interactable: bool) {
        self.interactable.push((node, interactable));
    }
    fn set_raycast_blocking(&mut self, _node: NodeId, _blocking: bool) {}
}

#[test]
fn presenter_sees_navigation() {
    let Flat { mut net, a, .. } = flat();
    let mut presenter = SurfacePresenter::new(Widgets::default());
    net.present(&mut presenter);
    presenter.surface_mut().opacity.clear();

    net.register_navigation(a);
    net.present(&mut presenter);
    assert!(presenter.surface().opacity.contains(&(a, 1.0)));
    assert!(presenter.surface().interactable.contains(&(a, true)));

    let changes = net.evaluate();
    assert!(changes.is_empty());
}
