//! Listener props end to end: registration, rebinding through the cached
//! invoker, and the stale-event guard.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use arbor::{
    create_renderer, Container, Event, MemoryDom, MemoryNode, Op, PropValue, Renderer, VNode,
};

fn setup() -> (MemoryDom, Renderer<MemoryDom>, Container<MemoryNode>) {
    let dom = MemoryDom::new();
    let renderer = create_renderer(dom.clone());
    let container = Container::new(dom.create_root());
    (dom, renderer, container)
}

/// An event stamped safely after everything the test has done so far.
fn click() -> Event {
    Event::at("click", Instant::now() + Duration::from_millis(1))
}

#[test]
fn click_reaches_the_handler() {
    let (dom, mut renderer, mut container) = setup();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();

    renderer.render(
        Some(VNode::element("button").on("click", move |_| counter.set(counter.get() + 1))),
        &mut container,
    );
    let ops = dom.take_ops();
    assert!(ops.contains(&Op::AddListener { id: 1, event: "click".to_string() }));

    let button = dom.children_of(*container.host())[0];
    dom.dispatch(button, &click());
    dom.dispatch(button, &click());
    assert_eq!(hits.get(), 2);
}

#[test]
fn events_from_before_the_handler_attached_are_dropped() {
    let (dom, mut renderer, mut container) = setup();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();

    let before_render = Instant::now();
    renderer.render(
        Some(VNode::element("button").on("click", move |_| counter.set(counter.get() + 1))),
        &mut container,
    );

    let button = dom.children_of(*container.host())[0];
    dom.dispatch(button, &Event::at("click", before_render));
    assert_eq!(hits.get(), 0);

    dom.dispatch(button, &click());
    assert_eq!(hits.get(), 1);
}

#[test]
fn rebinding_swaps_the_callback_without_touching_the_host() {
    let (dom, mut renderer, mut container) = setup();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let counter = first.clone();
    renderer.render(
        Some(VNode::element("button").on("click", move |_| counter.set(counter.get() + 1))),
        &mut container,
    );
    dom.take_ops();

    let counter = second.clone();
    renderer.render(
        Some(VNode::element("button").on("click", move |_| counter.set(counter.get() + 1))),
        &mut container,
    );
    // The invoker mutates in place; the host sees no listener churn.
    assert!(dom.take_ops().is_empty());

    let button = dom.children_of(*container.host())[0];
    dom.dispatch(button, &click());
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn unchanged_listener_prop_is_skipped() {
    let (dom, mut renderer, mut container) = setup();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let callback = PropValue::listener(move |_| counter.set(counter.get() + 1));

    renderer.render(
        Some(VNode::element("button").prop("onClick", callback.clone())),
        &mut container,
    );
    dom.take_ops();

    renderer.render(
        Some(VNode::element("button").prop("onClick", callback)),
        &mut container,
    );
    assert!(dom.take_ops().is_empty());

    let button = dom.children_of(*container.host())[0];
    dom.dispatch(button, &click());
    assert_eq!(hits.get(), 1);
}

#[test]
fn dropping_the_listener_prop_unregisters_it() {
    let (dom, mut renderer, mut container) = setup();

    renderer.render(
        Some(VNode::element("button").on("click", |_| {})),
        &mut container,
    );
    dom.take_ops();

    renderer.render(Some(VNode::element("button")), &mut container);
    assert_eq!(
        dom.take_ops(),
        [Op::RemoveListener { id: 1, event: "click".to_string() }]
    );

    let button = dom.children_of(*container.host())[0];
    assert!(!dom.has_listener(button, "click"));
}

#[test]
fn handler_lists_run_front_to_back() {
    let (dom, mut renderer, mut container) = setup();
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let push = |tag: &'static str| -> Rc<dyn Fn(&Event)> {
        let log = log.clone();
        Rc::new(move |_| log.borrow_mut().push(tag))
    };

    renderer.render(
        Some(
            VNode::element("button")
                .prop("onClick", PropValue::listeners(vec![push("first"), push("second")])),
        ),
        &mut container,
    );

    let button = dom.children_of(*container.host())[0];
    dom.dispatch(button, &click());
    assert_eq!(*log.borrow(), ["first", "second"]);
}

#[test]
fn unmounting_tears_the_listener_table_down() {
    let (dom, mut renderer, mut container) = setup();

    renderer.render(
        Some(VNode::element("button").on("click", |_| {})),
        &mut container,
    );
    let button = dom.children_of(*container.host())[0];
    dom.take_ops();

    renderer.render(None, &mut container);
    assert_eq!(dom.take_ops(), [Op::Remove { id: 1 }]);
    // The host keeps whatever bookkeeping it likes; the engine's own table
    // for the node is gone, so a fresh mount starts from scratch.
    assert!(dom.has_listener(button, "click"));
    assert_eq!(renderer.mounted_node_count(), 0);
}
