//! Keyed child reconciliation: matching by key, minimal movement, and
//! removal ordering.

use arbor::{create_renderer, Container, MemoryDom, MemoryNode, Op, Renderer, VNode};

fn setup() -> (MemoryDom, Renderer<MemoryDom>, Container<MemoryNode>) {
    let dom = MemoryDom::new();
    let renderer = create_renderer(dom.clone());
    let container = Container::new(dom.create_root());
    (dom, renderer, container)
}

fn keyed_list(keys: &[&str]) -> VNode {
    VNode::element("ul").children(
        keys.iter()
            .map(|key| VNode::element("li").key(*key).text_content(*key))
            .collect(),
    )
}

/// Tags of the list's children in host order, via their element text.
fn rendered_keys(dom: &MemoryDom, container: &Container<MemoryNode>) -> Vec<String> {
    let list = dom.children_of(*container.host())[0];
    dom.children_of(list)
        .into_iter()
        .map(|child| dom.text_of(child))
        .collect()
}

fn insert_count(ops: &[Op]) -> usize {
    ops.iter().filter(|op| matches!(op, Op::Insert { .. })).count()
}

fn has_churn(ops: &[Op]) -> bool {
    ops.iter().any(|op| {
        matches!(
            op,
            Op::CreateElement { .. } | Op::CreateText { .. } | Op::Remove { .. }
        )
    })
}

#[test]
fn rotation_moves_exactly_one_node() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b", "c"])), &mut container);
    dom.take_ops();

    // ul is host 1; a, b, c are hosts 2, 3, 4.
    renderer.render(Some(keyed_list(&["c", "a", "b"])), &mut container);
    assert_eq!(
        dom.take_ops(),
        [Op::Insert { id: 4, parent: 1, anchor: Some(2) }]
    );
    assert_eq!(rendered_keys(&dom, &container), ["c", "a", "b"]);
}

#[test]
fn swap_moves_one_of_the_two() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["b", "a"])), &mut container);
    let ops = dom.take_ops();
    assert_eq!(insert_count(&ops), 1);
    assert!(!has_churn(&ops));
    assert_eq!(rendered_keys(&dom, &container), ["b", "a"]);
}

#[test]
fn insert_at_head_anchors_before_the_old_head() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["b", "c"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["a", "b", "c"])), &mut container);
    assert_eq!(
        dom.take_ops(),
        [
            Op::CreateElement { id: 4, tag: "li".to_string() },
            Op::SetElementText { id: 4, text: "a".to_string() },
            Op::Insert { id: 4, parent: 1, anchor: Some(2) },
        ]
    );
    assert_eq!(rendered_keys(&dom, &container), ["a", "b", "c"]);
}

#[test]
fn insert_in_the_middle_lands_between_its_neighbors() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "c"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["a", "b", "c"])), &mut container);
    let ops = dom.take_ops();
    assert!(!ops.iter().any(|op| matches!(op, Op::Remove { .. })));
    assert_eq!(rendered_keys(&dom, &container), ["a", "b", "c"]);
}

#[test]
fn removal_from_the_middle_is_one_remove() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b", "c"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["a", "c"])), &mut container);
    assert_eq!(dom.take_ops(), [Op::Remove { id: 3 }]);
    assert_eq!(rendered_keys(&dom, &container), ["a", "c"]);
}

#[test]
fn stale_children_are_removed_in_old_list_order() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b", "c", "d"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["d", "a"])), &mut container);
    let ops = dom.take_ops();
    let removes: Vec<&Op> = ops
        .iter()
        .filter(|op| matches!(op, Op::Remove { .. }))
        .collect();
    // b then c, in the order they appeared.
    assert_eq!(removes, [&Op::Remove { id: 3 }, &Op::Remove { id: 4 }]);
    assert_eq!(rendered_keys(&dom, &container), ["d", "a"]);
}

#[test]
fn full_replacement_unmounts_then_mounts() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["x", "y"])), &mut container);
    let ops = dom.take_ops();
    assert_eq!(ops[..2], [Op::Remove { id: 2 }, Op::Remove { id: 3 }]);
    assert_eq!(rendered_keys(&dom, &container), ["x", "y"]);
    assert_eq!(renderer.mounted_node_count(), 3);
}

#[test]
fn reversal_keeps_one_node_still() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b", "c", "d"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&["d", "c", "b", "a"])), &mut container);
    let ops = dom.take_ops();
    assert_eq!(insert_count(&ops), 3);
    assert!(!has_churn(&ops));
    assert_eq!(rendered_keys(&dom, &container), ["d", "c", "b", "a"]);
}

#[test]
fn matched_children_patch_content_in_place() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(
        Some(VNode::element("ul").children(vec![
            VNode::element("li").key("a").text_content("one"),
            VNode::element("li").key("b").text_content("two"),
        ])),
        &mut container,
    );
    dom.take_ops();

    renderer.render(
        Some(VNode::element("ul").children(vec![
            VNode::element("li").key("b").text_content("TWO"),
            VNode::element("li").key("a").text_content("one"),
        ])),
        &mut container,
    );
    let ops = dom.take_ops();
    assert!(ops.contains(&Op::SetElementText { id: 3, text: "TWO".to_string() }));
    assert_eq!(insert_count(&ops), 1);
    assert_eq!(rendered_keys(&dom, &container), ["TWO", "one"]);
}

#[test]
fn keyed_fragments_move_all_their_hosts() {
    let (dom, mut renderer, mut container) = setup();
    let pair = |key: &str, x: &str, y: &str| {
        VNode::fragment(vec![VNode::text(x), VNode::text(y)]).key(key)
    };

    renderer.render(
        Some(VNode::element("div").children(vec![pair("p", "a", "b"), pair("q", "c", "d")])),
        &mut container,
    );
    dom.take_ops();

    renderer.render(
        Some(VNode::element("div").children(vec![pair("q", "c", "d"), pair("p", "a", "b")])),
        &mut container,
    );
    let ops = dom.take_ops();
    assert_eq!(insert_count(&ops), 2);
    assert!(!has_churn(&ops));

    let div = dom.children_of(*container.host())[0];
    let texts: Vec<String> = dom
        .children_of(div)
        .into_iter()
        .map(|child| dom.text_of(child))
        .collect();
    assert_eq!(texts, ["c", "d", "a", "b"]);
}

#[test]
fn empty_list_transitions() {
    let (dom, mut renderer, mut container) = setup();
    renderer.render(Some(keyed_list(&["a", "b"])), &mut container);
    dom.take_ops();

    renderer.render(Some(keyed_list(&[])), &mut container);
    assert_eq!(dom.take_ops(), [Op::Remove { id: 2 }, Op::Remove { id: 3 }]);

    renderer.render(Some(keyed_list(&["a"])), &mut container);
    let ops = dom.take_ops();
    assert_eq!(insert_count(&ops), 1);
    assert_eq!(rendered_keys(&dom, &container), ["a"]);
}
