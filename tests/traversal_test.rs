//! Tests for lazy traversals: order, restartability, reverse and pruning

use std::collections::HashSet;

use rstest::{fixture, rstest};

use lighttree::{Order, Tree, TreeNode};

/// r
/// ├── a
/// │   ├── a1
/// │   └── a2
/// └── b
///     └── b1
#[fixture]
fn tree() -> Tree<u32> {
    let mut tree = Tree::new();
    tree.insert(None, "r", 0).unwrap();
    tree.insert(Some("r"), "a", 1).unwrap();
    tree.insert(Some("a"), "a1", 11).unwrap();
    tree.insert(Some("a"), "a2", 12).unwrap();
    tree.insert(Some("r"), "b", 2).unwrap();
    tree.insert(Some("b"), "b1", 21).unwrap();
    tree
}

fn ids<'a>(nodes: impl Iterator<Item = &'a TreeNode<u32>>) -> Vec<String> {
    nodes.map(|node| node.id().to_string()).collect()
}

#[rstest]
#[case(Order::PreOrder, vec!["r", "a", "a1", "a2", "b", "b1"])]
#[case(Order::PostOrder, vec!["a1", "a2", "a", "b1", "b", "r"])]
#[case(Order::BreadthFirst, vec!["r", "a", "b", "a1", "a2", "b1"])]
fn given_tree_when_traversing_then_expected_order(tree: Tree<u32>, #[case] order: Order, #[case] expected: Vec<&str>) {
    assert_eq!(ids(tree.traverse(order)), expected);
}

#[rstest]
#[case(Order::PreOrder, vec!["r", "b", "b1", "a", "a2", "a1"])]
#[case(Order::PostOrder, vec!["b1", "b", "a2", "a1", "a", "r"])]
#[case(Order::BreadthFirst, vec!["r", "b", "a", "b1", "a2", "a1"])]
fn given_reverse_when_traversing_then_children_last_to_first(
    tree: Tree<u32>,
    #[case] order: Order,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(ids(tree.traverse(order).reverse()), expected);
}

#[test]
fn given_root_with_two_children_when_breadth_first_then_root_then_children() {
    let mut tree = Tree::new();
    tree.insert(None, "r", ()).unwrap();
    tree.insert(Some("r"), "a", ()).unwrap();
    tree.insert(Some("r"), "b", ()).unwrap();

    let visited: Vec<&str> = tree
        .traverse(Order::BreadthFirst)
        .map(|node| node.id().as_str())
        .collect();

    assert_eq!(visited, vec!["r", "a", "b"]);
}

#[rstest]
fn given_pre_order_then_each_node_once_and_parent_first(tree: Tree<u32>) {
    let visited = ids(tree.traverse(Order::PreOrder));

    let unique: HashSet<&String> = visited.iter().collect();
    assert_eq!(unique.len(), tree.len());
    assert_eq!(visited.len(), tree.len());
    for id in &visited {
        if let Some(parent) = tree.parent_id(id).unwrap() {
            let parent_pos = visited.iter().position(|v| v == parent.as_str()).unwrap();
            let pos = visited.iter().position(|v| v == id).unwrap();
            assert!(parent_pos < pos, "{} visited before its parent", id);
        }
    }
}

#[rstest]
fn given_partially_consumed_walk_when_cloned_then_clone_continues_independently(tree: Tree<u32>) {
    let mut walk = tree.traverse(Order::PreOrder);
    walk.next();
    walk.next();

    let rest: Vec<String> = ids(walk.clone());

    assert_eq!(rest, vec!["a1", "a2", "b", "b1"]);
    assert_eq!(ids(walk), rest);
}

#[rstest]
fn given_consumed_walk_when_restarted_then_yields_everything_again(tree: Tree<u32>) {
    let mut walk = tree.traverse(Order::PostOrder);
    let first: Vec<String> = ids(walk.by_ref());

    walk.restart();

    assert_eq!(ids(walk), first);
}

#[rstest]
fn given_start_node_when_traversing_then_only_subtree(tree: Tree<u32>) {
    assert_eq!(ids(tree.traverse_from("a", Order::PostOrder).unwrap()), vec!["a1", "a2", "a"]);
    assert!(tree.traverse_from("missing", Order::PreOrder).is_err());
}

#[rstest]
#[case(Order::PreOrder, vec!["r", "b", "b1"])]
#[case(Order::PostOrder, vec!["b1", "b", "r"])]
#[case(Order::BreadthFirst, vec!["r", "b", "b1"])]
fn given_prune_predicate_when_traversing_then_failing_subtrees_skipped(
    tree: Tree<u32>,
    #[case] order: Order,
    #[case] expected: Vec<&str>,
) {
    let keep = |node: &TreeNode<u32>| node.id().as_str() != "a";

    assert_eq!(ids(tree.traverse(order).prune(&keep)), expected);
}

#[test]
fn given_forest_when_traversing_then_roots_in_insertion_order() {
    let mut tree = Tree::new();
    tree.insert(None, "r1", 1).unwrap();
    tree.insert(None, "r2", 2).unwrap();
    tree.insert(Some("r1"), "x", 3).unwrap();

    assert_eq!(ids(tree.traverse(Order::PreOrder)), vec!["r1", "x", "r2"]);
    assert_eq!(ids(tree.traverse(Order::BreadthFirst)), vec!["r1", "r2", "x"]);
}

#[test]
fn given_empty_tree_when_traversing_then_nothing() {
    let tree: Tree<u32> = Tree::new();
    assert_eq!(tree.traverse(Order::BreadthFirst).count(), 0);
    assert_eq!((&tree).into_iter().count(), 0);
}
