//! Pre-order tree searches.

use rscript_ast::Node;
use std::ops::ControlFlow;

/// Every node under `root`, `root` included, for which `predicate` holds,
/// in document order.
pub fn find_all<'a>(root: Node<'a>, mut predicate: impl FnMut(Node<'a>) -> bool) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    collect(root, &mut predicate, &mut found);
    found
}

fn collect<'a, P>(node: Node<'a>, predicate: &mut P, found: &mut Vec<Node<'a>>)
where
    P: FnMut(Node<'a>) -> bool,
{
    if predicate(node) {
        found.push(node);
    }
    for child in node.children() {
        collect(child, predicate, found);
    }
}

/// The first node in document order for which `predicate` holds.
///
/// The predicate is not called again once it has matched.
pub fn find_first<'a>(root: Node<'a>, mut predicate: impl FnMut(Node<'a>) -> bool) -> Option<Node<'a>> {
    match search(root, &mut predicate) {
        ControlFlow::Break(node) => Some(node),
        ControlFlow::Continue(()) => None,
    }
}

fn search<'a, P>(node: Node<'a>, predicate: &mut P) -> ControlFlow<Node<'a>>
where
    P: FnMut(Node<'a>) -> bool,
{
    if predicate(node) {
        return ControlFlow::Break(node);
    }
    node.for_each_child(|child| search(child, predicate))
}
