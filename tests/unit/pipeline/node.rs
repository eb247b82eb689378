use super::*;
use crate::random::context::RandomContext;
use crate::transform::core::FnTransform;

fn pass(name: &'static str) -> Node<u8> {
    Node::leaf(FnTransform::new(name, |x: u8, _: &mut RandomContext| Ok(x)))
}

#[test]
fn builders_set_kind_names() {
    assert_eq!(Node::<u8>::identity().kind_name(), "identity");
    assert_eq!(Node::sequential([pass("a")]).kind_name(), "sequential");
    assert_eq!(Node::sometimes(0.5, pass("a")).kind_name(), "sometimes");
    assert_eq!(Node::one_of([pass("a")]).kind_name(), "one_of");
    assert_eq!(Node::some_of([pass("a")], 1).kind_name(), "some_of");
    assert_eq!(pass("blur").kind_name(), "blur");
}

#[test]
fn modifiers_are_recorded() {
    let n = Node::some_of([pass("a"), pass("b")], 1..=2)
        .weighted(vec![1.0, 3.0])
        .with_replacement()
        .labeled("colour");
    assert_eq!(n.label(), Some("colour"));
    assert_eq!(n.weights.as_deref(), Some(&[1.0, 3.0][..]));
    assert!(n.replace);
    match n.kind {
        NodeKind::SomeOf { count, children } => {
            assert_eq!(count, Count::Range { min: 1, max: 2 });
            assert_eq!(children.len(), 2);
        }
        _ => panic!("expected some_of"),
    }
}

#[test]
fn count_accepts_number_or_pair() {
    let exact: Count = serde_json::from_str("3").unwrap();
    assert_eq!(exact, Count::Exact(3));
    let range: Count = serde_json::from_str("[1, 2]").unwrap();
    assert_eq!(range, Count::Range { min: 1, max: 2 });
    assert_eq!(serde_json::to_string(&range).unwrap(), "[1,2]");
    assert_eq!(range.max(), 2);
    assert!(serde_json::from_str::<Count>("-1").is_err());
}

#[test]
fn debug_shows_tree_shape() {
    let n = Node::sometimes(0.25, pass("flip")).labeled("maybe");
    let s = format!("{n:?}");
    assert!(s.contains("sometimes"));
    assert!(s.contains("maybe"));
    assert!(s.contains("flip"));
}
