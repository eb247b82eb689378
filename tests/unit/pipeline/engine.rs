use super::*;
use crate::foundation::error::AugError;
use crate::pipeline::node::Node;
use crate::random::sampler::sample_uniform;
use crate::trace::record::ParamValue;
use crate::trace::tree::TraceNode;
use crate::transform::core::FnTransform;

fn add(name: &'static str, amount: i64) -> Node<i64> {
    Node::leaf(FnTransform::new(name, move |x: i64, _: &mut RandomContext| {
        Ok(x + amount)
    }))
}

fn jitter() -> Node<i64> {
    Node::leaf(FnTransform::new("jitter", |x: i64, ctx: &mut RandomContext| {
        let d = sample_uniform(ctx, "d", 0.0, 1000.0)?;
        Ok(x + d as i64)
    }))
}

fn eval(root: Node<i64>, image: i64, seed: u64) -> (i64, TraceNode) {
    let p = Pipeline::new(root).unwrap();
    let mut ctx = RandomContext::from_seed(seed);
    let out = eval_node(&p, p.root(), image, &mut ctx, 0).unwrap();
    (out, ctx.close().unwrap())
}

#[test]
fn sequential_threads_the_image_in_order() {
    let root = Node::sequential([
        Node::leaf(FnTransform::new("double", |x: i64, _: &mut RandomContext| Ok(x * 2))),
        add("plus3", 3),
    ]);
    let (out, trace) = eval(root, 5, 0);
    assert_eq!(out, 13);
    assert_eq!(trace.kinds(), vec!["sequential", "double", "plus3"]);
    let branches: Vec<u32> = trace.children().iter().map(TraceNode::branch).collect();
    assert_eq!(branches, vec![0, 1]);
}

#[test]
fn empty_sequential_records_an_empty_node() {
    let (out, trace) = eval(Node::sequential(Vec::new()), 7, 0);
    assert_eq!(out, 7);
    assert_eq!(trace, TraceNode::new("sequential", 0));
}

#[test]
fn identity_draws_nothing() {
    let (out, trace) = eval(Node::identity(), 9, 0);
    assert_eq!(out, 9);
    assert!(trace.record().is_empty());
}

#[test]
fn sometimes_records_the_outcome() {
    let (out, trace) = eval(Node::sometimes(1.0, add("a", 1)), 0, 4);
    assert_eq!(out, 1);
    assert_eq!(trace.record().get("applied"), Some(ParamValue::Bool(true)));
    assert_eq!(trace.children().len(), 1);

    let (out, trace) = eval(Node::sometimes(0.0, add("a", 1)), 0, 4);
    assert_eq!(out, 0);
    assert_eq!(trace.record().get("applied"), Some(ParamValue::Bool(false)));
    assert!(trace.children().is_empty());
}

#[test]
fn one_of_with_single_child_still_draws() {
    let (out, trace) = eval(Node::one_of([add("only", 2)]), 0, 11);
    assert_eq!(out, 2);
    assert_eq!(trace.record().get("index"), Some(ParamValue::Index(0)));
    assert_eq!(trace.children()[0].branch(), 0);
}

#[test]
fn one_of_child_branch_is_the_chosen_index() {
    let root = Node::one_of_weighted([add("a", 1), add("b", 10), add("c", 100)], vec![0.0, 0.0, 1.0]);
    let (out, trace) = eval(root, 0, 5);
    assert_eq!(out, 100);
    assert_eq!(trace.children()[0].branch(), 2);
    assert_eq!(trace.children()[0].kind(), "c");
}

#[test]
fn some_of_applies_picks_in_draw_order() {
    let root = Node::some_of([add("a", 1), add("b", 10), add("c", 100)], 3);
    let (out, trace) = eval(root, 0, 21);
    assert_eq!(out, 111);

    let picks: Vec<u32> = trace
        .record()
        .get_all("pick")
        .map(|v| v.as_index().unwrap())
        .collect();
    assert_eq!(picks.len(), 3);
    let mut sorted = picks.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2]);

    let names = ["a", "b", "c"];
    for (slot, child) in trace.children().iter().enumerate() {
        assert_eq!(child.branch(), slot as u32);
        assert_eq!(child.kind(), names[picks[slot] as usize]);
    }
}

#[test]
fn some_of_range_draws_k_first() {
    let root = Node::some_of([add("a", 1), add("b", 1)], 1..=2);
    let (_, trace) = eval(root, 0, 8);
    let entries = trace.record().entries();
    assert_eq!(entries[0].name, "k");
    let k = entries[0].value.as_int().unwrap();
    assert!((1..=2).contains(&k));
    assert_eq!(trace.children().len(), k as usize);
}

#[test]
fn branch_children_do_not_advance_the_parent_stream() {
    // The leaf after the branch sees the same value whether or not the branch
    // child drew anything.
    let with_draw = Node::sequential([Node::sometimes(1.0, jitter()), jitter()]);
    let without_draw = Node::sequential([Node::sometimes(1.0, add("a", 0)), jitter()]);
    let (_, t1) = eval(with_draw, 0, 99);
    let (_, t2) = eval(without_draw, 0, 99);
    assert_eq!(t1.children()[1].record(), t2.children()[1].record());
}

#[test]
fn leaf_errors_abort_evaluation() {
    let root = Node::sequential([
        add("a", 1),
        Node::leaf(FnTransform::new("bad", |_: i64, _: &mut RandomContext| {
            Err(AugError::shape_mismatch("odd input"))
        })),
    ]);
    let p = Pipeline::new(root).unwrap();
    let mut ctx = RandomContext::from_seed(0);
    let err = eval_node(&p, p.root(), 0, &mut ctx, 0).unwrap_err();
    assert!(matches!(err, AugError::ShapeMismatch(_)));
}
