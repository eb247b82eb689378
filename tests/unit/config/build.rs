use super::*;
use crate::foundation::error::AugError;
use image::RgbaImage;
use serde_json::json;

fn build(config: Value) -> AugResult<Pipeline<RgbaImage>> {
    let config: PipelineConfig = serde_json::from_value(config).unwrap();
    Pipeline::from_config(&config, &Registry::builtin())
}

fn config_error(config: Value) -> String {
    match build(config) {
        Err(AugError::InvalidConfiguration(msg)) => msg,
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }
}

#[test]
fn builds_the_combinator_tree() {
    let p = build(json!({
        "root": {
            "kind": "sequential",
            "children": [
                { "kind": "sometimes", "params": { "p": 0.5 },
                  "children": [ { "kind": "flip_horizontal" } ] },
                { "kind": "one_of", "label": "turn", "params": { "weights": [1, 3] },
                  "children": [ { "kind": "rotate_left" }, { "kind": "rotate_right" } ] },
                { "kind": "some_of", "params": { "k": [0, 1], "replace": true },
                  "children": [ { "kind": "identity" } ] }
            ]
        }
    }))
    .unwrap();
    assert_eq!(
        p.kinds(),
        vec![
            "sequential",
            "sometimes",
            "flip_horizontal",
            "one_of",
            "rotate_left",
            "rotate_right",
            "some_of",
            "identity",
        ]
    );
    assert_eq!(p.label_of(crate::foundation::ids::NodeIdx(3)), Some("turn"));
}

#[test]
fn some_of_k_beyond_children_fails_construction() {
    let msg = config_error(json!({
        "root": { "kind": "some_of", "params": { "k": 5 },
                  "children": [ { "kind": "flip_horizontal" }, { "kind": "flip_vertical" },
                                { "kind": "rotate_left" } ] }
    }));
    assert!(msg.contains("$.root.params.k"), "unexpected message: {msg}");
}

#[test]
fn unknown_kinds_are_reported_with_path() {
    let msg = config_error(json!({
        "root": { "kind": "sequential", "children": [ { "kind": "warp" } ] }
    }));
    assert_eq!(msg, "$.root.children[0].kind: unknown node kind 'warp'");
}

#[test]
fn shape_problems_are_reported() {
    let msg = config_error(json!({
        "root": { "kind": "sometimes", "params": { "p": 0.5 } }
    }));
    assert!(msg.contains("$.root.children: 'sometimes' requires exactly 1 child(ren) (got 0)"));

    let msg = config_error(json!({
        "root": { "kind": "flip_horizontal", "children": [ { "kind": "identity" } ] }
    }));
    assert!(msg.contains("$.root.children"));

    let msg = config_error(json!({
        "root": { "kind": "sequential", "params": { "p": 1 } }
    }));
    assert!(msg.contains("$.root.params: 'sequential' takes no params"));
}

#[test]
fn param_problems_are_reported() {
    let msg = config_error(json!({
        "root": { "kind": "sometimes", "children": [ { "kind": "identity" } ] }
    }));
    assert!(msg.contains("$.root.params: missing field `p`"), "unexpected message: {msg}");

    let msg = config_error(json!({
        "root": { "kind": "random_crop", "params": { "width": 0, "height": 2 } }
    }));
    assert!(msg.starts_with("$.root.params: random_crop window must be non-empty"));

    let msg = config_error(json!({
        "root": { "kind": "gaussian_blur", "params": { "sigma": [-2, 1] } }
    }));
    assert!(msg.contains("invalid distribution"));
}

#[test]
fn every_problem_is_collected() {
    let msg = config_error(json!({
        "root": {
            "kind": "sequential",
            "children": [
                { "kind": "sometimes", "params": { "p": 2.0 },
                  "children": [ { "kind": "flip_horizontal" } ] },
                { "kind": "nope" },
                { "kind": "one_of", "params": { "weights": [1] },
                  "children": [ { "kind": "rotate_left" }, { "kind": "rotate_right" } ] }
            ]
        }
    }));
    assert_eq!(msg.lines().count(), 3, "unexpected message: {msg}");
    assert!(msg.contains("$.root.children[0].params.p"));
    assert!(msg.contains("$.root.children[1].kind"));
    assert!(msg.contains("$.root.children[2].params.weights"));
}
