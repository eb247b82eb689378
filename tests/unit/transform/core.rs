use super::*;
use crate::foundation::error::AugError;
use crate::random::sampler::sample_uniform;

#[derive(Debug)]
struct AddNoise;

impl Transform<f64> for AddNoise {
    fn name(&self) -> &str {
        "add_noise"
    }

    fn apply(&self, image: f64, ctx: &mut RandomContext) -> AugResult<f64> {
        Ok(image + sample_uniform(ctx, "noise", 0.0, 1.0)?)
    }
}

#[test]
fn apply_traced_returns_the_sampled_record() {
    let mut ctx = RandomContext::from_seed(3);
    let (out, record) = apply_traced(&AddNoise, 10.0, &mut ctx, None, 0).unwrap();
    let noise = record.get("noise").and_then(|v| v.as_float()).unwrap();
    assert_eq!(out, 10.0 + noise);

    let node = ctx.close().unwrap();
    assert_eq!(node.kind(), "add_noise");
    assert_eq!(node.record(), &record);
}

#[test]
fn identical_seeds_give_identical_outputs() {
    let run = |seed| {
        let mut ctx = RandomContext::from_seed(seed);
        apply_traced(&AddNoise, 0.0, &mut ctx, None, 0).unwrap()
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn closures_are_transforms() {
    let halve = FnTransform::new("halve", |x: f64, _: &mut RandomContext| Ok(x / 2.0));
    let mut ctx = RandomContext::from_seed(0);
    let (out, record) = apply_traced(&halve, 8.0, &mut ctx, Some("h"), 2).unwrap();
    assert_eq!(out, 4.0);
    assert!(record.is_empty());
    let node = ctx.close().unwrap();
    assert_eq!((node.label(), node.branch()), (Some("h"), 2));
    assert!(format!("{halve:?}").contains("halve"));
}

#[test]
fn leaf_errors_propagate_unchanged() {
    let reject = FnTransform::new("reject", |_: f64, _: &mut RandomContext| {
        Err(AugError::shape_mismatch("needs 3 channels"))
    });
    let mut ctx = RandomContext::from_seed(0);
    let err = apply_traced(&reject, 1.0, &mut ctx, None, 0).unwrap_err();
    assert!(matches!(err, AugError::ShapeMismatch(_)));
}
