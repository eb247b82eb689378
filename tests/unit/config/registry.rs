use super::*;
use crate::random::context::RandomContext;
use crate::transform::core::FnTransform;
use image::RgbaImage;
use serde_json::json;

#[test]
fn builtin_registry_lists_the_catalog() {
    let r = Registry::<RgbaImage>::builtin();
    assert_eq!(
        r.kinds().collect::<Vec<_>>(),
        vec![
            "brightness",
            "contrast",
            "flip_horizontal",
            "flip_vertical",
            "gaussian_blur",
            "random_crop",
            "rotate_left",
            "rotate_right",
        ]
    );
    for kind in RESERVED_KINDS {
        assert!(!r.contains(kind));
    }
}

#[test]
fn builtin_leaves_build_from_params() {
    let r = Registry::<RgbaImage>::builtin();
    let leaf = r
        .build_leaf("random_crop", &json!({ "width": 2, "height": 2 }))
        .unwrap()
        .unwrap();
    assert_eq!(leaf.name(), "random_crop");
    let leaf = r
        .build_leaf("brightness", &json!({ "delta": [-10, 10] }))
        .unwrap()
        .unwrap();
    assert_eq!(leaf.name(), "brightness");
    assert!(r.build_leaf("flip_horizontal", &json!({})).unwrap().is_ok());
    assert!(r.build_leaf("flip_horizontal", &Value::Null).unwrap().is_ok());
    assert!(r.build_leaf("unknown", &Value::Null).is_none());
}

#[test]
fn bad_leaf_params_are_errors() {
    let r = Registry::<RgbaImage>::builtin();
    let bad = [
        ("flip_vertical", json!({ "p": 1 })),
        ("random_crop", json!({ "width": 2 })),
        ("random_crop", json!({ "width": 0, "height": 2 })),
        ("gaussian_blur", json!({ "sigma": [-1, 1] })),
        ("contrast", json!({ "factor": "high" })),
    ];
    for (kind, params) in bad {
        assert!(
            r.build_leaf(kind, &params).unwrap().is_err(),
            "{kind} accepted {params}"
        );
    }
}

#[test]
fn reserved_and_empty_kinds_cannot_be_registered() {
    let mut r = Registry::<u8>::new();
    for kind in ["sometimes", ""] {
        let err = r
            .register(kind, |_: &Value| {
                Ok(Box::new(FnTransform::new("x", |x: u8, _: &mut RandomContext| Ok(x)))
                    as Box<dyn Transform<u8>>)
            })
            .unwrap_err();
        assert!(matches!(err, AugError::InvalidConfiguration(_)));
    }
}

#[test]
fn custom_kinds_register_with_params() {
    let mut r = Registry::<i64>::new();
    r.register("add", |params: &Value| {
        #[derive(serde::Deserialize)]
        struct AddParams {
            amount: i64,
        }
        let p: AddParams = parse_params(params)?;
        Ok(Box::new(FnTransform::new("add", move |x: i64, _: &mut RandomContext| {
            Ok(x + p.amount)
        })) as Box<dyn Transform<i64>>)
    })
    .unwrap();
    assert!(r.contains("add"));
    let leaf = r.build_leaf("add", &json!({ "amount": 3 })).unwrap().unwrap();
    let mut ctx = RandomContext::from_seed(0);
    ctx.enter("add", None, 0).unwrap();
    assert_eq!(leaf.apply(4, &mut ctx).unwrap(), 7);
    assert!(format!("{r:?}").contains("add"));
}
