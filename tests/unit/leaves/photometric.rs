use super::*;
use crate::trace::record::ParamValue;
use crate::transform::core::apply_traced;
use image::{Rgba, RgbaImage};

fn grey(v: u8) -> RgbaImage {
    RgbaImage::from_pixel(3, 3, Rgba([v, v, v, 255]))
}

#[test]
fn constant_brightness_draws_nothing() {
    let leaf = Brightness::new(Distribution::Constant(10.0)).unwrap();
    let mut ctx = RandomContext::from_seed(0);
    let (out, record) = apply_traced(&leaf, grey(50), &mut ctx, None, 0).unwrap();
    assert!(record.is_empty());
    assert_eq!(out.get_pixel(1, 1), &Rgba([60, 60, 60, 255]));
}

#[test]
fn sampled_brightness_is_recorded_and_applied() {
    let leaf = Brightness::new(Distribution::uniform(-20.0, 20.0)).unwrap();
    let mut ctx = RandomContext::from_seed(5);
    let (out, record) = apply_traced(&leaf, grey(100), &mut ctx, None, 0).unwrap();
    let delta = record.get("delta").and_then(|v| v.as_float()).unwrap();
    assert!((-20.0..20.0).contains(&delta));
    let expected = (100 + delta.round() as i32) as u8;
    assert_eq!(out.get_pixel(0, 0)[0], expected);
}

#[test]
fn contrast_records_factor() {
    let leaf = Contrast::new(Distribution::Choice {
        values: vec![25.0],
        weights: None,
    })
    .unwrap();
    let mut ctx = RandomContext::from_seed(1);
    let (_, record) = apply_traced(&leaf, grey(10), &mut ctx, None, 0).unwrap();
    assert_eq!(record.get("factor"), Some(ParamValue::Index(0)));
}

#[test]
fn blur_of_a_flat_image_is_flat() {
    let leaf = GaussianBlur::new(Distribution::uniform(0.5, 1.5)).unwrap();
    let mut ctx = RandomContext::from_seed(2);
    let (out, record) = apply_traced(&leaf, grey(80), &mut ctx, None, 0).unwrap();
    assert!(record.get("sigma").is_some());
    assert_eq!(out.dimensions(), (3, 3));
    let px = out.get_pixel(1, 1)[0];
    assert!((79..=81).contains(&px), "unexpected pixel {px}");
}

#[test]
fn negative_sigma_is_rejected() {
    let err = GaussianBlur::new(Distribution::uniform(-1.0, 1.0)).unwrap_err();
    assert!(matches!(err, AugError::InvalidDistribution(_)));
    assert!(Brightness::new(Distribution::uniform(2.0, 1.0)).is_err());
}

#[test]
fn params_parse_from_json() {
    let b: Brightness = serde_json::from_str(r#"{"delta": [-5, 5]}"#).unwrap();
    assert_eq!(b.delta, Distribution::uniform(-5.0, 5.0));
    assert!(serde_json::from_str::<Contrast>(r#"{"factor": 1, "extra": 2}"#).is_err());
}
