use super::*;

#[test]
fn json_forms_parse() {
    let c: Distribution = serde_json::from_str("0.5").unwrap();
    assert_eq!(c, Distribution::Constant(0.5));

    let r: Distribution = serde_json::from_str("[-2.0, 2.0]").unwrap();
    assert_eq!(r, Distribution::uniform(-2.0, 2.0));

    let b: Distribution = serde_json::from_str(r#"{"low": 1, "high": 3}"#).unwrap();
    assert_eq!(b, Distribution::uniform(1.0, 3.0));

    let ch: Distribution =
        serde_json::from_str(r#"{"choice": [0.5, 1.0], "weights": [3, 1]}"#).unwrap();
    assert_eq!(
        ch,
        Distribution::Choice {
            values: vec![0.5, 1.0],
            weights: Some(vec![3.0, 1.0]),
        }
    );

    assert!(serde_json::from_str::<Distribution>(r#""wide""#).is_err());
}

#[test]
fn validation_catches_bad_bounds() {
    assert!(Distribution::uniform(0.0, 1.0).validate().is_ok());
    assert!(Distribution::uniform(1.0, 0.0).validate().is_err());
    assert!(
        Distribution::Choice {
            values: vec![],
            weights: None
        }
        .validate()
        .is_err()
    );
    assert!(
        Distribution::Choice {
            values: vec![1.0, 2.0],
            weights: Some(vec![1.0]),
        }
        .validate()
        .is_err()
    );
    assert!(Distribution::Constant(f64::INFINITY).validate().is_err());
    assert!(
        Distribution::Choice {
            values: vec![1.0, 2.0],
            weights: Some(vec![f64::MAX, f64::MAX]),
        }
        .validate()
        .is_err()
    );
}

#[test]
fn constant_draws_nothing() {
    let mut ctx = RandomContext::from_seed(1);
    ctx.enter("leaf", None, 0).unwrap();
    assert_eq!(Distribution::Constant(3.0).sample(&mut ctx, "v").unwrap(), 3.0);
    assert!(ctx.exit().unwrap().is_empty());
}

#[test]
fn choice_returns_one_of_the_values() {
    let dist = Distribution::Choice {
        values: vec![0.25, 4.0],
        weights: None,
    };
    let mut ctx = RandomContext::from_seed(8);
    ctx.enter("leaf", None, 0).unwrap();
    for _ in 0..50 {
        let v = dist.sample(&mut ctx, "v").unwrap();
        assert!(v == 0.25 || v == 4.0);
    }
    assert_eq!(dist.min_value(), 0.25);
}

#[test]
fn serializes_to_the_accepted_forms() {
    assert_eq!(serde_json::to_string(&Distribution::Constant(2.0)).unwrap(), "2.0");
    assert_eq!(
        serde_json::to_string(&Distribution::uniform(-1.0, 1.0)).unwrap(),
        "[-1.0,1.0]"
    );
    let ch = Distribution::Choice {
        values: vec![1.0],
        weights: None,
    };
    assert_eq!(serde_json::to_string(&ch).unwrap(), r#"{"choice":[1.0]}"#);
}
