use crate::error::PrepError;
use crate::prep::stats::{ConfidenceLevel, confidence_interval, mean, sample_std_dev};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_interval_of_one_to_five() {
    let ci = confidence_interval(&[1.0, 2.0, 3.0, 4.0, 5.0], ConfidenceLevel::DEFAULT);
    assert_eq!(ci.mean, Some(3.0));
    assert_eq!(ci.sample_size, 5);
    // t(0.975, 4) = 2.776, s = 1.5811
    assert!(approx(ci.lower.unwrap(), 1.0368), "lower = {:?}", ci.lower);
    assert!(approx(ci.upper.unwrap(), 4.9632), "upper = {:?}", ci.upper);
    assert!(approx(ci.half_width().unwrap(), 1.9632));
}

#[test]
fn test_single_value_has_no_bounds() {
    let ci = confidence_interval(&[7.5], ConfidenceLevel::DEFAULT);
    assert_eq!(ci.mean, Some(7.5));
    assert_eq!(ci.lower, None);
    assert_eq!(ci.upper, None);
    assert_eq!(ci.sample_size, 1);
    assert!(!ci.is_defined());
}

#[test]
fn test_empty_sample() {
    let ci = confidence_interval(&[], ConfidenceLevel::DEFAULT);
    assert_eq!(ci.mean, None);
    assert!(!ci.is_defined());
    assert_eq!(ci.sample_size, 0);
}

#[test]
fn test_constant_sample_collapses_to_the_mean() {
    let ci = confidence_interval(&[2.0, 2.0, 2.0], ConfidenceLevel::DEFAULT);
    assert_eq!(ci.lower, Some(2.0));
    assert_eq!(ci.upper, Some(2.0));
}

#[test]
fn test_bounds_bracket_the_mean_and_widen_with_level() {
    let values = [3.5, 4.25, 5.0, 2.0, 6.1, 1.2];
    let narrow = confidence_interval(&values, ConfidenceLevel::new(0.8).unwrap());
    let wide = confidence_interval(&values, ConfidenceLevel::new(0.99).unwrap());
    let m = narrow.mean.unwrap();

    assert!(narrow.lower.unwrap() <= m && m <= narrow.upper.unwrap());
    assert!(wide.lower.unwrap() < narrow.lower.unwrap());
    assert!(wide.upper.unwrap() > narrow.upper.unwrap());
}

#[test]
fn test_mean_and_std_dev() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0]), Some(1.5));
    assert_eq!(sample_std_dev(&[1.0]), None);
    assert!(approx(sample_std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 1.5811));
}

#[test]
fn test_confidence_level_validation() {
    assert!(ConfidenceLevel::new(0.9).is_ok());
    for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        assert!(matches!(
            ConfidenceLevel::new(bad),
            Err(PrepError::InvalidConfidenceLevel(_))
        ));
    }
    assert_eq!(ConfidenceLevel::default().value(), 0.95);
    assert_eq!(" 0.9 ".parse::<ConfidenceLevel>().unwrap().value(), 0.9);
    assert!("ninety".parse::<ConfidenceLevel>().is_err());
}

#[test]
fn test_confidence_level_deserialization_is_validated() {
    let ok: ConfidenceLevel = serde_json::from_str("0.9").unwrap();
    assert_eq!(ok.value(), 0.9);
    assert!(serde_json::from_str::<ConfidenceLevel>("1.2").is_err());
}

#[test]
fn test_mean_is_independent_of_value_order() {
    let forward = [0.1, 0.2, 0.3, 0.7, 1e-9];
    let mut backward = forward;
    backward.reverse();

    assert_eq!(mean(&forward), mean(&backward));
    assert_eq!(sample_std_dev(&forward), sample_std_dev(&backward));
    assert_eq!(
        confidence_interval(&forward, ConfidenceLevel::DEFAULT),
        confidence_interval(&backward, ConfidenceLevel::DEFAULT)
    );
}
