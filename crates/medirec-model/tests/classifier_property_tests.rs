use medirec_index::FeatureVector;
use medirec_model::{Classifier, LinearOneVsOne, LinearOneVsRest};
use proptest::prelude::*;

const WIDTH: usize = 12;

fn coefficients(rows: usize) -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<f64>)> {
    (
        proptest::collection::vec(proptest::collection::vec(-3.0f64..3.0, WIDTH), rows),
        proptest::collection::vec(-1.0f64..1.0, rows),
    )
}

fn features() -> impl Strategy<Value = FeatureVector> {
    proptest::collection::vec(0..WIDTH, 0..WIDTH)
        .prop_map(|positions| FeatureVector::from_positions(WIDTH, positions))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn one_vs_rest_always_emits_a_known_class(
        (weights, intercepts) in coefficients(5),
        x in features(),
    ) {
        let m = LinearOneVsRest { classes: vec![10, 11, 12, 13, 14], weights, intercepts };
        prop_assert!(m.validate().is_ok());
        let first = m.predict(&x).unwrap();
        prop_assert!(m.classes().contains(&first));
        prop_assert_eq!(m.predict(&x).unwrap(), first);
    }

    #[test]
    fn one_vs_one_always_emits_a_known_class(
        (weights, intercepts) in coefficients(LinearOneVsOne::pair_count(4)),
        x in features(),
    ) {
        let m = LinearOneVsOne { classes: vec![3, 1, 4, 0], weights, intercepts };
        prop_assert!(m.validate().is_ok());
        let votes = m.votes(&x).unwrap();
        prop_assert_eq!(votes.iter().sum::<u32>() as usize, LinearOneVsOne::pair_count(4));
        let first = m.predict(&x).unwrap();
        prop_assert!(m.classes().contains(&first));
        prop_assert_eq!(m.predict(&x).unwrap(), first);
    }
}
