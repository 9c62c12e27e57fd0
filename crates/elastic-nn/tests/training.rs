use elastic_dist::{Counters, Lcss, Measure, Params, Sequence, Window};
use elastic_nn::{ClassifierConfig, Dataset, NnError, TrainingStrategy};

fn seq(values: [f64; 8], label: usize) -> Sequence {
    Sequence::new(values.to_vec(), label).unwrap()
}

/// Three bumps early and three bumps late, with small jitter.
fn train_set() -> Dataset {
    Dataset::from_sequences(vec![
        seq([0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0], 0),
        seq([0.1, 0.9, 2.2, 1.1, 0.0, 0.1, 0.0, 0.0], 0),
        seq([0.0, 0.0, 1.1, 2.0, 0.9, 0.0, 0.0, 0.1], 0),
        seq([0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0, 0.0], 1),
        seq([0.0, 0.1, 0.0, 0.0, 0.9, 2.1, 1.2, 0.1], 1),
        seq([0.0, 0.0, 0.0, 1.0, 2.0, 1.1, 0.0, 0.0], 1),
    ])
}

fn lcss_grid() -> Vec<Params> {
    [0.1, 0.5]
        .into_iter()
        .flat_map(|eps| (0..5).map(move |w| Params::Lcss(Lcss::new(Window::new(w), eps))))
        .collect()
}

fn lcss_config() -> ClassifierConfig {
    ClassifierConfig::new(Measure::Lcss).with_custom_grid(lcss_grid()).unwrap()
}

#[test]
fn end_to_end_lcss() {
    let train = train_set();
    let mut classifier = lcss_config().build();
    let result = classifier.train("bumps", &train).unwrap();

    assert_eq!(result.classifier, "lcss-eap-incremental");
    assert_eq!(result.param_accuracies.len(), 10);
    assert_eq!(result.param_ids, (0..10).collect::<Vec<_>>());
    assert!(result.param_accuracies.iter().all(|a| (0.0..=1.0).contains(a)));
    let best = result
        .param_accuracies
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let first_best = result.param_accuracies.iter().position(|&a| a == best).unwrap();
    assert_eq!(result.param_id, first_best);
    assert_eq!(result.accuracy, best);
    assert_eq!(result.size, 6);
    assert_eq!(result.predictions.len(), 6);

    let query = seq([0.0, 0.9, 2.0, 1.2, 0.1, 0.0, 0.0, 0.0], 0);
    let first = classifier.classify(&query, &mut Counters::new()).unwrap();
    assert!(matches!(first, Some(0 | 1)));
    assert_eq!(classifier.classify(&query, &mut Counters::new()).unwrap(), first);
}

#[test]
fn loocv_is_idempotent() {
    let train = train_set();
    let mut classifier = lcss_config().build();
    let a = classifier.train("bumps", &train).unwrap();
    let b = classifier.train("bumps", &train).unwrap();
    assert_eq!(a.param_id, b.param_id);
    assert_eq!(a.accuracy, b.accuracy);
    assert_eq!(a.param_accuracies, b.param_accuracies);
    assert_eq!(a.predictions, b.predictions);
    assert_eq!(a.counters, b.counters);
}

#[test]
fn strategies_and_eap_agree() {
    let train = train_set();
    let reference = lcss_config()
        .with_eap(false)
        .with_strategy(TrainingStrategy::PerParameter)
        .build()
        .train("bumps", &train)
        .unwrap();
    for strategy in [TrainingStrategy::Incremental, TrainingStrategy::PerParameter] {
        for eap in [true, false] {
            let result = lcss_config()
                .with_eap(eap)
                .with_strategy(strategy)
                .build()
                .train("bumps", &train)
                .unwrap();
            assert_eq!(result.param_accuracies, reference.param_accuracies);
            assert_eq!(result.param_id, reference.param_id);
            assert_eq!(result.predictions, reference.predictions);
        }
    }
}

#[test]
fn standard_grids_train_for_every_measure() {
    let train = train_set();
    let test = Dataset::from_sequences(vec![
        seq([0.0, 1.0, 2.1, 0.9, 0.0, 0.0, 0.0, 0.0], 0),
        seq([0.0, 0.0, 0.0, 0.1, 1.1, 1.9, 1.0, 0.0], 1),
    ]);
    for measure in Measure::ALL {
        let mut classifier = ClassifierConfig::new(measure).build();
        let result = classifier.train("bumps", &train).unwrap();
        assert_eq!(result.param_accuracies.len(), 100, "{measure}");
        assert!(result.param_id < 100);
        let tested = classifier.evaluate(&test).unwrap();
        assert_eq!(tested.size, 2);
        assert_eq!(tested.predictions.len(), 2);
        assert_eq!(tested.confusion.total(), 2);
        assert!(tested.counters.distance_calls > 0);
    }
}

#[test]
fn configuration_errors_surface_before_training() {
    assert!(matches!(
        ClassifierConfig::from_name("lcss-turbo"),
        Err(NnError::UnknownClassifier { .. })
    ));
    let mut c = ClassifierConfig::new(Measure::Twe).with_param_id(Some(100)).build();
    assert!(matches!(
        c.train("bumps", &train_set()),
        Err(NnError::InvalidParamId { param_id: 100, .. })
    ));
}

#[test]
fn results_serialise() {
    let mut classifier = lcss_config().build();
    let train = classifier.train("bumps", &train_set()).unwrap();
    let test = classifier.evaluate(&train_set()).unwrap();
    let train_json = serde_json::to_value(&train).unwrap();
    assert_eq!(train_json["problem"], "bumps");
    assert_eq!(train_json["param_accuracies"].as_array().unwrap().len(), 10);
    let test_json = serde_json::to_value(&test).unwrap();
    assert!(test_json["confusion"]["matrix"].is_array());
    assert!(test_json["counters"]["distance_calls"].as_u64().unwrap() > 0);
}
