use liuhe_data::models::Draw;
use liuhe_data::tags::{TagCategory, TagStore};
use liuhe_ensemble::config::PredictConfig;
use liuhe_ensemble::ensemble::predict_all;
use liuhe_ensemble::models::Method;
use liuhe_ensemble::scoring::predict_basic;
use liuhe_ensemble::tag_predictor::predict_labels;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn identical_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| Draw::new(format!("2024{:03}", i + 1), [1, 2, 3, 4, 5, 6], 7))
        .collect()
}

#[test]
fn identical_history_basic_scorer() {
    let draws = identical_draws(20);
    let mut rng = StdRng::seed_from_u64(42);
    let pred = predict_basic(&draws, &PredictConfig::default(), &mut rng);
    assert_eq!(pred.regular, vec![1, 2, 3, 4, 5, 6]);
    // Seul 7 a un score spécial non nul : pas d'alternative, répétition admise
    assert_eq!(pred.special, 7);
}

#[test]
fn identical_history_with_alternative_special() {
    let mut draws = identical_draws(19);
    draws.insert(0, Draw::new("2023999", [1, 2, 3, 4, 5, 6], 9));
    let mut rng = StdRng::seed_from_u64(42);
    let pred = predict_basic(&draws, &PredictConfig::default(), &mut rng);
    assert_eq!(pred.regular, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(pred.special, 9);
}

#[test]
fn empty_history_every_method_valid() {
    let store = TagStore::with_builtins();
    let config = PredictConfig::default();
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        for method in Method::ALL {
            let pred = method.predict(&[], &store, &config, &mut rng);
            assert!(pred.is_valid(config.count), "{method}: {pred:?}");
        }
    }
}

#[test]
fn empty_history_orchestrator() {
    let store = TagStore::with_builtins();
    let mut rng = StdRng::seed_from_u64(0);
    let result = predict_all(&[], &store, &PredictConfig::default(), &mut rng);
    assert!(result.primary.is_valid(6));
    assert_eq!(result.method_results.len(), 6);
    for category in TagCategory::ALL {
        assert!(result.label_predictions[&category].is_empty());
    }
}

#[test]
fn identical_history_labels() {
    let labels = predict_labels(&identical_draws(20), Some(10), &PredictConfig::default().label_weights);
    assert_eq!(labels[&TagCategory::Zodiac], vec!["pig"]);
    assert_eq!(labels[&TagCategory::Element], vec!["wood"]);
    assert_eq!(labels[&TagCategory::Tail], vec!["7-tail"]);
    assert_eq!(labels[&TagCategory::Magnitude], vec!["small"]);
}

#[test]
fn history_roundtrips_through_json() {
    let draws = identical_draws(3);
    let json = serde_json::to_string(&draws).unwrap();
    let restored: Vec<Draw> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, draws);
}
