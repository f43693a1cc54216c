use liuhe_data::models::Draw;
use liuhe_data::tags::{builtin_tags, TagCategory, TagStore};
use liuhe_ensemble::config::PredictConfig;
use liuhe_ensemble::ensemble::predict_all;
use liuhe_ensemble::models::grey::fit_gm11;
use liuhe_ensemble::models::hybrid::HybridModel;
use liuhe_ensemble::models::{Method, NumberModel};
use liuhe_ensemble::scoring::predict_basic;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn draw_strategy() -> impl Strategy<Value = Draw> {
    prop::sample::subsequence((1u8..=49).collect::<Vec<_>>(), 7)
        .prop_shuffle()
        .prop_map(|numbers| {
            let regular = [numbers[0], numbers[1], numbers[2], numbers[3], numbers[4], numbers[5]];
            Draw::new("prop", regular, numbers[6])
        })
}

fn history_strategy() -> impl Strategy<Value = Vec<Draw>> {
    prop::collection::vec(draw_strategy(), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_method_returns_valid_prediction(
        draws in history_strategy(),
        count in 1usize..=48,
        seed in any::<u64>(),
    ) {
        let store = TagStore::with_builtins();
        let config = PredictConfig::default().with_count(count);
        let mut rng = StdRng::seed_from_u64(seed);
        for method in Method::ALL {
            let pred = method.predict(&draws, &store, &config, &mut rng);
            prop_assert!(pred.is_valid(count), "{}: {:?}", method, pred);
        }
    }

    #[test]
    fn basic_scorer_is_deterministic(
        draws in history_strategy().prop_filter("non vide", |d| !d.is_empty()),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
    ) {
        let config = PredictConfig::default();
        let a = predict_basic(&draws, &config, &mut StdRng::seed_from_u64(seed_a));
        let b = predict_basic(&draws, &config, &mut StdRng::seed_from_u64(seed_b));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn hybrid_returns_exact_count(
        draws in history_strategy(),
        count in 1usize..=48,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = HybridModel::default().pick(&draws, count, &mut rng);
        prop_assert_eq!(picked.len(), count);
        prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(picked.iter().all(|&n| (1..=49).contains(&n)));
    }

    #[test]
    fn grey_intensity_is_clamped(bits in prop::collection::vec(0u8..=1, 0..=5)) {
        let seq: Vec<f64> = bits.iter().map(|&b| b as f64).collect();
        let intensity = fit_gm11(&seq).intensity();
        prop_assert!((0.1..=1.0).contains(&intensity), "{:?} → {}", seq, intensity);
        if bits.iter().all(|&b| b == 0) {
            prop_assert_eq!(intensity, 0.1);
        }
    }

    #[test]
    fn builtins_reapplied_keep_custom_labels(
        number in 1u8..=49,
        label in "[A-Za-z]{1,12}",
    ) {
        let mut store = TagStore::with_builtins();
        store.add_custom(number, &label).unwrap();
        store.apply_builtins();
        prop_assert!(store.tags_for(number).any(|t| t == label));
        for tag in builtin_tags(number) {
            prop_assert!(store.tags_for(number).any(|t| t == tag));
        }
        for category in TagCategory::ALL {
            prop_assert!(category.tag_for(number).is_some());
        }
    }

    #[test]
    fn ensemble_labels_bounded(draws in history_strategy(), seed in any::<u64>()) {
        let store = TagStore::with_builtins();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = predict_all(&draws, &store, &PredictConfig::default(), &mut rng);
        prop_assert_eq!(result.label_predictions.len(), 7);
        prop_assert!(result.label_predictions.values().all(|v| v.len() <= 3));
    }
}
