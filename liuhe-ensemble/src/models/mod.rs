pub mod bayes;
pub mod grey;
pub mod hybrid;
pub mod markov;
pub mod time_decay;

use rand::Rng;
use serde::{Deserialize, Serialize};

use liuhe_data::models::{Draw, Prediction};
use liuhe_data::tags::TagStore;

use crate::config::PredictConfig;
use crate::scoring::{predict_basic, tag_trend::predict_with_tags};

/// Modèle qui choisit des numéros réguliers par tirage aléatoire guidé.
pub trait NumberModel {
    /// draws : du plus ancien au plus récent. Retourne `count` numéros distincts triés.
    fn pick(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Basic,
    Tags,
    Markov,
    Bayes,
    TimeDecay,
    Grey,
    Hybrid,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Basic,
        Method::Tags,
        Method::Markov,
        Method::Bayes,
        Method::TimeDecay,
        Method::Grey,
        Method::Hybrid,
    ];

    /// Méthodes détaillées par l'orchestrateur (l'hybride reste disponible seul).
    pub const BREAKDOWN: [Method; 6] = [
        Method::Basic,
        Method::Tags,
        Method::Markov,
        Method::Bayes,
        Method::TimeDecay,
        Method::Grey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Basic => "Basic",
            Method::Tags => "Tags",
            Method::Markov => "Markov",
            Method::Bayes => "Bayes",
            Method::TimeDecay => "TimeDecay",
            Method::Grey => "Grey",
            Method::Hybrid => "Hybrid",
        }
    }

    pub fn predict(
        &self,
        draws: &[Draw],
        tags: &TagStore,
        config: &PredictConfig,
        rng: &mut impl Rng,
    ) -> Prediction {
        let count = config.count;
        match self {
            Method::Basic => predict_basic(draws, config, rng),
            Method::Tags => predict_with_tags(draws, tags, config, rng),
            Method::Markov => {
                let model = markov::MarkovModel::new(config.markov_order);
                with_hybrid_special(draws, model.pick(draws, count, rng), config, rng)
            }
            Method::Bayes => {
                let model = bayes::BayesModel::new();
                with_hybrid_special(draws, model.pick(draws, count, rng), config, rng)
            }
            Method::TimeDecay => {
                let model = time_decay::TimeDecayModel::default();
                with_hybrid_special(draws, model.pick(draws, count, rng), config, rng)
            }
            Method::Grey => grey::GreyModel::default().predict(draws, count, rng),
            Method::Hybrid => {
                let model = hybrid::HybridModel::new(config.markov_order);
                with_hybrid_special(draws, model.pick(draws, count, rng), config, rng)
            }
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn with_hybrid_special(
    draws: &[Draw],
    regular: Vec<u8>,
    config: &PredictConfig,
    rng: &mut impl Rng,
) -> Prediction {
    let special = hybrid::pick_special(draws, &regular, config.markov_order, rng);
    Prediction::new(regular, special.number())
}

/// Poids strictement positifs → distribution normalisée (uniforme si tout est nul).
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
    if total > 0.0 {
        weights
            .iter()
            .map(|&w| if w.is_finite() && w > 0.0 { w / total } else { 0.0 })
            .collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    }
}

#[cfg(test)]
pub(crate) fn validate_distribution(dist: &[f64]) -> bool {
    if dist.len() != liuhe_data::models::POOL_SIZE {
        return false;
    }
    if dist.iter().any(|&p| p < 0.0) {
        return false;
    }
    let sum: f64 = dist.iter().sum();
    (sum - 1.0).abs() < 1e-9
}

/// Historique synthétique valide, cycle de 8 tirages (du plus ancien au plus récent).
#[cfg(test)]
pub(crate) fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 8) as u8 * 6;
            Draw::new(
                format!("{:03}", i),
                [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6],
                base + 7,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liuhe_data::models::validate_draw;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_make_test_draws_valid() {
        for draw in make_test_draws(40) {
            assert!(validate_draw(&draw.regular, draw.special).is_ok(), "{draw:?}");
        }
    }

    #[test]
    fn test_normalize() {
        let dist = normalize(&[1.0, 3.0, 0.0, -1.0]);
        assert_eq!(dist, vec![0.25, 0.75, 0.0, 0.0]);
        let uniform = normalize(&[0.0; 4]);
        assert_eq!(uniform, vec![0.25; 4]);
    }

    #[test]
    fn test_validate_distribution() {
        assert!(validate_distribution(&[1.0 / 49.0; 49]));
        assert!(!validate_distribution(&[1.0 / 48.0; 48]));
        let mut dist = vec![1.0 / 49.0; 49];
        dist[0] = -0.1;
        assert!(!validate_distribution(&dist));
    }

    #[test]
    fn test_every_method_valid() {
        let draws = make_test_draws(60);
        let store = TagStore::with_builtins();
        let mut rng = StdRng::seed_from_u64(42);
        for method in Method::ALL {
            for count in [1, 6, 20] {
                let config = PredictConfig::default().with_count(count);
                let pred = method.predict(&draws, &store, &config, &mut rng);
                assert!(pred.is_valid(count), "{method}: {pred:?}");
            }
        }
    }

    #[test]
    fn test_every_method_empty_history() {
        let store = TagStore::with_builtins();
        let mut rng = StdRng::seed_from_u64(7);
        for method in Method::ALL {
            let pred = method.predict(&[], &store, &PredictConfig::default(), &mut rng);
            assert!(pred.is_valid(6), "{method}: {pred:?}");
        }
    }

    #[test]
    fn test_method_serde_names() {
        assert_eq!(serde_json::to_string(&Method::TimeDecay).unwrap(), "\"time-decay\"");
        let m: Method = serde_json::from_str("\"grey\"").unwrap();
        assert_eq!(m, Method::Grey);
    }
}
