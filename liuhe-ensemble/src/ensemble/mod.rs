use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use liuhe_data::models::{Draw, Prediction};
use liuhe_data::tags::{TagCategory, TagStore};

use crate::config::PredictConfig;
use crate::models::Method;
use crate::tag_predictor::predict_labels_with_config;

#[derive(Debug, Clone, Serialize)]
pub struct EnsembleResult {
    /// Résultat principal : la méthode de base.
    pub primary: Prediction,
    pub method_results: BTreeMap<Method, Prediction>,
    pub label_predictions: BTreeMap<TagCategory, Vec<String>>,
}

impl EnsembleResult {
    pub fn method(&self, method: Method) -> Option<&Prediction> {
        self.method_results.get(&method)
    }
}

/// Exécute toutes les méthodes détaillées et le prédicteur d'étiquettes.
pub fn predict_all(
    draws: &[Draw],
    tags: &TagStore,
    config: &PredictConfig,
    rng: &mut impl Rng,
) -> EnsembleResult {
    let mut method_results = BTreeMap::new();
    for method in Method::BREAKDOWN {
        let prediction = method.predict(draws, tags, config, rng);
        log::debug!("{method} : {:?} + {}", prediction.regular, prediction.special);
        method_results.insert(method, prediction);
    }

    let primary = match method_results.get(&Method::Basic) {
        Some(p) => p.clone(),
        None => Method::Basic.predict(draws, tags, config, rng),
    };
    let label_predictions = predict_labels_with_config(draws, config, None);

    EnsembleResult {
        primary,
        method_results,
        label_predictions,
    }
}
