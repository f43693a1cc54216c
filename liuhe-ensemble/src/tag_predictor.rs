use std::collections::{BTreeMap, HashMap};

use liuhe_data::models::{in_range, Draw};
use liuhe_data::tags::{strip_namespace, TagCategory};

use crate::config::{LabelWeights, PredictConfig};

/// Nombre d'étiquettes retournées par catégorie.
pub fn labels_per_category(category: TagCategory) -> usize {
    match category {
        TagCategory::Tail | TagCategory::Zodiac => 3,
        TagCategory::Element | TagCategory::Color => 2,
        TagCategory::Parity | TagCategory::Magnitude | TagCategory::DigitSum => 1,
    }
}

/// Score de chaque étiquette intégrée portée par le numéro spécial, par catégorie.
/// Les `hot_window` derniers tirages de la fenêtre analysée reçoivent le bonus de récence.
pub fn label_scores(
    draws: &[Draw],
    window: Option<usize>,
    weights: &LabelWeights,
) -> BTreeMap<TagCategory, HashMap<String, f64>> {
    let analyzed = match window {
        Some(w) if w > 0 => &draws[draws.len().saturating_sub(w)..],
        _ => draws,
    };

    let mut scores: BTreeMap<TagCategory, HashMap<String, f64>> =
        TagCategory::ALL.iter().map(|&c| (c, HashMap::new())).collect();

    let len = analyzed.len();
    for (idx, draw) in analyzed.iter().enumerate() {
        if !in_range(draw.special) {
            continue;
        }
        let hot = len - 1 - idx < weights.hot_window;
        for (category, table) in scores.iter_mut() {
            let Some(tag) = category.tag_for(draw.special) else {
                continue;
            };
            let score = table.entry(tag).or_insert(0.0);
            *score += weights.frequency;
            if hot {
                *score += weights.recency_bonus;
            }
        }
    }

    scores
}

/// Étiquettes en vogue sur le canal spécial : top-N par catégorie (score décroissant,
/// puis nom croissant), préfixes d'espace de noms retirés.
pub fn predict_labels(
    draws: &[Draw],
    window: Option<usize>,
    weights: &LabelWeights,
) -> BTreeMap<TagCategory, Vec<String>> {
    label_scores(draws, window, weights)
        .into_iter()
        .map(|(category, table)| {
            let mut ranked: Vec<(String, f64)> = table.into_iter().collect();
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            let labels = ranked
                .into_iter()
                .take(labels_per_category(category))
                .map(|(tag, _)| strip_namespace(category, &tag).to_string())
                .collect();
            (category, labels)
        })
        .collect()
}

/// Étiquettes selon la configuration ; `window` remplace `label_window` s'il est fourni.
pub fn predict_labels_with_config(
    draws: &[Draw],
    config: &PredictConfig,
    window: Option<usize>,
) -> BTreeMap<TagCategory, Vec<String>> {
    predict_labels(draws, window.or(config.label_window), &config.label_weights)
}
