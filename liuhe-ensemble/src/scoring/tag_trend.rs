use std::collections::HashMap;

use rand::Rng;

use liuhe_data::models::{in_range, Draw, Pool, Prediction, POOL_SIZE};
use liuhe_data::tags::TagStore;

use super::{has_scoring_data, predict_from_scores, score_channel};
use crate::config::PredictConfig;
use crate::sampler::uniform_prediction;

/// Fréquence relative de chaque étiquette sur les `window` derniers tirages d'un canal.
pub fn tag_trends(draws: &[Draw], pool: Pool, window: usize, tags: &TagStore) -> HashMap<String, f64> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    let start = draws.len().saturating_sub(window);
    for draw in &draws[start..] {
        for &n in pool.numbers_from(draw) {
            if !in_range(n) {
                continue;
            }
            for tag in tags.tags_for(n) {
                *counts.entry(tag.to_string()).or_insert(0) += 1;
            }
        }
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return HashMap::new();
    }
    counts
        .into_iter()
        .map(|(tag, c)| (tag, c as f64 / total as f64))
        .collect()
}

/// Ajoute à chaque numéro la fréquence de tendance de ses étiquettes × `weight`.
pub fn apply_tag_bonus(scores: &mut [f64], trends: &HashMap<String, f64>, tags: &TagStore, weight: f64) {
    if trends.is_empty() {
        return;
    }
    for (i, score) in scores.iter_mut().enumerate().take(POOL_SIZE) {
        let n = (i + 1) as u8;
        for tag in tags.tags_for(n) {
            if let Some(freq) = trends.get(tag) {
                *score += freq * weight;
            }
        }
    }
}

/// Score de base enrichi par les étiquettes en vogue, mêmes règles de conflit.
pub fn predict_with_tags(
    draws: &[Draw],
    tags: &TagStore,
    config: &PredictConfig,
    rng: &mut impl Rng,
) -> Prediction {
    if !has_scoring_data(draws) {
        log::debug!("Données insuffisantes pour le score par étiquettes, tirage uniforme");
        return uniform_prediction(config.count, rng);
    }

    let mut regular_scores = score_channel(
        draws,
        Pool::Regular,
        config.recent_window,
        &config.regular_weights,
    );
    let mut special_scores = score_channel(
        draws,
        Pool::Special,
        config.recent_window,
        &config.special_weights,
    );

    let regular_trends = tag_trends(draws, Pool::Regular, config.tag_window, tags);
    let special_trends = tag_trends(draws, Pool::Special, config.tag_window, tags);
    apply_tag_bonus(&mut regular_scores, &regular_trends, tags, config.tag_weight);
    apply_tag_bonus(&mut special_scores, &special_trends, tags, config.tag_weight);

    predict_from_scores(draws, &regular_scores, &special_scores, config.count, rng)
}
