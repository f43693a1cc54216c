pub mod tag_trend;

use rand::Rng;

use liuhe_data::models::{in_range, Draw, FrequencyTable, Pool, Prediction, POOL_SIZE};

use crate::config::{ChannelWeights, PredictConfig};
use crate::sampler::{fill_uniform, uniform_prediction};

/// Score fréquence + récence + écart pour les 49 numéros d'un canal (index `n - 1`).
///
/// - fréquence : occurrences / total du canal
/// - récence : occurrences dans les `recent_window` derniers tirages / `recent_window`
/// - écart : 1 / (1 + tirages depuis la dernière sortie), 0 si jamais sorti
pub fn score_channel(
    draws: &[Draw],
    pool: Pool,
    recent_window: usize,
    weights: &ChannelWeights,
) -> Vec<f64> {
    let mut scores = vec![0.0f64; POOL_SIZE];

    let table = FrequencyTable::from_draws(draws, pool);
    let total = table.total();
    if total > 0 {
        for (i, score) in scores.iter_mut().enumerate() {
            let n = (i + 1) as u8;
            *score += table.count(n) as f64 / total as f64 * weights.frequency;
        }
    }

    let start = draws.len().saturating_sub(recent_window);
    let recent = FrequencyTable::from_draws(&draws[start..], pool);
    let window = recent_window.max(1) as f64;
    for (i, score) in scores.iter_mut().enumerate() {
        let n = (i + 1) as u8;
        *score += recent.count(n) as f64 / window * weights.recency;
    }

    if weights.gap != 0.0 {
        let mut last_seen: Vec<Option<usize>> = vec![None; POOL_SIZE];
        for (idx, draw) in draws.iter().enumerate() {
            for &n in pool.numbers_from(draw) {
                if in_range(n) {
                    last_seen[(n - 1) as usize] = Some(idx);
                }
            }
        }
        for (score, seen) in scores.iter_mut().zip(&last_seen) {
            if let Some(idx) = seen {
                let gap = (draws.len() - idx) as f64;
                *score += 1.0 / (1.0 + gap) * weights.gap;
            }
        }
    }

    scores
}

/// Numéros classés par score décroissant, puis par numéro croissant.
pub fn rank(scores: &[f64]) -> Vec<u8> {
    let mut numbers: Vec<u8> = (1..=scores.len() as u8).collect();
    numbers.sort_by(|&a, &b| {
        let (sa, sb) = (scores[(a - 1) as usize], scores[(b - 1) as usize]);
        sb.partial_cmp(&sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    numbers
}

/// Meilleur candidat spécial. Si c'est le spécial du tirage précédent, on passe
/// au suivant de score non nul ; à défaut la répétition est conservée.
pub fn select_special(special_scores: &[f64], previous_special: Option<u8>) -> u8 {
    let ranked = rank(special_scores);
    let top = ranked[0];
    if previous_special != Some(top) {
        return top;
    }

    let alternative = ranked
        .iter()
        .skip(1)
        .copied()
        .find(|&n| special_scores[(n - 1) as usize] > 0.0);
    match alternative {
        Some(n) => {
            log::debug!("Spécial {top} identique au tirage précédent, remplacé par {n}");
            n
        }
        None => {
            log::debug!("Spécial {top} répété faute d'alternative de score non nul");
            top
        }
    }
}

/// Prend les `count` meilleurs réguliers en écartant le spécial retenu ; le
/// candidat suivant du classement prend sa place, puis complétion uniforme.
pub fn resolve_regular(ranked: &[u8], count: usize, special: u8, rng: &mut impl Rng) -> Vec<u8> {
    let mut regular: Vec<u8> = ranked.iter().copied().take(count).collect();

    if regular.contains(&special) {
        log::info!("Spécial {special} présent parmi les réguliers, promotion du candidat suivant");
        regular.retain(|&n| n != special);
        if let Some(&next) = ranked
            .iter()
            .skip(count)
            .find(|&&n| n != special && !regular.contains(&n))
        {
            regular.push(next);
        }
    }

    if regular.len() < count {
        log::warn!("Candidats réguliers épuisés, complétion aléatoire");
        fill_uniform(&mut regular, &[special], count, rng);
    }

    regular.sort_unstable();
    regular
}

/// Applique les deux règles de conflit à une paire de cartes de scores.
pub fn predict_from_scores(
    draws: &[Draw],
    regular_scores: &[f64],
    special_scores: &[f64],
    count: usize,
    rng: &mut impl Rng,
) -> Prediction {
    let previous_special = draws.last().map(|d| d.special);
    let special = select_special(special_scores, previous_special);
    let regular = resolve_regular(&rank(regular_scores), count, special, rng);
    Prediction::new(regular, special)
}

/// Historique vide ou canal sans aucune occurrence : pas de score exploitable.
pub(crate) fn has_scoring_data(draws: &[Draw]) -> bool {
    !draws.is_empty()
        && !FrequencyTable::from_draws(draws, Pool::Regular).is_empty()
        && !FrequencyTable::from_draws(draws, Pool::Special).is_empty()
}

/// Prédiction de base : fréquence/récence/écart sur chaque canal.
pub fn predict_basic(draws: &[Draw], config: &PredictConfig, rng: &mut impl Rng) -> Prediction {
    if !has_scoring_data(draws) {
        log::debug!("Données insuffisantes pour le score de base, tirage uniforme");
        return uniform_prediction(config.count, rng);
    }

    let regular_scores = score_channel(
        draws,
        Pool::Regular,
        config.recent_window,
        &config.regular_weights,
    );
    let special_scores = score_channel(
        draws,
        Pool::Special,
        config.recent_window,
        &config.special_weights,
    );
    predict_from_scores(draws, &regular_scores, &special_scores, config.count, rng)
}
