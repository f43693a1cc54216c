use chrono::Datelike;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

use liuhe_data::models::{Prediction, MAX_NUMBER, MIN_NUMBER};

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Tirage pondéré sans remise. S'arrête dès que `count` numéros sont choisis
/// ou que plus aucun candidat n'a de poids strictement positif ; l'appelant
/// complète alors avec `fill_uniform`.
pub fn sample_without_replacement(
    candidates: &[(u8, f64)],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<u8> {
    let mut available: Vec<(u8, f64)> = candidates
        .iter()
        .copied()
        .filter(|(_, w)| w.is_finite() && *w > 0.0)
        .collect();
    let mut selected = Vec::with_capacity(count);

    while selected.len() < count && !available.is_empty() {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let dist = match WeightedIndex::new(&weights) {
            Ok(dist) => dist,
            Err(e) => {
                log::warn!("Poids invalides pour le tirage pondéré : {e}");
                break;
            }
        };
        let idx = dist.sample(rng);
        let (number, _) = available.remove(idx);
        selected.push(number);
    }

    selected
}

/// Un seul numéro tiré selon les poids, ou `None` si aucun poids n'est utilisable.
pub fn sample_one(candidates: &[(u8, f64)], rng: &mut impl Rng) -> Option<u8> {
    sample_without_replacement(candidates, 1, rng).into_iter().next()
}

/// Complète `selected` avec des numéros uniformes de [1, 49], hors `selected` et `excluded`.
pub fn fill_uniform(selected: &mut Vec<u8>, excluded: &[u8], count: usize, rng: &mut impl Rng) {
    if selected.len() >= count {
        return;
    }
    let mut free: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER)
        .filter(|n| !selected.contains(n) && !excluded.contains(n))
        .collect();
    free.shuffle(rng);
    let missing = count - selected.len();
    selected.extend(free.into_iter().take(missing));
}

/// Un numéro uniforme de [1, 49] hors `excluded`.
pub fn pick_uniform(excluded: &[u8], rng: &mut impl Rng) -> Option<u8> {
    let free: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER)
        .filter(|n| !excluded.contains(n))
        .collect();
    free.choose(rng).copied()
}

/// `count` numéros distincts uniformes.
pub fn uniform_numbers(count: usize, rng: &mut impl Rng) -> Vec<u8> {
    let mut selected = Vec::with_capacity(count);
    fill_uniform(&mut selected, &[], count, rng);
    selected.sort_unstable();
    selected
}

/// Grille entièrement aléatoire : repli commun en cas de données insuffisantes.
pub fn uniform_prediction(count: usize, rng: &mut impl Rng) -> Prediction {
    let regular = uniform_numbers(count, rng);
    let special = pick_uniform(&regular, rng).unwrap_or(MIN_NUMBER);
    Prediction::new(regular, special)
}
