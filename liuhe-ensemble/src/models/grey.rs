use ndarray::{Array1, Array2};
use rand::Rng;

use liuhe_data::models::{Draw, Prediction, MIN_NUMBER, POOL_SIZE};
use super::normalize;
use crate::linalg::least_squares;
use crate::sampler::{fill_uniform, pick_uniform, sample_one, sample_without_replacement};

pub const MIN_INTENSITY: f64 = 0.1;
pub const MAX_INTENSITY: f64 = 1.0;

/// Issue de l'ajustement GM(1,1) d'une séquence de présence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GreyFit {
    Fitted { a: f64, b: f64, forecast: f64 },
    /// Numéro absent de toute la séquence : pas d'ajustement.
    AllZero,
    /// Système non résoluble : on répète la dernière valeur observée.
    Singular { last: f64 },
}

impl GreyFit {
    /// Intensité bornée à [0.1, 1.0].
    pub fn intensity(&self) -> f64 {
        match self {
            GreyFit::Fitted { forecast, .. } => forecast.clamp(MIN_INTENSITY, MAX_INTENSITY),
            GreyFit::AllZero => MIN_INTENSITY,
            GreyFit::Singular { last } => last.clamp(MIN_INTENSITY, MAX_INTENSITY),
        }
    }
}

/// GM(1,1) : accumulation (AGO), série de fond, moindres carrés sur (a, b),
/// puis différence des deux dernières valeurs cumulées prédites.
pub fn fit_gm11(sequence: &[f64]) -> GreyFit {
    if sequence.iter().all(|&x| x == 0.0) {
        return GreyFit::AllZero;
    }
    let last = sequence.last().copied().unwrap_or(0.0);

    let n = sequence.len();
    let mut cumulative = Vec::with_capacity(n);
    let mut acc = 0.0;
    for &x in sequence {
        acc += x;
        cumulative.push(acc);
    }

    let rows = n.saturating_sub(1);
    let design = Array2::from_shape_fn((rows, 2), |(k, j)| {
        if j == 0 {
            -(cumulative[k] + cumulative[k + 1]) / 2.0
        } else {
            1.0
        }
    });
    let target = Array1::from_iter(sequence.iter().skip(1).copied());

    let coefficients = match least_squares(&design, &target) {
        Ok(beta) => beta,
        Err(e) => {
            log::debug!("GM(1,1) non résoluble ({e}), répétition de la dernière valeur");
            return GreyFit::Singular { last };
        }
    };
    let (a, b) = (coefficients[0], coefficients[1]);
    if a.abs() < 1e-12 {
        return GreyFit::Singular { last };
    }

    let x0 = sequence[0];
    let response = |k: f64| (x0 - b / a) * (-a * k).exp() + b / a;
    let forecast = response(n as f64) - response((n - 1) as f64);
    if !forecast.is_finite() {
        return GreyFit::Singular { last };
    }
    GreyFit::Fitted { a, b, forecast }
}

pub struct GreyModel {
    window: usize,
    sequence_len: usize,
}

impl GreyModel {
    pub fn new(window: usize, sequence_len: usize) -> Self {
        Self {
            window: window.max(1),
            sequence_len: sequence_len.max(1),
        }
    }

    /// Présence (1/0) du numéro dans les réguliers des derniers tirages de la fenêtre.
    pub fn presence_sequence(&self, draws: &[Draw], number: u8) -> Vec<f64> {
        let start = draws.len().saturating_sub(self.window);
        let recent = &draws[start..];
        let skip = recent.len().saturating_sub(self.sequence_len);
        recent[skip..]
            .iter()
            .map(|d| if d.regular.contains(&number) { 1.0 } else { 0.0 })
            .collect()
    }

    pub fn intensities(&self, draws: &[Draw]) -> Vec<f64> {
        (1..=POOL_SIZE as u8)
            .map(|n| fit_gm11(&self.presence_sequence(draws, n)).intensity())
            .collect()
    }

    pub fn predict(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Prediction {
        let intensities = self.intensities(draws);

        let regular_weights = normalize(&intensities);
        let candidates = weighted_candidates(&regular_weights, &[]);
        let mut regular = sample_without_replacement(&candidates, count, rng);
        fill_uniform(&mut regular, &[], count, rng);

        let special_candidates = weighted_candidates(&special_weights(&regular_weights), &regular);
        let special = match sample_one(&special_candidates, rng) {
            Some(n) => n,
            None => {
                log::debug!("Grey : poids spéciaux nuls, tirage uniforme");
                pick_uniform(&regular, rng).unwrap_or(MIN_NUMBER)
            }
        };

        Prediction::new(regular, special)
    }
}

impl Default for GreyModel {
    fn default() -> Self {
        Self::new(20, 5)
    }
}

/// Poids du spécial : complément à 1 des poids réguliers normalisés, renormalisé.
/// Un numéro très présent reste tirable, seulement un peu moins que les autres.
pub fn special_weights(regular_weights: &[f64]) -> Vec<f64> {
    let inverse: Vec<f64> = regular_weights.iter().map(|w| 1.0 - w).collect();
    normalize_or_zero(&inverse)
}

fn weighted_candidates(weights: &[f64], excluded: &[u8]) -> Vec<(u8, f64)> {
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((i + 1) as u8, w))
        .filter(|(n, _)| !excluded.contains(n))
        .collect()
}

fn normalize_or_zero(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total > 0.0 {
        weights.iter().map(|&w| w.max(0.0) / total).collect()
    } else {
        vec![0.0; weights.len()]
    }
}
