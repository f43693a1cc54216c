use rand::Rng;

use liuhe_data::models::{Draw, FrequencyTable, Pool, POOL_SIZE};
use super::NumberModel;
use crate::sampler::{fill_uniform, sample_without_replacement};

/// Postérieur lissé de Laplace : P(n) = (count(n) + 1) / (tirages + 49).
pub struct BayesModel;

impl BayesModel {
    pub fn new() -> Self {
        Self
    }

    pub fn posterior(&self, draws: &[Draw]) -> Vec<f64> {
        let counts = FrequencyTable::from_draws(draws, Pool::Regular);
        let denominator = draws.len() as f64 + POOL_SIZE as f64;
        (1..=POOL_SIZE as u8)
            .map(|n| (counts.count(n) as f64 + 1.0) / denominator)
            .collect()
    }
}

impl Default for BayesModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberModel for BayesModel {
    fn pick(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Vec<u8> {
        let candidates: Vec<(u8, f64)> = self
            .posterior(draws)
            .into_iter()
            .enumerate()
            .map(|(i, p)| ((i + 1) as u8, p))
            .collect();
        let mut selected = sample_without_replacement(&candidates, count, rng);
        fill_uniform(&mut selected, &[], count, rng);
        selected.sort_unstable();
        selected
    }
}
