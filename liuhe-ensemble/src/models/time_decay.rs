use rand::Rng;

use liuhe_data::models::{Draw, POOL_SIZE};
use super::NumberModel;
use crate::sampler::uniform_numbers;
use crate::scoring::rank;

/// Fréquence et tendance pondérée sur les derniers tirages, top-K déterministe.
pub struct TimeDecayModel {
    window: usize,
    frequency_weight: f64,
    trend_weight: f64,
}

impl TimeDecayModel {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            frequency_weight: 0.7,
            trend_weight: 0.3,
        }
    }

    /// Score par numéro (index `n - 1`). Le tirage le plus récent de la fenêtre pèse 1,
    /// le plus ancien 1 / taille de fenêtre.
    pub fn scores(&self, draws: &[Draw]) -> Vec<f64> {
        let start = draws.len().saturating_sub(self.window);
        let recent = &draws[start..];
        let len = recent.len() as f64;

        let mut frequency = vec![0.0f64; POOL_SIZE];
        let mut trend = vec![0.0f64; POOL_SIZE];
        for (i, draw) in recent.iter().enumerate() {
            let weight = (i + 1) as f64 / len;
            for &n in &draw.regular {
                let idx = (n - 1) as usize;
                if idx < POOL_SIZE {
                    frequency[idx] += 1.0;
                    trend[idx] += weight;
                }
            }
        }

        frequency
            .iter()
            .zip(&trend)
            .map(|(f, t)| f * self.frequency_weight + t * self.trend_weight)
            .collect()
    }
}

impl Default for TimeDecayModel {
    fn default() -> Self {
        Self::new(10)
    }
}

impl NumberModel for TimeDecayModel {
    fn pick(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Vec<u8> {
        if draws.is_empty() {
            log::debug!("TimeDecay : historique vide, tirage uniforme");
            return uniform_numbers(count, rng);
        }
        let mut selected: Vec<u8> = rank(&self.scores(draws)).into_iter().take(count).collect();
        selected.sort_unstable();
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::make_test_draws;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_time_decay_recent_favored() {
        let draws = vec![
            Draw::new("000", [10, 11, 12, 13, 14, 15], 7),
            Draw::new("001", [1, 2, 3, 4, 5, 6], 7),
        ];
        let scores = TimeDecayModel::default().scores(&draws);
        // 1 : 0.7 + 0.3 × 2/2 ; 10 : 0.7 + 0.3 × 1/2
        assert!((scores[0] - 1.0).abs() < 1e-12);
        assert!((scores[9] - 0.85).abs() < 1e-12);

        let mut rng = StdRng::seed_from_u64(0);
        let picked = TimeDecayModel::default().pick(&draws, 6, &mut rng);
        assert_eq!(picked, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_time_decay_window_is_ten() {
        let mut draws = vec![Draw::new("old", [40, 41, 42, 43, 44, 45], 7)];
        draws.extend((0..10).map(|i| Draw::new(format!("{i:03}"), [1, 2, 3, 4, 5, 6], 7)));
        let scores = TimeDecayModel::default().scores(&draws);
        assert_eq!(scores[39], 0.0);
    }

    #[test]
    fn test_time_decay_ties_lower_number() {
        let draws = vec![Draw::new("001", [1, 2, 3, 4, 5, 6], 7)];
        let mut rng = StdRng::seed_from_u64(0);
        // 6 numéros à égalité, les autres à zéro : les plus petits complètent
        let picked = TimeDecayModel::default().pick(&draws, 8, &mut rng);
        assert_eq!(picked, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_time_decay_deterministic() {
        let draws = make_test_draws(30);
        let a = TimeDecayModel::default().pick(&draws, 6, &mut StdRng::seed_from_u64(1));
        let b = TimeDecayModel::default().pick(&draws, 6, &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_decay_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = TimeDecayModel::default().pick(&[], 6, &mut rng);
        assert_eq!(picked.len(), 6);
    }
}
