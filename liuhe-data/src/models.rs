use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 49;
pub const POOL_SIZE: usize = 49;
pub const REGULAR_COUNT: usize = 6;

/// Un tirage : 6 numéros réguliers + 1 numéro spécial, tous dans [1, 49].
/// L'historique est toujours ordonné du plus ancien au plus récent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub draw_id: String,
    pub regular: [u8; REGULAR_COUNT],
    pub special: u8,
}

impl Draw {
    pub fn new(draw_id: impl Into<String>, regular: [u8; REGULAR_COUNT], special: u8) -> Self {
        Self {
            draw_id: draw_id.into(),
            regular,
            special,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    Regular,
    Special,
}

impl Pool {
    pub fn size(&self) -> usize {
        POOL_SIZE
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Regular => &draw.regular,
            Pool::Special => std::slice::from_ref(&draw.special),
        }
    }
}

pub fn in_range(number: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&number)
}

/// Table de fréquences d'un canal, dérivée de l'historique à la demande.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    counts: Vec<u32>,
}

impl FrequencyTable {
    pub fn from_draws(draws: &[Draw], pool: Pool) -> Self {
        let mut counts = vec![0u32; pool.size()];
        for draw in draws {
            for &n in pool.numbers_from(draw) {
                if in_range(n) {
                    counts[(n - 1) as usize] += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn count(&self, number: u8) -> u32 {
        if in_range(number) {
            self.counts[(number - 1) as usize]
        } else {
            0
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Numéros sortis au moins une fois, avec leur nombre de sorties.
    fn observed(&self) -> Vec<(u8, u32)> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, &c)| ((i + 1) as u8, c))
            .collect()
    }

    /// Numéros « chauds » : fréquence décroissante, puis numéro croissant.
    pub fn most_frequent(&self, count: usize) -> Vec<(u8, u32)> {
        let mut entries = self.observed();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(count);
        entries
    }

    /// Numéros « froids » parmi ceux déjà sortis : fréquence croissante, puis numéro croissant.
    pub fn least_frequent(&self, count: usize) -> Vec<(u8, u32)> {
        let mut entries = self.observed();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        entries.truncate(count);
        entries
    }
}

/// Résultat d'une méthode : numéros réguliers triés + numéro spécial hors de la grille.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub regular: Vec<u8>,
    pub special: u8,
}

impl Prediction {
    pub fn new(mut regular: Vec<u8>, special: u8) -> Self {
        regular.sort_unstable();
        Self { regular, special }
    }

    /// Vérifie la forme attendue : `count` numéros distincts dans [1, 49], spécial disjoint.
    pub fn is_valid(&self, count: usize) -> bool {
        if self.regular.len() != count || !in_range(self.special) {
            return false;
        }
        if self.regular.iter().any(|&n| !in_range(n)) {
            return false;
        }
        if self.regular.windows(2).any(|w| w[0] >= w[1]) {
            return false;
        }
        !self.regular.contains(&self.special)
    }
}

pub fn validate_draw(regular: &[u8; REGULAR_COUNT], special: u8) -> Result<()> {
    for &n in regular {
        if !in_range(n) {
            bail!("Numéro {} hors limites ({}-{})", n, MIN_NUMBER, MAX_NUMBER);
        }
    }
    if !in_range(special) {
        bail!("Numéro spécial {} hors limites ({}-{})", special, MIN_NUMBER, MAX_NUMBER);
    }
    for i in 0..regular.len() {
        for j in (i + 1)..regular.len() {
            if regular[i] == regular[j] {
                bail!("Numéro en double : {}", regular[i]);
            }
        }
    }
    if regular.contains(&special) {
        bail!("Le numéro spécial {} figure déjà parmi les numéros réguliers", special);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(regular: [u8; 6], special: u8) -> Draw {
        Draw::new("2024001", regular, special)
    }

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[49, 48, 47, 46, 45, 44], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 50], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 0).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_regular() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
    }

    #[test]
    fn test_validate_draw_special_in_regular() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 6).is_err());
    }

    #[test]
    fn test_pool_numbers_from() {
        let d = draw([1, 2, 3, 4, 5, 6], 7);
        assert_eq!(Pool::Regular.numbers_from(&d), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(Pool::Special.numbers_from(&d), &[7]);
    }

    #[test]
    fn test_frequency_table_counts() {
        let draws = vec![draw([1, 2, 3, 4, 5, 6], 7), draw([1, 10, 11, 12, 13, 14], 7)];
        let regular = FrequencyTable::from_draws(&draws, Pool::Regular);
        let special = FrequencyTable::from_draws(&draws, Pool::Special);
        assert_eq!(regular.count(1), 2);
        assert_eq!(regular.count(14), 1);
        assert_eq!(regular.count(49), 0);
        assert_eq!(regular.total(), 12);
        assert_eq!(special.count(7), 2);
        assert_eq!(special.total(), 2);
        assert_eq!(regular.count(0), 0);
    }

    #[test]
    fn test_frequency_table_empty() {
        let table = FrequencyTable::from_draws(&[], Pool::Regular);
        assert!(table.is_empty());
        assert!(table.most_frequent(5).is_empty());
        assert!(table.least_frequent(5).is_empty());
    }

    #[test]
    fn test_most_frequent_ties_ascending() {
        let draws = vec![draw([5, 2, 3, 4, 1, 6], 7)];
        let table = FrequencyTable::from_draws(&draws, Pool::Regular);
        let top = table.most_frequent(3);
        assert_eq!(top, vec![(1, 1), (2, 1), (3, 1)]);
    }

    fn frequency_fixture() -> FrequencyTable {
        // 1 : 3 fois, 8 et 9 : 2 fois, 11 autres numéros : 1 fois
        let draws = vec![
            draw([1, 2, 3, 4, 5, 6], 40),
            draw([1, 8, 9, 10, 11, 12], 40),
            draw([9, 8, 1, 13, 20, 21], 41),
        ];
        FrequencyTable::from_draws(&draws, Pool::Regular)
    }

    #[test]
    fn test_most_frequent_ordering() {
        let table = frequency_fixture();
        assert_eq!(table.most_frequent(4), vec![(1, 3), (8, 2), (9, 2), (2, 1)]);
        assert!(table.most_frequent(0).is_empty());
    }

    #[test]
    fn test_least_frequent_ties_ascending() {
        let table = frequency_fixture();
        assert_eq!(table.least_frequent(3), vec![(2, 1), (3, 1), (4, 1)]);
        // Les numéros jamais sortis ne figurent pas
        assert!(table.least_frequent(49).iter().all(|&(_, c)| c > 0));
        assert_eq!(table.least_frequent(49).len(), 14);
        assert_eq!(table.least_frequent(49).last(), Some(&(1, 3)));
    }

    #[test]
    fn test_frequency_special_channel() {
        let draws = vec![draw([1, 2, 3, 4, 5, 6], 40), draw([1, 2, 3, 4, 5, 6], 40), draw([1, 2, 3, 4, 5, 6], 7)];
        let table = FrequencyTable::from_draws(&draws, Pool::Special);
        assert_eq!(table.most_frequent(1), vec![(40, 2)]);
        assert_eq!(table.least_frequent(1), vec![(7, 1)]);
    }

    #[test]
    fn test_prediction_validity() {
        assert!(Prediction::new(vec![6, 1, 2, 3, 4, 5], 7).is_valid(6));
        assert!(!Prediction::new(vec![1, 2, 3, 4, 5, 6], 6).is_valid(6));
        assert!(!Prediction::new(vec![1, 1, 3, 4, 5, 6], 7).is_valid(6));
        assert!(!Prediction::new(vec![1, 2, 3, 4, 5], 7).is_valid(6));
        assert!(!Prediction::new(vec![1, 2, 3, 4, 5, 50], 7).is_valid(6));
    }

    #[test]
    fn test_draw_serde_roundtrip() {
        let d = draw([3, 9, 12, 27, 33, 41], 8);
        let json = serde_json::to_string(&d).unwrap();
        let restored: Draw = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, d);
    }
}
