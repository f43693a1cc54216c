use std::collections::BTreeSet;

use rand::prelude::*;

use liuhe_data::models::{Draw, MIN_NUMBER};
use super::bayes::BayesModel;
use super::markov::MarkovModel;
use super::time_decay::TimeDecayModel;
use super::NumberModel;
use crate::sampler::{fill_uniform, pick_uniform};

/// Nouveaux tirages hybrides autorisés quand le spécial tombe dans la grille.
const MAX_SPECIAL_REDRAWS: usize = 20;

/// Intersection des trois modèles, complétée au hasard par leur union puis par [1, 49].
pub struct HybridModel {
    markov: MarkovModel,
    bayes: BayesModel,
    time_decay: TimeDecayModel,
}

impl HybridModel {
    pub fn new(markov_order: usize) -> Self {
        Self {
            markov: MarkovModel::new(markov_order),
            bayes: BayesModel::new(),
            time_decay: TimeDecayModel::default(),
        }
    }
}

impl Default for HybridModel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl NumberModel for HybridModel {
    fn pick(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Vec<u8> {
        let markov: BTreeSet<u8> = self.markov.pick(draws, count, rng).into_iter().collect();
        let bayes: BTreeSet<u8> = self.bayes.pick(draws, count, rng).into_iter().collect();
        let time_decay: BTreeSet<u8> = self.time_decay.pick(draws, count, rng).into_iter().collect();

        merge_picks(&markov, &bayes, &time_decay, count, rng)
    }
}

/// Consensus des trois tirages, complété par leur union mélangée puis par [1, 49].
/// Toujours exactement `count` numéros distincts triés, même si les ensembles sont disjoints.
pub fn merge_picks(
    markov: &BTreeSet<u8>,
    bayes: &BTreeSet<u8>,
    time_decay: &BTreeSet<u8>,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<u8> {
    let mut selected: Vec<u8> = markov
        .iter()
        .copied()
        .filter(|n| bayes.contains(n) && time_decay.contains(n))
        .collect();
    selected.truncate(count);

    let mut pool: Vec<u8> = markov
        .union(bayes)
        .copied()
        .collect::<BTreeSet<u8>>()
        .union(time_decay)
        .copied()
        .filter(|n| !selected.contains(n))
        .collect();
    pool.shuffle(rng);
    let missing = count.saturating_sub(selected.len());
    selected.extend(pool.into_iter().take(missing));

    if selected.len() < count {
        log::debug!("Hybrid : union épuisée, complétion uniforme");
        fill_uniform(&mut selected, &[], count, rng);
    }

    selected.sort_unstable();
    selected
}

/// Provenance du numéro spécial des modèles à tirage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialChoice {
    /// Premier tirage hybride, sans conflit.
    Hybrid(u8),
    /// Répétait le spécial précédent : remplacé uniformément.
    Substituted(u8),
    /// Tombait dans la grille : nouveau tirage hybride.
    Redrawn(u8),
    /// Tirages hybrides épuisés : choix uniforme hors grille.
    Uniform(u8),
}

impl SpecialChoice {
    pub fn number(&self) -> u8 {
        match *self {
            SpecialChoice::Hybrid(n)
            | SpecialChoice::Substituted(n)
            | SpecialChoice::Redrawn(n)
            | SpecialChoice::Uniform(n) => n,
        }
    }
}

/// Spécial des modèles Markov/Bayes/TimeDecay/Hybrid : un numéro hybride, jamais
/// égal au spécial précédent au premier tirage, jamais dans `regular`.
pub fn pick_special(draws: &[Draw], regular: &[u8], markov_order: usize, rng: &mut impl Rng) -> SpecialChoice {
    let hybrid = HybridModel::new(markov_order);
    let previous = draws.last().map(|d| d.special);
    let mut choice = match hybrid.pick(draws, 1, rng).first().copied() {
        Some(n) => SpecialChoice::Hybrid(n),
        None => SpecialChoice::Uniform(pick_uniform(regular, rng).unwrap_or(MIN_NUMBER)),
    };

    if previous == Some(choice.number()) {
        let mut excluded = regular.to_vec();
        excluded.extend(previous);
        if let Some(n) = pick_uniform(&excluded, rng) {
            log::debug!("Spécial {} identique au tirage précédent, remplacé par {n}", choice.number());
            choice = SpecialChoice::Substituted(n);
        }
    }

    let mut redraws = 0;
    while regular.contains(&choice.number()) {
        if redraws >= MAX_SPECIAL_REDRAWS {
            log::debug!("Spécial toujours en conflit après {redraws} tirages, choix uniforme");
            choice = SpecialChoice::Uniform(pick_uniform(regular, rng).unwrap_or(MIN_NUMBER));
            break;
        }
        redraws += 1;
        if let Some(&n) = hybrid.pick(draws, 1, rng).first() {
            choice = SpecialChoice::Redrawn(n);
        }
    }

    choice
}
