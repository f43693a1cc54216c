use std::collections::HashMap;

use rand::Rng;

use liuhe_data::models::{Draw, REGULAR_COUNT};
use super::NumberModel;
use crate::sampler::{fill_uniform, sample_without_replacement, uniform_numbers};

/// État = grille régulière triée d'un tirage.
pub type State = [u8; REGULAR_COUNT];

pub struct MarkovModel {
    order: usize,
}

impl MarkovModel {
    pub fn new(order: usize) -> Self {
        Self { order: order.max(1) }
    }

    /// Comptage état → numéro suivant, entre chaque tirage et celui situé `order` plus loin.
    pub fn transitions(&self, draws: &[Draw]) -> HashMap<State, HashMap<u8, u32>> {
        let mut transitions: HashMap<State, HashMap<u8, u32>> = HashMap::new();
        if draws.len() <= self.order {
            return transitions;
        }
        for t in 0..draws.len() - self.order {
            let state = state_of(&draws[t]);
            let next = &draws[t + self.order];
            let row = transitions.entry(state).or_default();
            for &n in &next.regular {
                *row.entry(n).or_insert(0) += 1;
            }
        }
        transitions
    }
}

impl Default for MarkovModel {
    fn default() -> Self {
        Self::new(1)
    }
}

fn state_of(draw: &Draw) -> State {
    let mut state = draw.regular;
    state.sort_unstable();
    state
}

impl NumberModel for MarkovModel {
    fn pick(&self, draws: &[Draw], count: usize, rng: &mut impl Rng) -> Vec<u8> {
        if draws.len() < self.order + 1 {
            log::debug!("Markov : {} tirages pour un ordre {}, tirage uniforme", draws.len(), self.order);
            return uniform_numbers(count, rng);
        }

        let transitions = self.transitions(draws);
        let Some(latest) = draws.last() else {
            return uniform_numbers(count, rng);
        };

        let mut selected = match transitions.get(&state_of(latest)) {
            Some(row) => {
                // Ordre stable pour que le seed suffise à reproduire le tirage
                let mut candidates: Vec<(u8, f64)> =
                    row.iter().map(|(&n, &c)| (n, c as f64)).collect();
                candidates.sort_unstable_by_key(|(n, _)| *n);
                sample_without_replacement(&candidates, count, rng)
            }
            None => {
                log::debug!("Markov : état courant jamais observé, tirage uniforme");
                Vec::with_capacity(count)
            }
        };

        fill_uniform(&mut selected, &[], count, rng);
        selected.sort_unstable();
        selected
    }
}
