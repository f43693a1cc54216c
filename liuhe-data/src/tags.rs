use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::{in_range, MAX_NUMBER, MIN_NUMBER};

pub const ZODIAC_PREFIX: &str = "zodiac:";
pub const ELEMENT_PREFIX: &str = "element:";

/// Partition fixe des 49 numéros en 12 signes (données de référence, à ne pas rééquilibrer).
pub const ZODIAC_TABLE: [(&str, &[u8]); 12] = [
    ("snake", &[1, 13, 25, 37, 49]),
    ("dragon", &[2, 14, 26, 38]),
    ("rabbit", &[3, 15, 27, 39]),
    ("tiger", &[4, 16, 28, 40]),
    ("ox", &[5, 17, 29, 41]),
    ("rat", &[6, 18, 30, 42]),
    ("pig", &[7, 19, 31, 43]),
    ("dog", &[8, 20, 32, 44]),
    ("rooster", &[9, 21, 33, 45]),
    ("monkey", &[10, 22, 34, 46]),
    ("goat", &[11, 23, 35, 47]),
    ("horse", &[12, 24, 36, 48]),
];

pub const ELEMENT_TABLE: [(&str, &[u8]); 5] = [
    ("metal", &[3, 4, 11, 12, 25, 26, 33, 34, 41, 42]),
    ("wood", &[7, 8, 15, 16, 23, 24, 37, 38, 45, 46]),
    ("water", &[13, 14, 21, 22, 29, 30, 43, 44]),
    ("fire", &[1, 2, 9, 10, 17, 18, 31, 32, 39, 40, 47, 48]),
    ("earth", &[5, 6, 19, 20, 27, 28, 35, 36, 49]),
];

pub const COLOR_TABLE: [(&str, &[u8]); 3] = [
    ("red", &[1, 2, 7, 8, 12, 13, 18, 19, 23, 24, 29, 30, 34, 35, 40, 45, 46]),
    ("blue", &[3, 4, 9, 10, 14, 15, 20, 25, 26, 31, 36, 37, 41, 42, 47, 48]),
    ("green", &[5, 6, 11, 16, 17, 21, 22, 27, 28, 32, 33, 38, 39, 43, 44, 49]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    Parity,
    Magnitude,
    DigitSum,
    Tail,
    Zodiac,
    Element,
    Color,
}

impl TagCategory {
    pub const ALL: [TagCategory; 7] = [
        TagCategory::Parity,
        TagCategory::Magnitude,
        TagCategory::DigitSum,
        TagCategory::Tail,
        TagCategory::Zodiac,
        TagCategory::Element,
        TagCategory::Color,
    ];

    /// Préfixe d'espace de noms interne, retiré avant affichage.
    pub fn namespace(&self) -> Option<&'static str> {
        match self {
            TagCategory::Zodiac => Some(ZODIAC_PREFIX),
            TagCategory::Element => Some(ELEMENT_PREFIX),
            _ => None,
        }
    }

    /// Étiquette intégrée du numéro pour cette catégorie, `None` hors [1, 49].
    pub fn tag_for(&self, number: u8) -> Option<String> {
        if !in_range(number) {
            return None;
        }
        let tag = match self {
            TagCategory::Parity => parity_label(number).to_string(),
            TagCategory::Magnitude => magnitude_label(number).to_string(),
            TagCategory::DigitSum => digit_sum_label(number).to_string(),
            TagCategory::Tail => format!("{}-tail", number % 10),
            TagCategory::Zodiac => format!("{ZODIAC_PREFIX}{}", lookup(&ZODIAC_TABLE, number)?),
            TagCategory::Element => format!("{ELEMENT_PREFIX}{}", lookup(&ELEMENT_TABLE, number)?),
            TagCategory::Color => lookup(&COLOR_TABLE, number)?.to_string(),
        };
        Some(tag)
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagCategory::Parity => write!(f, "Parité"),
            TagCategory::Magnitude => write!(f, "Grandeur"),
            TagCategory::DigitSum => write!(f, "Somme des chiffres"),
            TagCategory::Tail => write!(f, "Finale"),
            TagCategory::Zodiac => write!(f, "Zodiaque"),
            TagCategory::Element => write!(f, "Élément"),
            TagCategory::Color => write!(f, "Couleur"),
        }
    }
}

fn parity_label(number: u8) -> &'static str {
    if number % 2 == 1 { "odd" } else { "even" }
}

fn magnitude_label(number: u8) -> &'static str {
    if number >= 25 { "big" } else { "small" }
}

fn digit_sum_label(number: u8) -> &'static str {
    let digit_sum = number / 10 + number % 10;
    if digit_sum % 2 == 1 { "sum-odd" } else { "sum-even" }
}

fn lookup(table: &[(&'static str, &[u8])], number: u8) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, members)| members.contains(&number))
        .map(|(name, _)| *name)
}

/// Les 7 étiquettes intégrées d'un numéro (une par catégorie). Vide hors [1, 49].
pub fn builtin_tags(number: u8) -> Vec<String> {
    TagCategory::ALL
        .iter()
        .filter_map(|category| category.tag_for(number))
        .collect()
}

pub fn is_builtin_tag(number: u8, tag: &str) -> bool {
    TagCategory::ALL
        .iter()
        .any(|category| category.tag_for(number).as_deref() == Some(tag))
}

pub fn strip_namespace(category: TagCategory, tag: &str) -> &str {
    match category.namespace() {
        Some(prefix) => tag.strip_prefix(prefix).unwrap_or(tag),
        None => tag,
    }
}

/// Table numéro → étiquettes (intégrées + personnalisées), passée explicitement
/// aux fonctions de score. La persistance reste à la charge de l'appelant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStore {
    tags: BTreeMap<u8, BTreeSet<String>>,
}

impl TagStore {
    pub fn with_builtins() -> Self {
        let mut store = Self::default();
        store.apply_builtins();
        store
    }

    /// (Ré)applique les étiquettes intégrées. Idempotent ; les étiquettes
    /// personnalisées déjà présentes sont conservées.
    pub fn apply_builtins(&mut self) {
        for number in MIN_NUMBER..=MAX_NUMBER {
            let entry = self.tags.entry(number).or_default();
            entry.extend(builtin_tags(number));
        }
    }

    /// Ajoute une étiquette personnalisée. Retourne `false` si elle existait déjà.
    pub fn add_custom(&mut self, number: u8, tag: &str) -> Result<bool> {
        if !in_range(number) {
            bail!("Numéro {} hors limites ({}-{})", number, MIN_NUMBER, MAX_NUMBER);
        }
        let tag = tag.trim();
        if tag.is_empty() {
            bail!("Étiquette vide refusée pour le numéro {}", number);
        }
        Ok(self.tags.entry(number).or_default().insert(tag.to_string()))
    }

    pub fn remove_tag(&mut self, number: u8, tag: &str) -> bool {
        self.tags
            .get_mut(&number)
            .map(|set| set.remove(tag))
            .unwrap_or(false)
    }

    pub fn tags_for(&self, number: u8) -> impl Iterator<Item = &str> + '_ {
        self.tags
            .get(&number)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn custom_tags(&self, number: u8) -> Vec<&str> {
        self.tags_for(number)
            .filter(|tag| !is_builtin_tag(number, tag))
            .collect()
    }

    pub fn numbers_with(&self, tag: &str) -> Vec<u8> {
        self.tags
            .iter()
            .filter(|(_, set)| set.contains(tag))
            .map(|(&number, _)| number)
            .collect()
    }
}
