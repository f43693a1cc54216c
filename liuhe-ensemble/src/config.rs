use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use liuhe_data::models::POOL_SIZE;

/// Poids des trois composantes du score de base (fréquence, récence, écart).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelWeights {
    pub frequency: f64,
    pub recency: f64,
    pub gap: f64,
}

impl ChannelWeights {
    pub fn regular_default() -> Self {
        Self { frequency: 0.2, recency: 0.7, gap: 0.1 }
    }

    pub fn special_default() -> Self {
        Self { frequency: 1.0, recency: 1.5, gap: 0.0 }
    }

    fn is_valid(&self) -> bool {
        [self.frequency, self.recency, self.gap]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Pondération du prédicteur d'étiquettes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelWeights {
    pub frequency: f64,
    pub recency_bonus: f64,
    /// Nombre de tirages finaux de la fenêtre analysée qui reçoivent le bonus.
    pub hot_window: usize,
}

impl Default for LabelWeights {
    fn default() -> Self {
        Self { frequency: 1.0, recency_bonus: 1.5, hot_window: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub count: usize,
    pub recent_window: usize,
    pub regular_weights: ChannelWeights,
    pub special_weights: ChannelWeights,
    pub tag_window: usize,
    pub tag_weight: f64,
    pub markov_order: usize,
    /// `None` : tout l'historique.
    pub label_window: Option<usize>,
    pub label_weights: LabelWeights,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            count: 6,
            recent_window: 10,
            regular_weights: ChannelWeights::regular_default(),
            special_weights: ChannelWeights::special_default(),
            tag_window: 20,
            tag_weight: 1.0,
            markov_order: 1,
            label_window: Some(10),
            label_weights: LabelWeights::default(),
        }
    }
}

impl PredictConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 || self.count >= POOL_SIZE {
            bail!("count doit être dans [1, {}] (reçu {})", POOL_SIZE - 1, self.count);
        }
        if self.recent_window == 0 {
            bail!("recent_window doit être > 0");
        }
        if self.tag_window == 0 {
            bail!("tag_window doit être > 0");
        }
        if self.markov_order == 0 {
            bail!("markov_order doit être > 0");
        }
        if self.label_weights.hot_window == 0 {
            bail!("label_weights.hot_window doit être > 0");
        }
        if !self.regular_weights.is_valid() || !self.special_weights.is_valid() {
            bail!("Les poids de canal doivent être finis et positifs");
        }
        if !self.tag_weight.is_finite() || self.tag_weight < 0.0 {
            bail!("tag_weight doit être fini et positif (reçu {})", self.tag_weight);
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<PredictConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config: PredictConfig = serde_json::from_str(&content)
        .with_context(|| format!("Configuration invalide dans {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(config: &PredictConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    Ok(())
}
