use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use liuhe_data::models::{in_range, validate_draw, Draw, MAX_NUMBER, MIN_NUMBER};
use liuhe_data::tags::TagStore;
use liuhe_ensemble::config::{load_config, PredictConfig};
use liuhe_ensemble::display;
use liuhe_ensemble::ensemble::predict_all;
use liuhe_ensemble::models::Method;
use liuhe_ensemble::sampler::date_seed;
use liuhe_ensemble::tag_predictor::predict_labels_with_config;

#[derive(Parser)]
#[command(name = "liuhe-ensemble", about = "Prédiction 6+1 / 49 par ensemble d'heuristiques")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Toutes les méthodes + étiquettes en vogue
    Predict {
        /// Historique JSON (tableau de tirages, du plus ancien au plus récent)
        #[arg(long)]
        history: PathBuf,

        /// Fichier de configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Table d'étiquettes JSON (défaut : étiquettes intégrées)
        #[arg(short, long)]
        tags: Option<PathBuf>,

        /// Nombre de numéros réguliers
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON au lieu des tableaux
        #[arg(long)]
        json: bool,
    },

    /// Une seule méthode
    Method {
        #[arg(value_enum)]
        method: Method,

        #[arg(long)]
        history: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        tags: Option<PathBuf>,

        #[arg(short = 'n', long)]
        count: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Prédicteur d'étiquettes seul (canal spécial)
    Labels {
        #[arg(long)]
        history: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fenêtre analysée (0 : tout l'historique, défaut : configuration)
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Numéros chauds et froids des deux canaux
    Analysis {
        #[arg(long)]
        history: PathBuf,

        /// Nombre de numéros par liste
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Étiquettes d'un numéro
    Tags {
        number: u8,

        #[arg(short, long)]
        tags: Option<PathBuf>,
    },

    /// Afficher la configuration par défaut (JSON)
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Predict { history, config, tags, count, seed, json } => {
            cmd_predict(&history, config.as_deref(), tags.as_deref(), count, seed, json)
        }
        Command::Method { method, history, config, tags, count, seed } => {
            cmd_method(method, &history, config.as_deref(), tags.as_deref(), count, seed)
        }
        Command::Labels { history, config, window } => cmd_labels(&history, config.as_deref(), window),
        Command::Analysis { history, top } => cmd_analysis(&history, top),
        Command::Tags { number, tags } => cmd_tags(number, tags.as_deref()),
        Command::Config => cmd_config(),
    }
}

fn load_history(path: &Path) -> Result<Vec<Draw>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let draws: Vec<Draw> = serde_json::from_str(&content)
        .with_context(|| format!("Historique invalide dans {}", path.display()))?;
    for draw in &draws {
        validate_draw(&draw.regular, draw.special)
            .with_context(|| format!("Tirage {} invalide", draw.draw_id))?;
    }
    log::info!("{} tirages chargés depuis {}", draws.len(), path.display());
    Ok(draws)
}

fn load_tags(path: Option<&Path>) -> Result<TagStore> {
    let Some(path) = path else {
        return Ok(TagStore::with_builtins());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let mut store: TagStore = serde_json::from_str(&content)
        .with_context(|| format!("Table d'étiquettes invalide dans {}", path.display()))?;
    store.apply_builtins();
    Ok(store)
}

fn resolve_config(path: Option<&Path>, count: Option<usize>) -> Result<PredictConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => PredictConfig::default(),
    };
    if let Some(count) = count {
        config.count = count;
    }
    config.validate()?;
    Ok(config)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(date_seed);
    log::info!("Seed : {seed}");
    StdRng::seed_from_u64(seed)
}

fn cmd_predict(
    history: &Path,
    config: Option<&Path>,
    tags: Option<&Path>,
    count: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let draws = load_history(history)?;
    let store = load_tags(tags)?;
    let config = resolve_config(config, count)?;
    let mut rng = make_rng(seed);

    let result = predict_all(&draws, &store, &config, &mut rng);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::display_history_summary(&draws);
        display::display_ensemble(&result);
    }
    Ok(())
}

fn cmd_method(
    method: Method,
    history: &Path,
    config: Option<&Path>,
    tags: Option<&Path>,
    count: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let draws = load_history(history)?;
    let store = load_tags(tags)?;
    let config = resolve_config(config, count)?;
    let mut rng = make_rng(seed);

    let prediction = method.predict(&draws, &store, &config, &mut rng);
    display::display_history_summary(&draws);
    display::display_prediction(method, &prediction);
    Ok(())
}

fn cmd_labels(history: &Path, config: Option<&Path>, window: Option<usize>) -> Result<()> {
    let draws = load_history(history)?;
    let config = resolve_config(config, None)?;
    let labels = predict_labels_with_config(&draws, &config, window);
    display::display_labels(&labels);
    Ok(())
}

fn cmd_analysis(history: &Path, top: usize) -> Result<()> {
    if top == 0 {
        bail!("--top doit être strictement positif");
    }
    let draws = load_history(history)?;
    if draws.is_empty() {
        println!("Historique vide : aucune analyse possible.");
        return Ok(());
    }
    display::display_frequency_analysis(&draws, top);
    Ok(())
}

fn cmd_tags(number: u8, tags: Option<&Path>) -> Result<()> {
    if !in_range(number) {
        bail!("Numéro {} hors limites ({}-{})", number, MIN_NUMBER, MAX_NUMBER);
    }
    let store = load_tags(tags)?;
    display::display_tags(number, &store);
    Ok(())
}

fn cmd_config() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&PredictConfig::default())?);
    Ok(())
}
