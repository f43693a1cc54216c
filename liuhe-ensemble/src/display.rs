use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use liuhe_data::models::{Draw, FrequencyTable, Pool, Prediction};
use liuhe_data::tags::{TagCategory, TagStore};
use crate::ensemble::EnsembleResult;
use crate::models::Method;

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn display_prediction(method: Method, prediction: &Prediction) {
    println!("\n== Prédiction {} ==\n", method);

    let mut table = new_table();
    table.set_header(vec!["Réguliers", "Spécial"]);
    table.add_row(vec![
        Cell::new(format_numbers(&prediction.regular)).fg(Color::Green),
        Cell::new(format!("{:02}", prediction.special)).fg(Color::Yellow),
    ]);
    println!("{table}");
}

pub fn display_method_results(results: &BTreeMap<Method, Prediction>) {
    println!("\n== Détail par méthode ==\n");

    let mut table = new_table();
    table.set_header(vec!["Méthode", "Réguliers", "Spécial"]);
    for (method, prediction) in results {
        table.add_row(vec![
            Cell::new(method.name()),
            Cell::new(format_numbers(&prediction.regular)),
            Cell::new(format!("{:02}", prediction.special)),
        ]);
    }
    println!("{table}");
}

pub fn display_labels(labels: &BTreeMap<TagCategory, Vec<String>>) {
    println!("\n== Étiquettes en vogue (numéro spécial) ==\n");

    let mut table = new_table();
    table.set_header(vec!["Catégorie", "Étiquettes"]);
    for (category, values) in labels {
        let text = if values.is_empty() {
            "—".to_string()
        } else {
            values.join(", ")
        };
        table.add_row(vec![Cell::new(category.to_string()), Cell::new(text)]);
    }
    println!("{table}");
}

pub fn display_ensemble(result: &EnsembleResult) {
    display_prediction(Method::Basic, &result.primary);
    display_method_results(&result.method_results);
    display_labels(&result.label_predictions);
}

pub fn display_tags(number: u8, store: &TagStore) {
    println!("\n== Étiquettes du numéro {:02} ==\n", number);

    let custom = store.custom_tags(number);
    let mut table = new_table();
    table.set_header(vec!["Étiquette", "Type"]);
    for tag in store.tags_for(number) {
        let (kind, color) = if custom.contains(&tag) {
            ("personnalisée", Color::Cyan)
        } else {
            ("intégrée", Color::White)
        };
        table.add_row(vec![Cell::new(tag).fg(color), Cell::new(kind)]);
    }
    println!("{table}");
}

/// Lignes « rang, chaud, sorties, froid, sorties » ; colonnes vides quand un côté est épuisé.
fn hot_cold_rows(table: &FrequencyTable, top: usize) -> Vec<[String; 5]> {
    let hot = table.most_frequent(top);
    let cold = table.least_frequent(top);
    let cell = |entry: Option<&(u8, u32)>| match entry {
        Some(&(n, c)) => (format!("{:02}", n), c.to_string()),
        None => (String::new(), String::new()),
    };
    (0..hot.len().max(cold.len()))
        .map(|i| {
            let (hot_n, hot_c) = cell(hot.get(i));
            let (cold_n, cold_c) = cell(cold.get(i));
            [(i + 1).to_string(), hot_n, hot_c, cold_n, cold_c]
        })
        .collect()
}

pub fn display_frequency_analysis(draws: &[Draw], top: usize) {
    println!("\n== Fréquences sur {} tirages (top {}) ==", draws.len(), top);

    for (pool, title) in [(Pool::Regular, "Numéros réguliers"), (Pool::Special, "Numéro spécial")] {
        let frequencies = FrequencyTable::from_draws(draws, pool);
        println!("\n── {} ──", title);
        if frequencies.is_empty() {
            println!("Aucune donnée de fréquence.");
            continue;
        }

        let mut table = new_table();
        table.set_header(vec!["Rang", "Chaud", "Sorties", "Froid", "Sorties"]);
        for [rank, hot_n, hot_c, cold_n, cold_c] in hot_cold_rows(&frequencies, top) {
            table.add_row(vec![
                Cell::new(rank),
                Cell::new(hot_n).fg(Color::Red),
                Cell::new(hot_c),
                Cell::new(cold_n).fg(Color::Blue),
                Cell::new(cold_c),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_history_summary(draws: &[Draw]) {
    match (draws.first(), draws.last()) {
        (Some(first), Some(last)) => println!(
            "{} tirages chargés ({} → {}), dernier : {} + {:02}",
            draws.len(),
            first.draw_id,
            last.draw_id,
            format_numbers(&last.regular),
            last.special
        ),
        _ => println!("Historique vide : prédictions aléatoires."),
    }
}
