/// The country dataset: one record per country, carrying its capital and the
/// capital's coordinates. The dataset is loaded once at startup and read-only
/// afterwards. Guess validation runs against the normalized capital names,
/// which are computed here at load time and cached next to the records.
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Default dataset compiled into the binary. Override with `--countries`.
pub const EMBEDDED_COUNTRIES: &str = include_str!("resources/countries.json");

/// A single country entry. `image` is the silhouette shown while the round is
/// open, `colored_image` the reveal shown on a win. Both are opaque handles
/// as far as the game is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRecord {
    pub country: String,
    pub capital: String,
    pub lat: f64,
    pub lon: f64,
    pub image: String,
    #[serde(rename = "coloredImage")]
    pub colored_image: String,
}

/// `normalize` folds a raw string into the form used for every comparison:
/// NFD decomposition, combining diacritical marks (U+0300-U+036F) stripped,
/// uppercased, trimmed. Accented and case variants of the same capital
/// collapse to the same string, so "bogotá" matches "Bogota".
pub fn normalize(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_uppercase()
        .trim()
        .to_string()
}

/// Dataset wraps the ordered country records together with their normalized
/// capital names.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CountryRecord>,
    capitals: Vec<String>,
}

impl Dataset {
    /// `new` validates the records and caches their normalized capitals.
    /// An empty dataset is rejected, as are records with empty capital names
    /// and capitals that collide after normalization. Guess validation and
    /// hint attribution need each normalized capital to name exactly one
    /// country.
    pub fn new(records: Vec<CountryRecord>) -> anyhow::Result<Dataset> {
        if records.is_empty() {
            anyhow::bail!("country dataset is empty")
        }

        let capitals: Vec<String> = records.iter().map(|r| normalize(&r.capital)).collect();

        for (i, capital) in capitals.iter().enumerate() {
            if capital.is_empty() {
                anyhow::bail!("{} has an empty capital name", records[i].country)
            }
            if capitals[..i].contains(capital) {
                anyhow::bail!("duplicate capital name: {}", capital)
            }
        }

        Ok(Dataset { records, capitals })
    }

    /// `from_json` parses a JSON array of country records.
    pub fn from_json(data: &str) -> anyhow::Result<Dataset> {
        let records: Vec<CountryRecord> =
            serde_json::from_str(data).context("Error parsing country dataset")?;
        Dataset::new(records)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Dataset> {
        let data = std::fs::read_to_string(path.as_ref())
            .context(format!("Error reading {}", path.as_ref().display()))?;
        Dataset::from_json(&data)
    }

    /// `find_capital` returns the record whose capital matches the given
    /// normalized name, if any.
    pub fn find_capital(&self, normalized: &str) -> Option<&CountryRecord> {
        self.capitals
            .iter()
            .position(|c| c == normalized)
            .map(|i| &self.records[i])
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
