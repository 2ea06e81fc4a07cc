//! 図鑑カタログ（data/pokemon.json）の取得・読み書き

use crate::error::{PokedexError, Result};
use crate::http::Fetch;
use indicatif::ProgressBar;
use pokedex_common::{parse_pokeapi_pokemon, parse_serebii_dex, CatalogEntry};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// PokeAPIへの連続アクセスを何件ごとに休むか
const POKEAPI_PAUSE_EVERY: u32 = 20;

/// カタログの取得元
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatalogSource {
    #[default]
    PokeApi,
    Serebii,
}

impl std::str::FromStr for CatalogSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pokeapi" => Ok(CatalogSource::PokeApi),
            "serebii" => Ok(CatalogSource::Serebii),
            _ => Err(format!("Unknown source: {}. Use pokeapi or serebii", s)),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::PokeApi => write!(f, "pokeapi"),
            CatalogSource::Serebii => write!(f, "serebii"),
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    if !path.exists() {
        return Err(PokedexError::CatalogNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

pub fn save_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// PokeAPIから1件ずつ取得
///
/// 取得できなかった番号はログに残して飛ばす。
pub fn fetch_from_pokeapi<F: Fetch + ?Sized>(
    fetch: &F,
    base_url: &str,
    ids: RangeInclusive<u32>,
    pause: Duration,
    progress: &ProgressBar,
) -> Vec<CatalogEntry> {
    let base_url = base_url.trim_end_matches('/');
    let mut entries = Vec::new();

    progress.set_length(ids.clone().count() as u64);

    for id in ids {
        let url = format!("{}/pokemon/{}/", base_url, id);
        match fetch.get_text(&url, &[]) {
            Ok(body) => match parse_pokeapi_pokemon(id, &body) {
                Ok(entry) => {
                    progress.set_message(entry.display_name.clone());
                    entries.push(entry);
                }
                Err(e) => warn!("#{} の解析に失敗: {}", id, e),
            },
            Err(e) => warn!("#{} の取得に失敗: {}", id, e),
        }
        progress.inc(1);

        if id % POKEAPI_PAUSE_EVERY == 0 && !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    progress.finish_and_clear();
    info!("PokeAPIから{}件取得", entries.len());
    entries
}

/// Serebiiの全国図鑑ページから一括取得
pub fn fetch_from_serebii<F: Fetch + ?Sized>(fetch: &F, url: &str) -> Result<Vec<CatalogEntry>> {
    let html = fetch
        .get_text(url, &[])
        .map_err(|e| PokedexError::Http(format!("{}: {}", url, e)))?;
    let entries = parse_serebii_dex(&html)?;
    info!("Serebiiから{}件取得", entries.len());
    Ok(entries)
}
