//! レスポンスパーサー
//!
//! - カード検索API（api.pokemontcg.io）のJSON → CardCandidate
//! - PokeAPIの `/pokemon/{id}` JSON → CatalogEntry
//! - Serebii全国図鑑ページのHTML → CatalogEntry

use crate::error::{Error, Result};
use crate::names::{display_name_from_api, sprite_token};
use crate::types::{CardCandidate, CardImages, CatalogEntry};
use regex::Regex;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CardSearchResponse {
    #[serde(default)]
    data: Vec<ApiCard>,
}

#[derive(Debug, Deserialize)]
struct ApiCard {
    name: Option<String>,
    rarity: Option<String>,
    set: Option<ApiSet>,
    #[serde(default)]
    images: CardImages,
}

#[derive(Debug, Deserialize)]
struct ApiSet {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPokemon {
    name: String,
}

/// カード検索レスポンスをパース
///
/// `data` が無いレスポンスは候補0件として扱う。
pub fn parse_card_search(body: &str) -> Result<Vec<CardCandidate>> {
    let response: CardSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .data
        .into_iter()
        .map(|card| CardCandidate {
            display_name: card.name,
            rarity_label: card.rarity,
            collection_name: card.set.and_then(|s| s.name),
            images: card.images,
        })
        .collect())
}

/// PokeAPIのポケモン詳細をパース
///
/// スプライトトークンはAPI名（既に小文字ハイフン形式）をそのまま使う。
pub fn parse_pokeapi_pokemon(id: u32, body: &str) -> Result<CatalogEntry> {
    let pokemon: ApiPokemon = serde_json::from_str(body)?;
    let api_name = pokemon.name.trim().to_lowercase();
    if api_name.is_empty() {
        return Err(Error::Parse(format!("#{}: nameが空です", id)));
    }

    Ok(CatalogEntry {
        id,
        display_name: display_name_from_api(&api_name),
        sprite_token: Some(api_name),
    })
}

/// Serebii全国図鑑ページをパース
///
/// `dextable` の各行から 1列目の番号と 3列目のリンク文字列を取り出す。
/// 番号順にソートし、同じ番号は最初の行だけ残す。
pub fn parse_serebii_dex(html: &str) -> Result<Vec<CatalogEntry>> {
    lazy_static::lazy_static! {
        static ref TABLE_RE: Regex = Regex::new(r#"(?is)<table[^>]*class\s*=\s*["']?dextable["']?[^>]*>(.*?)</table>"#).unwrap();
        static ref ROW_RE: Regex = Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap();
        static ref CELL_RE: Regex = Regex::new(r"(?is)<td[^>]*>(.*?)</td>").unwrap();
        static ref LINK_RE: Regex = Regex::new(r"(?is)<a[^>]*>(.*?)</a>").unwrap();
    }

    let mut entries = Vec::new();
    let mut found_table = false;

    for table in TABLE_RE.captures_iter(html) {
        found_table = true;
        for row in ROW_RE.captures_iter(&table[1]) {
            let cells: Vec<&str> = CELL_RE
                .captures_iter(&row[1])
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect();
            if cells.len() < 3 {
                continue;
            }

            let number_text = text_content(cells[0]);
            let number_text = number_text.trim_start_matches('#');
            if number_text.is_empty() || !number_text.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let id: u32 = match number_text.parse() {
                Ok(n) if n > 0 => n,
                _ => continue,
            };

            let name = match LINK_RE.captures(cells[2]) {
                Some(link) => text_content(&link[1]),
                None => continue,
            };
            if name.is_empty() {
                continue;
            }

            entries.push(CatalogEntry {
                id,
                sprite_token: Some(sprite_token(&name)),
                display_name: name,
            });
        }
    }

    if !found_table {
        return Err(Error::Parse("dextableが見つかりません".into()));
    }

    entries.sort_by_key(|e| e.id);
    entries.dedup_by_key(|e| e.id);
    Ok(entries)
}

/// タグを除去してエンティティを戻す
fn text_content(fragment: &str) -> String {
    lazy_static::lazy_static! {
        static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
        static ref NUMERIC_ENTITY_RE: Regex = Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").unwrap();
    }

    let text = TAG_RE.replace_all(fragment, "");
    let text = NUMERIC_ENTITY_RE.replace_all(&text, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    let text = text
        .replace("&nbsp;", " ")
        .replace("&apos;", "'")
        .replace("&eacute;", "é")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
