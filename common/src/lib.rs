//! Pokedex Common Library
//!
//! 取得バッチ全体で共有される型・名前変換テーブル・カード選択ロジック。
//! ネットワークやファイルI/Oは持たない。

pub mod error;
pub mod names;
pub mod parser;
pub mod rarity;
pub mod types;

pub use error::{Error, Result};
pub use names::{display_name_from_api, sprite_file_name, sprite_token, tcg_name_token};
pub use parser::{parse_card_search, parse_pokeapi_pokemon, parse_serebii_dex};
pub use rarity::{score_candidate, select_best, RarityTier, HIGH_RES_BONUS};
pub use types::{CardCandidate, CardImages, CatalogEntry, ResolvedRecord};
