//! データ型定義
//!
//! - CatalogEntry: 図鑑カタログ（data/pokemon.json）の1件
//! - CardCandidate: カード検索APIが返した候補（1回の解決中だけ存在）
//! - ResolvedRecord: 選ばれたカード（data/cards.json に永続化）

use serde::{Deserialize, Serialize};

/// 図鑑カタログの1件
///
/// ファイル形式は `{"number", "name", "sprite_name"}`（Webフロントと共通）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 全国図鑑番号
    #[serde(rename = "number")]
    pub id: u32,

    /// 表示名（例: "Mr. Mime"）
    #[serde(rename = "name")]
    pub display_name: String,

    /// スプライトURL用トークン（例: "mr-mime"）
    #[serde(rename = "sprite_name", default, skip_serializing_if = "Option::is_none")]
    pub sprite_token: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: u32, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            sprite_token: None,
        }
    }

    /// スプライトトークン（未設定なら表示名から導出）
    pub fn sprite_token(&self) -> String {
        match &self.sprite_token {
            Some(token) if !token.is_empty() => token.clone(),
            _ => crate::names::sprite_token(&self.display_name),
        }
    }
}

/// カード画像URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardImages {
    pub small: Option<String>,
    pub large: Option<String>,
}

/// カード検索の候補
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardCandidate {
    pub display_name: Option<String>,
    pub rarity_label: Option<String>,
    pub collection_name: Option<String>,
    pub images: CardImages,
}

impl CardCandidate {
    /// 高解像度画像があるか
    pub fn has_high_resolution_image(&self) -> bool {
        non_empty(&self.images.large).is_some()
    }

    /// 採用する画像URL（large優先、なければsmall）
    pub fn image_reference(&self) -> Option<&str> {
        non_empty(&self.images.large).or_else(|| non_empty(&self.images.small))
    }

    /// レアリティ表記（未設定は空文字）
    pub fn rarity(&self) -> &str {
        self.rarity_label.as_deref().unwrap_or("")
    }

    /// 解決済みレコードへ変換
    ///
    /// 画像URLが無い候補は `None`。
    pub fn into_record(self, fallback_name: &str) -> Option<ResolvedRecord> {
        let image_reference = self.image_reference()?.to_string();
        Some(ResolvedRecord {
            image_reference,
            card_display_name: self
                .display_name
                .unwrap_or_else(|| fallback_name.to_string()),
            collection_name: self
                .collection_name
                .unwrap_or_else(|| ResolvedRecord::UNKNOWN.to_string()),
            rarity_label: self
                .rarity_label
                .unwrap_or_else(|| ResolvedRecord::UNKNOWN.to_string()),
        })
    }
}

/// 解決済みカード
///
/// ファイル形式は `{"card_image", "card_name", "set_name", "rarity"}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    #[serde(rename = "card_image")]
    pub image_reference: String,

    #[serde(rename = "card_name")]
    pub card_display_name: String,

    #[serde(rename = "set_name")]
    pub collection_name: String,

    #[serde(rename = "rarity")]
    pub rarity_label: String,
}

impl ResolvedRecord {
    pub const UNKNOWN: &'static str = "Unknown";
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
