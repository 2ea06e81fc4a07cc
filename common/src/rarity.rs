//! レアリティラダー
//!
//! 候補カードをレアリティ表記で順位付けし、最良の1枚を選ぶ。
//! 判定は小文字化した表記への部分一致で、上位の段から順に最初に一致した段を採用する
//! （"gold" と "secret rare" を両方含む表記は Secret として扱う）。

use crate::types::CardCandidate;

/// 高解像度画像がある場合の加点
pub const HIGH_RES_BONUS: u32 = 10;

/// レアリティの段（上位ほど高得点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RarityTier {
    Unrecognized,
    Common,
    Uncommon,
    Rare,
    RareHolo,
    Gold,
    RainbowRare,
    UltraRare,
    SecretRare,
}

impl RarityTier {
    /// レアリティ表記から段を判定
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();

        if label.contains("secret rare") {
            RarityTier::SecretRare
        } else if label.contains("ultra rare") {
            RarityTier::UltraRare
        } else if label.contains("rainbow rare") {
            RarityTier::RainbowRare
        } else if label.contains("gold") {
            // "golden" も含む
            RarityTier::Gold
        } else if label.contains("rare") && label.contains("holo") {
            RarityTier::RareHolo
        } else if label.contains("rare") {
            RarityTier::Rare
        } else if label.contains("uncommon") {
            RarityTier::Uncommon
        } else if label.contains("common") {
            RarityTier::Common
        } else {
            RarityTier::Unrecognized
        }
    }

    pub fn score(self) -> u32 {
        match self {
            RarityTier::SecretRare => 2000,
            RarityTier::UltraRare => 1500,
            RarityTier::RainbowRare => 1200,
            RarityTier::Gold => 1000,
            RarityTier::RareHolo => 800,
            RarityTier::Rare => 500,
            RarityTier::Uncommon => 100,
            RarityTier::Common => 50,
            RarityTier::Unrecognized => 0,
        }
    }
}

/// 候補のスコア（レアリティ + 高解像度ボーナス）
pub fn score_candidate(candidate: &CardCandidate) -> u32 {
    let mut score = RarityTier::classify(candidate.rarity()).score();
    if candidate.has_high_resolution_image() {
        score += HIGH_RES_BONUS;
    }
    score
}

/// 最高スコアの候補を選ぶ
///
/// 同点の場合はAPIが返した順で先に出たものを採用する。
pub fn select_best(candidates: &[CardCandidate]) -> Option<&CardCandidate> {
    let mut best: Option<(&CardCandidate, u32)> = None;

    for candidate in candidates {
        let score = score_candidate(candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate)
}
