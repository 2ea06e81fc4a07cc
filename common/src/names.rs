//! 名前変換モジュール
//!
//! 表示名 → トークン（URL・検索クエリ用の小文字ハイフン形式）の変換。
//! 特殊な名前だけテーブルで持ち、それ以外は決定的な変換で導出する。

use std::collections::HashMap;

lazy_static::lazy_static! {
    /// 表示名 → スプライトトークン（img.pokemondb.net 用）
    static ref SPRITE_OVERRIDES: HashMap<&'static str, &'static str> = HashMap::from([
        ("Nidoran♀", "nidoran-f"),
        ("Nidoran♂", "nidoran-m"),
        ("Farfetch'd", "farfetchd"),
        ("Mr. Mime", "mr-mime"),
        ("Mime Jr.", "mime-jr"),
        ("Type: Null", "type-null"),
        ("Tapu Koko", "tapu-koko"),
        ("Tapu Lele", "tapu-lele"),
        ("Tapu Bulu", "tapu-bulu"),
        ("Tapu Fini", "tapu-fini"),
        ("Mr. Rime", "mr-rime"),
        ("Sirfetch'd", "sirfetchd"),
        ("Flabébé", "flabebe"),
        ("Hoopa Confined", "hoopa"),
        ("Hoopa Unbound", "hoopa-unbound"),
    ]);

    /// ハイフン形式 → カードAPIの表記（ハイフン形式で表せない名前）
    static ref TCG_OVERRIDES: HashMap<&'static str, &'static str> = HashMap::from([
        ("nidoran-f", "nidoran♀"),
        ("nidoran-m", "nidoran♂"),
        ("farfetchd", "farfetch'd"),
        ("mr-mime", "mr. mime"),
        ("mime-jr", "mime jr."),
        ("type-null", "type: null"),
        ("tapu-koko", "tapu koko"),
        ("tapu-lele", "tapu lele"),
        ("tapu-bulu", "tapu bulu"),
        ("tapu-fini", "tapu fini"),
        ("mr-rime", "mr. rime"),
        ("sirfetchd", "sirfetch'd"),
    ]);

    /// PokeAPI名を単純に整形した結果 → 正式な表示名
    static ref DISPLAY_OVERRIDES: HashMap<&'static str, &'static str> = HashMap::from([
        ("Nidoran F", "Nidoran♀"),
        ("Nidoran M", "Nidoran♂"),
        ("Farfetch D", "Farfetch'd"),
        ("Farfetchd", "Farfetch'd"),
        ("Sirfetchd", "Sirfetch'd"),
        ("Mr Mime", "Mr. Mime"),
        ("Mr Rime", "Mr. Rime"),
        ("Mime Jr", "Mime Jr."),
        ("Type Null", "Type: Null"),
    ]);
}

/// 既定のハイフン化
///
/// 小文字化、空白→`-`、`'` `.` `:` を除去、`♀`→`-f`、`♂`→`-m`。
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.trim().to_lowercase().chars() {
        match c {
            ' ' => out.push('-'),
            '\'' | '’' | '.' | ':' => {}
            '♀' => out.push_str("-f"),
            '♂' => out.push_str("-m"),
            _ => out.push(c),
        }
    }
    out
}

/// スプライトURL用トークン
pub fn sprite_token(display_name: &str) -> String {
    match SPRITE_OVERRIDES.get(display_name.trim()) {
        Some(token) => (*token).to_string(),
        None => hyphenate(display_name),
    }
}

/// カード検索APIの名前フィルタ用トークン
pub fn tcg_name_token(display_name: &str) -> String {
    let token = hyphenate(display_name);
    match TCG_OVERRIDES.get(token.as_str()) {
        Some(api_name) => (*api_name).to_string(),
        None => token,
    }
}

/// PokeAPIの名前（例: "mr-mime"）を表示名（例: "Mr. Mime"）に変換
pub fn display_name_from_api(api_name: &str) -> String {
    let display = api_name
        .split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    match DISPLAY_OVERRIDES.get(display.as_str()) {
        Some(fixed) => (*fixed).to_string(),
        None => display,
    }
}

/// `0001_bulbasaur.png` 形式のファイル名
pub fn sprite_file_name(id: u32, token: &str) -> String {
    format!("{:04}_{}.png", id, token)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenate_plain() {
        assert_eq!(hyphenate("Bulbasaur"), "bulbasaur");
        assert_eq!(hyphenate("Great Tusk"), "great-tusk");
        assert_eq!(hyphenate("  Iron Valiant "), "iron-valiant");
    }

    #[test]
    fn test_hyphenate_punctuation_and_gender() {
        assert_eq!(hyphenate("Farfetch'd"), "farfetchd");
        assert_eq!(hyphenate("Mr. Mime"), "mr-mime");
        assert_eq!(hyphenate("Type: Null"), "type-null");
        assert_eq!(hyphenate("Nidoran♀"), "nidoran-f");
        assert_eq!(hyphenate("Nidoran♂"), "nidoran-m");
    }

    #[test]
    fn test_sprite_token_overrides() {
        assert_eq!(sprite_token("Flabébé"), "flabebe");
        assert_eq!(sprite_token("Hoopa Confined"), "hoopa");
        assert_eq!(sprite_token("Hoopa Unbound"), "hoopa-unbound");
        // テーブル外はハイフン化
        assert_eq!(sprite_token("Jangmo-o"), "jangmo-o");
        assert_eq!(sprite_token("Wo-Chien"), "wo-chien");
    }

    #[test]
    fn test_tcg_name_token() {
        assert_eq!(tcg_name_token("Pikachu"), "pikachu");
        assert_eq!(tcg_name_token("Nidoran♀"), "nidoran♀");
        assert_eq!(tcg_name_token("Mr. Mime"), "mr. mime");
        assert_eq!(tcg_name_token("Type: Null"), "type: null");
        assert_eq!(tcg_name_token("Sirfetch'd"), "sirfetch'd");
        assert_eq!(tcg_name_token("Tapu Koko"), "tapu koko");
        assert_eq!(tcg_name_token("Roaring Moon"), "roaring-moon");
    }

    #[test]
    fn test_display_name_from_api() {
        assert_eq!(display_name_from_api("bulbasaur"), "Bulbasaur");
        assert_eq!(display_name_from_api("nidoran-f"), "Nidoran♀");
        assert_eq!(display_name_from_api("mr-mime"), "Mr. Mime");
        assert_eq!(display_name_from_api("mime-jr"), "Mime Jr.");
        assert_eq!(display_name_from_api("type-null"), "Type: Null");
        assert_eq!(display_name_from_api("farfetchd"), "Farfetch'd");
        assert_eq!(display_name_from_api("iron-valiant"), "Iron Valiant");
    }

    #[test]
    fn test_sprite_file_name() {
        assert_eq!(sprite_file_name(1, "bulbasaur"), "0001_bulbasaur.png");
        assert_eq!(sprite_file_name(1025, "pecharunt"), "1025_pecharunt.png");
    }
}
