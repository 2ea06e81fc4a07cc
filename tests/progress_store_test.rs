//! 進捗ストアテスト
//!
//! data/cards.json の読み込み・再開・破損時の扱いを検証

use pokedex_common::ResolvedRecord;
use pokedex_data::cards::ProgressStore;
use tempfile::tempdir;

fn record(image: &str, rarity: &str) -> ResolvedRecord {
    ResolvedRecord {
        image_reference: image.to_string(),
        card_display_name: "Pikachu".to_string(),
        collection_name: "Base".to_string(),
        rarity_label: rarity.to_string(),
    }
}

/// ファイルが無い場合は空
#[test]
fn test_load_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ProgressStore::load(dir.path().join("cards.json"));

    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
}

/// 保存と読み込み
#[test]
fn test_flush_and_reload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("cards.json");

    let mut store = ProgressStore::load(&path);
    store.put(25, record("https://images.pokemontcg.io/base1/58_hires.png", "Common"));
    store.put(6, record("https://images.pokemontcg.io/base1/4_hires.png", "Rare Holo"));
    store.flush().expect("保存失敗");

    let loaded = ProgressStore::load(&path);
    assert_eq!(loaded.len(), 2);
    assert!(loaded.has(6));
    assert!(loaded.has(25));
    assert!(!loaded.has(1));
    assert_eq!(loaded.get(6).unwrap().rarity_label, "Rare Holo");
}

/// 既存の形式（番号文字列キー）を読める
#[test]
fn test_load_existing_cards_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cards.json");
    std::fs::write(
        &path,
        r#"{
  "1": {
    "card_image": "https://images.pokemontcg.io/base1/44_hires.png",
    "card_name": "Bulbasaur",
    "set_name": "Base",
    "rarity": "Common"
  }
}"#,
    )
    .unwrap();

    let store = ProgressStore::load(&path);
    assert_eq!(store.len(), 1);
    let r = store.get(1).expect("#1 が見つからない");
    assert_eq!(r.card_display_name, "Bulbasaur");
    assert_eq!(r.collection_name, "Base");
}

/// 再開時に既存レコードを上書きしない
#[test]
fn test_resume_does_not_overwrite() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cards.json");

    let mut first = ProgressStore::load(&path);
    first.put(1, record("original", "Rare"));
    first.flush().unwrap();

    let mut second = ProgressStore::load(&path);
    assert!(!second.put(1, record("replacement", "Secret Rare")));
    assert!(second.put(2, record("new", "Common")));
    second.flush().unwrap();

    let loaded = ProgressStore::load(&path);
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get(1).unwrap().image_reference, "original");
}

/// 破損したファイルは空として扱う
#[test]
fn test_corrupted_file_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cards.json");
    std::fs::write(&path, "{ invalid json").unwrap();

    let mut store = ProgressStore::load(&path);
    assert!(store.is_empty());

    // 破損ファイルは次の書き出しで置き換わる
    store.put(1, record("L", "Rare"));
    store.flush().unwrap();
    assert_eq!(ProgressStore::load(&path).len(), 1);
}

/// 形式違い（配列など）も空として扱う
#[test]
fn test_wrong_shape_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("cards.json");
    std::fs::write(&path, r#"[{"number": 1}]"#).unwrap();

    assert!(ProgressStore::load(&path).is_empty());
}
