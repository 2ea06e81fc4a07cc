use crate::error::{PokedexError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CATALOG_FILE: &str = "data/pokemon.json";
pub const CARDS_FILE: &str = "data/cards.json";
pub const SPRITES_DIR: &str = "sprites";
pub const CARD_IMAGES_DIR: &str = "cards";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// カード検索API
    pub tcg_api_base: String,
    pub pokeapi_base: String,
    pub serebii_url: String,
    /// スプライトURLのテンプレート（`{token}` を置換、先頭から順に試す）
    pub sprite_sources: Vec<String>,
    /// PokeAPIから取得する図鑑番号の上限
    pub pokedex_size: u32,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// カード解決1件ごとの待機
    pub request_delay_ms: u64,
    /// 画像ダウンロード1件ごとの待機
    pub sprite_delay_ms: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    /// PokeAPIへ20件取得するごとの休止
    pub pokeapi_pause_ms: u64,
    /// 何件処理するごとに cards.json を書き出すか
    pub checkpoint_every: usize,
    /// 前回の書き出しから何秒経ったら書き出すか（未設定なら件数のみ）
    pub checkpoint_interval_secs: Option<u64>,
    /// data/ sprites/ cards/ を置くディレクトリ
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcg_api_base: "https://api.pokemontcg.io/v2/cards".into(),
            pokeapi_base: "https://pokeapi.co/api/v2".into(),
            serebii_url: "https://www.serebii.net/pokemon/nationalpokedex.shtml".into(),
            sprite_sources: vec![
                "https://img.pokemondb.net/sprites/scarlet-violet/normal/{token}.png".into(),
                "https://img.pokemondb.net/sprites/brilliant-diamond-shining-pearl/normal/{token}.png".into(),
                "https://img.pokemondb.net/sprites/bank/normal/{token}.png".into(),
            ],
            pokedex_size: 1025, // 第9世代まで
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            timeout_seconds: 10,
            request_delay_ms: 200, // 無料枠は1日1000リクエスト
            sprite_delay_ms: 100,
            max_attempts: 2,
            retry_backoff_ms: 500,
            pokeapi_pause_ms: 500,
            checkpoint_every: 10,
            checkpoint_interval_secs: None,
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（ファイルが無ければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PokedexError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pokedex-data").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(PokedexError::Config("max_attempts は1以上にしてください".into()));
        }
        if self.checkpoint_every == 0 {
            return Err(PokedexError::Config("checkpoint_every は1以上にしてください".into()));
        }
        if self.sprite_sources.iter().any(|s| !s.contains("{token}")) {
            return Err(PokedexError::Config("sprite_sources には {token} が必要です".into()));
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    pub fn cards_path(&self) -> PathBuf {
        self.data_dir.join(CARDS_FILE)
    }

    pub fn sprites_dir(&self) -> PathBuf {
        self.data_dir.join(SPRITES_DIR)
    }

    pub fn card_images_dir(&self) -> PathBuf {
        self.data_dir.join(CARD_IMAGES_DIR)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn sprite_delay(&self) -> Duration {
        Duration::from_millis(self.sprite_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn pokeapi_pause(&self) -> Duration {
        Duration::from_millis(self.pokeapi_pause_ms)
    }

    /// コマンドラインの指定を反映した設定（自身は変更しない）
    pub fn with_data_dir(&self, data_dir: Option<PathBuf>) -> Self {
        let mut config = self.clone();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        config
    }

    pub fn checkpoint_interval(&self) -> Option<Duration> {
        self.checkpoint_interval_secs.map(Duration::from_secs)
    }
}
