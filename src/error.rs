use thiserror::Error;

#[derive(Error, Debug)]
pub enum PokedexError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("カタログが見つかりません: {0}（先に `pokedex-data catalog` を実行してください）")]
    CatalogNotFound(String),

    #[error("HTTPエラー: {0}")]
    Http(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pokedex_common::Error),
}

pub type Result<T> = std::result::Result<T, PokedexError>;
