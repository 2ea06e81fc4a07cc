//! HTTP取得
//!
//! すべて逐次・ブロッキング。呼び出し側がテスト用の偽実装に差し替えられるよう
//! `Fetch` トレイトで抽象化する。

use crate::config::Config;
use crate::error::{PokedexError, Result};
use thiserror::Error;
use tracing::debug;

/// 1回のHTTP取得の失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// タイムアウト・接続失敗・切断（再試行の対象）
    #[error("通信エラー: {0}")]
    Transient(String),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    /// レスポンスを解釈できない
    #[error("不正なレスポンス: {0}")]
    Invalid(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

pub trait Fetch {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> std::result::Result<String, FetchError>;

    fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> std::result::Result<String, FetchError> {
        (**self).get_text(url, query)
    }

    fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        (**self).get_bytes(url)
    }
}

/// reqwest（blocking）によるクライアント
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(|e| PokedexError::Http(format!("HTTPクライアント初期化エラー: {}", e)))?;
        Ok(Self { client })
    }

    fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<reqwest::blocking::Response, FetchError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpClient {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> std::result::Result<String, FetchError> {
        self.send(url, query)?.text().map_err(classify)
    }

    fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let bytes = self.send(url, &[])?.bytes().map_err(classify)?;
        Ok(bytes.to_vec())
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_builder() || err.is_decode() {
        FetchError::Invalid(err.to_string())
    } else {
        // timeout / connect / 本文読み込み中の切断
        FetchError::Transient(err.to_string())
    }
}
