//! ログ初期化
//!
//! 進捗表示は標準出力、診断ログ（リトライ・スキップ理由など）は tracing で標準エラーへ。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` を優先し、未設定なら `info`（`--verbose` 時は `debug`）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,pokedex_data={0},pokedex_common={0}", default_level)));

    // 二重初期化（テストなど）は無視
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
