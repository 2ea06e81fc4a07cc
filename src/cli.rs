use crate::catalog::CatalogSource;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pokedex-data")]
#[command(about = "ポケモン図鑑データ・スプライト・カード画像の取得", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// data/ sprites/ cards/ の置き場所（設定ファイルより優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 図鑑カタログ（data/pokemon.json）を作成
    Catalog {
        /// 取得元 (pokeapi/serebii)
        #[arg(short, long, default_value = "pokeapi")]
        source: CatalogSource,

        /// 開始番号（pokeapiのみ）
        #[arg(long, default_value = "1")]
        from: u32,

        /// 終了番号（pokeapiのみ、省略時は設定の pokedex_size）
        #[arg(long)]
        to: Option<u32>,
    },

    /// スプライトをダウンロード（取得済みはスキップ）
    Sprites,

    /// カード画像URLを解決して data/cards.json に保存（前回の続きから）
    Cards {
        /// 今回解決する最大件数
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// data/cards.json のカード画像をダウンロード
    CardImages,

    /// カタログ作成からスプライト取得まで一括実行
    Setup {
        /// 取得元 (pokeapi/serebii)
        #[arg(short, long, default_value = "pokeapi")]
        source: CatalogSource,
    },

    /// 進捗（data/cards.json）の確認・削除
    Progress {
        /// 進捗ファイルを削除
        #[arg(long)]
        clear: bool,

        /// 削除時の確認を省略
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを書き出す
        #[arg(long)]
        init: bool,
    },
}
