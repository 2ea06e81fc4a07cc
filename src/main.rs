use anyhow::Context;
use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use pokedex_data::cards::{self, CardResolver, CheckpointPolicy, DriverOptions, ProgressStore, RetryPolicy, TcgApiClient};
use pokedex_data::{catalog, cli, config, http, images, logging};
use cli::{Cli, Commands};
use config::Config;
use http::HttpClient;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let file_config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    let config = file_config.with_data_dir(cli.data_dir.clone());

    match cli.command {
        Commands::Catalog { source, from, to } => {
            println!("📖 pokedex-data - カタログ作成\n");
            let http = HttpClient::new(&config)?;
            run_catalog(&http, &config, source, from, to)?;
            println!("\n✅ カタログ作成完了");
        }

        Commands::Sprites => {
            println!("🖼  pokedex-data - スプライト取得\n");
            let http = HttpClient::new(&config)?;
            run_sprites(&http, &config)?;
        }

        Commands::Cards { limit } => {
            println!("🃏 pokedex-data - カード画像解決\n");
            let entries = catalog::load_catalog(&config.catalog_path())?;

            let mut store = ProgressStore::load(config.cards_path());
            println!("[1/2] 前回までの解決済み: {}件 ({}件中)", store.len(), entries.len());

            let http = HttpClient::new(&config)?;
            let resolver = CardResolver::new(
                TcgApiClient::new(http, config.tcg_api_base.clone()),
                RetryPolicy {
                    max_attempts: config.max_attempts,
                    backoff: config.retry_backoff(),
                },
            );
            let options = DriverOptions {
                checkpoint: CheckpointPolicy {
                    every: config.checkpoint_every,
                    interval: config.checkpoint_interval(),
                },
                request_delay: config.request_delay(),
                limit,
            };

            println!("[2/2] カード検索中...");
            let summary = cards::run_cards(&entries, &resolver, &mut store, &options, &progress_bar())?;

            println!("✔ 新規: {}件 / 見つからない: {}件 / エラー: {}件 / スキップ: {}件",
                summary.found, summary.not_found, summary.failed, summary.skipped);
            println!("✔ 結果を保存: {} ({}件)", store.path().display(), store.len());
            if summary.failed > 0 {
                println!("  エラーになった番号は次回の実行で再試行されます");
            }
            println!("\n✅ 完了");
        }

        Commands::CardImages => {
            println!("🖼  pokedex-data - カード画像取得\n");
            let entries = catalog::load_catalog(&config.catalog_path())?;
            let store = ProgressStore::load(config.cards_path());
            if store.is_empty() {
                println!("解決済みのカードがありません。先に `pokedex-data cards` を実行してください");
                return Ok(());
            }

            let http = HttpClient::new(&config)?;
            let summary = images::download_card_images(
                &http,
                &entries,
                &store,
                &config.card_images_dir(),
                config.sprite_delay(),
                &progress_bar(),
            )?;
            println!("✔ 取得: {}件 / 保存済み: {}件 / 失敗: {}件 ({}件中)",
                summary.downloaded, summary.existing, summary.failed, summary.total);
        }

        Commands::Setup { source } => {
            println!("🚀 pokedex-data - 一括セットアップ\n");
            let http = HttpClient::new(&config)?;

            println!("{}", "=".repeat(60));
            println!("Step 1: カタログ作成 ({})", source);
            println!("{}", "=".repeat(60));
            run_catalog(&http, &config, source, 1, None)?;

            println!("\n{}", "=".repeat(60));
            println!("Step 2: スプライト取得");
            println!("{}", "=".repeat(60));
            run_sprites(&http, &config)?;

            println!("\n✅ セットアップ完了");
        }

        Commands::Progress { clear, yes } => {
            let cards_path = config.cards_path();

            if cards_path.exists() {
                let store = ProgressStore::load(&cards_path);
                println!("進捗情報:");
                println!("  パス: {}", cards_path.display());
                println!("  解決済み: {}件", store.len());
                if let Ok(modified) = std::fs::metadata(&cards_path).and_then(|m| m.modified()) {
                    let modified: chrono::DateTime<chrono::Local> = modified.into();
                    println!("  更新日時: {}", modified.format("%Y-%m-%d %H:%M:%S"));
                }
            } else {
                println!("進捗ファイルが存在しません: {}", cards_path.display());
            }
            println!("  スプライト: {}枚", images::count_images(&config.sprites_dir()));
            println!("  カード画像: {}枚", images::count_images(&config.card_images_dir()));

            if clear {
                let confirmed = yes
                    || Confirm::new()
                        .with_prompt(format!("{} を削除しますか？", cards_path.display()))
                        .default(false)
                        .interact()?;
                if !confirmed {
                    println!("中止しました");
                } else if ProgressStore::clear(&cards_path)? {
                    println!("✔ 進捗を削除しました: {}", cards_path.display());
                } else {
                    println!("進捗ファイルが存在しません");
                }
            }
        }

        Commands::Config { show, init } => {
            if init {
                file_config.save()?;
                println!("✔ 設定を書き出しました: {}", Config::config_path()?.display());
            }

            if show || !init {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  データ: {}", config.data_dir.display());
                println!("  カードAPI: {}", config.tcg_api_base);
                println!("  PokeAPI: {}", config.pokeapi_base);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  リクエスト間隔: {}ms", config.request_delay_ms);
                println!("  リトライ: {}回 ({}ms間隔)", config.max_attempts, config.retry_backoff_ms);
                println!("  PokeAPI休止: {}ms (20件ごと)", config.pokeapi_pause_ms);
                println!("  途中保存: {}件ごと", config.checkpoint_every);
                if let Some(secs) = config.checkpoint_interval_secs {
                    println!("            {}秒ごと", secs);
                }
            }
        }
    }

    Ok(())
}

fn run_catalog(
    http: &HttpClient,
    config: &Config,
    source: catalog::CatalogSource,
    from: u32,
    to: Option<u32>,
) -> anyhow::Result<()> {
    let entries = match source {
        catalog::CatalogSource::PokeApi => {
            let to = to.unwrap_or(config.pokedex_size);
            println!("- PokeAPIから取得中 (#{}〜#{})...", from, to);
            catalog::fetch_from_pokeapi(
                http,
                &config.pokeapi_base,
                from..=to,
                config.pokeapi_pause(),
                &progress_bar(),
            )
        }
        catalog::CatalogSource::Serebii => {
            println!("- Serebiiから取得中...");
            catalog::fetch_from_serebii(http, &config.serebii_url)?
        }
    };

    if entries.is_empty() {
        anyhow::bail!("カタログが0件でした（取得元: {}）", source);
    }

    let path = config.catalog_path();
    catalog::save_catalog(&path, &entries)
        .with_context(|| format!("{} の保存に失敗しました", path.display()))?;
    println!("✔ {}件を保存: {}", entries.len(), path.display());
    Ok(())
}

fn run_sprites(http: &HttpClient, config: &Config) -> anyhow::Result<()> {
    let entries = catalog::load_catalog(&config.catalog_path())?;
    println!("- {}件のスプライトを取得中...", entries.len());

    let summary = images::download_sprites(
        http,
        &entries,
        &config.sprites_dir(),
        &config.sprite_sources,
        config.sprite_delay(),
        &progress_bar(),
    )?;
    println!("✔ 取得: {}件 / 保存済み: {}件 / 失敗: {}件 ({}件中)",
        summary.downloaded, summary.existing, summary.failed, summary.total);
    Ok(())
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
