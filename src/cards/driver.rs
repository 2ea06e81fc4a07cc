use super::resolver::CardResolver;
use super::source::CardSource;
use super::store::ProgressStore;
use crate::error::Result;
use indicatif::ProgressBar;
use pokedex_common::CatalogEntry;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 書き出しのタイミング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointPolicy {
    /// 処理件数（スキップは数えない）ごと
    pub every: usize,
    /// 前回の書き出しからの経過時間
    pub interval: Option<Duration>,
}

impl CheckpointPolicy {
    fn is_due(&self, processed: usize, since_flush: Duration) -> bool {
        let by_count = self.every > 0 && processed % self.every == 0;
        let by_time = self.interval.is_some_and(|interval| since_flush >= interval);
        by_count || by_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub checkpoint: CheckpointPolicy,
    /// 解決1件ごとの待機
    pub request_delay: Duration,
    /// 今回処理する最大件数（スキップは数えない）
    pub limit: Option<usize>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            checkpoint: CheckpointPolicy {
                every: 10,
                interval: None,
            },
            request_delay: Duration::from_millis(200),
            limit: None,
        }
    }
}

/// 実行結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRunSummary {
    pub total: usize,
    /// 前回までに解決済み
    pub skipped: usize,
    pub found: usize,
    pub not_found: usize,
    /// 通信エラーで解決できなかった（次回再試行）
    pub failed: usize,
    pub flushes: usize,
}

impl CardRunSummary {
    pub fn processed(&self) -> usize {
        self.found + self.not_found + self.failed
    }
}

/// カタログ全体のカードを解決
///
/// 番号の昇順に処理し、ストアにある番号はネットワークに触れずにスキップする。
/// `checkpoint` に従って途中で書き出し、最後に必ずもう一度書き出す。
pub fn run_cards<S: CardSource>(
    catalog: &[CatalogEntry],
    resolver: &CardResolver<S>,
    store: &mut ProgressStore,
    options: &DriverOptions,
    progress: &ProgressBar,
) -> Result<CardRunSummary> {
    let mut entries: Vec<&CatalogEntry> = catalog.iter().collect();
    entries.sort_by_key(|e| e.id);

    let mut summary = CardRunSummary {
        total: entries.len(),
        ..Default::default()
    };
    let flushes_before = store.flush_count();
    let mut last_flush = Instant::now();

    progress.set_length(entries.len() as u64);

    for entry in entries {
        progress.inc(1);

        if store.has(entry.id) {
            debug!("#{} 解決済み → スキップ", entry.id);
            summary.skipped += 1;
            continue;
        }

        if options.limit.is_some_and(|limit| summary.processed() >= limit) {
            debug!("処理上限 {:?} 件に達しました", options.limit);
            break;
        }

        if summary.processed() > 0 && !options.request_delay.is_zero() {
            std::thread::sleep(options.request_delay);
        }

        progress.set_message(entry.display_name.clone());
        match resolver.resolve(entry) {
            Ok(Some(record)) => {
                info!(
                    "✔ #{} {}: {} ({}, {})",
                    entry.id, entry.display_name, record.card_display_name, record.collection_name, record.rarity_label
                );
                store.put(entry.id, record);
                summary.found += 1;
            }
            Ok(None) => {
                info!("✗ #{} {}: カードが見つかりません", entry.id, entry.display_name);
                summary.not_found += 1;
            }
            Err(err) => {
                warn!("✗ #{} {}: {}", entry.id, entry.display_name, err);
                summary.failed += 1;
            }
        }

        if options.checkpoint.is_due(summary.processed(), last_flush.elapsed()) {
            store.flush()?;
            last_flush = Instant::now();
            debug!("途中保存: {}件", store.len());
        }
    }

    store.flush()?;
    summary.flushes = store.flush_count() - flushes_before;
    progress.finish_and_clear();

    Ok(summary)
}
