//! 画像ダウンロード（スプライト・カード画像）
//!
//! 保存先に同名ファイルがあれば取得しない。複数の取得元を順に試し、最初に取れたものを保存する。

use crate::cards::ProgressStore;
use crate::error::Result;
use crate::http::Fetch;
use indicatif::ProgressBar;
use pokedex_common::{sprite_file_name, sprite_token, CatalogEntry};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub total: usize,
    /// 既に保存済み
    pub existing: usize,
    pub downloaded: usize,
    pub failed: usize,
}

/// 1件分のダウンロード指示
struct DownloadJob {
    label: String,
    file_name: String,
    urls: Vec<String>,
}

/// スプライトURL（`{token}` を置換）
pub fn sprite_urls(sources: &[String], token: &str) -> Vec<String> {
    sources.iter().map(|s| s.replace("{token}", token)).collect()
}

/// カタログの全スプライトを取得
pub fn download_sprites<F: Fetch + ?Sized>(
    fetch: &F,
    catalog: &[CatalogEntry],
    out_dir: &Path,
    sources: &[String],
    delay: Duration,
    progress: &ProgressBar,
) -> Result<DownloadSummary> {
    let jobs = catalog
        .iter()
        .map(|entry| {
            let token = entry.sprite_token();
            DownloadJob {
                label: format!("{} (#{})", entry.display_name, entry.id),
                file_name: sprite_file_name(entry.id, &token),
                urls: sprite_urls(sources, &token),
            }
        })
        .collect::<Vec<_>>();

    run_jobs(fetch, jobs, out_dir, delay, progress)
}

/// 解決済みカードの画像を取得
///
/// ファイル名はスプライトと同じ `NNNN_<token>` で、拡張子はURLに従う。
pub fn download_card_images<F: Fetch + ?Sized>(
    fetch: &F,
    catalog: &[CatalogEntry],
    store: &ProgressStore,
    out_dir: &Path,
    delay: Duration,
    progress: &ProgressBar,
) -> Result<DownloadSummary> {
    let by_id: HashMap<u32, &CatalogEntry> = catalog.iter().map(|e| (e.id, e)).collect();

    let jobs = store
        .iter()
        .map(|(id, record)| {
            let (label, token) = match by_id.get(&id) {
                Some(entry) => (entry.display_name.clone(), entry.sprite_token()),
                None => (record.card_display_name.clone(), sprite_token(&record.card_display_name)),
            };
            let stem = sprite_file_name(id, &token);
            let stem = stem.trim_end_matches(".png");
            DownloadJob {
                label: format!("{} (#{})", label, id),
                file_name: format!("{}.{}", stem, image_extension(&record.image_reference)),
                urls: vec![record.image_reference.clone()],
            }
        })
        .collect::<Vec<_>>();

    run_jobs(fetch, jobs, out_dir, delay, progress)
}

/// 保存済み画像の枚数
pub fn count_images(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }

    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| matches!(ext.to_string_lossy().to_lowercase().as_str(), "png" | "jpg" | "jpeg" | "webp"))
                .unwrap_or(false)
        })
        .count()
}

fn run_jobs<F: Fetch + ?Sized>(
    fetch: &F,
    jobs: Vec<DownloadJob>,
    out_dir: &Path,
    delay: Duration,
    progress: &ProgressBar,
) -> Result<DownloadSummary> {
    std::fs::create_dir_all(out_dir)?;

    let mut summary = DownloadSummary {
        total: jobs.len(),
        ..Default::default()
    };
    progress.set_length(jobs.len() as u64);

    for job in jobs {
        progress.inc(1);
        let path = out_dir.join(&job.file_name);

        if path.exists() {
            debug!("{} - 保存済み", job.label);
            summary.existing += 1;
            continue;
        }

        progress.set_message(job.label.clone());
        if download_first(fetch, &job.urls, &path)? {
            info!("✔ {}", job.label);
            summary.downloaded += 1;
        } else {
            warn!("✗ {} - 取得できませんでした", job.label);
            summary.failed += 1;
        }

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    progress.finish_and_clear();
    Ok(summary)
}

/// 取得元を順に試し、最初に取れたものを保存
///
/// どれも取れなければ `Ok(false)`。書き込み失敗は `Err`。
fn download_first<F: Fetch + ?Sized>(fetch: &F, urls: &[String], path: &Path) -> Result<bool> {
    for url in urls {
        match fetch.get_bytes(url) {
            Ok(bytes) if !bytes.is_empty() => {
                write_atomic(path, &bytes)?;
                return Ok(true);
            }
            Ok(_) => debug!("{} - 空のレスポンス", url),
            Err(e) => debug!("{} - {}", url, e),
        }
    }
    Ok(false)
}

/// `<name>.tmp` に書いてから rename で置き換える
///
/// 途中で中断しても最終パスに不完全なファイルを残さない。
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut file = File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// URL末尾の拡張子（判別できなければ png）
fn image_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);

    match file.rsplit_once('.') {
        Some((_, ext)) if matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "webp") => ext,
        _ => "png",
    }
}
