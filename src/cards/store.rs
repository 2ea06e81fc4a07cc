//! 解決済みカードの進捗ストア
//!
//! data/cards.json（図鑑番号 → ResolvedRecord）を読み込み、実行中はメモリ上で追記し、
//! 書き出しのたびにファイル全体を置き換える。一度入った番号は上書きしない。

use crate::error::Result;
use pokedex_common::ResolvedRecord;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    records: BTreeMap<u32, ResolvedRecord>,
    flushes: usize,
}

impl ProgressStore {
    /// 空のストア（ファイルは読まない）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
            flushes: 0,
        }
    }

    /// 前回までの結果を読み込み
    ///
    /// ファイルが無い・壊れている場合は空として扱う。
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        if !store.path.exists() {
            return store;
        }

        let file = match File::open(&store.path) {
            Ok(f) => f,
            Err(e) => {
                warn!("{} を開けません（空として扱います）: {}", store.path.display(), e);
                return store;
            }
        };

        match serde_json::from_reader::<_, BTreeMap<u32, ResolvedRecord>>(BufReader::new(file)) {
            Ok(records) => store.records = records,
            Err(e) => warn!("{} が壊れています（空として扱います）: {}", store.path.display(), e),
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has(&self, id: u32) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<&ResolvedRecord> {
        self.records.get(&id)
    }

    /// 追加（既にある番号は何もしない）
    ///
    /// 追加したら `true`。
    pub fn put(&mut self, id: u32, record: ResolvedRecord) -> bool {
        if self.records.contains_key(&id) {
            return false;
        }
        self.records.insert(id, record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 番号順
    pub fn iter(&self) -> impl Iterator<Item = (u32, &ResolvedRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    /// この実行中に書き出した回数
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// ファイル全体を書き出し
    ///
    /// 同じディレクトリの一時ファイルに書いてから rename で置き換える。
    pub fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.write_all(b"\n")?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        self.flushes += 1;
        Ok(())
    }

    /// ファイルを削除
    ///
    /// 削除したら `true`、元から無ければ `false`。
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cards.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
