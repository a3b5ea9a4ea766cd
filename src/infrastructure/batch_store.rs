//! 题目批次交接 - 基础设施层
//!
//! 生成页把 `QuestionBatch` 放进存储，答案页读取一次后即丢弃。
//! 再次生成会整体覆盖，不会出现新旧题目混在一起的情况。

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;
use crate::models::QuestionBatch;

/// 批次存储能力
pub trait BatchStore {
    /// 写入新批次（整体替换旧批次）
    fn put(&mut self, batch: &QuestionBatch) -> Result<(), StoreError>;

    /// 取出批次，取出后存储为空
    fn take(&mut self) -> Result<Option<QuestionBatch>, StoreError>;

    /// 丢弃当前批次
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// 内存中的批次存储
///
/// 存放序列化后的文本，与文件存储走相同的 JSON 往返
#[derive(Debug, Default)]
pub struct MemoryBatchStore {
    slot: Option<String>,
}

impl MemoryBatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchStore for MemoryBatchStore {
    fn put(&mut self, batch: &QuestionBatch) -> Result<(), StoreError> {
        self.slot = Some(batch.to_json()?);
        Ok(())
    }

    fn take(&mut self) -> Result<Option<QuestionBatch>, StoreError> {
        match self.slot.take() {
            Some(json) => Ok(Some(QuestionBatch::from_json(&json)?)),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}

/// JSON 文件批次存储
pub struct FileBatchStore {
    path: PathBuf,
}

impl FileBatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl BatchStore for FileBatchStore {
    fn put(&mut self, batch: &QuestionBatch) -> Result<(), StoreError> {
        let json = batch.to_json()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // 先写临时文件再改名，读取方看不到写了一半的批次
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!("批次已写入: {} ({} 道题)", self.path.display(), batch.len());
        Ok(())
    }

    fn take(&mut self) -> Result<Option<QuestionBatch>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let batch = QuestionBatch::from_json(&json)?;
        fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;

        debug!("批次已取出: {} ({} 道题)", self.path.display(), batch.len());
        Ok(Some(batch))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
        }
        Ok(())
    }
}
