//! 答案页 - 编排层
//!
//! 从 `BatchStore` 读取一次批次，生成答案页。读取后批次即被丢弃。

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, StoreError};
use crate::infrastructure::BatchStore;
use crate::services::markup::render_answer_key;

/// 取出批次并生成答案页文本
pub fn take_answer_key(store: &mut dyn BatchStore) -> AppResult<String> {
    let Some(batch) = store.take()? else {
        warn!("⚠️ 没有可用的题目批次");
        return Err(StoreError::Empty.into());
    };

    info!("🔑 正在生成答案页: 共 {} 道题", batch.len());
    Ok(render_answer_key(&batch))
}

/// 取出批次并把答案页写入文件
pub fn write_answer_key(store: &mut dyn BatchStore, path: &Path) -> AppResult<()> {
    let html = take_answer_key(store)?;
    fs::write(path, html).map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    info!("🔑 答案页已写入: {}", path.display());
    Ok(())
}
