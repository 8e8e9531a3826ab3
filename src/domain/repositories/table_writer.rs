// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::Table;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 表格写入错误类型
#[derive(Error, Debug)]
pub enum WriteError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Spreadsheet error: {0}")]
    Format(String),
}

/// 表格写入器特质
///
/// 接收带样式的类型化表格并持久化为文件
#[async_trait]
pub trait TableWriter: Send + Sync {
    /// 将表格写入指定路径
    async fn write(&self, table: &Table, path: &Path) -> Result<(), WriteError>;
}
