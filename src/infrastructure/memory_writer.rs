// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::models::table::Table;
use crate::domain::repositories::table_writer::{TableWriter, WriteError};

/// 测试用的内存写入器
///
/// 按路径保存最近一次写入的表格
#[derive(Clone, Default)]
pub struct InMemoryTableWriter {
    tables: Arc<RwLock<HashMap<PathBuf, Table>>>,
}

impl InMemoryTableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出写入到指定路径的表格
    pub async fn get(&self, path: &Path) -> Option<Table> {
        self.tables.read().await.get(path).cloned()
    }

    /// 已写入的文件数量
    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TableWriter for InMemoryTableWriter {
    async fn write(&self, table: &Table, path: &Path) -> Result<(), WriteError> {
        let mut map = self.tables.write().await;
        map.insert(path.to_path_buf(), table.clone());
        Ok(())
    }
}
