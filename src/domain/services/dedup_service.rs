// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::{Record, RecordKey};
use std::collections::HashSet;
use tracing::debug;

/// 记录去重器
///
/// 以 `(title, price)` 原始文本为键，保留每个键第一次出现的记录
#[derive(Debug, Default)]
pub struct RecordDeduplicator {
    seen: HashSet<RecordKey>,
}

impl RecordDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录键并返回它是否已经出现过
    pub fn is_duplicate(&mut self, record: &Record) -> bool {
        !self.seen.insert(record.key())
    }
}

/// 去重，保持首次出现的顺序
pub fn dedupe(records: Vec<Record>) -> Vec<Record> {
    let total = records.len();
    let mut deduplicator = RecordDeduplicator::new();
    let unique: Vec<Record> = records
        .into_iter()
        .filter(|record| !deduplicator.is_duplicate(record))
        .collect();

    debug!(
        "Deduplicated {} records into {} ({} duplicates dropped)",
        total,
        unique.len(),
        total - unique.len()
    );
    unique
}
