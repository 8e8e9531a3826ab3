// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SelectorSettings;
use crate::domain::models::document::{compile_selector, Document, FieldSelector, SelectorError};
use crate::domain::models::record::Record;
use scraper::Selector;
use thiserror::Error;
use tracing::info;

/// 提取错误类型
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 选择器无效
    #[error(transparent)]
    InvalidSelector(#[from] SelectorError),
}

/// 清洗文本
///
/// 输入缺失或为空时返回空字符串，否则移除所有双引号并去掉首尾空白
pub fn clean(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => t.replace('"', "").trim().to_string(),
        _ => String::new(),
    }
}

/// 记录提取器
///
/// 在每个记录块内部按字段选择器取值，字段缺失时退化为占位值，从不失败
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    block: Selector,
    title: FieldSelector,
    price: FieldSelector,
    description: FieldSelector,
    review_count: FieldSelector,
}

impl RecordExtractor {
    /// 根据配置编译选择器
    ///
    /// # 参数
    ///
    /// * `selectors` - 选择器配置
    ///
    /// # 返回值
    ///
    /// * `Ok(RecordExtractor)` - 编译好的提取器
    /// * `Err(ExtractionError)` - 任一选择器无效
    pub fn from_settings(selectors: &SelectorSettings) -> Result<Self, ExtractionError> {
        Ok(Self {
            block: compile_selector("block", &selectors.block)?,
            title: FieldSelector::parse(
                "title",
                &selectors.title,
                selectors.title_attr.as_deref(),
            )?,
            price: FieldSelector::parse("price", &selectors.price, None)?,
            description: FieldSelector::parse("description", &selectors.description, None)?,
            review_count: FieldSelector::parse("review_count", &selectors.review_count, None)?,
        })
    }

    /// 从文档中提取记录
    ///
    /// 按文档顺序返回；没有记录块时返回空列表
    pub fn extract(&self, document: &Document) -> Vec<Record> {
        let records: Vec<Record> = document
            .select(&self.block)
            .map(|block| {
                Record::new(
                    clean(self.title.query_in(block).as_deref()),
                    clean(self.price.query_in(block).as_deref()),
                    clean(self.description.query_in(block).as_deref()),
                    clean(self.review_count.query_in(block).as_deref()),
                )
            })
            .collect();

        info!(
            "Found {} product blocks on {}",
            records.len(),
            document.url()
        );
        records
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
