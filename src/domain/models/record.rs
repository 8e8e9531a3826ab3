// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

/// 缺失字段的占位值
pub const SENTINEL: &str = "N/A";

/// 商品记录
///
/// 所有字段均为清洗后的原始文本，缺失或为空时为 [`SENTINEL`]。
/// 数值转换只在生成表格时进行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    title: String,
    price: String,
    description: String,
    review_count: String,
}

/// 去重键 `(title, price)`，取自转换前的原始文本
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey(pub String, pub String);

/// 记录字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Title,
    Price,
    Description,
    ReviewCount,
}

impl Record {
    /// 创建记录，空字段替换为占位值
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        description: impl Into<String>,
        review_count: impl Into<String>,
    ) -> Self {
        Self {
            title: or_sentinel(title.into()),
            price: or_sentinel(price.into()),
            description: or_sentinel(description.into()),
            review_count: or_sentinel(review_count.into()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn review_count(&self) -> &str {
        &self.review_count
    }

    /// 按字段取值
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Title => &self.title,
            RecordField::Price => &self.price,
            RecordField::Description => &self.description,
            RecordField::ReviewCount => &self.review_count,
        }
    }

    /// 去重键
    pub fn key(&self) -> RecordKey {
        RecordKey(self.title.clone(), self.price.clone())
    }
}

fn or_sentinel(value: String) -> String {
    if value.is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}
