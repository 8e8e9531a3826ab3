// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// 选择器解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid selector '{selector}' for {name}: {reason}")]
pub struct SelectorError {
    /// 选择器用途
    pub name: String,
    /// 原始选择器
    pub selector: String,
    /// 解析失败原因
    pub reason: String,
}

/// 编译后的 CSS 选择器
pub fn compile_selector(name: &str, css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|e| SelectorError {
        name: name.to_string(),
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// 字段选择器
///
/// `attr` 为 `None` 时取第一个直接子文本节点，否则取对应属性。
/// 多个元素匹配时按文档顺序取第一个有值的结果
#[derive(Debug, Clone)]
pub struct FieldSelector {
    selector: Selector,
    attr: Option<String>,
}

impl FieldSelector {
    /// 解析字段选择器
    pub fn parse(name: &str, css: &str, attr: Option<&str>) -> Result<Self, SelectorError> {
        Ok(Self {
            selector: compile_selector(name, css)?,
            attr: attr.filter(|a| !a.trim().is_empty()).map(str::to_string),
        })
    }

    /// 在指定元素内查询第一个匹配项
    pub fn query_in(&self, scope: ElementRef<'_>) -> Option<String> {
        self.first(scope.select(&self.selector))
    }

    fn first<'a>(&self, mut elements: impl Iterator<Item = ElementRef<'a>>) -> Option<String> {
        elements.find_map(|element| self.read(element))
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        match &self.attr {
            Some(attr) => element.value().attr(attr).map(str::to_string),
            None => element
                .children()
                .find_map(|node| node.value().as_text().map(|text| text.to_string())),
        }
    }
}

/// 已渲染的文档
///
/// 持有解析后的 DOM 和页面URL。`Html` 不是 `Send`，
/// 因此文档只在同步的单页处理步骤中存在
pub struct Document {
    html: Html,
    url: Url,
}

impl Document {
    /// 解析 HTML
    pub fn parse(content: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(content),
            url,
        }
    }

    /// 页面URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 选择所有匹配元素（文档顺序）
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// 查询文档中第一个匹配项
    pub fn query(&self, field: &FieldSelector) -> Option<String> {
        field.first(self.html.select(&field.selector))
    }
}
