// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SelectorSettings;
use crate::domain::models::document::{Document, FieldSelector};
use crate::domain::services::extraction_service::ExtractionError;
use tracing::{debug, warn};
use url::Url;

/// 分页遍历器
///
/// 定位"下一页"控件并解析其目标URL
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    next: FieldSelector,
}

impl PaginationWalker {
    pub fn new(next_page_selector: &str) -> Result<Self, ExtractionError> {
        Ok(Self {
            next: FieldSelector::parse("next_page", next_page_selector, Some("href"))?,
        })
    }

    pub fn from_settings(selectors: &SelectorSettings) -> Result<Self, ExtractionError> {
        Self::new(&selectors.next_page)
    }

    /// 下一页URL
    ///
    /// 相对链接基于当前页面URL解析，片段标识符被移除。
    /// 没有控件、`href` 为空或无法解析时返回 `None`
    pub fn next_page(&self, document: &Document) -> Option<Url> {
        let href = document.query(&self.next)?;
        let href = href.trim();
        if href.is_empty() {
            debug!("Next page control on {} has an empty href", document.url());
            return None;
        }

        match document.url().join(href) {
            Ok(mut url) if url.scheme() == "http" || url.scheme() == "https" => {
                url.set_fragment(None);
                Some(url)
            }
            Ok(url) => {
                warn!("Ignoring non-http next page link: {}", url);
                None
            }
            Err(e) => {
                warn!("Unresolvable next page link '{}': {}", href, e);
                None
            }
        }
    }
}
