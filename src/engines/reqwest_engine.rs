// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RendererSettings;
use crate::engines::traits::{EngineError, RenderEngine, RenderRequest, RenderedPage};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Instant;

/// HTTP 渲染引擎
///
/// 基于reqwest实现，适用于无需执行JavaScript的列表页。
/// 就绪条件在静态 HTML 上检查一次，不满足即失败
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的HTTP引擎
    pub fn new(settings: &RendererSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

/// 检查就绪选择器是否在文档中命中
fn readiness_matches(content: &str, selector: &str) -> Result<bool, EngineError> {
    let selector = Selector::parse(selector)
        .map_err(|e| EngineError::Other(format!("Invalid readiness selector '{}': {:?}", selector, e)))?;
    let document = Html::parse_document(content);
    let matched = document.select(&selector).next().is_some();
    Ok(matched)
}

#[async_trait]
impl RenderEngine for ReqwestEngine {
    /// 执行HTTP抓取并校验就绪条件
    ///
    /// # 参数
    ///
    /// * `request` - 渲染请求
    ///
    /// # 返回值
    ///
    /// * `Ok(RenderedPage)` - 抓取到的页面
    /// * `Err(EngineError)` - 请求失败、状态码异常或就绪条件未满足
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, EngineError> {
        let start = Instant::now();
        let response = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let url = response.url().to_string();
        let content = response.text().await?;

        if !readiness_matches(&content, &request.readiness_selector)? {
            return Err(EngineError::NotReady(request.readiness_selector.clone()));
        }

        Ok(RenderedPage {
            url,
            content,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
