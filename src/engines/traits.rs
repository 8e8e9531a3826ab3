// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    /// 就绪条件未满足
    #[error("Readiness selector '{0}' never matched")]
    NotReady(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::Status(code) => *code >= 500,
            EngineError::Timeout => true,
            _ => false,
        }
    }
}

/// 渲染请求
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// 目标URL
    pub url: String,
    /// 就绪条件选择器
    pub readiness_selector: String,
    /// 超时时间
    pub timeout: Duration,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>, readiness_selector: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            readiness_selector: readiness_selector.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// 渲染完成的页面
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 最终URL（重定向之后）
    pub url: String,
    /// 渲染后的 HTML
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 渲染引擎特质
///
/// 给定URL，等待就绪条件满足后返回渲染完成的文档
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// 渲染页面并等待就绪
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
