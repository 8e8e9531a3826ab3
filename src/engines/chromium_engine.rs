// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RendererSettings;
use crate::engines::traits::{EngineError, RenderEngine, RenderRequest, RenderedPage};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// 就绪条件轮询间隔
const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chromium 渲染引擎
///
/// 基于chromiumoxide实现，整个运行期间复用同一个浏览器进程，
/// 每次渲染打开一个新标签页并在结束后关闭
pub struct ChromiumEngine {
    settings: RendererSettings,
    browser: OnceCell<Browser>,
}

impl ChromiumEngine {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            browser: OnceCell::new(),
        }
    }

    // 首次渲染时启动或连接浏览器
    async fn browser(&self) -> Result<&Browser, EngineError> {
        self.browser
            .get_or_try_init(|| async {
                let remote_debugging_url = self
                    .settings
                    .remote_debugging_url
                    .clone()
                    .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

                let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                    info!("Connecting to remote Chrome instance at: {}", url);
                    Browser::connect(url).await.map_err(|e| {
                        EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                    })?
                } else {
                    let mut builder = BrowserConfig::builder()
                        .no_sandbox()
                        .request_timeout(Duration::from_secs(30))
                        .arg("--disable-gpu")
                        .arg("--disable-dev-shm-usage");

                    if !self.settings.headless {
                        builder = builder.with_head();
                    }

                    let config = builder.build().map_err(EngineError::Browser)?;
                    info!("Launching local Chrome instance");
                    Browser::launch(config)
                        .await
                        .map_err(|e| EngineError::Browser(e.to_string()))?
                };

                // 持续处理浏览器事件直到连接关闭
                tokio::spawn(async move {
                    while let Some(h) = handler.next().await {
                        if h.is_err() {
                            break;
                        }
                    }
                });

                Ok::<_, EngineError>(browser)
            })
            .await
    }

    async fn load(&self, page: &Page, request: &RenderRequest) -> Result<RenderedPage, EngineError> {
        let start = Instant::now();

        page.set_user_agent(self.settings.user_agent.as_str())
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        page.goto(&request.url)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // 轮询直到就绪选择器命中，超时由调用方控制
        loop {
            if page.find_element(&request.readiness_selector).await.is_ok() {
                break;
            }
            tokio::time::sleep(READINESS_POLL_INTERVAL).await;
        }
        debug!(
            "Readiness selector '{}' matched on {}",
            request.readiness_selector, request.url
        );

        let content = page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| request.url.clone());

        Ok(RenderedPage {
            url,
            content,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    /// 渲染页面并等待就绪选择器出现
    ///
    /// # 参数
    ///
    /// * `request` - 渲染请求
    ///
    /// # 返回值
    ///
    /// * `Ok(RenderedPage)` - 渲染完成的页面
    /// * `Err(EngineError)` - 浏览器错误或超时
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, EngineError> {
        let browser = self.browser().await?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let result = tokio::time::timeout(request.timeout, self.load(&page, request))
            .await
            .map_err(|_| EngineError::Timeout)
            .and_then(|r| r);

        if let Err(e) = page.close().await {
            debug!("Failed to close tab for {}: {}", request.url, e);
        }

        result
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
