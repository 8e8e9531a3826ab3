// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::document::Document;
use crate::domain::models::record::Record;
use crate::domain::models::table::ColumnSpec;
use crate::domain::repositories::table_writer::{TableWriter, WriteError};
use crate::domain::services::dedup_service::dedupe;
use crate::domain::services::extraction_service::{ExtractionError, RecordExtractor};
use crate::domain::services::pagination_service::PaginationWalker;
use crate::domain::services::table_service::TableBuilder;
use crate::engines::traits::{EngineError, RenderEngine, RenderRequest, RenderedPage};
use crate::utils::retry_policy::RetryPolicy;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    /// 种子URL无效
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// 选择器配置错误
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// 页面渲染失败
    #[error("Failed to render page {page} ({url}): {source}")]
    Render {
        url: String,
        page: u32,
        #[source]
        source: EngineError,
    },
    /// 输出文件写入失败
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },
}

/// 爬取结束原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// 没有下一页
    NoNextPage,
    /// 下一页链接指向已访问过的页面
    Revisit(Url),
    /// 达到最大页数
    PageLimit(u32),
}

/// 爬取状态
///
/// 在循环中按值传递，每处理一页产生一个新状态
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// 按页面访问顺序、页内文档顺序累积的记录
    pub records: Vec<Record>,
    /// 已渲染的页数
    pub pages_visited: u32,
    /// 已访问的URL，包括请求URL和重定向后的最终URL
    pub visited: HashSet<Url>,
    /// 下一页URL，`None` 表示结束
    pub next: Option<Url>,
    /// 结束原因，循环结束后设置
    pub stop_reason: Option<StopReason>,
}

impl CrawlState {
    fn seed(url: Url) -> Self {
        Self {
            records: Vec::new(),
            pages_visited: 0,
            visited: HashSet::new(),
            next: Some(url),
            stop_reason: None,
        }
    }

    fn absorb(mut self, page: PageOutcome) -> Self {
        self.pages_visited += 1;
        self.visited.insert(page.url);
        self.visited.insert(page.final_url);
        self.records.extend(page.records);
        self.next = page.next;
        self
    }

    fn stop(mut self, reason: StopReason) -> Self {
        self.next = None;
        self.stop_reason = Some(reason);
        self
    }
}

/// 单页处理结果
struct PageOutcome {
    /// 请求的URL
    url: Url,
    /// 重定向之后的最终URL，同时作为相对链接的基准
    final_url: Url,
    records: Vec<Record>,
    next: Option<Url>,
}

/// 运行报告
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub pages_visited: u32,
    pub records_extracted: usize,
    pub records_written: usize,
    pub output_path: PathBuf,
    pub stop_reason: StopReason,
}

/// 爬取选项
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed_url: Url,
    pub readiness_selector: String,
    /// 0 表示不限制
    pub max_pages: u32,
    pub delay: Duration,
    pub timeout: Duration,
    pub output_path: PathBuf,
}

impl CrawlOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        let seed_url =
            Url::parse(&settings.crawl.seed_url).map_err(|source| PipelineError::InvalidSeedUrl {
                url: settings.crawl.seed_url.clone(),
                source,
            })?;

        Ok(Self {
            seed_url,
            readiness_selector: settings.crawl.readiness_selector.clone(),
            max_pages: settings.crawl.max_pages,
            delay: Duration::from_millis(settings.crawl.delay_ms),
            timeout: Duration::from_secs(settings.crawl.timeout_secs),
            output_path: PathBuf::from(&settings.output.path),
        })
    }
}

/// 爬取流水线
///
/// 渲染 → 提取 → 发现下一页 循环直到没有下一页，
/// 然后去重、生成表格并写入一次
pub struct CrawlPipeline {
    engine: Arc<dyn RenderEngine>,
    writer: Arc<dyn TableWriter>,
    extractor: RecordExtractor,
    walker: PaginationWalker,
    table_builder: TableBuilder,
    retry_policy: RetryPolicy,
    options: CrawlOptions,
}

impl CrawlPipeline {
    /// 创建流水线
    ///
    /// 选择器在此处编译，配置错误会在抓取任何页面之前返回
    pub fn new(
        settings: &Settings,
        engine: Arc<dyn RenderEngine>,
        writer: Arc<dyn TableWriter>,
    ) -> Result<Self, PipelineError> {
        let options = CrawlOptions::from_settings(settings)?;
        let extractor = RecordExtractor::from_settings(&settings.selectors)?;
        let walker = PaginationWalker::from_settings(&settings.selectors)?;
        let table_builder =
            TableBuilder::new(ColumnSpec::product_columns(), options.seed_url.as_str());

        Ok(Self {
            engine,
            writer,
            extractor,
            walker,
            table_builder,
            retry_policy: RetryPolicy::with_max_retries(settings.crawl.max_retries),
            options,
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// 执行完整流水线
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlReport)` - 爬取完成且文件已写入
    /// * `Err(PipelineError)` - 渲染或写入失败，爬取中断时不写文件
    pub async fn run(&self) -> Result<CrawlReport, PipelineError> {
        info!(
            "Starting crawl at {} with engine {}",
            self.options.seed_url,
            self.engine.name()
        );

        let state = self.crawl().await?;
        let pages_visited = state.pages_visited;
        let stop_reason = state.stop_reason.unwrap_or(StopReason::NoNextPage);
        let records_extracted = state.records.len();

        let unique = dedupe(state.records);
        let table = self.table_builder.build(&unique);

        let path = self.options.output_path.clone();
        self.writer
            .write(&table, &path)
            .await
            .map_err(|source| {
                error!("Failed to write {}: {}", path.display(), source);
                PipelineError::Write {
                    path: path.clone(),
                    source,
                }
            })?;

        info!(
            "Wrote {} products to {} ({} extracted across {} pages)",
            unique.len(),
            path.display(),
            records_extracted,
            pages_visited
        );

        Ok(CrawlReport {
            pages_visited,
            records_extracted,
            records_written: unique.len(),
            output_path: path,
            stop_reason,
        })
    }

    /// 遍历所有分页并累积记录
    pub async fn crawl(&self) -> Result<CrawlState, PipelineError> {
        let mut state = CrawlState::seed(self.options.seed_url.clone());

        loop {
            let Some(url) = state.next.take() else {
                return Ok(state.stop(StopReason::NoNextPage));
            };

            if state.visited.contains(&url) {
                warn!("Next page {} was already visited, stopping crawl", url);
                return Ok(state.stop(StopReason::Revisit(url)));
            }

            if self.options.max_pages > 0 && state.pages_visited >= self.options.max_pages {
                warn!(
                    "Reached page limit of {}, not following {}",
                    self.options.max_pages, url
                );
                return Ok(state.stop(StopReason::PageLimit(self.options.max_pages)));
            }

            if state.pages_visited > 0 && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }

            let page_index = state.pages_visited + 1;
            let page = self.render_page(&url, page_index).await?;
            let outcome = self.process_page(url, page);
            state = state.absorb(outcome);
        }
    }

    #[instrument(skip(self, url), fields(url = %url))]
    async fn render_page(&self, url: &Url, page_index: u32) -> Result<RenderedPage, PipelineError> {
        let request = RenderRequest::new(url.as_str(), self.options.readiness_selector.as_str())
            .with_timeout(self.options.timeout);

        let mut attempt = 0;
        loop {
            match self.engine.render(&request).await {
                Ok(page) => {
                    debug!(
                        "Rendered page {} in {}ms ({} bytes)",
                        page_index,
                        page.response_time_ms,
                        page.content.len()
                    );
                    return Ok(page);
                }
                Err(e) if self.retry_policy.should_retry_with_error(attempt, &e) => {
                    attempt += 1;
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    warn!(
                        "Render attempt {} failed: {}, retrying in {:?}",
                        attempt, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    error!("Render failed on page {}: {}", page_index, e);
                    return Err(PipelineError::Render {
                        url: url.to_string(),
                        page: page_index,
                        source: e,
                    });
                }
            }
        }
    }

    // 解析、提取与发现下一页在同一个同步步骤内完成，DOM 不跨越 await
    fn process_page(&self, url: Url, page: RenderedPage) -> PageOutcome {
        let mut final_url = Url::parse(&page.url).unwrap_or_else(|_| url.clone());
        final_url.set_fragment(None);

        let document = Document::parse(&page.content, final_url.clone());
        let records = self.extractor.extract(&document);
        let next = self.walker.next_page(&document);

        PageOutcome {
            url,
            final_url,
            records,
            next,
        }
    }
}
