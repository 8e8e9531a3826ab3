// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 默认种子URL
pub const DEFAULT_SEED_URL: &str =
    "https://webscraper.io/test-sites/e-commerce/allinone/computers/laptops";

/// 应用程序配置设置
///
/// 包含爬取、选择器、渲染引擎和输出等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 选择器配置
    pub selectors: SelectorSettings,
    /// 渲染引擎配置
    pub renderer: RendererSettings,
    /// 输出配置
    pub output: OutputSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 种子URL
    pub seed_url: String,
    /// 就绪条件选择器，页面渲染后必须出现
    pub readiness_selector: String,
    /// 最大页数 (0 表示不限制)
    pub max_pages: u32,
    /// 两次页面渲染之间的礼貌延迟（毫秒）
    pub delay_ms: u64,
    /// 可重试渲染失败的最大重试次数
    pub max_retries: u32,
    /// 单页渲染超时时间（秒）
    pub timeout_secs: u64,
}

/// CSS选择器配置设置
///
/// 字段选择器在记录块内部求值
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSettings {
    /// 记录块选择器
    pub block: String,
    /// 标题选择器
    pub title: String,
    /// 标题属性 (为空时取文本)
    pub title_attr: Option<String>,
    /// 价格选择器
    pub price: String,
    /// 描述选择器
    pub description: String,
    /// 评论数选择器
    pub review_count: String,
    /// 下一页链接选择器
    pub next_page: String,
}

/// 渲染引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 无头 Chromium
    Chromium,
    /// 纯 HTTP 抓取
    Http,
}

/// 渲染引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RendererSettings {
    /// 引擎类型
    pub engine: EngineKind,
    /// 远程 Chrome 调试地址
    pub remote_debugging_url: Option<String>,
    /// 是否无头模式
    pub headless: bool,
    /// User-Agent
    pub user_agent: String,
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 输出文件路径
    pub path: String,
    /// 工作表名称
    pub sheet_name: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CATALOGRS").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值创建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Crawl
            .set_default("crawl.seed_url", DEFAULT_SEED_URL)?
            .set_default("crawl.readiness_selector", "div.product-wrapper.card-body")?
            .set_default("crawl.max_pages", 50)?
            .set_default("crawl.delay_ms", 0)?
            .set_default("crawl.max_retries", 2)?
            .set_default("crawl.timeout_secs", 30)?
            // Selectors
            .set_default("selectors.block", "div.product-wrapper.card-body")?
            .set_default("selectors.title", "a.title")?
            .set_default("selectors.title_attr", "title")?
            .set_default("selectors.price", "span[itemprop='price']")?
            .set_default("selectors.description", "p.description")?
            .set_default("selectors.review_count", "span[itemprop='reviewCount']")?
            .set_default("selectors.next_page", "ul.pagination li a[rel='next']")?
            // Renderer
            .set_default("renderer.engine", "chromium")?
            .set_default("renderer.headless", true)?
            .set_default(
                "renderer.user_agent",
                "Mozilla/5.0 (compatible; catalogrs/0.1; +https://github.com/Kirky-X)",
            )?
            // Output
            .set_default("output.path", "Product_Details.xlsx")?
            .set_default("output.sheet_name", "Products")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
