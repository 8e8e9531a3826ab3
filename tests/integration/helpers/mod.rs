// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试辅助工具
//!
//! 提供渲染引擎模拟对象和商品列表页 HTML 生成器

use async_trait::async_trait;
use catalogrs::config::settings::Settings;
use catalogrs::engines::traits::{EngineError, RenderEngine, RenderRequest, RenderedPage};
use mockall::mock;

pub const SEED_URL: &str = "https://shop.test/laptops?page=1";

mock! {
    pub RenderEngine {}
    #[async_trait]
    impl RenderEngine for RenderEngine {
        async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, EngineError>;
        fn name(&self) -> &'static str;
    }
}

/// 商品：(标题, 价格)
pub type Product<'a> = (&'a str, &'a str);

/// 生成一个商品列表页
pub fn listing(products: &[Product<'_>], next: Option<&str>) -> String {
    let blocks: String = products
        .iter()
        .map(|(title, price)| {
            format!(
                r#"<div class="col-md-4"><div class="product-wrapper card-body">
                    <a class="title" title="{title}" href="/product/1">{title}</a>
                    <h4 class="price"><span itemprop="price">{price}</span></h4>
                    <p class="description">{title} description</p>
                    <p class="review-count"><span itemprop="reviewCount">7</span> reviews</p>
                </div></div>"#
            )
        })
        .collect();

    let pagination = match next {
        Some(href) => format!(
            r#"<ul class="pagination"><li><a class="page-link" href="{href}" rel="next">&rsaquo;</a></li></ul>"#
        ),
        None => r#"<ul class="pagination"><li class="disabled"><span>&rsaquo;</span></li></ul>"#
            .to_string(),
    };

    format!("<html><body><div class=\"row\">{blocks}</div>{pagination}</body></html>")
}

pub fn rendered(url: &str, content: String) -> RenderedPage {
    RenderedPage {
        url: url.to_string(),
        content,
        response_time_ms: 1,
    }
}

/// 期望指定URL被渲染 `times` 次并返回给定内容
pub fn expect_page(engine: &mut MockRenderEngine, url: &'static str, html: String, times: usize) {
    engine
        .expect_render()
        .withf(move |request| request.url == url)
        .times(times)
        .returning(move |request| Ok(rendered(&request.url, html.clone())));
}

pub fn test_settings(output_path: &str) -> Settings {
    let mut settings = Settings::defaults().expect("default settings");
    settings.crawl.seed_url = SEED_URL.to_string();
    settings.output.path = output_path.to_string();
    settings
}

pub fn new_engine() -> MockRenderEngine {
    let mut engine = MockRenderEngine::new();
    engine.expect_name().return_const("mock");
    engine
}
