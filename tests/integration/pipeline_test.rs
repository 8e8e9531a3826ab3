// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬取流水线集成测试
///
/// 使用模拟渲染引擎和内存写入器验证分页遍历、去重和表格生成

#[cfg(test)]
mod tests {
    use crate::integration::helpers::{
        expect_page, listing, new_engine, rendered, test_settings, SEED_URL,
    };
    use catalogrs::application::crawl_pipeline::{CrawlPipeline, PipelineError, StopReason};
    use catalogrs::domain::models::table::CellValue;
    use catalogrs::engines::traits::EngineError;
    use catalogrs::infrastructure::memory_writer::InMemoryTableWriter;
    use catalogrs::utils::retry_policy::RetryPolicy;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const PAGE_2: &str = "https://shop.test/laptops?page=2";
    const PAGE_3: &str = "https://shop.test/laptops?page=3";
    const OUTPUT: &str = "out/products.xlsx";

    fn instant_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::ZERO,
            enable_jitter: false,
            ..RetryPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_two_pages_are_deduplicated_in_first_seen_order() {
        let mut engine = new_engine();
        expect_page(
            &mut engine,
            SEED_URL,
            listing(&[("X", "$10"), ("Y", "$20")], Some("?page=2")),
            1,
        );
        expect_page(
            &mut engine,
            PAGE_2,
            listing(&[("X", "$10"), ("Z", "$30")], None),
            1,
        );

        let writer = InMemoryTableWriter::new();
        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(writer.clone()),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.records_extracted, 4);
        assert_eq!(report.records_written, 3);
        assert_eq!(report.stop_reason, StopReason::NoNextPage);

        let table = writer.get(Path::new(OUTPUT)).await.expect("table written");
        let titles: Vec<_> = table.rows.iter().map(|r| r[0].value.display_text()).collect();
        assert_eq!(titles, vec!["X", "Y", "Z"]);

        let prices: Vec<_> = table.rows.iter().map(|r| r[1].value.clone()).collect();
        assert_eq!(
            prices,
            vec![
                CellValue::Number(10.0),
                CellValue::Number(20.0),
                CellValue::Number(30.0)
            ]
        );
        assert!(table
            .rows
            .iter()
            .all(|r| r[1].style.number_format.as_deref() == Some("$#,##0.00")));
        assert_eq!(
            table.footer[0].value.as_text(),
            Some("Sourced from (https://shop.test/laptops?page=1)")
        );
    }

    #[tokio::test]
    async fn test_three_page_walk_visits_each_page_once() {
        let mut engine = new_engine();
        expect_page(&mut engine, SEED_URL, listing(&[("A", "$1")], Some(PAGE_2)), 1);
        expect_page(&mut engine, PAGE_2, listing(&[("B", "$2")], Some("?page=3")), 1);
        expect_page(&mut engine, PAGE_3, listing(&[("C", "$3")], None), 1);

        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap();

        let state = pipeline.crawl().await.unwrap();

        assert_eq!(state.pages_visited, 3);
        assert_eq!(state.visited.len(), 3);
        assert!(state.next.is_none());
        assert_eq!(state.stop_reason, Some(StopReason::NoNextPage));
        let titles: Vec<_> = state.records.iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_cyclic_next_link_stops_without_revisiting() {
        let mut engine = new_engine();
        expect_page(&mut engine, SEED_URL, listing(&[("A", "$1")], Some("?page=2")), 1);
        expect_page(&mut engine, PAGE_2, listing(&[("B", "$2")], Some("?page=1")), 1);

        let writer = InMemoryTableWriter::new();
        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(writer.clone()),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(
            report.stop_reason,
            StopReason::Revisit(url::Url::parse(SEED_URL).unwrap())
        );
        assert_eq!(writer.len().await, 1);
    }

    #[tokio::test]
    async fn test_redirected_seed_is_not_rendered_again() {
        const HTTP_SEED: &str = "http://shop.test/laptops?page=1";
        const HTTPS_SEED: &str = "https://shop.test/laptops?page=1";

        let mut engine = new_engine();
        engine
            .expect_render()
            .withf(|request| request.url == HTTP_SEED)
            .times(1)
            .returning(|_| Ok(rendered(HTTPS_SEED, listing(&[("A", "$1")], Some("?page=2")))));
        expect_page(&mut engine, PAGE_2, listing(&[("B", "$2")], Some("?page=1")), 1);

        let mut settings = test_settings(OUTPUT);
        settings.crawl.seed_url = HTTP_SEED.to_string();
        let pipeline = CrawlPipeline::new(
            &settings,
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap();

        let state = pipeline.crawl().await.unwrap();

        assert_eq!(state.pages_visited, 2);
        assert!(state.visited.contains(&url::Url::parse(HTTP_SEED).unwrap()));
        assert!(state.visited.contains(&url::Url::parse(HTTPS_SEED).unwrap()));
        assert_eq!(
            state.stop_reason,
            Some(StopReason::Revisit(url::Url::parse(HTTPS_SEED).unwrap()))
        );
    }

    #[tokio::test]
    async fn test_page_limit_caps_renders() {
        let mut engine = new_engine();
        expect_page(&mut engine, SEED_URL, listing(&[("A", "$1")], Some("?page=2")), 1);
        expect_page(&mut engine, PAGE_2, listing(&[("B", "$2")], Some("?page=3")), 1);

        let mut settings = test_settings(OUTPUT);
        settings.crawl.max_pages = 2;
        let pipeline = CrawlPipeline::new(
            &settings,
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.records_written, 2);
        assert_eq!(report.stop_reason, StopReason::PageLimit(2));
    }

    #[tokio::test]
    async fn test_empty_page_still_follows_next_link() {
        let mut engine = new_engine();
        expect_page(&mut engine, SEED_URL, listing(&[], Some("?page=2")), 1);
        expect_page(&mut engine, PAGE_2, listing(&[("B", "$2")], None), 1);

        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.pages_visited, 2);
        assert_eq!(report.records_written, 1);
    }

    #[tokio::test]
    async fn test_render_failure_reports_page_and_writes_nothing() {
        let mut engine = new_engine();
        expect_page(&mut engine, SEED_URL, listing(&[("A", "$1")], Some("?page=2")), 1);
        engine
            .expect_render()
            .withf(|request| request.url == PAGE_2)
            .times(1)
            .returning(|request| Err(EngineError::NotReady(request.readiness_selector.clone())));

        let writer = InMemoryTableWriter::new();
        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(writer.clone()),
        )
        .unwrap();

        let err = pipeline.run().await.unwrap_err();

        match err {
            PipelineError::Render { url, page, source } => {
                assert_eq!(url, PAGE_2);
                assert_eq!(page, 2);
                assert!(matches!(source, EngineError::NotReady(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(writer.is_empty().await);
    }

    #[tokio::test]
    async fn test_retryable_failure_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut engine = new_engine();
        engine.expect_render().times(2).returning(move |request| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(EngineError::Timeout)
            } else {
                Ok(rendered(&request.url, listing(&[("A", "$1")], None)))
            }
        });

        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap()
        .with_retry_policy(instant_retries(2));

        let report = pipeline.run().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.pages_visited, 1);
        assert_eq!(report.records_written, 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_is_fatal() {
        let mut engine = new_engine();
        engine
            .expect_render()
            .times(2)
            .returning(|_| Err(EngineError::Timeout));

        let pipeline = CrawlPipeline::new(
            &test_settings(OUTPUT),
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap()
        .with_retry_policy(instant_retries(1));

        let err = pipeline.run().await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Render {
                page: 1,
                source: EngineError::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_selector_fails_before_any_render() {
        // No render expectations: any call would panic
        let engine = new_engine();

        let mut settings = test_settings(OUTPUT);
        settings.selectors.price = "span[itemprop=".to_string();

        let result = CrawlPipeline::new(
            &settings,
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        );

        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_invalid_seed_url_is_rejected() {
        let mut settings = test_settings(OUTPUT);
        settings.crawl.seed_url = "not a url".to_string();

        let result = CrawlPipeline::new(
            &settings,
            Arc::new(new_engine()),
            Arc::new(InMemoryTableWriter::new()),
        );

        assert!(matches!(result, Err(PipelineError::InvalidSeedUrl { .. })));
    }

    #[tokio::test]
    async fn test_render_requests_use_readiness_selector_and_timeout() {
        let mut engine = new_engine();
        engine
            .expect_render()
            .withf(|request| {
                request.readiness_selector == "div.product-wrapper.card-body"
                    && request.timeout == Duration::from_secs(5)
            })
            .times(1)
            .returning(|request| Ok(rendered(&request.url, listing(&[], None))));

        let mut settings = test_settings(OUTPUT);
        settings.crawl.timeout_secs = 5;
        let pipeline = CrawlPipeline::new(
            &settings,
            Arc::new(engine),
            Arc::new(InMemoryTableWriter::new()),
        )
        .unwrap();

        let report = pipeline.run().await.unwrap();
        assert_eq!(report.records_written, 0);
    }
}
