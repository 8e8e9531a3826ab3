// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use catalogrs::application::crawl_pipeline::CrawlPipeline;
use catalogrs::config::settings::Settings;
use catalogrs::engines::build_engine;
use catalogrs::infrastructure::xlsx_writer::XlsxTableWriter;
use catalogrs::utils::telemetry;
use std::sync::Arc;
use tracing::info;

/// 主函数
///
/// 加载配置，运行一次爬取流水线并写出报表
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting catalogrs...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Build renderer and writer
    let engine = build_engine(&settings.renderer)?;
    let writer = Arc::new(XlsxTableWriter::new(settings.output.sheet_name.clone()));

    // 4. Crawl, dedupe and export
    let pipeline = CrawlPipeline::new(&settings, engine, writer)?;
    let report = pipeline.run().await?;

    println!(
        "Wrote {} products ({} extracted, {} pages) to {}",
        report.records_written,
        report.records_extracted,
        report.pages_visited,
        report.output_path.display()
    );

    Ok(())
}
