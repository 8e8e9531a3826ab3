// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排渲染、提取、分页、去重和导出的爬取流水线
pub mod crawl_pipeline;
