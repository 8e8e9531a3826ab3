// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 记录提取、分页遍历、去重和表格生成
pub mod dedup_service;
pub mod extraction_service;
pub mod pagination_service;
pub mod table_service;
