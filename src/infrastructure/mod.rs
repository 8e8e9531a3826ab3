// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 内存表格写入器
pub mod memory_writer;

/// xlsx 表格写入器
pub mod xlsx_writer;
