// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 表格生成服务
//!
//! 将去重后的记录转换为带样式的类型化表格。各步骤按顺序执行，
//! 每一步只依赖上一步留下的表格状态：
//!
//! 1. 表头行
//! 2. 数据行
//! 3. 斑马纹
//! 4. 占位值样式
//! 5. 边框
//! 6. 数值转换
//! 7. 列宽
//! 8. 冻结表头与自动筛选
//! 9. 页脚

use crate::domain::models::record::{Record, SENTINEL};
use crate::domain::models::table::{
    Border, Cell, CellKind, CellRange, CellStyle, CellValue, ColumnSpec, Rgb, Table,
};
use chrono::{Local, NaiveDateTime};
use tracing::debug;

/// 表头填充色
pub const HEADER_FILL: Rgb = Rgb(0x1F4E78);
/// 表头字体颜色
pub const HEADER_FONT: Rgb = Rgb(0xFFFFFF);
/// 偶数数据行填充色
pub const STRIPE_FILL: Rgb = Rgb(0xF5F5F5);
/// 弱化字体颜色（占位值与页脚）
pub const MUTED_FONT: Rgb = Rgb(0x808080);
/// 数据单元格边框
pub const DATA_BORDER: Border = Border {
    color: Rgb(0x000000),
};
/// 列宽上限
pub const MAX_COLUMN_WIDTH: usize = 80;
/// 列宽留白
pub const COLUMN_PADDING: usize = 2;
/// 页脚时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// 去掉首尾空白、一个前导货币符号以及千位分隔符
fn strip_numeric_noise(text: &str) -> String {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(trimmed);
    unsigned.replace(',', "").trim().to_string()
}

/// 尝试将文本解析为货币金额
///
/// `"$1,299.00"` -> `Some(1299.0)`；无法解析时返回 `None`
pub fn try_parse_currency(text: &str) -> Option<f64> {
    strip_numeric_noise(text)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 尝试将文本解析为整数
pub fn try_parse_integer(text: &str) -> Option<i64> {
    strip_numeric_noise(text).parse::<i64>().ok()
}

fn try_parse(kind: CellKind, text: &str) -> Option<f64> {
    match kind {
        CellKind::Text => None,
        CellKind::Currency => try_parse_currency(text),
        CellKind::Integer => try_parse_integer(text).map(|v| v as f64),
    }
}

fn muted(style: &mut CellStyle) {
    style.font_color = Some(MUTED_FONT);
    style.italic = true;
}

/// 表格生成器
pub struct TableBuilder {
    columns: Vec<ColumnSpec>,
    source_url: String,
}

impl TableBuilder {
    /// 创建表格生成器
    ///
    /// # 参数
    ///
    /// * `columns` - 列定义，按输出顺序排列
    /// * `source_url` - 页脚中的数据来源
    pub fn new(columns: Vec<ColumnSpec>, source_url: impl Into<String>) -> Self {
        Self {
            columns,
            source_url: source_url.into(),
        }
    }

    /// 以当前本地时间生成表格
    pub fn build(&self, records: &[Record]) -> Table {
        self.build_at(records, Local::now().naive_local())
    }

    /// 以指定时间戳生成表格
    pub fn build_at(&self, records: &[Record], generated_at: NaiveDateTime) -> Table {
        let mut table = Table {
            header: self.header_row(),
            rows: self.data_rows(records),
            footer: Vec::new(),
            column_widths: Vec::new(),
            frozen_rows: 0,
            auto_filter: None,
        };

        apply_zebra_striping(&mut table);
        apply_sentinel_style(&mut table);
        apply_borders(&mut table);
        self.coerce_numeric_columns(&mut table);
        self.size_columns(&mut table);
        apply_layout(&mut table);
        self.append_footer(&mut table, generated_at);

        table
    }

    fn header_row(&self) -> Vec<Cell> {
        self.columns
            .iter()
            .map(|column| Cell {
                value: CellValue::Text(column.name.clone()),
                style: CellStyle {
                    fill: Some(HEADER_FILL),
                    font_color: Some(HEADER_FONT),
                    bold: true,
                    centered: true,
                    ..CellStyle::default()
                },
            })
            .collect()
    }

    fn data_rows(&self, records: &[Record]) -> Vec<Vec<Cell>> {
        records
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|column| Cell::text(record.field(column.field)))
                    .collect()
            })
            .collect()
    }

    fn coerce_numeric_columns(&self, table: &mut Table) {
        for (col, column) in self.columns.iter().enumerate() {
            let Some(format) = column.kind.number_format() else {
                continue;
            };

            for row in table.rows.iter_mut() {
                let cell = &mut row[col];
                let parsed = cell
                    .value
                    .as_text()
                    .and_then(|text| try_parse(column.kind, text));

                match parsed {
                    Some(number) => {
                        cell.value = CellValue::Number(number);
                        cell.style.number_format = Some(format.to_string());
                    }
                    None if cell.value.as_text() != Some(SENTINEL) => {
                        debug!(
                            "Keeping '{}' as text in column {}",
                            cell.value.display_text(),
                            column.name
                        );
                    }
                    None => {}
                }
            }
        }
    }

    /// 列宽 = min(最长文本长度 + 2, 80)，包含表头
    fn size_columns(&self, table: &mut Table) {
        table.column_widths = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, column)| {
                let longest = std::iter::once(&table.header[col])
                    .chain(table.rows.iter().map(|row| &row[col]))
                    .map(|cell| measured_len(column.kind, cell))
                    .max()
                    .unwrap_or(0);
                (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
            })
            .collect();
    }

    fn append_footer(&self, table: &mut Table, generated_at: NaiveDateTime) {
        let lines = [
            format!("Sourced from ({})", self.source_url),
            format!("Generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
        ];

        table.footer = lines
            .into_iter()
            .map(|line| {
                let mut cell = Cell::text(line);
                muted(&mut cell.style);
                cell
            })
            .collect();
    }
}

/// 偶数数据行（1 起始）使用交替填充色
fn apply_zebra_striping(table: &mut Table) {
    for (index, row) in table.rows.iter_mut().enumerate() {
        if (index + 1) % 2 == 0 {
            for cell in row.iter_mut() {
                cell.style.fill = Some(STRIPE_FILL);
            }
        }
    }
}

fn apply_sentinel_style(table: &mut Table) {
    for cell in table.rows.iter_mut().flatten() {
        if cell.value.as_text() == Some(SENTINEL) {
            muted(&mut cell.style);
        }
    }
}

fn apply_borders(table: &mut Table) {
    for cell in table.rows.iter_mut().flatten() {
        cell.style.border = Some(DATA_BORDER);
    }
}

/// 单元格用于列宽计算的字符数
///
/// 货币数值按浮点形式计数（`1299.0`），整数按整数形式计数（`1024`）
fn measured_len(kind: CellKind, cell: &Cell) -> usize {
    match (&cell.value, kind) {
        (CellValue::Number(n), CellKind::Currency) => format!("{:?}", n).chars().count(),
        (value, _) => value.display_text().chars().count(),
    }
}

fn apply_layout(table: &mut Table) {
    table.frozen_rows = 1;
    table.auto_filter = match table.header.len() {
        0 => None,
        width => Some(CellRange {
            first_row: 0,
            first_col: 0,
            last_row: table.rows.len() as u32,
            last_col: (width - 1) as u16,
        }),
    };
}
