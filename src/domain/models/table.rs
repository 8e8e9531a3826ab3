// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::RecordField;

/// 单元格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// 纯文本
    Text,
    /// 货币，两位小数
    Currency,
    /// 整数计数
    Integer,
}

impl CellKind {
    /// 数值转换成功后附加的显示格式
    pub fn number_format(&self) -> Option<&'static str> {
        match self {
            CellKind::Text => None,
            CellKind::Currency => Some("$#,##0.00"),
            CellKind::Integer => Some("#,##0"),
        }
    }
}

/// 列定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// 列名（表头文本）
    pub name: String,
    /// 来源字段
    pub field: RecordField,
    /// 单元格类型
    pub kind: CellKind,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, field: RecordField, kind: CellKind) -> Self {
        Self {
            name: name.into(),
            field,
            kind,
        }
    }

    /// 商品报表的标准列
    pub fn product_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Title", RecordField::Title, CellKind::Text),
            ColumnSpec::new("Price", RecordField::Price, CellKind::Currency),
            ColumnSpec::new("Description", RecordField::Description, CellKind::Text),
            ColumnSpec::new("Reviews", RecordField::ReviewCount, CellKind::Integer),
        ]
    }
}

/// 单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// 显示文本，用于列宽计算
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u32);

/// 四边统一的中等粗细边框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub color: Rgb,
}

/// 单元格样式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyle {
    /// 实心填充色
    pub fill: Option<Rgb>,
    /// 字体颜色
    pub font_color: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    /// 水平垂直居中
    pub centered: bool,
    pub border: Option<Border>,
    /// 数字格式
    pub number_format: Option<String>,
}

/// 单元格
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(value.into()),
            style: CellStyle::default(),
        }
    }
}

/// 矩形区域（0 起始，包含边界）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

/// 生成好的表格
///
/// 行号均为工作表中的 0 起始行号：表头占第 0 行，数据从第 1 行开始，
/// 数据之后空一行，再是页脚
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
    /// 页脚单元格，仅写入第一列
    pub footer: Vec<Cell>,
    /// 每列宽度（字符数）
    pub column_widths: Vec<usize>,
    /// 冻结的行数
    pub frozen_rows: u32,
    /// 自动筛选范围
    pub auto_filter: Option<CellRange>,
}

impl Table {
    /// 第 `index` 个数据行（0 起始）所在的工作表行号
    pub fn data_row_number(index: usize) -> u32 {
        index as u32 + 1
    }

    /// 第一行页脚所在的工作表行号
    pub fn footer_start_row(&self) -> u32 {
        self.rows.len() as u32 + 2
    }
}
