// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, XlsxError,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::models::table::{Cell, CellStyle, CellValue, Table};
use crate::domain::repositories::table_writer::{TableWriter, WriteError};

/// xlsx 表格写入器
///
/// 先在内存中生成完整的工作簿，写入同目录下的临时文件后再重命名到目标路径，
/// 目标路径上只会出现完整的文件
pub struct XlsxTableWriter {
    sheet_name: String,
}

impl XlsxTableWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill.0));
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color.0));
    }
    if style.bold {
        format = format.set_bold();
    }
    if style.italic {
        format = format.set_italic();
    }
    if style.centered {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }
    if let Some(border) = style.border {
        format = format
            .set_border(FormatBorder::Medium)
            .set_border_color(Color::RGB(border.color.0));
    }
    if let Some(num_format) = &style.number_format {
        format = format.set_num_format(num_format);
    }

    format
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
) -> Result<(), XlsxError> {
    let format = to_format(&cell.style);
    match &cell.value {
        CellValue::Text(text) => {
            worksheet.write_string_with_format(row, col, text, &format)?;
        }
        CellValue::Number(number) => {
            worksheet.write_number_with_format(row, col, *number, &format)?;
        }
    }
    Ok(())
}

/// 将表格渲染为 xlsx 字节
pub fn render_workbook(table: &Table, sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, cell) in table.header.iter().enumerate() {
        write_cell(worksheet, 0, col as u16, cell)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = Table::data_row_number(index);
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_number, col as u16, cell)?;
        }
    }

    for (col, width) in table.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64)?;
    }

    if table.frozen_rows > 0 {
        worksheet.set_freeze_panes(table.frozen_rows, 0)?;
    }

    if let Some(range) = table.auto_filter {
        worksheet.autofilter(range.first_row, range.first_col, range.last_row, range.last_col)?;
    }

    let footer_start = table.footer_start_row();
    for (offset, cell) in table.footer.iter().enumerate() {
        write_cell(worksheet, footer_start + offset as u32, 0, cell)?;
    }

    workbook.save_to_buffer()
}

#[async_trait]
impl TableWriter for XlsxTableWriter {
    async fn write(&self, table: &Table, path: &Path) -> Result<(), WriteError> {
        let data = render_workbook(table, &self.sheet_name)
            .map_err(|e| WriteError::Format(e.to_string()))?;

        // 确保目录存在
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = temp_path(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Output path has no file name: {}", path.display()),
            )
        })?;

        if let Err(e) = write_and_rename(&tmp_path, path, &data).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                debug!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

/// 目标文件旁的临时文件路径
fn temp_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    Some(path.with_file_name(format!(".{}.tmp", name)))
}

async fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp_path, path).await
}
