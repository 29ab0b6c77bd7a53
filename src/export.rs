use crate::config::{Config, OutputFormat};
use crate::models::ItemSpecTable;
use crate::utils::file::ensure_parent_dir;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::{info, warn};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};
use std::fs::File;
use std::io::BufWriter;

/// Header of the index column in CSV output
const INDEX_HEADER: &str = "rmc";

/// Writes the table in the configured format to the configured path
pub fn export(table: &ItemSpecTable, config: &Config) -> Result<()> {
    if table.is_empty() {
        warn!("Catalog is empty, writing a table without rows");
    }
    ensure_parent_dir(&config.output_path)?;
    match config.output_format {
        OutputFormat::Xlsx => write_xlsx(table, &config.output_path, &config.sheet_name),
        OutputFormat::Csv => write_csv(table, &config.output_path),
    }?;
    info!(
        "Wrote {} rows to {} ({:?})",
        table.len(),
        config.output_path,
        config.output_format
    );
    Ok(())
}

/// Writes the table to a single-sheet workbook
///
/// Row 0 holds the column names after an empty index header cell,
/// every following row starts with its model reference.
///
/// # Arguments
/// * `table` - Collected specifications
/// * `path` - Destination `.xlsx` file
/// * `sheet_name` - Name of the only sheet
pub fn write_xlsx(table: &ItemSpecTable, path: &str, sheet_name: &str) -> Result<()> {
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .context("Failed to name worksheet")?;

    let columns = table.columns();
    for (col, column) in columns.iter().enumerate() {
        let col = u16::try_from(col + 1).context("Too many columns for a worksheet")?;
        worksheet
            .write_string_with_format(0, col, *column, &header_format)
            .context("Failed to write header cell")?;
    }

    for (row, (rmc, spec)) in table.rows().enumerate() {
        let row = u32::try_from(row + 1).context("Too many rows for a worksheet")?;
        worksheet
            .write_string_with_format(row, 0, rmc, &header_format)
            .context("Failed to write index cell")?;
        for (col, column) in columns.iter().enumerate() {
            if let Some(value) = spec.get(column) {
                let col = u16::try_from(col + 1).context("Too many columns for a worksheet")?;
                worksheet
                    .write_string(row, col, value)
                    .context("Failed to write cell")?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save workbook {}", path))?;
    Ok(())
}

/// Writes the table as CSV with the model reference as first column
pub fn write_csv(table: &ItemSpecTable, path: &str) -> Result<()> {
    let output_file = File::create(path).context("Failed to create output CSV file")?;
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(BufWriter::new(output_file));

    let columns = table.columns();
    writer
        .write_record(std::iter::once(INDEX_HEADER).chain(columns.iter().copied()))
        .context("Failed to write CSV header")?;

    for (rmc, spec) in table.rows() {
        let values = columns.iter().map(|column| spec.get(column).unwrap_or(""));
        writer
            .write_record(std::iter::once(rmc).chain(values))
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush writer")?;
    Ok(())
}
