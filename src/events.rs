// Scattering-event ingestion from CSV

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Raw CSV contents: headers plus string rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

/// Unit of the angular columns in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "degrees" | "deg" => Ok(AngleUnit::Degrees),
            "radians" | "rad" => Ok(AngleUnit::Radians),
            other => Err(anyhow!(
                "Unknown angle unit '{}' (expected 'degrees' or 'radians')",
                other
            )),
        }
    }

    pub fn to_radians(self, v: f64) -> f64 {
        match self {
            AngleUnit::Degrees => v.to_radians(),
            AngleUnit::Radians => v,
        }
    }
}

/// Column picks for the three event fields.
pub struct EventColumns {
    pub theta: ColumnSelector,
    pub phi: ColumnSelector,
    pub energy: ColumnSelector,
}

/// Parsed event sample: parallel columns, angles in radians.
#[derive(Debug, Clone)]
pub struct EventTable {
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
    pub energy: Vec<f64>,
}

impl EventTable {
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }
}

pub fn read_table_from_stdin() -> Result<CsvTable> {
    read_table(io::stdin())
}

pub fn read_table_from_path(path: &Path) -> Result<CsvTable> {
    let file =
        File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    read_table(file)
}

pub fn read_table<R: Read>(input: R) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(input);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvTable { headers, rows })
}

pub fn parse_column_selector(input: &str) -> ColumnSelector {
    match input.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(input.to_string()),
    }
}

fn resolve_column(table: &CsvTable, selector: &ColumnSelector) -> Result<(usize, String)> {
    match selector {
        ColumnSelector::Index(idx) => {
            if *idx >= table.headers.len() {
                return Err(anyhow!(
                    "Column index {} out of bounds (available columns: {})",
                    idx,
                    table.headers.len()
                ));
            }
            Ok((*idx, table.headers[*idx].clone()))
        }
        ColumnSelector::Name(name) => {
            let idx = table
                .headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    anyhow!(
                        "Column '{}' not found. Available columns: {}",
                        name,
                        table.headers.join(", ")
                    )
                })?;
            Ok((idx, table.headers[idx].clone()))
        }
    }
}

fn parse_cell(row: &[String], row_idx: usize, col_idx: usize, col_name: &str) -> Result<f64> {
    if col_idx >= row.len() {
        return Err(anyhow!(
            "Row {} has only {} columns, expected at least {}",
            row_idx + 1,
            row.len(),
            col_idx + 1
        ));
    }
    let cell = &row[col_idx];
    cell.parse::<f64>().with_context(|| {
        format!(
            "Failed to parse value '{}' as number in column '{}' at row {}",
            cell,
            col_name,
            row_idx + 1
        )
    })
}

/// Pull the three event columns out of the table, converting angles to
/// radians. Non-finite values are kept here and dropped later at binning.
pub fn extract_events(
    table: &CsvTable,
    columns: &EventColumns,
    unit: AngleUnit,
) -> Result<EventTable> {
    let (theta_idx, theta_name) = resolve_column(table, &columns.theta)?;
    let (phi_idx, phi_name) = resolve_column(table, &columns.phi)?;
    let (energy_idx, energy_name) = resolve_column(table, &columns.energy)?;

    let mut theta = Vec::with_capacity(table.rows.len());
    let mut phi = Vec::with_capacity(table.rows.len());
    let mut energy = Vec::with_capacity(table.rows.len());

    for (row_idx, row) in table.rows.iter().enumerate() {
        theta.push(unit.to_radians(parse_cell(row, row_idx, theta_idx, &theta_name)?));
        phi.push(unit.to_radians(parse_cell(row, row_idx, phi_idx, &phi_name)?));
        energy.push(parse_cell(row, row_idx, energy_idx, &energy_name)?);
    }

    Ok(EventTable { theta, phi, energy })
}
