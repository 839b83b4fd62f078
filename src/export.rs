/*!
 * Export functionality for provider records
 *
 * CSV output uses a fixed column order (see `ExportRow::HEADERS`), one row per
 * record in input order. JSON output keeps the full `ProviderRecord` shape.
 * Existing files are overwritten.
 */

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data_types::ProviderRecord;
use crate::Result;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl") => {
                ExportFormat::Json
            }
            _ => ExportFormat::Csv,
        }
    }
}

/// Flat CSV projection of a `ProviderRecord`
///
/// Field order here is the column order of the file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportRow {
    pub npi: Option<String>,
    pub enumeration_type: Option<String>,
    pub name: Option<String>,
    pub organization_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub credential: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub telephone: Option<String>,
    pub taxonomy_code: Option<String>,
    pub taxonomy_description: Option<String>,
    pub enumeration_date: Option<String>,
    pub last_updated: Option<String>,
    pub status: Option<String>,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 18] = [
        "npi",
        "enumeration_type",
        "name",
        "organization_name",
        "first_name",
        "last_name",
        "credential",
        "address_1",
        "address_2",
        "city",
        "state",
        "postal_code",
        "telephone",
        "taxonomy_code",
        "taxonomy_description",
        "enumeration_date",
        "last_updated",
        "status",
    ];
}

impl From<&ProviderRecord> for ExportRow {
    fn from(record: &ProviderRecord) -> Self {
        let address = record.primary_address();
        let taxonomy = record.primary_taxonomy();
        let name = record.display_name();

        Self {
            npi: record.npi_str().map(str::to_string),
            enumeration_type: record.enumeration_type.map(|t| t.to_code().to_string()),
            name: Some(name).filter(|n| !n.is_empty()),
            organization_name: record.organization_name.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            credential: record.credential.clone(),
            address_1: address.and_then(|a| a.address_1.clone()),
            address_2: address.and_then(|a| a.address_2.clone()),
            city: address.and_then(|a| a.city.clone()),
            state: address.and_then(|a| a.state.clone()),
            postal_code: address.and_then(|a| a.postal_code.clone()),
            telephone: address.and_then(|a| a.telephone.clone()),
            taxonomy_code: taxonomy.and_then(|t| t.code.clone()),
            taxonomy_description: taxonomy.and_then(|t| t.desc.clone()),
            enumeration_date: record.enumeration_date.map(|d| d.format("%Y-%m-%d").to_string()),
            last_updated: record.last_updated.map(|d| d.format("%Y-%m-%d").to_string()),
            status: record.status.clone(),
        }
    }
}

/// Trait for implementing record exporters
pub trait RecordExporter {
    /// Export the records to `path`
    fn export(&self, records: &[ProviderRecord], path: &Path) -> Result<()>;

    /// Get the export format
    fn format(&self) -> ExportFormat;
}

/// CSV exporter with the fixed `ExportRow` columns
pub struct CsvExporter {
    /// Whether to write the header row
    pub include_headers: bool,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            include_headers: true,
            delimiter: b',',
        }
    }
}

impl CsvExporter {
    /// Create a new CSV exporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to write the header row
    pub fn with_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    /// Write any serializable rows under an explicit header
    ///
    /// The header is written even when `rows` is empty.
    pub fn write_rows<T: Serialize>(&self, headers: &[&str], rows: &[T], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        if self.include_headers {
            writer.write_record(headers)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl RecordExporter for CsvExporter {
    fn export(&self, records: &[ProviderRecord], path: &Path) -> Result<()> {
        let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();
        self.write_rows(&ExportRow::HEADERS, &rows, path)?;
        info!(rows = rows.len(), path = %path.display(), "wrote CSV export");
        Ok(())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}

/// JSON exporter for provider records
pub struct JsonExporter {
    /// Whether to pretty-print the JSON
    pub pretty_print: bool,
    /// Whether to export as JSON Lines (one record per line)
    pub json_lines: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self {
            pretty_print: true,
            json_lines: false,
        }
    }
}

impl JsonExporter {
    /// Create a new JSON exporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pretty printing
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set JSON Lines format
    pub fn as_json_lines(mut self) -> Self {
        self.json_lines = true;
        self.pretty_print = false;
        self
    }

    /// Write any serializable values
    pub fn write_values<T: Serialize>(&self, values: &[T], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        if self.json_lines {
            for value in values {
                serde_json::to_writer(&mut writer, value)?;
                writeln!(writer)?;
            }
        } else if self.pretty_print {
            serde_json::to_writer_pretty(&mut writer, values)?;
        } else {
            serde_json::to_writer(&mut writer, values)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl RecordExporter for JsonExporter {
    fn export(&self, records: &[ProviderRecord], path: &Path) -> Result<()> {
        self.write_values(records, path)?;
        info!(records = records.len(), path = %path.display(), "wrote JSON export");
        Ok(())
    }

    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}

/// Export records with the default exporter for `format`
pub fn export_records(records: &[ProviderRecord], path: &Path, format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::Csv => CsvExporter::new().export(records, path),
        ExportFormat::Json => JsonExporter::new().export(records, path),
    }
}
