//! Serialization of extracted fields.

use std::io::Write;

use scavenger_core::FieldMap;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object
    Json,
    /// CSV with a header row
    Csv,
    /// One "label: value" line per field
    Text,
}

/// Write `records` as CSV under a header of `columns`.
pub fn write_csv<W: Write>(writer: W, columns: &[String], records: &[FieldMap]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(columns)?;
    for fields in records {
        wtr.write_record(fields.to_record(columns))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn format_fields(fields: &FieldMap, format: OutputFormat, columns: &[String]) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            write_csv(&mut buffer, columns, std::slice::from_ref(fields))?;
            Ok(String::from_utf8(buffer)?)
        }
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_text(fields: &FieldMap) -> String {
    let mut output = String::new();
    for (label, value) in fields {
        output.push_str(&format!("{}: {}\n", label, value));
    }
    output
}
