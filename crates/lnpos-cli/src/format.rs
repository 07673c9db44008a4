//! Output formatting for device records.

use anyhow::Result;
use serde_json::Value;

use lnpos_core::{COLUMNS, ListedDevice, write_csv};
use lnpos_types::DeviceRecord;

use crate::cli::OutputFormat;

/// Render the device table in `format`.
pub fn format_devices<'a, I>(rows: I, format: OutputFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a ListedDevice>,
{
    let rows: Vec<&ListedDevice> = rows.into_iter().collect();
    match format {
        OutputFormat::Text => Ok(format_devices_text(&rows)),
        OutputFormat::Json => {
            let records: Vec<&DeviceRecord> = rows.iter().map(|row| &row.data).collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&records)?))
        }
        OutputFormat::Csv => format_devices_csv(rows),
    }
}

/// Table columns as CSV.
pub fn format_devices_csv<'a, I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = &'a ListedDevice>,
{
    let mut out = Vec::new();
    write_csv(&mut out, rows)?;
    Ok(String::from_utf8(out)?)
}

/// Aligned text table: the export columns plus the device kind.
#[must_use]
pub fn format_devices_text(rows: &[&ListedDevice]) -> String {
    use tabled::builder::Builder;
    use tabled::settings::Style;

    if rows.is_empty() {
        return "No devices\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(COLUMNS.iter().map(|c| c.label).chain(["type"]));
    for row in rows {
        builder.push_record(
            COLUMNS
                .iter()
                .map(|c| c.value(row))
                .chain([row.kind_label.as_str()]),
        );
    }

    let mut table = builder.build();
    table.with(Style::blank());
    format!("{}\n", table)
}

/// Render a single record in `format`.
pub fn format_record(record: &DeviceRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => format_record_text(record),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(record)?)),
        OutputFormat::Csv => match ListedDevice::from_record(record.clone()) {
            Some(row) => format_devices_csv([&row]),
            None => format_devices_csv(std::iter::empty()),
        },
    }
}

/// One line per present field: name, then value.
pub fn format_record_text(record: &DeviceRecord) -> Result<String> {
    let object = record.to_object()?;
    let width = object.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (field, value) in &object {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!("{:<width$}  {}\n", field, value, width = width));
    }
    Ok(out)
}
