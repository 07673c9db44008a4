//! CSV export of the registry table.

use std::io::Write;

use lnpos_types::ListedDevice;

use crate::error::Result;

/// A column of the registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column identifier.
    pub name: &'static str,
    /// Header label.
    pub label: &'static str,
    /// Record field shown in the column.
    pub field: &'static str,
}

/// Columns of the registry table, in display order.
pub const COLUMNS: [Column; 5] = [
    Column {
        name: "title",
        label: "title",
        field: "title",
    },
    Column {
        name: "theId",
        label: "id",
        field: "id",
    },
    Column {
        name: "key",
        label: "key",
        field: "key",
    },
    Column {
        name: "wallet",
        label: "wallet",
        field: "wallet",
    },
    Column {
        name: "currency",
        label: "currency",
        field: "currency",
    },
];

impl Column {
    /// The cell value of this column for `row`. Missing fields are empty.
    pub fn value<'a>(&self, row: &'a ListedDevice) -> &'a str {
        let data = &row.data;
        match self.field {
            "title" => data.title.as_deref(),
            "id" => Some(row.id.as_str()),
            "key" => data.key.as_deref(),
            "wallet" => data.wallet.as_deref(),
            "currency" => data.currency.as_deref(),
            _ => None,
        }
        .unwrap_or("")
    }
}

/// Write `rows` as CSV with a header line of column labels.
pub fn write_csv<'a, W, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ListedDevice>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS.iter().map(|c| c.label))?;
    let mut count = 0usize;
    for row in rows {
        csv.write_record(COLUMNS.iter().map(|c| c.value(row)))?;
        count += 1;
    }
    csv.flush()?;
    tracing::debug!(rows = count, "exported registry table");
    Ok(())
}
