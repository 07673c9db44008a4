//! Read-only device commands: list, show, export, currencies.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};

use lnpos_core::DeviceApi;
use lnpos_types::selectable_currencies;

use super::Session;
use crate::cli::OutputFormat;
use crate::format::{format_devices, format_record};
use crate::util::write_output;

pub async fn cmd_list(
    session: &mut Session,
    filter: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let ok = session.panel.list_records().await;
    session.landed(ok, "Listing devices")?;

    session.panel.filter = filter.unwrap_or_default();
    let content = format_devices(session.panel.visible_records(), format)?;
    write_output(None, &content)
}

pub async fn cmd_show(session: &mut Session, id: &str, format: OutputFormat) -> Result<()> {
    let ok = session.panel.get_record(id).await;
    session.landed(ok, "Fetching device")?;

    let record = session.displayed_record()?;
    write_output(None, &format_record(&record, format)?)
}

pub async fn cmd_export(session: &mut Session, output: Option<&PathBuf>) -> Result<()> {
    let ok = session.panel.list_records().await;
    session.landed(ok, "Listing devices")?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            session.panel.export_csv(BufWriter::new(file))?;
            tracing::info!(
                "Exported {} devices to {}",
                session.panel.len(),
                path.display()
            );
        }
        None => session.panel.export_csv(io::stdout().lock())?,
    }
    Ok(())
}

pub async fn cmd_currencies(session: &Session) -> Result<()> {
    let server = session
        .panel
        .api()
        .currencies()
        .await
        .context("Failed to load currencies")?;
    let mut content = String::new();
    for code in selectable_currencies(&server) {
        content.push_str(&code);
        content.push('\n');
    }
    write_output(None, &content)
}
