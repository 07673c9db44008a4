//! Commands that change the registry: create, update, delete.

use anyhow::{Result, bail};

use super::Session;
use crate::cli::DeviceFields;

pub async fn cmd_create(session: &mut Session, title: String, fields: &DeviceFields) -> Result<()> {
    let wallet_id = session.panel.wallet().id.clone();
    let panel = &mut session.panel;

    panel.open_create_dialog();
    let draft = &mut panel.form_dialog.data;
    draft.title = Some(title);
    if !wallet_id.is_empty() {
        draft.wallet = Some(wallet_id);
    }
    fields.apply(draft);

    let ok = panel.submit_form().await;
    session.landed(ok, "Creating device")?;

    if let Some(row) = session.panel.last_saved() {
        tracing::info!("Created device {}", row.id);
        println!("{}", row.id);
    }
    Ok(())
}

pub async fn cmd_update(
    session: &mut Session,
    id: &str,
    title: Option<String>,
    fields: &DeviceFields,
) -> Result<()> {
    let ok = session.panel.list_records().await;
    session.landed(ok, "Listing devices")?;

    let panel = &mut session.panel;
    if !panel.open_edit_dialog(id) {
        bail!("No device with id {}", id);
    }
    let draft = &mut panel.form_dialog.data;
    if let Some(title) = title {
        draft.title = Some(title);
    }
    fields.apply(draft);

    let ok = panel.submit_form().await;
    session.landed(ok, "Updating device")?;

    tracing::info!("Updated device {}", id);
    Ok(())
}

pub async fn cmd_delete(session: &mut Session, id: &str) -> Result<()> {
    if session.panel.delete_record(id).await {
        tracing::info!("Deleted device {}", id);
        return Ok(());
    }
    match session.failure() {
        Some(message) => bail!("Deleting device failed: {}", message),
        None => {
            eprintln!("Cancelled");
            Ok(())
        }
    }
}
