//! The device registry panel.
//!
//! [`Panel`] owns the in-memory device list and the state of the two modal
//! dialogs, and keeps the list in step with the backend. It has no UI of its
//! own: a front end renders [`Panel::visible_records`] and the dialog state,
//! and forwards user gestures to the operations below.
//!
//! Every operation is a single request/response cycle. On success the
//! response is folded into the list; on failure the [`Notifier`] is told
//! and nothing changes. Operations return whether they landed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use lnpos_types::{DeviceRecord, ListedDevice, Payload, selectable_currencies};

use crate::error::{Error, Result};
use crate::export;
use crate::scratch::{self, MemoryScratch, ScratchStore};
use crate::traits::{Confirm, DeviceApi, LogNotifier, Notifier, StaticConfirm};

/// Prompt shown before a device is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this device?";

/// Credentials of the wallet the panel acts for.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Wallet identifier.
    #[serde(default)]
    pub id: String,
    /// Key authorizing mutations.
    #[serde(default)]
    pub adminkey: String,
    /// Lesser-privileged key handed to the display view.
    #[serde(default)]
    pub inkey: String,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("id", &self.id)
            .field("adminkey", &"<redacted>")
            .field("inkey", &"<redacted>")
            .finish()
    }
}

/// Create/edit form dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDialog {
    pub show: bool,
    /// Draft being composed or edited.
    pub data: DeviceRecord,
}

impl Default for FormDialog {
    fn default() -> Self {
        Self {
            show: false,
            data: DeviceRecord::creation_draft(),
        }
    }
}

/// Read-only settings dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDialog {
    pub show: bool,
    pub data: DeviceRecord,
}

/// Controller for the device registry.
pub struct Panel<A> {
    api: A,
    wallet: Wallet,
    notifier: Box<dyn Notifier>,
    confirm: Box<dyn Confirm>,
    scratch: Box<dyn ScratchStore>,
    records: IndexMap<String, ListedDevice>,
    currency: Vec<String>,
    /// Create/edit dialog.
    pub form_dialog: FormDialog,
    /// Settings dialog.
    pub settings_dialog: SettingsDialog,
    /// Free-text filter applied by [`Panel::visible_records`].
    pub filter: String,
    boltz_toggle: bool,
    last_saved: Option<String>,
}

impl<A: std::fmt::Debug> std::fmt::Debug for Panel<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("api", &self.api)
            .field("wallet", &self.wallet)
            .field("records", &self.records.len())
            .field("currency", &self.currency)
            .field("form_dialog", &self.form_dialog)
            .field("settings_dialog", &self.settings_dialog)
            .finish()
    }
}

impl<A: DeviceApi> Panel<A> {
    /// Create a panel acting for `wallet`.
    ///
    /// Failures are logged through `tracing`, deletions are declined and
    /// scratch storage is kept in memory until replaced with the `with_*`
    /// builders.
    pub fn new(api: A, wallet: Wallet) -> Self {
        Self {
            api,
            wallet,
            notifier: Box::new(LogNotifier),
            confirm: Box::new(StaticConfirm(false)),
            scratch: Box::new(MemoryScratch::new()),
            records: IndexMap::new(),
            currency: selectable_currencies(&[]),
            form_dialog: FormDialog::default(),
            settings_dialog: SettingsDialog::default(),
            filter: String::new(),
            boltz_toggle: false,
            last_saved: None,
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    #[must_use]
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    #[must_use]
    pub fn with_scratch(mut self, scratch: impl ScratchStore + 'static) -> Self {
        self.scratch = Box::new(scratch);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// All records in list order.
    pub fn records(&self) -> impl Iterator<Item = &ListedDevice> {
        self.records.values()
    }

    /// Records matching [`Panel::filter`].
    pub fn visible_records(&self) -> impl Iterator<Item = &ListedDevice> {
        self.records.values().filter(|r| r.matches(&self.filter))
    }

    pub fn record(&self, id: &str) -> Option<&ListedDevice> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Currency codes offered in the form.
    pub fn currency(&self) -> &[String] {
        &self.currency
    }

    /// Whether the record in the form dialog is a Boltz-backed ATM.
    pub fn boltz_toggle(&self) -> bool {
        self.boltz_toggle
    }

    /// The record most recently created or updated through this panel.
    pub fn last_saved(&self) -> Option<&ListedDevice> {
        self.last_saved.as_deref().and_then(|id| self.records.get(id))
    }

    /// Load the device list and the currency list.
    ///
    /// Both requests run concurrently and are folded in once settled.
    pub async fn init(&mut self) {
        let (devices, currencies) = tokio::join!(
            self.api.list_devices(&self.wallet.adminkey),
            self.api.currencies()
        );
        self.apply_list(devices);
        match currencies {
            Ok(server) => self.currency = selectable_currencies(&server),
            Err(e) => self.report(e),
        }
    }

    /// Replace the list with the backend's.
    pub async fn list_records(&mut self) -> bool {
        let result = self.api.list_devices(&self.wallet.adminkey).await;
        self.apply_list(result)
    }

    /// Fetch one record and hand it to the display view via scratch storage.
    pub async fn get_record(&mut self, id: &str) -> bool {
        let result = match self.api.get_device(&self.wallet.adminkey, id).await {
            Ok(record) => self.store_for_display(&record),
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    /// Submit `draft` as a new record.
    ///
    /// `draft` should not carry an id; see [`Panel::submit_form`].
    pub async fn create_record(&mut self, key: &str, draft: DeviceRecord) -> bool {
        let result = match Payload::from_draft(&draft) {
            Ok(payload) => self.api.create_device(key, &payload).await,
            Err(e) => Err(e.into()),
        };
        match result.and_then(Self::listed) {
            Ok(row) => {
                tracing::info!(id = %row.id, "device created");
                self.records.shift_remove(&row.id);
                self.last_saved = Some(row.id.clone());
                self.records.insert(row.id.clone(), row);
                self.clear_and_close_form();
                true
            }
            Err(e) => self.fail(e),
        }
    }

    /// Submit `draft` as an update of the record it carries the id of.
    pub async fn update_record(&mut self, key: &str, draft: DeviceRecord) -> bool {
        let Some(id) = draft.id.clone().filter(|id| !id.is_empty()) else {
            return self.fail(Error::MissingId);
        };
        let result = match Payload::from_draft(&draft) {
            Ok(payload) => self.api.update_device(key, &id, &payload).await,
            Err(e) => Err(e.into()),
        };
        match result.and_then(Self::listed) {
            Ok(row) => {
                tracing::info!(id = %row.id, "device updated");
                self.records.shift_remove(&id);
                self.records.shift_remove(&row.id);
                self.last_saved = Some(row.id.clone());
                self.records.insert(row.id.clone(), row);
                self.clear_and_close_form();
                true
            }
            Err(e) => self.fail(e),
        }
    }

    /// Delete a record after the user confirmed.
    ///
    /// A declined confirmation sends nothing and is not an error.
    pub async fn delete_record(&mut self, id: &str) -> bool {
        if !self.confirm.confirm(DELETE_PROMPT).await {
            tracing::debug!(id, "deletion declined");
            return false;
        }
        match self.api.delete_device(&self.wallet.adminkey, id).await {
            Ok(()) => {
                tracing::info!(id, "device deleted");
                self.records.shift_remove(id);
                true
            }
            Err(e) => self.fail(e),
        }
    }

    /// Submit the form dialog's draft.
    ///
    /// A falsy profit is set to `0` first. Drafts with an id are updates,
    /// all others are creates.
    pub async fn submit_form(&mut self) -> bool {
        let draft = &mut self.form_dialog.data;
        if !draft.profit.is_some_and(|p| p != 0.0 && !p.is_nan()) {
            draft.profit = Some(0.0);
        }
        let draft = draft.clone();
        let key = self.wallet.adminkey.clone();
        if draft.is_persisted() {
            self.update_record(&key, draft).await
        } else {
            self.create_record(&key, draft).await
        }
    }

    /// Show the form dialog for a new record, keeping the current draft.
    pub fn open_create_dialog(&mut self) {
        self.form_dialog.show = true;
    }

    /// Load a copy of record `id` into the form dialog and show it.
    pub fn open_edit_dialog(&mut self, id: &str) -> bool {
        let Some(row) = self.records.get(id) else {
            tracing::warn!(id, "no such device to edit");
            return false;
        };
        self.form_dialog.data = row.data.clone();
        self.boltz_toggle = row.data.is_boltz_atm();
        self.form_dialog.show = true;
        true
    }

    /// Load a copy of record `id` into the settings dialog and show it.
    pub fn open_settings_dialog(&mut self, id: &str) -> bool {
        let Some(row) = self.records.get(id) else {
            tracing::warn!(id, "no such device for settings");
            return false;
        };
        self.settings_dialog.data = row.data.clone();
        self.settings_dialog.show = true;
        true
    }

    pub fn close_settings_dialog(&mut self) {
        self.settings_dialog.show = false;
    }

    /// Dismiss the form dialog.
    pub fn close_form_dialog(&mut self) {
        self.clear_form_dialog();
        self.form_dialog.data = DeviceRecord::closed_draft();
        self.form_dialog.show = false;
    }

    /// Abandon the draft.
    pub fn cancel_form(&mut self) {
        self.clear_and_close_form();
    }

    /// Reset the draft to cleared defaults.
    pub fn clear_form_dialog(&mut self) {
        self.form_dialog.data = DeviceRecord::cleared();
    }

    /// Write every record as CSV using the table's columns.
    pub fn export_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        export::write_csv(writer, self.records.values())
    }

    fn clear_and_close_form(&mut self) {
        self.form_dialog.show = false;
        self.clear_form_dialog();
    }

    fn apply_list(&mut self, result: Result<Option<Vec<DeviceRecord>>>) -> bool {
        match result {
            Ok(devices) => {
                self.records = devices
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(ListedDevice::from_record)
                    .map(|row| (row.id.clone(), row))
                    .collect();
                tracing::debug!(count = self.records.len(), "device list loaded");
                true
            }
            Err(e) => self.fail(e),
        }
    }

    fn store_for_display(&self, record: &DeviceRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.scratch.set(scratch::DEVICE_KEY, &json)?;
        self.scratch.set(scratch::INVOICE_KEY, &self.wallet.inkey)?;
        Ok(())
    }

    fn listed(record: DeviceRecord) -> Result<ListedDevice> {
        ListedDevice::from_record(record).ok_or(Error::MissingId)
    }

    fn settle(&self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, error: Error) -> bool {
        self.report(error);
        false
    }

    fn report(&self, error: Error) {
        self.notifier.notify(&error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;

    fn wallet() -> Wallet {
        Wallet {
            id: "w1".into(),
            adminkey: "admin".into(),
            inkey: "invoice".into(),
        }
    }

    #[test]
    fn test_new_panel_state() {
        let panel = Panel::new(MockApi::new(), wallet());
        assert!(panel.is_empty());
        assert_eq!(panel.currency(), ["sat", "USD"]);
        assert!(!panel.form_dialog.show);
        assert_eq!(panel.form_dialog.data, DeviceRecord::creation_draft());
        assert!(!panel.boltz_toggle());
    }

    #[test]
    fn test_wallet_debug_hides_keys() {
        let debug = format!("{:?}", wallet());
        assert!(debug.contains("w1"));
        assert!(!debug.contains("admin\""));
        assert!(!debug.contains("invoice"));
    }

    #[test]
    fn test_close_form_dialog_marks_draft() {
        let mut panel = Panel::new(MockApi::new(), wallet());
        panel.open_create_dialog();
        panel.close_form_dialog();
        assert!(!panel.form_dialog.show);
        assert_eq!(panel.form_dialog.data.is_unique, Some(false));
        assert!(panel.form_dialog.data.title.is_none());
    }

    #[test]
    fn test_cancel_form_clears_draft() {
        let mut panel = Panel::new(MockApi::new(), wallet());
        panel.open_create_dialog();
        panel.form_dialog.data.title = Some("half typed".into());
        panel.cancel_form();
        assert!(!panel.form_dialog.show);
        assert_eq!(panel.form_dialog.data, DeviceRecord::cleared());
    }

    #[test]
    fn test_open_unknown_record() {
        let mut panel = Panel::new(MockApi::new(), wallet());
        assert!(!panel.open_edit_dialog("nope"));
        assert!(!panel.open_settings_dialog("nope"));
        assert!(!panel.form_dialog.show);
        assert!(!panel.settings_dialog.show);
    }
}
