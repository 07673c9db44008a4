//! Behavior tests for the registry panel against the mock backend.

use std::sync::Arc;

use serde_json::json;

use lnpos_core::scratch::{DEVICE_KEY, INVOICE_KEY};
use lnpos_core::{
    DeviceApi, DeviceKind, DeviceRecord, MemoryScratch, MockApi, MockConfirm, MockNotifier,
    Operation, Panel, ScratchStore, Wallet,
};

const ADMIN_KEY: &str = "admin-key";
const INVOICE: &str = "invoice-key";

struct Harness {
    panel: Panel<MockApi>,
    notifier: Arc<MockNotifier>,
    confirm: Arc<MockConfirm>,
    scratch: Arc<MemoryScratch>,
}

fn wallet() -> Wallet {
    Wallet {
        id: "wallet-1".into(),
        adminkey: ADMIN_KEY.into(),
        inkey: INVOICE.into(),
    }
}

fn stored(id: &str, title: &str) -> DeviceRecord {
    DeviceRecord {
        id: Some(id.into()),
        key: Some(format!("key-{id}")),
        title: Some(title.into()),
        wallet: Some("wallet-1".into()),
        currency: Some("sat".into()),
        device: Some(DeviceKind::Pos),
        profit: Some(1.5),
        ..Default::default()
    }
}

fn harness(api: MockApi) -> Harness {
    let notifier = Arc::new(MockNotifier::new());
    let confirm = Arc::new(MockConfirm::new(true));
    let scratch = Arc::new(MemoryScratch::new());
    let panel = Panel::new(api, wallet())
        .with_notifier(Arc::clone(&notifier))
        .with_confirm(Arc::clone(&confirm))
        .with_scratch(Arc::clone(&scratch));
    Harness {
        panel,
        notifier,
        confirm,
        scratch,
    }
}

fn ids(panel: &Panel<MockApi>) -> Vec<String> {
    panel.records().map(|r| r.id.clone()).collect()
}

#[tokio::test]
async fn test_init_loads_records_and_currencies() {
    let mut h = harness(MockApi::with_devices(vec![
        stored("bbbbb", "Second"),
        stored("aaaaa", "First"),
    ]));
    h.panel.api().set_currencies(vec!["EUR".into(), "GBP".into()]).await;

    h.panel.init().await;

    assert_eq!(ids(&h.panel), ["bbbbb", "aaaaa"]);
    assert_eq!(h.panel.currency(), ["sat", "USD", "EUR", "GBP"]);
    assert_eq!(h.notifier.count(), 0);
    assert_eq!(h.panel.api().count(Operation::List).await, 1);
    assert_eq!(h.panel.api().count(Operation::Currencies).await, 1);
}

#[tokio::test]
async fn test_init_currency_failure_is_notified_independently() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.api().set_failing(Operation::Currencies, true).await;

    h.panel.init().await;

    assert_eq!(h.panel.len(), 1);
    assert_eq!(h.panel.currency(), ["sat", "USD"]);
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_list_uses_admin_key() {
    let mut h = harness(MockApi::new());
    assert!(h.panel.list_records().await);
    let requests = h.panel.api().requests().await;
    assert_eq!(requests[0].key.as_deref(), Some(ADMIN_KEY));
}

#[tokio::test]
async fn test_empty_backend_leaves_list_empty() {
    let mut h = harness(MockApi::new());
    h.panel.api().set_absent_list(true);

    assert!(h.panel.list_records().await);
    assert!(h.panel.is_empty());
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_list_failure_keeps_records() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.panel.api().set_should_fail(true);

    assert!(!h.panel.list_records().await);
    assert_eq!(ids(&h.panel), ["aaaaa"]);
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_list_replaces_wholesale() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.panel.api().delete_device(ADMIN_KEY, "aaaaa").await.unwrap();

    h.panel.list_records().await;
    assert!(h.panel.is_empty());
}

#[tokio::test]
async fn test_list_mapping_keeps_identity_fields() {
    let mut h = harness(MockApi::with_devices(vec![stored("abcdefgh", "Shop")]));
    h.panel.list_records().await;

    let row = h.panel.record("abcdefgh").unwrap();
    assert_eq!(row.short_id, "abcde");
    assert_eq!(row.data, stored("abcdefgh", "Shop"));
}

#[tokio::test]
async fn test_get_record_writes_scratch() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));

    assert!(h.panel.get_record("aaaaa").await);

    let json = h.scratch.get(DEVICE_KEY).unwrap().unwrap();
    let record = DeviceRecord::from_json(&json).unwrap();
    assert_eq!(record, stored("aaaaa", "First"));
    assert_eq!(h.scratch.get(INVOICE_KEY).unwrap().as_deref(), Some(INVOICE));
    assert!(h.panel.is_empty());
}

#[tokio::test]
async fn test_get_record_failure_notifies() {
    let mut h = harness(MockApi::new());
    assert!(!h.panel.get_record("nope").await);
    assert!(h.scratch.is_empty());
    assert!(h.notifier.messages()[0].contains("404"));
}

#[tokio::test]
async fn test_create_sends_truthy_fields_only() {
    let mut h = harness(MockApi::new());
    let draft = DeviceRecord {
        title: Some("Shop A".into()),
        device: Some(DeviceKind::Pos),
        profit: Some(0.0),
        amount: Some(1.0),
        ..Default::default()
    };
    h.panel.open_create_dialog();

    assert!(h.panel.create_record(ADMIN_KEY, draft).await);

    let requests = h.panel.api().requests().await;
    let payload = requests[0].payload.clone().unwrap();
    let mut fields: Vec<_> = payload.fields().collect();
    fields.sort_unstable();
    assert_eq!(fields, ["amount", "device", "title"]);

    assert_eq!(h.panel.len(), 1);
    assert!(!h.panel.form_dialog.show);
    assert_eq!(h.panel.form_dialog.data, DeviceRecord::cleared());
}

#[tokio::test]
async fn test_create_failure_keeps_dialog_open() {
    let mut h = harness(MockApi::new());
    h.panel.api().set_should_fail(true);
    h.panel.open_create_dialog();
    h.panel.form_dialog.data.title = Some("Shop A".into());

    assert!(!h.panel.submit_form().await);

    assert!(h.panel.form_dialog.show);
    assert_eq!(h.panel.form_dialog.data.title.as_deref(), Some("Shop A"));
    assert!(h.panel.is_empty());
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_submit_coerces_falsy_profit() {
    let mut h = harness(MockApi::new());
    h.panel.api().set_should_fail(true);

    h.panel.form_dialog.data.profit = None;
    h.panel.submit_form().await;
    assert_eq!(h.panel.form_dialog.data.profit, Some(0.0));

    h.panel.form_dialog.data.profit = Some(f64::NAN);
    h.panel.submit_form().await;
    assert_eq!(h.panel.form_dialog.data.profit, Some(0.0));

    h.panel.form_dialog.data.profit = Some(2.0);
    h.panel.submit_form().await;
    assert_eq!(h.panel.form_dialog.data.profit, Some(2.0));
}

#[tokio::test]
async fn test_submit_dispatches_create_without_id() {
    let mut h = harness(MockApi::new());
    h.panel.form_dialog.data.title = Some("New".into());

    assert!(h.panel.submit_form().await);

    assert_eq!(h.panel.api().count(Operation::Create).await, 1);
    assert_eq!(h.panel.api().count(Operation::Update).await, 0);
}

#[tokio::test]
async fn test_submit_dispatches_update_with_id() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.panel.open_edit_dialog("aaaaa");

    assert!(h.panel.submit_form().await);

    assert_eq!(h.panel.api().count(Operation::Create).await, 0);
    assert_eq!(h.panel.api().count(Operation::Update).await, 1);
}

#[tokio::test]
async fn test_empty_id_counts_as_new() {
    let mut h = harness(MockApi::new());
    h.panel.form_dialog.data.id = Some(String::new());
    h.panel.form_dialog.data.title = Some("New".into());

    assert!(h.panel.submit_form().await);
    assert_eq!(h.panel.api().count(Operation::Create).await, 1);
    assert_eq!(h.panel.api().count(Operation::Update).await, 0);
}

#[tokio::test]
async fn test_update_replaces_entry_with_server_copy() {
    let mut h = harness(MockApi::with_devices(vec![
        stored("aaaaa", "First"),
        stored("bbbbb", "Second"),
    ]));
    h.panel.list_records().await;

    h.panel.open_edit_dialog("aaaaa");
    h.panel.form_dialog.data.title = Some("Renamed".into());
    assert!(h.panel.submit_form().await);

    assert_eq!(ids(&h.panel), ["bbbbb", "aaaaa"]);
    let matching: Vec<_> = h.panel.records().filter(|r| r.id == "aaaaa").collect();
    assert_eq!(matching.len(), 1);
    let server = h.panel.api().devices().await;
    let server_copy = server.iter().find(|d| d.id.as_deref() == Some("aaaaa")).unwrap();
    assert_eq!(&matching[0].data, server_copy);
    assert_eq!(matching[0].data.title.as_deref(), Some("Renamed"));
    assert!(!h.panel.form_dialog.show);
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let mut h = harness(MockApi::new());
    assert!(!h.panel.update_record(ADMIN_KEY, DeviceRecord::cleared()).await);
    assert_eq!(h.panel.api().request_count().await, 0);
    assert_eq!(h.notifier.messages(), ["Device record has no id"]);
}

#[tokio::test]
async fn test_update_failure_keeps_local_copy() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.panel.open_edit_dialog("aaaaa");
    h.panel.form_dialog.data.title = Some("Renamed".into());
    h.panel.api().set_failing(Operation::Update, true).await;

    assert!(!h.panel.submit_form().await);

    assert_eq!(
        h.panel.record("aaaaa").unwrap().data.title.as_deref(),
        Some("First")
    );
    assert!(h.panel.form_dialog.show);
    assert_eq!(h.panel.form_dialog.data.title.as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn test_edit_dialog_clones_record() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;

    assert!(h.panel.open_edit_dialog("aaaaa"));
    h.panel.form_dialog.data.title = Some("Scratch".into());

    assert!(h.panel.form_dialog.show);
    assert_eq!(
        h.panel.record("aaaaa").unwrap().data.title.as_deref(),
        Some("First")
    );
}

#[tokio::test]
async fn test_sequential_edits_see_latest_save() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;

    h.panel.open_edit_dialog("aaaaa");
    h.panel.form_dialog.data.title = Some("One".into());
    assert!(h.panel.submit_form().await);

    h.panel.open_edit_dialog("aaaaa");
    assert_eq!(h.panel.form_dialog.data.title.as_deref(), Some("One"));
    h.panel.form_dialog.data.title = Some("Two".into());
    assert!(h.panel.submit_form().await);

    assert_eq!(
        h.panel.record("aaaaa").unwrap().data.title.as_deref(),
        Some("Two")
    );
    assert_eq!(h.panel.len(), 1);
}

#[tokio::test]
async fn test_resubmitting_unchanged_record_sends_only_its_fields() {
    let mut h = harness(MockApi::new());
    let draft = DeviceRecord {
        title: Some("Shop A".into()),
        device: Some(DeviceKind::Pos),
        amount: Some(1.0),
        show_ack: Some(false),
        ..Default::default()
    };
    assert!(h.panel.create_record(ADMIN_KEY, draft).await);
    let id = h.panel.records().next().unwrap().id.clone();
    let original = h.panel.record(&id).unwrap().data.to_object().unwrap();

    h.panel.open_edit_dialog(&id);
    assert!(h.panel.submit_form().await);

    let requests = h.panel.api().requests().await;
    let update = requests
        .iter()
        .find(|r| r.operation == Operation::Update)
        .unwrap();
    for field in update.payload.as_ref().unwrap().fields() {
        assert!(original.contains_key(field), "unexpected field {field}");
    }
    assert_eq!(h.panel.len(), 1);
}

#[tokio::test]
async fn test_boltz_toggle_follows_edited_record() {
    let mut boltz = stored("aaaaa", "ATM");
    boltz.device = Some(DeviceKind::Atm);
    boltz.extra = Some("boltz".into());
    let mut h = harness(MockApi::with_devices(vec![boltz, stored("bbbbb", "PoS")]));
    h.panel.list_records().await;

    h.panel.open_edit_dialog("aaaaa");
    assert!(h.panel.boltz_toggle());
    h.panel.open_edit_dialog("bbbbb");
    assert!(!h.panel.boltz_toggle());
}

#[tokio::test]
async fn test_settings_dialog_clones_record() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;

    assert!(h.panel.open_settings_dialog("aaaaa"));
    assert!(h.panel.settings_dialog.show);
    assert_eq!(h.panel.settings_dialog.data, stored("aaaaa", "First"));

    h.panel.close_settings_dialog();
    assert!(!h.panel.settings_dialog.show);
}

#[tokio::test]
async fn test_delete_declined_sends_nothing() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.confirm.set_answer(false);
    let before = h.panel.api().request_count().await;

    assert!(!h.panel.delete_record("aaaaa").await);

    assert_eq!(h.confirm.asked(), 1);
    assert_eq!(h.panel.api().request_count().await, before);
    assert_eq!(ids(&h.panel), ["aaaaa"]);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_delete_confirmed_removes_entry() {
    let mut h = harness(MockApi::with_devices(vec![
        stored("aaaaa", "First"),
        stored("bbbbb", "Second"),
    ]));
    h.panel.list_records().await;

    assert!(h.panel.delete_record("aaaaa").await);

    assert_eq!(ids(&h.panel), ["bbbbb"]);
    assert_eq!(h.panel.api().devices().await.len(), 1);
}

#[tokio::test]
async fn test_delete_failure_keeps_entry() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    h.panel.api().set_failing(Operation::Delete, true).await;

    assert!(!h.panel.delete_record("aaaaa").await);
    assert_eq!(ids(&h.panel), ["aaaaa"]);
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_filter_limits_visible_records() {
    let mut h = harness(MockApi::with_devices(vec![
        stored("aaaaa", "Corner Shop"),
        stored("bbbbb", "Beach Bar"),
    ]));
    h.panel.list_records().await;

    h.panel.filter = "bar".into();
    let visible: Vec<_> = h.panel.visible_records().map(|r| r.id.as_str()).collect();
    assert_eq!(visible, ["bbbbb"]);
    assert_eq!(h.panel.len(), 2);
}

#[tokio::test]
async fn test_export_csv_uses_table_columns() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;

    let mut out = Vec::new();
    h.panel.export_csv(&mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "title,id,key,wallet,currency\nFirst,aaaaa,key-aaaaa,wallet-1,sat\n"
    );
}

#[tokio::test]
async fn test_unknown_backend_fields_survive_update() {
    let mut record = stored("aaaaa", "First");
    record.other.insert("timestamp".into(), json!("2024-05-01 10:00:00"));
    let mut h = harness(MockApi::with_devices(vec![record]));
    h.panel.list_records().await;

    h.panel.open_edit_dialog("aaaaa");
    assert!(h.panel.submit_form().await);

    let row = h.panel.record("aaaaa").unwrap();
    assert_eq!(
        row.data.other.get("timestamp"),
        Some(&json!("2024-05-01 10:00:00"))
    );
}

#[tokio::test]
async fn test_last_saved_tracks_create_and_update() {
    let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
    h.panel.list_records().await;
    assert!(h.panel.last_saved().is_none());

    h.panel.form_dialog.data.title = Some("New".into());
    assert!(h.panel.submit_form().await);
    let created = h.panel.last_saved().unwrap().id.clone();
    assert_ne!(created, "aaaaa");

    h.panel.open_edit_dialog("aaaaa");
    assert!(h.panel.submit_form().await);
    assert_eq!(h.panel.last_saved().unwrap().id, "aaaaa");
}

#[tokio::test]
async fn test_create_returning_known_id_moves_it_to_the_end() {
    use lnpos_core::{ApiClient, DEFAULT_MOUNT};

    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/lnurldevice/api/v1/lnurlpos")
        .with_status(200)
        .with_body(r#"[{"id":"aaaaa","title":"First"},{"id":"bbbbb","title":"Second"}]"#)
        .create_async()
        .await;
    let _create = server
        .mock("POST", "/lnurldevice/api/v1/lnurlpos")
        .with_status(201)
        .with_body(r#"{"id":"aaaaa","title":"First again"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(&server.url(), DEFAULT_MOUNT).unwrap();
    let notifier = Arc::new(MockNotifier::new());
    let mut panel = Panel::new(api, wallet()).with_notifier(Arc::clone(&notifier));
    assert!(panel.list_records().await);

    let draft = DeviceRecord {
        title: Some("First again".into()),
        ..Default::default()
    };
    assert!(panel.create_record(ADMIN_KEY, draft).await);

    let order: Vec<_> = panel.records().map(|r| r.id.as_str()).collect();
    assert_eq!(order, ["bbbbb", "aaaaa"]);
    assert_eq!(
        panel.record("aaaaa").unwrap().data.title.as_deref(),
        Some("First again")
    );
    assert_eq!(panel.last_saved().unwrap().id, "aaaaa");
    assert_eq!(notifier.count(), 0);
}

mod dispatch {
    use super::*;
    use proptest::prelude::*;

    fn draft() -> impl Strategy<Value = DeviceRecord> {
        (
            proptest::option::of("[a-e]{0,5}"),
            proptest::option::of("[ -~]{0,8}"),
            proptest::option::of(prop_oneof![Just(0.0), -50.0f64..50.0]),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(id, title, profit, lnurl_toggle)| DeviceRecord {
                id,
                title,
                profit,
                lnurl_toggle,
                ..Default::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every submission sends exactly one create or one update, chosen by the id.
        #[test]
        fn submit_dispatches_exactly_one_request(draft in draft()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let persisted = draft.is_persisted();
            let (creates, updates) = runtime.block_on(async {
                let mut h = harness(MockApi::with_devices(vec![stored("aaaaa", "First")]));
                h.panel.form_dialog.data = draft;
                h.panel.submit_form().await;
                (
                    h.panel.api().count(Operation::Create).await,
                    h.panel.api().count(Operation::Update).await,
                )
            });

            prop_assert_eq!(creates + updates, 1);
            prop_assert_eq!(updates == 1, persisted);
        }
    }
}
