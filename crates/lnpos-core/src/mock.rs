//! Mock backend and UI collaborators for testing.
//!
//! [`MockApi`] implements [`DeviceApi`] against an in-memory table so the
//! panel can be exercised without a running backend. [`MockNotifier`] and
//! [`MockConfirm`] record what the panel asked of its front end.
//!
//! # Features
//!
//! - **Failure injection**: fail every call, or only selected operations
//! - **Request log**: every call is recorded with its credential and payload
//! - **Absent payloads**: make the list endpoint answer without a body

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use lnpos_types::{DeviceRecord, Payload};

use crate::error::{Error, Result};
use crate::traits::{Confirm, DeviceApi, Notifier};

/// Operations of the registry API, for failure injection and request logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Currencies,
}

/// A request received by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub operation: Operation,
    /// Credential sent with the request.
    pub key: Option<String>,
    /// Addressed record id.
    pub id: Option<String>,
    /// Body of create and update requests.
    pub payload: Option<Payload>,
}

/// An in-memory device registry backend.
///
/// Behaves like the real backend: ids are assigned on create, updates
/// overwrite the submitted fields, unknown ids answer 404.
///
/// # Example
///
/// ```
/// use lnpos_core::{DeviceApi, MockApi};
///
/// #[tokio::main]
/// async fn main() {
///     let api = MockApi::new();
///     let devices = api.list_devices("key").await.unwrap();
///     assert_eq!(devices, Some(vec![]));
/// }
/// ```
pub struct MockApi {
    devices: RwLock<Vec<DeviceRecord>>,
    currencies: RwLock<Vec<String>>,
    requests: RwLock<Vec<MockRequest>>,
    failing: RwLock<HashSet<Operation>>,
    should_fail: AtomicBool,
    fail_status: AtomicU32,
    fail_message: RwLock<String>,
    absent_list: AtomicBool,
    next_id: AtomicU32,
}

impl std::fmt::Debug for MockApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockApi")
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            currencies: RwLock::new(vec!["EUR".to_string(), "GBP".to_string()]),
            requests: RwLock::new(Vec::new()),
            failing: RwLock::new(HashSet::new()),
            should_fail: AtomicBool::new(false),
            fail_status: AtomicU32::new(500),
            fail_message: RwLock::new("Mock failure".to_string()),
            absent_list: AtomicBool::new(false),
            next_id: AtomicU32::new(1),
        }
    }

    /// Create a backend that already stores `devices`.
    pub fn with_devices(devices: Vec<DeviceRecord>) -> Self {
        Self {
            devices: RwLock::new(devices),
            ..Self::new()
        }
    }

    /// Make every operation fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Make a single operation fail.
    pub async fn set_failing(&self, operation: Operation, fail: bool) {
        let mut failing = self.failing.write().await;
        if fail {
            failing.insert(operation);
        } else {
            failing.remove(&operation);
        }
    }

    /// Status and message of injected failures.
    pub async fn set_failure(&self, status: u16, message: &str) {
        self.fail_status.store(u32::from(status), Ordering::Relaxed);
        *self.fail_message.write().await = message.to_string();
    }

    /// Make the list endpoint answer without a payload.
    pub fn set_absent_list(&self, absent: bool) {
        self.absent_list.store(absent, Ordering::Relaxed);
    }

    /// Replace the server currency list.
    pub async fn set_currencies(&self, currencies: Vec<String>) {
        *self.currencies.write().await = currencies;
    }

    /// Records currently stored.
    pub async fn devices(&self) -> Vec<DeviceRecord> {
        self.devices.read().await.clone()
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<MockRequest> {
        self.requests.read().await.clone()
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of requests received for `operation`.
    pub async fn count(&self, operation: Operation) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    async fn record(
        &self,
        operation: Operation,
        key: Option<&str>,
        id: Option<&str>,
        payload: Option<&Payload>,
    ) -> Result<()> {
        self.requests.write().await.push(MockRequest {
            operation,
            key: key.map(String::from),
            id: id.map(String::from),
            payload: payload.cloned(),
        });

        if self.should_fail.load(Ordering::Relaxed)
            || self.failing.read().await.contains(&operation)
        {
            let status = u16::try_from(self.fail_status.load(Ordering::Relaxed)).unwrap_or(500);
            let message = self.fail_message.read().await.clone();
            return Err(Error::request_failed(status, message));
        }
        Ok(())
    }

    fn not_found(id: &str) -> Error {
        Error::request_failed(404, format!("Device {} does not exist", id))
    }

    fn record_from(payload: &Payload) -> Result<DeviceRecord> {
        Ok(serde_json::from_value(Value::Object(payload.as_map().clone()))?)
    }
}

#[async_trait]
impl DeviceApi for MockApi {
    async fn list_devices(&self, key: &str) -> Result<Option<Vec<DeviceRecord>>> {
        self.record(Operation::List, Some(key), None, None).await?;
        if self.absent_list.load(Ordering::Relaxed) {
            return Ok(None);
        }
        Ok(Some(self.devices.read().await.clone()))
    }

    async fn get_device(&self, key: &str, id: &str) -> Result<DeviceRecord> {
        self.record(Operation::Get, Some(key), Some(id), None).await?;
        self.devices
            .read()
            .await
            .iter()
            .find(|d| d.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_device(&self, key: &str, payload: &Payload) -> Result<DeviceRecord> {
        self.record(Operation::Create, Some(key), None, Some(payload))
            .await?;

        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut device = Self::record_from(payload)?;
        device.id = Some(format!("mock{:x}", n));
        device.key = Some(format!("key{:x}", n));
        device.profit = Some(device.profit.unwrap_or(0.0));
        device.currency = Some(device.currency.unwrap_or_else(|| "sat".to_string()));

        self.devices.write().await.push(device.clone());
        Ok(device)
    }

    async fn update_device(
        &self,
        key: &str,
        id: &str,
        payload: &Payload,
    ) -> Result<DeviceRecord> {
        self.record(Operation::Update, Some(key), Some(id), Some(payload))
            .await?;

        let mut devices = self.devices.write().await;
        let stored = devices
            .iter_mut()
            .find(|d| d.id.as_deref() == Some(id))
            .ok_or_else(|| Self::not_found(id))?;

        let mut merged = stored.to_object()?;
        for (field, value) in payload.as_map() {
            merged.insert(field.clone(), value.clone());
        }
        let mut updated: DeviceRecord = serde_json::from_value(Value::Object(merged))?;
        updated.id = Some(id.to_string());
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete_device(&self, key: &str, id: &str) -> Result<()> {
        self.record(Operation::Delete, Some(key), Some(id), None)
            .await?;
        let mut devices = self.devices.write().await;
        let before = devices.len();
        devices.retain(|d| d.id.as_deref() != Some(id));
        if devices.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn currencies(&self) -> Result<Vec<String>> {
        self.record(Operation::Currencies, None, None, None).await?;
        Ok(self.currencies.read().await.clone())
    }
}

/// Notifier that keeps every message it receives.
#[derive(Debug, Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, error: &Error) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.to_string());
    }
}

/// Confirmation with a fixed answer that counts how often it was asked.
#[derive(Debug)]
pub struct MockConfirm {
    answer: AtomicBool,
    asked: AtomicU32,
}

impl MockConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            asked: AtomicU32::new(0),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::Relaxed);
    }

    /// How many times the user was asked.
    pub fn asked(&self) -> u32 {
        self.asked.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Confirm for MockConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::Relaxed);
        self.answer.load(Ordering::Relaxed)
    }
}
