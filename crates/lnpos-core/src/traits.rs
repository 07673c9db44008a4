//! Trait abstractions for the registry backend and the panel's UI
//! collaborators.
//!
//! [`DeviceApi`] abstracts over the real HTTP backend and the in-memory
//! [`MockApi`](crate::MockApi). [`Notifier`] and [`Confirm`] stand in for the
//! toast and confirmation-dialog primitives of whatever front end hosts the
//! panel.

use std::sync::Arc;

use async_trait::async_trait;

use lnpos_types::{DeviceRecord, Payload};

use crate::error::{Error, Result};

/// Operations offered by a device registry backend.
///
/// `key` is the wallet credential sent with the request. Every call is a
/// single request/response round trip with no retry.
///
/// # Example
///
/// ```ignore
/// use lnpos_core::{DeviceApi, Result};
///
/// async fn count<A: DeviceApi>(api: &A, key: &str) -> Result<usize> {
///     Ok(api.list_devices(key).await?.unwrap_or_default().len())
/// }
/// ```
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// List every device visible to the wallet.
    ///
    /// `Ok(None)` means the backend answered without a payload.
    async fn list_devices(&self, key: &str) -> Result<Option<Vec<DeviceRecord>>>;

    /// Fetch a single device.
    async fn get_device(&self, key: &str, id: &str) -> Result<DeviceRecord>;

    /// Create a device from a falsy-stripped payload.
    async fn create_device(&self, key: &str, payload: &Payload) -> Result<DeviceRecord>;

    /// Replace the stored fields of device `id`.
    async fn update_device(
        &self,
        key: &str,
        id: &str,
        payload: &Payload,
    ) -> Result<DeviceRecord>;

    /// Delete device `id`.
    async fn delete_device(&self, key: &str, id: &str) -> Result<()>;

    /// Fiat currency codes supported by the backend. Needs no credential.
    async fn currencies(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: DeviceApi + ?Sized> DeviceApi for Arc<T> {
    async fn list_devices(&self, key: &str) -> Result<Option<Vec<DeviceRecord>>> {
        (**self).list_devices(key).await
    }

    async fn get_device(&self, key: &str, id: &str) -> Result<DeviceRecord> {
        (**self).get_device(key, id).await
    }

    async fn create_device(&self, key: &str, payload: &Payload) -> Result<DeviceRecord> {
        (**self).create_device(key, payload).await
    }

    async fn update_device(
        &self,
        key: &str,
        id: &str,
        payload: &Payload,
    ) -> Result<DeviceRecord> {
        (**self).update_device(key, id, payload).await
    }

    async fn delete_device(&self, key: &str, id: &str) -> Result<()> {
        (**self).delete_device(key, id).await
    }

    async fn currencies(&self) -> Result<Vec<String>> {
        (**self).currencies().await
    }
}

/// Sink for non-blocking, user-visible failure messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, error: &Error);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, error: &Error) {
        (**self).notify(error);
    }
}

/// Interactive yes/no confirmation.
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Ask the user; `true` means proceed.
    async fn confirm(&self, prompt: &str) -> bool;
}

#[async_trait]
impl<T: Confirm + ?Sized> Confirm for Arc<T> {
    async fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt).await
    }
}

/// Notifier that reports failures through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, error: &Error) {
        tracing::warn!(status = ?error.status(), "{}", error);
    }
}

/// Confirmation that always gives the same answer.
///
/// `StaticConfirm(false)` is the panel's default, so nothing is deleted
/// unless a front end supplies a real prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfirm(pub bool);

#[async_trait]
impl Confirm for StaticConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(answer = self.0, "confirmation: {}", prompt);
        self.0
    }
}
