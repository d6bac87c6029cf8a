// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them useful for:
// - Unit and integration tests of the store and the poller
// - CLI view and route tests
// - Quick prototyping

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use crate::camera::{Camera, CameraPatch, CameraStatus, CameraStatusReport};
use crate::client::BackendClient;
use crate::error::{ClientError, PersistenceError};
use crate::persistence::KeyValueStore;
use crate::violation::DetectionEvent;

// ============================================================================
// InMemoryKeyValueStore - Keeps persisted values in a HashMap
// ============================================================================

/// In-memory key-value store
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// MockBackendClient - Scriptable backend for store and poller tests
// ============================================================================

/// Backend operations, used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    AddCamera,
    UpdateCamera,
    DeleteCamera,
    CheckStatus,
    ListViolations,
}

/// A call received by the mock, in order
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    AddCamera(Camera),
    UpdateCamera(Uuid, CameraPatch),
    DeleteCamera(Uuid),
    CheckStatus(Uuid),
    ListViolations,
}

type ScriptedStatus = Result<CameraStatusReport, (u16, String)>;

/// Parks calls of one operation until the test releases them
///
/// Returned by [`MockBackendClient::hold`]. Each `release` lets exactly one
/// parked (or future) call continue.
#[derive(Debug, Clone, Default)]
pub struct BackendGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl BackendGate {
    /// Wait until a call has reached the gate
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked call continue
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Mock backend client
///
/// Every call is recorded. Operations succeed unless a failure was scripted
/// with [`MockBackendClient::fail`]; calls can be parked with
/// [`MockBackendClient::hold`]. Status checks first drain the queue
/// filled by `push_status`/`push_status_error`, then fall back to the
/// scripted failure or an `active` report.
#[derive(Debug, Default, Clone)]
pub struct MockBackendClient {
    calls: Arc<RwLock<Vec<BackendCall>>>,
    failures: Arc<RwLock<HashMap<BackendOp, (u16, String)>>>,
    statuses: Arc<RwLock<VecDeque<ScriptedStatus>>>,
    violations: Arc<RwLock<Vec<DetectionEvent>>>,
    gates: Arc<RwLock<HashMap<BackendOp, BackendGate>>>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with an API error
    pub async fn fail(&self, op: BackendOp, status: u16, message: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(op, (status, message.into()));
    }

    /// Let `op` succeed again
    pub async fn recover(&self, op: BackendOp) {
        self.failures.write().await.remove(&op);
    }

    /// Queue a successful status report
    pub async fn push_status(&self, status: CameraStatus) {
        self.statuses.write().await.push_back(Ok(CameraStatusReport {
            status,
            last_checked: Utc::now(),
            error: None,
        }));
    }

    /// Queue a failed status check
    pub async fn push_status_error(&self, status: u16, message: impl Into<String>) {
        self.statuses
            .write()
            .await
            .push_back(Err((status, message.into())));
    }

    /// Park every call of `op` until released through the returned gate
    pub async fn hold(&self, op: BackendOp) -> BackendGate {
        self.gates.write().await.entry(op).or_default().clone()
    }

    pub async fn set_violations(&self, events: Vec<DetectionEvent>) {
        *self.violations.write().await = events;
    }

    /// Calls received so far
    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.read().await.clone()
    }

    pub async fn reset(&self) {
        self.calls.write().await.clear();
        self.failures.write().await.clear();
        self.statuses.write().await.clear();
        self.violations.write().await.clear();
        self.gates.write().await.clear();
    }

    async fn record(&self, call: BackendCall) {
        self.calls.write().await.push(call);
    }

    async fn gate(&self, op: BackendOp) {
        let gate = self.gates.read().await.get(&op).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
    }

    async fn check(&self, op: BackendOp) -> Result<(), ClientError> {
        match self.failures.read().await.get(&op) {
            Some((status, message)) => Err(ClientError::api(*status, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn add_camera(&self, camera: &Camera) -> Result<(), ClientError> {
        let mut submitted = camera.clone();
        submitted.status = CameraStatus::Active;
        self.record(BackendCall::AddCamera(submitted)).await;
        self.gate(BackendOp::AddCamera).await;
        self.check(BackendOp::AddCamera).await
    }

    async fn update_camera(&self, id: Uuid, patch: &CameraPatch) -> Result<(), ClientError> {
        self.record(BackendCall::UpdateCamera(id, patch.clone())).await;
        self.gate(BackendOp::UpdateCamera).await;
        self.check(BackendOp::UpdateCamera).await
    }

    async fn delete_camera(&self, id: Uuid) -> Result<(), ClientError> {
        self.record(BackendCall::DeleteCamera(id)).await;
        self.gate(BackendOp::DeleteCamera).await;
        self.check(BackendOp::DeleteCamera).await
    }

    async fn check_status(&self, id: Uuid) -> Result<CameraStatusReport, ClientError> {
        self.record(BackendCall::CheckStatus(id)).await;
        self.gate(BackendOp::CheckStatus).await;

        if let Some(scripted) = self.statuses.write().await.pop_front() {
            return scripted.map_err(|(status, message)| ClientError::api(status, message));
        }
        self.check(BackendOp::CheckStatus).await?;
        Ok(CameraStatusReport {
            status: CameraStatus::Active,
            last_checked: Utc::now(),
            error: None,
        })
    }

    fn stream_url(&self, id: Uuid) -> String {
        format!("mock://stream/{}", id)
    }

    async fn list_violations(&self) -> Result<Vec<DetectionEvent>, ClientError> {
        self.record(BackendCall::ListViolations).await;
        self.gate(BackendOp::ListViolations).await;
        self.check(BackendOp::ListViolations).await?;
        Ok(self.violations.read().await.clone())
    }
}
