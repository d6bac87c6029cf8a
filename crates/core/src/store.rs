// Application store
//
// AppStore holds the facility and camera collections for one dashboard
// session. It is built once and handed to every view and command.
//
// - Camera mutations are write-through: the backend call must succeed before
//   local state changes. On failure the error is returned unchanged and the
//   collections are untouched.
// - Facility mutations are local only and synchronous.
// - Deleting a facility removes its cameras in the same critical section.
// - The state lock is never held across an await. Two concurrent mutations
//   of the same camera are not ordered: whichever backend response resolves
//   last is applied last.
// - After every mutation the snapshot is written through StatePersistence.
//   A status report that only refreshes `last_checked` is kept in memory.

use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::camera::{Camera, CameraPatch, CameraStatus, CameraStatusReport};
use crate::client::BackendClient;
use crate::error::{PersistenceError, Result, StoreError};
use crate::facility::{Facility, FacilityPatch};
use crate::persistence::{StatePersistence, StoreSnapshot};

/// Counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub facilities: usize,
    pub cameras: usize,
    pub active_cameras: usize,
    pub inactive_cameras: usize,
}

/// Result of deleting a facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityRemoval {
    pub facility: Facility,
    /// Cameras removed along with the facility
    pub cameras: Vec<Camera>,
}

/// Client-side application state
pub struct AppStore {
    backend: Arc<dyn BackendClient>,
    persistence: Option<StatePersistence>,
    state: RwLock<StoreSnapshot>,
}

impl AppStore {
    /// Create an empty, unpersisted store
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            backend,
            persistence: None,
            state: RwLock::new(StoreSnapshot::default()),
        }
    }

    /// Create a store seeded from persisted state; every mutation is saved back
    pub fn with_persistence(
        backend: Arc<dyn BackendClient>,
        persistence: StatePersistence,
    ) -> std::result::Result<Self, PersistenceError> {
        let snapshot = persistence.load()?;
        info!(
            facilities = snapshot.facilities.len(),
            cameras = snapshot.cameras.len(),
            "Store loaded"
        );
        Ok(Self {
            backend,
            persistence: Some(persistence),
            state: RwLock::new(snapshot),
        })
    }

    /// The backend client this store writes through
    pub fn backend(&self) -> &Arc<dyn BackendClient> {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn facilities(&self) -> Vec<Facility> {
        self.read().facilities.clone()
    }

    pub fn cameras(&self) -> Vec<Camera> {
        self.read().cameras.clone()
    }

    pub fn facility(&self, id: Uuid) -> Option<Facility> {
        self.read().facilities.iter().find(|f| f.id == id).cloned()
    }

    pub fn camera(&self, id: Uuid) -> Option<Camera> {
        self.read().cameras.iter().find(|c| c.id == id).cloned()
    }

    /// Cameras belonging to a facility, in insertion order
    pub fn cameras_for(&self, facility_id: Uuid) -> Vec<Camera> {
        self.read()
            .cameras
            .iter()
            .filter(|c| c.facility_id == facility_id)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().clone()
    }

    pub fn summary(&self) -> StoreSummary {
        let state = self.read();
        let active = state.cameras.iter().filter(|c| c.status.is_active()).count();
        StoreSummary {
            facilities: state.facilities.len(),
            cameras: state.cameras.len(),
            active_cameras: active,
            inactive_cameras: state.cameras.len() - active,
        }
    }

    // ------------------------------------------------------------------
    // Cameras (write-through)
    // ------------------------------------------------------------------

    /// Register a camera with the backend, then add it locally as `active`
    pub async fn add_camera(&self, mut camera: Camera) -> Result<Camera> {
        {
            let state = self.read();
            if state.cameras.iter().any(|c| c.id == camera.id) {
                return Err(StoreError::DuplicateCamera(camera.id));
            }
            if !state.facilities.iter().any(|f| f.id == camera.facility_id) {
                return Err(StoreError::FacilityNotFound(camera.facility_id));
            }
        }

        self.backend.add_camera(&camera).await?;

        camera.status = CameraStatus::Active;
        let mut state = self.write();
        // The facility may have been deleted while the request was in flight
        if !state.facilities.iter().any(|f| f.id == camera.facility_id) {
            warn!(
                camera_id = %camera.id,
                facility_id = %camera.facility_id,
                "Facility removed during camera registration; not adding camera locally"
            );
            return Err(StoreError::FacilityNotFound(camera.facility_id));
        }
        match state.cameras.iter_mut().find(|c| c.id == camera.id) {
            Some(existing) => *existing = camera.clone(),
            None => state.cameras.push(camera.clone()),
        }
        self.persist(&state);

        info!(camera_id = %camera.id, facility_id = %camera.facility_id, "Camera added");
        Ok(camera)
    }

    /// Send a partial update to the backend, then merge it into the local record
    pub async fn update_camera(&self, id: Uuid, patch: CameraPatch) -> Result<()> {
        if let Some(facility_id) = patch.facility_id {
            if self.facility(facility_id).is_none() {
                return Err(StoreError::FacilityNotFound(facility_id));
            }
        }

        self.backend.update_camera(id, &patch).await?;

        let mut state = self.write();
        if let Some(facility_id) = patch.facility_id {
            if !state.facilities.iter().any(|f| f.id == facility_id) {
                return Err(StoreError::FacilityNotFound(facility_id));
            }
        }
        match state.cameras.iter_mut().find(|c| c.id == id) {
            Some(camera) => {
                camera.apply(&patch);
                self.persist(&state);
                info!(camera_id = %id, "Camera updated");
            }
            None => debug!(camera_id = %id, "Updated camera is not in the local store"),
        }
        Ok(())
    }

    /// Delete a camera on the backend, then drop it locally
    pub async fn delete_camera(&self, id: Uuid) -> Result<()> {
        self.backend.delete_camera(id).await?;

        let mut state = self.write();
        let before = state.cameras.len();
        state.cameras.retain(|c| c.id != id);
        if state.cameras.len() != before {
            self.persist(&state);
        }

        info!(camera_id = %id, "Camera deleted");
        Ok(())
    }

    /// Record a status report from polling. Local only.
    ///
    /// `last_checked` is always refreshed in memory; the snapshot is only
    /// saved when the status itself changed.
    pub fn apply_status(&self, id: Uuid, report: &CameraStatusReport) -> bool {
        let mut state = self.write();
        let Some(camera) = state.cameras.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        let changed = camera.status != report.status;
        camera.status = report.status;
        camera.last_checked = Some(report.last_checked);

        if changed {
            self.persist(&state);
            info!(camera_id = %id, status = %report.status, "Camera status changed");
        }
        true
    }

    // ------------------------------------------------------------------
    // Facilities (local only)
    // ------------------------------------------------------------------

    pub fn add_facility(&self, facility: Facility) -> Result<Facility> {
        let mut state = self.write();
        if state.facilities.iter().any(|f| f.id == facility.id) {
            return Err(StoreError::DuplicateFacility(facility.id));
        }
        state.facilities.push(facility.clone());
        self.persist(&state);

        info!(facility_id = %facility.id, "Facility added");
        Ok(facility)
    }

    /// Merge a partial update into the facility with `id`; `None` if absent
    pub fn update_facility(&self, id: Uuid, patch: &FacilityPatch) -> Option<Facility> {
        let mut state = self.write();
        let facility = state.facilities.iter_mut().find(|f| f.id == id)?;
        facility.apply(patch);
        let updated = facility.clone();
        self.persist(&state);

        info!(facility_id = %id, "Facility updated");
        Some(updated)
    }

    /// Remove a facility together with every camera that references it
    pub fn delete_facility(&self, id: Uuid) -> Option<FacilityRemoval> {
        let mut state = self.write();
        let index = state.facilities.iter().position(|f| f.id == id)?;
        let facility = state.facilities.remove(index);

        let (removed, kept): (Vec<Camera>, Vec<Camera>) = std::mem::take(&mut state.cameras)
            .into_iter()
            .partition(|c| c.facility_id == id);
        state.cameras = kept;
        self.persist(&state);

        info!(
            facility_id = %id,
            cameras_removed = removed.len(),
            "Facility deleted"
        );
        Some(FacilityRemoval {
            facility,
            cameras: removed,
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn read(&self) -> RwLockReadGuard<'_, StoreSnapshot> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreSnapshot> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Save the snapshot. Failures are logged; in-memory state stays authoritative.
    fn persist(&self, snapshot: &StoreSnapshot) {
        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(snapshot) {
                warn!(error = %e, "Failed to save store snapshot");
            }
        }
    }
}
