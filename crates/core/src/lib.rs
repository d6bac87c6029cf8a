// Sitewatch client core
//
// This crate holds everything below the views of the monitoring dashboard:
// domain types, the backend client, the application store, local
// persistence, status polling and form handling.
//
// Key design decisions:
// - The store talks to the backend through the BackendClient trait so it can
//   run against MockBackendClient in tests
// - Camera mutations are write-through; facility mutations are local only
// - Persistence is an explicit load-at-init / save-after-mutation hook
// - Polling is a cancellable task owned by a PollerHandle

// Domain entity types
pub mod camera;
pub mod facility;
pub mod violation;

pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod persistence;
pub mod poller;
pub mod store;
pub mod timestamp;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use camera::{Camera, CameraPatch, CameraStatus, CameraStatusReport, ViolationType};
pub use client::{BackendClient, HttpBackendClient};
pub use config::ClientConfig;
pub use error::{ClientError, PersistenceError, Result, StoreError};
pub use facility::{Facility, FacilityPatch};
pub use forms::{CameraDraft, CameraForm, FacilityDraft, FacilityForm, FieldError, FormError};
pub use persistence::{JsonFileStore, KeyValueStore, StatePersistence, StoreSnapshot};
pub use poller::{PollState, PollerHandle, StatusPoller};
pub use store::{AppStore, FacilityRemoval, StoreSummary};
pub use violation::DetectionEvent;
