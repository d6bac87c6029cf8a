// Facility and camera forms
//
// Drafts hold raw user input. `validate` turns a draft into typed values;
// the form controllers run validation, build the record (fresh id on create,
// existing id on edit) and hand it to the store.
//
// A controller accepts one submission at a time. The submitting flag is
// cleared by a guard, so it resets on success, validation failure and store
// failure alike.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::camera::{Camera, CameraPatch, CameraStatus, ViolationType};
use crate::error::StoreError;
use crate::facility::{Facility, FacilityPatch};
use crate::store::AppStore;

/// Four dot-separated groups of 1-3 digits. Groups are not range-checked.
const IPV4_SHAPE: &str = r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$";
const PORT_SHAPE: &str = r"^[0-9]{1,5}$";

fn ipv4_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IPV4_SHAPE).expect("valid IPv4 pattern"))
}

fn port_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PORT_SHAPE).expect("valid port pattern"))
}

/// Whether `value` looks like a dotted-quad address
pub fn is_ipv4_shaped(value: &str) -> bool {
    ipv4_shape().is_match(value)
}

/// Parse a 1-5 digit port string into a port number
pub fn parse_port(value: &str) -> Result<u16, FieldError> {
    if !port_shape().is_match(value) {
        return Err(FieldError::new("port", "Port must be 1 to 5 digits"));
    }
    value
        .parse::<u16>()
        .map_err(|_| FieldError::new("port", "Port must be between 0 and 65535"))
}

/// A validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid input: {}", join_fields(.0))]
    Invalid(Vec<FieldError>),

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    /// Store failure, surfaced verbatim
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FormError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            FormError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

// ============================================================================
// Submission guard
// ============================================================================

struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, FormError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FormError::AlreadySubmitting)?;
        Ok(Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Facility form
// ============================================================================

/// Raw facility form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityDraft {
    pub name: String,
    pub address: String,
}

impl FacilityDraft {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Prefill from an existing facility
    pub fn from_facility(facility: &Facility) -> Self {
        Self::new(facility.name.clone(), facility.address.clone())
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name, "Facility name is required");
        required(&mut errors, "address", &self.address, "Address is required");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FormError::Invalid(errors))
        }
    }
}

/// Create or edit a facility
#[derive(Debug, Default)]
pub struct FacilityForm {
    edit_id: Option<Uuid>,
    submitting: AtomicBool,
}

impl FacilityForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: Uuid) -> Self {
        Self {
            edit_id: Some(id),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn edit_id(&self) -> Option<Uuid> {
        self.edit_id
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate and save. On edit the id and `created_at` are kept.
    pub fn submit(&self, store: &AppStore, draft: &FacilityDraft) -> Result<Facility, FormError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        draft.validate()?;

        match self.edit_id {
            Some(id) => {
                let patch = FacilityPatch {
                    name: Some(draft.name.clone()),
                    address: Some(draft.address.clone()),
                };
                store
                    .update_facility(id, &patch)
                    .ok_or(FormError::Store(StoreError::FacilityNotFound(id)))
            }
            None => {
                let facility = Facility {
                    id: Uuid::now_v7(),
                    name: draft.name.clone(),
                    address: draft.address.clone(),
                    created_at: Utc::now(),
                };
                Ok(store.add_facility(facility)?)
            }
        }
    }
}

// ============================================================================
// Camera form
// ============================================================================

/// Raw camera form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraDraft {
    pub facility_id: Option<Uuid>,
    pub name: String,
    pub ip_address: String,
    pub port: String,
    pub monitored_violations: BTreeSet<ViolationType>,
}

/// Camera form input after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCamera {
    pub facility_id: Uuid,
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    pub monitored_violations: BTreeSet<ViolationType>,
}

impl CameraDraft {
    /// Empty draft, optionally with a facility already selected
    pub fn for_facility(facility_id: Option<Uuid>) -> Self {
        Self {
            facility_id,
            ..Default::default()
        }
    }

    /// Prefill from an existing camera
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            facility_id: Some(camera.facility_id),
            name: camera.name.clone(),
            ip_address: camera.ip_address.clone(),
            port: camera.port.to_string(),
            monitored_violations: camera.monitored_violations.clone(),
        }
    }

    /// Add the violation type if absent, remove it if present
    pub fn toggle_violation(&mut self, violation: ViolationType) {
        if !self.monitored_violations.remove(&violation) {
            self.monitored_violations.insert(violation);
        }
    }

    pub fn validate(&self) -> Result<ValidCamera, FormError> {
        let mut errors = Vec::new();

        if self.facility_id.is_none() {
            errors.push(FieldError::new("facilityId", "Select a facility"));
        }
        required(&mut errors, "name", &self.name, "Camera name is required");
        if !is_ipv4_shaped(&self.ip_address) {
            errors.push(FieldError::new(
                "ipAddress",
                "IP address must look like 192.168.1.1",
            ));
        }
        let port = parse_port(&self.port).map_err(|e| errors.push(e)).ok();

        match (self.facility_id, port) {
            (Some(facility_id), Some(port)) if errors.is_empty() => Ok(ValidCamera {
                facility_id,
                name: self.name.clone(),
                ip_address: self.ip_address.clone(),
                port,
                monitored_violations: self.monitored_violations.clone(),
            }),
            _ => Err(FormError::Invalid(errors)),
        }
    }
}

/// Create or edit a camera
#[derive(Debug, Default)]
pub struct CameraForm {
    edit_id: Option<Uuid>,
    submitting: AtomicBool,
}

impl CameraForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: Uuid) -> Self {
        Self {
            edit_id: Some(id),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn edit_id(&self) -> Option<Uuid> {
        self.edit_id
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate and save through the store; returns the camera id
    ///
    /// Edits send every form field but never `status`.
    pub async fn submit(&self, store: &AppStore, draft: &CameraDraft) -> Result<Uuid, FormError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let valid = draft.validate()?;

        match self.edit_id {
            Some(id) => {
                let patch = CameraPatch {
                    facility_id: Some(valid.facility_id),
                    name: Some(valid.name),
                    ip_address: Some(valid.ip_address),
                    port: Some(valid.port),
                    monitored_violations: Some(valid.monitored_violations),
                };
                store.update_camera(id, patch).await?;
                Ok(id)
            }
            None => {
                let camera = Camera {
                    id: Uuid::now_v7(),
                    facility_id: valid.facility_id,
                    name: valid.name,
                    ip_address: valid.ip_address,
                    port: valid.port,
                    status: CameraStatus::Active,
                    monitored_violations: valid.monitored_violations,
                    last_checked: None,
                };
                Ok(store.add_camera(camera).await?.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_shape_is_loose_on_group_range() {
        assert!(is_ipv4_shaped("10.0.0.5"));
        assert!(is_ipv4_shaped("999.1.1.1"));
        assert!(!is_ipv4_shaped("1.1.1"));
        assert!(!is_ipv4_shaped("1.1.1.1.1"));
        assert!(!is_ipv4_shaped("1234.1.1.1"));
        assert!(!is_ipv4_shaped("a.b.c.d"));
        assert!(!is_ipv4_shaped(""));
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port("0").unwrap(), 0);
        assert_eq!(parse_port("65535").unwrap(), 65535);
        assert!(parse_port("65536").is_err());
        assert!(parse_port("123456").is_err());
        assert!(parse_port("80a").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn test_facility_draft_requires_name_and_address() {
        let err = FacilityDraft::new("  ", "").validate().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "address"]);

        assert!(FacilityDraft::new("Plant A", "1 Main St").validate().is_ok());
    }

    #[test]
    fn test_camera_draft_validation() {
        let facility_id = Uuid::now_v7();
        let mut draft = CameraDraft::for_facility(Some(facility_id));
        draft.name = "Gate".to_string();
        draft.ip_address = "10.0.0.5".to_string();
        draft.port = "8080".to_string();

        let valid = draft.validate().unwrap();
        assert_eq!(valid.facility_id, facility_id);
        assert_eq!(valid.port, 8080);

        draft.ip_address = "1.1.1".to_string();
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "ipAddress");
    }

    #[test]
    fn test_camera_draft_reports_every_invalid_field() {
        let err = CameraDraft::default().validate().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["facilityId", "name", "ipAddress", "port"]);
    }

    #[test]
    fn test_toggle_violation() {
        let mut draft = CameraDraft::default();
        draft.toggle_violation(ViolationType::NoHelmet);
        draft.toggle_violation(ViolationType::NoVest);
        draft.toggle_violation(ViolationType::NoHelmet);
        assert_eq!(
            draft.monitored_violations.into_iter().collect::<Vec<_>>(),
            vec![ViolationType::NoVest]
        );
    }

    #[test]
    fn test_draft_prefill_from_camera() {
        let camera = Camera::new(Uuid::now_v7(), "Gate", "10.0.0.5", 554)
            .with_violations([ViolationType::NoGloves]);
        let draft = CameraDraft::from_camera(&camera);
        assert_eq!(draft.port, "554");
        assert_eq!(draft.facility_id, Some(camera.facility_id));
        assert!(draft.monitored_violations.contains(&ViolationType::NoGloves));
    }

    #[test]
    fn test_submit_guard_rejects_reentry_and_resets() {
        let flag = AtomicBool::new(false);
        {
            let _guard = SubmitGuard::acquire(&flag).unwrap();
            assert!(matches!(
                SubmitGuard::acquire(&flag),
                Err(FormError::AlreadySubmitting)
            ));
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(SubmitGuard::acquire(&flag).is_ok());
    }
}
