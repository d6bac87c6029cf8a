// Camera domain types
//
// A camera belongs to exactly one facility. Its status is owned by the
// backend: it is forced to `active` on creation and afterwards only changes
// when a status report comes back from polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Liveness of a camera as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    #[default]
    Active,
    Inactive,
}

impl CameraStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CameraStatus::Active => "Active",
            CameraStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CameraStatus::Active)
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraStatus::Active => write!(f, "active"),
            CameraStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Safety violation classes the detector can report
///
/// Unknown classes coming back from the detector are kept verbatim in
/// `Other` so one unexpected record does not fail a whole list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViolationType {
    NoHelmet,
    NoVest,
    NoGloves,
    Other(String),
}

impl ViolationType {
    /// The violation types a camera can be configured to watch for
    pub const MONITORABLE: [ViolationType; 3] = [
        ViolationType::NoHelmet,
        ViolationType::NoVest,
        ViolationType::NoGloves,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ViolationType::NoHelmet => "no_helmet",
            ViolationType::NoVest => "no_vest",
            ViolationType::NoGloves => "no_gloves",
            ViolationType::Other(other) => other,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ViolationType::NoHelmet => "No Helmet",
            ViolationType::NoVest => "No Vest",
            ViolationType::NoGloves => "No Gloves",
            ViolationType::Other(other) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ViolationType::Other(_))
    }
}

impl From<String> for ViolationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "no_helmet" => ViolationType::NoHelmet,
            "no_vest" => ViolationType::NoVest,
            "no_gloves" => ViolationType::NoGloves,
            _ => ViolationType::Other(s),
        }
    }
}

impl From<&str> for ViolationType {
    fn from(s: &str) -> Self {
        ViolationType::from(s.to_string())
    }
}

impl From<ViolationType> for String {
    fn from(v: ViolationType) -> Self {
        match v {
            ViolationType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered camera
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    #[serde(default)]
    pub status: CameraStatus,
    #[serde(default)]
    pub monitored_violations: BTreeSet<ViolationType>,
    /// Time of the last status report applied to this camera
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Camera {
    /// Create a camera with a fresh id. New cameras always start active.
    pub fn new(
        facility_id: Uuid,
        name: impl Into<String>,
        ip_address: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            facility_id,
            name: name.into(),
            ip_address: ip_address.into(),
            port,
            status: CameraStatus::Active,
            monitored_violations: BTreeSet::new(),
            last_checked: None,
        }
    }

    pub fn with_violations(mut self, violations: impl IntoIterator<Item = ViolationType>) -> Self {
        self.monitored_violations = violations.into_iter().collect();
        self
    }

    /// `ip:port` as shown on camera cards
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    /// Merge a partial update into this camera
    pub fn apply(&mut self, patch: &CameraPatch) {
        if let Some(facility_id) = patch.facility_id {
            self.facility_id = facility_id;
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(ip_address) = &patch.ip_address {
            self.ip_address = ip_address.clone();
        }
        if let Some(port) = patch.port {
            self.port = port;
        }
        if let Some(violations) = &patch.monitored_violations {
            self.monitored_violations = violations.clone();
        }
    }
}

/// Partial camera update sent with `PUT /cameras/:id`
///
/// There is no `status` field: status is never edited from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CameraPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored_violations: Option<BTreeSet<ViolationType>>,
}

impl CameraPatch {
    pub fn is_empty(&self) -> bool {
        self.facility_id.is_none()
            && self.name.is_none()
            && self.ip_address.is_none()
            && self.port.is_none()
            && self.monitored_violations.is_none()
    }
}

/// Point-in-time liveness probe result from `GET /cameras/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CameraStatusReport {
    pub status: CameraStatus,
    #[serde(with = "crate::timestamp")]
    pub last_checked: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
