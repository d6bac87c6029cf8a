// Facility domain types
//
// A facility is a physical site that owns cameras. Facilities have no
// backend persistence; they only live in the local store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A monitored site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Facility {
    /// Create a facility with a fresh id and the current time as `created_at`
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            address: address.into(),
            created_at: Utc::now(),
        }
    }

    /// Merge a partial update into this facility
    pub fn apply(&mut self, patch: &FacilityPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
    }
}

/// Partial facility update. `id` and `created_at` are never patched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FacilityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl FacilityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_unpatched_fields() {
        let mut facility = Facility::new("Plant A", "1 Main St");
        let created_at = facility.created_at;
        let id = facility.id;

        facility.apply(&FacilityPatch {
            name: Some("Plant B".to_string()),
            address: None,
        });

        assert_eq!(facility.name, "Plant B");
        assert_eq!(facility.address, "1 Main St");
        assert_eq!(facility.created_at, created_at);
        assert_eq!(facility.id, id);
    }

    #[test]
    fn test_serializes_camel_case() {
        let facility = Facility::new("Plant A", "1 Main St");
        let value = serde_json::to_value(&facility).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
