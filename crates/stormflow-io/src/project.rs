//! Project descriptor persisted as pretty-printed JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::IoError;

/// Name recorded in new descriptors.
pub const PROGRAM_NAME: &str = "stormflow";

/// Identifies a design project and records free-form settings alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub program: String,
    pub status: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ProjectDescriptor {
    /// New descriptor stamped with the current time.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            program: PROGRAM_NAME.to_string(),
            status: status.into(),
            saved_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Write as pretty JSON, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Json`] or [`IoError::WriteFile`].
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| IoError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(status = %self.status, "project saved");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] or [`IoError::Json`] for malformed content.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, IoError> {
        let text = fs::read_to_string(path).map_err(|e| IoError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| IoError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        let project = ProjectDescriptor::new("draft")
            .with_metadata("catchment", "north basin")
            .with_metadata("area_ha", "50");
        project.save(&path).unwrap();
        let loaded = ProjectDescriptor::load(&path).unwrap();
        assert_eq!(loaded, project);
        assert_eq!(loaded.program, PROGRAM_NAME);
    }

    #[test]
    fn missing_metadata_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        fs::write(
            &path,
            r#"{"program":"stormflow","status":"ok","saved_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(ProjectDescriptor::load(&path).unwrap().metadata.is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(ProjectDescriptor::load(&path), Err(IoError::Json { .. })));
    }
}
