//! Dataset loader with per-source error reporting.

use std::fs;
use std::path::{Path, PathBuf};

use portcullis_types::{ContextDocument, ContextSnapshot, Datasets, PolicySet, SubjectDirectory};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::LoadError;

/// Default path of the policy document.
pub const DEFAULT_POLICY_FILE: &str = "policies.json";
/// Default path of the subject directory document.
pub const DEFAULT_SUBJECT_FILE: &str = "users.json";
/// Default path of the context document.
pub const DEFAULT_CONTEXT_FILE: &str = "context.json";

/// Loads the three dataset documents from disk.
pub struct DatasetLoader {
    policy_path: PathBuf,
    subject_path: PathBuf,
    context_path: PathBuf,
}

impl DatasetLoader {
    /// Creates a loader with the default file names in the current directory.
    pub fn new() -> Self {
        Self {
            policy_path: PathBuf::from(DEFAULT_POLICY_FILE),
            subject_path: PathBuf::from(DEFAULT_SUBJECT_FILE),
            context_path: PathBuf::from(DEFAULT_CONTEXT_FILE),
        }
    }

    /// Sets the policy document path.
    pub fn with_policy_path(mut self, path: impl AsRef<Path>) -> Self {
        self.policy_path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the subject directory document path.
    pub fn with_subject_path(mut self, path: impl AsRef<Path>) -> Self {
        self.subject_path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the context document path.
    pub fn with_context_path(mut self, path: impl AsRef<Path>) -> Self {
        self.context_path = path.as_ref().to_path_buf();
        self
    }

    /// Loads all three datasets, tolerating per-source failures.
    ///
    /// A source that fails to read or parse is logged and left as `None`
    /// in the returned bundle; the engine then refuses to evaluate with an
    /// explicit data-unavailable error instead of a silent deny.
    pub fn load(&self) -> Datasets {
        Datasets {
            policies: self.load_policies().map_err(log_failure).ok(),
            subjects: self.load_subjects().map_err(log_failure).ok(),
            context: self.load_context().map_err(log_failure).ok(),
        }
    }

    /// Loads the policy document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or parsed.
    pub fn load_policies(&self) -> Result<PolicySet, LoadError> {
        let set: PolicySet = read_json(&self.policy_path)?;
        info!(
            path = %self.policy_path.display(),
            count = set.policies.len(),
            "loaded policy set"
        );
        Ok(set)
    }

    /// Loads the subject directory document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or parsed.
    pub fn load_subjects(&self) -> Result<SubjectDirectory, LoadError> {
        let directory: SubjectDirectory = read_json(&self.subject_path)?;
        info!(
            path = %self.subject_path.display(),
            count = directory.users.len(),
            "loaded subject directory"
        );
        Ok(directory)
    }

    /// Loads the context document and unwraps its envelope.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file cannot be read or parsed.
    pub fn load_context(&self) -> Result<ContextSnapshot, LoadError> {
        let document: ContextDocument = read_json(&self.context_path)?;
        info!(path = %self.context_path.display(), "loaded context snapshot");
        Ok(document.context)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn log_failure(err: LoadError) -> LoadError {
    error!(error = %err, "dataset failed to load");
    err
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const POLICIES: &str = r#"{
        "policies": [
            {
                "name": "Policy 1",
                "status": "enabled",
                "users": ["user1"],
                "conditions": {
                    "time": { "start_time": "08:00", "end_time": "18:00" },
                    "location": ["USA"],
                    "device_health": "compliant"
                },
                "grant_controls": { "access": "grant" }
            }
        ]
    }"#;

    const USERS: &str = r#"{
        "users": [
            { "id": "user1", "name": "John Doe" },
            { "id": "user2", "name": "Jane Smith" }
        ]
    }"#;

    const CONTEXT: &str = r#"{
        "context": { "location": "USA", "device_health": "compliant" }
    }"#;

    fn loader_for(dir: &Path) -> DatasetLoader {
        DatasetLoader::new()
            .with_policy_path(dir.join("policies.json"))
            .with_subject_path(dir.join("users.json"))
            .with_context_path(dir.join("context.json"))
    }

    #[test]
    fn loads_all_three_documents() {
        let temp = tempdir().expect("create temp dir");
        fs::write(temp.path().join("policies.json"), POLICIES).unwrap();
        fs::write(temp.path().join("users.json"), USERS).unwrap();
        fs::write(temp.path().join("context.json"), CONTEXT).unwrap();

        let datasets = loader_for(temp.path()).load();
        assert_eq!(datasets.missing(), None);

        let policies = datasets.policies.unwrap();
        assert_eq!(policies.policies.len(), 1);
        assert_eq!(policies.policies[0].name, "Policy 1");

        let subjects = datasets.subjects.unwrap();
        assert!(subjects.find("user2").is_some());

        let context = datasets.context.unwrap();
        assert_eq!(context.location.as_deref(), Some("USA"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = tempdir().expect("create temp dir");
        let loader = loader_for(temp.path());

        match loader.load_policies() {
            Err(LoadError::Read { path, .. }) => {
                assert!(path.ends_with("policies.json"));
            }
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let temp = tempdir().expect("create temp dir");
        fs::write(temp.path().join("users.json"), "{ not json").unwrap();

        let loader = loader_for(temp.path());
        assert!(matches!(
            loader.load_subjects(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn missing_top_level_key_is_a_parse_error() {
        let temp = tempdir().expect("create temp dir");
        // A context document without the "context" envelope is structurally
        // invalid, not an empty snapshot.
        fs::write(temp.path().join("context.json"), r#"{ "location": "USA" }"#).unwrap();

        let loader = loader_for(temp.path());
        assert!(matches!(
            loader.load_context(),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn lenient_load_records_the_gap() {
        let temp = tempdir().expect("create temp dir");
        fs::write(temp.path().join("policies.json"), POLICIES).unwrap();
        fs::write(temp.path().join("context.json"), CONTEXT).unwrap();
        // users.json intentionally absent

        let datasets = loader_for(temp.path()).load();
        assert!(datasets.policies.is_some());
        assert!(datasets.subjects.is_none());
        assert!(datasets.context.is_some());
        assert_eq!(
            datasets.missing(),
            Some(portcullis_types::Dataset::Subjects)
        );
    }
}
