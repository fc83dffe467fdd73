//! Answer set loaded from a local file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use super::{decode_records, KnowledgeBaseLookup, KnowledgeRecord, LookupError};

/// Knowledge base held in memory.
///
/// Every query returns the full answer set; selection is left to the matcher.
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledgeBase {
    records: Vec<KnowledgeRecord>,
    source_path: Option<PathBuf>,
}

impl StaticKnowledgeBase {
    pub fn new(records: Vec<KnowledgeRecord>) -> Self {
        Self {
            records,
            source_path: None,
        }
    }

    /// Load an answer set from JSON, YAML or TOML, chosen by file extension.
    ///
    /// The file holds either a bare list of records or a `records` list at
    /// the top level (the only form TOML allows). Malformed entries are
    /// skipped.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let value: serde_json::Value = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| LookupError::Parse(format!("TOML: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| LookupError::Parse(format!("YAML: {}", e)))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| LookupError::Parse(format!("JSON: {}", e)))?,
        };

        let value = match value {
            serde_json::Value::Object(mut map) if map.contains_key("records") => {
                map.remove("records").unwrap_or_default()
            }
            other => other,
        };

        let records = decode_records(value)?;
        info!(
            "Loaded {} knowledge records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            records,
            source_path: Some(path.to_path_buf()),
        })
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    /// File the records were loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[async_trait]
impl KnowledgeBaseLookup for StaticKnowledgeBase {
    fn name(&self) -> &str {
        "file"
    }

    async fn query(&self, _text: &str) -> Result<Vec<KnowledgeRecord>, LookupError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_json_array() {
        let (_dir, path) = write_fixture(
            "answers.json",
            r#"[{"user": "cannot access iqc webservice", "answer": "Restart the IQC service."}]"#,
        );
        let kb = StaticKnowledgeBase::load(&path).unwrap();
        assert_eq!(kb.records().len(), 1);
        assert_eq!(kb.records()[0].answer, "Restart the IQC service.");
        assert_eq!(kb.source_path(), Some(path.as_path()));
    }

    #[test]
    fn test_load_yaml_records_key() {
        let (_dir, path) = write_fixture(
            "answers.yaml",
            "records:\n  - question: printer offline\n    answer: Check the cable.\n  - question: no answer\n",
        );
        let kb = StaticKnowledgeBase::load(&path).unwrap();
        assert_eq!(
            kb.records(),
            &[KnowledgeRecord::new("printer offline", "Check the cable.")]
        );
    }

    #[test]
    fn test_load_toml() {
        let (_dir, path) = write_fixture(
            "answers.toml",
            "[[records]]\nuser = \"disk full\"\nanswer = \"Free some space.\"\n",
        );
        let kb = StaticKnowledgeBase::load(&path).unwrap();
        assert_eq!(
            kb.records(),
            &[KnowledgeRecord::new("disk full", "Free some space.")]
        );
    }

    #[test]
    fn test_load_invalid_file() {
        let (_dir, path) = write_fixture("answers.json", "{ not json");
        assert!(matches!(
            StaticKnowledgeBase::load(&path),
            Err(LookupError::Parse(_))
        ));

        let (_dir, path) = write_fixture("answers.json", r#"{"answers": []}"#);
        assert!(matches!(
            StaticKnowledgeBase::load(&path),
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = StaticKnowledgeBase::load(Path::new("/nonexistent/answers.json"));
        assert!(matches!(result, Err(LookupError::Io(_))));
    }

    #[tokio::test]
    async fn test_query_returns_all_records() {
        let kb = StaticKnowledgeBase::new(vec![
            KnowledgeRecord::new("a", "1"),
            KnowledgeRecord::new("b", "2"),
        ]);
        assert_eq!(kb.query("anything").await.unwrap().len(), 2);
    }
}
