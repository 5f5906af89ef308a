//! JSONL file writer for model call audit entries.
//!
//! Each [`ModelLogEntry`] is serialized as a single JSON line and appended
//! to the file via a buffered writer.

use async_trait::async_trait;
use delib_application::{ModelLogError, ModelLogSink};
use delib_domain::ModelLogEntry;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Audit sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Existing files are appended to.
/// Flushes after every entry and on `Drop`.
pub struct JsonlModelLogWriter {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlModelLogWriter {
    /// Open (or create) the log file and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelLogError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Model call log: {}", path.display());

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ModelLogSink for JsonlModelLogWriter {
    async fn append(&self, experiment_id: &str, entry: &ModelLogEntry) -> Result<(), ModelLogError> {
        let mut record = serde_json::to_value(entry)?;
        if let Value::Object(map) = &mut record {
            map.insert(
                "experimentId".to_string(),
                Value::String(experiment_id.to_string()),
            );
        }
        let line = serde_json::to_string(&record)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ModelLogError::Store("model log writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlModelLogWriter {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use delib_domain::{ModelCallContext, ModelResponse};

    fn entry(id: &str, attempt: u32) -> ModelLogEntry {
        let context = ModelCallContext::new("exp-1", "Mediator reply")
            .with_cohort("c1")
            .with_stage("chat1");
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let mut entry = ModelLogEntry::for_attempt(id, &context, attempt, "USER: hi", created);
        entry.record_response(ModelResponse::ok("hello"), created, created);
        entry
    }

    #[tokio::test]
    async fn test_writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("model-calls.jsonl");
        let writer = JsonlModelLogWriter::open(&path).unwrap();

        writer.append("exp-1", &entry("log-a", 0)).await.unwrap();
        writer.append("exp-1", &entry("log-b", 1)).await.unwrap();

        // Flushed per entry: readable without dropping the writer
        let content = std::fs::read_to_string(writer.path()).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], "log-a");
        assert_eq!(lines[0]["experimentId"], "exp-1");
        assert_eq!(lines[0]["response"]["status"], "ok");
        assert_eq!(lines[1]["description"], "Mediator reply (retry 1)");
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model-calls.jsonl");

        {
            let writer = JsonlModelLogWriter::open(&path).unwrap();
            writer.append("exp-1", &entry("first", 0)).await.unwrap();
        }
        let writer = JsonlModelLogWriter::open(&path).unwrap();
        writer.append("exp-1", &entry("second", 0)).await.unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlModelLogWriter::open(dir.path()).is_err());
    }
}
