//! Script payload lifecycle: load local content, submit for remote
//! execution, persist the textual result.
//!
//! Execution failures never propagate past this boundary: the error display
//! string is captured as the outcome so the operator always sees feedback
//! in the result pane. The session cycles `Empty → Loaded → Executed`
//! freely for the life of the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fruitpunch_api::ApiClient;

use crate::error::Error;
use crate::inflight::Gate;

/// Extension required of local script files.
pub const SCRIPT_EXTENSION: &str = "smia";

/// Fixed name for saved execution output.
pub const OUTPUT_FILE_NAME: &str = "output.smia";

/// Operator-supplied script text, replaced wholesale on each load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPayload {
    pub file_name: String,
    pub content: String,
}

/// Where the session is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecState {
    #[default]
    Empty,
    Loaded,
    Executed,
}

/// Result of one execution call: either the service's output text, or the
/// captured failure text that stands in for it. The caller chooses how to
/// render each arm; both become the stored output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Completed(String),
    Failed(String),
}

impl ExecutionOutcome {
    /// The text shown in the result pane, whichever arm it is.
    pub fn text(&self) -> &str {
        match self {
            ExecutionOutcome::Completed(text) | ExecutionOutcome::Failed(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failed(_))
    }
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    content: &'a str,
}

/// The service and its front end disagree on the result field's casing, so
/// both spellings are accepted.
#[derive(Deserialize)]
struct ExecuteResponse {
    #[serde(rename = "Result", alias = "result")]
    result: String,
}

/// One script payload lifecycle. Lives for the process lifetime; a new
/// load resets the cycle.
#[derive(Default)]
pub struct ExecutionSession {
    payload: Option<ScriptPayload>,
    output_text: String,
    state: ExecState,
    gate: Gate,
}

impl ExecutionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a script payload from raw bytes, decoding them as text.
    ///
    /// Any text is accepted, including empty; invalid UTF-8 is replaced
    /// rather than rejected. Transitions to `Loaded`.
    pub fn load(&mut self, file_name: impl Into<String>, bytes: &[u8]) -> &ScriptPayload {
        let payload = ScriptPayload {
            file_name: file_name.into(),
            content: String::from_utf8_lossy(bytes).into_owned(),
        };
        debug!(file_name = %payload.file_name, bytes = bytes.len(), "script loaded");

        self.state = ExecState::Loaded;
        self.payload.insert(payload)
    }

    /// Load a script from a local file, enforcing the `.smia` extension
    /// filter before any bytes are read.
    pub fn load_path(&mut self, path: &Path) -> Result<&ScriptPayload, Error> {
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION));
        if !has_extension {
            return Err(Error::UnsupportedExtension(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)?;
        Ok(self.load(file_name, &bytes))
    }

    /// Submit the loaded payload to the execution endpoint.
    ///
    /// Transport and status failures are captured as a `Failed` outcome
    /// whose text embeds the error; either way the session transitions to
    /// `Executed` and the outcome text becomes the stored output. Fails
    /// only when nothing is loaded or an execution is already in flight.
    pub fn execute(&mut self, client: &ApiClient) -> Result<ExecutionOutcome, Error> {
        let payload = self.payload.as_ref().ok_or(Error::NothingLoaded)?;
        let _token = self.gate.begin("execute")?;

        let request = ExecuteRequest {
            content: &payload.content,
        };
        let outcome = match client.post::<_, ExecuteResponse>("execute", &request) {
            Ok(response) => ExecutionOutcome::Completed(response.result),
            Err(e) => {
                warn!(error = %e, "execution failed; capturing error as output");
                ExecutionOutcome::Failed(format!("Error: {}", e))
            }
        };

        self.output_text = outcome.text().to_string();
        self.state = ExecState::Executed;
        Ok(outcome)
    }

    /// The current output text. Empty until an execution stores a result.
    pub fn output_text(&self) -> &str {
        &self.output_text
    }

    /// Write the current output text to `output.smia` in `dir`.
    ///
    /// Never gated on execution having occurred: saving an empty output is
    /// a valid no-op producing an empty file. No remote interaction.
    pub fn save_output_to(&self, dir: &Path) -> Result<PathBuf, Error> {
        let target = dir.join(OUTPUT_FILE_NAME);
        fs::write(&target, self.output_text.as_bytes())?;
        debug!(target = %target.display(), bytes = self.output_text.len(), "output saved");
        Ok(target)
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// The currently loaded payload, if any.
    pub fn payload(&self) -> Option<&ScriptPayload> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let session = ExecutionSession::new();
        assert_eq!(session.state(), ExecState::Empty);
        assert!(session.payload().is_none());
        assert_eq!(session.output_text(), "");
    }

    #[test]
    fn load_transitions_and_replaces_wholesale() {
        let mut session = ExecutionSession::new();

        session.load("first.smia", b"mkdisk -size=10");
        assert_eq!(session.state(), ExecState::Loaded);

        let payload = session.load("second.smia", b"rmdisk");
        assert_eq!(payload.file_name, "second.smia");
        assert_eq!(payload.content, "rmdisk");
        assert_eq!(session.payload().unwrap().file_name, "second.smia");
    }

    #[test]
    fn load_accepts_empty_and_invalid_utf8() {
        let mut session = ExecutionSession::new();

        assert_eq!(session.load("empty.smia", b"").content, "");

        let payload = session.load("bad.smia", &[0x66, 0xff, 0x6f]);
        assert!(payload.content.contains('\u{FFFD}'));
    }

    #[test]
    fn load_path_rejects_wrong_extension() {
        let mut session = ExecutionSession::new();

        let result = session.load_path(Path::new("script.txt"));
        assert!(matches!(result, Err(Error::UnsupportedExtension(_))));
        assert_eq!(session.state(), ExecState::Empty);
    }

    #[test]
    fn load_path_reads_smia_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.smia");
        fs::write(&path, "mkdisk -size=5\nmount -path=/tmp/a.dsk").unwrap();

        let mut session = ExecutionSession::new();
        let payload = session.load_path(&path).unwrap();

        assert_eq!(payload.file_name, "setup.smia");
        assert!(payload.content.starts_with("mkdisk"));
    }

    #[test]
    fn execute_without_payload_is_error() {
        let mut session = ExecutionSession::new();
        let client = ApiClient::new("http://localhost:5000").unwrap();

        assert!(matches!(
            session.execute(&client),
            Err(Error::NothingLoaded)
        ));
        assert_eq!(session.state(), ExecState::Empty);
    }

    #[test]
    fn save_without_execute_produces_empty_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = ExecutionSession::new();
        session.load("noop.smia", b"pause");
        let target = session.save_output_to(dir.path()).unwrap();

        assert_eq!(target.file_name().unwrap(), OUTPUT_FILE_NAME);
        assert_eq!(fs::read(&target).unwrap(), b"");
    }

    #[test]
    fn save_writes_current_output() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = ExecutionSession::new();
        session.output_text = "disk created".to_string();
        let target = session.save_output_to(dir.path()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "disk created");
    }

    #[test]
    fn outcome_text_covers_both_arms() {
        assert_eq!(ExecutionOutcome::Completed("ok".into()).text(), "ok");
        let failed = ExecutionOutcome::Failed("Error: HTTP 500".into());
        assert_eq!(failed.text(), "Error: HTTP 500");
        assert!(failed.is_failure());
    }

    #[test]
    fn execute_response_accepts_both_spellings() {
        let upper: ExecuteResponse = serde_json::from_str(r#"{"Result": "done"}"#).unwrap();
        assert_eq!(upper.result, "done");

        let lower: ExecuteResponse = serde_json::from_str(r#"{"result": "done"}"#).unwrap();
        assert_eq!(lower.result, "done");
    }
}
