use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::REMOTE_FILE_ROOT;

/// JSON body POSTed to `code/execute`.
#[derive(Serialize, Debug)]
pub(crate) struct ExecuteRequest {
    pub(crate) properties: ExecuteProperties,
}

impl ExecuteRequest {
    pub(crate) fn inline_synchronous(code: String) -> Self {
        Self {
            properties: ExecuteProperties {
                code_input_type: CodeInputType::Inline,
                execution_type: ExecutionType::Synchronous,
                code,
            },
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteProperties {
    pub(crate) code_input_type: CodeInputType,
    pub(crate) execution_type: ExecutionType,
    pub(crate) code: String,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CodeInputType {
    Inline,
}

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExecutionType {
    Synchronous,
}

/// Envelope around a successful `code/execute` response.
#[derive(Deserialize, Debug)]
pub(crate) struct ExecuteResponse {
    pub(crate) properties: ExecutionResult,
}

/// Outcome of one synchronous execution in the sandbox.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    #[serde(default)]
    pub result: Option<ExecutionOutcome>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

/// The `result` field of an execution: a recognized structured payload, or
/// any other JSON value the sandbox decided to return.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ExecutionOutcome {
    Typed(TypedOutcome),
    Value(JsonValue),
}

impl ExecutionOutcome {
    /// Drops any inline binary payload so summarized output stays small.
    pub fn strip_binary_payload(&mut self) {
        if let Self::Typed(TypedOutcome::Image { base64_data, .. }) = self {
            *base64_data = None;
        }
    }
}

/// Structured results the sandbox discriminates with a `type` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypedOutcome {
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base64_data: Option<String>,
        #[serde(flatten)]
        extra: serde_json::Map<String, JsonValue>,
    },
}

/// Listing envelope shared by `files/upload` and `files`.
#[derive(Deserialize, Debug)]
pub(crate) struct FileListResponse {
    #[serde(default)]
    pub(crate) value: Vec<RemoteFileEntry>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RemoteFileEntry {
    pub(crate) properties: RemoteFileMetadata,
}

/// Metadata the service reports for a file stored in the session. Only ever
/// constructed by deserializing server responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileMetadata {
    pub filename: String,
    #[serde(rename = "size")]
    pub size_in_bytes: u64,
}

impl RemoteFileMetadata {
    /// Absolute path of the file inside the session sandbox.
    pub fn full_path(&self) -> String {
        format!("{REMOTE_FILE_ROOT}{}", self.filename)
    }
}
