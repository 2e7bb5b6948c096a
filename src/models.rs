// Typed views of the server's resources. Only the fields the commands
// read are modeled; everything else stays in the raw `serde_json::Value`
// that raw output and write-backs use. Every field is optional so a
// missing key renders as an empty cell instead of failing the command.

use crate::error::{CliError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Reference to an owning folder, as nested in files and workflows.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FolderRef {
    pub id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Folder {
    pub id: Option<i64>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub workflows: Option<Vec<WorkflowSummary>>,
}

/// A workflow as listed inside a folder.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct WorkflowSummary {
    pub id: Option<i64>,
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: Option<i64>,
    pub display_name: Option<String>,
    pub filesize: Option<i64>,
    pub data_type: Option<String>,
    pub magic_mime: Option<String>,
    #[serde(default)]
    pub folder: Option<FolderRef>,
}

impl FileRecord {
    pub fn folder_id(&self) -> Option<i64> {
        self.folder.as_ref().and_then(|f| f.id)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Workflow {
    pub id: Option<i64>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub folder: Option<FolderRef>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl Workflow {
    pub fn folder_id(&self) -> Option<i64> {
        self.folder.as_ref().and_then(|f| f.id)
    }

    /// Tasks in server order; a null or absent list is empty.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Task {
    pub id: Option<i64>,
    pub display_name: Option<String>,
    pub status_short: Option<String>,
}

/// Decode a typed view from an already parsed response.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| CliError::Decode(e.to_string()))
}
