// Workflow commands: create a workflow for a file, fetch workflows, show
// per-task status and replace a workflow's spec.

use super::{read_json_file, Context};
use crate::error::{CliError, Result};
use crate::models::{decode, FileRecord, Workflow};
use crate::ui;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use tabled::Tabled;
use tracing::{info, warn};

/// Workflow-by-id lookups go through folder 0; the server resolves the
/// real folder.
const ANY_FOLDER: i64 = 0;

#[derive(Debug, Tabled)]
pub struct TaskRow {
    #[tabled(rename = "Task ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

/// One row per task, in the order the server listed them.
pub fn task_rows(workflow: &Workflow) -> Vec<TaskRow> {
    workflow
        .tasks()
        .iter()
        .map(|task| TaskRow {
            id: ui::cell(task.id),
            name: ui::cell(task.display_name.as_deref()),
            status: ui::cell(task.status_short.as_deref()),
        })
        .collect()
}

/// Create a workflow for `file_id`. The folder always comes from the file
/// record, never from the caller. Returns the new workflow id.
pub fn create<W: Write>(
    ctx: &Context,
    out: &mut W,
    file_id: i64,
    template_id: Option<i64>,
) -> Result<i64> {
    let file: FileRecord = ctx
        .api
        .get(&format!("/files/{file_id}"))?
        .into_success(format_args!("file {file_id}"))?
        .json()?;
    let folder_id = file
        .folder_id()
        .ok_or_else(|| CliError::Decode(format!("file {file_id} has no folder")))?;

    let body = json!({
        "folder_id": folder_id,
        "file_ids": [file_id],
        "template_id": template_id,
    });
    let created: Value = ctx
        .api
        .post_json(&format!("/folders/{folder_id}/workflows/"), &body)?
        .into_success(format_args!("workflow for file {file_id}"))?
        .json()?;
    let workflow_id = created
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| CliError::Decode("created workflow has no id".into()))?;

    info!(workflow_id, folder_id, file_id, "workflow created");
    writeln!(out, "Workflow ID: {workflow_id} in folder {folder_id}")?;
    Ok(workflow_id)
}

/// Print one workflow (by id) or every workflow in a folder. Exactly one
/// selector must be given.
pub fn get<W: Write>(
    ctx: &Context,
    out: &mut W,
    workflow_id: Option<i64>,
    folder_id: Option<i64>,
) -> Result<()> {
    let (path, what) = match (workflow_id, folder_id) {
        (Some(_), Some(_)) => {
            return Err(CliError::invalid_args(
                "--workflow-id and --folder-id are mutually exclusive",
            ))
        }
        (Some(id), None) => (
            format!("/folders/{ANY_FOLDER}/workflows/{id}"),
            format!("workflow {id}"),
        ),
        (None, Some(id)) => (
            format!("/folders/{id}/workflows/workflows"),
            format!("workflows of folder {id}"),
        ),
        (None, None) => {
            return Err(CliError::invalid_args(
                "--workflow-id or --folder-id is required",
            ))
        }
    };

    let value: Value = ctx.api.get(&path)?.into_success(what)?.json()?;
    ui::write_json(out, &value, true)
}

/// Print the workflow name followed by its tasks as a table, or the raw
/// workflow object when `raw` is set.
pub fn status<W: Write>(ctx: &Context, out: &mut W, workflow_id: i64, raw: bool) -> Result<()> {
    let value: Value = ctx
        .api
        .get(&format!("/folders/{ANY_FOLDER}/workflows/{workflow_id}"))?
        .into_success(format_args!("workflow {workflow_id}"))?
        .json()?;
    let workflow: Workflow = decode(&value)?;

    writeln!(out, "Name: {}", ui::cell(workflow.display_name.as_deref()))?;
    if raw {
        ui::write_json(out, &value, true)
    } else {
        ui::write_table(out, None, task_rows(&workflow), ctx.color)
    }
}

/// Replace a workflow's `spec_json` with the contents of `spec_path`.
///
/// The file must parse as JSON; its text is sent as-is. The workflow is
/// written back to the folder recorded on the fetched workflow, which
/// overrides `folder_id` when the two disagree.
pub fn update<W: Write>(
    ctx: &Context,
    out: &mut W,
    workflow_id: i64,
    folder_id: i64,
    spec_path: &Path,
) -> Result<()> {
    let spec = read_json_file(spec_path)?;

    let mut workflow: Value = ctx
        .api
        .get(&format!("/folders/{folder_id}/workflows/{workflow_id}"))?
        .into_success(format_args!("workflow {workflow_id}"))?
        .json()?;
    let resolved_folder = decode::<Workflow>(&workflow)?
        .folder_id()
        .ok_or_else(|| CliError::Decode(format!("workflow {workflow_id} has no folder")))?;
    if resolved_folder != folder_id {
        warn!(
            "workflow {workflow_id} lives in folder {resolved_folder}, not {folder_id}; \
             updating it there"
        );
    }

    workflow
        .as_object_mut()
        .ok_or_else(|| CliError::Decode(format!("workflow {workflow_id} is not an object")))?
        .insert("spec_json".into(), Value::String(spec));

    ctx.api
        .patch_json(
            &format!("/folders/{resolved_folder}/workflows/{workflow_id}"),
            &workflow,
        )?
        .into_success(format_args!("update of workflow {workflow_id}"))?;
    writeln!(out, "Workflow {workflow_id} updated in folder {resolved_folder}")?;
    Ok(())
}
