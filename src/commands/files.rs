// File commands: list a folder's files, stream one file to stdout and
// upload a local file into a folder.

use super::Context;
use crate::error::{CliError, Result};
use crate::models::{decode, FileRecord};
use crate::ui;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

#[derive(Debug, Tabled)]
pub struct FileRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Filename")]
    pub filename: String,
    #[tabled(rename = "Size")]
    pub size: String,
    #[tabled(rename = "Datatype")]
    pub data_type: String,
    #[tabled(rename = "Mimetype")]
    pub mime: String,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        FileRow {
            id: ui::cell(file.id),
            filename: ui::cell(file.display_name.as_deref()),
            size: ui::cell(file.filesize),
            data_type: ui::cell(file.data_type.as_deref()),
            mime: ui::cell(file.magic_mime.as_deref()),
        }
    }
}

/// List the files in `folder_id` as a table, or raw JSON.
pub fn get<W: Write>(ctx: &Context, out: &mut W, folder_id: Option<i64>, raw: bool) -> Result<()> {
    let folder_id = folder_id.ok_or_else(|| CliError::invalid_args("--folder-id is required"))?;

    let value: Value = ctx
        .api
        .get(&format!("/folders/{folder_id}/files/"))?
        .into_success(format_args!("files of folder {folder_id}"))?
        .json()?;
    if raw {
        return ui::write_json(out, &value, true);
    }

    let files: Vec<FileRecord> = decode(&value)?;
    let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
    ui::write_table(out, None, rows, ctx.color)
}

/// Write the file's bytes to `out` exactly as served.
pub fn download<W: Write>(ctx: &Context, out: &mut W, file_id: i64) -> Result<u64> {
    let written = ctx
        .api
        .download(&format!("/files/{file_id}/download"), &mut *out)?;
    out.flush()?;
    info!(file_id, bytes = written, "file downloaded");
    Ok(written)
}

/// Upload `file_path` into `folder_id` and print the new file id.
pub fn upload<W: Write>(
    ctx: &Context,
    out: &mut W,
    file_path: &Path,
    folder_id: i64,
) -> Result<i64> {
    let file_id = ctx.api.upload_file(file_path, folder_id)?;
    info!(file_id, folder_id, path = %file_path.display(), "file uploaded");
    writeln!(out, "File ID: {file_id}")?;
    Ok(file_id)
}
