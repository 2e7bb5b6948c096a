// Resource commands. Each submodule maps one resource's subcommands to
// calls on the `Gateway` and writes the result through `ui`. Handlers get
// their collaborators through `Context` and an explicit output writer so
// nothing depends on process-wide state.

pub mod files;
pub mod folder;
pub mod template;
pub mod workflow;

use crate::api::Gateway;
use crate::cli::{Command, FilesCommand, FolderCommand, TemplateCommand, WorkflowCommand};
use crate::error::{CliError, Result};
use std::io::Write;
use std::path::Path;

/// What a handler needs besides its arguments.
pub struct Context<'a> {
    pub api: &'a dyn Gateway,
    /// Style table titles for an interactive terminal.
    pub color: bool,
    /// An operator is present to answer confirmation prompts.
    pub interactive: bool,
}

impl<'a> Context<'a> {
    /// A context that never prompts.
    pub fn new(api: &'a dyn Gateway, color: bool) -> Self {
        Context {
            api,
            color,
            interactive: false,
        }
    }

    pub fn with_prompts(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Run one parsed command.
pub fn run<W: Write>(ctx: &Context, out: &mut W, command: Command) -> Result<()> {
    match command {
        Command::Workflow { command } => match command {
            WorkflowCommand::Create {
                file_id,
                template_id,
            } => workflow::create(ctx, out, file_id, template_id).map(drop),
            WorkflowCommand::Get {
                folder_id,
                workflow_id,
            } => workflow::get(ctx, out, workflow_id, folder_id),
            WorkflowCommand::Status { workflow_id, raw } => {
                workflow::status(ctx, out, workflow_id, raw)
            }
            WorkflowCommand::Update {
                workflow_id,
                folder_id,
                file,
            } => workflow::update(ctx, out, workflow_id, folder_id, &file),
        },
        Command::Template { command } => match command {
            TemplateCommand::Get { id, nice } => template::get(ctx, out, id, nice),
            TemplateCommand::Delete { template_id, yes } => {
                template::delete(ctx, out, template_id, yes).map(drop)
            }
            TemplateCommand::Update {
                template_id,
                file_path,
            } => template::update(ctx, out, template_id, &file_path),
        },
        Command::Folder { command } => match command {
            FolderCommand::Get { folder_id, raw } => folder::get(ctx, out, folder_id, raw),
        },
        Command::Files { command } => match command {
            FilesCommand::Get { folder_id, raw } => files::get(ctx, out, folder_id, raw),
            FilesCommand::Download { file_id } => files::download(ctx, out, file_id).map(drop),
            FilesCommand::Upload {
                file_path,
                folder_id,
            } => files::upload(ctx, out, &file_path, folder_id).map(drop),
        },
    }
}

/// Read a JSON document from disk and return its exact text once it is
/// known to parse. The parsed value is only used for the syntax check.
pub fn read_json_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::io_at(path, e))?;
    serde_json::from_str::<serde::de::IgnoredAny>(&text).map_err(|source| {
        CliError::InvalidSpec {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(text)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn spec_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn valid_json_is_returned_verbatim() {
        let text = "{ \"workflow\":  {\"tasks\": [] } }\n";
        let file = spec_file(text);
        assert_eq!(read_json_file(file.path()).unwrap(), text);
    }

    #[test]
    fn malformed_json_is_invalid_spec() {
        let file = spec_file("{\"tasks\": [");
        let err = read_json_file(file.path()).unwrap_err();
        assert!(matches!(err, CliError::InvalidSpec { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_json_file(Path::new("/nonexistent/spec.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { path: Some(_), .. }));
    }
}
