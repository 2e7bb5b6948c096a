// Command-line surface. The vocabulary is fixed: `workflow`, `template`,
// `folder` and `files`, each with its own subcommands. Selectors that the
// handlers validate themselves (so they can report `InvalidArguments`) are
// declared optional here.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "openrelik-cli",
    version,
    about = "Browse folders and files, and manage workflows and templates on an OpenRelik server"
)]
pub struct Cli {
    /// Server root URL
    #[arg(long, env = "OPENRELIK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "OPENRELIK_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API version segment of the request path
    #[arg(long, env = "OPENRELIK_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, inspect and update workflows
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },
    /// List, update and delete workflow templates
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Browse folders
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },
    /// List, download and upload files
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkflowCommand {
    /// Create a workflow for a file in the file's own folder
    Create {
        /// File ID
        #[arg(long)]
        file_id: i64,
        /// Template to instantiate the workflow from
        #[arg(long)]
        template_id: Option<i64>,
    },
    /// Get one workflow, or all workflows in a folder
    Get {
        /// Folder ID
        #[arg(long)]
        folder_id: Option<i64>,
        /// Workflow ID
        #[arg(long)]
        workflow_id: Option<i64>,
    },
    /// Show a workflow's tasks and their status
    Status {
        /// Workflow ID
        #[arg(long)]
        workflow_id: i64,
        /// Output raw JSON API reply
        #[arg(long)]
        raw: bool,
    },
    /// Replace a workflow's JSON spec
    Update {
        /// Workflow ID
        #[arg(long)]
        workflow_id: i64,
        /// Folder ID (the workflow's own folder wins if they differ)
        #[arg(long)]
        folder_id: i64,
        /// Path to the workflow JSON spec
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List templates, or print one template by id
    Get {
        /// Template ID
        #[arg(long)]
        id: Option<i64>,
        /// Pretty-print the JSON output
        #[arg(long)]
        nice: bool,
    },
    /// Delete a template
    Delete {
        /// Template ID
        #[arg(long)]
        template_id: Option<i64>,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Replace a template with the JSON in a file
    Update {
        /// Template ID
        #[arg(long)]
        template_id: i64,
        /// Path to the new template data
        #[arg(long)]
        file_path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List top-level folders, or show one folder with its subfolders
    Get {
        /// Folder ID
        #[arg(long)]
        folder_id: Option<i64>,
        /// Output raw JSON API reply
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List the files in a folder
    Get {
        /// Folder ID
        #[arg(long)]
        folder_id: Option<i64>,
        /// Output raw JSON API reply
        #[arg(long)]
        raw: bool,
    },
    /// Write a file's content to stdout
    Download {
        /// File ID
        #[arg(long)]
        file_id: i64,
    },
    /// Upload a local file into a folder
    Upload {
        /// Path of the file to upload
        #[arg(long)]
        file_path: PathBuf,
        /// Folder ID
        #[arg(long)]
        folder_id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_workflow_update_options() {
        let cli = Cli::try_parse_from([
            "openrelik-cli",
            "workflow",
            "update",
            "--workflow-id",
            "4",
            "--folder-id",
            "2",
            "--file",
            "spec.json",
        ])
        .unwrap();
        match cli.command {
            Command::Workflow {
                command:
                    WorkflowCommand::Update {
                        workflow_id,
                        folder_id,
                        file,
                    },
            } => {
                assert_eq!(workflow_id, 4);
                assert_eq!(folder_id, 2);
                assert_eq!(file, PathBuf::from("spec.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "openrelik-cli",
            "folder",
            "get",
            "--api-key",
            "k",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["openrelik-cli", "task", "get"]).is_err());
    }
}
