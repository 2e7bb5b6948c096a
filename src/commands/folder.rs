// Folder browsing.

use super::Context;
use crate::error::Result;
use crate::models::{decode, Folder, WorkflowSummary};
use crate::ui;
use serde_json::Value;
use std::io::Write;
use tabled::Tabled;

/// Two-column row used for folders, subfolders and workflows alike.
#[derive(Debug, Tabled)]
pub struct NamedRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<&Folder> for NamedRow {
    fn from(folder: &Folder) -> Self {
        NamedRow {
            id: ui::cell(folder.id),
            name: ui::cell(folder.display_name.as_deref()),
        }
    }
}

impl From<&WorkflowSummary> for NamedRow {
    fn from(workflow: &WorkflowSummary) -> Self {
        NamedRow {
            id: ui::cell(workflow.id),
            name: ui::cell(workflow.display_name.as_deref()),
        }
    }
}

/// Without an id, list the top-level folders. With an id, show that folder,
/// a "Subfolders" table and the workflows it contains. `raw` prints the
/// folder JSON instead of tables.
pub fn get<W: Write>(ctx: &Context, out: &mut W, folder_id: Option<i64>, raw: bool) -> Result<()> {
    let (folders, subfolders): (Vec<Value>, Option<Vec<Value>>) = match folder_id {
        Some(id) => {
            let folder: Value = ctx
                .api
                .get(&format!("/folders/{id}"))?
                .into_success(format_args!("folder {id}"))?
                .json()?;
            let children: Vec<Value> = ctx
                .api
                .get(&format!("/folders/{id}/folders/"))?
                .into_success(format_args!("subfolders of folder {id}"))?
                .json()?;
            (vec![folder], Some(children))
        }
        None => {
            let roots: Vec<Value> = ctx.api.get("/folders/")?.into_success("folders")?.json()?;
            (roots, None)
        }
    };

    if raw {
        return ui::write_json(out, &folders, true);
    }

    let folders: Vec<Folder> = folders.iter().map(decode::<Folder>).collect::<Result<_>>()?;
    let rows: Vec<NamedRow> = folders.iter().map(NamedRow::from).collect();
    ui::write_table(out, None, rows, ctx.color)?;

    if let Some(children) = subfolders {
        let children: Vec<Folder> = children.iter().map(decode::<Folder>).collect::<Result<_>>()?;
        let rows: Vec<NamedRow> = children.iter().map(NamedRow::from).collect();
        ui::write_table(out, Some("Subfolders"), rows, ctx.color)?;
    }

    for folder in &folders {
        if let Some(workflows) = &folder.workflows {
            let title = format!("Workflows for folder {}", ui::cell(folder.id));
            let rows: Vec<NamedRow> = workflows.iter().map(NamedRow::from).collect();
            ui::write_table(out, Some(&title), rows, ctx.color)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::FakeGateway;
    use crate::error::CliError;
    use serde_json::json;

    fn run(api: &FakeGateway, folder_id: Option<i64>, raw: bool) -> (Result<()>, String) {
        let ctx = Context::new(api, false);
        let mut out = Vec::new();
        let result = get(&ctx, &mut out, folder_id, raw);
        (result, String::from_utf8(out).unwrap())
    }

    /// Data rows of the table printed under `title`.
    fn rows_under<'a>(out: &'a str, title: &str) -> Vec<&'a str> {
        let start = out.find(&format!("{title}\n")).unwrap();
        out[start..]
            .lines()
            .skip(1)
            .take_while(|l| !l.starts_with('╰'))
            .filter(|l| l.starts_with('│'))
            .skip(1)
            .collect()
    }

    fn case_folder() -> FakeGateway {
        FakeGateway::new()
            .on_json(
                "GET",
                "/folders/5",
                200,
                json!({
                    "id": 5,
                    "display_name": "case-2024",
                    "workflows": [{"id": 70, "display_name": "triage"}]
                }),
            )
            .on_json(
                "GET",
                "/folders/5/folders/",
                200,
                json!([
                    {"id": 8, "display_name": "memory"},
                    {"id": 6, "display_name": "disk"}
                ]),
            )
    }

    #[test]
    fn subfolders_table_has_one_row_per_child_in_order() {
        let api = case_folder();
        let (result, out) = run(&api, Some(5), false);
        result.unwrap();

        let rows = rows_under(&out, "Subfolders");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("memory"));
        assert!(rows[1].contains("disk"));
    }

    #[test]
    fn folder_shows_its_workflows() {
        let api = case_folder();
        let (_, out) = run(&api, Some(5), false);
        let rows = rows_under(&out, "Workflows for folder 5");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("triage"));
        assert!(out.contains("case-2024"));
    }

    #[test]
    fn listing_roots_skips_subfolder_lookup() {
        let api = FakeGateway::new().on_json(
            "GET",
            "/folders/",
            200,
            json!([
                {"id": 1, "display_name": "evidence"},
                {"id": 2, "display_name": "reports"}
            ]),
        );
        let (result, out) = run(&api, None, false);
        result.unwrap();
        assert_eq!(api.calls().len(), 1);
        assert!(!out.contains("Subfolders"));
        assert!(out.contains("evidence") && out.contains("reports"));
    }

    #[test]
    fn raw_dumps_json_without_tables() {
        let api = case_folder();
        let (result, out) = run(&api, Some(5), true);
        result.unwrap();
        let printed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(printed[0]["display_name"], "case-2024");
        assert!(!out.contains('│'));
    }

    #[test]
    fn unknown_folder_is_not_found() {
        let api = FakeGateway::new();
        let (result, _) = run(&api, Some(12), false);
        assert!(matches!(result, Err(CliError::NotFound(_))));
    }
}
