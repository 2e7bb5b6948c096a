// Template commands. Templates are catalog entries managed by the server;
// some servers do not implement template update or delete, so those
// commands report exactly what the server answered.

use super::{read_json_file, Context};
use crate::error::{CliError, Result};
use crate::ui;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

const TEMPLATES: &str = "/workflows/templates/";

fn fetch_all(ctx: &Context) -> Result<Vec<Value>> {
    ctx.api
        .get(TEMPLATES)?
        .into_success("workflow templates")?
        .json()
}

/// Reduce a template record to its id and display name.
pub fn summarize(template: &Value) -> Value {
    json!({
        "id": template.get("id").cloned().unwrap_or(Value::Null),
        "display_name": template.get("display_name").cloned().unwrap_or(Value::Null),
    })
}

/// Without `id`, print every template as `{id, display_name}`. With `id`,
/// print that template's full record, or fail with `NotFound`.
pub fn get<W: Write>(ctx: &Context, out: &mut W, id: Option<i64>, nice: bool) -> Result<()> {
    let templates = fetch_all(ctx)?;

    match id {
        Some(id) => {
            let template = templates
                .iter()
                .find(|t| t.get("id").and_then(Value::as_i64) == Some(id))
                .ok_or_else(|| CliError::NotFound(format!("template {id}")))?;
            ui::write_json(out, template, nice)
        }
        None => {
            let listing: Vec<Value> = templates.iter().map(summarize).collect();
            ui::write_json(out, &listing, nice)
        }
    }
}

/// Delete a template. On an interactive terminal the operator confirms
/// first unless `assume_yes`; scripted runs send the delete directly.
/// Returns whether the delete was sent and accepted.
pub fn delete<W: Write>(
    ctx: &Context,
    out: &mut W,
    template_id: Option<i64>,
    assume_yes: bool,
) -> Result<bool> {
    let id = template_id.ok_or_else(|| CliError::invalid_args("--template-id is required"))?;

    if !assume_yes && ctx.interactive && !ui::confirm(&format!("Delete template {id}?"))? {
        writeln!(out, "Aborted, template {id} left in place.")?;
        return Ok(false);
    }

    ctx.api
        .delete(&format!("{TEMPLATES}{id}"))?
        .into_success(format_args!("delete of template {id}"))?;
    writeln!(out, "Template {id} successfully deleted.")?;
    Ok(true)
}

/// Replace a template with the JSON document at `file_path`, sent as-is,
/// and print the server's reply.
pub fn update<W: Write>(
    ctx: &Context,
    out: &mut W,
    template_id: i64,
    file_path: &Path,
) -> Result<()> {
    let body = read_json_file(file_path)?;
    let response = ctx
        .api
        .patch_raw(&format!("{TEMPLATES}{template_id}"), &body)?
        .into_success(format_args!("update of template {template_id}"))?;
    writeln!(out, "{}", response.text())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::FakeGateway;
    use std::io::Write as _;

    fn catalog() -> Value {
        json!([
            {"id": 1, "display_name": "Plaso", "spec_json": "{\"a\":1}", "user": {"id": 3}},
            {"id": 2, "display_name": "Strings", "spec_json": "{}", "description": "x"}
        ])
    }

    fn run<F, T>(api: &FakeGateway, f: F) -> (Result<T>, String)
    where
        F: FnOnce(&Context, &mut Vec<u8>) -> Result<T>,
    {
        let ctx = Context::new(api, false);
        let mut out = Vec::new();
        let result = f(&ctx, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn listing_projects_to_id_and_name() {
        let api = FakeGateway::new().on_json("GET", TEMPLATES, 200, catalog());
        let (result, out) = run(&api, |ctx, out| get(ctx, out, None, false));
        result.unwrap();

        let listing: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(listing.len(), 2);
        for entry in &listing {
            let mut keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
            keys.sort();
            assert_eq!(keys, vec!["display_name", "id"]);
        }
        assert_eq!(listing[1]["display_name"], "Strings");
    }

    #[test]
    fn compact_listing_is_single_line() {
        let api = FakeGateway::new().on_json("GET", TEMPLATES, 200, catalog());
        let (_, out) = run(&api, |ctx, out| get(ctx, out, None, false));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn nice_listing_is_pretty() {
        let api = FakeGateway::new().on_json("GET", TEMPLATES, 200, catalog());
        let (_, out) = run(&api, |ctx, out| get(ctx, out, None, true));
        assert!(out.lines().count() > 1);
    }

    #[test]
    fn by_id_returns_full_record() {
        let api = FakeGateway::new().on_json("GET", TEMPLATES, 200, catalog());
        let (result, out) = run(&api, |ctx, out| get(ctx, out, Some(1), false));
        result.unwrap();
        let template: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(template, catalog()[0]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let api = FakeGateway::new().on_json("GET", TEMPLATES, 200, catalog());
        let (result, out) = run(&api, |ctx, out| get(ctx, out, Some(404), false));
        assert!(matches!(result, Err(CliError::NotFound(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn delete_without_id_makes_no_calls() {
        let api = FakeGateway::new();
        let (result, _) = run(&api, |ctx, out| delete(ctx, out, None, true));
        assert!(matches!(result, Err(CliError::InvalidArguments(_))));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn delete_reports_success_only_when_server_confirms() {
        let api = FakeGateway::new().on_json("DELETE", "/workflows/templates/2", 200, json!({}));
        let (result, out) = run(&api, |ctx, out| delete(ctx, out, Some(2), true));
        assert!(result.unwrap());
        assert_eq!(out, "Template 2 successfully deleted.\n");
    }

    #[test]
    fn scripted_delete_is_sent_without_prompting() {
        let api = FakeGateway::new().on_json("DELETE", "/workflows/templates/3", 204, json!({}));
        let (result, out) = run(&api, |ctx, out| delete(ctx, out, Some(3), false));
        assert!(result.unwrap());
        assert_eq!(api.writes().len(), 1);
        assert_eq!(out, "Template 3 successfully deleted.\n");
    }

    #[test]
    fn delete_rejection_is_surfaced() {
        let api = FakeGateway::new().on_json(
            "DELETE",
            "/workflows/templates/2",
            405,
            json!({"detail": "Method Not Allowed"}),
        );
        let (result, out) = run(&api, |ctx, out| delete(ctx, out, Some(2), true));
        match result {
            Err(CliError::Upstream { status, message }) => {
                assert_eq!(status, 405);
                assert!(message.contains("Method Not Allowed"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!out.contains("deleted"));
    }

    #[test]
    fn update_sends_file_verbatim_and_prints_reply() {
        let text = "{\"display_name\": \"Plaso v2\",  \"spec_json\": \"{}\"}";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        let api = FakeGateway::new().on_json(
            "PATCH",
            "/workflows/templates/1",
            200,
            json!({"id": 1, "display_name": "Plaso v2"}),
        );

        let (result, out) = run(&api, |ctx, out| update(ctx, out, 1, file.path()));
        result.unwrap();
        assert_eq!(api.writes()[0].body.as_deref(), Some(text));
        assert!(out.contains("Plaso v2"));
    }

    #[test]
    fn update_with_malformed_file_makes_no_calls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let api = FakeGateway::new();
        let (result, _) = run(&api, |ctx, out| update(ctx, out, 1, file.path()));
        assert!(matches!(result, Err(CliError::InvalidSpec { .. })));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn update_rejected_by_server_is_not_success() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        let api = FakeGateway::new();
        let (result, out) = run(&api, |ctx, out| update(ctx, out, 1, file.path()));
        assert!(matches!(result, Err(CliError::NotFound(_))));
        assert!(out.is_empty());
    }
}
