//! Tool definitions and dispatch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::McpError;
use crate::files;
use crate::mcp::handlers;
use crate::mcp::protocol::ToolDefinition;
use crate::store::ReportStore;

/// Shared state handed to every tool call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub store: Arc<ReportStore>,
    pub base_path: PathBuf,
    pub lines_to_read: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    pub file_paths: Vec<String>,
    #[serde(default)]
    pub lines_to_read: Option<f64>,
    #[serde(default)]
    pub base_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    pub license_a: String,
    pub license_b: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseNameParams {
    pub license_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    pub category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePathParams {
    pub file_path: String,
}

fn parse<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, McpError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| McpError::InvalidParams(format!("{}: {}", tool, e)))
}

/// Run the named tool and return its text output.
pub async fn call(ctx: &ToolContext, name: &str, arguments: Value) -> Result<String, McpError> {
    let store = ctx.store.as_ref();

    let text = match name {
        "analyze_license_file" => {
            let params: AnalyzeParams = parse(name, arguments)?;
            let base = match params.base_path {
                Some(base) => files::absolute(Path::new(&base))?,
                None => ctx.base_path.clone(),
            };
            let lines = params
                .lines_to_read
                .filter(|n| n.is_finite())
                .map(|n| n.max(1.0) as usize)
                .unwrap_or(ctx.lines_to_read);
            handlers::analyze_license_file(store, &params.file_paths, &base, lines).await
        }
        "summarize_license_risks" => handlers::summarize_license_risks(store),
        "compare_license_compatibility" => {
            let params: CompareParams = parse(name, arguments)?;
            handlers::compare_license_compatibility(&params.license_a, &params.license_b)
        }
        "list_high_risk_files" => handlers::list_high_risk_files(store),
        "get_license_clause_summary" => {
            let params: LicenseNameParams = parse(name, arguments)?;
            handlers::get_license_clause_summary(&params.license_name)
        }
        "list_categories" => handlers::list_categories(store),
        "list_licenses_in_category" => {
            let params: CategoryParams = parse(name, arguments)?;
            handlers::list_licenses_in_category(store, &params.category)
        }
        "get_files_by_license" => {
            let params: LicenseNameParams = parse(name, arguments)?;
            handlers::get_files_by_license(store, &params.license_name)
        }
        "check_file_licenses" => {
            let params: FilePathParams = parse(name, arguments)?;
            handlers::check_file_licenses(store, &params.file_path)
        }
        "list_scan_issues" => handlers::list_scan_issues(store),
        "get_recommendations" => handlers::get_recommendations(store),
        "list_files_for_analysis" => handlers::list_files_for_analysis(store),
        "generate_file_report" => {
            let params: FilePathParams = parse(name, arguments)?;
            handlers::generate_file_report(store, &params.file_path, &ctx.base_path).await
        }
        _ => return Err(McpError::ToolNotFound(name.to_string())),
    };

    Ok(text)
}

fn no_params() -> Value {
    json!({"type": "object", "properties": {}})
}

/// All tools, in the order `tools/list` reports them.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "analyze_license_file",
            description: "Read the first lines of one or more files and show the licenses the report recorded for them, with short legal summaries",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePaths": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Files to analyze (absolute, or relative to basePath)"
                    },
                    "linesToRead": {"type": "number", "description": "Lines to read per file (default: 100)", "default": 100},
                    "basePath": {"type": "string", "description": "Directory relative paths resolve against"}
                },
                "required": ["filePaths"]
            }),
        },
        ToolDefinition {
            name: "summarize_license_risks",
            description: "Group every license in the report with the files it appears in and a short risk summary",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "compare_license_compatibility",
            description: "Canned verdict on whether code under two licenses can be combined",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "licenseA": {"type": "string", "description": "First license name"},
                    "licenseB": {"type": "string", "description": "Second license name"}
                },
                "required": ["licenseA", "licenseB"]
            }),
        },
        ToolDefinition {
            name: "list_high_risk_files",
            description: "Files in the copyleft, unknown, commercial_unfriendly, gpl and agpl categories",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "get_license_clause_summary",
            description: "Detailed legal summary of a license's main clauses",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "licenseName": {"type": "string", "description": "License name, e.g. GPL-3.0"}
                },
                "required": ["licenseName"]
            }),
        },
        ToolDefinition {
            name: "list_categories",
            description: "List the license categories in the report",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "list_licenses_in_category",
            description: "List licenses and scores recorded under a category",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Category name, e.g. gpl"}
                },
                "required": ["category"]
            }),
        },
        ToolDefinition {
            name: "get_files_by_license",
            description: "Files whose license name contains the given text (case-insensitive)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "licenseName": {"type": "string", "description": "Text to search for in license names"}
                },
                "required": ["licenseName"]
            }),
        },
        ToolDefinition {
            name: "check_file_licenses",
            description: "Licenses recorded for files whose path contains the given text (case-insensitive)",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePath": {"type": "string", "description": "Text to search for in file paths"}
                },
                "required": ["filePath"]
            }),
        },
        ToolDefinition {
            name: "list_scan_issues",
            description: "Scan errors and low-confidence detections recorded in the report",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "get_recommendations",
            description: "Recommendations recorded in the report",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "list_files_for_analysis",
            description: "Every distinct file with at least one license finding",
            input_schema: no_params(),
        },
        ToolDefinition {
            name: "generate_file_report",
            description: "Full file content plus the license findings recorded for exactly this path",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePath": {"type": "string", "description": "File to report on (absolute, or relative to the base path)"}
                },
                "required": ["filePath"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Categories, LicenseCategory, LicenseFinding, LicenseReport};

    fn ctx_with(store: ReportStore) -> ToolContext {
        ToolContext {
            store: Arc::new(store),
            base_path: PathBuf::from("."),
            lines_to_read: 100,
        }
    }

    fn gpl_ctx() -> ToolContext {
        ctx_with(ReportStore::with_report(LicenseReport {
            problematic_licenses: Categories(vec![LicenseCategory {
                name: "gpl".into(),
                findings: vec![LicenseFinding {
                    name: "GPL-3.0".into(),
                    file: "a.txt".into(),
                    score: 80.0,
                }],
            }]),
            ..LicenseReport::default()
        }))
    }

    #[test]
    fn test_definitions_match_dispatch() {
        let defs = definitions();
        assert_eq!(defs.len(), 13);
        let mut names: Vec<_> = defs.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 13);
    }

    #[tokio::test]
    async fn test_every_defined_tool_is_callable() {
        let ctx = ctx_with(ReportStore::new());
        let args = json!({
            "filePaths": [],
            "licenseA": "MIT",
            "licenseB": "MIT",
            "licenseName": "MIT",
            "category": "gpl",
            "filePath": "/no/such/file"
        });
        for def in definitions() {
            let result = call(&ctx, def.name, args.clone()).await;
            assert!(result.is_ok(), "{} failed: {:?}", def.name, result.err());
        }
    }

    #[tokio::test]
    async fn test_camel_case_params() {
        let ctx = gpl_ctx();
        let text = call(&ctx, "get_files_by_license", json!({"licenseName": "gpl"}))
            .await
            .unwrap();
        assert!(text.contains("a.txt"));

        let text = call(&ctx, "check_file_licenses", json!({"filePath": "A.TXT"}))
            .await
            .unwrap();
        assert!(text.contains("GPL-3.0"));
    }

    #[tokio::test]
    async fn test_compare_is_symmetric() {
        let ctx = gpl_ctx();
        let ab = call(&ctx, "compare_license_compatibility", json!({"licenseA": "MIT", "licenseB": "GPL-3.0"}))
            .await
            .unwrap();
        let ba = call(&ctx, "compare_license_compatibility", json!({"licenseA": "GPL-3.0", "licenseB": "MIT"}))
            .await
            .unwrap();
        assert_eq!(ab.lines().last(), ba.lines().last());
    }

    #[tokio::test]
    async fn test_missing_param_is_invalid_params() {
        let ctx = gpl_ctx();
        let err = call(&ctx, "list_licenses_in_category", json!({})).await.unwrap_err();
        assert_eq!(err.error_code(), -32602);
        let err = call(&ctx, "get_license_clause_summary", Value::Null).await.unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let ctx = gpl_ctx();
        let err = call(&ctx, "delete_everything", json!({})).await.unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_lines_to_read_accepts_float() {
        let ctx = gpl_ctx();
        let text = call(
            &ctx,
            "analyze_license_file",
            json!({"filePaths": ["/no/such/file"], "linesToRead": 5.0}),
        )
        .await
        .unwrap();
        assert!(text.contains("Error: could not read"));
    }

    #[tokio::test]
    async fn test_relative_base_path_matches_absolute_file() {
        let dir = tempfile::tempdir_in(".").unwrap();
        std::fs::write(dir.path().join("a.txt"), "GPL header\n").unwrap();
        let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        let absolute = std::env::current_dir().unwrap().join(&name).join("a.txt");

        let text = call(
            &gpl_ctx(),
            "analyze_license_file",
            json!({"filePaths": [absolute.to_string_lossy()], "basePath": name}),
        )
        .await
        .unwrap();
        assert!(text.contains("Report path: a.txt"));
        assert!(text.contains("GPL-3.0 (score 80)"));
        assert!(text.contains("GPL header"));
    }
}
