//! `hotelier tool list` and `hotelier tool show NAME`.
//!
//! Specs come from [`hotelier::tool_specs`], the same definitions the model receives,
//! so no credentials are needed to inspect them.

use std::str::FromStr;

use hotelier::ToolSpec;
use serde::Serialize;

use crate::run::CliError;

/// Longer descriptions are cut in the list table.
const LIST_DESC_MAX_LEN: usize = 60;

/// Output format for `tool show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolShowFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for ToolShowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other} (expected yaml or json)")),
        }
    }
}

#[derive(Serialize)]
struct ToolSpecOutput<'a> {
    name: &'a str,
    description: Option<&'a str>,
    input_schema: &'a serde_json::Value,
    return_direct: bool,
}

impl<'a> From<&'a ToolSpec> for ToolSpecOutput<'a> {
    fn from(spec: &'a ToolSpec) -> Self {
        Self {
            name: &spec.name,
            description: spec.description.as_deref(),
            input_schema: &spec.input_schema,
            return_direct: spec.return_direct,
        }
    }
}

fn first_line_truncated(desc: &str) -> String {
    let line = desc.lines().next().unwrap_or("");
    if line.chars().count() > LIST_DESC_MAX_LEN {
        format!("{}...", line.chars().take(LIST_DESC_MAX_LEN).collect::<String>())
    } else {
        line.to_string()
    }
}

fn render_list(specs: &[ToolSpec], json: bool) -> Result<String, CliError> {
    if json {
        let out: Vec<ToolSpecOutput<'_>> = specs.iter().map(ToolSpecOutput::from).collect();
        return serde_json::to_string_pretty(&out).map_err(|e| CliError::Output(e.to_string()));
    }
    let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(4).max(4);
    let mut out = format!("{:<width$}\tDESCRIPTION\n", "NAME");
    for spec in specs {
        let desc = first_line_truncated(spec.description.as_deref().unwrap_or(""));
        out.push_str(&format!("{:<width$}\t{}\n", spec.name, desc));
    }
    Ok(out)
}

fn render_show(specs: &[ToolSpec], name: &str, format: ToolShowFormat) -> Result<String, CliError> {
    let spec = specs
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CliError::ToolNotFound(name.to_string()))?;
    let out = ToolSpecOutput::from(spec);
    match format {
        ToolShowFormat::Yaml => {
            serde_yaml::to_string(&out).map_err(|e| CliError::Output(e.to_string()))
        }
        ToolShowFormat::Json => serde_json::to_string_pretty(&out)
            .map(|s| s + "\n")
            .map_err(|e| CliError::Output(e.to_string())),
    }
}

/// Table of tool names and descriptions, or a JSON array when `json` is set.
pub fn list_tools(json: bool) -> Result<String, CliError> {
    render_list(&hotelier::tool_specs(), json)
}

/// Full definition of one tool.
pub fn show_tool(name: &str, format: ToolShowFormat) -> Result<String, CliError> {
    render_show(&hotelier::tool_specs(), name, format)
}
