use deployscope_core::model::{DiagnosticKind, ResolvedDeployment};
use deployscope_core::ResolverConfig;
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};
use tracing::info;

use crate::OutputFormat;

#[derive(Tabled)]
struct DependencyRow {
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Dependency")]
    dependency: String,
}

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    identifier: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Deps")]
    dependencies: usize,
}

#[derive(Tabled)]
struct DiagnosticRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Entry")]
    reference: String,
    #[tabled(rename = "Declared In")]
    declaring_root: String,
}

pub fn run(
    paths: Vec<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ResolverConfig::load(&path)?,
        None => ResolverConfig::default(),
    };
    let runtime = deployscope_runtime::build_default_runtime(config);

    info!("Resolving {} deployment(s)", paths.len());
    let mut resolved = Vec::new();
    for (path, result) in paths.iter().zip(runtime.resolve_paths(&paths)) {
        let deployment = result.map_err(|e| format!("{}: {}", path.display(), e))?;
        if format == OutputFormat::Table {
            println!("{}", render_table(&deployment));
        }
        resolved.push(deployment);
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    }
    Ok(())
}

fn kind_label(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::Unresolvable => "unresolvable",
        DiagnosticKind::OutOfBounds => "out of bounds",
        DiagnosticKind::ExternalRejected => "external rejected",
    }
}

fn render_table(deployment: &ResolvedDeployment) -> String {
    let mut out = format!("Deployment: {}\n", deployment.name);

    let deps: Vec<DependencyRow> = deployment
        .units
        .iter()
        .flat_map(|unit| {
            unit.dependencies.iter().map(|d| DependencyRow {
                unit: unit.name.clone(),
                dependency: d.to_string(),
            })
        })
        .collect();
    if deps.is_empty() {
        out.push_str("No class path dependencies.\n");
    } else {
        out.push_str(&Table::new(deps).with(Style::psql()).to_string());
        out.push('\n');
    }

    let modules: Vec<ModuleRow> = deployment
        .created_modules()
        .map(|m| ModuleRow {
            identifier: m.identifier.to_string(),
            path: m.relative_path.clone(),
            dependencies: m.dependencies.len(),
        })
        .collect();
    if !modules.is_empty() {
        out.push_str("\nCreated modules:\n");
        out.push_str(&Table::new(modules).with(Style::psql()).to_string());
        out.push('\n');
    }

    let diagnostics: Vec<DiagnosticRow> = deployment
        .diagnostics
        .iter()
        .map(|d| DiagnosticRow {
            kind: kind_label(d.kind),
            reference: d.reference.clone(),
            declaring_root: d.declaring_root.display().to_string(),
        })
        .collect();
    if !diagnostics.is_empty() {
        out.push_str("\nIgnored entries:\n");
        out.push_str(&Table::new(diagnostics).with(Style::psql()).to_string());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployscope_core::model::{Diagnostic, UnitDependencies};

    fn deployment() -> ResolvedDeployment {
        ResolvedDeployment {
            name: "app.ear".to_string(),
            units: vec![
                UnitDependencies {
                    name: "app.ear".to_string(),
                    parent: None,
                    dependencies: vec![],
                },
                UnitDependencies {
                    name: "web.war".to_string(),
                    parent: Some("app.ear".to_string()),
                    dependencies: vec!["deployment.app.ear.util/u.jar".into()],
                },
            ],
            synthesized: vec![],
            class_path_roots: vec![],
            diagnostics: vec![Diagnostic {
                kind: DiagnosticKind::OutOfBounds,
                reference: "../x.jar".to_string(),
                declaring_root: PathBuf::from("/d/app.ear/web.war"),
                candidate: Some(PathBuf::from("/d/x.jar")),
            }],
        }
    }

    #[test]
    fn test_render_table() {
        let out = render_table(&deployment());
        assert!(out.starts_with("Deployment: app.ear"));
        assert!(out.contains("deployment.app.ear.util/u.jar"));
        assert!(out.contains("out of bounds"));
        assert!(!out.contains("Created modules"));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            vec![dir.path().to_path_buf()],
            Some(dir.path().join("absent.json")),
            OutputFormat::Json,
        );
        assert!(result.is_err());
    }
}
