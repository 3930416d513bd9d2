use clap::Parser;
use keiro::prelude::*;
use serde::Deserialize;
use std::fs;
use std::process;
use std::time::Instant;

// --- JSON Deserialization Structs (Input Format Specific) ---
// The roles file is only used here; the workflow export itself parses into
// the library's `EditorExport` shape.

#[derive(Deserialize)]
struct RawRole {
    id: String,
    name: String,
    #[serde(default, alias = "departmentId")]
    department_id: Option<String>,
    #[serde(default, alias = "assignedUsers")]
    assigned_users: usize,
}

/// Validate, activation-check and freeze workflow graph exports
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow editor JSON export
    workflow_path: String,

    /// Optional path to a roles JSON file for the activation staffing check
    #[arg(short, long)]
    roles: Option<String>,

    /// Freeze a valid graph into a template artifact at this path
    #[arg(short, long)]
    save: Option<String>,

    /// Template name recorded in the artifact
    #[arg(short, long, default_value = "unnamed workflow")]
    name: String,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Load and convert ---
    let workflow_json = fs::read_to_string(&cli.workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workflow file '{}': {}",
            &cli.workflow_path, e
        ))
    });
    let export: EditorExport = serde_json::from_str(&workflow_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse workflow JSON: {}", e)));
    let graph = export
        .into_workflow()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert workflow: {}", e)));

    println!(
        "Loaded workflow: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    // --- 2. Validate ---
    let validate_start = Instant::now();
    let report = validate(&graph);
    println!(
        "\nValidation finished in {:?}: {} error(s), {} warning(s)",
        validate_start.elapsed(),
        report.errors.len(),
        report.warnings.len()
    );
    for error in &report.errors {
        println!("  error [{}]: {}", error.code(), error);
    }
    for warning in &report.warnings {
        println!("  warning [{}]: {}", warning.code(), warning);
    }

    // --- 3. Optional activation check against a roles file ---
    if let Some(roles_path) = &cli.roles {
        let roles_json = fs::read_to_string(roles_path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read roles file '{}': {}", roles_path, e))
        });
        let raw_roles: Vec<RawRole> = serde_json::from_str(&roles_json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse roles JSON: {}", e)));

        let mut directory = InMemoryDirectory::new();
        for raw in raw_roles {
            directory = directory.with_role(
                Role {
                    id: RoleId(raw.id),
                    name: raw.name,
                    department_id: raw.department_id,
                },
                raw.assigned_users,
            );
        }

        let issues = check_activation(&graph, &directory);
        if issues.is_empty() {
            println!("\nActivation check passed: every referenced role is staffed.");
        } else {
            println!("\nActivation check found {} issue(s):", issues.len());
            for issue in &issues {
                println!("  {}", issue);
            }
        }
    }

    // --- 4. Optional template freeze ---
    if let Some(save_path) = &cli.save {
        if !report.is_valid() {
            exit_with_error("Refusing to freeze a template: the graph has validation errors");
        }
        let template = WorkflowTemplate::freeze(cli.name.clone(), graph)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to freeze template: {}", e)));
        template
            .save(save_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save template: {}", e)));
        println!("\nTemplate '{}' saved to {}", template.name(), save_path);
    }

    println!("\nDone in {:?}", total_start.elapsed());
    if !report.is_valid() {
        process::exit(1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
