//! Repository checks for wrapkit
//!
//! `cargo run -p xtask` validates `docs/compliance_matrix.csv`: every
//! requirement row must reference at least one test as `path::test_name`, and
//! each referenced file must exist and define that test function.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const MATRIX: &str = "docs/compliance_matrix.csv";
const COLUMNS: usize = 4;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Row {
    line: usize,
    requirement: String,
    test_refs: Vec<String>,
}

fn run() -> Result<(), String> {
    let repo = repo_root()?;
    let matrix_path = repo.join(MATRIX);
    let content = fs::read_to_string(&matrix_path)
        .map_err(|e| format!("reading {} failed: {e}", matrix_path.display()))?;

    let rows = parse(&content)?;
    let mut sources: BTreeMap<PathBuf, Option<String>> = BTreeMap::new();
    let mut problems = Vec::new();

    for row in &rows {
        if row.test_refs.is_empty() {
            problems.push(format!(
                "{} (line {}): no test references",
                row.requirement, row.line
            ));
            continue;
        }
        for reference in &row.test_refs {
            let Some((file, test)) = reference.split_once("::") else {
                problems.push(format!(
                    "{} (line {}): malformed reference '{}'",
                    row.requirement, row.line, reference
                ));
                continue;
            };
            let path = repo.join(file.trim());
            let source = sources
                .entry(path.clone())
                .or_insert_with(|| fs::read_to_string(&path).ok());
            match source {
                None => problems.push(format!(
                    "{} (line {}): file not found {}",
                    row.requirement,
                    row.line,
                    path.display()
                )),
                Some(text) if !defines_fn(text, test.trim()) => problems.push(format!(
                    "{} (line {}): no fn {} in {}",
                    row.requirement,
                    row.line,
                    test.trim(),
                    file.trim()
                )),
                Some(_) => {}
            }
        }
    }

    if problems.is_empty() {
        println!("Compliance matrix OK ({} requirements)", rows.len());
        return Ok(());
    }

    let mut message = String::from("Compliance matrix validation failed:\n");
    for problem in &problems {
        message.push_str("  - ");
        message.push_str(problem);
        message.push('\n');
    }
    Err(message)
}

/// Columns: requirement_id, module, description, test_refs (`;`-separated)
fn parse(content: &str) -> Result<Vec<Row>, String> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split(',').collect();
        if columns.len() != COLUMNS {
            return Err(format!(
                "line {}: expected {} columns, found {}",
                idx + 1,
                COLUMNS,
                columns.len()
            ));
        }
        let requirement = columns[0].trim();
        if requirement.is_empty() {
            return Err(format!("line {}: requirement_id empty", idx + 1));
        }
        rows.push(Row {
            line: idx + 1,
            requirement: requirement.to_string(),
            test_refs: columns[3]
                .split(';')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }
    Ok(rows)
}

fn defines_fn(source: &str, name: &str) -> bool {
    let needle = format!("fn {name}(");
    source.contains(&needle)
}

fn repo_root() -> Result<PathBuf, String> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "xtask manifest directory has no parent".to_string())
}
