//! Tests for the JSON, SARIF and text output formats.

use std::path::{Path, PathBuf};

use unilint::lint::Linter;
use unilint::report::{self, JsonReport};
use unilint::LintResult;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run(names: &[&str]) -> LintResult {
    let files: Vec<PathBuf> = names.iter().map(|n| testdata_path().join(n)).collect();
    Linter::with_default_checkers().check_files(&files)
}

#[test]
fn test_json_report_structure() {
    let result = run(&["formatting.py", "suppressed.py"]);
    let json = report::render_json(&["testdata".to_string()], &result).expect("should render");
    let parsed: JsonReport = serde_json::from_str(&json).expect("should round trip");

    assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(parsed.paths, vec!["testdata"]);
    assert!(!parsed.passed);
    assert_eq!(parsed.files_scanned, 2);
    assert_eq!(parsed.diagnostics.len(), 4);
    assert_eq!(parsed.suppressed_count, 3);
    assert_eq!(parsed.suppressed.len(), 3);
    assert!(parsed.errors.is_empty());

    let summary: Vec<_> = parsed
        .summary
        .iter()
        .map(|s| (s.code.as_str(), s.count))
        .collect();
    assert_eq!(summary, vec![("W1403", 2), ("W1404", 2)]);

    let w1404: Vec<_> = parsed
        .diagnostics
        .iter()
        .filter(|d| d.symbol == "string-format-operator-deprecated")
        .collect();
    assert!(w1404.iter().all(|d| d.column.is_some() && d.severity == "warning"));
}

#[test]
fn test_json_field_names() {
    let result = run(&["magic_methods.py"]);
    let json = report::render_json(&["magic_methods.py".to_string()], &result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let first = &value["diagnostics"][0];
    for field in ["code", "symbol", "severity", "file", "line", "column", "message"] {
        assert!(first.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(first["message"], "Implement __unicode__ instead of __str__");
    assert_eq!(first["line"], 4);
    assert_eq!(first["column"], 1);
}

#[test]
fn test_sarif_structure() {
    let result = run(&["formatting.py", "magic_methods.py"]);
    let sarif = report::render_sarif(&testdata_path(), &result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&sarif).unwrap();

    assert_eq!(value["version"], "2.1.0");
    assert!(value["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));

    let run = &value["runs"][0];
    let rule_ids: Vec<_> = run["tool"]["driver"]["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(rule_ids, vec!["W1403", "W1404", "W1405"]);

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), result.diagnostics.len());
    let uris: Vec<_> = results
        .iter()
        .map(|r| {
            r["locations"][0]["physicalLocation"]["artifactLocation"]["uri"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert!(uris.iter().all(|u| u == "formatting.py" || u == "magic_methods.py"));
}

#[test]
fn test_text_output_lines() {
    let result = run(&["formatting.py"]);
    let text = report::render_text(&result);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);

    let file = result.diagnostics[0].file.clone();
    assert_eq!(
        lines[0],
        format!("{}:6:14: W1404: % operator is deprecated (string-format-operator-deprecated)", file)
    );
    assert_eq!(
        lines[1],
        format!("{}:9: W1403: simple string literal detected. Use r or u prefix (simple-basestring-literal)", file)
    );
    assert!(lines[2].starts_with(&format!("{}:9:14: W1404", file)));
    assert!(Path::new(&file).ends_with("formatting.py"));
}
