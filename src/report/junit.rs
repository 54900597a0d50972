use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Suite, TestCase, Verdict};

/// Render the full suite tree as a JUnit-style XML document. Borrows the
/// tree read-only; called once, after every suite has finished.
pub fn render(suites: &[Suite]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str("<testsuites>\n");
    for suite in suites {
        render_suite(&mut xml, suite);
    }
    xml.push_str("</testsuites>\n");
    xml
}

/// Render and write the report file.
pub fn write(suites: &[Suite], out: &Path) -> Result<()> {
    std::fs::write(out, render(suites))
        .with_context(|| format!("failed to write report {}", out.display()))
}

fn render_suite(xml: &mut String, suite: &Suite) {
    xml.push_str(&format!(
        r#"  <testsuite name="{}" tests="{}" failures="{}" errors="{}" time="{}">"#,
        escape(&suite.name),
        suite.total(),
        suite.failures(),
        suite.errors(),
        seconds(suite.duration_ms()),
    ));
    xml.push('\n');
    for test in &suite.tests {
        render_case(xml, test);
    }
    xml.push_str("  </testsuite>\n");
}

fn render_case(xml: &mut String, test: &TestCase) {
    let duration_ms = test.result.as_ref().map_or(0, |r| r.duration_ms);
    let open = format!(
        r#"    <testcase name="{}" time="{}""#,
        escape(&test.name),
        seconds(duration_ms),
    );

    match test.result.as_ref().map(|r| &r.verdict) {
        Some(Verdict::Failed(diag)) => {
            xml.push_str(&format!(
                "{open}>\n      <failure message=\"{}\">{}</failure>\n    </testcase>\n",
                escape(&diag.message),
                escape(&diag.trace),
            ));
        }
        Some(Verdict::Errored(diag)) => {
            xml.push_str(&format!(
                "{open}>\n      <error message=\"{}\">{}</error>\n    </testcase>\n",
                escape(&diag.message),
                escape(&diag.trace),
            ));
        }
        // Passed, or never run (pending stays a bare testcase).
        _ => {
            xml.push_str(&format!("{open}/>\n"));
        }
    }
}

fn seconds(ms: u64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
