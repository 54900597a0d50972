use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::{Suite, TestCase};

/// Suffix convention identifying a test source file.
const SUITE_SUFFIX: &str = "Test.java";

/// Source-root marker; the suite identifier is the path below it.
const SOURCE_ROOT: &str = "src";

/// Lexical scan for JUnit-style test method declarations. This is a naming
/// convention match, not Java parsing.
static TEST_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*public\s+(?:final\s+)?void\s+(?P<name>test\w+)\s*\(")
        .expect("test method pattern compiles")
});

/// Walk the project tree and build one pending suite per test source file,
/// in traversal order. A matching file with no recognizable test methods
/// still yields a suite with an empty test sequence. An unreadable tree or
/// file fails the whole run.
pub fn discover(root: &Path) -> Result<Vec<Suite>> {
    let pattern = root
        .join("**")
        .join(format!("*{SUITE_SUFFIX}"))
        .to_string_lossy()
        .to_string();

    let mut suites = Vec::new();
    for entry in glob::glob(&pattern).context("invalid discovery pattern")? {
        let path = entry.context("failed to walk project tree")?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read test source {}", path.display()))?;

        let mut suite = Suite::new(suite_name(root, &path));
        for caps in TEST_METHOD_RE.captures_iter(&content) {
            suite.tests.push(TestCase::pending(caps["name"].to_string()));
        }
        suites.push(suite);
    }
    Ok(suites)
}

/// Derive the fully-qualified suite identifier from the file path: the
/// components below the `src` marker (or below the project root when no
/// marker is present), dotted, with the extension stripped.
fn suite_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let components: Vec<&str> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    let below = components
        .iter()
        .position(|c| *c == SOURCE_ROOT)
        .map(|i| &components[i + 1..])
        .unwrap_or(&components[..]);

    let dotted = below.join(".");
    dotted
        .strip_suffix(".java")
        .unwrap_or(&dotted)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    const FOO_TEST: &str = "\
package com.example;

public class FooTest extends ActivityInstrumentationTestCase2<Foo> {
    public void testBar() {
        assertTrue(true);
    }

    public void testBaz() throws Exception {
        assertEquals(1, 2);
    }

    private void helper() {
    }
}
";

    #[test]
    fn finds_suites_and_methods_under_the_source_root() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "src/com/example/FooTest.java", FOO_TEST);

        let suites = discover(dir.path()).unwrap();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].name, "com.example.FooTest");
        let names: Vec<&str> = suites[0].tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["testBar", "testBaz"]);
        assert!(suites[0].tests.iter().all(|t| t.result.is_none()));
    }

    #[test]
    fn suite_with_no_test_methods_is_kept_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "src/com/example/EmptyTest.java",
            "public class EmptyTest {\n    private void helper() {}\n}\n",
        );

        let suites = discover(dir.path()).unwrap();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].name, "com.example.EmptyTest");
        assert!(suites[0].tests.is_empty());
    }

    #[test]
    fn non_matching_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "src/com/example/Helper.java",
            "public class Helper { public void testLooking() {} }\n",
        );

        let suites = discover(dir.path()).unwrap();
        assert!(suites.is_empty());
    }

    #[test]
    fn empty_tree_yields_no_suites() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_source_root_marker_falls_back_to_the_project_root() {
        let dir = tempfile::tempdir().unwrap();
        write_source(
            dir.path(),
            "tests/com/example/BareTest.java",
            "public class BareTest { public void testOne() {} }\n",
        );

        let suites = discover(dir.path()).unwrap();
        assert_eq!(suites[0].name, "tests.com.example.BareTest");
    }

    #[test]
    fn discovery_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), "src/com/example/FooTest.java", FOO_TEST);
        write_source(
            dir.path(),
            "src/com/example/BarTest.java",
            "public class BarTest { public void testOne() {} }\n",
        );

        let first: Vec<String> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        let second: Vec<String> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(first, second);
    }
}
