use std::time::{Duration, SystemTime};

use super::suite::Suite;

/// Classified outcome of one test invocation. Failed carries the assertion
/// diagnostic, Errored carries the uncaught-condition diagnostic; a test is
/// never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed(Diagnostic),
    Errored(Diagnostic),
}

/// Human-readable message plus the raw trace text it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub trace: String,
}

impl Verdict {
    /// Progress character printed to the console as each test completes.
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Passed => ".",
            Verdict::Failed(_) => "F",
            Verdict::Errored(_) => "E",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::Errored(_))
    }
}

/// Timed, classified outcome of one test run. Immutable once constructed;
/// a re-run produces a new value rather than mutating this one.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub test_name: String,
    pub started: SystemTime,
    pub duration_ms: u64,
    pub verdict: Verdict,
}

/// Run-level totals folded over the final suite tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub tests: usize,
    pub failures: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn from_suites(suites: &[Suite], elapsed: Duration) -> Self {
        let mut summary = RunSummary {
            duration_ms: elapsed.as_millis() as u64,
            ..Default::default()
        };
        for suite in suites {
            summary.tests += suite.total();
            summary.failures += suite.failures();
            summary.errors += suite.errors();
        }
        summary
    }

    pub fn failure_pct(&self) -> f64 {
        percentage(self.failures, self.tests)
    }

    pub fn error_pct(&self) -> f64 {
        percentage(self.errors, self.tests)
    }
}

/// `count / total * 100`, defined as 0 when total is 0.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestCase;

    fn result(name: &str, verdict: Verdict) -> TestResult {
        TestResult {
            test_name: name.to_string(),
            started: SystemTime::UNIX_EPOCH,
            duration_ms: 250,
            verdict,
        }
    }

    fn diag(message: &str) -> Diagnostic {
        Diagnostic {
            message: message.to_string(),
            trace: String::new(),
        }
    }

    #[test]
    fn symbols_map_to_verdicts() {
        assert_eq!(Verdict::Passed.symbol(), ".");
        assert_eq!(Verdict::Failed(diag("x")).symbol(), "F");
        assert_eq!(Verdict::Errored(diag("x")).symbol(), "E");
    }

    #[test]
    fn summary_folds_all_suites() {
        let mut a = Suite::new("com.example.FooTest".into());
        a.tests.push(TestCase {
            name: "testBar".into(),
            result: Some(result("testBar", Verdict::Passed)),
        });
        a.tests.push(TestCase {
            name: "testBaz".into(),
            result: Some(result("testBaz", Verdict::Failed(diag("expected 1")))),
        });
        let mut b = Suite::new("com.example.QuuxTest".into());
        b.tests.push(TestCase {
            name: "testQuux".into(),
            result: Some(result("testQuux", Verdict::Errored(diag("boom")))),
        });

        let summary = RunSummary::from_suites(&[a, b], Duration::from_secs(2));
        assert_eq!(summary.tests, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.duration_ms, 2000);
        assert!(summary.failures + summary.errors <= summary.tests);
    }

    #[test]
    fn half_failed_run_is_fifty_percent() {
        let summary = RunSummary {
            tests: 2,
            failures: 1,
            errors: 0,
            duration_ms: 0,
        };
        assert_eq!(summary.failure_pct(), 50.0);
        assert_eq!(summary.error_pct(), 0.0);
    }

    #[test]
    fn empty_run_has_zero_percentages() {
        let summary = RunSummary::default();
        assert_eq!(summary.failure_pct(), 0.0);
        assert_eq!(summary.error_pct(), 0.0);
    }
}
