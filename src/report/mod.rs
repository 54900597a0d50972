pub mod junit;

use crate::models::RunSummary;

/// Format the end-of-run console block. Deterministic, unit-testable;
/// printing is left to the caller.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Total tests: {}\nTotal failures: {} ({:.1}%)\nTotal errors: {} ({:.1}%)\nTotal time: {} seconds",
        summary.tests,
        summary.failures,
        summary.failure_pct(),
        summary.errors,
        summary.error_pct(),
        summary.duration_ms / 1000,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_block_reports_totals_and_percentages() {
        let summary = RunSummary {
            tests: 2,
            failures: 1,
            errors: 0,
            duration_ms: 3400,
        };
        let block = format_summary(&summary);
        assert_eq!(
            block,
            "Total tests: 2\nTotal failures: 1 (50.0%)\nTotal errors: 0 (0.0%)\nTotal time: 3 seconds"
        );
    }

    #[test]
    fn empty_run_reports_zero_percentages() {
        let block = format_summary(&RunSummary::default());
        assert!(block.contains("Total failures: 0 (0.0%)"));
        assert!(block.contains("Total errors: 0 (0.0%)"));
    }
}
