pub mod am;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::RunnerConfig;
use crate::models::TestResult;

/// Trait for tool-specific instrumentation launchers.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Run one test method out of process and classify its captured output.
    ///
    /// A launch failure (the tool itself cannot be started) is an
    /// environment error for the whole run, never a per-test verdict.
    async fn run_test(&self, suite: &str, method: &str, package: &str) -> Result<TestResult>;

    /// Display name for this runner (e.g., "am instrument").
    #[allow(dead_code)]
    fn name(&self) -> &str;
}

/// Construct the runner for the configured instrumentation tool.
pub fn detect(config: &RunnerConfig) -> Arc<dyn TestRunner> {
    Arc::new(am::AmInstrumentRunner::new(config))
}
