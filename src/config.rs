use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Controls how the external instrumentation tool is invoked.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Binary used to reach the device (the front of the command line).
    /// Example: "adb" or "/opt/android/platform-tools/adb"
    pub command: String,

    /// Instrumentation runner class the target package is instrumented with.
    pub instrumentation: String,

    /// Bounded wait per test, in seconds. When set, a test exceeding it has
    /// its process group killed and is recorded as Errored with a synthetic
    /// diagnostic. When unset there is no limit: a hung tool hangs the run.
    pub timeout_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: "adb".to_string(),
            instrumentation: "android.test.InstrumentationTestRunner".to_string(),
            timeout_secs: None,
        }
    }
}

/// Controls where the report document is written.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: "TEST-all.xml".to_string(),
        }
    }
}

impl Config {
    /// Load `proctor.toml` from the project root, falling back to defaults
    /// if absent or invalid.
    pub fn load(root: &Path) -> Self {
        let path = root.join("proctor.toml");
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_default()
    }
}
