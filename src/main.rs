mod config;
mod discovery;
mod manifest;
mod models;
mod report;
mod runner;
mod verdict;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;

use config::Config;
use models::RunSummary;

#[tokio::main]
async fn main() -> Result<()> {
    let Some(root) = std::env::args().nth(1) else {
        println!("USAGE: proctor <root of your test project>");
        return Ok(());
    };
    run(PathBuf::from(root)).await
}

/// The whole run is a linear pipeline: discover, then execute and classify
/// each test sequentially in discovery order, then serialize. Environment
/// errors abort before any report is written; per-test outcomes never do.
async fn run(root: PathBuf) -> Result<()> {
    println!("\nBegin proctor\n");

    let config = Config::load(&root);
    // An empty identity is passed through; the external tool surfaces it.
    let package = manifest::package_name(&root).unwrap_or_default();

    let start = Instant::now();
    let mut suites = discovery::discover(&root)?;
    let runner = runner::detect(&config.runner);

    println!("Found {} test suites.", suites.len());
    for suite in &mut suites {
        let suite_name = suite.name.clone();
        print!("Running {} test(s) for {}: ", suite.tests.len(), suite_name);
        std::io::stdout().flush().ok();
        for test in &mut suite.tests {
            let result = runner.run_test(&suite_name, &test.name, &package).await?;
            print!("{}", result.verdict.symbol());
            std::io::stdout().flush().ok();
            test.result = Some(result);
        }
        println!();
    }

    let summary = RunSummary::from_suites(&suites, start.elapsed());
    report::junit::write(&suites, Path::new(&config.report.path))?;

    println!();
    println!("{}", report::format_summary(&summary));
    println!("\nEnd proctor\n");
    Ok(())
}
