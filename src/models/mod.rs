pub mod result;
pub mod suite;

pub use result::{Diagnostic, RunSummary, TestResult, Verdict};
pub use suite::{Suite, TestCase};
