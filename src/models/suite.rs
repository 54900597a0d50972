use super::result::TestResult;

/// The set of test methods declared in one discovered test file, identified
/// by its namespaced name. The test sequence is populated at discovery time
/// and never resized afterward; counts are computed from the attached
/// results, not stored.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: String,
    pub tests: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: String) -> Self {
        Self {
            name,
            tests: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.tests.len()
    }

    pub fn failures(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.result.as_ref().is_some_and(|r| r.verdict.is_failure()))
            .count()
    }

    pub fn errors(&self) -> usize {
        self.tests
            .iter()
            .filter(|t| t.result.as_ref().is_some_and(|r| r.verdict.is_error()))
            .count()
    }

    /// Sum of the elapsed times of all completed tests, in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.tests
            .iter()
            .filter_map(|t| t.result.as_ref().map(|r| r.duration_ms))
            .sum()
    }
}

/// One named test method within a suite. The result is absent until the
/// executor attaches it, exactly once, after the subprocess completes.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub result: Option<TestResult>,
}

impl TestCase {
    pub fn pending(name: String) -> Self {
        Self { name, result: None }
    }
}
