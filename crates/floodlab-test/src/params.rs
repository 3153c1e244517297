//! Regression test parameters and operations

use floodlab_core::Grid;
use std::fmt::Debug;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values with expectations (default)
    #[default]
    Compare,
    /// Compare and additionally dump grids to stderr
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "watershed")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (compare or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "watershed")
    ///
    /// # Returns
    ///
    /// A new `RegParams` instance configured based on the `REGTEST_MODE`
    /// environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Check a boolean condition
    ///
    /// Shorthand for `compare_values(1.0, if cond { 1.0 } else { 0.0 }, 0.0)`
    /// with a description in the failure message.
    pub fn check(&mut self, cond: bool, what: &str) -> bool {
        self.index += 1;
        if !cond {
            let msg = format!(
                "Failure in {}_reg: check for index {} failed: {}",
                self.test_name, self.index, what
            );
            self.fail(msg);
        }
        cond
    }

    /// Compare two grids for exact equality
    ///
    /// # Returns
    ///
    /// `true` if shapes and samples are identical, `false` otherwise.
    pub fn compare_grids<T: Copy + PartialEq + Debug>(
        &mut self,
        expected: &Grid<T>,
        actual: &Grid<T>,
    ) -> bool {
        self.index += 1;

        if expected.dims() != actual.dims() {
            let msg = format!(
                "Failure in {}_reg: grid comparison for index {} - shape mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dims(),
                actual.dims()
            );
            self.fail(msg);
            return false;
        }

        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);

        if let Some(i) = mismatch {
            let coord = expected.shape().coord_of(i).unwrap_or_default();
            let msg = format!(
                "Failure in {}_reg: grid comparison for index {} - mismatch at {:?}: \
                 expected {:?}, got {:?}",
                self.test_name,
                self.index,
                coord,
                expected.data()[i],
                actual.data()[i]
            );
            self.fail(msg);
            return false;
        }

        true
    }

    /// Print a 1-D or 2-D grid to stderr when in display mode
    pub fn show<T: Copy + Debug>(&self, name: &str, grid: &Grid<T>) {
        if !self.display() {
            return;
        }
        eprintln!("  {} {:?}:", name, grid.dims());
        let width = grid.dims()[0].max(1);
        for row in grid.data().chunks(width) {
            eprintln!("    {:?}", row);
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
