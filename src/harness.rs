//! strsum Test Harness Library Module
//!
//! Provides reusable discovery, execution, and reporting for YAML-based
//! regression suites. Each case feeds one input through [`add_string`] and
//! compares the outcome with an expected sum or an expected failure.
//!
//! # Test Format
//!
//! ```yaml
//! - name: "test name"
//!   input: "1,2,3"
//!   expected: 6                                 # for success tests
//!   expect_error: "error substring"             # for error tests
//!   expect_error_code: "strsum::negative_value" # for specific error code tests
//!   skip: false                                 # optional, defaults to false
//!   only: false                                 # optional, defaults to false
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use strsum::harness::{run_all_tests, TestConfig};
//!
//! let config = TestConfig::default();
//! let summary = run_all_tests(None, &config);
//! if summary.failed > 0 {
//!     std::process::exit(1);
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::add_string;
use crate::diagnostics::SumError;

// =============================================================================
// CORE TYPES
// =============================================================================

/// Represents the result of executing a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Pass {
        file: String,
        name: String,
    },
    Fail {
        file: String,
        name: String,
        error: String,
    },
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

impl TestResult {
    pub fn name(&self) -> &str {
        match self {
            TestResult::Pass { name, .. }
            | TestResult::Fail { name, .. }
            | TestResult::Skipped { name, .. } => name,
        }
    }
}

/// Represents a single YAML test case.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub input: String,
    pub expected: Option<i64>,
    pub expect_error: Option<String>,
    pub expect_error_code: Option<String>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub only: bool,
}

/// Configuration for test execution and reporting.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub test_root: PathBuf,
    pub use_colors: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            test_root: PathBuf::from("tests/suites"),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl TestConfig {
    fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }
}

/// Pass/fail/skip counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

// =============================================================================
// TEST DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under the given root directory.
///
/// The list is sorted so runs are deterministic.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Load and parse test cases from a YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str::<Vec<TestCase>>(&content)
        .map_err(|e| format!("Failed to parse YAML in {}: {}", path.display(), e))
}

/// Helper for test skipping logic. `filter` is expected in lowercase.
pub fn skip_reason(case: &TestCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(f) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

// =============================================================================
// TEST EXECUTION
// =============================================================================

/// What a case expects to happen.
enum Expectation<'a> {
    Sum(i64),
    Failure {
        message: Option<&'a str>,
        code: Option<&'a str>,
    },
}

fn expectation(case: &TestCase) -> Result<Expectation<'_>, String> {
    let expects_error = case.expect_error.is_some() || case.expect_error_code.is_some();
    match (case.expected, expects_error) {
        (Some(sum), false) => Ok(Expectation::Sum(sum)),
        (None, true) => Ok(Expectation::Failure {
            message: case.expect_error.as_deref(),
            code: case.expect_error_code.as_deref(),
        }),
        (Some(_), true) => Err("Case declares both 'expected' and an expected error".into()),
        (None, false) => {
            Err("Case declares neither 'expected' nor 'expect_error'/'expect_error_code'".into())
        }
    }
}

/// Check whether an error satisfies the expected message substring and code.
fn matches_error(error: &SumError, message: Option<&str>, code: Option<&str>) -> bool {
    let message_ok = message.map_or(true, |m| error.to_string().contains(m));
    let code_ok = code.map_or(true, |c| error.error_code() == c);
    message_ok && code_ok
}

fn describe_error(error: &SumError) -> String {
    format!("[{}] {}", error.error_code(), error)
}

/// Sums the case input and describes any deviation from `expect`.
fn check_outcome(case: &TestCase, expect: Expectation<'_>) -> Option<String> {
    let outcome = add_string(&case.input);
    debug!(case = %case.name, ?outcome, "ran test case");

    match (expect, outcome) {
        (Expectation::Sum(expected), Ok(actual)) if expected == actual => None,
        (Expectation::Sum(expected), Ok(actual)) => Some(format!(
            "Sum did not match expected\n  Expected: {}\n  Actual:   {}",
            expected, actual
        )),
        (Expectation::Sum(expected), Err(e)) => Some(format!(
            "Expected sum {} but summation failed: {}",
            expected,
            describe_error(&e)
        )),
        (Expectation::Failure { message, code }, Err(e)) => {
            if matches_error(&e, message, code) {
                None
            } else {
                Some(format!(
                    "Error did not match expected\n  Expected: {}\n  Actual:   {}",
                    [code, message].into_iter().flatten().collect::<Vec<_>>().join(" "),
                    describe_error(&e)
                ))
            }
        }
        (Expectation::Failure { message, code }, Ok(actual)) => Some(format!(
            "Expected error '{}' but summation succeeded with result: {}",
            code.or(message).unwrap_or_default(),
            actual
        )),
    }
}

/// Execute a single test case.
pub fn run_test_case(file: String, case: TestCase) -> TestResult {
    let failure = match expectation(&case) {
        Ok(expect) => check_outcome(&case, expect),
        Err(error) => Some(error),
    };

    match failure {
        None => TestResult::Pass {
            file,
            name: case.name,
        },
        Some(error) => TestResult::Fail {
            file,
            name: case.name,
            error,
        },
    }
}

/// Runs every case from every suite under `config.test_root`, without reporting.
pub fn collect_results(filter: Option<&str>, config: &TestConfig) -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut all_cases = Vec::new();
    let mut has_only_tests = false;

    for file_path in discover_yaml_files(&config.test_root) {
        let file_name = file_path.display().to_string();
        match load_test_cases(&file_path) {
            Ok(cases) => {
                has_only_tests |= cases.iter().any(|case| case.only);
                all_cases.extend(cases.into_iter().map(|case| (file_name.clone(), case)));
            }
            Err(error) => {
                warn!(file = %file_name, "could not load suite");
                results.push(TestResult::Fail {
                    file: file_name,
                    name: "<load>".to_string(),
                    error,
                });
            }
        }
    }

    results.extend(all_cases.into_iter().map(|(file, case)| {
        match skip_reason(&case, has_only_tests, filter) {
            Some(reason) => TestResult::Skipped {
                file,
                name: case.name,
                reason,
            },
            None => run_test_case(file, case),
        }
    }));
    results
}

pub fn summarize(results: &[TestResult]) -> TestSummary {
    results
        .iter()
        .fold(TestSummary::default(), |mut summary, r| {
            match r {
                TestResult::Pass { .. } => summary.passed += 1,
                TestResult::Fail { .. } => summary.failed += 1,
                TestResult::Skipped { .. } => summary.skipped += 1,
            }
            summary
        })
}

// =============================================================================
// REPORTING AND OUTPUT
// =============================================================================

fn write_tag<W: WriteColor>(out: &mut W, tag: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{}", tag)?;
    out.reset()
}

/// Writes per-case lines, a summary, and the list of failures.
pub fn report_results<W: WriteColor>(results: &[TestResult], out: &mut W) -> io::Result<()> {
    for r in results {
        match r {
            TestResult::Pass { file, name } => {
                write_tag(out, "PASS", Color::Green)?;
                writeln!(out, ": {} [{}]", name, file)?;
            }
            TestResult::Fail { file, name, error } => {
                write_tag(out, "FAIL", Color::Red)?;
                writeln!(out, ": {} [{}]", name, file)?;
                writeln!(out, "  Error: {}", error)?;
            }
            TestResult::Skipped { file, name, reason } => {
                write_tag(out, "SKIP", Color::Yellow)?;
                writeln!(out, ": {} [{}] ({})", name, file, reason)?;
            }
        }
    }

    let summary = summarize(results);
    write!(out, "\nTest summary: total {}, ", summary.total())?;
    write_tag(out, "passed", Color::Green)?;
    write!(out, " {}, ", summary.passed)?;
    write_tag(out, "failed", Color::Red)?;
    write!(out, " {}, ", summary.failed)?;
    write_tag(out, "skipped", Color::Yellow)?;
    writeln!(out, " {}", summary.skipped)?;

    if summary.failed > 0 {
        writeln!(out, "\nFailed tests:")?;
        for r in results {
            if let TestResult::Fail { name, .. } = r {
                writeln!(out, "  - {}", name)?;
            }
        }
    }
    Ok(())
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Run all tests with optional filtering, report to stdout, and return counts.
pub fn run_all_tests(filter: Option<&str>, config: &TestConfig) -> TestSummary {
    let results = collect_results(filter, config);
    let mut stdout = StandardStream::stdout(config.color_choice());
    if let Err(e) = report_results(&results, &mut stdout) {
        warn!(error = %e, "failed to write test report");
    }
    summarize(&results)
}

/// Run tests with command line arguments: `[filter]`.
pub fn run_tests_with_args(args: &[String]) -> TestSummary {
    let filter = args.first().map(|f| f.to_lowercase());
    run_all_tests(filter.as_deref(), &TestConfig::default())
}
