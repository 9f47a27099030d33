// strsum YAML suite runner: uses the shared harness module
// Usage: cargo run --bin test_runner [filter]

use std::env;
use strsum::harness;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let summary = harness::run_tests_with_args(&args);
    if summary.failed > 0 {
        std::process::exit(1);
    }
}
