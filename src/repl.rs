//! strsum REPL (Read-Eval-Print Loop)
//!
//! Provides an interactive shell that sums one entry at a time. A custom
//! delimiter declaration on a line of its own continues onto the next line, so
//! `//;` then `1;2;3` is summed as `"//;\n1;2;3"`.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::add_string;
use crate::syntax::delimiter::{DECLARATION_MARKER, LINE_SEPARATOR};

const PROMPT: &str = "strsum> ";
const CONTINUATION_PROMPT: &str = "    -> ";

/// REPL state that persists across entries
#[derive(Debug)]
pub struct ReplState {
    entry_number: usize,
}

impl Default for ReplState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplState {
    pub fn new() -> Self {
        Self { entry_number: 1 }
    }

    /// Sums one complete entry, writing `= N` or the rendered diagnostic.
    pub fn eval_entry<W: Write>(&mut self, input: &str, out: &mut W) -> io::Result<bool> {
        let source_name = format!("<repl:{}>", self.entry_number);
        self.entry_number += 1;
        debug!(source = %source_name, "evaluating entry");

        match add_string(input) {
            Ok(sum) => {
                writeln!(out, "= {}", sum)?;
                Ok(true)
            }
            Err(e) => {
                let report = miette::Report::new(e.with_source_name(&source_name));
                writeln!(out, "{report:?}")?;
                Ok(false)
            }
        }
    }
}

/// Main REPL entry point on stdin/stdout.
pub fn run_repl() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_repl_with(stdin.lock(), &mut stdout.lock())
}

/// Runs the REPL over arbitrary input and output streams.
pub fn run_repl_with<R: BufRead, W: Write>(mut input: R, out: &mut W) -> io::Result<()> {
    writeln!(out, "strsum REPL v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Type :help for help, :quit to exit, :clear to reset")?;
    writeln!(out)?;

    let mut state = ReplState::new();
    let mut buffer = String::new();

    loop {
        if buffer.is_empty() {
            write!(out, "{}", PROMPT)?;
        } else {
            write!(out, "{}", CONTINUATION_PROMPT)?;
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF (Ctrl+D)
            if !buffer.is_empty() {
                state.eval_entry(&buffer, out)?;
            }
            writeln!(out, "\nGoodbye!")?;
            return Ok(());
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if buffer.is_empty() && line.trim_start().starts_with(':') {
            match handle_repl_command(line.trim(), &mut state, out)? {
                ReplCommand::Continue => continue,
                ReplCommand::Quit => return Ok(()),
            }
        }

        if line.trim().is_empty() {
            // Empty line submits whatever is buffered
            if !buffer.is_empty() {
                state.eval_entry(&buffer, out)?;
                buffer.clear();
            }
            continue;
        }

        if !buffer.is_empty() {
            buffer.push(LINE_SEPARATOR);
        }
        buffer.push_str(line);

        if is_complete_entry(&buffer) {
            state.eval_entry(&buffer, out)?;
            buffer.clear();
        }
    }
}

/// REPL command results
enum ReplCommand {
    Continue,
    Quit,
}

/// Handle special REPL commands that start with ':'
fn handle_repl_command<W: Write>(
    command: &str,
    state: &mut ReplState,
    out: &mut W,
) -> io::Result<ReplCommand> {
    match command.to_ascii_lowercase().as_str() {
        ":help" | ":h" => {
            writeln!(out, "strsum REPL Commands:")?;
            writeln!(out, "  :help, :h     Show this help")?;
            writeln!(out, "  :quit, :q     Exit the REPL")?;
            writeln!(out, "  :clear, :c    Reset the entry counter")?;
            writeln!(out)?;
            writeln!(out, "Enter numbers separated by commas or newlines, e.g. 1,2,3.")?;
            writeln!(out, "Declare a custom delimiter on its own line first, e.g. //;")?;
            Ok(ReplCommand::Continue)
        }
        ":quit" | ":q" => {
            writeln!(out, "Goodbye!")?;
            Ok(ReplCommand::Quit)
        }
        ":clear" | ":c" => {
            *state = ReplState::new();
            writeln!(out, "Context cleared.")?;
            Ok(ReplCommand::Continue)
        }
        _ => {
            writeln!(
                out,
                "Unknown command: {}. Type :help for available commands.",
                command
            )?;
            Ok(ReplCommand::Continue)
        }
    }
}

/// An entry is incomplete only while it is a bare delimiter declaration.
fn is_complete_entry(input: &str) -> bool {
    !(input.starts_with(DECLARATION_MARKER) && !input.contains(LINE_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> String {
        let mut out = Vec::new();
        run_repl_with(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_is_complete_entry() {
        assert!(is_complete_entry("1,2"));
        assert!(is_complete_entry("//;\n1;2"));
        assert!(is_complete_entry("-1"));
        assert!(!is_complete_entry("//;"));
        assert!(!is_complete_entry("//"));
    }

    #[test]
    fn sums_each_line() {
        let output = run("1,2,3\n10\n:q\n");
        assert!(output.contains("= 6"));
        assert!(output.contains("= 10"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn declaration_continues_onto_next_line() {
        let output = run("//;\n1;2;3\n");
        assert!(output.contains(CONTINUATION_PROMPT));
        assert!(output.contains("= 6"));
    }

    #[test]
    fn errors_do_not_end_the_session() {
        let output = run("1,-2,-3\n4\n");
        assert!(output.contains("Negative numbers not allowed: -2, -3"));
        assert!(output.contains("<repl:1>"));
        assert!(output.contains("= 4"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let output = run(":frobnicate\n:q\n");
        assert!(output.contains("Unknown command: :frobnicate"));
    }
}
