//! Console rendering for the interactive loop and build commands.
//!
//! Error text can embed content from external services, so everything
//! that reaches the terminal through [`sanitize`] first has its control
//! characters stripped.

use std::io::{self, Write};

use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use sage_model::GenerationError;
use sage_rag::RagError;
use sage_rag::pipeline::BuildReport;

use crate::session::{Answer, TurnError};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const OK: Color = Color::Green;
    const WARN: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const SOURCE: Color = Color::Cyan;
}

/// Strip control characters from text before display.
///
/// Line breaks and tabs pass through; everything else in the control
/// range (including ANSI escape introducers) is dropped.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !c.is_control() || *c == '\n' || *c == '\t').collect()
}

/// Print the startup banner.
pub fn banner(model: &str, chunks: usize) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::HEADER),
        Print("sage"),
        ResetColor,
        Print(" - your study materials, answering back\n"),
        SetForegroundColor(Colors::DIM),
        Print(format!("Model: {model} | Indexed chunks: {chunks}\n")),
        Print("Type 'quit', 'exit', or 'bye' to leave. Ctrl+C works too.\n"),
        Print("---\n"),
        ResetColor,
    )?;
    stdout.flush()
}

/// Nudge shown when the user submits an empty line.
pub fn empty_input_nudge() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(Colors::WARN), Print("Please ask a question.\n"), ResetColor)
}

/// Shown while the answer is being generated.
pub fn thinking() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(Colors::DIM), Print("Thinking...\n"), ResetColor)?;
    stdout.flush()
}

/// Farewell on any exit path.
pub fn goodbye() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::OK),
        Print("Goodbye! Happy studying.\n"),
        ResetColor,
    )
}

/// Render an answer with its source citations.
pub fn answer(answer: &Answer) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Print("\nAnswer:\n"), Print(sanitize(&answer.text)), Print("\n\n"))?;

    if answer.sources.is_empty() {
        execute!(
            stdout,
            SetForegroundColor(Colors::WARN),
            Print("No sources retrieved; this may be outside your materials.\n"),
            ResetColor,
        )?;
    } else {
        execute!(stdout, Print("Sources:\n"))?;
        for (i, source) in answer.sources.iter().enumerate() {
            let page = match source.page {
                Some(page) => format!(", page {page}"),
                None => String::new(),
            };
            execute!(
                stdout,
                SetForegroundColor(Colors::SOURCE),
                Print(format!("  {}. {}{}\n", i + 1, sanitize(&source.source), page)),
                ResetColor,
            )?;
        }
    }

    execute!(stdout, SetForegroundColor(Colors::DIM), Print("-".repeat(50)), Print("\n"), ResetColor)?;
    stdout.flush()
}

/// Report a failed turn and the most useful next step, then let the loop
/// continue.
pub fn turn_error(err: &TurnError) -> io::Result<()> {
    let hint = match err {
        TurnError::Generation(GenerationError::Unavailable { .. }) => {
            "Start the model backend with `ollama serve` and make sure the model is pulled."
        }
        TurnError::Rag(RagError::IndexUnavailable) => {
            "No index has been built yet. Run `sage index` first."
        }
        TurnError::Rag(RagError::Embedding { .. }) => {
            "Is Ollama running (`ollama serve`)? Is the embedding model pulled \
             (`ollama pull all-minilm`)?"
        }
        _ => "Try another question, or restart sage.",
    };
    error_with_hint(&err.to_string(), hint)
}

/// Print a sanitized error line followed by a remediation hint.
pub fn error_with_hint(message: &str, hint: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::ERROR),
        Print(format!("Error: {}\n", sanitize(message))),
        ResetColor,
        SetForegroundColor(Colors::WARN),
        Print(format!("Hint: {hint}\n\n")),
        ResetColor,
    )?;
    stdout.flush()
}

/// A progress line for multi-step commands.
pub fn step(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, SetForegroundColor(Colors::DIM), Print(format!("{message}\n")), ResetColor)?;
    stdout.flush()
}

/// Summary printed after a successful index build.
pub fn build_report(report: &BuildReport) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::OK),
        Print(format!(
            "Indexed {} chunks from {} documents in {:.2}s\n",
            report.chunks,
            report.documents,
            report.elapsed.as_secs_f64(),
        )),
        ResetColor,
    )?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_ansi_escapes_and_control_bytes() {
        let hostile = "\u{1b}[31mred\u{1b}[0m and \u{7}bell";
        assert_eq!(sanitize(hostile), "[31mred[0m and bell");
    }

    #[test]
    fn sanitize_keeps_newlines_and_tabs() {
        assert_eq!(sanitize("line one\n\tindented"), "line one\n\tindented");
    }
}
