//! Interactive confirmation strategy.
use anyhow::{Context as _, Result};
use std::io::{self, BufRead as _, Write as _};

/// Asks the user a yes/no question.
///
/// Commands hold a `&dyn Prompt` so tests can answer deterministically
/// without a terminal.
pub trait Prompt: Send + Sync + std::fmt::Debug {
    /// Ask `question` and return `true` only for an affirmative answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Reads the answer from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{question} [y/N] ").context("writing prompt")?;
        stdout.flush().context("flushing prompt")?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .context("reading answer")?;
        Ok(is_affirmative(&input))
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// `y` or `yes` in any case; everything else, including empty input, is "no".
#[must_use]
pub fn is_affirmative(input: &str) -> bool {
    let answer = input.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
