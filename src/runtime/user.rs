//! User interaction operations (line prompts, confirmation, fuzzy picker).

use anyhow::{Context, Result};
use dialoguer::{FuzzySelect, theme::ColorfulTheme};

use super::RealRuntime;

use std::io::{self, BufRead, IsTerminal, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
/// Returns `None` when the input is exhausted.
pub(crate) fn prompt_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let answer = prompt_with_io(&format!("{} [y/N] ", prompt), input, output)?;
    Ok(answer.as_deref().map(is_affirmative).unwrap_or(false))
}

/// `y` or `yes`, any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    let response = answer.trim().to_lowercase();
    response == "y" || response == "yes"
}

impl RealRuntime {
    pub(crate) fn is_interactive_impl(&self) -> bool {
        io::stdin().is_terminal() && console::user_attended()
    }

    pub(crate) fn prompt_impl(&self, prompt: &str) -> Result<Option<String>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        prompt_with_io(prompt, &mut stdin_lock, &mut stdout)
    }

    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, &mut stdin_lock, &mut stdout)
    }

    pub(crate) fn fuzzy_select_impl(
        &self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<usize>> {
        FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()
            .context("Fuzzy picker failed")
    }
}
