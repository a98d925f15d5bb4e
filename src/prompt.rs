//! Interactive operator input.
//!
//! Two questions are asked when the command line does not answer them:
//! the directory to scan (a line of text) and the action to run (a single
//! keypress, read in crossterm raw mode so no Enter is needed). When stdin
//! is not a terminal the action is read as the first character of a line.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;

use crate::cli::Action;

/// Ask for the directory to scan.
///
/// Returns `None` on end of input. Surrounding whitespace and matching
/// quotes (as left by drag-and-drop into a terminal) are stripped.
///
/// # Errors
///
/// Returns any error from reading `input` or writing `output`.
pub fn read_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<PathBuf>> {
    write!(output, "Please input your Path: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(clean_path_input(&line))))
}

fn clean_path_input(line: &str) -> &str {
    let trimmed = line.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner;
        }
    }
    trimmed
}

/// Print the action menu.
///
/// # Errors
///
/// Returns any error from writing `output`.
pub fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "You'll now be prompted to choose the action to execute")?;
    writeln!(output, "Simply press the indicated Letter")?;
    writeln!(output, "Write dupelist to file [S]")?;
    writeln!(output, "Delete newer dupes, keep the oldest [D]")?;
    writeln!(
        output,
        "If you just want to quit, press enter or any non indicated button"
    )?;
    output.flush()
}

/// Read the action from a single keypress on the terminal.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode or read.
pub fn read_action() -> io::Result<Action> {
    if !io::stdin().is_terminal() {
        return read_action_line(&mut io::stdin().lock());
    }
    read_key().map(|key| key.map_or(Action::Quit, Action::from_key))
}

/// Read the action as the first character of a line.
///
/// # Errors
///
/// Returns any error from reading `input`.
pub fn read_action_line<R: BufRead>(input: &mut R) -> io::Result<Action> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line
        .trim()
        .chars()
        .next()
        .map_or(Action::Quit, Action::from_key))
}

/// Block until any key is pressed. Does nothing when stdin is not a
/// terminal.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into raw mode or read.
pub fn wait_for_key() -> io::Result<()> {
    if io::stdin().is_terminal() {
        read_key()?;
    }
    Ok(())
}

/// Read one key press in raw mode. Non-character keys map to `None`.
fn read_key() -> io::Result<Option<char>> {
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                break Ok(match key.code {
                    KeyCode::Char(c) => Some(c),
                    _ => None,
                });
            }
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    let _ = terminal::disable_raw_mode();
    println!();
    result
}
