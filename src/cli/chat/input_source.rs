#[cfg(test)]
use std::collections::VecDeque;

use eyre::Result;
use rustyline::error::ReadlineError;
use rustyline::Editor;
use tracing::debug;

use super::prompt;

/// Where user lines come from: the interactive line editor, or a fixed
/// script of lines (used by tests).
pub struct InputSource(Inner);

enum Inner {
    Readline(Editor<()>),
    #[cfg(test)]
    Mock { lines: VecDeque<String> },
}

impl InputSource {
    pub fn new() -> Result<Self> {
        Ok(Self(Inner::Readline(prompt::rl()?)))
    }

    #[cfg(test)]
    pub fn new_mock<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Inner::Mock {
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    /// Next line without its newline, or `None` once input has ended
    /// (end of file or interrupt).
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match &mut self.0 {
            Inner::Readline(rl) => match rl.readline(prompt) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str());
                    Ok(Some(line))
                }
                Err(ReadlineError::Eof) => {
                    debug!("End of input");
                    Ok(None)
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("Input interrupted");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            },
            #[cfg(test)]
            Inner::Mock { lines } => Ok(lines.pop_front()),
        }
    }
}
