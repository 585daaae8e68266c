//! The terminal collaborator: the session only prompts for lines and prints text.

use std::io::{BufRead, Write};

use crate::error::Result;

pub trait Console {
  /// Show `message` and read one line. `None` when input is exhausted.
  fn prompt(&mut self, message: &str) -> Result<Option<String>>;
  fn say(&mut self, text: &str) -> Result<()>;
}

impl<C: Console + ?Sized> Console for &mut C {
  fn prompt(&mut self, message: &str) -> Result<Option<String>> {
    (**self).prompt(message)
  }
  fn say(&mut self, text: &str) -> Result<()> {
    (**self).say(text)
  }
}

/// Line-oriented console over any reader/writer pair (stdin/stdout in the binary).
pub struct LineConsole<I, O> {
  input: I,
  output: O,
}

impl<I: BufRead, O: Write> LineConsole<I, O> {
  pub fn new(input: I, output: O) -> Self {
    Self { input, output }
  }

  #[allow(dead_code)]
  pub fn output(&self) -> &O {
    &self.output
  }
}

impl<I: BufRead, O: Write> Console for LineConsole<I, O> {
  fn prompt(&mut self, message: &str) -> Result<Option<String>> {
    write!(self.output, "{message}")?;
    self.output.flush()?;
    let mut buf = Vec::new();
    if self.input.read_until(b'\n', &mut buf)? == 0 {
      return Ok(None);
    }
    // Undecodable bytes become U+FFFD and fail whatever check the caller applies.
    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
  }

  fn say(&mut self, text: &str) -> Result<()> {
    writeln!(self.output, "{text}")?;
    Ok(())
  }
}
