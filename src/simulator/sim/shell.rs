use crate::error::SimError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Step(u64), // Step N cycles
  Start,
  Reset,
  Continue,
  Quit,
}

const HELP: &str = "Use Enter to step, 'si 100' to step N cycles, 's' to start, 'r' to reset, 'c' to continue, 'q' to quit";

/// Parse one shell line. An empty line steps once.
pub fn parse_command(line: &str) -> Result<Command, String> {
  let trimmed = line.trim();
  if trimmed.is_empty() {
    return Ok(Command::Step(1));
  }

  if let Some(rest) = trimmed.strip_prefix("si") {
    let num_str = rest.trim();
    if num_str.is_empty() {
      return Err("'si' requires a number, e.g., 'si 100'".to_string());
    }
    return match num_str.parse::<u64>() {
      Ok(n) if n > 0 => Ok(Command::Step(n)),
      Ok(_) => Err("step count must be greater than 0".to_string()),
      Err(e) => Err(format!("invalid number '{}': {}", num_str, e)),
    };
  }

  match trimmed {
    "s" => Ok(Command::Start),
    "r" => Ok(Command::Reset),
    "c" => Ok(Command::Continue),
    "q" => Ok(Command::Quit),
    other => Err(format!("Unknown command: '{}'. {}", other, HELP)),
  }
}

pub struct Shell {
  editor: DefaultEditor,
}

impl Shell {
  pub fn new() -> Result<Self, SimError> {
    Ok(Self {
      editor: DefaultEditor::new()?,
    })
  }

  pub fn help() -> &'static str {
    HELP
  }

  /// Block until a valid command is entered. Ctrl-C and Ctrl-D quit.
  pub fn read_command(&mut self) -> Result<Command, SimError> {
    loop {
      match self.editor.readline("(fft) ") {
        Ok(line) => {
          let trimmed = line.trim();
          if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
          }
          match parse_command(trimmed) {
            Ok(cmd) => return Ok(cmd),
            Err(msg) => eprintln!("Error: {}", msg),
          }
        },
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Command::Quit),
        Err(err) => return Err(err.into()),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse_command(""), Ok(Command::Step(1)));
    assert_eq!(parse_command("  si 25 "), Ok(Command::Step(25)));
    assert_eq!(parse_command("s"), Ok(Command::Start));
    assert_eq!(parse_command("r"), Ok(Command::Reset));
    assert_eq!(parse_command("c"), Ok(Command::Continue));
    assert_eq!(parse_command("q"), Ok(Command::Quit));
  }

  #[test]
  fn test_parse_rejects_bad_input() {
    assert!(parse_command("si").is_err());
    assert!(parse_command("si 0").is_err());
    assert!(parse_command("si x").is_err());
    assert!(parse_command("run").is_err());
  }
}
