//! Line-oriented input scripts for headless replay.
//!
//! Each non-empty line is one command; `#` starts a comment.
//!
//! ```text
//! down 1          # press label key 1
//! tick 33 60      # sixty 33 ms ticks
//! up 1 2000       # release after 2 s
//! scroll -3 fast  # three ticks back with the fast modifier
//! seek 120
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::input::InputEvent;
use crate::keybindings::Key;

/// A parsed script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Deliver an input event
    Event(InputEvent),
    /// Move the navigator directly, as a host seek bar would
    Seek(usize),
}

/// Script parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Script line {line}: {message}")]
pub struct ScriptError {
    /// 1-based line number
    pub line: usize,
    /// What was wrong
    pub message: String,
}

impl ScriptError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        parse_line(line, content, &mut commands)?;
    }
    Ok(commands)
}

fn parse_line(line: usize, content: &str, out: &mut Vec<ScriptCommand>) -> Result<(), ScriptError> {
    let words: Vec<&str> = content.split_whitespace().collect();
    let arg = |i: usize, what: &str| {
        words
            .get(i)
            .copied()
            .ok_or_else(|| ScriptError::new(line, format!("missing {what}")))
    };
    let number = |i: usize, what: &str| -> Result<u64, ScriptError> {
        let raw = arg(i, what)?;
        raw.parse()
            .map_err(|_| ScriptError::new(line, format!("invalid {what} '{raw}'")))
    };
    let key = |i: usize| -> Result<Key, ScriptError> {
        let raw = arg(i, "key")?;
        raw.parse()
            .map_err(|e| ScriptError::new(line, format!("{e}")))
    };

    match words[0] {
        "down" => out.push(ScriptCommand::Event(InputEvent::KeyDown(key(1)?))),
        "up" => {
            let held = if words.len() > 2 { number(2, "hold time")? } else { 0 };
            out.push(ScriptCommand::Event(InputEvent::KeyUp {
                key: key(1)?,
                held: Duration::from_millis(held),
            }));
        }
        "scroll" => {
            let raw = arg(1, "tick count")?;
            let ticks: i32 = raw
                .parse()
                .map_err(|_| ScriptError::new(line, format!("invalid tick count '{raw}'")))?;
            let fast = match words.get(2) {
                None => false,
                Some(&"fast") => true,
                Some(other) => {
                    return Err(ScriptError::new(line, format!("unexpected '{other}'")));
                }
            };
            out.push(ScriptCommand::Event(InputEvent::Scroll { ticks, fast }));
        }
        "tick" => {
            let ms = number(1, "duration")?;
            let count = if words.len() > 2 { number(2, "count")? } else { 1 };
            for _ in 0..count {
                out.push(ScriptCommand::Event(InputEvent::Tick(Duration::from_millis(ms))));
            }
        }
        "seek" => out.push(ScriptCommand::Seek(number(1, "frame")? as usize)),
        other => return Err(ScriptError::new(line, format!("unknown command '{other}'"))),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let script = "\
# label a short run
seek 10
down 1
tick 33 3
up 1 99
scroll -2 fast
down space
";
        let commands = parse_script(script).unwrap();
        assert_eq!(commands.len(), 8);
        assert_eq!(commands[0], ScriptCommand::Seek(10));
        assert_eq!(commands[1], ScriptCommand::Event(InputEvent::KeyDown(Key::Char('1'))));
        assert_eq!(
            commands[5],
            ScriptCommand::Event(InputEvent::KeyUp {
                key: Key::Char('1'),
                held: Duration::from_millis(99)
            })
        );
        assert_eq!(
            commands[6],
            ScriptCommand::Event(InputEvent::Scroll {
                ticks: -2,
                fast: true
            })
        );
        assert_eq!(commands[7], ScriptCommand::Event(InputEvent::KeyDown(Key::Space)));
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_script("down 1\njump 3\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("jump"));

        let err = parse_script("tick abc").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_script("scroll 2 slow").unwrap_err();
        assert!(err.message.contains("slow"));

        assert!(parse_script("down").is_err());
    }
}
