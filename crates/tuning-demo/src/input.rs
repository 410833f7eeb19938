use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tuning_core::{Event, Target};

use crate::config::KeyOption;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    /// Render the current snapshot again.
    Show,
    Help,
    Quit,
}

/// Parse one input line, e.g. `left`, `drag top_p 0.42` or `focus temperature`.
///
/// Empty lines yield `None`.
pub fn parse(line: &str, keys: &KeyOption) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        verb @ ("drag" | "focus" | "click") => {
            let target: Target = words
                .next()
                .with_context(|| format!("`{verb}` needs a target"))?
                .parse()?;
            match verb {
                "drag" => {
                    let value = words
                        .next()
                        .context("`drag` needs a value")?
                        .parse::<f64>()
                        .context("drag value is not a number")?;
                    Command::Event(Event::SliderDrag { target, value })
                }
                "focus" => Command::Event(Event::SliderFocus { target }),
                _ => Command::Event(Event::PanelClick { target }),
            }
        }
        _ => Command::Event(keys.key(head).into()),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected `{extra}` after `{head}`");
    }
    Ok(Some(command))
}

/// Read the next line, skipping lines that are not valid UTF-8.
///
/// Returns `None` at end of input.
pub async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> std::io::Result<Option<String>> {
    let mut buf = vec![];
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break Ok(None);
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => break Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned())),
            Err(err) => log::warn!("skipped input line: {err}"),
        }
    }
}

pub const HELP: &str = "\
commands:
  left | right          step the active control
  tab                   switch between temperature and top-p
  drag <target> <value> set a control directly (target: temperature | top_p)
  focus <target>        make a control active
  click <target>        same as focus
  show                  render again
  quit                  leave";
