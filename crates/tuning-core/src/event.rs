use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the two tunable scalars.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    #[default]
    Temperature,
    TopP,
}

impl Target {
    pub fn toggle(self) -> Self {
        match self {
            Target::Temperature => Target::TopP,
            Target::TopP => Target::Temperature,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Target::Temperature => "Temperature",
            Target::TopP => "Top-p",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target `{0}`, expected `temperature` or `top_p`")]
pub struct ParseTargetError(String);

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" | "temp" | "t" => Ok(Target::Temperature),
            "top_p" | "top-p" | "topp" | "p" => Ok(Target::TopP),
            _ => Err(ParseTargetError(s.into())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Decrease,
    Increase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Tab,
    /// Any other key; ignored.
    Other(String),
}

/// Raw input reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Event {
    KeyPress { key: Key },
    /// A pointer drag on a slider; the slider becomes active and takes `value` unquantized.
    SliderDrag { target: Target, value: f64 },
    SliderFocus { target: Target },
    /// A click anywhere on a control's panel.
    PanelClick { target: Target },
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        Self::KeyPress { key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_is_identity() {
        for target in [Target::Temperature, Target::TopP] {
            assert_ne!(target.toggle(), target);
            assert_eq!(target.toggle().toggle(), target);
        }
    }

    #[test]
    fn parse_target() {
        assert_eq!("temperature".parse::<Target>(), Ok(Target::Temperature));
        assert_eq!("Top-P".parse::<Target>(), Ok(Target::TopP));
        assert_eq!("p".parse::<Target>(), Ok(Target::TopP));
        assert!("top_k".parse::<Target>().is_err());
    }
}
