use derivative::Derivative;
use serde::{Deserialize, Serialize};
use tuning_core::Key;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewOption,
    pub keys: KeyOption,
    pub log: LogOption,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Format {
    /// Bar chart and nucleus table.
    #[default]
    Text,
    /// One JSON snapshot per line.
    Json,
}

#[derive(Debug, Derivative, Clone, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct ViewOption {
    /// Prompt shown above the temperature chart.
    #[derivative(Default(value = "\"The leaves fall in the...\".into()"))]
    pub prompt: String,
    /// Width in cells of a bar at probability 1.
    #[derivative(Default(value = "40"))]
    pub bar_width: usize,
    pub format: Format,
    /// Print the keyboard help banner.
    #[derivative(Default(value = "true"))]
    pub hints: bool,
}

/// Input words bound to the controller keys.
#[derive(Debug, Derivative, Clone, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct KeyOption {
    #[derivative(Default(value = "vec![\"left\".into(), \"h\".into()]"))]
    pub decrease: Vec<String>,
    #[derivative(Default(value = "vec![\"right\".into(), \"l\".into()]"))]
    pub increase: Vec<String>,
    #[derivative(Default(value = "vec![\"tab\".into()]"))]
    pub switch: Vec<String>,
}

impl KeyOption {
    pub fn key(&self, word: &str) -> Key {
        let matches = |words: &[String]| words.iter().any(|x| x.eq_ignore_ascii_case(word));
        if matches(&self.decrease) {
            Key::ArrowLeft
        } else if matches(&self.increase) {
            Key::ArrowRight
        } else if matches(&self.switch) {
            Key::Tab
        } else {
            Key::Other(word.into())
        }
    }
}

#[derive(Debug, Derivative, Clone, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct LogOption {
    /// One of `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[derivative(Default(value = "\"info\".into()"))]
    pub level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.view.prompt, "The leaves fall in the...");
        assert_eq!(config.view.bar_width, 40);
        assert_eq!(config.view.format, Format::Text);
        assert!(config.view.hints);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = toml::from_str(
            r#"
            [view]
            format = "Json"

            [keys]
            switch = ["tab", "s"]
            "#,
        )
        .unwrap();
        assert_eq!(config.view.format, Format::Json);
        assert_eq!(config.view.bar_width, 40);
        assert_eq!(config.keys.key("S"), Key::Tab);
        assert_eq!(config.keys.key("h"), Key::ArrowLeft);
    }

    #[test]
    fn unbound_words_are_other_keys() {
        let keys = KeyOption::default();
        assert_eq!(keys.key("right"), Key::ArrowRight);
        assert_eq!(keys.key("enter"), Key::Other("enter".into()));
    }
}
