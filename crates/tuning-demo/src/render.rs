use std::fmt::Write;

use itertools::Itertools;
use tuning_core::{
    view::{format_probability, format_value, Presenter},
    Snapshot, Target,
};

use crate::config::{Format, KeyOption, ViewOption};

const ACTIVE: &str = " ← Active";
const EXCLUDED: &str = "excluded";

fn bar(probability: f64, width: usize) -> String {
    let cells = (probability.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{:<width$}", "█".repeat(cells))
}

fn marker(snapshot: &Snapshot, target: Target) -> &'static str {
    match snapshot.state.active_target == target {
        true => ACTIVE,
        false => "",
    }
}

const FORMULA: [&str; 3] = [
    "1. Take original probability (p)",
    "2. Adjust: p' = p^(1/temperature)",
    "3. Normalize results to sum to 1",
];

pub fn hints(snapshot: &Snapshot, keys: &KeyOption) -> String {
    let first = |words: &[String]| words.first().cloned().unwrap_or_else(|| "?".into());
    let decrease = first(&keys.decrease);
    let increase = first(&keys.increase);
    let switch = first(&keys.switch);
    let active = snapshot.state.active_target;
    format!(
        "{decrease}/{increase}: Adjust {active} • {switch}: Switch between sliders • Currently controlling: {active}"
    )
}

/// Render the temperature chart and the top-p table as plain text.
pub fn render_text(snapshot: &Snapshot, options: &ViewOption, keys: &KeyOption) -> String {
    let mut out = String::new();
    let state = &snapshot.state;
    let width = options.bar_width;
    let label_width = snapshot
        .adjusted
        .iter()
        .map(|x| x.label.chars().count())
        .max()
        .unwrap_or_default()
        .max("Token".len());

    if options.hints {
        let _ = writeln!(out, "{}\n", hints(snapshot, keys));
    }

    let _ = writeln!(
        out,
        "Temperature Effects on Token Probabilities{}",
        marker(snapshot, Target::Temperature)
    );
    let _ = writeln!(out, "Prompt: \"{}\"", options.prompt);
    let _ = writeln!(
        out,
        "Temperature: {}",
        format_value(Target::Temperature, state.temperature)
    );
    let _ = writeln!(out, "Formula (simplified):");
    for line in FORMULA {
        let _ = writeln!(out, "  {line}");
    }
    for x in &snapshot.adjusted {
        let _ = writeln!(
            out,
            "  {:<label_width$}  original {} {}",
            x.label,
            bar(x.original_probability, width),
            format_probability(x.original_probability)
        );
        let _ = writeln!(
            out,
            "  {:<label_width$}  adjusted {} {}",
            "",
            bar(x.adjusted_probability, width),
            format_probability(x.adjusted_probability)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Top-p (Nucleus) Sampling{}",
        marker(snapshot, Target::TopP)
    );
    let _ = writeln!(
        out,
        "Top-p threshold: {}",
        format_value(Target::TopP, state.top_p)
    );
    let _ = writeln!(
        out,
        "  {:<label_width$}  {:>11}  {:>14}",
        "Token", "Probability", "Cumulative Sum"
    );
    let rows = snapshot
        .ranked
        .iter()
        .map(|x| {
            let row = format!(
                "  {:<label_width$}  {:>11}  {:>14}",
                x.label,
                format_probability(x.probability),
                format_probability(x.cumulative_probability)
            );
            match x.included {
                true => row,
                false => format!("{row}  {EXCLUDED}"),
            }
        })
        .join("\n");
    let _ = writeln!(out, "{rows}");
    let _ = writeln!(
        out,
        "Tokens are selected if their cumulative probability ≤ top-p threshold"
    );
    out
}

/// Writes every snapshot it is shown to stdout.
#[derive(Debug, Clone)]
pub struct Output {
    pub options: ViewOption,
    pub keys: KeyOption,
}

impl Presenter for Output {
    fn present(&mut self, snapshot: &Snapshot) {
        match self.options.format {
            Format::Text => println!("{}", render_text(snapshot, &self.options, &self.keys)),
            Format::Json => match serde_json::to_string(snapshot) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("failed to serialize snapshot: {err}"),
            },
        }
    }
}
