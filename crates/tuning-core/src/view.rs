//! Formatting shared by every front-end.

use crate::{controller::Snapshot, event::Target};

/// Observer notified with a fresh snapshot after every state change.
pub trait Presenter {
    fn present(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> Presenter for F {
    fn present(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

pub fn format_temperature(value: f64) -> String {
    format!("{value:.1}")
}

pub fn format_top_p(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_probability(value: f64) -> String {
    format!("{value:.4}")
}

pub fn format_value(target: Target, value: f64) -> String {
    match target {
        Target::Temperature => format_temperature(value),
        Target::TopP => format_top_p(value),
    }
}
