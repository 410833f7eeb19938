use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::{
    distribution::Distribution,
    event::{Direction, Event, Key, Target},
    sampler::{self, AdjustedTokenProbability, RankedTokenProbability},
};

/// Domain and keyboard step grid of one tunable scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Grid points per unit; stepped values are rounded to `1 / resolution`.
    pub resolution: f64,
}

impl Bounds {
    pub const TEMPERATURE: Self = Self {
        min: 0.1,
        max: 1.0,
        step: 0.1,
        resolution: 10.0,
    };
    pub const TOP_P: Self = Self {
        min: 0.0,
        max: 1.0,
        step: 0.05,
        resolution: 20.0,
    };

    pub fn of(target: Target) -> Self {
        match target {
            Target::Temperature => Self::TEMPERATURE,
            Target::TopP => Self::TOP_P,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Move one step, clamp to the domain, then snap to the grid.
    pub fn step(&self, value: f64, direction: Direction) -> f64 {
        let value = match direction {
            Direction::Decrease => self.min.max(value - self.step),
            Direction::Increase => self.max.min(value + self.step),
        };
        (value * self.resolution).round() / self.resolution
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
pub struct InteractionState {
    #[derivative(Default(value = "1.0"))]
    pub temperature: f64,
    #[derivative(Default(value = "0.9"))]
    pub top_p: f64,
    pub active_target: Target,
}

impl InteractionState {
    pub fn value(&self, target: Target) -> f64 {
        match target {
            Target::Temperature => self.temperature,
            Target::TopP => self.top_p,
        }
    }

    fn value_mut(&mut self, target: Target) -> &mut f64 {
        match target {
            Target::Temperature => &mut self.temperature,
            Target::TopP => &mut self.top_p,
        }
    }
}

/// Everything the presentation layer needs, always consistent with `state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: InteractionState,
    pub adjusted: Vec<AdjustedTokenProbability>,
    pub ranked: Vec<RankedTokenProbability>,
}

/// Owns the interaction state of one view and recomputes derived data on every write.
#[derive(Debug, Clone)]
pub struct Controller {
    distribution: Distribution,
    snapshot: Snapshot,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Distribution::leaves())
    }
}

impl Controller {
    pub fn new(distribution: Distribution) -> Self {
        let state = InteractionState::default();
        let adjusted = sampler::temperature::rescale(&distribution, state.temperature);
        let ranked = sampler::select(&distribution, state.top_p);
        Self {
            distribution,
            snapshot: Snapshot {
                state,
                adjusted,
                ranked,
            },
        }
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &InteractionState {
        &self.snapshot.state
    }

    pub fn set_active_target(&mut self, target: Target) -> &Snapshot {
        if self.snapshot.state.active_target != target {
            log::debug!("active target: {target}");
        }
        self.snapshot.state.active_target = target;
        &self.snapshot
    }

    pub fn toggle_active_target(&mut self) -> &Snapshot {
        let target = self.snapshot.state.active_target.toggle();
        self.set_active_target(target)
    }

    /// Step the active target one grid point; a no-op at the domain edges.
    pub fn step(&mut self, direction: Direction) -> &Snapshot {
        let target = self.snapshot.state.active_target;
        let value = Bounds::of(target).step(self.snapshot.state.value(target), direction);
        self.write(target, value)
    }

    /// Set a value from a continuous drag: clamped to the domain but not snapped to the grid.
    pub fn set_value_direct(&mut self, target: Target, value: f64) -> &Snapshot {
        if value.is_nan() {
            log::warn!("ignored NaN value for {target}");
            return &self.snapshot;
        }
        let value = Bounds::of(target).clamp(value);
        self.write(target, value)
    }

    /// Single entry point for input reported by the presentation layer.
    pub fn handle_event(&mut self, event: Event) -> &Snapshot {
        match event {
            Event::KeyPress { key } => match key {
                Key::ArrowLeft => self.step(Direction::Decrease),
                Key::ArrowRight => self.step(Direction::Increase),
                Key::Tab => self.toggle_active_target(),
                Key::Other(key) => {
                    log::trace!("ignored key {key:?}");
                    &self.snapshot
                }
            },
            Event::SliderDrag { target, value } => {
                self.set_active_target(target);
                self.set_value_direct(target, value)
            }
            Event::SliderFocus { target } | Event::PanelClick { target } => {
                self.set_active_target(target)
            }
        }
    }

    fn write(&mut self, target: Target, value: f64) -> &Snapshot {
        if self.snapshot.state.value(target) == value {
            return &self.snapshot;
        }
        *self.snapshot.state.value_mut(target) = value;
        log::debug!("{target}: {value}");

        let Snapshot {
            state,
            adjusted,
            ranked,
        } = &mut self.snapshot;
        match target {
            Target::Temperature => {
                *adjusted = sampler::temperature::rescale(&self.distribution, state.temperature)
            }
            Target::TopP => *ranked = sampler::select(&self.distribution, state.top_p),
        }
        &self.snapshot
    }
}
