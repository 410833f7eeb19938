pub mod nucleus;
pub mod temperature;

pub use nucleus::{select, RankedTokenProbability};
pub use temperature::{adjust, AdjustedTokenProbability};
