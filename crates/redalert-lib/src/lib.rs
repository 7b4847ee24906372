//! RedAlert — an alert switch that floods a colony map with red light.
//!
//! Flicking the switch on saves every lit, powered fixture's glow color and
//! forces it to the alarm red; flicking it off restores the saved colors.

pub mod config;
pub mod context;
pub mod error;
pub mod glow;
pub mod map;
pub mod power;
pub mod save;
pub mod switch;

pub use error::RedAlertError;
