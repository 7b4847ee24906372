//! Glow overrides — alarm color codec, saved originals, apply/revert passes.

mod color;
mod ops;
mod registry;

pub use color::{
    ALARM_COLOR, Color32, format_color, is_alarm_colored, named_color, parse_color,
    parse_color_or_name,
};
pub use ops::{ApplyReport, RevertReport, apply_alarm, revert_alarm};
pub use registry::OverrideRegistry;
