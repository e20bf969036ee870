mod engine;
mod format;
mod policy;

pub use engine::{Effect, Phase, TimerEngine, TimerMode, TimerSnapshot};
pub use format::{format_hms, format_mm_ss};
pub use policy::DurationPolicy;
