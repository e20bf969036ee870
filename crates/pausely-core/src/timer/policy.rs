use serde::{Deserialize, Serialize};

use super::engine::Phase;

/// Work/break phase durations, in whole seconds.
///
/// The engine never interprets durations itself; every countdown reset
/// goes through this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPolicy {
    pub work_secs: u64,
    pub break_secs: u64,
}

impl DurationPolicy {
    pub fn new(work_secs: u64, break_secs: u64) -> Self {
        Self {
            work_secs,
            break_secs,
        }
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::Break => self.break_secs,
        }
    }
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let p = DurationPolicy::default();
        assert_eq!(p.work_secs, 1500);
        assert_eq!(p.break_secs, 300);
    }

    #[test]
    fn for_phase_selects_duration() {
        let p = DurationPolicy::new(120, 30);
        assert_eq!(p.for_phase(Phase::Work), 120);
        assert_eq!(p.for_phase(Phase::Break), 30);
    }
}
