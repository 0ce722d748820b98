//! Time-of-Day Features
//!
//! Departure hour → time block → ordinal delay score, plus the redeye flag.

use serde::{Deserialize, Serialize};

/// Seven contiguous, non-overlapping blocks covering [0, 24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBlock {
    /// [0, 6)
    Night,
    /// [6, 9)
    EarlyMorning,
    /// [9, 12)
    LateMorning,
    /// [12, 15)
    EarlyAfternoon,
    /// [15, 18)
    LateAfternoon,
    /// [18, 21)
    Evening,
    /// [21, 24)
    LateEvening,
}

impl TimeBlock {
    pub const ALL: [TimeBlock; 7] = [
        TimeBlock::Night,
        TimeBlock::EarlyMorning,
        TimeBlock::LateMorning,
        TimeBlock::EarlyAfternoon,
        TimeBlock::LateAfternoon,
        TimeBlock::Evening,
        TimeBlock::LateEvening,
    ];

    /// Map an hour to its block. Hours outside [0, 23] have no block.
    pub fn from_hour(hour: u8) -> Option<TimeBlock> {
        TimeBlock::ALL.iter().copied().find(|b| {
            let (start, end) = b.hours();
            hour >= start && hour < end
        })
    }

    /// Half-open hour range [start, end)
    pub fn hours(&self) -> (u8, u8) {
        match self {
            TimeBlock::Night => (0, 6),
            TimeBlock::EarlyMorning => (6, 9),
            TimeBlock::LateMorning => (9, 12),
            TimeBlock::EarlyAfternoon => (12, 15),
            TimeBlock::LateAfternoon => (15, 18),
            TimeBlock::Evening => (18, 21),
            TimeBlock::LateEvening => (21, 24),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeBlock::Night => "12am–6am",
            TimeBlock::EarlyMorning => "6am–9am",
            TimeBlock::LateMorning => "9am–12pm",
            TimeBlock::EarlyAfternoon => "12pm–3pm",
            TimeBlock::LateAfternoon => "3pm–6pm",
            TimeBlock::Evening => "6pm–9pm",
            TimeBlock::LateEvening => "9pm–12am",
        }
    }

    /// Ordinal delay score from the observed delay trend across the day
    pub fn delay_score(&self) -> u8 {
        match self {
            TimeBlock::Night => 1,
            TimeBlock::EarlyMorning => 2,
            TimeBlock::LateMorning => 3,
            TimeBlock::EarlyAfternoon => 4,
            TimeBlock::LateAfternoon => 5,
            TimeBlock::Evening => 6,
            TimeBlock::LateEvening => 7,
        }
    }
}

/// Redeye: departs 22:00–05:59
pub fn is_redeye(hour: u8) -> bool {
    hour >= 22 || hour <= 5
}
