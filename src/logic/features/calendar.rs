//! Calendar Features - Month & Day-of-Week delay scores
//!
//! Scores follow the delay propensity observed in historical data,
//! NOT calendar order. Sep is the calmest month, Dec the worst.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logic::error::PredictorError;

// ============================================================================
// MONTH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Ordered by delay score (lowest risk first)
    pub const BY_RISK: [Month; 12] = [
        Month::Sep, Month::Oct, Month::Nov, Month::Jan, Month::Feb, Month::Mar,
        Month::May, Month::Aug, Month::Apr, Month::Jun, Month::Jul, Month::Dec,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Ordinal delay score (1 = lowest risk, 12 = highest)
    pub fn delay_score(&self) -> u8 {
        match self {
            Month::Sep => 1,
            Month::Oct => 2,
            Month::Nov => 3,
            Month::Jan => 4,
            Month::Feb => 5,
            Month::Mar => 6,
            Month::May => 7,
            Month::Aug => 8,
            Month::Apr => 9,
            Month::Jun => 10,
            Month::Jul => 11,
            Month::Dec => 12,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Month {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Month::BY_RISK
            .iter()
            .copied()
            .find(|m| m.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| PredictorError::InvalidInput(format!("unknown month '{}'", s)))
    }
}

// ============================================================================
// DAY OF WEEK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    /// Ordered by delay score (lowest risk first)
    pub const BY_RISK: [DayOfWeek; 7] = [
        DayOfWeek::Thu, DayOfWeek::Fri, DayOfWeek::Mon, DayOfWeek::Sun,
        DayOfWeek::Sat, DayOfWeek::Wed, DayOfWeek::Tue,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
            DayOfWeek::Sun => "Sun",
        }
    }

    /// Ordinal delay score (1 = lowest risk, 7 = highest)
    pub fn delay_score(&self) -> u8 {
        match self {
            DayOfWeek::Thu => 1,
            DayOfWeek::Fri => 2,
            DayOfWeek::Mon => 3,
            DayOfWeek::Sun => 4,
            DayOfWeek::Sat => 5,
            DayOfWeek::Wed => 6,
            DayOfWeek::Tue => 7,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DayOfWeek {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        DayOfWeek::BY_RISK
            .iter()
            .copied()
            .find(|d| d.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| PredictorError::InvalidInput(format!("unknown day of week '{}'", s)))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_scores_follow_risk_order() {
        for (i, month) in Month::BY_RISK.iter().enumerate() {
            assert_eq!(month.delay_score() as usize, i + 1, "{}", month);
        }
    }

    #[test]
    fn test_dow_scores_follow_risk_order() {
        for (i, day) in DayOfWeek::BY_RISK.iter().enumerate() {
            assert_eq!(day.delay_score() as usize, i + 1, "{}", day);
        }
    }

    #[test]
    fn test_known_scores() {
        assert_eq!(Month::Aug.delay_score(), 8);
        assert_eq!(Month::Dec.delay_score(), 12);
        assert_eq!(DayOfWeek::Sat.delay_score(), 5);
        assert_eq!(DayOfWeek::Tue.delay_score(), 7);
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("Aug".parse::<Month>().unwrap(), Month::Aug);
        assert_eq!("aug".parse::<Month>().unwrap(), Month::Aug);
        assert_eq!(" Sat ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Sat);
        assert!("August".parse::<Month>().is_err());
        assert!("Xyz".parse::<DayOfWeek>().is_err());
    }
}
