use std::fmt;

use serde::{Deserialize, Serialize};

/// The two independently predicted delay outcomes (15+ minutes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayLabel {
    Departure,
    Arrival,
}

impl DelayLabel {
    /// Output order of the fitted multi-output classifier
    pub const ALL: [DelayLabel; 2] = [DelayLabel::Departure, DelayLabel::Arrival];

    pub fn index(&self) -> usize {
        match self {
            DelayLabel::Departure => 0,
            DelayLabel::Arrival => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DelayLabel::Departure => "Departure Delay",
            DelayLabel::Arrival => "Arrival Delay",
        }
    }
}

impl fmt::Display for DelayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
