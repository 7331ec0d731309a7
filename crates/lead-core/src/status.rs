//! Lead status bands over the composite score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal label for a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    Poor,
    Average,
    Good,
    VeryGood,
    Excellent,
}

impl LeadStatus {
    /// All bands, lowest first.
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::Poor,
        LeadStatus::Average,
        LeadStatus::Good,
        LeadStatus::VeryGood,
        LeadStatus::Excellent,
    ];

    /// Band for a score: `<30` Poor, `<50` Average, `<70` Good, `<85` Very Good, else Excellent.
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            LeadStatus::Poor
        } else if score < 50.0 {
            LeadStatus::Average
        } else if score < 70.0 {
            LeadStatus::Good
        } else if score < 85.0 {
            LeadStatus::VeryGood
        } else {
            LeadStatus::Excellent
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Poor => "Poor",
            LeadStatus::Average => "Average",
            LeadStatus::Good => "Good",
            LeadStatus::VeryGood => "Very Good",
            LeadStatus::Excellent => "Excellent",
        }
    }

    /// Presentation color for the band.
    pub fn color(&self) -> &'static str {
        match self {
            LeadStatus::Poor => "red",
            LeadStatus::Average => "gray",
            LeadStatus::Good => "blue",
            LeadStatus::VeryGood => "green",
            LeadStatus::Excellent => "yellow",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
