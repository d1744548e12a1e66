use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MMI_SYMBOL: &str = "^BSESN";

/// Classification of one day's percentage price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodLabel::Positive => write!(f, "Positive"),
            MoodLabel::Negative => write!(f, "Negative"),
            MoodLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Percentage of classified days per label. Labels never observed are absent.
pub type MoodDistribution = BTreeMap<MoodLabel, f64>;

/// Body of `POST /mmi`
#[derive(Debug, Clone, Deserialize)]
pub struct MoodIndexRequest {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn default_symbol() -> String {
    DEFAULT_MMI_SYMBOL.to_string()
}
