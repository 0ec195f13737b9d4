use serde::Serialize;

use crate::error::Result;
use crate::models::mcq_set::{McqSet, TimeDisplay};

/// A set as listed in the admin console, with its card decorations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McqSetView {
    #[serde(flatten)]
    pub set: McqSet,
    pub time_display: TimeDisplay,
    pub status_color: &'static str,
    pub difficulty_color: Option<&'static str>,
}

impl McqSetView {
    pub fn try_from_set(set: McqSet) -> Result<Self> {
        let time_display = set.time_display()?;
        Ok(Self {
            status_color: set.status.badge_color(),
            difficulty_color: set.difficulty.map(|d| d.badge_color()),
            time_display,
            set,
        })
    }
}
