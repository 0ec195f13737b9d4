use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::question::Difficulty;

pub const DEFAULT_TOTAL_TIME_LIMIT_MINUTES: u32 = 30;
pub const DEFAULT_QUESTION_TIME_LIMIT_SECONDS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    TotalTime,
    PerQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetStatus {
    #[default]
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "archived")]
    Archived,
}

impl SetStatus {
    pub fn badge_color(&self) -> &'static str {
        match self {
            SetStatus::Active => "green",
            SetStatus::Draft => "gray",
            SetStatus::Archived => "orange",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqSet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Absent when the record predates timer settings; `time_display` rejects it.
    #[serde(default)]
    pub timer_mode: Option<TimerMode>,
    /// Minutes, only read in `TOTAL_TIME` mode.
    #[serde(default)]
    pub total_time_limit: Option<u32>,
    /// Seconds, only read in `PER_QUESTION` mode.
    #[serde(default)]
    pub question_time_limit: Option<u32>,
    #[serde(default)]
    pub questions: u32,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: SetStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Min,
    Sec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDisplay {
    pub time: u32,
    pub unit: TimeUnit,
    pub label: String,
}

impl McqSet {
    /// Time shown on the set card. A zero limit counts as unset.
    pub fn time_display(&self) -> Result<TimeDisplay> {
        match self.timer_mode {
            Some(TimerMode::TotalTime) => Ok(TimeDisplay {
                time: self
                    .total_time_limit
                    .filter(|t| *t > 0)
                    .unwrap_or(DEFAULT_TOTAL_TIME_LIMIT_MINUTES),
                unit: TimeUnit::Min,
                label: "Total Time".to_string(),
            }),
            Some(TimerMode::PerQuestion) => Ok(TimeDisplay {
                time: self
                    .question_time_limit
                    .filter(|t| *t > 0)
                    .unwrap_or(DEFAULT_QUESTION_TIME_LIMIT_SECONDS),
                unit: TimeUnit::Sec,
                label: "Per Question".to_string(),
            }),
            None => Err(Error::InvalidTimerMode(self.id.clone())),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_set(id: &str) -> McqSet {
    McqSet {
        id: id.to_string(),
        title: format!("Set {}", id),
        description: None,
        category: Some("Programming".into()),
        difficulty: Some(Difficulty::Intermediate),
        timer_mode: Some(TimerMode::TotalTime),
        total_time_limit: None,
        question_time_limit: None,
        questions: 10,
        attempts: 0,
        average_score: 0.0,
        featured: false,
        status: SetStatus::Active,
        tags: vec![],
        companies: vec![],
        banner_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_time_defaults_to_thirty_minutes() {
        let set = sample_set("a");
        let display = set.time_display().unwrap();
        assert_eq!(
            display,
            TimeDisplay {
                time: 30,
                unit: TimeUnit::Min,
                label: "Total Time".into()
            }
        );
        assert_eq!(set.time_display().unwrap(), display);
    }

    #[test]
    fn per_question_uses_configured_seconds() {
        let mut set = sample_set("b");
        set.timer_mode = Some(TimerMode::PerQuestion);
        set.question_time_limit = Some(45);
        set.total_time_limit = Some(10);

        let display = set.time_display().unwrap();
        assert_eq!(display.time, 45);
        assert_eq!(display.unit, TimeUnit::Sec);
        assert_eq!(display.label, "Per Question");
    }

    #[test]
    fn per_question_defaults_to_ninety_seconds() {
        let mut set = sample_set("c");
        set.timer_mode = Some(TimerMode::PerQuestion);
        set.question_time_limit = Some(0);
        assert_eq!(set.time_display().unwrap().time, 90);
    }

    #[test]
    fn missing_timer_mode_is_rejected() {
        let mut set = sample_set("d");
        set.timer_mode = None;
        assert!(matches!(set.time_display(), Err(Error::InvalidTimerMode(id)) if id == "d"));
    }

    #[test]
    fn unknown_timer_mode_fails_to_parse() {
        let raw = serde_json::json!({
            "id": "e",
            "title": "Typo",
            "timerMode": "TOTAL_TIMES"
        });
        assert!(serde_json::from_value::<McqSet>(raw).is_err());
    }
}
