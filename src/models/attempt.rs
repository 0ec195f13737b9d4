use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "in_progress")]
    InProgress,
    #[serde(alias = "abandoned")]
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub question_id: String,
    #[serde(default)]
    pub question_text: Option<String>,
    pub is_correct: bool,
    #[serde(default)]
    pub time_spent_seconds: Option<u32>,
}

/// One quiz attempt from the attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: String,
    pub user_id: String,
    pub mcq_set_id: String,
    #[serde(default)]
    pub set_title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub status: AttemptStatus,
    /// Percentage 0-100, present once completed.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub time_taken_seconds: Option<u32>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<AttemptAnswer>,
}

impl AttemptRecord {
    pub fn is_completed(&self) -> bool {
        self.status == AttemptStatus::Completed
    }
}
