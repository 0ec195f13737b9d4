use serde::{Deserialize, Serialize};

use crate::models::attempt::AttemptRecord;

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsPayload {
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub period: Option<String>,
    /// RFC 3339 end of the window; defaults to now.
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_attempts: usize,
    pub completed_attempts: usize,
    pub unique_users: usize,
    pub average_score: f64,
    pub completion_rate: f64,
    pub average_time_seconds: f64,
    pub most_popular_set_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPerformance {
    pub mcq_set_id: String,
    pub title: Option<String>,
    pub attempts: usize,
    pub completions: usize,
    pub average_score: f64,
    pub completion_rate: f64,
    pub average_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPerformance {
    pub question_id: String,
    pub question_text: Option<String>,
    pub attempts: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub average_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub key: String,
    pub attempts: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub overview: AnalyticsOverview,
    pub set_performance: Vec<SetPerformance>,
    pub question_performance: Vec<QuestionPerformance>,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub difficulty_breakdown: Vec<BreakdownEntry>,
}
