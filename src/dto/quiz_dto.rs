use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::models::quiz::QuizQuestion;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[validate(length(min = 1, message = "At least one question is required"))]
    pub questions: Vec<QuizQuestion>,
    /// Question id to chosen option index.
    #[serde(default)]
    pub answers: HashMap<String, usize>,
    #[serde(default)]
    pub time_taken_seconds: u32,
}
