use serde::{Deserialize, Serialize};

use crate::models::question::{NormalizedQuestion, Question, QuestionStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub warning: usize,
    pub error: usize,
}

impl ValidationSummary {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut summary = Self {
            total: questions.len(),
            ..Self::default()
        };
        for q in questions {
            match q.status {
                QuestionStatus::Valid => summary.valid += 1,
                QuestionStatus::Warning => summary.warning += 1,
                QuestionStatus::Error => summary.error += 1,
            }
        }
        summary
    }

    pub fn importable(&self) -> usize {
        self.valid + self.warning
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub questions: Vec<Question>,
}

/// Body of `POST /api/mcq/questions/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRequest {
    pub mcq_set_id: String,
    pub questions: Vec<NormalizedQuestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResponse {
    #[serde(default)]
    pub success_count: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A record left out of the upload because it failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedQuestion {
    pub index: usize,
    pub text: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub batch_id: uuid::Uuid,
    pub mcq_set_id: String,
    pub submitted_count: usize,
    pub success_count: usize,
    pub skipped: Vec<SkippedQuestion>,
    pub message: String,
}
