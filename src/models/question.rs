use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(alias = "BEGINNER", alias = "beginner")]
    Beginner,
    #[default]
    #[serde(alias = "INTERMEDIATE", alias = "intermediate")]
    Intermediate,
    #[serde(alias = "ADVANCED", alias = "advanced")]
    Advanced,
}

impl Difficulty {
    /// Case-insensitive parse of an import-file value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// Enum code expected by the persistence API.
    pub fn persistence_code(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
        }
    }

    pub fn badge_color(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "green",
            Difficulty::Intermediate => "yellow",
            Difficulty::Advanced => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Valid,
    Warning,
    Error,
}

/// A bulk-import record after validation.
///
/// Fields that could not be read from the raw record hold their defaults; the
/// reason is listed in `errors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub choices: Vec<String>,
    pub correct_index: Option<i64>,
    pub explanation: Option<String>,
    pub hint: Option<String>,
    pub difficulty: Difficulty,
    pub category: String,
    pub tags: Vec<String>,
    pub status: QuestionStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Question {
    pub fn is_importable(&self) -> bool {
        self.status != QuestionStatus::Error
    }
}

/// Question shape accepted by `POST /api/mcq/questions/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub difficulty: String,
    pub tags: Vec<String>,
}
