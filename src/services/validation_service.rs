use serde_json::Value as JsonValue;

use crate::dto::import_dto::{ValidationReport, ValidationSummary};
use crate::error::{Error, Result};
use crate::models::question::{Difficulty, Question, QuestionStatus, DEFAULT_CATEGORY};

/// Lengths are counted in UTF-16 code units, as browsers count them.
pub const MAX_QUESTION_TEXT_LEN: usize = 500;
pub const MAX_CHOICE_LEN: usize = 200;

pub const ERR_TEXT_REQUIRED: &str = "Question text is required";
pub const ERR_CHOICES_REQUIRED: &str = "At least 2 choices are required";
pub const ERR_CORRECT_INDEX: &str = "Valid correct answer index is required";
pub const WARN_NO_EXPLANATION: &str = "Explanation is recommended for better learning";
pub const WARN_LONG_TEXT: &str = "Question text is very long (>500 characters)";
pub const WARN_LONG_CHOICES: &str = "Some answer choices are very long (>200 characters)";
pub const WARN_DUPLICATE_CHOICES: &str = "Duplicate answer choices detected";

pub const ERR_INVALID_STRUCTURE: &str = "Invalid JSON structure: questions array is required";

pub struct ValidationService;

impl ValidationService {
    /// Reads an import document and returns its raw `questions` records.
    pub fn parse_document(raw: &str) -> Result<Vec<JsonValue>> {
        let doc: JsonValue = serde_json::from_str(raw)
            .map_err(|e| Error::InvalidImport(format!("Invalid JSON file: {}", e)))?;

        match doc.get("questions").and_then(|q| q.as_array()) {
            Some(questions) => Ok(questions.clone()),
            None => Err(Error::InvalidImport(ERR_INVALID_STRUCTURE.to_string())),
        }
    }

    pub fn validate_all(raw_questions: &[JsonValue]) -> Vec<Question> {
        raw_questions.iter().map(Self::validate).collect()
    }

    pub fn report(raw_questions: &[JsonValue]) -> ValidationReport {
        let questions = Self::validate_all(raw_questions);
        ValidationReport {
            summary: ValidationSummary::from_questions(&questions),
            questions,
        }
    }

    /// Annotates one raw record. Every rule runs; none short-circuits another.
    pub fn validate(raw: &JsonValue) -> Question {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let text = string_field(raw, "text").unwrap_or_default();
        let choices = choices_field(raw);
        let correct_index = integer_field(raw, "correctIndex");
        let explanation = string_field(raw, "explanation");

        if text.trim().is_empty() {
            errors.push(ERR_TEXT_REQUIRED.to_string());
        }

        if choices.as_ref().map_or(true, |c| c.len() < 2) {
            errors.push(ERR_CHOICES_REQUIRED.to_string());
        }

        let choice_count = choices.as_ref().map_or(0, |c| c.len()) as i64;
        match correct_index {
            Some(idx) if idx >= 0 && idx < choice_count => {}
            _ => errors.push(ERR_CORRECT_INDEX.to_string()),
        }

        if explanation.as_deref().map_or(true, |e| e.trim().is_empty()) {
            warnings.push(WARN_NO_EXPLANATION.to_string());
        }

        if utf16_len(&text) > MAX_QUESTION_TEXT_LEN {
            warnings.push(WARN_LONG_TEXT.to_string());
        }

        let choices = choices.unwrap_or_default();
        if choices.iter().any(|c| utf16_len(c) > MAX_CHOICE_LEN) {
            warnings.push(WARN_LONG_CHOICES.to_string());
        }

        let distinct: std::collections::HashSet<&str> =
            choices.iter().map(|c| c.as_str()).collect();
        if distinct.len() < choices.len() {
            warnings.push(WARN_DUPLICATE_CHOICES.to_string());
        }

        let status = if !errors.is_empty() {
            QuestionStatus::Error
        } else if !warnings.is_empty() {
            QuestionStatus::Warning
        } else {
            QuestionStatus::Valid
        };

        Question {
            text,
            choices,
            correct_index,
            explanation,
            hint: string_field(raw, "hint"),
            difficulty: string_field(raw, "difficulty")
                .and_then(|d| Difficulty::parse(&d))
                .unwrap_or_default(),
            category: string_field(raw, "category")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: tags_field(raw),
            status,
            errors,
            warnings,
        }
    }
}

/// Accepts `1` and `1.0` alike; fractional or non-numeric values are `None`.
fn integer_field(raw: &JsonValue, key: &str) -> Option<i64> {
    let value = raw.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn string_field(raw: &JsonValue, key: &str) -> Option<String> {
    raw.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// `None` when `choices` is absent or not an array.
fn choices_field(raw: &JsonValue) -> Option<Vec<String>> {
    raw.get("choices").and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => s.clone(),
                JsonValue::Null => String::new(),
                other => other.to_string(),
            })
            .collect()
    })
}

fn tags_field(raw: &JsonValue) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    if let Some(items) = raw.get("tags").and_then(|v| v.as_array()) {
        for tag in items.iter().filter_map(|t| t.as_str()) {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}
