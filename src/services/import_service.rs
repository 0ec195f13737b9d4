use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::import_dto::{BulkImportRequest, ImportOutcome, SkippedQuestion};
use crate::error::{Error, Result};
use crate::models::question::{NormalizedQuestion, Question};
use crate::services::mcq_backend::McqBackend;
use crate::utils::in_flight::InFlight;

pub const ERR_NO_VALID_QUESTIONS: &str = "No valid questions to upload";

#[derive(Clone)]
pub struct ImportService {
    backend: Arc<dyn McqBackend>,
    in_flight: InFlight<String>,
}

impl ImportService {
    pub fn new(backend: Arc<dyn McqBackend>) -> Self {
        Self {
            backend,
            in_flight: InFlight::new(),
        }
    }

    /// Maps a validated record onto the persistence shape. Error records yield `None`.
    pub fn normalize(question: &Question) -> Option<NormalizedQuestion> {
        if !question.is_importable() {
            return None;
        }
        let correct_answer = usize::try_from(question.correct_index?).ok()?;
        Some(NormalizedQuestion {
            question: question.text.clone(),
            options: question.choices.clone(),
            correct_answer,
            explanation: question.explanation.clone(),
            hint: question.hint.clone(),
            difficulty: question.difficulty.persistence_code().to_string(),
            tags: question.tags.clone(),
        })
    }

    /// Uploads every non-error record of `questions` to `mcq_set_id` in one call.
    ///
    /// Error records are never sent; they come back in `skipped`. Only one import
    /// per set may run at a time.
    pub async fn import_batch(
        &self,
        admin_id: &str,
        mcq_set_id: &str,
        questions: &[Question],
    ) -> Result<ImportOutcome> {
        let _guard = self
            .in_flight
            .try_acquire(mcq_set_id.to_string())
            .ok_or_else(|| {
                Error::Conflict(format!("An import for set {} is already running", mcq_set_id))
            })?;

        let mut skipped = Vec::new();
        let mut batch = Vec::new();
        for (index, question) in questions.iter().enumerate() {
            match Self::normalize(question) {
                Some(normalized) => batch.push(normalized),
                None => skipped.push(SkippedQuestion {
                    index,
                    text: question.text.clone(),
                    errors: question.errors.clone(),
                }),
            }
        }

        if batch.is_empty() {
            return Err(Error::BadRequest(ERR_NO_VALID_QUESTIONS.to_string()));
        }

        let batch_id = Uuid::new_v4();
        let submitted_count = batch.len();
        info!(
            %batch_id,
            mcq_set_id,
            submitted = submitted_count,
            skipped = skipped.len(),
            "Uploading question batch"
        );

        let response = self
            .backend
            .bulk_import(
                admin_id.to_string(),
                BulkImportRequest {
                    mcq_set_id: mcq_set_id.to_string(),
                    questions: batch,
                },
            )
            .await
            .map_err(|e| {
                warn!(%batch_id, mcq_set_id, "Question batch upload failed: {}", e);
                e
            })?;

        if let Some(error) = response.error {
            warn!(%batch_id, mcq_set_id, "Question batch rejected: {}", error);
            return Err(Error::Upstream(error));
        }

        let success_count = response.success_count.unwrap_or(submitted_count);
        let mut message = format!("Successfully uploaded {} questions", success_count);
        if !skipped.is_empty() {
            message.push_str(&format!(
                "; {} invalid questions were not uploaded",
                skipped.len()
            ));
        }
        info!(%batch_id, mcq_set_id, success_count, "Question batch uploaded");

        Ok(ImportOutcome {
            batch_id,
            mcq_set_id: mcq_set_id.to_string(),
            submitted_count,
            success_count,
            skipped,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::import_dto::BulkImportResponse;
    use crate::models::question::QuestionStatus;
    use crate::services::mcq_backend::MockMcqBackend;
    use crate::services::validation_service::ValidationService;
    use serde_json::json;

    fn mixed_batch() -> Vec<Question> {
        ValidationService::validate_all(&[
            json!({
                "text": "ok",
                "choices": ["a", "b"],
                "correctIndex": 0,
                "explanation": "e",
                "difficulty": "Beginner"
            }),
            json!({"text":"","choices":["a"],"correctIndex":3}),
            json!({"text":"warn","choices":["a","a"],"correctIndex":1}),
        ])
    }

    #[tokio::test]
    async fn sends_only_importable_records() {
        let mut backend = MockMcqBackend::new();
        backend
            .expect_bulk_import()
            .withf(|admin, req| {
                admin == "admin-1"
                    && req.mcq_set_id == "set-1"
                    && req.questions.len() == 2
                    && req.questions[0].question == "ok"
                    && req.questions[0].difficulty == "BEGINNER"
                    && req.questions[1].difficulty == "INTERMEDIATE"
            })
            .times(1)
            .returning(|_, _| {
                Ok(BulkImportResponse {
                    success_count: None,
                    error: None,
                })
            });

        let service = ImportService::new(Arc::new(backend));
        let outcome = service
            .import_batch("admin-1", "set-1", &mixed_batch())
            .await
            .unwrap();

        assert_eq!(outcome.submitted_count, 2);
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 1);
        assert_eq!(outcome.skipped[0].errors.len(), 3);
    }

    #[tokio::test]
    async fn success_count_comes_from_response_when_present() {
        let mut backend = MockMcqBackend::new();
        backend.expect_bulk_import().returning(|_, _| {
            Ok(BulkImportResponse {
                success_count: Some(1),
                error: None,
            })
        });

        let service = ImportService::new(Arc::new(backend));
        let outcome = service
            .import_batch("admin-1", "set-1", &mixed_batch())
            .await
            .unwrap();
        assert_eq!(outcome.success_count, 1);
    }

    #[tokio::test]
    async fn all_errors_fail_without_a_call() {
        let mut backend = MockMcqBackend::new();
        backend.expect_bulk_import().never();

        let questions = ValidationService::validate_all(&[json!({}), json!({"text": "x"})]);
        assert!(questions.iter().all(|q| q.status == QuestionStatus::Error));

        let service = ImportService::new(Arc::new(backend));
        match service.import_batch("admin-1", "set-1", &questions).await {
            Err(Error::BadRequest(msg)) => assert_eq!(msg, ERR_NO_VALID_QUESTIONS),
            other => panic!("expected BadRequest, got {:?}", other.map(|o| o.message)),
        }
    }

    #[tokio::test]
    async fn error_body_surfaces_as_upstream() {
        let mut backend = MockMcqBackend::new();
        backend.expect_bulk_import().returning(|_, _| {
            Ok(BulkImportResponse {
                success_count: None,
                error: Some("Set not found".into()),
            })
        });

        let service = ImportService::new(Arc::new(backend));
        let result = service.import_batch("admin-1", "set-x", &mixed_batch()).await;
        assert!(matches!(result, Err(Error::Upstream(msg)) if msg == "Set not found"));
    }

    #[tokio::test]
    async fn second_import_for_a_busy_set_conflicts() {
        let mut backend = MockMcqBackend::new();
        backend
            .expect_bulk_import()
            .withf(|_, req| req.mcq_set_id == "set-2")
            .times(1)
            .returning(|_, _| Ok(BulkImportResponse::default()));

        let service = ImportService::new(Arc::new(backend));
        let running = service.in_flight.try_acquire("set-1".to_string()).unwrap();

        let result = service.import_batch("admin-1", "set-1", &mixed_batch()).await;
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert!(service
            .import_batch("admin-1", "set-2", &mixed_batch())
            .await
            .is_ok());

        drop(running);
        assert!(!service.in_flight.is_busy(&"set-1".to_string()));
    }

    #[test]
    fn normalize_renames_fields() {
        let q = &mixed_batch()[0];
        let n = ImportService::normalize(q).unwrap();
        assert_eq!(n.question, "ok");
        assert_eq!(n.options, vec!["a", "b"]);
        assert_eq!(n.correct_answer, 0);

        let wire = serde_json::to_value(&n).unwrap();
        assert_eq!(wire["correctAnswer"], 0);
        assert!(wire.get("hint").is_none());
        assert!(ImportService::normalize(&mixed_batch()[1]).is_none());
    }
}
