use std::collections::HashMap;

use crate::models::quiz::{QuestionOutcome, QuizQuestion, ScoreResult};

pub struct ScoringService;

impl ScoringService {
    /// Scores one attempt. Unanswered questions count as incorrect.
    pub fn score(
        questions: &[QuizQuestion],
        answers: &HashMap<String, usize>,
        time_taken_seconds: u32,
    ) -> ScoreResult {
        let per_question: Vec<QuestionOutcome> = questions
            .iter()
            .map(|q| QuestionOutcome {
                question_id: q.id.clone(),
                is_correct: answers.get(&q.id) == Some(&q.correct_answer),
            })
            .collect();

        let correct_count = per_question.iter().filter(|o| o.is_correct).count() as u32;
        let total_count = questions.len() as u32;

        ScoreResult {
            correct_count,
            total_count,
            percentage: Self::percentage(correct_count, total_count),
            time_taken_seconds,
            per_question,
        }
    }

    pub fn percentage(correct: u32, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        (f64::from(correct) / f64::from(total) * 100.0).round() as u32
    }

    /// Plain mean of attempt percentages; 0 for no attempts.
    pub fn average_score(scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    /// Completed attempts as a percentage of started ones.
    pub fn completion_rate(completed: usize, started: usize) -> f64 {
        if started == 0 {
            return 0.0;
        }
        completed as f64 / started as f64 * 100.0
    }
}
