use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::dto::analytics_dto::{
    AnalyticsOverview, AnalyticsReport, BreakdownEntry, QuestionPerformance, SetPerformance,
};
use crate::error::{Error, Result};
use crate::models::attempt::AttemptRecord;
use crate::services::scoring_service::ScoringService;

const UNCATEGORIZED: &str = "Uncategorized";
const UNSPECIFIED_DIFFICULTY: &str = "Unspecified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Last7Days,
    Last30Days,
    Last90Days,
    All,
}

impl Period {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("all") => Ok(Period::All),
            Some("7d") => Ok(Period::Last7Days),
            Some("30d") => Ok(Period::Last30Days),
            Some("90d") => Ok(Period::Last90Days),
            Some(other) => Err(Error::BadRequest(format!(
                "Unknown period '{}': expected 7d, 30d, 90d or all",
                other
            ))),
        }
    }

    fn days(&self) -> Option<i64> {
        match self {
            Period::Last7Days => Some(7),
            Period::Last30Days => Some(30),
            Period::Last90Days => Some(90),
            Period::All => None,
        }
    }

    /// Attempts started inside the period ending at `now`. Later attempts are dropped
    /// for every period, `All` included.
    pub fn filter(&self, attempts: Vec<AttemptRecord>, now: DateTime<Utc>) -> Vec<AttemptRecord> {
        let since = self.days().map(|days| now - Duration::days(days));
        attempts
            .into_iter()
            .filter(|a| a.started_at <= now)
            .filter(|a| since.map_or(true, |since| a.started_at >= since))
            .collect()
    }
}

/// Keyed accumulator that remembers first-seen order.
struct OrderedGroups<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, T)>,
}

impl<T: Default> OrderedGroups<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut T {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                self.entries.push((key.to_string(), T::default()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }
}

#[derive(Default)]
struct AttemptStats {
    title: Option<String>,
    attempts: usize,
    completions: usize,
    scores: Vec<f64>,
    times: Vec<f64>,
}

impl AttemptStats {
    fn record(&mut self, attempt: &AttemptRecord) {
        self.attempts += 1;
        if self.title.is_none() {
            self.title = attempt.set_title.clone();
        }
        if attempt.is_completed() {
            self.completions += 1;
            if let Some(score) = attempt.score {
                self.scores.push(score);
            }
            if let Some(time) = attempt.time_taken_seconds {
                self.times.push(f64::from(time));
            }
        }
    }
}

#[derive(Default)]
struct AnswerStats {
    text: Option<String>,
    attempts: usize,
    correct: usize,
    times: Vec<f64>,
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub fn aggregate(attempts: &[AttemptRecord]) -> AnalyticsReport {
        let mut overall = AttemptStats::default();
        let mut users = HashSet::new();
        let mut by_set: OrderedGroups<AttemptStats> = OrderedGroups::new();
        let mut by_category: OrderedGroups<AttemptStats> = OrderedGroups::new();
        let mut by_difficulty: OrderedGroups<AttemptStats> = OrderedGroups::new();
        let mut by_question: OrderedGroups<AnswerStats> = OrderedGroups::new();

        for attempt in attempts {
            overall.record(attempt);
            users.insert(attempt.user_id.as_str());
            by_set.entry(&attempt.mcq_set_id).record(attempt);
            by_category
                .entry(attempt.category.as_deref().unwrap_or(UNCATEGORIZED))
                .record(attempt);
            by_difficulty
                .entry(
                    attempt
                        .difficulty
                        .map(|d| d.as_str())
                        .unwrap_or(UNSPECIFIED_DIFFICULTY),
                )
                .record(attempt);

            for answer in &attempt.answers {
                let stats = by_question.entry(&answer.question_id);
                stats.attempts += 1;
                if answer.is_correct {
                    stats.correct += 1;
                }
                if stats.text.is_none() {
                    stats.text = answer.question_text.clone();
                }
                if let Some(time) = answer.time_spent_seconds {
                    stats.times.push(f64::from(time));
                }
            }
        }

        let set_entries = by_set.into_entries();

        // Strict comparison keeps the first-seen set on ties.
        let mut most_popular: Option<(&str, usize)> = None;
        for (id, stats) in &set_entries {
            if most_popular.map_or(true, |(_, best)| stats.attempts > best) {
                most_popular = Some((id.as_str(), stats.attempts));
            }
        }

        let overview = AnalyticsOverview {
            total_attempts: overall.attempts,
            completed_attempts: overall.completions,
            unique_users: users.len(),
            average_score: round1(ScoringService::average_score(&overall.scores)),
            completion_rate: round1(ScoringService::completion_rate(
                overall.completions,
                overall.attempts,
            )),
            average_time_seconds: round1(ScoringService::average_score(&overall.times)),
            most_popular_set_id: most_popular.map(|(id, _)| id.to_string()),
        };

        let set_performance = set_entries
            .into_iter()
            .map(|(id, stats)| SetPerformance {
                mcq_set_id: id,
                title: stats.title,
                attempts: stats.attempts,
                completions: stats.completions,
                average_score: round1(ScoringService::average_score(&stats.scores)),
                completion_rate: round1(ScoringService::completion_rate(
                    stats.completions,
                    stats.attempts,
                )),
                average_time_seconds: round1(ScoringService::average_score(&stats.times)),
            })
            .collect();

        let question_performance = by_question
            .into_entries()
            .into_iter()
            .map(|(id, stats)| QuestionPerformance {
                question_id: id,
                question_text: stats.text,
                attempts: stats.attempts,
                correct: stats.correct,
                accuracy: round1(ScoringService::completion_rate(
                    stats.correct,
                    stats.attempts,
                )),
                average_time_seconds: round1(ScoringService::average_score(&stats.times)),
            })
            .collect();

        AnalyticsReport {
            overview,
            set_performance,
            question_performance,
            category_breakdown: breakdown(by_category),
            difficulty_breakdown: breakdown(by_difficulty),
        }
    }
}

fn breakdown(groups: OrderedGroups<AttemptStats>) -> Vec<BreakdownEntry> {
    groups
        .into_entries()
        .into_iter()
        .map(|(key, stats)| BreakdownEntry {
            key,
            attempts: stats.attempts,
            average_score: round1(ScoringService::average_score(&stats.scores)),
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
