mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use common::{app, body_json, json_request, FakeBackend};

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn score_counts_correct_answers() {
    let payload = json!({
        "questions": [
            { "id": "q1", "question": "1 + 1", "options": ["1", "2"], "correctAnswer": 1 },
            { "id": "q2", "question": "2 + 2", "options": ["4", "5"], "correctAnswer": 0 },
            { "id": "q3", "question": "3 + 3", "options": ["6", "7"], "correctAnswer": 0 }
        ],
        "answers": { "q1": 1, "q2": 0, "q3": 1 },
        "timeTakenSeconds": 42
    });
    let response = app(Arc::new(FakeBackend::default()))
        .oneshot(post_json("/api/quiz/score", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["correctCount"], 2);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["percentage"], 67);
    assert_eq!(body["timeTakenSeconds"], 42);
    assert_eq!(body["perQuestion"][2]["isCorrect"], false);
}

#[tokio::test]
async fn score_requires_questions() {
    let response = app(Arc::new(FakeBackend::default()))
        .oneshot(post_json("/api/quiz/score", json!({ "questions": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn attempt(id: &str, user: &str, set: &str, started: &str, score: Option<f64>) -> JsonValue {
    let status = if score.is_some() { "COMPLETED" } else { "IN_PROGRESS" };
    let time_taken = score.map(|_| 300);
    let correct = score.unwrap_or(0.0) > 50.0;
    json!({
        "id": id,
        "userId": user,
        "mcqSetId": set,
        "category": "Networking",
        "status": status,
        "score": score,
        "timeTakenSeconds": time_taken,
        "startedAt": started,
        "answers": [
            { "questionId": "q1", "isCorrect": correct }
        ]
    })
}

#[tokio::test]
async fn analytics_respects_the_period() {
    let payload = json!({
        "attempts": [
            attempt("a1", "u1", "s1", "2026-10-17T10:00:00Z", Some(80.0)),
            attempt("a2", "u2", "s1", "2026-10-15T10:00:00Z", Some(60.0)),
            attempt("a3", "u2", "s2", "2026-10-16T10:00:00Z", None),
            attempt("a4", "u3", "s2", "2026-06-01T10:00:00Z", Some(100.0)),
            attempt("a5", "u4", "s3", "2026-11-01T10:00:00Z", Some(50.0))
        ]
    });

    let response = app(Arc::new(FakeBackend::default()))
        .oneshot(json_request(
            "POST",
            "/api/admin/mcq/analytics?period=7d&asOf=2026-10-18T00:00:00Z",
            Some(payload.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["overview"]["totalAttempts"], 3);
    assert_eq!(report["overview"]["completedAttempts"], 2);
    assert_eq!(report["overview"]["uniqueUsers"], 2);
    assert_eq!(report["overview"]["averageScore"], 70.0);
    assert_eq!(report["overview"]["mostPopularSetId"], "s1");
    assert_eq!(report["categoryBreakdown"][0]["key"], "Networking");

    let response = app(Arc::new(FakeBackend::default()))
        .oneshot(json_request(
            "POST",
            "/api/admin/mcq/analytics?period=all&asOf=2026-10-18T00:00:00Z",
            Some(payload.clone()),
        ))
        .await
        .unwrap();
    let report = body_json(response).await;
    assert_eq!(report["overview"]["totalAttempts"], 4);

    let response = app(Arc::new(FakeBackend::default()))
        .oneshot(json_request(
            "POST",
            "/api/admin/mcq/analytics?period=1y",
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
