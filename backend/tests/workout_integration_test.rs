//! Integration tests for workout templates and sessions

mod common;

use axum::http::StatusCode;
use common::{TestApp, TestUser};
use serde_json::{json, Value};

async fn create_template(app: &TestApp, user: &TestUser, is_public: bool) -> Value {
    let squat = app.exercise_id("Back Squat", user).await;
    let plank = app.exercise_id("Plank", user).await;

    let body = json!({
        "name": "Leg Day",
        "is_template": true,
        "is_public": is_public,
        "difficulty": "intermediate",
        "workout_type": "strength",
        "exercises": [
            {"exercise_id": squat, "sets": 5, "reps": 5, "weight_kg": 100.0, "rest_seconds": 120},
            {"exercise_id": plank, "sets": 3, "duration_seconds": 45, "rest_seconds": 30}
        ]
    });

    let (status, template) = app.post("/api/v1/workouts", body, user).await;
    assert_eq!(status, StatusCode::OK, "{}", template);
    template
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_template_computes_estimates() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let template = create_template(&app, &user, false).await;

    assert_eq!(template["is_template"], true);
    assert_eq!(template["status"], "planned");
    assert!(template["estimated_duration"].as_i64().unwrap() >= 1);
    assert!(template["estimated_calories"].as_i64().unwrap() >= 10);
    assert_eq!(template["exercises"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_public_flag_requires_template() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (status, body) = app
        .post(
            "/api/v1/workouts",
            json!({"name": "Solo", "is_template": false, "is_public": true}),
            &user,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_start_from_template_copies_planned_entries() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let template = create_template(&app, &user, false).await;

    let (status, session) = app
        .post(
            "/api/v1/workouts/start",
            json!({"template_id": template["id"]}),
            &user,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", session);

    assert_eq!(session["status"], "in_progress");
    assert_eq!(session["is_template"], false);
    assert_eq!(session["template_id"], template["id"]);
    assert!(session["started_at"].is_string());

    let planned = template["exercises"].as_array().unwrap();
    let copied = session["exercises"].as_array().unwrap();
    assert_eq!(copied.len(), planned.len());

    for (original, copy) in planned.iter().zip(copied) {
        assert_ne!(copy["id"], original["id"]);
        assert_eq!(copy["exercise_id"], original["exercise_id"]);
        assert_eq!(copy["sort_order"], original["sort_order"]);
        assert_eq!(copy["planned_sets"], original["planned_sets"]);
        assert_eq!(copy["planned_reps"], original["planned_reps"]);
        assert_eq!(copy["planned_weight_kg"], original["planned_weight_kg"]);
        assert_eq!(copy["planned_duration_seconds"], original["planned_duration_seconds"]);
        assert!(copy["actual_sets"].is_null());
        assert!(copy["actual_reps"].is_null());
        assert_eq!(copy["is_personal_record"], false);
    }

    // The template itself is untouched
    let (_, reloaded) = app
        .get(&format!("/api/v1/workouts/{}", template["id"].as_str().unwrap()), &user)
        .await;
    assert_eq!(reloaded["status"], "planned");
    assert_eq!(reloaded["is_template"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_private_template_of_other_user_is_forbidden() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let template = create_template(&app, &owner, false).await;

    let (status, body) = app
        .post(
            "/api/v1/workouts/start",
            json!({"template_id": template["id"]}),
            &other,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_public_template_can_be_started_by_anyone() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;
    let template = create_template(&app, &owner, true).await;

    let (status, session) = app
        .post(
            "/api/v1/workouts/start",
            json!({"template_id": template["id"], "name": "Borrowed legs"}),
            &other,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", session);
    assert_eq!(session["name"], "Borrowed legs");

    let (_, templates) = app.get("/api/v1/workouts/templates", &other).await;
    assert!(templates
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == template["id"]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_completing_twice_is_invalid_state() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    let path = format!("/api/v1/workouts/{}/complete", session["id"].as_str().unwrap());

    let (status, first) = app
        .post(&path, json!({"actual_duration": 30, "actual_calories": 250}), &user)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", first);
    assert_eq!(first["workout"]["status"], "completed");
    assert_eq!(first["workout"]["actual_duration"], 30);
    assert_eq!(first["score"]["workouts_completed"], 1);
    let completed_at = first["workout"]["completed_at"].clone();

    app.clock.advance(chrono::Duration::minutes(10));
    let (status, second) = app.post(&path, json!({}), &user).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(second["error"]["code"], "INVALID_STATE");

    let (_, reloaded) = app
        .get(&format!("/api/v1/workouts/{}", session["id"].as_str().unwrap()), &user)
        .await;
    assert_eq!(reloaded["completed_at"], completed_at);

    let (_, score) = app.get("/api/v1/stats/score", &user).await;
    assert_eq!(score["workouts_completed"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_first_completion_unlocks_first_workout() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    let (status, completion) = app
        .post(
            &format!("/api/v1/workouts/{}/complete", session["id"].as_str().unwrap()),
            json!({}),
            &user,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", completion);
    let keys: Vec<&str> = completion["unlocked_achievements"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["key"].as_str())
        .collect();
    assert!(keys.contains(&"first_workout"));
    assert_eq!(completion["score"]["current_streak"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_record_exercise_flags_personal_record() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let template = create_template(&app, &user, false).await;

    let (_, session) = app
        .post("/api/v1/workouts/start", json!({"template_id": template["id"]}), &user)
        .await;
    let session_id = session["id"].as_str().unwrap();
    let entry_id = session["exercises"][0]["id"].as_str().unwrap();

    let (status, entry) = app
        .put(
            &format!("/api/v1/workouts/{}/exercises/{}", session_id, entry_id),
            json!({"actual_sets": 5, "actual_reps": 5, "actual_weight_kg": 100.0}),
            &user,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", entry);
    assert_eq!(entry["actual_sets"], 5);
    assert_eq!(entry["is_personal_record"], true);
    let one_rep_max = entry["one_rep_max"].as_f64().unwrap();
    assert!((one_rep_max - 116.67).abs() < 0.01);

    let (_, detail) = app
        .get(&format!("/api/v1/workouts/{}", session_id), &user)
        .await;
    assert_eq!(detail["completion_percentage"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cancel_then_complete_is_invalid_state() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    let id = session["id"].as_str().unwrap();

    let (status, cancelled) = app
        .post(&format!("/api/v1/workouts/{}/cancel", id), json!({}), &user)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = app
        .post(&format!("/api/v1/workouts/{}/complete", id), json!({}), &user)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_other_users_session_is_not_found() {
    let app = TestApp::new().await;
    let owner = app.create_user().await;
    let other = app.create_user().await;

    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &owner).await;
    let id = session["id"].as_str().unwrap();

    let (status, _) = app.get(&format!("/api/v1/workouts/{}", id), &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(&format!("/api/v1/workouts/{}/complete", id), json!({}), &other)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_estimate_endpoint() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let pushup = app.exercise_id("Push-up", &user).await;

    let (status, estimate) = app
        .post(
            "/api/v1/workouts/estimate",
            json!({"exercises": [{"exercise_id": pushup, "sets": 3, "reps": 10, "rest_seconds": 60}]}),
            &user,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", estimate);
    // 90 active seconds plus two 60 second rests, rounded up to whole minutes
    assert_eq!(estimate["estimated_duration"], 4);
    // 1.5 active minutes at 7 kcal/min
    assert_eq!(estimate["estimated_calories"], 11);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_single_session_policy_rejects_second_session() {
    let app = TestApp::with_config(|config| config.workouts.allow_concurrent_sessions = false).await;
    let user = app.create_user().await;

    let (status, first) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    assert_eq!(status, StatusCode::OK, "{}", first);

    let (status, body) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, planned) = app
        .post("/api/v1/workouts", json!({"name": "Later"}), &user)
        .await;
    assert_eq!(planned["status"], "planned");
    let begin_path = format!("/api/v1/workouts/{}/begin", planned["id"].as_str().unwrap());

    let (status, _) = app.post(&begin_path, json!({}), &user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Once the first session ends the planned one may begin
    app.post(
        &format!("/api/v1/workouts/{}/cancel", first["id"].as_str().unwrap()),
        json!({}),
        &user,
    )
    .await;
    let (status, begun) = app.post(&begin_path, json!({}), &user).await;
    assert_eq!(status, StatusCode::OK, "{}", begun);
    assert_eq!(begun["status"], "in_progress");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cancel_leaves_score_untouched() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (_, done) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    app.post(
        &format!("/api/v1/workouts/{}/complete", done["id"].as_str().unwrap()),
        json!({"actual_duration": 20, "actual_calories": 150}),
        &user,
    )
    .await;
    let (_, before) = app.get("/api/v1/stats/score", &user).await;

    app.clock.advance(chrono::Duration::days(1));
    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    let (status, _) = app
        .post(
            &format!("/api/v1/workouts/{}/cancel", session["id"].as_str().unwrap()),
            json!({}),
            &user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = app.get("/api/v1/stats/score", &user).await;
    assert_eq!(after["workouts_completed"], before["workouts_completed"]);
    assert_eq!(after["total_workout_minutes"], before["total_workout_minutes"]);
    assert_eq!(after["total_calories_burned"], before["total_calories_burned"]);
    assert_eq!(after["total_points"], before["total_points"]);
    assert_eq!(after["best_streak"], before["best_streak"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_completed_workout_recomputes_score() {
    let app = TestApp::new().await;
    let user = app.create_user().await;

    let (_, session) = app.post("/api/v1/workouts/start", json!({}), &user).await;
    let id = session["id"].as_str().unwrap();
    let (_, completion) = app
        .post(
            &format!("/api/v1/workouts/{}/complete", id),
            json!({"actual_duration": 45, "actual_calories": 300}),
            &user,
        )
        .await;
    assert_eq!(completion["score"]["workouts_completed"], 1);
    assert_eq!(completion["score"]["total_workout_minutes"], 45);

    let (status, body) = app.delete(&format!("/api/v1/workouts/{}", id), &user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (_, score) = app.get("/api/v1/stats/score", &user).await;
    assert_eq!(score["workouts_completed"], 0);
    assert_eq!(score["total_workout_minutes"], 0);
    assert_eq!(score["total_calories_burned"], 0);
    assert_eq!(score["current_streak"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cancelled_session_does_not_set_personal_record_bar() {
    let app = TestApp::new().await;
    let user = app.create_user().await;
    let template = create_template(&app, &user, false).await;

    let (_, abandoned) = app
        .post("/api/v1/workouts/start", json!({"template_id": template["id"]}), &user)
        .await;
    let abandoned_id = abandoned["id"].as_str().unwrap();
    let (status, heavy) = app
        .put(
            &format!(
                "/api/v1/workouts/{}/exercises/{}",
                abandoned_id,
                abandoned["exercises"][0]["id"].as_str().unwrap()
            ),
            json!({"actual_sets": 5, "actual_reps": 5, "actual_weight_kg": 140.0}),
            &user,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", heavy);
    app.post(&format!("/api/v1/workouts/{}/cancel", abandoned_id), json!({}), &user)
        .await;

    let (_, session) = app
        .post("/api/v1/workouts/start", json!({"template_id": template["id"]}), &user)
        .await;
    let (status, entry) = app
        .put(
            &format!(
                "/api/v1/workouts/{}/exercises/{}",
                session["id"].as_str().unwrap(),
                session["exercises"][0]["id"].as_str().unwrap()
            ),
            json!({"actual_sets": 5, "actual_reps": 5, "actual_weight_kg": 100.0}),
            &user,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", entry);
    assert_eq!(entry["is_personal_record"], true);
}
