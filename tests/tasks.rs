mod common;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, http::StatusCode, rt, test, App, HttpServer};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::TcpListener;
use taskgate::models::Task;
use taskgate::routes;

use common::{bearer, init_app, login, test_state, ADMIN_USERNAME};

#[actix_rt::test]
async fn test_task_lifecycle() {
    let (state, _) = test_state();
    let app = init_app(&state).await;
    let token = login(&app).await;

    // Create: client-supplied id and flag are ignored.
    let req = test::TestRequest::post()
        .uri("/api/todo")
        .insert_header(bearer(&token))
        .set_json(json!({ "id": 999, "title": "Buy milk", "is_completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let created: Task = test::read_body_json(resp).await;

    assert_ne!(created.id, 999);
    assert_eq!(location, Some(format!("/api/todo/{}", created.id)));
    assert_eq!(created.title, "Buy milk");
    assert!(!created.is_completed);
    assert!(created.completed_at.is_none());

    // Complete it.
    let before = Utc::now();
    let req = test::TestRequest::put()
        .uri(&format!("/api/todo/{}", created.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk", "is_completed": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Task = test::read_body_json(resp).await;
    let after = Utc::now();

    assert!(completed.is_completed);
    let completed_at = completed.completed_at.expect("completion time set");
    assert!(completed_at >= before - Duration::seconds(1) && completed_at <= after);
    assert_eq!(completed.created_at, created.created_at);

    // Reopen it.
    let req = test::TestRequest::put()
        .uri(&format!("/api/todo/{}", created.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Buy milk", "description": "2 litres", "is_completed": false }))
        .to_request();
    let reopened: Task = test::call_and_read_body_json(&app, req).await;
    assert!(!reopened.is_completed);
    assert!(reopened.completed_at.is_none());
    assert_eq!(reopened.description.as_deref(), Some("2 litres"));

    // Read back.
    let req = test::TestRequest::get()
        .uri(&format!("/api/todo/{}", created.id))
        .insert_header(bearer(&token))
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, reopened);

    // Delete twice: the second is a plain not-found.
    for expected in [StatusCode::NO_CONTENT, StatusCode::NOT_FOUND] {
        let req = test::TestRequest::delete()
            .uri(&format!("/api/todo/{}", created.id))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_rt::test]
async fn test_listing_endpoints_filter_and_order() {
    let (state, _) = test_state();
    let app = init_app(&state).await;
    let token = login(&app).await;

    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/todo")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title }))
            .to_request();
        let task: Task = test::call_and_read_body_json(&app, req).await;
        ids.push(task.id);
        // Keep creation timestamps distinct.
        rt::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    // Complete "third" before "first": completion order is the reverse of creation order.
    for (id, title) in [(ids[2], "third"), (ids[0], "first")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/todo/{}", id))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title, "is_completed": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        rt::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let list = |uri: &'static str| test::TestRequest::get().uri(uri).insert_header(bearer(&token)).to_request();

    let all: Vec<Task> = test::call_and_read_body_json(&app, list("/api/todo")).await;
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[2], ids[1], ids[0]]);

    let completed: Vec<Task> = test::call_and_read_body_json(&app, list("/api/todo/completed")).await;
    assert_eq!(completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[0], ids[2]]);
    assert!(completed.iter().all(|t| t.completed_at.is_some()));

    let pending: Vec<Task> = test::call_and_read_body_json(&app, list("/api/todo/pending")).await;
    assert_eq!(pending.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[1]]);
    assert!(pending.iter().all(|t| t.completed_at.is_none()));
}

#[actix_rt::test]
async fn test_invalid_task_inputs() {
    let (state, repository) = test_state();
    let app = init_app(&state).await;
    let token = login(&app).await;

    let test_cases = vec![
        (json!({ "description": "no title" }), StatusCode::BAD_REQUEST, "missing title"),
        (json!({ "title": 42 }), StatusCode::BAD_REQUEST, "non-string title"),
        (json!({ "title": "" }), StatusCode::UNPROCESSABLE_ENTITY, "empty title"),
        (json!({ "title": "   " }), StatusCode::UNPROCESSABLE_ENTITY, "blank title"),
        (json!({ "title": "a".repeat(201) }), StatusCode::UNPROCESSABLE_ENTITY, "title too long"),
        (
            json!({ "title": "ok", "description": "b".repeat(501) }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "description too long",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/todo")
            .insert_header(bearer(&token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body_bytes)
        );
        // Every failure shares the JSON error shape.
        let body: serde_json::Value = serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| panic!("{}: body is not JSON", description));
        assert!(body["error"].is_string(), "{}", description);
    }
    assert!(repository.is_empty());

    // Field-level detail on validation failures.
    let req = test::TestRequest::post()
        .uri("/api/todo")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["fields"]["title"].is_array());
}

#[actix_rt::test]
async fn test_unknown_task_is_not_found() {
    let (state, _) = test_state();
    let app = init_app(&state).await;
    let token = login(&app).await;

    let req = test::TestRequest::get()
        .uri("/api/todo/4242")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/todo/4242")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "ghost", "is_completed": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_non_numeric_task_id_is_bad_request() {
    let (state, _) = test_state();
    let app = init_app(&state).await;
    let token = login(&app).await;

    let req = test::TestRequest::get()
        .uri("/api/todo/abc")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn test_expired_token_has_no_side_effects() {
    let (state, repository) = test_state();
    let app = init_app(&state).await;

    let (expired, _) = state
        .auth
        .tokens()
        .issue_at(ADMIN_USERNAME, Utc::now() - Duration::days(2))
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/todo")
        .insert_header(bearer(&expired))
        .set_json(json!({ "title": "Should never be stored" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(repository.is_empty());

    // Nor can it remove anything that exists.
    let token = login(&app).await;
    let req = test::TestRequest::post()
        .uri("/api/todo")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Keep me" }))
        .to_request();
    let kept: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todo/{}", kept.id))
        .insert_header(bearer(&expired))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(repository.len(), 1);
}

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let (state, repository) = test_state();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        let state = server_state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/todo", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert!(repository.is_empty());

    handle.stop(true).await;
}
