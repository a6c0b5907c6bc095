mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, create_project, create_task, send, signup, test_app};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

#[actix_rt::test]
async fn test_project_and_task_lifecycle() {
    let app = test_app().await;
    let (token, _) = signup(&app, "garage@example.com", "Garage Owner").await;

    let project = create_project(
        &app,
        &token,
        json!({ "name": "Clean garage", "deadline": "2025-01-01" }),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&project_id).is_ok());
    assert!(project["created_at"].is_string());
    assert_eq!(project["name"], "Clean garage");
    assert_eq!(project["deadline"], "2025-01-01");
    assert_eq!(project["tasks"], json!([]));

    let task = create_task(
        &app,
        &token,
        &project_id,
        json!({ "title": "Sort tools", "weight": 2 }),
    )
    .await;
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["project_id"], project_id.as_str());
    assert_eq!(task["completed"], false);
    assert_eq!(task["weight"], 2.0);

    let req = test::TestRequest::get()
        .uri(&format!("/projects/{}", project_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, fetched) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["tasks"], json!([task]));

    let req = test::TestRequest::patch()
        .uri(&format!("/tasks/{}/toggle", task_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, toggled) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);

    let req = test::TestRequest::delete()
        .uri(&format!("/projects/{}", project_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/projects/{}", project_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_rt::test]
async fn test_toggle_twice_restores_completed() {
    let app = test_app().await;
    let (token, _) = signup(&app, "toggle@example.com", "Toggler").await;
    let project = create_project(&app, &token, json!({ "name": "Chores" })).await;
    let task = create_task(
        &app,
        &token,
        project["id"].as_str().unwrap(),
        json!({ "title": "Dishes" }),
    )
    .await;
    assert_eq!(task["weight"], 1.0);

    let uri = format!("/tasks/{}/toggle", task["id"].as_str().unwrap());
    let mut last = task.clone();
    for _ in 0..2 {
        let req = test::TestRequest::patch()
            .uri(&uri)
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["completed"], last["completed"]);
        last = body;
    }

    assert_eq!(last, task);
}

#[actix_rt::test]
async fn test_deleting_project_removes_its_tasks() {
    let app = test_app().await;
    let (token, _) = signup(&app, "cascade@example.com", "Cascade").await;
    let project = create_project(&app, &token, json!({ "name": "Move out" })).await;
    let project_id = project["id"].as_str().unwrap();

    let mut task_ids = Vec::new();
    for title in ["Pack", "Clean", "Return keys"] {
        let task = create_task(&app, &token, project_id, json!({ "title": title })).await;
        task_ids.push(task["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/projects/{}", project_id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    for task_id in task_ids {
        let req = test::TestRequest::patch()
            .uri(&format!("/tasks/{}/toggle", task_id))
            .insert_header(bearer(&token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/tasks/{}", task_id))
            .insert_header(bearer(&token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn test_other_users_entities_look_missing() {
    let app = test_app().await;
    let (alice, _) = signup(&app, "alice@example.com", "Alice").await;
    let (bob, _) = signup(&app, "bob@example.com", "Bob").await;

    let project = create_project(&app, &alice, json!({ "name": "Alice's" })).await;
    let project_id = project["id"].as_str().unwrap();
    let task = create_task(&app, &alice, project_id, json!({ "title": "Private" })).await;
    let task_id = task["id"].as_str().unwrap();

    let missing_project = format!("/projects/{}", Uuid::new_v4());
    let req = test::TestRequest::get()
        .uri(&missing_project)
        .insert_header(bearer(&bob))
        .to_request();
    let (_, missing_body) = send(&app, req).await;

    let requests = vec![
        test::TestRequest::get().uri(&format!("/projects/{}", project_id)),
        test::TestRequest::delete().uri(&format!("/projects/{}", project_id)),
        test::TestRequest::post()
            .uri(&format!("/projects/{}/tasks", project_id))
            .set_json(json!({ "title": "Intrusion" })),
    ];
    for req in requests {
        let (status, body) = send(&app, req.insert_header(bearer(&bob)).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, missing_body);
    }

    let requests = vec![
        test::TestRequest::patch().uri(&format!("/tasks/{}/toggle", task_id)),
        test::TestRequest::delete().uri(&format!("/tasks/{}", task_id)),
    ];
    for req in requests {
        let (status, body) = send(&app, req.insert_header(bearer(&bob)).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    let req = test::TestRequest::get()
        .uri("/projects")
        .insert_header(bearer(&bob))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Nothing Bob tried changed Alice's data.
    let req = test::TestRequest::get()
        .uri(&format!("/projects/{}", project_id))
        .insert_header(bearer(&alice))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"], json!([task]));
}

#[actix_rt::test]
async fn test_list_projects_in_creation_order_with_tasks() {
    let app = test_app().await;
    let (token, _) = signup(&app, "lister@example.com", "Lister").await;

    let first = create_project(
        &app,
        &token,
        json!({ "name": "First", "description": "d", "reward": "Ice cream" }),
    )
    .await;
    let second = create_project(&app, &token, json!({ "name": "Second" })).await;
    let a = create_task(&app, &token, second["id"].as_str().unwrap(), json!({ "title": "a" })).await;
    let b = create_task(
        &app,
        &token,
        second["id"].as_str().unwrap(),
        json!({ "title": "b", "description": "second task", "weight": 0.5 }),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/projects")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["id"], first["id"]);
    assert_eq!(projects[0]["reward"], "Ice cream");
    assert_eq!(projects[0]["tasks"], json!([]));
    assert_eq!(projects[1]["id"], second["id"]);
    assert_eq!(projects[1]["tasks"], json!([a, b]));
}

#[actix_rt::test]
async fn test_invalid_project_and_task_inputs() {
    let app = test_app().await;
    let (token, _) = signup(&app, "inputs@example.com", "Inputs").await;

    let req = test::TestRequest::post()
        .uri("/projects")
        .insert_header(bearer(&token))
        .set_json(json!({ "description": "no name" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation");

    let req = test::TestRequest::post()
        .uri("/projects")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"].get("name").is_some(), "{}", body);

    let project = create_project(&app, &token, json!({ "name": "Valid" })).await;
    let req = test::TestRequest::post()
        .uri(&format!("/projects/{}/tasks", project["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_deadline_is_not_checked_against_calendar() {
    let app = test_app().await;
    let (token, _) = signup(&app, "deadline@example.com", "Deadline").await;

    let project = create_project(
        &app,
        &token,
        json!({ "name": "Someday", "deadline": "2025-02-31" }),
    )
    .await;
    assert_eq!(project["deadline"], "2025-02-31");
}

#[actix_rt::test]
async fn test_malformed_ids_are_not_found() {
    let app = test_app().await;
    let (token, _) = signup(&app, "ids@example.com", "Ids").await;

    for uri in ["/projects/not-a-uuid", "/tasks/42/toggle"] {
        let req = if uri.ends_with("toggle") {
            test::TestRequest::patch()
        } else {
            test::TestRequest::get()
        };
        let (status, body) = send(&app, req.uri(uri).insert_header(bearer(&token)).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["code"], "not_found", "{}", uri);
    }
}

#[actix_rt::test]
async fn test_project_routes_require_token() {
    let app = test_app().await;

    let requests = vec![
        test::TestRequest::get().uri("/projects"),
        test::TestRequest::post()
            .uri("/projects")
            .set_json(json!({ "name": "Anonymous" })),
        test::TestRequest::get().uri(&format!("/projects/{}", Uuid::new_v4())),
        test::TestRequest::patch().uri(&format!("/tasks/{}/toggle", Uuid::new_v4())),
        test::TestRequest::delete().uri(&format!("/tasks/{}", Uuid::new_v4())),
    ];

    for req in requests {
        let (status, body) = send(&app, req.to_request()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthenticated");
    }
}
