use serde_json::json;

use crate::common::{TestApp, routes};

/// Import a couple of problems through the API so reads have data.
async fn import_fixture(app: &TestApp, token: &str) {
    app.create_import_batch("fixture").await;
    let res = app
        .post_with_token(
            routes::PROBLEM_IMPORT,
            &json!({
                "importId": "fixture",
                "problems": [
                    {
                        "title": "Two Sum",
                        "description": "Find two numbers that add to a target.",
                        "difficulty": "Easy",
                        "points": 100,
                        "solution_code": "secret reference solution",
                        "test_cases": [
                            {"input": "1 2", "expected_output": "3"},
                            {"input": "2 2", "expected_output": "4"},
                            {"input": "5 5", "expected_output": "10"},
                        ],
                    },
                    {
                        "title": "Longest Path",
                        "description": "Find the longest path in a DAG.",
                        "difficulty": "Hard",
                        "points": 300,
                    },
                ],
            }),
            token,
        )
        .await;
    assert_eq!(res.status, 200, "fixture import failed: {}", res.text);
    assert_eq!(res.body["successful"], 2);
}

#[tokio::test]
async fn imported_problems_show_up_in_the_list() {
    let app = TestApp::spawn().await;
    let token = app.token_for(1, "reader");
    import_fixture(&app, &token).await;

    let res = app.get_with_token(routes::PROBLEMS, &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["pagination"]["total"], 2);

    let res = app
        .get_with_token(&format!("{}?search=two", routes::PROBLEMS), &token)
        .await;
    assert_eq!(res.status, 200);
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Two Sum");
    assert_eq!(data[0]["difficulty"], "easy");
    // List items carry no statement or code fields.
    assert!(data[0].get("description").is_none());
}

#[tokio::test]
async fn problem_detail_exposes_samples_but_not_the_solution() {
    let app = TestApp::spawn().await;
    let token = app.token_for(1, "reader");
    import_fixture(&app, &token).await;

    let list = app
        .get_with_token(&format!("{}?search=two", routes::PROBLEMS), &token)
        .await;
    let id = list.body["data"][0]["id"].as_i64().unwrap() as i32;

    let res = app.get_with_token(&routes::problem(id), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["title"], "Two Sum");
    assert_eq!(res.body["time_limit_ms"], 1000);

    // Only the two default samples, in order; the third case stays hidden.
    let samples = res.body["sample_test_cases"].as_array().unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["order_index"], 0);
    assert_eq!(samples[1]["order_index"], 1);

    assert!(res.body.get("solution_code").is_none());
}

#[tokio::test]
async fn unknown_problem_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for(1, "reader");

    let res = app.get_with_token(&routes::problem(4242), &token).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn listing_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::PROBLEMS).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["error"], "Missing authorization header");
}
