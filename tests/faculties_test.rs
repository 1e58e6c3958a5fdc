//! Faculty API integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn faculty_crud() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let created: serde_json::Value = client
        .post(format!("http://{addr}/api/faculties"))
        .json(&json!({"name": "Sciences", "color": "green"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Sciences");

    let updated: serde_json::Value = client
        .put(format!("http://{addr}/api/faculties/{id}"))
        .json(&json!({"name": "Sciences", "color": "teal"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["color"], "teal");

    let resp = client
        .delete(format!("http://{addr}/api/faculties/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("http://{addr}/api/faculties/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn search_matches_name_or_color_ignoring_case() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    for (name, color) in [("Arts", "red"), ("Law", "Crimson"), ("Medicine", "white")] {
        client
            .post(format!("http://{addr}/api/faculties"))
            .json(&json!({"name": name, "color": color}))
            .send()
            .await
            .unwrap();
    }

    let by_color: serde_json::Value = client
        .get(format!("http://{addr}/api/faculties?query=crimson"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_color.as_array().unwrap().len(), 1);
    assert_eq!(by_color[0]["name"], "Law");

    let by_name: serde_json::Value = client
        .get(format!("http://{addr}/api/faculties?query=ARTS"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name[0]["color"], "red");

    let all: serde_json::Value = client
        .get(format!("http://{addr}/api/faculties"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn faculty_students_listing() {
    let (h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let faculty: serde_json::Value = client
        .post(format!("http://{addr}/api/faculties"))
        .json(&json!({"name": "History", "color": "brown"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fid = faculty["id"].as_i64().unwrap();

    for name in ["Nia", "Omar"] {
        client
            .post(format!("http://{addr}/api/students"))
            .json(&json!({"name": name, "age": 20, "faculty_id": fid}))
            .send()
            .await
            .unwrap();
    }
    h.enroll("Pia", 21); // no faculty

    let members: serde_json::Value = client
        .get(format!("http://{addr}/api/faculties/{fid}/students"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(members.as_array().unwrap().len(), 2);
    assert!(members
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["faculty_id"] == fid));
}

#[tokio::test]
async fn deleting_faculty_detaches_students() {
    let (_h, addr) = TestHarness::with_server().await;
    let client = reqwest::Client::new();

    let faculty: serde_json::Value = client
        .post(format!("http://{addr}/api/faculties"))
        .json(&json!({"name": "Music", "color": "gold"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fid = faculty["id"].as_i64().unwrap();

    let student: serde_json::Value = client
        .post(format!("http://{addr}/api/students"))
        .json(&json!({"name": "Quin", "age": 19, "faculty_id": fid}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sid = student["id"].as_i64().unwrap();

    client
        .delete(format!("http://{addr}/api/faculties/{fid}"))
        .send()
        .await
        .unwrap();

    // ON DELETE SET NULL leaves the student behind without a faculty
    let fetched: serde_json::Value = client
        .get(format!("http://{addr}/api/students/{sid}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(fetched["faculty_id"].is_null());
}
