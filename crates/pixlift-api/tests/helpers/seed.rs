//! Seeding flows: create library items through the public generation API.
//!
//! With no AI clients configured the generation routes return demo artifacts,
//! which still travel the full save path (blob write plus record insert).

use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use super::auth::TestUser;
use super::fixtures;

/// Generate `count` demo images saved to the user's library; returns the new
/// item ids in response order.
pub async fn seed_library_images(client: &TestServer, user: &TestUser, count: usize) -> Vec<Uuid> {
    let response = client
        .post("/api/generate")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "prompt": "a ceramic vase on a wooden shelf",
            "number_of_images": count,
        }))
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "seed generate failed: {}",
        response.text()
    );

    let body: Value = response.json();
    let ids: Vec<Uuid> = body["library_ids"]
        .as_array()
        .expect("generate response missing library_ids")
        .iter()
        .map(|id| {
            id.as_str()
                .and_then(|raw| Uuid::parse_str(raw).ok())
                .expect("library id is not a UUID")
        })
        .collect();
    assert_eq!(ids.len(), count);
    ids
}

/// Generate one demo video saved to the user's library; returns the item id.
pub async fn seed_library_video(client: &TestServer, user: &TestUser) -> Uuid {
    let response = client
        .post("/api/fashion-motion")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({
            "image_base64": fixtures::minimal_png_base64(),
            "mime_type": "image/png",
        }))
        .await;
    assert_eq!(
        response.status_code(),
        200,
        "seed fashion-motion failed: {}",
        response.text()
    );

    let body: Value = response.json();
    body["library_ids"][0]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("fashion-motion response missing library id")
}
