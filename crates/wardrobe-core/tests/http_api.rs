//! `HttpWardrobeApi` against an in-process axum backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use wardrobe_core::api::{HttpWardrobeApi, WardrobeApi};
use wardrobe_core::config::ApiConfig;
use wardrobe_core::lazy_fetch::{FetchState, LazyFetchCache};
use wardrobe_core::model::{CandidateSet, OutfitRequest};
use wardrobe_core::WardrobeError;

#[derive(Default)]
struct Seen {
    list_limits: Vec<String>,
    web_bodies: Vec<Value>,
    outfit_bodies: Vec<Value>,
    uploads: Vec<(String, usize)>,
    weather_queries: Vec<HashMap<String, String>>,
}

type Shared = Arc<Mutex<Seen>>;

fn item(id: &str, class_name: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{id}.jpg"),
        "class_name": class_name,
        "confidence": 0.91,
        "color_hex": "#1F2A44",
        "thickness": "Midweight",
        "created_at": "2024-05-01T10:20:30.123456"
    })
}

async fn list(State(seen): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock()
        .unwrap()
        .list_limits
        .push(q.get("limit").cloned().unwrap_or_default());
    Json(json!([item("a1", "Shirt"), item("b1", "Jeans")]))
}

async fn get_item(Path(id): Path<String>) -> Response {
    if id == "a1" {
        Json(item("a1", "Shirt")).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Item not found"}))).into_response()
    }
}

async fn web(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().web_bodies.push(body.clone());
    let name = body["item_names"][0].as_str().unwrap_or_default().to_string();
    if name == "Hoodie" {
        Json(json!({
            "web_recommendations": {
                "Hoodie": [{
                    "category": "Hoodies",
                    "title": "Zip Hoodie",
                    "link": "https://shop.example/zip",
                    "price": "PKR 3,499",
                    "default_image": null,
                    "hover_image": "https://shop.example/zip-2.jpg",
                    "colors": []
                }]
            }
        }))
    } else {
        Json(json!({"web_recommendations": {}}))
    }
}

async fn outfits(State(seen): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().outfit_bodies.push(body);
    Json(json!({
        "outfits": [{"top": item("a1", "Shirt"), "bottom": item("b1", "Jeans"), "compatibility_score": 0.74}],
        "total_combinations": 1
    }))
}

async fn face() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"detail": "No face detected"}))).into_response()
}

async fn upload(State(seen): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            seen.lock().unwrap().uploads.push((name.clone(), bytes.len()));
            return Json(item("new1", "Blazer")).into_response();
        }
    }
    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "file missing"}))).into_response()
}

async fn weather(
    State(seen): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().weather_queries.push(q);
    Json(json!({
        "weather": {"temp_c": 31.5, "main": "Clear"},
        "suggestion": {"shirt": item("a1", "Shirt"), "pant": null, "outer": null},
        "notes": ["Hot day"]
    }))
}

async fn serve() -> (HttpWardrobeApi, Shared) {
    let seen: Shared = Arc::default();
    let app = Router::new()
        .route("/wardrobe", get(list))
        .route("/item/{id}", get(get_item))
        .route("/web-recommendations", post(web))
        .route("/outfit-recommendations", post(outfits))
        .route("/face-recommendations", post(face))
        .route("/upload", post(upload))
        .route("/recommend", get(weather))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}"),
        ..Default::default()
    };
    (HttpWardrobeApi::from_config(&config).unwrap(), seen)
}

#[tokio::test]
async fn list_wardrobe_sends_limit() {
    let (api, seen) = serve().await;
    let items = api.list_wardrobe(200).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].class_name, "Shirt");
    assert!(items[0].created_at.is_some());
    assert_eq!(seen.lock().unwrap().list_limits, vec!["200"]);
}

#[tokio::test]
async fn get_item_found_and_missing() {
    let (api, _) = serve().await;
    assert_eq!(api.get_item("a1").await.unwrap().id, "a1");
    let err = api.get_item("nope").await.unwrap_err();
    assert!(matches!(err, WardrobeError::NotFound(_)));
}

#[tokio::test]
async fn backend_detail_becomes_error_message() {
    let (api, _) = serve().await;
    let err = api
        .face_recommendations("me.jpg", vec![0xFF, 0xD8])
        .await
        .unwrap_err();
    assert!(matches!(err, WardrobeError::Fetch(_)));
    assert!(err.to_string().contains("No face detected"));
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let (api, seen) = serve().await;
    let created = api.upload_item("blazer.png", vec![1, 2, 3, 4]).await.unwrap();
    assert_eq!(created.class_name, "Blazer");
    assert_eq!(
        seen.lock().unwrap().uploads,
        vec![("blazer.png".to_string(), 4)]
    );
}

#[tokio::test]
async fn outfit_request_body_shape() {
    let (api, seen) = serve().await;
    let set = CandidateSet {
        top_ids: vec!["a1".into(), "a1".into()],
        bottom_ids: vec!["b1".into()],
    };
    let resp = api
        .outfit_recommendations(&OutfitRequest::from(&set))
        .await
        .unwrap();
    assert_eq!(resp.total_combinations, 1);
    assert!((resp.outfits[0].compatibility_score - 0.74).abs() < 1e-6);
    assert_eq!(
        seen.lock().unwrap().outfit_bodies[0],
        json!({"top_item_ids": ["a1", "a1"], "bottom_item_ids": ["b1"]})
    );
}

#[tokio::test]
async fn weather_query_is_encoded() {
    let (api, seen) = serve().await;
    let rec = api
        .weather_recommendation("San José", Some("k&y"))
        .await
        .unwrap();
    assert_eq!(rec.weather.main, "Clear");
    assert_eq!(rec.suggestion.shirt.unwrap().id, "a1");
    assert!(rec.recommendations.is_none());

    let q = seen.lock().unwrap().weather_queries[0].clone();
    assert_eq!(q.get("city").map(String::as_str), Some("San José"));
    assert_eq!(q.get("openweather_key").map(String::as_str), Some("k&y"));
}

#[tokio::test]
async fn lazy_cache_over_http() {
    let (api, seen) = serve().await;
    let mut cache = LazyFetchCache::new(Arc::new(api));

    cache.request("Hoodie");
    cache.request("Hoodie");
    cache.request("Saree");
    while cache.next_completion().await.is_some() {}

    match cache.state("Hoodie") {
        FetchState::Resolved(products) => {
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].title, "Zip Hoodie");
            assert!(products[0].default_image.is_none());
        }
        other => panic!("expected resolved, got {other:?}"),
    }
    assert_eq!(cache.state("Saree"), FetchState::Resolved(&[]));

    let bodies = seen.lock().unwrap().web_bodies.clone();
    assert_eq!(bodies.len(), 2);
    assert!(bodies.contains(&json!({"item_names": ["Hoodie"]})));
}
