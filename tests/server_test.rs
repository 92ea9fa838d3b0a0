//! End-to-end HTTP tests with stub model backends.

mod common;

use std::sync::Arc;

use common::{answers, stub_pipeline, NameBookGenerator, StubEngine};
use pronounce_rs::engines::elevenlabs::VoiceCatalog;
use pronounce_rs::server::{AppState, PronounceServer};
use serde_json::{json, Value};
use tempfile::TempDir;

struct Harness {
    server: PronounceServer,
    client: reqwest::Client,
    engine: Arc<StubEngine>,
    generator: Arc<NameBookGenerator>,
    _static_dir: TempDir,
}

impl Harness {
    async fn start() -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("index.html"), "<h1>landing</h1>").unwrap();

        let generator = Arc::new(
            NameBookGenerator::default()
                .with("Siobhan", answers("Irish", 0.85, None, "Siobhan"))
                .with("Li Wei", answers("Chinese", 0.9, Some("李伟"), "Li Wei")),
        );
        let engine = Arc::new(StubEngine::default());
        let pipeline = stub_pipeline(
            generator.clone(),
            engine.clone(),
            &static_dir.path().join("audio"),
        );

        let state = AppState::new(pipeline, static_dir.path());
        let server = PronounceServer::start(state, "127.0.0.1:0").await.unwrap();

        Self {
            server,
            client: reqwest::Client::new(),
            engine,
            generator,
            _static_dir: static_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.server.addr(), path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(&body).send().await.unwrap()
    }
}

#[tokio::test]
async fn landing_page_and_traversal() {
    let h = Harness::start().await;

    let response = h.get("/").await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("landing"));

    assert_eq!(h.get("/static/../Cargo.toml").await.status(), 404);
    assert_eq!(h.get("/static/missing.js").await.status(), 404);
}

#[tokio::test]
async fn voices_lists_specialized_then_general() {
    let h = Harness::start().await;
    let catalog = VoiceCatalog::default();

    let voices: Vec<Value> = h.get("/voices").await.json().await.unwrap();
    assert_eq!(voices.len(), catalog.len());
    assert_eq!(voices[0]["category"], "Specialized");
    assert_eq!(voices[0]["voice_id"], catalog.specialized[0].voice_id.as_str());
    assert_eq!(voices.last().unwrap()["category"], "General");
}

#[tokio::test]
async fn pronounce_runs_full_chain_and_serves_audio() {
    let h = Harness::start().await;

    let body: Value = h
        .post("/pronounce", json!({"name": "Li Wei", "voice_id": null}))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["ethnicity_result"]["ethnicity"], "Chinese");
    assert_eq!(body["transliteration_result"]["native_script"], "李伟");
    assert_eq!(body["transliteration_result"]["transliteration_successful"], true);
    let pronunciation = &body["pronunciation_result"];
    assert_eq!(pronunciation["status"], "success");
    assert_eq!(pronunciation["selection_method"], "automatic_specific");
    assert_eq!(pronunciation["voice_name"], "Amy");

    let audio = pronunciation["audio_output"].as_str().unwrap();
    let response = h.get(audio).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "audio/mpeg");
    assert_eq!(h.engine.requests.lock().unwrap()[0].0, "李伟");
}

#[tokio::test]
async fn explicit_voice_is_manual() {
    let h = Harness::start().await;

    let body: Value = h
        .post("/pronounce", json!({"name": "Siobhan", "voice_id": "my-voice"}))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["transliteration_result"]["native_script"], "Siobhan");
    assert_eq!(body["pronunciation_result"]["selection_method"], "manual");
    assert_eq!(body["pronunciation_result"]["voice_id_used"], "my-voice");
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let h = Harness::start().await;
    let response = h.post("/pronounce", json!({"name": "   "})).await;
    assert_eq!(response.status(), 400);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn fan_out_routes_return_one_result_per_voice() {
    let h = Harness::start().await;
    let catalog = VoiceCatalog::default();

    let all: Value = h
        .post("/pronounce/all", json!({"name": "Siobhan"}))
        .await
        .json()
        .await
        .unwrap();
    let results = all["pronunciation_result"].as_array().unwrap();
    assert_eq!(results.len(), catalog.specialized.len());
    assert!(results.iter().all(|r| r["voice_name"].is_string()));

    let general: Value = h
        .post("/pronounce/general", json!({"name": "Siobhan"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        general["pronunciation_result"].as_array().unwrap().len(),
        catalog.general.len()
    );
    // Two stage-1/2 model calls per request.
    assert_eq!(h.generator.calls(), 4);
}

#[tokio::test]
async fn record_ids_increase_across_single_and_bulk_ingestion() {
    let h = Harness::start().await;

    let first: Value = h
        .post("/api/names", json!({"name": "Siobhan", "expected_ethnicity": "Irish"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(first["status"], "untested");
    assert_eq!(first["expected_ethnicity"], "Irish");

    let bulk: Value = h
        .post("/api/bulk-process", json!({"names": ["Li Wei"]}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(bulk["results"][0]["record"]["id"], 2);

    let third: Value = h
        .post("/api/names", json!({"name": "Haruki"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(third["id"], 3);

    let names: Vec<Value> = h.get("/api/names").await.json().await.unwrap();
    let ids: Vec<u64> = names.iter().map(|n| n["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn bulk_skips_blank_entries() {
    let h = Harness::start().await;

    let body: Value = h
        .post(
            "/api/bulk-process",
            json!({"names": ["", "  ", "Li Wei"], "generate_pronunciations": false}),
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["processed_count"], 1);
    assert_eq!(body["failed_count"], 0);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Li Wei");
    assert_eq!(results[0]["record"]["native_script"], "李伟");
    assert_eq!(results[0]["record"]["audio_path"], Value::Null);
    assert_eq!(results[0]["transliteration_successful"], true);

    let names: Vec<Value> = h.get("/api/names").await.json().await.unwrap();
    assert_eq!(names.len(), 1);
    assert!(h.engine.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn bulk_stores_unclassified_names_for_review() {
    let h = Harness::start().await;

    let body: Value = h
        .post(
            "/api/bulk-process",
            json!({"names": ["Siobhan", "Unknown Person"], "generate_pronunciations": true}),
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["processed_count"], 2);
    assert_eq!(body["failed_count"], 0);
    assert!(body["results"][0]["record"]["audio_path"]
        .as_str()
        .unwrap()
        .starts_with("/static/audio/"));

    let unknown = &body["results"][1];
    assert_eq!(unknown["success"], true);
    assert_eq!(unknown["ethnicity_confidence"], 0.0);
    assert_eq!(unknown["transliteration_successful"], false);
    assert_eq!(unknown["record"]["detected_ethnicity"], "Error");
    assert_eq!(unknown["record"]["native_script"], "Unknown Person");
    assert_eq!(unknown["record"]["status"], "untested");

    let names: Vec<Value> = h.get("/api/names").await.json().await.unwrap();
    assert_eq!(names.len(), 2);

    let updated: Value = h
        .put(
            &format!("/api/names/{}/status", unknown["record"]["id"]),
            json!({"status": "needs_review"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["status"], "needs_review");
}

#[tokio::test]
async fn empty_bulk_request_is_rejected() {
    let h = Harness::start().await;
    let response = h.post("/api/bulk-process", json!({"names": []})).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "No names provided");
}

#[tokio::test]
async fn status_and_field_updates() {
    let h = Harness::start().await;
    h.post("/api/names", json!({"name": "Siobhan"})).await;

    let updated: Value = h
        .put("/api/names/1/status", json!({"status": "needs_review"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["status"], "needs_review");
    assert!(updated["last_tested"].is_string());

    let updated: Value = h
        .put(
            "/api/names/1/update",
            json!({"detected_ethnicity": "Irish", "audio_path": "/static/audio/x.mp3"}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(updated["detected_ethnicity"], "Irish");
    assert_eq!(updated["audio_path"], "/static/audio/x.mp3");
    assert_eq!(updated["status"], "needs_review");
}

#[tokio::test]
async fn unknown_record_is_not_found_and_store_unchanged() {
    let h = Harness::start().await;
    h.post("/api/names", json!({"name": "Siobhan"})).await;
    let before: Value = h.get("/api/names").await.json().await.unwrap();

    let response = h
        .put("/api/names/9999/status", json!({"status": "correct"}))
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Name not found");

    let response = h
        .put("/api/names/9999/update", json!({"native_script": "x"}))
        .await;
    assert_eq!(response.status(), 404);

    let after: Value = h.get("/api/names").await.json().await.unwrap();
    assert_eq!(before, after);
}

#[test]
fn admin_page_renders_record_fields_as_text() {
    let page = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("static/admin.html"),
    )
    .unwrap();
    assert!(!page.contains("innerHTML"));
    assert!(page.contains("td.textContent"));
}
