use actix_web::{http::StatusCode, test, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use content_publisher::app::AppContext;
use content_publisher::config::Config;
use content_publisher::publish::{
    AcknowledgingPublisher, LivePublishError, LivePublisher, LiveRequest,
};
use content_publisher::store::VideoStatus;
use content_publisher::upstream::{
    Audience, ContentBrief, ContentGenerator, GeneratedContent, ProviderVideo, UpstreamError,
    VideoGenerator, VideoRequest,
};

const KEY: &str = "test-key";

struct Writer {
    configured: bool,
}

#[async_trait]
impl ContentGenerator for Writer {
    async fn generate_content(&self, brief: &ContentBrief) -> Result<GeneratedContent, UpstreamError> {
        if !self.configured {
            return Err(UpstreamError::MissingCredential("OpenAI"));
        }
        Ok(GeneratedContent {
            title: format!("About {}", brief.topic),
            ..GeneratedContent::default()
        })
    }

    async fn generate_script(&self, topic: &str, _audience: Audience) -> Result<String, UpstreamError> {
        if !self.configured {
            return Err(UpstreamError::MissingCredential("OpenAI"));
        }
        Ok(format!("A short script about {}", topic))
    }
}

/// Renderer whose reported status the test controls
struct Renderer {
    status: Mutex<VideoStatus>,
}

impl Renderer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(VideoStatus::Processing),
        })
    }

    fn finish(&self) {
        *self.status.lock().unwrap() = VideoStatus::Completed;
    }
}

#[async_trait]
impl VideoGenerator for Renderer {
    async fn create_video(&self, _request: &VideoRequest) -> Result<String, UpstreamError> {
        Ok("hg_abc".to_string())
    }

    async fn video_status(&self, video_id: &str) -> Result<ProviderVideo, UpstreamError> {
        let status = *self.status.lock().unwrap();
        Ok(ProviderVideo {
            video_id: video_id.to_string(),
            status,
            video_url: (status == VideoStatus::Completed)
                .then(|| "https://cdn.example.com/final.mp4".to_string()),
            thumbnail_url: None,
            duration: Some(30.0),
            created_at: None,
        })
    }
}

struct RevokedToken;

#[async_trait]
impl LivePublisher for RevokedToken {
    async fn publish(&self, _request: LiveRequest<'_>) -> Result<String, LivePublishError> {
        Err(LivePublishError("token revoked".to_string()))
    }
}

fn context_with(api_key: Option<&str>, writer_configured: bool, renderer: Arc<Renderer>) -> AppContext {
    let config = Config {
        api_key: api_key.map(str::to_string),
        ..Config::default()
    };
    AppContext::new(
        config,
        Arc::new(Writer {
            configured: writer_configured,
        }),
        renderer,
        Arc::new(AcknowledgingPublisher),
    )
}

fn context() -> AppContext {
    context_with(Some(KEY), true, Renderer::new())
}

macro_rules! app {
    ($ctx:expr) => {{
        let ctx = $ctx.clone();
        test::init_service(App::new().configure(move |cfg| ctx.configure(cfg))).await
    }};
}

fn automation(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/automation")
        .insert_header(("x-api-key", KEY))
        .set_json(body)
}

#[actix_web::test]
async fn test_missing_or_wrong_key_is_unauthorized() {
    let app = app!(context());

    let req = test::TestRequest::post()
        .uri("/api/v1/automation")
        .set_json(json!({ "action": "status" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/automation")
        .insert_header(("x-api-key", "wrong"))
        .set_json(json!({ "action": "status" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unconfigured_key_rejects_everything() {
    let app = app!(context_with(None, true, Renderer::new()));
    let req = automation(json!({ "action": "status" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_publish_now_is_simulated_and_recorded() {
    let ctx = context();
    let app = app!(ctx);

    let req = automation(json!({
        "action": "publish_now",
        "platform": "youtube",
        "content": { "text": "New video is live", "title": "Launch" },
        "options": { "mediaUrl": "https://cdn.example.com/v.mp4" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["mode"], json!("simulation"));
    assert_eq!(body["publication"]["platform"], json!("youtube"));
    assert_eq!(body["publication"]["status"], json!("published"));
    assert_eq!(body["publication"]["mediaUrl"], json!("https://cdn.example.com/v.mp4"));
    assert_eq!(ctx.publications().total().await, 1);

    let id = body["publication"]["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/automation/publications/{}", id))
        .insert_header(("x-api-key", KEY))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["publication"]["id"], json!(id));
}

#[actix_web::test]
async fn test_publish_now_with_token_goes_live() {
    let app = app!(context());
    let req = automation(json!({
        "action": "publish_now",
        "platform": "facebook",
        "content": { "text": "hello" },
        "options": { "accessToken": "tok", "pageId": "123" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["mode"], json!("live"));
    assert_eq!(body["message"], json!("Published to Facebook page 123"));
}

#[actix_web::test]
async fn test_unsupported_platform_is_not_recorded() {
    let ctx = context();
    let app = app!(ctx);
    let req = automation(json!({
        "action": "publish_now",
        "platform": "myspace",
        "content": { "text": "hello" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["mode"], json!("error"));
    assert!(body.get("publication").is_none());
    assert_eq!(ctx.publications().total().await, 0);
}

#[actix_web::test]
async fn test_publish_multi_reports_each_platform() {
    let ctx = context();
    let app = app!(ctx);
    let req = automation(json!({
        "action": "publish_multi",
        "platforms": ["youtube", "myspace", "linkedin"],
        "content": { "text": "everywhere" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalPlatforms"], json!(3));
    assert_eq!(body["results"]["youtube"]["success"], json!(true));
    assert_eq!(body["results"]["linkedin"]["success"], json!(true));
    assert_eq!(body["results"]["myspace"]["success"], json!(false));
    assert!(body["results"]["myspace"].get("publicationId").is_none());
    assert_eq!(body["publications"].as_array().unwrap().len(), 2);
    assert_eq!(ctx.publications().total().await, 2);
}

#[actix_web::test]
async fn test_publish_multi_defaults_to_every_platform() {
    let app = app!(context());
    let req = automation(json!({
        "action": "publish_multi",
        "content": { "text": "everywhere" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalPlatforms"], json!(6));
}

#[actix_web::test]
async fn test_empty_platform_list_is_rejected() {
    let app = app!(context());
    let req = automation(json!({
        "action": "publish_multi",
        "platforms": [],
        "content": { "text": "nowhere" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_missing_text_is_rejected_before_dispatch() {
    let ctx = context();
    let app = app!(ctx);
    let req = automation(json!({
        "action": "publish_now",
        "platform": "youtube",
        "content": { "text": "" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ctx.publications().total().await, 0);
}

#[actix_web::test]
async fn test_schedule_then_list_and_status() {
    let app = app!(context());

    let req = automation(json!({
        "action": "schedule",
        "platforms": ["tiktok", "instagram"],
        "content": { "text": "later" },
        "options": { "schedule_time": "2030-01-01T10:00:00Z" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    let scheduled = body["publications"].as_array().unwrap();
    assert_eq!(scheduled.len(), 2);
    assert!(scheduled.iter().all(|p| p["status"] == json!("scheduled")));
    assert_eq!(scheduled[0]["scheduledFor"], json!("2030-01-01T10:00:00Z"));

    let req = automation(json!({ "action": "list" })).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(2));

    let req = automation(json!({ "action": "status" })).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["platforms"]["youtube"]["status"], json!("simulation"));
    assert_eq!(body["platforms"]["youtube"]["needsOAuth"], json!(true));
    assert_eq!(body["recentPublications"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_schedule_with_bad_time_is_rejected() {
    let app = app!(context());
    let req = automation(json!({
        "action": "schedule",
        "platform": "tiktok",
        "content": { "text": "later" },
        "options": { "schedule_time": "tomorrow" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_connect_with_token_switches_status_to_live() {
    let app = app!(context());
    let req = automation(json!({
        "action": "connect",
        "platform": "linkedin",
        "options": { "accessToken": "tok" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["account"]["platform"], json!("linkedin"));
    assert!(body["account"].get("credential").is_none());

    let req = automation(json!({ "action": "status" })).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["platforms"]["linkedin"]["status"], json!("live"));
    assert_eq!(body["platforms"]["linkedin"]["needsOAuth"], json!(false));
}

#[actix_web::test]
async fn test_invalid_action_is_rejected() {
    let app = app!(context());
    let req = automation(json!({ "action": "explode" })).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid action"));
}

#[actix_web::test]
async fn test_faceless_video_lifecycle() {
    let renderer = Renderer::new();
    let ctx = context_with(Some(KEY), true, renderer.clone());
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/video-faceless")
        .insert_header(("x-api-key", KEY))
        .set_json(json!({
            "script": "Three tips for better sleep",
            "background_url": "https://cdn.example.com/bg.jpg"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["heygen_video_id"], json!("hg_abc"));
    assert_eq!(body["background"]["type"], json!("image"));
    let video_id = body["video_id"].as_str().unwrap().to_string();
    assert!(video_id.starts_with("vid_"));

    let status = |video_id: String| {
        test::TestRequest::post()
            .uri("/api/v1/video-faceless")
            .insert_header(("x-api-key", KEY))
            .set_json(json!({ "action": "status", "video_id": video_id }))
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, status(video_id.clone())).await;
    assert_eq!(body["video"]["status"], json!("processing"));

    renderer.finish();
    let body: Value = test::call_and_read_body_json(&app, status(video_id.clone())).await;
    assert_eq!(body["video"]["status"], json!("completed"));
    assert_eq!(body["video"]["mediaUrl"], json!("https://cdn.example.com/final.mp4"));

    let req = test::TestRequest::post()
        .uri("/api/v1/video-faceless")
        .insert_header(("x-api-key", KEY))
        .set_json(json!({ "action": "list" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], json!(1));
    assert_eq!(ctx.videos().total().await, 1);
}

#[actix_web::test]
async fn test_faceless_without_script_is_rejected() {
    let app = app!(context());
    let req = test::TestRequest::post()
        .uri("/api/v1/video-faceless")
        .insert_header(("x-api-key", KEY))
        .set_json(json!({ "action": "create" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_video_reports_readiness() {
    let renderer = Renderer::new();
    renderer.finish();
    let app = app!(context_with(Some(KEY), true, renderer));

    let req = test::TestRequest::get()
        .uri("/api/v1/get-video?video_id=hg_abc")
        .insert_header(("x-api-key", KEY))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ready_to_publish"], json!(true));
    assert_eq!(body["video"]["video_url"], json!("https://cdn.example.com/final.mp4"));

    let req = test::TestRequest::get()
        .uri("/api/v1/get-video")
        .insert_header(("x-api-key", KEY))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["endpoint"], json!("/api/v1/get-video"));
}

#[actix_web::test]
async fn test_generate_uses_writer() {
    let app = app!(context());
    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .insert_header(("x-api-key", KEY))
        .set_json(json!({ "topic": "remote work" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["title"], json!("About remote work"));
    assert_eq!(body["data"]["region"], json!("MIXTO"));
}

#[actix_web::test]
async fn test_generate_without_credential_fails() {
    let app = app!(context_with(Some(KEY), false, Renderer::new()));
    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .insert_header(("x-api-key", KEY))
        .set_json(json!({ "topic": "remote work" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("OpenAI API key not configured"));
}

#[actix_web::test]
async fn test_health_reports_registry_totals() {
    let app = app!(context());
    let req = automation(json!({
        "action": "publish_now",
        "platform": "twitter",
        "content": { "text": "hi" }
    }))
    .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["publications"], json!(1));
    assert_eq!(body["videos"], json!(0));

    let req = test::TestRequest::get().uri("/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_rejected_token_records_failed_publication() {
    let ctx = AppContext::new(
        Config {
            api_key: Some(KEY.to_string()),
            ..Config::default()
        },
        Arc::new(Writer { configured: true }),
        Renderer::new(),
        Arc::new(RevokedToken),
    );
    let app = app!(ctx);

    let req = automation(json!({
        "action": "publish_multi",
        "platforms": ["linkedin", "tiktok"],
        "content": { "text": "hello" },
        "options": { "accessToken": "tok" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["results"]["linkedin"]["success"], json!(false));
    assert_eq!(body["results"]["linkedin"]["message"], json!("LinkedIn: token revoked"));
    let publications = body["publications"].as_array().unwrap();
    assert_eq!(publications.len(), 2);
    for publication in publications {
        assert_eq!(publication["status"], json!("failed"));
        assert!(publication.get("publishedAt").is_none());
        assert!(publication["error"].as_str().unwrap().ends_with("token revoked"));
    }
    assert_eq!(ctx.publications().total().await, 2);
}

#[actix_web::test]
async fn test_publish_multi_collapses_repeated_platforms() {
    let ctx = context();
    let app = app!(ctx);
    let req = automation(json!({
        "action": "publish_multi",
        "platforms": ["youtube", "youtube", "YouTube"],
        "content": { "text": "once" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalPlatforms"], json!(1));
    assert_eq!(body["results"].as_object().unwrap().len(), 1);
    assert_eq!(body["publications"].as_array().unwrap().len(), 1);
    assert_eq!(ctx.publications().total().await, 1);
}

#[actix_web::test]
async fn test_schedule_time_is_returned_in_utc() {
    let app = app!(context());
    let req = automation(json!({
        "action": "schedule",
        "platform": "youtube",
        "content": { "text": "later" },
        "options": { "schedule_time": "2030-01-01T10:00:00.000+02:00" }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["scheduledFor"], json!("2030-01-01T08:00:00Z"));
    assert_eq!(body["publications"][0]["scheduledFor"], json!("2030-01-01T08:00:00Z"));
}

#[actix_web::test]
async fn test_generate_accepts_any_audience_label() {
    let app = app!(context());
    for (label, expected) in [
        (json!("Creador"), "creador"),
        (json!("EMPRESA"), "empresa"),
        (json!("agencia"), "empresa"),
        (Value::Null, "empresa"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/generate")
            .insert_header(("x-api-key", KEY))
            .set_json(json!({ "topic": "remote work", "audience_type": label }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["audience_type"], json!(expected));
    }
}
