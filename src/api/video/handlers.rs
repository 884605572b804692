use actix_web::{
    get, post,
    web::{scope, Data, Query, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use serde_json::json;

use super::dto::{AvatarRequest, FacelessRequest, RenderOptions, VideoLookup, VideoStatusResponse, VideoView};
use super::service::VideoService;
use crate::api::auth::ApiKey;
use crate::api::error::{required, ServiceError};
use crate::upstream::DEFAULT_BACKGROUND_VIDEO;

#[post("")]
async fn faceless(
    _key: ApiKey,
    service: Data<VideoService>,
    request: Json<FacelessRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = request.into_inner();
    match request.action.as_deref().unwrap_or("create") {
        "create" => {
            let script = required(request.script.as_deref(), "script is required")?;
            let options = RenderOptions {
                avatar_id: None,
                voice_id: request.voice_id.clone(),
                style: request.style.clone(),
                background_url: request.background_url.clone(),
                background_type: request.background_type,
            };
            let created = service.create_faceless(script, options).await?;
            Ok(HttpResponse::Ok().json(created))
        }
        "status" => {
            let video_id = required(request.video_id.as_deref(), "video_id is required")?;
            Ok(HttpResponse::Ok().json(service.faceless_status(video_id).await?))
        }
        "list" => Ok(HttpResponse::Ok().json(service.list_faceless().await)),
        _ => Err(ServiceError::validation("Invalid action. Use: create, status, list")),
    }
}

#[get("")]
async fn describe_faceless(_key: ApiKey) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "endpoint": "/api/v1/video-faceless",
        "description": "Faceless AI videos, always rendered over a background",
        "default_background": DEFAULT_BACKGROUND_VIDEO,
        "actions": {
            "create": {
                "description": "Create a faceless video with a background",
                "params": {
                    "script": "string (required)",
                    "voice_id": "string (optional)",
                    "style": "string (optional)",
                    "background_url": "string (optional, has a default)",
                    "background_type": "'video' | 'image' (optional, detected from the URL)",
                }
            },
            "status": { "description": "Check a video", "params": { "video_id": "string (required)" } },
            "list": "List recent videos",
        },
    }))
}

#[post("")]
async fn avatar(
    _key: ApiKey,
    service: Data<VideoService>,
    request: Json<AvatarRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = request.into_inner();
    let options = RenderOptions {
        avatar_id: request.avatar_id.clone(),
        voice_id: request.voice_id.clone(),
        style: None,
        background_url: request.background_url.clone(),
        background_type: request.background_type,
    };

    match request.action.as_deref().unwrap_or("full_pipeline") {
        "full_pipeline" => {
            let topic = required(request.topic.as_deref(), "topic is required")?;
            let response = service
                .full_pipeline(topic, request.audience_type, options)
                .await?;
            Ok(HttpResponse::Ok().json(response))
        }
        "create_video" => {
            let script = required(request.script.as_deref(), "script is required")?;
            Ok(HttpResponse::Ok().json(service.create_avatar_video(script, options).await?))
        }
        "check_status" => {
            let video_id = required(request.video_id.as_deref(), "video_id is required")?;
            let video = service.provider_status(video_id).await?;
            Ok(HttpResponse::Ok().json(VideoStatusResponse {
                success: true,
                video: VideoView::Provider(video),
            }))
        }
        _ => Err(ServiceError::validation(
            "Invalid action. Use: full_pipeline, create_video, or check_status",
        )),
    }
}

#[get("")]
async fn describe_avatar(_key: ApiKey) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "endpoint": "/api/v1/heygen",
        "actions": ["full_pipeline", "create_video", "check_status"],
        "default_background": "video (mp4)",
    }))
}

#[post("")]
async fn get_video(
    _key: ApiKey,
    service: Data<VideoService>,
    request: Json<VideoLookup>,
) -> Result<HttpResponse, ServiceError> {
    let video_id = required(request.video_id.as_deref(), "video_id is required")?;
    Ok(HttpResponse::Ok().json(service.readiness(video_id).await?))
}

/// Same as the POST form; without `video_id` it documents the endpoint
#[get("")]
async fn get_video_query(
    _key: ApiKey,
    service: Data<VideoService>,
    query: Query<VideoLookup>,
) -> Result<HttpResponse, ServiceError> {
    match query.video_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(video_id) => Ok(HttpResponse::Ok().json(service.readiness(video_id).await?)),
        None => Ok(HttpResponse::Ok().json(json!({
            "status": "ok",
            "endpoint": "/api/v1/get-video",
            "description": "Status and URL of a rendered video",
            "usage": {
                "POST": { "body": { "video_id": "string (required)" } },
                "GET": { "query": "?video_id=YOUR_VIDEO_ID" },
            },
            "response": {
                "video": {
                    "video_id": "string",
                    "status": "pending | processing | completed | failed",
                    "video_url": "string, once completed",
                    "thumbnail_url": "string",
                    "duration": "number (seconds)",
                },
                "ready_to_publish": "boolean",
            },
        }))),
    }
}

pub fn video_config(config: &mut ServiceConfig) {
    config
        .service(
            scope("/api/v1/video-faceless")
                .service(faceless)
                .service(describe_faceless),
        )
        .service(scope("/api/v1/heygen").service(avatar).service(describe_avatar))
        .service(
            scope("/api/v1/get-video")
                .service(get_video)
                .service(get_video_query),
        );
}
