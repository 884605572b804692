use actix_web::{
    get, post,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::str::FromStr;

use super::dto::AutomationRequest;
use super::service::AutomationService;
use crate::api::auth::ApiKey;
use crate::api::error::{required, ServiceError};
use crate::publish::{Credential, DispatchOptions, Platform};
use crate::store::PostContent;

const VALID_ACTIONS: &str = "publish_now, publish_multi, schedule, connect, status, list";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    PublishNow,
    PublishMulti,
    Schedule,
    Connect,
    Status,
    List,
}

impl FromStr for Action {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish_now" => Ok(Action::PublishNow),
            "publish_multi" => Ok(Action::PublishMulti),
            "schedule" => Ok(Action::Schedule),
            "connect" => Ok(Action::Connect),
            "status" => Ok(Action::Status),
            "list" => Ok(Action::List),
            _ => Err(ServiceError::validation(format!(
                "Invalid action. Use: {}",
                VALID_ACTIONS
            ))),
        }
    }
}

fn require_content(content: Option<PostContent>) -> Result<PostContent, ServiceError> {
    content
        .filter(|c| !c.text.trim().is_empty())
        .ok_or_else(|| ServiceError::validation("content.text is required"))
}

#[post("")]
async fn automate(
    _key: ApiKey,
    service: Data<AutomationService>,
    request: Json<AutomationRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = request.into_inner();
    let action: Action = request.action.as_deref().unwrap_or_default().parse()?;

    let options = DispatchOptions {
        page_id: request.options.page_id.clone(),
        credential: request.options.access_token.clone().and_then(Credential::new),
    };
    let media_url = request.options.media_url.clone();

    match action {
        Action::PublishNow => {
            let platform = required(request.platform.as_deref(), "platform is required")?;
            let content = require_content(request.content)?;
            let response = service.publish_now(platform, content, media_url, options).await;
            Ok(HttpResponse::Ok().json(response))
        }
        Action::PublishMulti => {
            let content = require_content(request.content)?;
            let response = service
                .publish_multi(request.platforms, content, media_url, options)
                .await;
            Ok(HttpResponse::Ok().json(response))
        }
        Action::Schedule => {
            let raw_time = required(
                request.options.schedule_time.as_deref(),
                "options.schedule_time is required",
            )?;
            let scheduled_for = DateTime::parse_from_rfc3339(raw_time)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| {
                    ServiceError::validation("options.schedule_time must be an RFC 3339 timestamp")
                })?;
            let platforms = match (request.platforms, request.platform) {
                (Some(platforms), _) => platforms,
                (None, Some(platform)) => vec![platform],
                (None, None) => return Err(ServiceError::validation("platform or platforms is required")),
            };
            let content = require_content(request.content)?;
            let response = service
                .schedule(&platforms, content, media_url, scheduled_for)
                .await?;
            Ok(HttpResponse::Ok().json(response))
        }
        Action::Connect => {
            let platform = required(request.platform.as_deref(), "platform is required")?;
            let response = service.connect(platform, options.credential).await?;
            Ok(HttpResponse::Ok().json(response))
        }
        Action::Status => Ok(HttpResponse::Ok().json(service.status().await)),
        Action::List => Ok(HttpResponse::Ok().json(service.list().await)),
    }
}

#[get("/publications/{id}")]
async fn get_publication(
    _key: ApiKey,
    service: Data<AutomationService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    let publication = service
        .publication(&id)
        .await
        .ok_or_else(|| ServiceError::NotFound(format!("Publication {} not found", id)))?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "publication": publication })))
}

#[get("")]
async fn describe(_key: ApiKey) -> HttpResponse {
    let supported: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "endpoint": "/api/v1/automation",
        "description": "Multi-platform publishing; simulated until platform credentials are configured",
        "actions": {
            "publish_now": {
                "description": "Publish immediately on one platform",
                "params": {
                    "platform": supported.join(" | "),
                    "content": "{ text: string, title?: string }",
                    "options": "{ mediaUrl?: string, pageId?: string, accessToken?: string }",
                }
            },
            "publish_multi": {
                "description": "Publish on several platforms",
                "params": {
                    "platforms": "['youtube', 'instagram', ...] (optional, default: all)",
                    "content": "{ text: string, title?: string }",
                    "options": "{ mediaUrl?: string }",
                }
            },
            "schedule": {
                "description": "Schedule a publication",
                "params": {
                    "platform": "string or platforms: ['...']",
                    "content": "{ text: string }",
                    "options": "{ schedule_time: 'RFC 3339 timestamp', mediaUrl?: string }",
                    "note": "scheduledFor is returned normalised to UTC",
                }
            },
            "connect": {
                "description": "Connect a social account",
                "params": { "platform": "string", "options": "{ accessToken?: string }" }
            },
            "status": "Connection status and recent publications",
            "list": "List publications",
        },
        "supportedPlatforms": supported,
    }))
}

pub fn automation_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/v1/automation")
            .service(automate)
            .service(describe)
            .service(get_publication),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!("publish_now".parse::<Action>().unwrap(), Action::PublishNow);
        assert_eq!("list".parse::<Action>().unwrap(), Action::List);
        let err = "delete".parse::<Action>().unwrap_err();
        assert!(err.to_string().starts_with("Invalid action. Use: publish_now"));
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_blank_content_is_rejected() {
        assert!(require_content(None).is_err());
        assert!(require_content(Some(PostContent::new("  "))).is_err());
        assert_eq!(require_content(Some(PostContent::new("hi"))).unwrap().text, "hi");
    }
}
