use actix_web::{
    get, post,
    web::{scope, Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use super::auth::ApiKey;
use super::error::{required, ServiceError};
use crate::upstream::{Audience, ContentBrief, ContentGenerator, GeneratedContent};

const DEFAULT_REGION: &str = "MIXTO";

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(max = 500, message = "topic must be at most 500 characters"))]
    pub topic: Option<String>,
    #[serde(default)]
    pub audience_type: Audience,
    #[validate(length(max = 50, message = "region must be at most 50 characters"))]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedData {
    pub topic: String,
    pub audience_type: Audience,
    pub region: String,
    #[serde(flatten)]
    pub content: GeneratedContent,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: GeneratedData,
}

/// Generate social content for a topic; fails outright when the generator is not configured
#[post("")]
async fn generate(
    _key: ApiKey,
    generator: Data<dyn ContentGenerator>,
    request: Json<GenerateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let topic = required(request.topic.as_deref(), "Topic is required")?;
    let brief = ContentBrief {
        topic: topic.to_string(),
        audience: request.audience_type,
        region: request
            .region
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
    };

    let content = generator.generate_content(&brief).await?;
    info!("Generated content for topic {:?}", brief.topic);

    Ok(HttpResponse::Ok().json(GenerateResponse {
        success: true,
        data: GeneratedData {
            topic: brief.topic,
            audience_type: brief.audience,
            region: brief.region,
            content,
            generated_at: Utc::now(),
        },
    }))
}

#[get("")]
async fn describe(_key: ApiKey) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "endpoint": "/api/v1/generate",
        "method": "POST",
        "params": {
            "topic": "string (required)",
            "audience_type": "creador | empresa (optional)",
            "region": "LATAM | España | MIXTO (optional)",
        },
    }))
}

pub fn generate_config(config: &mut ServiceConfig) {
    config.service(scope("/api/v1/generate").service(generate).service(describe));
}
