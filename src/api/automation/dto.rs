use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::publish::{Platform, PublishMode};
use crate::store::{ConnectedAccount, PostContent, PublicationJob};

/// Body of `POST /api/v1/automation`; which fields matter depends on `action`
#[derive(Debug, Deserialize, Validate)]
pub struct AutomationRequest {
    pub action: Option<String>,
    pub platform: Option<String>,
    #[validate(length(min = 1, message = "platforms must not be empty"))]
    pub platforms: Option<Vec<String>>,
    #[validate(nested)]
    pub content: Option<PostContent>,
    #[serde(default)]
    pub options: AutomationOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutomationOptions {
    #[serde(rename = "mediaUrl")]
    pub media_url: Option<String>,
    #[serde(rename = "pageId")]
    pub page_id: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    /// RFC 3339 timestamp, required by `schedule`
    pub schedule_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishNowResponse {
    pub success: bool,
    pub mode: PublishMode,
    pub message: String,
    /// Absent when the platform was not recognised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<PublicationJob>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResult {
    pub success: bool,
    pub mode: PublishMode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMultiResponse {
    pub success: bool,
    pub action: &'static str,
    pub total_platforms: usize,
    pub results: BTreeMap<String, PlatformResult>,
    pub publications: Vec<PublicationJob>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    pub action: &'static str,
    pub scheduled_for: DateTime<Utc>,
    pub publications: Vec<PublicationJob>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    pub action: &'static str,
    pub platform: Platform,
    pub account: ConnectedAccount,
    pub message: String,
    pub oauth_urls: BTreeMap<Platform, &'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatus {
    pub status: PublishMode,
    #[serde(rename = "needsOAuth")]
    pub needs_oauth: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub action: &'static str,
    pub platforms: BTreeMap<Platform, PlatformStatus>,
    pub connected_accounts: Vec<ConnectedAccount>,
    pub recent_publications: Vec<PublicationJob>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub publications: Vec<PublicationJob>,
    pub total: usize,
}
