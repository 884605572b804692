use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

use super::dto::{
    ConnectResponse, ListResponse, PlatformResult, PlatformStatus, PublishMultiResponse,
    PublishNowResponse, ScheduleResponse, StatusResponse,
};
use crate::api::error::ServiceError;
use crate::publish::{
    Credential, DispatchOptions, Dispatcher, Platform, PublishMode, PublishResult,
};
use crate::store::{generate_id, AccountStore, JobRegistry, PostContent, PublicationJob};

/// Window of the "recent publications" view in `status`
pub const RECENT_WINDOW: usize = 5;
/// Window of the full `list` view
pub const LIST_WINDOW: usize = 50;

/// Publishing business logic: dispatch, record, schedule, connect
pub struct AutomationService {
    publications: Arc<JobRegistry<PublicationJob>>,
    accounts: Arc<AccountStore>,
    dispatcher: Dispatcher,
}

/// Turn a dispatch outcome into a job record
///
/// Unsupported platforms produce no record: the outcome is only reported.
fn record_for(
    result: &PublishResult,
    content: &PostContent,
    media_url: Option<&String>,
) -> Option<PublicationJob> {
    let platform = result.target()?;
    let id = generate_id("pub");
    let now = Utc::now();
    let media_url = media_url.cloned();
    Some(if result.success {
        PublicationJob::published(id, platform, content.clone(), media_url, now)
    } else {
        PublicationJob::failed(id, platform, content.clone(), media_url, result.message.clone(), now)
    })
}

/// Drop repeated targets, keeping the first spelling of each
///
/// Supported platforms compare by parsed value (`X`, `twitter` and `Twitter`
/// are the same target), unsupported ones by their trimmed lowercase name.
fn dedupe_targets(targets: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .into_iter()
        .filter(|target| {
            let key = match target.parse::<Platform>() {
                Ok(platform) => platform.as_str().to_string(),
                Err(_) => target.trim().to_lowercase(),
            };
            seen.insert(key)
        })
        .collect()
}

impl AutomationService {
    pub fn new(
        publications: Arc<JobRegistry<PublicationJob>>,
        accounts: Arc<AccountStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            publications,
            accounts,
            dispatcher,
        }
    }

    /// Publish immediately on one platform and record the outcome
    pub async fn publish_now(
        &self,
        platform: &str,
        content: PostContent,
        media_url: Option<String>,
        options: DispatchOptions,
    ) -> PublishNowResponse {
        info!("Service: publish_now to {}", platform);
        let result = self
            .dispatcher
            .dispatch(platform, &content, media_url.as_deref().unwrap_or(""), &options)
            .await;

        let publication = record_for(&result, &content, media_url.as_ref());
        if let Some(job) = &publication {
            self.publications.append(job.clone()).await;
            info!("Service: recorded publication {} ({:?})", job.id, job.status());
        }

        PublishNowResponse {
            success: result.success,
            mode: result.mode,
            message: result.message,
            publication,
        }
    }

    /// Publish on several platforms (all supported ones when `platforms` is `None`)
    ///
    /// One platform failing never affects another's entry.
    pub async fn publish_multi(
        &self,
        platforms: Option<Vec<String>>,
        content: PostContent,
        media_url: Option<String>,
        options: DispatchOptions,
    ) -> PublishMultiResponse {
        let targets = dedupe_targets(platforms.unwrap_or_else(|| {
            Platform::ALL.iter().map(|p| p.to_string()).collect()
        }));

        let outcomes = self
            .dispatcher
            .publish_multi(&targets, &content, media_url.as_deref().unwrap_or(""), &options)
            .await;

        let mut results = BTreeMap::new();
        let mut publications = Vec::new();
        for (requested, result) in outcomes {
            let publication = record_for(&result, &content, media_url.as_ref());
            let publication_id = publication.as_ref().map(|job| job.id.clone());
            if let Some(job) = publication {
                self.publications.append(job.clone()).await;
                publications.push(job);
            }
            results.insert(
                requested,
                PlatformResult {
                    success: result.success,
                    mode: result.mode,
                    message: result.message,
                    publication_id,
                },
            );
        }

        info!(
            "Service: publish_multi finished, {} platforms, {} publications recorded",
            targets.len(),
            publications.len()
        );

        PublishMultiResponse {
            success: true,
            action: "publish_multi",
            total_platforms: targets.len(),
            results,
            publications,
        }
    }

    /// Record one `scheduled` job per platform without dispatching anything
    ///
    /// Every platform is validated before anything is recorded. Nothing
    /// ever promotes these jobs to `published`.
    pub async fn schedule(
        &self,
        platforms: &[String],
        content: PostContent,
        media_url: Option<String>,
        scheduled_for: DateTime<Utc>,
    ) -> Result<ScheduleResponse, ServiceError> {
        let targets = platforms
            .iter()
            .map(|p| p.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let now = Utc::now();
        let mut publications = Vec::with_capacity(targets.len());
        for platform in targets {
            let job = PublicationJob::scheduled(
                generate_id("pub"),
                platform,
                content.clone(),
                media_url.clone(),
                scheduled_for,
                now,
            );
            self.publications.append(job.clone()).await;
            publications.push(job);
        }

        info!(
            "Service: scheduled {} publications for {}",
            publications.len(),
            scheduled_for
        );

        Ok(ScheduleResponse {
            success: true,
            action: "schedule",
            scheduled_for,
            publications,
            message: format!("Scheduled for {}", scheduled_for.to_rfc3339()),
        })
    }

    /// Simulated account connection; no OAuth handshake takes place
    pub async fn connect(
        &self,
        platform: &str,
        credential: Option<Credential>,
    ) -> Result<ConnectResponse, ServiceError> {
        let platform = platform
            .parse::<Platform>()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let account = self.accounts.connect(platform, credential).await;
        let message = if account.has_credential() {
            format!("{} connected with the supplied access token", platform.display_name())
        } else {
            warn!("Service: {} connected without a credential, publishing stays simulated", platform);
            format!(
                "To connect {} for real you need to configure {}",
                platform.display_name(),
                platform.required_api()
            )
        };

        Ok(ConnectResponse {
            success: true,
            action: "connect",
            platform,
            account,
            message,
            oauth_urls: Platform::ALL
                .iter()
                .map(|p| (*p, p.developer_console()))
                .collect(),
        })
    }

    /// Per-platform capability, connected accounts and the latest publications
    pub async fn status(&self) -> StatusResponse {
        let mut platforms = BTreeMap::new();
        let no_options = DispatchOptions::default();
        for platform in Platform::ALL {
            let mode = self.dispatcher.resolve(platform, &no_options).await.mode();
            platforms.insert(
                platform,
                PlatformStatus {
                    status: mode,
                    needs_oauth: mode == PublishMode::Simulation,
                },
            );
        }

        StatusResponse {
            success: true,
            action: "status",
            platforms,
            connected_accounts: self.accounts.list().await,
            recent_publications: self.publications.list(RECENT_WINDOW).await,
        }
    }

    pub async fn list(&self) -> ListResponse {
        ListResponse {
            success: true,
            publications: self.publications.list(LIST_WINDOW).await,
            total: self.publications.total().await,
        }
    }

    pub async fn publication(&self, id: &str) -> Option<PublicationJob> {
        self.publications.get(id).await
    }
}
