use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::capability::{Capability, Credential, PublishMode};
use super::platform::Platform;
use crate::store::{AccountStore, PostContent};

/// Call-level options for a dispatch
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Facebook page to post to
    pub page_id: Option<String>,
    /// Takes precedence over any credential of a connected account
    pub credential: Option<Credential>,
}

/// Everything a live publisher needs for one platform
#[derive(Debug)]
pub struct LiveRequest<'a> {
    pub platform: Platform,
    pub content: &'a PostContent,
    pub media_url: &'a str,
    pub page_id: Option<&'a str>,
    pub credential: &'a Credential,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct LivePublishError(pub String);

/// Performs the real publish call once a credential is available
#[async_trait]
pub trait LivePublisher: Send + Sync {
    /// Returns the confirmation message on success
    async fn publish(&self, request: LiveRequest<'_>) -> Result<String, LivePublishError>;
}

/// Live publisher that acknowledges without calling any platform API
pub struct AcknowledgingPublisher;

#[async_trait]
impl LivePublisher for AcknowledgingPublisher {
    async fn publish(&self, request: LiveRequest<'_>) -> Result<String, LivePublishError> {
        let name = request.platform.display_name();
        Ok(match (request.platform, request.page_id) {
            (Platform::Facebook, Some(page_id)) => format!("Published to {} page {}", name, page_id),
            _ => format!("Published to {}", name),
        })
    }
}

/// Uniform envelope for the outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub success: bool,
    pub mode: PublishMode,
    pub message: String,
    pub platform: String,
    #[serde(skip)]
    target: Option<Platform>,
}

impl PublishResult {
    fn delivered(platform: Platform, mode: PublishMode, message: String) -> Self {
        Self {
            success: true,
            mode,
            message,
            platform: platform.to_string(),
            target: Some(platform),
        }
    }

    fn failed(platform: Platform, message: String) -> Self {
        Self {
            success: false,
            mode: PublishMode::Error,
            message,
            platform: platform.to_string(),
            target: Some(platform),
        }
    }

    fn unsupported(requested: &str) -> Self {
        Self {
            success: false,
            mode: PublishMode::Error,
            message: format!("Unsupported platform: {}", requested),
            platform: requested.to_string(),
            target: None,
        }
    }

    /// The recognised platform, `None` when the identifier was unsupported
    pub fn target(&self) -> Option<Platform> {
        self.target
    }
}

/// Routes publish requests to the per-platform handling
///
/// Holds no job state; recording outcomes is up to the caller.
#[derive(Clone)]
pub struct Dispatcher {
    accounts: Arc<AccountStore>,
    live: Arc<dyn LivePublisher>,
}

impl Dispatcher {
    pub fn new(accounts: Arc<AccountStore>, live: Arc<dyn LivePublisher>) -> Self {
        Self { accounts, live }
    }

    /// Credential lookup order: call option, then connected account, then none
    pub async fn resolve(&self, platform: Platform, options: &DispatchOptions) -> Capability {
        let credential = match &options.credential {
            Some(credential) => Some(credential.clone()),
            None => self.accounts.credential(platform).await,
        };
        Capability::from_credential(credential)
    }

    /// Dispatch to one platform identified by a case-insensitive name
    pub async fn dispatch(
        &self,
        platform: &str,
        content: &PostContent,
        media_url: &str,
        options: &DispatchOptions,
    ) -> PublishResult {
        match platform.parse::<Platform>() {
            Ok(platform) => self.publish_to(platform, content, media_url, options).await,
            Err(err) => {
                warn!("Dispatch rejected: {}", err);
                PublishResult::unsupported(platform)
            }
        }
    }

    pub async fn publish_to(
        &self,
        platform: Platform,
        content: &PostContent,
        media_url: &str,
        options: &DispatchOptions,
    ) -> PublishResult {
        match self.resolve(platform, options).await {
            Capability::Simulated => {
                debug!("No credential for {}, simulating", platform);
                PublishResult::delivered(
                    platform,
                    PublishMode::Simulation,
                    format!(
                        "{}: simulated publication (configure {} to publish for real)",
                        platform.display_name(),
                        platform.required_api()
                    ),
                )
            }
            Capability::Live(credential) => {
                let request = LiveRequest {
                    platform,
                    content,
                    media_url,
                    page_id: options.page_id.as_deref(),
                    credential: &credential,
                };
                match self.live.publish(request).await {
                    Ok(message) => {
                        info!("Published live to {}", platform);
                        PublishResult::delivered(platform, PublishMode::Live, message)
                    }
                    Err(err) => {
                        warn!("Live publish to {} failed: {}", platform, err);
                        PublishResult::failed(platform, format!("{}: {}", platform.display_name(), err))
                    }
                }
            }
        }
    }

    /// Fan out one dispatch per platform identifier
    ///
    /// Dispatches run concurrently and independently. Results come back
    /// paired with the identifier exactly as the caller gave it.
    pub async fn publish_multi(
        &self,
        platforms: &[String],
        content: &PostContent,
        media_url: &str,
        options: &DispatchOptions,
    ) -> Vec<(String, PublishResult)> {
        info!("Fanning out publish to {} platforms", platforms.len());
        let dispatches = platforms.iter().map(|platform| async move {
            let result = self.dispatch(platform, content, media_url, options).await;
            (platform.clone(), result)
        });
        join_all(dispatches).await
    }
}
