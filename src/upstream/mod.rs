pub mod background;
pub mod error;
pub mod heygen;
pub mod openai;

use reqwest::Client;
use std::time::Duration;

pub use background::{Background, BackgroundKind, DEFAULT_BACKGROUND_VIDEO};
pub use error::UpstreamError;
pub use heygen::{HeyGenClient, ProviderVideo, VideoGenerator, VideoRequest};
pub use openai::{Audience, ContentBrief, ContentGenerator, GeneratedContent, OpenAiClient};

/// Shared HTTP client for every provider, with a bounded per-request timeout
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}
