use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social platform a publication can be dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Instagram,
    Tiktok,
    Facebook,
    Linkedin,
    Twitter,
}

impl Platform {
    /// Every supported platform, in the order used for default fan-out
    pub const ALL: [Platform; 6] = [
        Platform::Youtube,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Facebook,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
        }
    }

    /// Human-facing name used in result messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Facebook => "Facebook",
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter/X",
        }
    }

    /// The API whose credentials unlock live publishing
    pub fn required_api(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube Data API OAuth",
            Platform::Instagram | Platform::Facebook => "Facebook Graph API",
            Platform::Tiktok => "TikTok API",
            Platform::Linkedin => "LinkedIn API",
            Platform::Twitter => "Twitter API v2",
        }
    }

    /// Developer console where credentials for this platform are created
    pub fn developer_console(&self) -> &'static str {
        match self {
            Platform::Youtube => "https://console.cloud.google.com/apis/credentials",
            Platform::Instagram | Platform::Facebook => "https://developers.facebook.com/apps",
            Platform::Tiktok => "https://developers.tiktok.com/",
            Platform::Linkedin => "https://www.linkedin.com/developers/apps",
            Platform::Twitter => "https://developer.twitter.com/en/portal/dashboard",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a platform identifier is not one of the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported platform: {0}")]
pub struct UnsupportedPlatform(pub String);

impl FromStr for Platform {
    type Err = UnsupportedPlatform;

    /// Case-insensitive; `x` is accepted as an alias for Twitter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "instagram" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::Tiktok),
            "facebook" => Ok(Platform::Facebook),
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            _ => Err(UnsupportedPlatform(s.to_string())),
        }
    }
}
