use serde::{Deserialize, Serialize};

/// Background used when the caller supplies none
pub const DEFAULT_BACKGROUND_VIDEO: &str = "https://database.blotato.io/storage/v1/object/public/public_media/4ddd33eb-e811-4ab5-93e1-2cd0b7e8fb3f/videogen2-render-e6b398a2-5859-4a77-88ef-2345bcefdc98.mp4";

const VIDEO_EXTENSIONS: [&str; 5] = [".mp4", ".webm", ".mov", ".avi", ".mkv"];
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".webp", ".gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Video,
    Image,
}

/// Resolved background of a rendered video. Never a solid colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub url: String,
}

impl Background {
    /// Explicit kind wins, then the URL extension, then video
    pub fn resolve(url: Option<&str>, kind: Option<BackgroundKind>) -> Self {
        let url = url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BACKGROUND_VIDEO);
        let kind = kind.unwrap_or_else(|| infer_kind(url));
        Self {
            kind,
            url: url.to_string(),
        }
    }
}

/// Guess the background kind from the file extension of `url`
pub fn infer_kind(url: &str) -> BackgroundKind {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_lowercase();
    if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        BackgroundKind::Video
    } else if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        BackgroundKind::Image
    } else {
        BackgroundKind::Video
    }
}
