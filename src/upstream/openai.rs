use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use super::error::UpstreamError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const SERVICE: &str = "OpenAI";

/// Who the generated content is written for
///
/// Anything other than `creador` (any case), including `null`, means `empresa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Content creators: YouTubers, TikTokers
    Creador,
    /// Companies, CEOs, agency founders
    #[default]
    Empresa,
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Audience::from_label).unwrap_or_default())
    }
}

impl Audience {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("creador") {
            Audience::Creador
        } else {
            Audience::Empresa
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Audience::Creador => "content creators, YouTubers and TikTokers",
            Audience::Empresa => "companies, CEOs and agency founders",
        }
    }
}

/// Input for social content generation
#[derive(Debug, Clone)]
pub struct ContentBrief {
    pub topic: String,
    pub audience: Audience,
    pub region: String,
}

/// Structured social content returned by the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratedContent {
    pub title: String,
    pub script: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub cta: String,
    pub hook: String,
}

/// Text generation collaborator
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(&self, brief: &ContentBrief) -> Result<GeneratedContent, UpstreamError>;

    /// A spoken script for an avatar, without stage directions
    async fn generate_script(&self, topic: &str, audience: Audience) -> Result<String, UpstreamError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI chat-completions client
///
/// Constructed even without an API key; every call then fails with
/// [`UpstreamError::MissingCredential`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        json_output: bool,
    ) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential(SERVICE))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            response_format: json_output.then(|| json!({ "type": "json_object" })),
        };

        debug!("Sending chat completion request");
        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::http(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenAI returned error");
            return Err(UpstreamError::Api {
                service: SERVICE,
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::parse(SERVICE, e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| UpstreamError::parse(SERVICE, "no completion returned"))
    }
}

#[async_trait]
impl ContentGenerator for OpenAiClient {
    async fn generate_content(&self, brief: &ContentBrief) -> Result<GeneratedContent, UpstreamError> {
        let system = format!(
            "You are an expert in content marketing and social media copywriting. \
             Target audience: {}. Region: {}. \
             Write in Spanish with a professional but approachable tone.",
            brief.audience.describe(),
            brief.region
        );
        let user = format!(
            "Generate content for the topic: \"{}\"\n\n\
             Return a JSON object with exactly these keys:\n\
             - \"title\": catchy title, at most 60 characters\n\
             - \"script\": script for a 30-60 second video with an opening HOOK, body and final CTA\n\
             - \"caption\": social caption, at most 200 characters\n\
             - \"hashtags\": array of 5 hashtags\n\
             - \"cta\": specific call to action\n\
             - \"hook\": punchy opening line",
            brief.topic
        );

        let raw = self.complete(&system, &user, 0.8, true).await?;
        serde_json::from_str(&raw).map_err(|e| UpstreamError::parse(SERVICE, e.to_string()))
    }

    async fn generate_script(&self, topic: &str, audience: Audience) -> Result<String, UpstreamError> {
        let system = format!(
            "You write scripts for short social media videos. \
             Write ONLY the words the presenter says out loud: no scene directions, \
             no visual descriptions, nothing in brackets or parentheses. \
             The text must read naturally for an AI avatar. \
             Audience: {}. Language: neutral Spanish (LATAM/Spain).",
            audience.describe()
        );
        let user = format!(
            "Write a 30-45 second script about: \"{}\"\n\n\
             - Spoken text only\n\
             - Open with an attention-grabbing hook\n\
             - Develop the main idea\n\
             - Close with a clear call to action\n\
             - 150 words maximum",
            topic
        );

        self.complete(&system, &user, 0.7, false).await
    }
}
