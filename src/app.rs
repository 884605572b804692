use actix_web::web;
use std::sync::Arc;

use crate::api::{
    automation::{automation_config, AutomationService},
    generate::generate_config,
    health::health_config,
    validation,
    video::{video_config, VideoDefaults, VideoService},
};
use crate::config::Config;
use crate::publish::{AcknowledgingPublisher, Dispatcher, LivePublisher};
use crate::store::{AccountStore, JobRegistry, PublicationJob, VideoJob};
use crate::upstream::{self, ContentGenerator, HeyGenClient, OpenAiClient, VideoGenerator};

/// Process-wide state, constructed once and shared by every HTTP worker
#[derive(Clone)]
pub struct AppContext {
    config: web::Data<Config>,
    publications: web::Data<JobRegistry<PublicationJob>>,
    videos: web::Data<JobRegistry<VideoJob>>,
    automation: web::Data<AutomationService>,
    video: web::Data<VideoService>,
    writer: web::Data<dyn ContentGenerator>,
}

impl AppContext {
    /// Wire the stores and services around the given collaborators
    pub fn new(
        config: Config,
        writer: Arc<dyn ContentGenerator>,
        renderer: Arc<dyn VideoGenerator>,
        live: Arc<dyn LivePublisher>,
    ) -> Self {
        let publications = Arc::new(JobRegistry::new("publications"));
        let videos = Arc::new(JobRegistry::new("videos"));
        let accounts = Arc::new(AccountStore::new());

        let dispatcher = Dispatcher::new(accounts.clone(), live);
        let automation = AutomationService::new(publications.clone(), accounts, dispatcher);
        let video = VideoService::new(
            videos.clone(),
            renderer,
            writer.clone(),
            VideoDefaults {
                avatar_id: config.heygen_avatar_id.clone(),
                voice_id: config.heygen_voice_id.clone(),
            },
        );

        Self {
            config: web::Data::new(config),
            publications: web::Data::from(publications),
            videos: web::Data::from(videos),
            automation: web::Data::new(automation),
            video: web::Data::new(video),
            writer: web::Data::from(writer),
        }
    }

    /// Production wiring: OpenAI and HeyGen over one shared HTTP client,
    /// live publishing acknowledged without a platform call
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let client = upstream::http_client(config.upstream_timeout)?;
        let writer = Arc::new(OpenAiClient::new(
            client.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        ));
        let renderer = Arc::new(HeyGenClient::new(client, config.heygen_api_key.clone()));
        Ok(Self::new(config, writer, renderer, Arc::new(AcknowledgingPublisher)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn publications(&self) -> &JobRegistry<PublicationJob> {
        &self.publications
    }

    pub fn videos(&self) -> &JobRegistry<VideoJob> {
        &self.videos
    }

    /// Register shared data, request limits and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        let max_payload_size = self.config.max_payload_size;
        cfg.app_data(self.config.clone())
            .app_data(self.publications.clone())
            .app_data(self.videos.clone())
            .app_data(self.automation.clone())
            .app_data(self.video.clone())
            .app_data(self.writer.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config().limit(max_payload_size))
            .configure(health_config)
            .configure(automation_config)
            .configure(video_config)
            .configure(generate_config);
    }
}
