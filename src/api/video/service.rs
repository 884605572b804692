use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::dto::{
    AvatarVideoResponse, FacelessCreated, ReadyResponse, RenderOptions, SubmittedVideo,
    VideoListResponse, VideoStatusResponse, VideoView,
};
use crate::api::error::ServiceError;
use crate::store::{generate_id, JobRegistry, VideoJob, VideoStatus};
use crate::upstream::{
    Audience, Background, ContentGenerator, ProviderVideo, VideoGenerator, VideoRequest,
};

/// Window of the video listing
pub const VIDEO_LIST_WINDOW: usize = 20;

const INTERNAL_PREFIX: &str = "vid";
const DEFAULT_STYLE: &str = "cinematic";
const MISSING_KEY_NOTE: &str = "Configure HEYGEN_API_KEY to create videos with a background";

/// Avatar and voice used when a request does not name one
#[derive(Debug, Clone)]
pub struct VideoDefaults {
    pub avatar_id: String,
    pub voice_id: String,
}

/// Video generation business logic
pub struct VideoService {
    videos: Arc<JobRegistry<VideoJob>>,
    generator: Arc<dyn VideoGenerator>,
    writer: Arc<dyn ContentGenerator>,
    defaults: VideoDefaults,
}

fn is_internal_id(video_id: &str) -> bool {
    video_id
        .strip_prefix(INTERNAL_PREFIX)
        .is_some_and(|rest| rest.starts_with('_'))
}

impl VideoService {
    pub fn new(
        videos: Arc<JobRegistry<VideoJob>>,
        generator: Arc<dyn VideoGenerator>,
        writer: Arc<dyn ContentGenerator>,
        defaults: VideoDefaults,
    ) -> Self {
        Self {
            videos,
            generator,
            writer,
            defaults,
        }
    }

    fn video_request(&self, script: &str, options: &RenderOptions, faceless: bool) -> VideoRequest {
        VideoRequest {
            script: script.to_string(),
            avatar_id: options
                .avatar_id
                .clone()
                .unwrap_or_else(|| self.defaults.avatar_id.clone()),
            voice_id: options
                .voice_id
                .clone()
                .unwrap_or_else(|| self.defaults.voice_id.clone()),
            background: Background::resolve(options.background_url.as_deref(), options.background_type),
            faceless,
        }
    }

    /// Submit a faceless render and track it as a `processing` job
    ///
    /// Nothing is recorded when the provider rejects the request.
    pub async fn create_faceless(
        &self,
        script: &str,
        options: RenderOptions,
    ) -> Result<FacelessCreated, ServiceError> {
        let request = self.video_request(script, &options, true);
        let provider_id = self
            .generator
            .create_video(&request)
            .await
            .map_err(|source| ServiceError::UpstreamWithNote {
                source,
                note: MISSING_KEY_NOTE,
            })?;

        let job = VideoJob::processing(
            generate_id(INTERNAL_PREFIX),
            script.to_string(),
            request.voice_id.clone(),
            options.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            request.background.url.clone(),
            Some(provider_id.clone()),
            Utc::now(),
        );
        info!("Service: tracking faceless video {} (provider id {})", job.id, provider_id);
        let video_id = job.id.clone();
        self.videos.append(job).await;

        Ok(FacelessCreated {
            success: true,
            video_id,
            heygen_video_id: provider_id,
            provider: "heygen",
            status: "processing",
            background: request.background,
            message: "Faceless video with background is processing. Use action='status' to check it.",
        })
    }

    /// Status of a video by internal (`vid_…`) or provider id
    ///
    /// A tracked job that is still rendering is polled once and, if the
    /// provider reports a final state, transitioned. A failed poll leaves
    /// the job as it was.
    pub async fn faceless_status(&self, video_id: &str) -> Result<VideoStatusResponse, ServiceError> {
        if !is_internal_id(video_id) {
            let video = self.generator.video_status(video_id).await?;
            return Ok(VideoStatusResponse {
                success: true,
                video: VideoView::Provider(video),
            });
        }

        let job = self
            .videos
            .get(video_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("Video not found".to_string()))?;

        let poll_id = match &job.provider_video_id {
            Some(provider_id) if !job.status().is_terminal() => Some(provider_id.clone()),
            _ => None,
        };
        let job = match poll_id {
            Some(provider_id) => match self.refresh(&job.id, &provider_id).await {
                Some(fresh) => fresh,
                None => job,
            },
            None => job,
        };

        Ok(VideoStatusResponse {
            success: true,
            video: VideoView::Tracked(job),
        })
    }

    async fn refresh(&self, id: &str, provider_id: &str) -> Option<VideoJob> {
        let video = match self.generator.video_status(provider_id).await {
            Ok(video) => video,
            Err(e) => {
                warn!("Service: could not poll provider for {}: {}", id, e);
                return None;
            }
        };

        let now = Utc::now();
        let applied = match video.status {
            VideoStatus::Completed => {
                self.videos
                    .transition(id, |job| job.complete(video.video_url.clone(), now))
                    .await
            }
            VideoStatus::Failed => {
                self.videos
                    .transition(id, |job| job.fail("Video rendering failed", now))
                    .await
            }
            VideoStatus::Pending | VideoStatus::Processing => return None,
        };

        match applied {
            Some(Ok(())) => info!("Service: video {} is now {:?}", id, video.status),
            Some(Err(e)) => warn!("Service: {}", e),
            None => warn!("Service: video {} disappeared during refresh", id),
        }
        self.videos.get(id).await
    }

    pub async fn list_faceless(&self) -> VideoListResponse {
        VideoListResponse {
            success: true,
            videos: self.videos.list(VIDEO_LIST_WINDOW).await,
            total: self.videos.total().await,
        }
    }

    /// Write a script for `topic`, then render it with a visible avatar
    pub async fn full_pipeline(
        &self,
        topic: &str,
        audience: Audience,
        options: RenderOptions,
    ) -> Result<AvatarVideoResponse, ServiceError> {
        let script = self.writer.generate_script(topic, audience).await?;
        info!("Service: generated script for topic {:?}", topic);

        let mut response = self.create_avatar_video(&script, options).await?;
        response.topic = Some(topic.to_string());
        response.script = Some(script);
        response.message = Some("Video is processing. Use action='check_status' with the video_id to check it.");
        Ok(response)
    }

    pub async fn create_avatar_video(
        &self,
        script: &str,
        options: RenderOptions,
    ) -> Result<AvatarVideoResponse, ServiceError> {
        let request = self.video_request(script, &options, false);
        let video_id = self.generator.create_video(&request).await?;

        Ok(AvatarVideoResponse {
            success: true,
            topic: None,
            script: None,
            video: SubmittedVideo {
                video_id,
                status: "processing",
            },
            background: request.background,
            message: None,
        })
    }

    pub async fn provider_status(&self, video_id: &str) -> Result<ProviderVideo, ServiceError> {
        Ok(self.generator.video_status(video_id).await?)
    }

    /// Provider status plus whether the video can be published yet
    pub async fn readiness(&self, video_id: &str) -> Result<ReadyResponse, ServiceError> {
        let video = self.provider_status(video_id).await?;
        let ready = video.is_ready();
        let message = if ready {
            "Video ready. Use video_url to publish it.".to_string()
        } else {
            format!("Video status: {}. Wait and check again.", video.status.as_str())
        };

        Ok(ReadyResponse {
            success: true,
            video,
            ready_to_publish: ready,
            message,
        })
    }
}
