use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::{PublicationJob, VideoJob};

/// A record that can be kept in a [`JobRegistry`]
pub trait RegistryEntry: Clone + Send + Sync {
    fn id(&self) -> &str;
}

impl RegistryEntry for PublicationJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RegistryEntry for VideoJob {
    fn id(&self) -> &str {
        &self.id
    }
}

struct Inner<J> {
    jobs: Vec<J>,
    index: HashMap<String, usize>,
}

/// Process-lifetime, append-only log of job records
///
/// Insertion order defines iteration order. Nothing is ever evicted or
/// removed; the lock only makes appends and transitions atomic.
pub struct JobRegistry<J> {
    name: &'static str,
    inner: RwLock<Inner<J>>,
}

impl<J: RegistryEntry> JobRegistry<J> {
    /// Create an empty registry; `name` only labels log lines
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Inner {
                jobs: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Append a job whose identity was assigned by the caller
    pub async fn append(&self, job: J) {
        let mut inner = self.inner.write().await;
        let position = inner.jobs.len();
        if inner.index.insert(job.id().to_string(), position).is_some() {
            warn!("{} registry: duplicate id {}, lookups now return the newest", self.name, job.id());
        }
        debug!("{} registry: appended {} at position {}", self.name, job.id(), position);
        inner.jobs.push(job);
    }

    /// The most recently appended `limit` jobs, oldest of the window first
    pub async fn list(&self, limit: usize) -> Vec<J> {
        let inner = self.inner.read().await;
        let start = inner.jobs.len().saturating_sub(limit);
        inner.jobs[start..].to_vec()
    }

    pub async fn get(&self, id: &str) -> Option<J> {
        let inner = self.inner.read().await;
        inner.index.get(id).map(|&i| inner.jobs[i].clone())
    }

    /// Count of every job ever appended
    pub async fn total(&self) -> usize {
        self.inner.read().await.jobs.len()
    }

    /// Mutate one job in place under the write lock
    ///
    /// Returns `None` when the id is unknown, otherwise whatever `apply`
    /// returns. Used for the single terminal transition of a job.
    pub async fn transition<R>(&self, id: &str, apply: impl FnOnce(&mut J) -> R) -> Option<R> {
        let mut inner = self.inner.write().await;
        let position = *inner.index.get(id)?;
        let result = apply(&mut inner.jobs[position]);
        debug!("{} registry: transitioned {}", self.name, id);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::Platform;
    use crate::store::models::{PostContent, PublicationStatus, VideoStatus};
    use chrono::{TimeZone, Utc};

    fn scheduled(id: &str) -> PublicationJob {
        PublicationJob::scheduled(
            id.to_string(),
            Platform::Instagram,
            PostContent::new("launch day"),
            Some("https://cdn.example.com/reel.mp4".into()),
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 30, 12, 0, 0).unwrap(),
        )
    }

    #[actix_web::test]
    async fn test_list_returns_most_recent_window_in_order() {
        let registry = JobRegistry::new("publications");
        for i in 0..8 {
            registry.append(scheduled(&format!("pub_{}", i))).await;
        }

        let ids: Vec<String> = registry.list(3).await.into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["pub_5", "pub_6", "pub_7"]);
        assert_eq!(registry.total().await, 8);
    }

    #[actix_web::test]
    async fn test_list_larger_than_registry_returns_everything() {
        let registry = JobRegistry::new("publications");
        registry.append(scheduled("pub_a")).await;
        registry.append(scheduled("pub_b")).await;

        assert_eq!(registry.list(50).await.len(), 2);
        assert!(registry.list(0).await.is_empty());
    }

    #[actix_web::test]
    async fn test_get_returns_job_unchanged() {
        let registry = JobRegistry::new("publications");
        let job = scheduled("pub_x");
        registry.append(job.clone()).await;

        let found = registry.get("pub_x").await.unwrap();
        assert_eq!(found, job);
        assert_eq!(found.status(), PublicationStatus::Scheduled);
        assert!(registry.get("pub_missing").await.is_none());
    }

    #[actix_web::test]
    async fn test_transition_applies_once() {
        let registry = JobRegistry::new("videos");
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        registry
            .append(VideoJob::processing(
                "vid_1".into(),
                "hola".into(),
                "voice".into(),
                "cinematic".into(),
                "https://cdn.example.com/bg.mp4".into(),
                None,
                created,
            ))
            .await;

        let first = registry
            .transition("vid_1", |job| job.complete(None, created))
            .await;
        assert_eq!(first, Some(Ok(())));

        let second = registry
            .transition("vid_1", |job| job.fail("again", created))
            .await
            .unwrap();
        assert!(second.is_err());
        assert_eq!(registry.get("vid_1").await.unwrap().status(), VideoStatus::Completed);

        assert!(registry.transition("vid_404", |_| ()).await.is_none());
    }
}
