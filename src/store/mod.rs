pub mod accounts;
pub mod ids;
pub mod job_registry;
pub mod models;

pub use accounts::{AccountStore, ConnectedAccount};
pub use ids::generate_id;
pub use job_registry::{JobRegistry, RegistryEntry};
pub use models::{
    PostContent, PublicationJob, PublicationState, PublicationStatus, TransitionError, VideoJob,
    VideoState, VideoStatus,
};
