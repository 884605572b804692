pub mod capability;
pub mod dispatcher;
pub mod platform;

pub use capability::{Capability, Credential, PublishMode};
pub use dispatcher::{
    AcknowledgingPublisher, DispatchOptions, Dispatcher, LivePublishError, LivePublisher,
    LiveRequest, PublishResult,
};
pub use platform::{Platform, UnsupportedPlatform};
