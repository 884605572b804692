pub mod auth;
pub mod automation;
pub mod error;
pub mod generate;
pub mod health;
pub mod validation;
pub mod video;

pub use error::ServiceError;
