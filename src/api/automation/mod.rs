pub mod dto;
pub mod handlers;
pub mod service;

pub use handlers::automation_config;
pub use service::AutomationService;
