pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use services::LeaderboardService;
