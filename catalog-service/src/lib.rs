pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::{BackendConfig, Config, QuerySettings};
pub use error::ApiError;
pub use routes::{router, AppState};
