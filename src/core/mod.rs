pub mod app_state;
pub mod config;
pub mod text;
pub mod types;

pub use app_state::AppState;
