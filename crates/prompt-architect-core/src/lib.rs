pub mod ai;
pub mod category;
pub mod config;
pub mod enhance;
pub mod logging;
pub mod markdown;
pub mod state;

// Re-export main types for convenience
pub use ai::{GeminiClient, KeySource};
pub use category::{Category, CategoryId, CATEGORIES};
pub use config::Config;
pub use enhance::{EnhanceError, Enhancer};
pub use logging::LoggingConfig;
pub use state::{CopyNotice, GenerationRequest, Session, Theme, ThemeStore};
