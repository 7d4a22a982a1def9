pub mod defaults;
pub mod engine;
pub mod parser;
pub mod rate;
pub mod types;

pub use engine::UrlValidator;
pub use parser::{ConfigLoadError, ConfigStore};
pub use rate::RateState;
pub use types::*;
