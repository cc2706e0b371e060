pub mod config;
pub mod hashmap;

pub use config::MapConfig;
pub use hashmap::error::MapError;
pub use hashmap::hashmap::HashMap;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
