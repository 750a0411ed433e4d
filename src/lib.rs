// TodoStore - Todo list state with pluggable key-value persistence

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod provider;
pub mod render;
pub mod stats;
pub mod store;
pub mod todo;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use error::TodoError;
pub use filter::Filter;
pub use provider::{FileProvider, MemoryProvider, Provider, SqliteProvider};
pub use stats::Stats;
pub use store::{Change, DEFAULT_KEY, StoreOptions, SubscriptionId, TodoStore};
pub use todo::{IdStrategy, Todo, TodoId, now_ms};
