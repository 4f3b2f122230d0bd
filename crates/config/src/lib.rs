// Configuration loading and local persistence

pub mod settings;
pub mod store;

pub use settings::{CategorySort, Settings};
pub use store::FileStore;
