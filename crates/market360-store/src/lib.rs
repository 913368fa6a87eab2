pub mod catalog;
pub mod error;
pub mod settings;

pub use catalog::IndustryCatalog;
pub use error::StoreError;
pub use settings::{OpenRouterSettings, SettingsStore, SqliteSettingsStore};
