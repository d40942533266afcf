//! Database repositories for data access layer
//!
//! Each repository is responsible for one table. The traits in front of them
//! are what the API layer depends on, so tests can substitute in-memory stores.

mod settings;
mod user;
mod video;
mod view_counter;

pub use settings::{SettingsRepository, SettingsStore};
pub use user::{UserRepository, UserStore};
pub use video::{PgVideoAssetRepository, VideoAssetStore};
pub use view_counter::ViewCountSubscriber;
