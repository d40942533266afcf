//! The streaming pipeline
//!
//! locate → authorize → fetch → relay. Each stage is a separate type so the
//! handler stays a thin sequence of `?`s and each stage can be tested alone.

pub mod guard;
pub mod locator;
pub mod origin;
pub mod relay;

pub use guard::{AccessGuard, AUDIT_TARGET};
pub use locator::{parse_video_id, AssetLocator};
pub use origin::{OriginBody, OriginFetcher, OriginOptions, OriginResponse, ResponseKind};
pub use relay::relay;
