//! Data models for the streaming proxy
//!
//! Each sub-module represents one concept of a stream request: the asset being
//! played, who is asking, what they may do, and which bytes they want.

mod access;
mod identity;
mod range;
mod stream;
mod video;

pub use access::*;
pub use identity::*;
pub use range::*;
pub use stream::*;
pub use video::*;
