// crates/reelcut-core/src/lib.rs

pub mod caption;
pub mod crop;
pub mod duration;
pub mod error;
pub mod format;
pub mod model;
pub mod planner;
pub mod preset;
pub mod transcript;
pub mod video_sync;
mod helpers;   // internal — not pub, not re-exported

pub use error::{ReelcutError, Result};
pub use helpers::time::{format_ass_timestamp, format_duration};
