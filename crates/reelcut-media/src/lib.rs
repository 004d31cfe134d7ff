// crates/reelcut-media/src/lib.rs

pub mod assembler;
pub mod cache;
pub mod extract;
pub mod probe;
pub mod render;
pub mod subtitle;
pub mod vad;
pub mod worker;

pub use cache::VadCache;
pub use worker::{JobHandle, JobPool, JobProgress, JobReport, JobSpec};
