mod client;
mod sse;
mod types;

pub use client::*;
pub use sse::{SseEvent, SseParser};
pub use types::*;
