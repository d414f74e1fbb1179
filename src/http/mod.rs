//! reqwest-backed Transport implementation

pub use client::{AGENT_TAG_HEADER, ReqwestTransport};

mod client;
