//! all inter-vault payloads are serialized by protocol-buffer
//! so define them in rust first.

mod wire;
pub use wire::*;
