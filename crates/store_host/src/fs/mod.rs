//! Content-store path model, codec, wire types, and transport contracts.

pub mod codec;
pub mod memory;
pub mod path;
pub mod service;
pub mod types;
