//! Book service application library
//!
//! Hosts the application modules; the books module owns the `UpdateBookDto`
//! wire contract and its precision-preserving JSON codec.

pub mod modules;

pub use modules::books::{BookCodec, CodecError, CodecOptions, UpdateBookDto};
