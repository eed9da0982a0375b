//! XML codec for the Trading API wire format.
//!
//! # Overview
//!
//! - [`write_document`]: Serializes a request field map into a namespaced envelope
//! - [`parse_document`]: Decodes a response body into a JSON tree
//! - [`XmlError`]: Codec failures
//!
//! The codec knows nothing about verbs, pagination or casting. It only maps
//! between XML elements and JSON values; the request and response layers give
//! those values their meaning.

mod errors;
mod reader;
mod writer;

pub use errors::XmlError;
pub use reader::parse_document;
pub use writer::{write_document, NAMESPACE};
