//! Docsonnet Core - typed documentation from annotated configuration trees
//!
//! This library decodes the evaluated output of a docsonnet-annotated
//! library (a nested mapping with `#`-prefixed metadata keys) into a
//! [`Package`] of documented functions, objects and values.

pub mod config;
pub mod decode;
pub mod document;
pub mod error;
pub mod shape;

pub use config::{Config, DecodeConfig};
pub use decode::{decode, decode_str, Decoder, Diagnostic, DiagnosticKind, Report};
pub use document::{Argument, Field, FieldKind, Fields, Function, Object, Package, Type, Value};
pub use error::DocError;
pub use shape::{KeyPath, Shape};

/// Result type alias for docsonnet operations
pub type Result<T> = std::result::Result<T, DocError>;
