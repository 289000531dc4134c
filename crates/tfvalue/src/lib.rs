//! # tfvalue
//!
//! Schema-typed values for declarative resource providers.
//!
//! This crate provides:
//! - [`Value`]: a recursive value that is `Null`, `Unknown` or known
//! - [`Type`]: the type node a value is interpreted against
//! - [`Schema`]: attribute declarations with required/optional/computed flags
//! - [`codec`]: JSON decode/encode keyed by a type node
//!
//! ## Example
//!
//! ```
//! use tfvalue::{Attribute, AttributeType, ObjectSchema, Schema, Value, codec};
//!
//! let schema = Schema::new(0, ObjectSchema::new(vec![
//!     Attribute::computed("id", AttributeType::String),
//!     Attribute::optional("name", AttributeType::String),
//! ]));
//! let ty = schema.value_type();
//!
//! let value = codec::decode(&serde_json::json!({"id": {"$unknown": true}, "name": "x"}), &ty)?;
//! assert!(value.get("id").is_some_and(Value::is_unknown));
//!
//! let raw = codec::encode(&value, &ty)?;
//! assert_eq!(codec::decode(&raw, &ty)?, value);
//! # Ok::<(), tfvalue::CodecError>(())
//! ```

pub mod codec;
mod error;
mod path;
pub mod schema;
mod value;

pub use error::{CodecError, Result, SchemaError};
pub use path::{AttributePath, PathStep};
pub use schema::{Attribute, AttributeType, NestedObject, NestingMode, ObjectSchema, Schema, Violation};
pub use value::{Type, Value, unknown_if_any};
