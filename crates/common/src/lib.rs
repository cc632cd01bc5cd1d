//! VxSDK Common Library
//!
//! Result codes, bounded strings, enumerations, value objects, field limits
//! and collection types shared by the VxSDK client and tools.

pub mod bounded;
pub mod collection;
pub mod error;
pub mod limits;
pub mod payloads;
pub mod result;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use bounded::{
    BoundedString, Description, Id, LongId, Name, SituationType, Timestamp,
    MAX_SITUATION_TYPE_LENGTH, MAX_UUID_LENGTH,
};
pub use collection::{Collection, CollectionPage, CollectionQuery, Filter, FilterKey};
pub use error::{Error, Result};
pub use limits::{LimitRef, Limits};
pub use payloads::*;
pub use result::{ResultCategory, ResultCode};
pub use types::*;
pub use value::*;

/// VxSDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
