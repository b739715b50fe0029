mod cursor;
mod error;
mod requests;
mod types;

pub use cursor::Cursor;
pub use error::{ItemError, Result};
pub use requests::{FilterSpec, KeyMatch, Patch, QuerySpec, ScanSpec};
pub use types::{
    is_reserved_attribute, Item, PageResult, QueryOutput, CREATED_AT_ATTRIBUTE, ID_ATTRIBUTE,
    RESERVED_ATTRIBUTES, UPDATED_AT_ATTRIBUTE,
};
