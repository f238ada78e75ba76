#![deny(missing_docs)]
//! typed-arrow-any: read any Arrow array as a chosen Rust scalar type.
//!
//! [`make_view`] classifies an array's physical encoding once and returns a
//! [`TypedView`] that reads every element as the requested logical type:
//! directly when the encodings match, through a numeric cast or text
//! reinterpretation otherwise, and through one level of dictionary decoding for
//! categorical columns.
//!
//! ```
//! use std::sync::Arc;
//!
//! use typed_arrow_any::{
//!     Strategy, Text, make_view,
//!     arrow_array::{DictionaryArray, Int8Array, StringArray, types::Int8Type},
//! };
//!
//! let keys = Int8Array::from(vec![0, 1, 0, 0, 1]);
//! let values = Arc::new(StringArray::from(vec!["abc", "def"]));
//! let array = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();
//!
//! let view = make_view::<Text>(&array).unwrap();
//! assert_eq!(view.strategy(), Strategy::Dictionary);
//! assert_eq!(
//!     view.iter().collect::<Vec<_>>(),
//!     vec!["abc", "def", "abc", "abc", "def"]
//! );
//! ```

pub mod convert;
pub mod dictionary;
pub mod error;
pub mod logical;
pub mod physical;
pub mod view;

/// Prelude exporting the most common traits and types.
pub mod prelude {
    pub use crate::{
        error::ConversionError,
        logical::{Bytes, LogicalType, Text},
        view::{Strategy, TypedView, make_view},
    };
}

// Re-export Arrow crates so downstream users can build arrays without depending on
// Arrow directly.
pub use arrow_array;
pub use arrow_buffer;
pub use arrow_schema;

// Public re-exports for convenience
pub use crate::{
    convert::{CastFrom, Numeric, ReadAs},
    dictionary::{DictionaryArrayRef, KeyIndex},
    error::ConversionError,
    logical::{Bytes, LogicalType, Text},
    physical::{PhysicalArray, ScalarArray},
    view::{
        BytesView, Float32View, Float64View, Int8View, Int16View, Int32View, Int64View, Strategy,
        TextView, TypedView, UInt8View, UInt16View, UInt32View, UInt64View, make_view,
    },
};
