//! Logical types: the Rust scalar types a view can read elements as.
//!
//! - Numbers: `i{8,16,32,64}`, `u{8,16,32,64}`, `f{32,64}`, each read directly from
//!   its own Arrow primitive type and converted from every other fixed-width type.
//! - [`Text`]: `&str`, read directly from `Utf8`.
//! - [`Bytes`]: `&[u8]`, read directly from `Binary`.

use arrow_array::{BinaryArray, StringArray};
use arrow_buffer::ScalarBuffer;

use crate::{
    convert::{ReadAs, bytes_reader, numeric_reader, text_reader},
    physical::ScalarArray,
};

/// A scalar type elements can be read as.
///
/// `direct` picks out the one physical encoding read without conversion; `reader` is
/// the conversion table row for every encoding this type accepts.
pub trait LogicalType: Sized + 'static {
    /// Value produced by a read; may borrow from the array.
    ///
    /// `Default` is what a null dictionary slot reads as.
    type Value<'a>: Copy + Default
    where
        Self: 'a;

    /// Physical storage read as-is. Reads are statically dispatched.
    type Direct<'a>: ReadAs<'a, Self::Value<'a>> + 'a
    where
        Self: 'a;

    /// Name used in errors and logs.
    const NAME: &'static str;

    /// The direct storage, if `source` is this type's own physical encoding.
    fn direct<'a>(source: &ScalarArray<'a>) -> Option<&'a Self::Direct<'a>>;

    /// The converting reader for `source`, or `None` if there is no table entry.
    fn reader<'a>(source: &ScalarArray<'a>) -> Option<&'a dyn ReadAs<'a, Self::Value<'a>>>;
}

macro_rules! impl_numeric_logical {
    ($rust:ty, $variant:ident) => {
        impl LogicalType for $rust {
            type Value<'a> = $rust;
            type Direct<'a> = ScalarBuffer<$rust>;

            const NAME: &'static str = stringify!($rust);

            fn direct<'a>(source: &ScalarArray<'a>) -> Option<&'a ScalarBuffer<$rust>> {
                match *source {
                    ScalarArray::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn reader<'a>(source: &ScalarArray<'a>) -> Option<&'a dyn ReadAs<'a, $rust>> {
                numeric_reader::<$rust>(source)
            }
        }
    };
}

impl_numeric_logical!(i8, Int8);
impl_numeric_logical!(i16, Int16);
impl_numeric_logical!(i32, Int32);
impl_numeric_logical!(i64, Int64);
impl_numeric_logical!(u8, UInt8);
impl_numeric_logical!(u16, UInt16);
impl_numeric_logical!(u32, UInt32);
impl_numeric_logical!(u64, UInt64);
impl_numeric_logical!(f32, Float32);
impl_numeric_logical!(f64, Float64);

/// UTF-8 text, read as `&str`.
///
/// Reads `Utf8` directly and `LargeUtf8`/`Utf8View` without copying. Binary encodings
/// are reinterpreted as text: every such read validates the bytes as UTF-8, a cost
/// paid per element, and panics if they are not (see [`crate::TypedView::value`]).
/// Use [`Bytes`] to read binary data without any encoding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Text;

impl LogicalType for Text {
    type Value<'a> = &'a str;
    type Direct<'a> = StringArray;

    const NAME: &'static str = "text";

    fn direct<'a>(source: &ScalarArray<'a>) -> Option<&'a StringArray> {
        match *source {
            ScalarArray::Utf8(array) => Some(array),
            _ => None,
        }
    }

    fn reader<'a>(source: &ScalarArray<'a>) -> Option<&'a dyn ReadAs<'a, &'a str>> {
        text_reader(source)
    }
}

/// Raw byte strings, read as `&[u8]` from any string or binary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes;

impl LogicalType for Bytes {
    type Value<'a> = &'a [u8];
    type Direct<'a> = BinaryArray;

    const NAME: &'static str = "bytes";

    fn direct<'a>(source: &ScalarArray<'a>) -> Option<&'a BinaryArray> {
        match *source {
            ScalarArray::Binary(array) => Some(array),
            _ => None,
        }
    }

    fn reader<'a>(source: &ScalarArray<'a>) -> Option<&'a dyn ReadAs<'a, &'a [u8]>> {
        bytes_reader(source)
    }
}
