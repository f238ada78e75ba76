//! Conversion table: how a logical type reads each physical encoding.
//!
//! Numeric conversions are Rust `as` casts ([`CastFrom`]). Every numeric logical
//! type can read every fixed-width encoding, including its own (dictionary values
//! of the requested type still go through the table). Text and byte-string logical
//! types read the six variable-length encodings.
//!
//! A table entry is a [`ReadAs`] implementation on the borrowed raw storage; the
//! resolver stores it as `&dyn ReadAs`, so no view allocates.

use arrow_array::{
    BinaryViewArray, GenericBinaryArray, GenericStringArray, OffsetSizeTrait, StringViewArray,
};
use arrow_buffer::{ArrowNativeType, ScalarBuffer};
use half::f16;

use crate::physical::ScalarArray;

/// Lossy numeric conversion with `as` cast semantics.
///
/// Narrowing integers truncate (two's complement), `f64 -> f32` rounds per IEEE-754,
/// and float to integer truncates toward zero (saturating at the bounds, NaN to 0).
pub trait CastFrom<S>: Sized {
    /// Convert `value` to `Self`.
    fn cast_from(value: S) -> Self;
}

macro_rules! impl_cast_from {
    ($to:ty => $($from:ty),+) => {
        $(
            impl CastFrom<$from> for $to {
                #[inline]
                #[allow(clippy::unnecessary_cast)]
                fn cast_from(value: $from) -> Self {
                    value as $to
                }
            }
        )+

        impl CastFrom<f16> for $to {
            #[inline]
            #[allow(clippy::unnecessary_cast)]
            fn cast_from(value: f16) -> Self {
                value.to_f32() as $to
            }
        }
    };
}

impl_cast_from!(i8 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(i16 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(i32 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(i64 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(u8 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(u16 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(u32 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(u64 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(f32 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
impl_cast_from!(f64 => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// A numeric logical type: castable from every fixed-width Arrow native type.
pub trait Numeric:
    Copy
    + Send
    + Sync
    + 'static
    + CastFrom<i8>
    + CastFrom<i16>
    + CastFrom<i32>
    + CastFrom<i64>
    + CastFrom<u8>
    + CastFrom<u16>
    + CastFrom<u32>
    + CastFrom<u64>
    + CastFrom<f16>
    + CastFrom<f32>
    + CastFrom<f64>
{
}

impl Numeric for i8 {}
impl Numeric for i16 {}
impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u8 {}
impl Numeric for u16 {}
impl Numeric for u32 {}
impl Numeric for u64 {}
impl Numeric for f32 {}
impl Numeric for f64 {}

/// Positional read of one element of borrowed raw storage, converted to `V`.
///
/// `index` is relative to the start of the (possibly sliced) array.
///
/// # Panics
/// Implementations panic if `index` is out of bounds.
pub trait ReadAs<'a, V>: Send + Sync {
    /// Read and convert the element at `index`.
    fn read_as(&'a self, index: usize) -> V;
}

impl<'a, N, T> ReadAs<'a, T> for ScalarBuffer<N>
where
    N: ArrowNativeType,
    T: CastFrom<N>,
{
    #[inline]
    fn read_as(&'a self, index: usize) -> T {
        T::cast_from(self[index])
    }
}

impl<'a, O: OffsetSizeTrait> ReadAs<'a, &'a str> for GenericStringArray<O> {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a str {
        self.value(index)
    }
}

impl<'a> ReadAs<'a, &'a str> for StringViewArray {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a str {
        self.value(index)
    }
}

impl<'a, O: OffsetSizeTrait> ReadAs<'a, &'a str> for GenericBinaryArray<O> {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a str {
        utf8(self.value(index), index)
    }
}

impl<'a> ReadAs<'a, &'a str> for BinaryViewArray {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a str {
        utf8(self.value(index), index)
    }
}

impl<'a, O: OffsetSizeTrait> ReadAs<'a, &'a [u8]> for GenericStringArray<O> {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a [u8] {
        self.value(index).as_bytes()
    }
}

impl<'a> ReadAs<'a, &'a [u8]> for StringViewArray {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a [u8] {
        self.value(index).as_bytes()
    }
}

impl<'a, O: OffsetSizeTrait> ReadAs<'a, &'a [u8]> for GenericBinaryArray<O> {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a [u8] {
        self.value(index)
    }
}

impl<'a> ReadAs<'a, &'a [u8]> for BinaryViewArray {
    #[inline]
    fn read_as(&'a self, index: usize) -> &'a [u8] {
        self.value(index)
    }
}

// Binary sources read as text must hold UTF-8.
fn utf8(bytes: &[u8], index: usize) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => panic!("binary value at index {index} is not valid UTF-8: {err}"),
    }
}

/// Table row for numeric logical types.
pub(crate) fn numeric_reader<'a, T: Numeric>(
    source: &ScalarArray<'a>,
) -> Option<&'a dyn ReadAs<'a, T>> {
    let reader: &'a dyn ReadAs<'a, T> = match *source {
        ScalarArray::Int8(values) => values,
        ScalarArray::Int16(values) => values,
        ScalarArray::Int32(values)
        | ScalarArray::Date32(values)
        | ScalarArray::Time32(_, values) => values,
        ScalarArray::Int64(values)
        | ScalarArray::Timestamp(_, values)
        | ScalarArray::Duration(_, values)
        | ScalarArray::Date64(values)
        | ScalarArray::Time64(_, values) => values,
        ScalarArray::UInt8(values) => values,
        ScalarArray::UInt16(values) => values,
        ScalarArray::UInt32(values) => values,
        ScalarArray::UInt64(values) => values,
        ScalarArray::Float16(values) => values,
        ScalarArray::Float32(values) => values,
        ScalarArray::Float64(values) => values,
        ScalarArray::Utf8(_)
        | ScalarArray::LargeUtf8(_)
        | ScalarArray::Utf8View(_)
        | ScalarArray::Binary(_)
        | ScalarArray::LargeBinary(_)
        | ScalarArray::BinaryView(_) => return None,
    };
    Some(reader)
}

/// Table row for the text logical type.
pub(crate) fn text_reader<'a>(source: &ScalarArray<'a>) -> Option<&'a dyn ReadAs<'a, &'a str>> {
    let reader: &'a dyn ReadAs<'a, &'a str> = match *source {
        ScalarArray::Utf8(array) => array,
        ScalarArray::LargeUtf8(array) => array,
        ScalarArray::Utf8View(array) => array,
        ScalarArray::Binary(array) => array,
        ScalarArray::LargeBinary(array) => array,
        ScalarArray::BinaryView(array) => array,
        _ => return None,
    };
    Some(reader)
}

/// Table row for the byte-string logical type.
pub(crate) fn bytes_reader<'a>(
    source: &ScalarArray<'a>,
) -> Option<&'a dyn ReadAs<'a, &'a [u8]>> {
    let reader: &'a dyn ReadAs<'a, &'a [u8]> = match *source {
        ScalarArray::Utf8(array) => array,
        ScalarArray::LargeUtf8(array) => array,
        ScalarArray::Utf8View(array) => array,
        ScalarArray::Binary(array) => array,
        ScalarArray::LargeBinary(array) => array,
        ScalarArray::BinaryView(array) => array,
        _ => return None,
    };
    Some(reader)
}

#[cfg(test)]
mod tests {
    use arrow_array::{BinaryArray, Float64Array, Int64Array, StringArray};

    use super::*;

    #[test]
    fn narrowing_integers_truncate() {
        assert_eq!(<u8 as CastFrom<i64>>::cast_from(300), 44);
        assert_eq!(<i8 as CastFrom<i64>>::cast_from(200), -56);
        assert_eq!(<u16 as CastFrom<i32>>::cast_from(-1), u16::MAX);
        assert_eq!(<i32 as CastFrom<u64>>::cast_from(u64::MAX), -1);
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(<i32 as CastFrom<f64>>::cast_from(3.9), 3);
        assert_eq!(<i32 as CastFrom<f64>>::cast_from(-3.9), -3);
        assert_eq!(<u8 as CastFrom<f32>>::cast_from(255.5), 255);
    }

    #[test]
    fn float_narrowing_follows_ieee() {
        let wide = 0.1_f64;
        assert_eq!(<f32 as CastFrom<f64>>::cast_from(wide), wide as f32);
        assert!(<f32 as CastFrom<f64>>::cast_from(f64::MAX).is_infinite());
    }

    #[test]
    fn half_widens_before_cast() {
        let value = f16::from_f32(2.5);
        assert_eq!(<f32 as CastFrom<f16>>::cast_from(value), 2.5);
        assert_eq!(<f64 as CastFrom<f16>>::cast_from(value), 2.5);
        assert_eq!(<i16 as CastFrom<f16>>::cast_from(value), 2);
    }

    #[test]
    fn numeric_row_rejects_text() {
        let array = StringArray::from(vec!["1"]);
        let source = ScalarArray::try_new(&array).unwrap();
        assert!(numeric_reader::<i64>(&source).is_none());
    }

    #[test]
    fn numeric_row_reads_every_fixed_width_source() {
        let array = Float64Array::from(vec![1.5, -2.5]);
        let source = ScalarArray::try_new(&array).unwrap();
        let reader = numeric_reader::<i64>(&source).unwrap();
        assert_eq!(reader.read_as(0), 1);
        assert_eq!(reader.read_as(1), -2);
    }

    #[test]
    fn text_row_rejects_numbers() {
        let array = Int64Array::from(vec![1]);
        let source = ScalarArray::try_new(&array).unwrap();
        assert!(text_reader(&source).is_none());
        assert!(bytes_reader(&source).is_none());
    }

    #[test]
    fn bytes_row_reads_strings_and_binaries() {
        let strings = StringArray::from(vec!["ab"]);
        let source = ScalarArray::try_new(&strings).unwrap();
        assert_eq!(bytes_reader(&source).unwrap().read_as(0), b"ab");

        let binaries = BinaryArray::from(vec![&b"\xff\x00"[..]]);
        let source = ScalarArray::try_new(&binaries).unwrap();
        assert_eq!(bytes_reader(&source).unwrap().read_as(0), b"\xff\x00");
    }

    #[test]
    #[should_panic(expected = "not valid UTF-8")]
    fn binary_as_text_panics_on_invalid_utf8() {
        let binaries = BinaryArray::from(vec![&b"\xff"[..]]);
        let source = ScalarArray::try_new(&binaries).unwrap();
        let _ = text_reader(&source).unwrap().read_as(0);
    }
}
