//! Classification of Arrow arrays into the physical encodings typed views can read.
//!
//! [`PhysicalArray::try_new`] inspects an array's `DataType` once and downcasts it to
//! the concrete arrow-rs array, exposing the raw element storage:
//!
//! - fixed-width values (integers, floats, temporal types) as `&ScalarBuffer<N>`,
//!   already offset for sliced arrays;
//! - variable-length values (strings, binaries and their large/view forms) as the
//!   concrete byte array.
//!
//! Dictionary arrays classify into [`DictionaryArrayRef`], whose values side is a
//! [`ScalarArray`]. `ScalarArray` has no dictionary variant, so dictionaries nest at
//! most one level deep.

use arrow_array::{
    Array, ArrowPrimitiveType, BinaryArray, BinaryViewArray, LargeBinaryArray, LargeStringArray,
    PrimitiveArray, StringArray, StringViewArray,
    types::{
        Date32Type, Date64Type, DurationMicrosecondType, DurationMillisecondType,
        DurationNanosecondType, DurationSecondType, Float16Type, Float32Type, Float64Type,
        Int8Type, Int16Type, Int32Type, Int64Type, Time32MillisecondType, Time32SecondType,
        Time64MicrosecondType, Time64NanosecondType, TimestampMicrosecondType,
        TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt8Type,
        UInt16Type, UInt32Type, UInt64Type,
    },
};
use arrow_buffer::ScalarBuffer;
use arrow_schema::{DataType, TimeUnit};
use half::f16;

use crate::{dictionary::DictionaryArrayRef, error::ConversionError};

/// A supported Arrow array, classified by physical encoding.
#[derive(Debug, Clone, Copy)]
pub enum PhysicalArray<'a> {
    /// Any non-dictionary encoding.
    Scalar(ScalarArray<'a>),
    /// A dictionary-encoded array over a non-dictionary values array.
    Dictionary(DictionaryArrayRef<'a>),
}

impl<'a> PhysicalArray<'a> {
    /// Classify `array` by its `DataType`.
    ///
    /// # Errors
    /// - [`ConversionError::UnsupportedSourceType`] if the array (or, for a dictionary,
    ///   its values array) has an unsupported physical type.
    /// - [`ConversionError::MalformedDictionary`] if a dictionary's metadata does not
    ///   match the arrays it holds.
    pub fn try_new(array: &'a dyn Array) -> Result<Self, ConversionError> {
        match array.data_type() {
            DataType::Dictionary(_, _) => DictionaryArrayRef::try_new(array).map(Self::Dictionary),
            _ => ScalarArray::try_new(array).map(Self::Scalar),
        }
    }
}

/// Borrowed raw storage of a non-dictionary Arrow array.
///
/// Temporal variants keep their unit for introspection only; reads see the raw
/// integer tick count.
#[derive(Debug, Clone, Copy)]
pub enum ScalarArray<'a> {
    /// `Int8`
    Int8(&'a ScalarBuffer<i8>),
    /// `Int16`
    Int16(&'a ScalarBuffer<i16>),
    /// `Int32`
    Int32(&'a ScalarBuffer<i32>),
    /// `Int64`
    Int64(&'a ScalarBuffer<i64>),
    /// `UInt8`
    UInt8(&'a ScalarBuffer<u8>),
    /// `UInt16`
    UInt16(&'a ScalarBuffer<u16>),
    /// `UInt32`
    UInt32(&'a ScalarBuffer<u32>),
    /// `UInt64`
    UInt64(&'a ScalarBuffer<u64>),
    /// `Float16`
    Float16(&'a ScalarBuffer<f16>),
    /// `Float32`
    Float32(&'a ScalarBuffer<f32>),
    /// `Float64`
    Float64(&'a ScalarBuffer<f64>),
    /// `Timestamp` of any unit and time zone, as ticks since the epoch.
    Timestamp(TimeUnit, &'a ScalarBuffer<i64>),
    /// `Duration` of any unit, as ticks.
    Duration(TimeUnit, &'a ScalarBuffer<i64>),
    /// `Date32`, as days since the epoch.
    Date32(&'a ScalarBuffer<i32>),
    /// `Date64`, as milliseconds since the epoch.
    Date64(&'a ScalarBuffer<i64>),
    /// `Time32` (seconds or milliseconds since midnight).
    Time32(TimeUnit, &'a ScalarBuffer<i32>),
    /// `Time64` (microseconds or nanoseconds since midnight).
    Time64(TimeUnit, &'a ScalarBuffer<i64>),
    /// `Utf8`
    Utf8(&'a StringArray),
    /// `LargeUtf8`
    LargeUtf8(&'a LargeStringArray),
    /// `Utf8View`
    Utf8View(&'a StringViewArray),
    /// `Binary`
    Binary(&'a BinaryArray),
    /// `LargeBinary`
    LargeBinary(&'a LargeBinaryArray),
    /// `BinaryView`
    BinaryView(&'a BinaryViewArray),
}

impl<'a> ScalarArray<'a> {
    /// Classify a non-dictionary array by its `DataType`.
    ///
    /// # Errors
    /// Returns [`ConversionError::UnsupportedSourceType`] for dictionaries and for any
    /// type outside the supported encodings, and when the array does not downcast to
    /// the concrete type its `DataType` names.
    pub fn try_new(array: &'a dyn Array) -> Result<Self, ConversionError> {
        let scalar = match array.data_type() {
            DataType::Int8 => Self::Int8(values::<Int8Type>(array)?),
            DataType::Int16 => Self::Int16(values::<Int16Type>(array)?),
            DataType::Int32 => Self::Int32(values::<Int32Type>(array)?),
            DataType::Int64 => Self::Int64(values::<Int64Type>(array)?),
            DataType::UInt8 => Self::UInt8(values::<UInt8Type>(array)?),
            DataType::UInt16 => Self::UInt16(values::<UInt16Type>(array)?),
            DataType::UInt32 => Self::UInt32(values::<UInt32Type>(array)?),
            DataType::UInt64 => Self::UInt64(values::<UInt64Type>(array)?),
            DataType::Float16 => Self::Float16(values::<Float16Type>(array)?),
            DataType::Float32 => Self::Float32(values::<Float32Type>(array)?),
            DataType::Float64 => Self::Float64(values::<Float64Type>(array)?),
            DataType::Timestamp(unit, _) => {
                let ticks = match unit {
                    TimeUnit::Second => values::<TimestampSecondType>(array)?,
                    TimeUnit::Millisecond => values::<TimestampMillisecondType>(array)?,
                    TimeUnit::Microsecond => values::<TimestampMicrosecondType>(array)?,
                    TimeUnit::Nanosecond => values::<TimestampNanosecondType>(array)?,
                };
                Self::Timestamp(*unit, ticks)
            }
            DataType::Duration(unit) => {
                let ticks = match unit {
                    TimeUnit::Second => values::<DurationSecondType>(array)?,
                    TimeUnit::Millisecond => values::<DurationMillisecondType>(array)?,
                    TimeUnit::Microsecond => values::<DurationMicrosecondType>(array)?,
                    TimeUnit::Nanosecond => values::<DurationNanosecondType>(array)?,
                };
                Self::Duration(*unit, ticks)
            }
            DataType::Date32 => Self::Date32(values::<Date32Type>(array)?),
            DataType::Date64 => Self::Date64(values::<Date64Type>(array)?),
            DataType::Time32(unit) => {
                let ticks = match unit {
                    TimeUnit::Second => values::<Time32SecondType>(array)?,
                    TimeUnit::Millisecond => values::<Time32MillisecondType>(array)?,
                    _ => return Err(ConversionError::unsupported_source(array.data_type())),
                };
                Self::Time32(*unit, ticks)
            }
            DataType::Time64(unit) => {
                let ticks = match unit {
                    TimeUnit::Microsecond => values::<Time64MicrosecondType>(array)?,
                    TimeUnit::Nanosecond => values::<Time64NanosecondType>(array)?,
                    _ => return Err(ConversionError::unsupported_source(array.data_type())),
                };
                Self::Time64(*unit, ticks)
            }
            DataType::Utf8 => Self::Utf8(downcast(array)?),
            DataType::LargeUtf8 => Self::LargeUtf8(downcast(array)?),
            DataType::Utf8View => Self::Utf8View(downcast(array)?),
            DataType::Binary => Self::Binary(downcast(array)?),
            DataType::LargeBinary => Self::LargeBinary(downcast(array)?),
            DataType::BinaryView => Self::BinaryView(downcast(array)?),
            other => return Err(ConversionError::unsupported_source(other)),
        };
        Ok(scalar)
    }

    /// Whether elements are variable-length strings or byte strings.
    pub fn is_variable_length(&self) -> bool {
        matches!(
            self,
            Self::Utf8(_)
                | Self::LargeUtf8(_)
                | Self::Utf8View(_)
                | Self::Binary(_)
                | Self::LargeBinary(_)
                | Self::BinaryView(_)
        )
    }
}

fn downcast<'a, A: Array + 'static>(array: &'a dyn Array) -> Result<&'a A, ConversionError> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| ConversionError::unsupported_source(array.data_type()))
}

fn values<'a, P: ArrowPrimitiveType>(
    array: &'a dyn Array,
) -> Result<&'a ScalarBuffer<P::Native>, ConversionError> {
    downcast::<PrimitiveArray<P>>(array).map(PrimitiveArray::values)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::{
        BooleanArray, DictionaryArray, Int32Array, StringArray, TimestampMillisecondArray,
        types::Int8Type,
    };

    use super::*;

    #[test]
    fn classifies_primitive_by_data_type() {
        let array = Int32Array::from(vec![1, 2, 3]);
        match ScalarArray::try_new(&array).unwrap() {
            ScalarArray::Int32(values) => assert_eq!(&values[..], &[1, 2, 3]),
            other => panic!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn sliced_primitive_exposes_offset_values() {
        let array = Int32Array::from(vec![1, 2, 3, 4]).slice(1, 2);
        match ScalarArray::try_new(&array).unwrap() {
            ScalarArray::Int32(values) => assert_eq!(&values[..], &[2, 3]),
            other => panic!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn timestamp_keeps_unit_and_ignores_zone() {
        let array = TimestampMillisecondArray::from(vec![1_000, 2_000]).with_timezone("UTC");
        match ScalarArray::try_new(&array).unwrap() {
            ScalarArray::Timestamp(unit, ticks) => {
                assert_eq!(unit, TimeUnit::Millisecond);
                assert_eq!(&ticks[..], &[1_000, 2_000]);
            }
            other => panic!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn strings_are_variable_length() {
        let array = StringArray::from(vec!["a"]);
        assert!(ScalarArray::try_new(&array).unwrap().is_variable_length());
        let array = Int32Array::from(vec![1]);
        assert!(!ScalarArray::try_new(&array).unwrap().is_variable_length());
    }

    #[test]
    fn boolean_is_unsupported() {
        let array = BooleanArray::from(vec![true]);
        let err = PhysicalArray::try_new(&array).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnsupportedSourceType {
                data_type: DataType::Boolean
            }
        );
    }

    #[test]
    fn scalar_rejects_dictionary() {
        let keys = arrow_array::Int8Array::from(vec![0, 0]);
        let values = Arc::new(StringArray::from(vec!["a"]));
        let array = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();
        assert!(matches!(
            ScalarArray::try_new(&array),
            Err(ConversionError::UnsupportedSourceType { .. })
        ));
        assert!(matches!(
            PhysicalArray::try_new(&array),
            Ok(PhysicalArray::Dictionary(_))
        ));
    }
}
