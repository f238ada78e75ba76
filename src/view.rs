//! Typed views: read any supported Arrow array as a chosen logical type.

use std::fmt;

use arrow_array::Array;
use arrow_buffer::NullBuffer;
use arrow_schema::DataType;

use crate::{
    convert::ReadAs,
    dictionary::KeyIndex,
    error::ConversionError,
    logical::{Bytes, LogicalType, Text},
    physical::{PhysicalArray, ScalarArray},
};

/// How a view reads its elements. Fixed when the view is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The array already holds the logical type; reads are plain loads.
    Direct,
    /// Each element is read and converted.
    Convert,
    /// Each position is looked up in the dictionary keys, then the value is read and
    /// converted.
    Dictionary,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Direct => "direct",
            Strategy::Convert => "convert",
            Strategy::Dictionary => "dictionary",
        })
    }
}

enum Access<'a, T: LogicalType> {
    Direct(&'a T::Direct<'a>),
    Convert(&'a dyn ReadAs<'a, T::Value<'a>>),
    Dictionary {
        keys: &'a dyn KeyIndex,
        key_nulls: Option<&'a NullBuffer>,
        values: &'a dyn ReadAs<'a, T::Value<'a>>,
    },
}

impl<T: LogicalType> Clone for Access<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: LogicalType> Copy for Access<'_, T> {}

/// Read-only view of an Arrow array as logical type `T`.
///
/// Built once by [`make_view`] (or [`TypedView::try_new`]), which classifies the
/// array's physical type and binds a [`Strategy`]. Reads reuse that strategy; the
/// view borrows the array and holds no data of its own.
///
/// ```
/// use typed_arrow_any::{arrow_array::Float32Array, make_view};
///
/// let array = Float32Array::from(vec![0.0, 1.5, 2.9]);
/// let view = make_view::<u64>(&array).unwrap();
/// assert!(!view.is_direct());
/// assert_eq!(view.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
///
/// let view = make_view::<f32>(&array).unwrap();
/// assert!(view.is_direct());
/// assert_eq!(view.value(1), 1.5);
/// ```
pub struct TypedView<'a, T: LogicalType> {
    array: &'a dyn Array,
    access: Access<'a, T>,
}

impl<T: LogicalType> Clone for TypedView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: LogicalType> Copy for TypedView<'_, T> {}

impl<T: LogicalType> fmt::Debug for TypedView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedView")
            .field("logical_type", &T::NAME)
            .field("data_type", self.array.data_type())
            .field("len", &self.array.len())
            .field("strategy", &self.strategy())
            .finish()
    }
}

impl<'a, T: LogicalType> TypedView<'a, T> {
    /// Resolve a view of `array` as `T`.
    ///
    /// Resolution looks only at type tags, never at values:
    /// - the array's own physical type is `T`'s: [`Strategy::Direct`];
    /// - another supported type with a conversion to `T`: [`Strategy::Convert`];
    /// - a dictionary whose values convert to `T`: [`Strategy::Dictionary`].
    ///
    /// # Errors
    /// - [`ConversionError::UnsupportedSourceType`] if the physical type is not supported.
    /// - [`ConversionError::UnsupportedConversion`] if it cannot be read as `T`.
    /// - [`ConversionError::UnsupportedDictionaryConversion`] if the dictionary's values
    ///   are unsupported or cannot be read as `T`.
    /// - [`ConversionError::MalformedDictionary`] if dictionary metadata does not match
    ///   the arrays it holds.
    pub fn try_new(array: &'a dyn Array) -> Result<Self, ConversionError> {
        let physical = match PhysicalArray::try_new(array) {
            Ok(physical) => physical,
            Err(ConversionError::UnsupportedSourceType { data_type })
                if matches!(array.data_type(), DataType::Dictionary(_, _)) =>
            {
                return Err(ConversionError::unsupported_dictionary(&data_type, T::NAME));
            }
            Err(err) => return Err(err),
        };

        let access = match physical {
            PhysicalArray::Scalar(source) => resolve_scalar::<T>(array, &source)?,
            PhysicalArray::Dictionary(dictionary) => {
                let values = dictionary.values();
                let reader = T::reader(values).ok_or_else(|| {
                    ConversionError::unsupported_dictionary(
                        dictionary_value_type(array),
                        T::NAME,
                    )
                })?;
                Access::Dictionary {
                    keys: dictionary.keys(),
                    key_nulls: dictionary.key_nulls(),
                    values: reader,
                }
            }
        };

        let view = Self { array, access };
        log::trace!(
            "resolved {} view over {}: {}",
            T::NAME,
            array.data_type(),
            view.strategy()
        );
        Ok(view)
    }

    /// Element `index` as `T`.
    ///
    /// A null slot of a plain array reads whatever its physical slot holds. A null
    /// slot of a dictionary array reads `T::Value::default()` (`0`, `""`, `b""`),
    /// since its key need not address the values array. Check
    /// [`TypedView::is_null`] or use [`TypedView::get`] to tell nulls apart.
    ///
    /// # Panics
    /// - If `index >= self.len()`.
    /// - If a valid dictionary key does not address its values array.
    /// - If a binary value read as [`Text`] is not UTF-8.
    #[inline]
    pub fn value(&self, index: usize) -> T::Value<'a> {
        match self.access {
            Access::Direct(direct) => direct.read_as(index),
            Access::Convert(reader) => reader.read_as(index),
            Access::Dictionary {
                keys,
                key_nulls,
                values,
            } => {
                if key_nulls.is_some_and(|nulls| nulls.is_null(index)) {
                    return Default::default();
                }
                values.read_as(keys.lookup(index))
            }
        }
    }

    /// Element `index` as `T`, or `None` if out of bounds or null.
    pub fn get(&self, index: usize) -> Option<T::Value<'a>> {
        if index >= self.len() || self.array.is_null(index) {
            return None;
        }
        Some(self.value(index))
    }

    /// Every element in order, nulls included (see [`TypedView::value`]).
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T::Value<'a>> + use<'a, T> {
        let view = *self;
        (0..view.len()).map(move |index| view.value(index))
    }

    /// Whether reads bypass conversion entirely.
    pub fn is_direct(&self) -> bool {
        matches!(self.access, Access::Direct(_))
    }

    /// The strategy bound at construction.
    pub fn strategy(&self) -> Strategy {
        match self.access {
            Access::Direct(_) => Strategy::Direct,
            Access::Convert(_) => Strategy::Convert,
            Access::Dictionary { .. } => Strategy::Dictionary,
        }
    }

    /// The borrowed array.
    pub fn array(&self) -> &'a dyn Array {
        self.array
    }

    /// Arrow type of the borrowed array.
    pub fn data_type(&self) -> &'a DataType {
        self.array.data_type()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Whether element `index` is null, per the array's validity.
    pub fn is_null(&self, index: usize) -> bool {
        self.array.is_null(index)
    }

    /// Whether element `index` is valid, per the array's validity.
    pub fn is_valid(&self, index: usize) -> bool {
        self.array.is_valid(index)
    }

    /// Number of null elements.
    pub fn null_count(&self) -> usize {
        self.array.null_count()
    }
}

fn resolve_scalar<'a, T: LogicalType>(
    array: &'a dyn Array,
    source: &ScalarArray<'a>,
) -> Result<Access<'a, T>, ConversionError> {
    if let Some(direct) = T::direct(source) {
        return Ok(Access::Direct(direct));
    }
    T::reader(source)
        .map(Access::Convert)
        .ok_or_else(|| ConversionError::unsupported_conversion(array.data_type(), T::NAME))
}

fn dictionary_value_type(array: &dyn Array) -> &DataType {
    match array.data_type() {
        DataType::Dictionary(_, value_type) => value_type.as_ref(),
        other => other,
    }
}

/// Resolve a view of `array` as `T`. See [`TypedView::try_new`].
///
/// # Errors
/// Fails when `array` cannot be read as `T`; see [`ConversionError`].
pub fn make_view<'a, T: LogicalType>(
    array: &'a dyn Array,
) -> Result<TypedView<'a, T>, ConversionError> {
    TypedView::try_new(array)
}

/// View as `i8`.
pub type Int8View<'a> = TypedView<'a, i8>;
/// View as `i16`.
pub type Int16View<'a> = TypedView<'a, i16>;
/// View as `i32`.
pub type Int32View<'a> = TypedView<'a, i32>;
/// View as `i64`.
pub type Int64View<'a> = TypedView<'a, i64>;
/// View as `u8`.
pub type UInt8View<'a> = TypedView<'a, u8>;
/// View as `u16`.
pub type UInt16View<'a> = TypedView<'a, u16>;
/// View as `u32`.
pub type UInt32View<'a> = TypedView<'a, u32>;
/// View as `u64`.
pub type UInt64View<'a> = TypedView<'a, u64>;
/// View as `f32`.
pub type Float32View<'a> = TypedView<'a, f32>;
/// View as `f64`.
pub type Float64View<'a> = TypedView<'a, f64>;
/// View as `&str`.
pub type TextView<'a> = TypedView<'a, Text>;
/// View as `&[u8]`.
pub type BytesView<'a> = TypedView<'a, Bytes>;
