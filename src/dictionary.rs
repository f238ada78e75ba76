//! Dictionary-encoded arrays: key lookup and one-level values classification.

use std::fmt;

use arrow_array::{
    Array, DictionaryArray,
    types::{
        Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
    },
};
use arrow_buffer::{ArrowNativeType, NullBuffer, ScalarBuffer};
use arrow_schema::DataType;

use crate::{error::ConversionError, physical::ScalarArray};

/// Maps a logical position of a dictionary array to a position in its values array.
///
/// Implemented for the key buffers of all eight Arrow dictionary key types.
pub trait KeyIndex: fmt::Debug + Send + Sync {
    /// Number of keys.
    fn len(&self) -> usize;

    /// Whether there are no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values-array position referenced by the key at `position`.
    ///
    /// # Panics
    /// Panics if `position >= self.len()`.
    fn lookup(&self, position: usize) -> usize;
}

impl<N: ArrowNativeType> KeyIndex for ScalarBuffer<N> {
    fn len(&self) -> usize {
        <[N]>::len(self)
    }

    #[inline]
    fn lookup(&self, position: usize) -> usize {
        self[position].as_usize()
    }
}

/// A dictionary array split into its keys and its (non-dictionary) values.
///
/// Keys at valid positions are trusted to address the values array; a key outside
/// it makes the read that uses it panic. Keys at null positions may hold anything
/// and are never looked up by views.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryArrayRef<'a> {
    key_type: &'a DataType,
    keys: &'a dyn KeyIndex,
    key_nulls: Option<&'a NullBuffer>,
    values: ScalarArray<'a>,
}

impl<'a> DictionaryArrayRef<'a> {
    /// Split a dictionary array into keys and classified values.
    ///
    /// # Errors
    /// - [`ConversionError::MalformedDictionary`] if `array` is not tagged as a
    ///   dictionary, does not downcast to the `DictionaryArray` its key type names,
    ///   or holds a values array whose type differs from the declared value type.
    /// - [`ConversionError::UnsupportedSourceType`] carrying the values type if the
    ///   values array is not a supported non-dictionary encoding.
    pub fn try_new(array: &'a dyn Array) -> Result<Self, ConversionError> {
        let data_type = array.data_type();
        let DataType::Dictionary(key_type, value_type) = data_type else {
            return Err(ConversionError::malformed_dictionary(
                data_type,
                "array is not dictionary encoded",
            ));
        };

        macro_rules! split_dictionary {
            ($key_ty:ty) => {{
                let dictionary = array
                    .as_any()
                    .downcast_ref::<DictionaryArray<$key_ty>>()
                    .ok_or_else(|| {
                        ConversionError::malformed_dictionary(
                            data_type,
                            concat!("array is not a DictionaryArray<", stringify!($key_ty), ">"),
                        )
                    })?;
                let keys: &'a dyn KeyIndex = dictionary.keys().values();
                (keys, dictionary.keys().nulls(), dictionary.values().as_ref())
            }};
        }

        let (keys, key_nulls, values) = match key_type.as_ref() {
            DataType::Int8 => split_dictionary!(Int8Type),
            DataType::Int16 => split_dictionary!(Int16Type),
            DataType::Int32 => split_dictionary!(Int32Type),
            DataType::Int64 => split_dictionary!(Int64Type),
            DataType::UInt8 => split_dictionary!(UInt8Type),
            DataType::UInt16 => split_dictionary!(UInt16Type),
            DataType::UInt32 => split_dictionary!(UInt32Type),
            DataType::UInt64 => split_dictionary!(UInt64Type),
            other => {
                return Err(ConversionError::malformed_dictionary(
                    data_type,
                    format!("unsupported dictionary key type {other}"),
                ));
            }
        };

        if values.data_type() != value_type.as_ref() {
            return Err(ConversionError::malformed_dictionary(
                data_type,
                format!(
                    "declared value type {value_type} but values array is {}",
                    values.data_type()
                ),
            ));
        }

        Ok(Self {
            key_type: key_type.as_ref(),
            keys,
            key_nulls,
            values: ScalarArray::try_new(values)?,
        })
    }

    /// Arrow type of the keys.
    pub fn key_type(&self) -> &'a DataType {
        self.key_type
    }

    /// Key lookup for this dictionary.
    pub fn keys(&self) -> &'a dyn KeyIndex {
        self.keys
    }

    /// Validity of the keys, if any key is null.
    pub fn key_nulls(&self) -> Option<&'a NullBuffer> {
        self.key_nulls
    }

    /// Whether the key at `position` is null.
    pub fn is_null(&self, position: usize) -> bool {
        self.key_nulls.is_some_and(|nulls| nulls.is_null(position))
    }

    /// Classified values array.
    pub fn values(&self) -> &ScalarArray<'a> {
        &self.values
    }

    /// Values-array position for logical position `position`.
    ///
    /// The raw key is returned even at a null position, where it need not address
    /// the values array.
    #[inline]
    pub fn lookup(&self, position: usize) -> usize {
        self.keys.lookup(position)
    }

    /// Number of logical positions (keys).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the dictionary array has no logical positions.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::{Int64Array, StringArray, UInt16Array};

    use super::*;

    #[test]
    fn lookup_resolves_keys() {
        let keys = arrow_array::Int8Array::from(vec![0, 1, 0, 0, 1]);
        let values = Arc::new(Int64Array::from(vec![1024, 1023]));
        let array = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();

        let dictionary = DictionaryArrayRef::try_new(&array).unwrap();
        assert_eq!(dictionary.len(), 5);
        assert_eq!(dictionary.key_type(), &DataType::Int8);
        let positions: Vec<usize> = (0..dictionary.len()).map(|i| dictionary.lookup(i)).collect();
        assert_eq!(positions, vec![0, 1, 0, 0, 1]);
        assert!(matches!(dictionary.values(), ScalarArray::Int64(_)));
    }

    #[test]
    fn unsigned_keys_resolve() {
        let keys = UInt16Array::from(vec![2, 0]);
        let values = Arc::new(StringArray::from(vec!["a", "b", "c"]));
        let array = DictionaryArray::<UInt16Type>::try_new(keys, values).unwrap();

        let dictionary = DictionaryArrayRef::try_new(&array).unwrap();
        assert_eq!(dictionary.lookup(0), 2);
        assert_eq!(dictionary.lookup(1), 0);
    }

    #[test]
    fn null_keys_are_reported() {
        let keys: arrow_array::Int8Array = vec![Some(0), None].into();
        let values = Arc::new(Int64Array::from(vec![5]));
        let array = DictionaryArray::<Int8Type>::try_new(keys, values).unwrap();

        let dictionary = DictionaryArrayRef::try_new(&array).unwrap();
        assert!(dictionary.key_nulls().is_some());
        assert!(!dictionary.is_null(0));
        assert!(dictionary.is_null(1));
    }

    #[test]
    fn non_dictionary_is_malformed() {
        let array = Int64Array::from(vec![1]);
        assert!(matches!(
            DictionaryArrayRef::try_new(&array),
            Err(ConversionError::MalformedDictionary { .. })
        ));
    }

    #[test]
    fn nested_dictionary_values_are_unsupported() {
        let inner = DictionaryArray::<Int8Type>::try_new(
            arrow_array::Int8Array::from(vec![0]),
            Arc::new(StringArray::from(vec!["x"])),
        )
        .unwrap();
        let outer = DictionaryArray::<Int8Type>::try_new(
            arrow_array::Int8Array::from(vec![0, 0]),
            Arc::new(inner),
        )
        .unwrap();

        match DictionaryArrayRef::try_new(&outer) {
            Err(ConversionError::UnsupportedSourceType { data_type }) => {
                assert!(matches!(data_type, DataType::Dictionary(_, _)));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
