//! Error types for typed-arrow-any.

use arrow_schema::DataType;
use thiserror::Error;

/// Error returned when a typed view cannot be resolved over an Arrow array.
///
/// Every variant is produced while constructing a view; once a view exists,
/// reading from it cannot fail except on caller precondition violations
/// (out-of-bounds indices), which panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The array's physical type is outside the supported domain.
    #[error("unsupported source type {data_type}")]
    UnsupportedSourceType {
        /// Arrow `DataType` of the rejected array
        data_type: DataType,
    },
    /// No conversion exists from a non-dictionary physical type to the requested type.
    #[error("cannot read {from} as {to}")]
    UnsupportedConversion {
        /// Physical type of the source array
        from: DataType,
        /// Name of the requested logical type
        to: &'static str,
    },
    /// No conversion exists from the dictionary's values type to the requested type.
    #[error("cannot read dictionary values of type {dictionary_value_type} as {to}")]
    UnsupportedDictionaryConversion {
        /// Physical type of the dictionary's values array
        dictionary_value_type: DataType,
        /// Name of the requested logical type
        to: &'static str,
    },
    /// A dictionary-tagged array whose metadata does not match the arrays it holds.
    #[error("malformed dictionary array {data_type}: {message}")]
    MalformedDictionary {
        /// Declared Arrow `DataType` of the dictionary array
        data_type: DataType,
        /// What did not match
        message: String,
    },
}

impl ConversionError {
    /// Create an unsupported source type error
    pub fn unsupported_source(data_type: &DataType) -> Self {
        Self::UnsupportedSourceType {
            data_type: data_type.clone(),
        }
    }

    /// Create an unsupported conversion error
    pub fn unsupported_conversion(from: &DataType, to: &'static str) -> Self {
        Self::UnsupportedConversion {
            from: from.clone(),
            to,
        }
    }

    /// Create an unsupported dictionary conversion error
    pub fn unsupported_dictionary(value_type: &DataType, to: &'static str) -> Self {
        Self::UnsupportedDictionaryConversion {
            dictionary_value_type: value_type.clone(),
            to,
        }
    }

    /// Create a malformed dictionary error
    pub fn malformed_dictionary(data_type: &DataType, message: impl Into<String>) -> Self {
        Self::MalformedDictionary {
            data_type: data_type.clone(),
            message: message.into(),
        }
    }
}
