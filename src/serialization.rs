/// Serialization format options for sparse grid data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SerializationFormat {
    /// Bincode format - compact binary
    Bincode,
    /// Bincode format with LZ4 compression
    #[default]
    BincodeLz4,
}

impl SerializationFormat {
    /// Returns true if this format uses LZ4 compression
    pub fn is_compressed(&self) -> bool {
        matches!(self, SerializationFormat::BincodeLz4)
    }
}

use crate::errors::SGError;
use serde::{de::DeserializeOwned, Serialize};

/// Serialize data to bytes using the specified format.
/// Applies LZ4 compression if the format variant ends with Lz4.
pub fn serialize<T: Serialize>(data: &T, format: SerializationFormat) -> Result<Vec<u8>, SGError> {
    let bytes = bincode::serde::encode_to_vec(data, bincode::config::standard())
        .map_err(|_| SGError::SerializationFailed)?;
    if format.is_compressed() {
        Ok(lz4_flex::compress_prepend_size(&bytes))
    } else {
        Ok(bytes)
    }
}

/// Deserialize data from bytes using the specified format.
/// Applies LZ4 decompression if the format variant ends with Lz4.
pub fn deserialize<T: DeserializeOwned>(data: &[u8], format: SerializationFormat) -> Result<T, SGError> {
    let decode = |bytes: &[u8]| -> Result<T, SGError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|_| SGError::DeserializationFailed)
    };
    if format.is_compressed() {
        let decompressed = lz4_flex::decompress_size_prepended(data)
            .map_err(|_| SGError::LZ4DecompressionFailed)?;
        decode(&decompressed)
    } else {
        decode(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct TestData {
        values: Vec<f64>,
        name: String,
    }

    #[test]
    fn test_bincode_lz4_roundtrip() {
        let data = TestData {
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            name: "compressed_test".to_string(),
        };

        let bytes = serialize(&data, SerializationFormat::BincodeLz4).unwrap();
        let result: TestData = deserialize(&bytes, SerializationFormat::BincodeLz4).unwrap();
        assert_eq!(data, result);
    }

    #[test]
    fn test_corrupt_buffer() {
        let result: Result<TestData, SGError> = deserialize(&[1, 2, 3], SerializationFormat::BincodeLz4);
        assert_eq!(result, Err(SGError::LZ4DecompressionFailed));
        let result: Result<TestData, SGError> = deserialize(&[255], SerializationFormat::Bincode);
        assert_eq!(result, Err(SGError::DeserializationFailed));
    }
}
