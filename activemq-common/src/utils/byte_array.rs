// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Jolokia byte sequences
//!
//! Binary message content comes back as `{"offset": n, "length": m, "data": [...]}` where
//! `data` holds Java (signed) bytes. Only `data[offset..offset + length]` is meaningful.

use activemq_error::DecodeError;
use serde_json::json;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteArray {
    offset: usize,
    length: usize,
    data: Vec<u8>,
}

impl ByteArray {
    /// Decode and validate a byte sequence. Missing keys, wrong types, bytes outside the
    /// Java byte range and slices past the end of `data` are all rejected.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::invalid_byte_array(format!("data is not a byte array: {value}")))?;

        let index = |key: &str| -> Result<usize, DecodeError> {
            object
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| DecodeError::invalid_byte_array(format!("'{key}' must be a non-negative integer")))
        };
        let offset = index("offset")?;
        let length = index("length")?;

        let raw = object
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| DecodeError::invalid_byte_array("'data' must be an array"))?;

        let data = raw
            .iter()
            .map(|item| {
                item.as_i64()
                    .and_then(java_byte)
                    .ok_or_else(|| DecodeError::invalid_byte_array(format!("not a byte: {item}")))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let end = offset
            .checked_add(length)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                DecodeError::invalid_byte_array(format!(
                    "slice [{offset}, {offset}+{length}) exceeds {} bytes",
                    data.len()
                ))
            })?;
        debug_assert!(end <= data.len());

        Ok(Self { offset, length, data })
    }

    /// Encode text as a byte sequence starting at offset 0. Characters outside Latin-1
    /// cannot be represented one byte per character and are rejected.
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        let data = text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| DecodeError::invalid_byte_array(format!("'{c}' is not a single byte"))))
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self {
            offset: 0,
            length: data.len(),
            data,
        })
    }

    /// The meaningful slice `data[offset..offset + length]`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.length]
    }

    /// Map every byte of the slice to the character with the same code point.
    pub fn decode_text(&self) -> String {
        self.as_bytes().iter().map(|b| char::from(*b)).collect()
    }

    pub fn to_value(&self) -> Value {
        json!({
            "offset": self.offset,
            "length": self.length,
            "data": self.data,
        })
    }
}

fn java_byte(value: i64) -> Option<u8> {
    match value {
        -128..=-1 => Some((value + 256) as u8),
        0..=255 => Some(value as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOREM: &str = "Lorem ipsum dolor sit amet";

    fn padded(offset: usize, text: &str, trailing: usize) -> Value {
        let mut data = vec![0u8; offset];
        data.extend(text.bytes());
        data.extend(std::iter::repeat(0u8).take(trailing));
        json!({"offset": offset, "length": text.len(), "data": data})
    }

    #[test]
    fn decode_slice_with_offset() {
        let array = ByteArray::from_value(&padded(4, LOREM, 16)).unwrap();
        assert_eq!(array.decode_text(), LOREM);
        assert_eq!(array.as_bytes().len(), LOREM.len());
    }

    #[test]
    fn decode_slice_without_offset() {
        let array = ByteArray::from_value(&padded(0, LOREM, 100)).unwrap();
        assert_eq!(array.decode_text(), LOREM);
    }

    #[test]
    fn decode_signed_java_bytes() {
        let array = ByteArray::from_value(&json!({"offset": 0, "length": 2, "data": [-23, 65]})).unwrap();
        assert_eq!(array.as_bytes(), &[0xE9, 0x41]);
        assert_eq!(array.decode_text(), "\u{e9}A");
    }

    #[test]
    fn reencode_is_idempotent() {
        let decoded = ByteArray::from_value(&padded(3, LOREM, 5)).unwrap().decode_text();
        let reencoded = ByteArray::from_text(&decoded).unwrap();
        assert_eq!(reencoded.decode_text(), decoded);
        assert_eq!(ByteArray::from_value(&reencoded.to_value()).unwrap(), reencoded);
    }

    #[test]
    fn reject_malformed_input() {
        assert!(ByteArray::from_value(&json!({"data": "abcd"})).is_err());
        assert!(ByteArray::from_value(&json!({"offset": 0, "length": 1})).is_err());
        assert!(ByteArray::from_value(&json!({"offset": "0", "length": 1, "data": [1]})).is_err());
        assert!(ByteArray::from_value(&json!({"offset": 0, "length": 1, "data": [300]})).is_err());
        assert!(ByteArray::from_value(&json!({"offset": 2, "length": 4, "data": [1, 2, 3]})).is_err());
        assert!(ByteArray::from_value(&json!("not an object")).is_err());
    }

    #[test]
    fn reject_wide_characters() {
        assert!(ByteArray::from_text("snowman \u{2603}").is_err());
    }
}
