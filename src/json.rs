//! JSON rendering through stream insertion.
//!
//! [`Json`] wraps any `serde::Serialize` value so it can be printed as an
//! argument; serialization writes straight into the capture stream.

use std::io;

use serde::Serialize;

use crate::probe::StreamInsert;

/// Serialize the wrapped value as JSON when inserted into a stream.
///
/// # Example
///
/// ```
/// use streamfmt::{Json, MemoryBuffer, format_value};
///
/// let mut buffer = MemoryBuffer::new();
/// format_value(&mut buffer, &Json::new(vec!["a", "b"])).unwrap();
/// assert_eq!(buffer.as_str(), Some(r#"["a","b"]"#));
/// ```
#[derive(Debug, Clone)]
pub struct Json<T> {
    value: T,
    pretty: bool,
}

impl<T> Json<T> {
    /// Compact single-line JSON.
    pub fn new(value: T) -> Self {
        Self {
            value,
            pretty: false,
        }
    }

    /// Indented multi-line JSON.
    pub fn pretty(value: T) -> Self {
        Self {
            value,
            pretty: true,
        }
    }

    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> StreamInsert for Json<T> {
    fn insert(&self, stream: &mut dyn io::Write) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(stream, &self.value)?;
        } else {
            serde_json::to_writer(stream, &self.value)?;
        }
        Ok(())
    }
}
