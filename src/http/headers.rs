//! Ordered, case-insensitive header table.
//!
//! Names are folded to lower case on every access, so `Host`, `HOST` and
//! `host` all address the same entry. Setting a name that is already present
//! appends to the stored value (`"a, b"`), which is how HTTP folds repeated
//! fields; [`Headers::replace`] overwrites instead.

use indexmap::IndexMap;
use memchr::memmem;

use crate::http::error::ParseError;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns `(consumed, done)`:
    /// - `(2, true)` when `data` starts with the blank line ending the section,
    /// - `(0, false)` when no full line is buffered yet,
    /// - `(n, false)` after storing one field, `n` including its CRLF.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        if data.starts_with(CRLF) {
            return Ok((2, true));
        }

        let Some(line_end) = memmem::find(data, CRLF) else {
            return Ok((0, false));
        };

        let line = &data[..line_end];
        let malformed = || ParseError::MalformedHeader(String::from_utf8_lossy(line).into_owned());

        let colon = match memchr::memchr(b':', line) {
            Some(0) | None => return Err(malformed()),
            Some(i) if line[i - 1].is_ascii_whitespace() => return Err(malformed()),
            Some(i) => i,
        };

        let key = line[..colon].trim_ascii();
        let value = line[colon + 1..].trim_ascii();

        if let Some(bad) = key.iter().find(|b| !is_token_byte(**b)) {
            let name = String::from_utf8_lossy(key).into_owned();
            tracing::debug!(name = %name, byte = *bad, "Rejecting header name");
            return Err(ParseError::InvalidHeaderName(name));
        }
        if key.is_empty() {
            return Err(ParseError::EmptyHeaderName);
        }

        self.set(&decode_field(key), &decode_field(value));
        Ok((line_end + CRLF.len(), false))
    }

    /// Inserts a field, appending to an existing value with `", "`.
    pub fn set(&mut self, key: &str, value: &str) {
        let key = key.to_ascii_lowercase();
        match self.entries.get_mut(&key) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                self.entries.insert(key, value.to_string());
            }
        }
    }

    /// Overwrites a field regardless of what was stored before.
    pub fn replace(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_ascii_lowercase(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(&key.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.set(k.as_ref(), v.as_ref());
        }
        headers
    }
}

/// RFC 9110 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
}

/// Field bytes as text. Values that are not UTF-8 are read as ISO-8859-1,
/// which maps every obs-text byte (0x80-0xFF) to a char without loss.
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
