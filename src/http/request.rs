use std::fmt;

use memchr::memmem;

use crate::http::error::ParseError;
use crate::http::headers::Headers;

const CRLF: &[u8] = b"\r\n";
const VERSION_PREFIX: &str = "HTTP/";

/// Where the parser is inside a request. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParserState::Initialized => "reading the request line",
            ParserState::ParsingHeaders => "reading headers",
            ParserState::ParsingBody => "reading the body",
            ParserState::Done => "done",
        };
        f.write_str(s)
    }
}

/// `<METHOD> <TARGET> HTTP/<VERSION>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Method token as sent, e.g. `GET`
    pub method: String,
    /// Request target, e.g. `/coffee?size=large`
    pub target: String,
    /// Version without the `HTTP/` prefix, e.g. `1.1`
    pub version: String,
}

/// A request being assembled by the parser.
///
/// Starts in [`ParserState::Initialized`] and is fed bytes through
/// [`Request::parse`] until [`Request::is_done`] returns true. See
/// [`request_from_reader`](crate::http::parser::request_from_reader) for the
/// loop that drives it from a live connection.
#[derive(Debug, Clone)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    state: ParserState,
    body_length_read: usize,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            request_line: RequestLine::default(),
            headers: Headers::new(),
            body: Vec::new(),
            state: ParserState::Initialized,
            body_length_read: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn body_length_read(&self) -> usize {
        self.body_length_read
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared body length, if the request carries one.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.header("Content-Length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(v.to_string()))
            })
            .transpose()
    }

    /// Consumes as many complete units from `data` as possible.
    ///
    /// Returns the number of bytes consumed. Zero means more input is needed
    /// (unless the request just became done with nothing left to read).
    /// Calling this on a request that is already done is an error.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::ParseAfterDone);
        }

        let mut total = 0;

        while self.state != ParserState::Done {
            let n = self.parse_single(&data[total..])?;
            total += n;
            if n == 0 {
                break;
            }
        }

        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => {
                let Some((line, consumed)) = parse_request_line(data)? else {
                    return Ok(0);
                };
                self.request_line = line;
                self.transition(ParserState::ParsingHeaders);
                Ok(consumed)
            }

            ParserState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse(data)?;
                if done {
                    self.transition(ParserState::ParsingBody);
                }
                Ok(consumed)
            }

            ParserState::ParsingBody => {
                let Some(declared) = self.content_length()? else {
                    self.body.extend_from_slice(data);
                    self.body_length_read += data.len();
                    self.transition(ParserState::Done);
                    return Ok(data.len());
                };

                let read = self.body_length_read + data.len();
                if read > declared {
                    return Err(ParseError::BodyOverflow { declared, read });
                }

                self.body.extend_from_slice(data);
                self.body_length_read = read;

                if read == declared {
                    self.transition(ParserState::Done);
                }
                Ok(data.len())
            }

            ParserState::Done => Err(ParseError::ParseAfterDone),
        }
    }

    fn transition(&mut self, next: ParserState) {
        debug_assert!(next > self.state);
        tracing::debug!(from = ?self.state, to = ?next, "Request parser state change");
        self.state = next;
    }
}

/// Returns `None` until a full line (including CRLF) is buffered.
fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = memmem::find(data, CRLF) else {
        return Ok(None);
    };

    let raw = &data[..line_end];
    let malformed = || ParseError::MalformedRequestLine(String::from_utf8_lossy(raw).into_owned());

    let line = std::str::from_utf8(raw).map_err(|_| malformed())?;
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts.as_slice() else {
        return Err(malformed());
    };

    let version = version.strip_prefix(VERSION_PREFIX).ok_or_else(malformed)?;

    let request_line = RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    };
    Ok(Some((request_line, line_end + CRLF.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_waits_for_crlf() {
        let mut req = Request::new();
        assert_eq!(req.parse(b"GET / HTTP/1.1\r").unwrap(), 0);
        assert_eq!(req.state(), ParserState::Initialized);
    }

    #[test]
    fn body_arriving_with_headers_completes_in_one_pass() {
        let mut req = Request::new();
        let data = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";

        let n = req.parse(data).unwrap();

        assert_eq!(n, data.len());
        assert!(req.is_done());
        assert_eq!(req.body, b"hello");
    }

    #[test]
    fn zero_content_length_finishes_without_body_bytes() {
        let mut req = Request::new();
        req.parse(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();
        assert!(req.is_done());
        assert!(req.body.is_empty());
    }

    #[test]
    fn parse_after_done_is_rejected() {
        let mut req = Request::new();
        req.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(req.is_done());
        assert!(matches!(req.parse(b"x"), Err(ParseError::ParseAfterDone)));
        assert!(matches!(req.parse(b""), Err(ParseError::ParseAfterDone)));
    }

    #[test]
    fn version_without_http_prefix_is_malformed() {
        let mut req = Request::new();
        let err = req.parse(b"GET / 1.1\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(_)));
    }

    #[test]
    fn too_many_request_line_fields_is_malformed() {
        let mut req = Request::new();
        let err = req.parse(b"GET / extra HTTP/1.1\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(_)));
    }
}
