use httpframe::http::error::ParseError;
use httpframe::http::request::{ParserState, Request};

fn parsed(data: &[u8]) -> Request {
    let mut req = Request::new();
    let n = req.parse(data).unwrap();
    assert_eq!(n, data.len());
    req
}

#[test]
fn test_new_request_is_initialized() {
    let req = Request::new();

    assert_eq!(req.state(), ParserState::Initialized);
    assert!(!req.is_done());
    assert!(req.headers.is_empty());
    assert_eq!(req.body_length_read(), 0);
}

#[test]
fn test_request_header_retrieval() {
    let req = parsed(b"GET / HTTP/1.1\r\nHost: example.com\r\nContent-Type: application/json\r\n\r\n");

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let req = parsed(b"POST /api HTTP/1.1\r\nContent-Length: 2\r\n\r\nok");

    assert_eq!(req.content_length().unwrap(), Some(2));
}

#[test]
fn test_request_content_length_missing() {
    let req = parsed(b"GET / HTTP/1.1\r\n\r\n");

    assert_eq!(req.content_length().unwrap(), None);
}

#[test]
fn test_states_advance_in_order() {
    let mut req = Request::new();

    req.parse(b"POST /api HTTP/1.1\r\n").unwrap();
    assert_eq!(req.state(), ParserState::ParsingHeaders);

    req.parse(b"Content-Length: 3\r\n").unwrap();
    assert_eq!(req.state(), ParserState::ParsingHeaders);

    req.parse(b"\r\n").unwrap();
    assert_eq!(req.state(), ParserState::ParsingBody);

    assert_eq!(req.parse(b"ab").unwrap(), 2);
    assert_eq!(req.state(), ParserState::ParsingBody);
    assert_eq!(req.body_length_read(), 2);

    assert_eq!(req.parse(b"c").unwrap(), 1);
    assert_eq!(req.state(), ParserState::Done);
    assert_eq!(req.body, b"abc");
}

#[test]
fn test_partial_header_consumes_nothing() {
    let mut req = Request::new();
    let n = req.parse(b"GET / HTTP/1.1\r\nHost: exa").unwrap();

    // Only the request line is complete.
    assert_eq!(n, 16);
    assert_eq!(req.state(), ParserState::ParsingHeaders);
    assert!(req.headers.is_empty());
}

#[test]
fn test_body_overflow_across_calls() {
    let mut req = Request::new();
    req.parse(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel").unwrap();

    let err = req.parse(b"lo!").unwrap_err();
    assert!(matches!(err, ParseError::BodyOverflow { declared: 5, read: 6 }));
}

#[test]
fn test_request_line_fields() {
    let req = parsed(b"DELETE /items/42?force=true HTTP/2.0\r\n\r\n");

    assert_eq!(req.request_line.method, "DELETE");
    assert_eq!(req.request_line.target, "/items/42?force=true");
    assert_eq!(req.request_line.version, "2.0");
}

#[test]
fn test_parse_after_done_is_rejected() {
    let mut req = parsed(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nok");

    let err = req.parse(b"more").unwrap_err();
    assert!(matches!(err, ParseError::ParseAfterDone));
    assert_eq!(req.body, b"ok");
    assert_eq!(req.state(), ParserState::Done);
}
