use std::cell::RefCell;
use std::rc::Rc;

use libfiap::network::error::Error as NetError;
use libfiap::network::{Close, Connect, Connection, Read, Status, Write};
use libfiap::time::FixedOffset;
use libfiap::upload::client::{Client, DataPoint, Target};
use libfiap::upload::error::Error;
use libfiap::upload::wire;

/// Shared state behind a mock connection, kept alive after `close` consumes
/// the connection so tests can inspect what was written.
#[derive(Debug, Default)]
struct MockState {
    written: Vec<u8>,
    response: Vec<u8>,
    read_pos: usize,
    /// `available()` reports false this many times before data shows up
    idle_polls_before_data: u32,
    polls_seen: u32,
    server_connected: bool,
    /// Simulate the server dropping the connection once `response` is spent
    drop_after_response: bool,
    closed: bool,
}

#[derive(Debug)]
struct MockConnection {
    state: Rc<RefCell<MockState>>,
}

impl Read for MockConnection {
    type Error = NetError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut s = self.state.borrow_mut();
        if s.read_pos >= s.response.len() {
            return Ok(0);
        }
        let len = buf.len().min(s.response.len() - s.read_pos);
        buf[..len].copy_from_slice(&s.response[s.read_pos..s.read_pos + len]);
        s.read_pos += len;
        Ok(len)
    }
}

impl Write for MockConnection {
    type Error = NetError;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.state.borrow_mut().written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Status for MockConnection {
    fn available(&mut self) -> bool {
        let mut s = self.state.borrow_mut();
        if s.polls_seen < s.idle_polls_before_data {
            s.polls_seen += 1;
            return false;
        }
        s.read_pos < s.response.len()
    }

    fn connected(&mut self) -> bool {
        let s = self.state.borrow();
        if s.drop_after_response && s.read_pos >= s.response.len() {
            return false;
        }
        s.server_connected
    }
}

impl Close for MockConnection {
    type Error = NetError;

    fn close(self) -> Result<(), Self::Error> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}

impl Connection for MockConnection {}

struct MockNetwork {
    state: Rc<RefCell<MockState>>,
    refuse: bool,
}

impl Connect for MockNetwork {
    type Connection = MockConnection;
    type Error = NetError;

    fn connect(&mut self, _host: &str, _port: u16) -> Result<Self::Connection, Self::Error> {
        if self.refuse {
            return Err(NetError::ConnectionRefused);
        }
        Ok(MockConnection {
            state: self.state.clone(),
        })
    }
}

const TARGET: Target<'static> = Target {
    host: "fiap.example.org",
    path: "/axis2/services/FIAPStorage",
    port: 80,
    id_prefix: "http://example.org/house/",
};

fn state_with_response(response: &[u8]) -> Rc<RefCell<MockState>> {
    Rc::new(RefCell::new(MockState {
        response: response.to_vec(),
        server_connected: true,
        ..MockState::default()
    }))
}

fn client_for(state: &Rc<RefCell<MockState>>) -> Client<'static, MockNetwork, FixedOffset> {
    let network = MockNetwork {
        state: state.clone(),
        refuse: false,
    };
    Client::new(network, TARGET, FixedOffset::new(9, 0))
}

/// Splits a captured request at the header/body boundary.
fn split_request(raw: &[u8]) -> (String, Vec<u8>) {
    let pos = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("request has no header terminator");
    (
        String::from_utf8(raw[..pos + 4].to_vec()).unwrap(),
        raw[pos + 4..].to_vec(),
    )
}

#[test]
fn post_succeeds_on_200() {
    let state = state_with_response(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    let mut client = client_for(&state);
    let points = [DataPoint {
        suffix: "temperature",
        value: "23.5",
        time: 1_314_322_080,
    }];

    assert_eq!(client.post(&points), Ok(()));

    let s = state.borrow();
    assert!(s.closed, "connection must be released");
    // The response is drained to the end after classification
    assert_eq!(s.read_pos, s.response.len());
}

#[test]
fn post_fails_on_404() {
    let state = state_with_response(b"HTTP/1.1 404 Not Found\r\n\r\n");
    let mut client = client_for(&state);
    let points = [DataPoint {
        suffix: "temperature",
        value: "23.5",
        time: 1_314_322_080,
    }];

    assert_eq!(client.post(&points), Err(Error::HttpError));
    assert!(state.borrow().closed);
}

#[test]
fn content_length_matches_streamed_body() {
    let state = state_with_response(b"HTTP/1.1 200 OK\r\n\r\n");
    let mut client = client_for(&state);
    let points = [
        DataPoint {
            suffix: "temperature",
            value: "23.5",
            time: 1_314_322_080,
        },
        DataPoint {
            suffix: "humidity",
            value: "61",
            time: 1_314_322_080,
        },
    ];

    assert_eq!(client.post(&points), Ok(()));

    let s = state.borrow();
    let (header, body) = split_request(&s.written);
    assert_eq!(
        body.len(),
        wire::body_length(TARGET.id_prefix, "+09:00", &points),
    );
    assert!(header.contains(&format!("Content-Length: {}\r\n", body.len())));
}

#[test]
fn golden_request_for_single_point() {
    let state = state_with_response(b"HTTP/1.1 200 OK\r\n\r\n");
    let mut client = client_for(&state);
    let points = [DataPoint {
        suffix: "temperature",
        value: "23.5",
        time: 1_314_322_080,
    }];

    assert_eq!(client.post(&points), Ok(()));

    let expected_body = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">",
        "<soapenv:Body>",
        "<ns2:dataRQ xmlns:ns2=\"http://soap.fiap.org/\">",
        "<transport xmlns=\"http://gutp.jp/fiap/2009/11/\">",
        "<body>",
        "<point id=\"http://example.org/house/temperature\">",
        "<value time=\"2011-08-26T10:28:00+09:00\">23.5</value>",
        "</point>",
        "</body></transport></ns2:dataRQ></soapenv:Body></soapenv:Envelope>",
    );
    let expected_header = format!(
        "POST /axis2/services/FIAPStorage HTTP/1.1\r\n\
         Content-Type: text/xml charset=UTF-8\r\n\
         User-Agent: libfiap (IEEE1888 upload client)\r\n\
         Host: fiap.example.org\r\n\
         SOAPAction: \"http://soap.fiap.org/data\"\r\n\
         Content-Length: {}\r\n\r\n",
        expected_body.len(),
    );

    let s = state.borrow();
    let (header, body) = split_request(&s.written);
    assert_eq!(header, expected_header);
    assert_eq!(String::from_utf8(body).unwrap(), expected_body);
}

#[test]
fn empty_batch_still_sends_envelope() {
    let state = state_with_response(b"HTTP/1.1 200 OK\r\n\r\n");
    let mut client = client_for(&state);

    assert_eq!(client.post(&[]), Ok(()));

    let s = state.borrow();
    let (header, body) = split_request(&s.written);
    assert_eq!(body.len(), wire::BODY_BASE_LEN);
    assert!(header.contains(&format!("Content-Length: {}\r\n", wire::BODY_BASE_LEN)));
    assert!(body.starts_with(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(body.ends_with(b"<body></body></transport></ns2:dataRQ></soapenv:Body></soapenv:Envelope>"));
}

#[test]
fn refused_connection_writes_nothing() {
    let state = Rc::new(RefCell::new(MockState::default()));
    let network = MockNetwork {
        state: state.clone(),
        refuse: true,
    };
    let mut client = Client::new(network, TARGET, FixedOffset::new(9, 0));
    let points = [DataPoint {
        suffix: "temperature",
        value: "23.5",
        time: 1_314_322_080,
    }];

    assert_eq!(client.post(&points), Err(Error::ConnectionFailed));
    assert!(state.borrow().written.is_empty());
}

#[test]
fn silent_server_times_out_at_budget() {
    let state = state_with_response(b"");
    state.borrow_mut().idle_polls_before_data = u32::MAX;
    let mut client = client_for(&state);
    client.set_response_budget(5);

    assert_eq!(client.post(&[]), Err(Error::ResponseTimeout));
    assert!(state.borrow().closed, "timeout must still release the connection");
}

#[test]
fn budget_boundary_is_exact() {
    // The status line shows up after 3 empty polls. A budget of 3 gives up
    // just before it, a budget of 4 sees it through.
    let late = |budget| {
        let state = state_with_response(b"HTTP/1.1 200 OK\r\n\r\n");
        state.borrow_mut().idle_polls_before_data = 3;
        let mut client = client_for(&state);
        client.set_response_budget(budget);
        client.post(&[])
    };

    assert_eq!(late(3), Err(Error::ResponseTimeout));
    assert_eq!(late(4), Ok(()));
}

#[test]
fn oversized_status_code_is_http_error() {
    let state = state_with_response(b"HTTP/1.1 99999 Bogus\r\n\r\n");
    let mut client = client_for(&state);

    assert_eq!(client.post(&[]), Err(Error::HttpError));
    assert!(state.borrow().closed);
}

#[test]
fn disconnect_mid_status_line_is_http_error() {
    let state = state_with_response(b"HTTP/1.1 2");
    state.borrow_mut().drop_after_response = true;
    let mut client = client_for(&state);
    let points = [DataPoint {
        suffix: "temperature",
        value: "23.5",
        time: 1_314_322_080,
    }];

    assert_eq!(client.post(&points), Err(Error::HttpError));
    assert!(state.borrow().closed);
}

#[test]
fn disconnect_before_any_response_is_http_error() {
    let state = state_with_response(b"");
    state.borrow_mut().server_connected = false;
    let mut client = client_for(&state);

    assert_eq!(client.post(&[]), Err(Error::HttpError));
    assert!(state.borrow().closed);
}
