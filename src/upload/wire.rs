//! Wire-level building blocks for the `dataRQ` request
//!
//! The literal fragments of the HTTP header and SOAP envelope live here,
//! together with the two halves of the core invariant: [`body_length`]
//! predicts exactly the number of bytes [`write_body`] emits. Any mismatch
//! makes the `Content-Length` header wrong, which the server rejects or
//! stalls on.

use core::fmt;

use super::client::DataPoint;
use crate::time::{self, Calendar, TIMESTAMP_BASE_LEN};

/// The literal fragments of a `dataRQ` request, in the order they are sent.
///
/// The original firmware kept these in AVR program memory; here they are
/// ordinary immutable statics behind an enum so the send path and the length
/// constants index the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// `POST ` — start of the request line
    RequestPrefix,
    /// ` HTTP/1.1` and the line terminator
    RequestSuffix,
    /// The `Content-Type` header line
    ContentType,
    /// The `User-Agent` header line
    UserAgent,
    /// `Host: ` — the host value follows
    HostPrefix,
    /// The `SOAPAction` header line
    SoapAction,
    /// `Content-Length: ` — the computed length follows
    ContentLengthPrefix,
    /// Terminates the last header line and the header block
    HeaderEnd,
    /// Line terminator after an interpolated header value
    Crlf,
    /// The XML declaration
    XmlProlog,
    /// Opens the SOAP envelope
    EnvelopeOpen,
    /// Opens the SOAP body
    SoapBodyOpen,
    /// Opens the `dataRQ` request element
    DataRqOpen,
    /// Opens the FIAP transport element
    TransportOpen,
    /// Opens the point list
    BodyOpen,
    /// `<point id="` — the point identifier follows
    PointOpen,
    /// `">` — closes an attribute and its opening tag
    AttrEnd,
    /// `<value time="` — the timestamp follows
    ValueOpen,
    /// Closes a value element
    ValueClose,
    /// Closes a point element
    PointClose,
    /// Closes the point list
    BodyClose,
    /// Closes the FIAP transport element
    TransportClose,
    /// Closes the `dataRQ` request element
    DataRqClose,
    /// Closes the SOAP body
    SoapBodyClose,
    /// Closes the SOAP envelope; the request body ends here, no trailing
    /// newline
    EnvelopeClose,
}

impl Fragment {
    /// The literal text of this fragment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Fragment::RequestPrefix => "POST ",
            Fragment::RequestSuffix => " HTTP/1.1\r\n",
            Fragment::ContentType => "Content-Type: text/xml charset=UTF-8\r\n",
            Fragment::UserAgent => "User-Agent: libfiap (IEEE1888 upload client)\r\n",
            Fragment::HostPrefix => "Host: ",
            Fragment::SoapAction => "SOAPAction: \"http://soap.fiap.org/data\"\r\n",
            Fragment::ContentLengthPrefix => "Content-Length: ",
            Fragment::HeaderEnd => "\r\n\r\n",
            Fragment::Crlf => "\r\n",
            Fragment::XmlProlog => "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
            Fragment::EnvelopeOpen => {
                "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">"
            }
            Fragment::SoapBodyOpen => "<soapenv:Body>",
            Fragment::DataRqOpen => "<ns2:dataRQ xmlns:ns2=\"http://soap.fiap.org/\">",
            Fragment::TransportOpen => "<transport xmlns=\"http://gutp.jp/fiap/2009/11/\">",
            Fragment::BodyOpen => "<body>",
            Fragment::PointOpen => "<point id=\"",
            Fragment::AttrEnd => "\">",
            Fragment::ValueOpen => "<value time=\"",
            Fragment::ValueClose => "</value>",
            Fragment::PointClose => "</point>",
            Fragment::BodyClose => "</body>",
            Fragment::TransportClose => "</transport>",
            Fragment::DataRqClose => "</ns2:dataRQ>",
            Fragment::SoapBodyClose => "</soapenv:Body>",
            Fragment::EnvelopeClose => "</soapenv:Envelope>",
        }
    }

    const fn len(self) -> usize {
        self.as_str().len()
    }
}

/// Envelope bytes emitted exactly once per request, independent of the point
/// count.
pub const BODY_BASE_LEN: usize = Fragment::XmlProlog.len()
    + Fragment::EnvelopeOpen.len()
    + Fragment::SoapBodyOpen.len()
    + Fragment::DataRqOpen.len()
    + Fragment::TransportOpen.len()
    + Fragment::BodyOpen.len()
    + Fragment::BodyClose.len()
    + Fragment::TransportClose.len()
    + Fragment::DataRqClose.len()
    + Fragment::SoapBodyClose.len()
    + Fragment::EnvelopeClose.len();

/// Markup and fixed-width timestamp bytes emitted once per point.
pub const POINT_BASE_LEN: usize = Fragment::PointOpen.len()
    + Fragment::AttrEnd.len()
    + Fragment::ValueOpen.len()
    + Fragment::AttrEnd.len()
    + Fragment::ValueClose.len()
    + Fragment::PointClose.len()
    + TIMESTAMP_BASE_LEN;

/// Computes the exact byte length of the XML body before it is serialized.
///
/// HTTP wants `Content-Length` ahead of the body, and the body is streamed
/// rather than buffered, so the size has to be known in advance. The result
/// is exactly what [`write_body`] emits for the same inputs. Pure; no I/O,
/// no failure modes.
pub fn body_length(id_prefix: &str, utc_offset: &str, points: &[DataPoint<'_>]) -> usize {
    let mut len = BODY_BASE_LEN;
    for point in points {
        len += POINT_BASE_LEN
            + id_prefix.len()
            + point.suffix.len()
            + point.value.len()
            + utc_offset.len();
    }
    len
}

/// Serializes the XML body for `points`, in input order.
///
/// Identifiers and values are inserted verbatim; callers must not pass text
/// that needs XML escaping. Timestamps are each point's instant decomposed
/// through `calendar` and rendered fixed-width.
pub fn write_body<W: fmt::Write>(
    out: &mut W,
    id_prefix: &str,
    calendar: &impl Calendar,
    points: &[DataPoint<'_>],
) -> fmt::Result {
    out.write_str(Fragment::XmlProlog.as_str())?;
    out.write_str(Fragment::EnvelopeOpen.as_str())?;
    out.write_str(Fragment::SoapBodyOpen.as_str())?;
    out.write_str(Fragment::DataRqOpen.as_str())?;
    out.write_str(Fragment::TransportOpen.as_str())?;
    out.write_str(Fragment::BodyOpen.as_str())?;
    for point in points {
        out.write_str(Fragment::PointOpen.as_str())?;
        out.write_str(id_prefix)?;
        out.write_str(point.suffix)?;
        out.write_str(Fragment::AttrEnd.as_str())?;
        out.write_str(Fragment::ValueOpen.as_str())?;
        let local = calendar.local_time(point.time);
        time::write_timestamp(out, &local, calendar.utc_offset())?;
        out.write_str(Fragment::AttrEnd.as_str())?;
        out.write_str(point.value)?;
        out.write_str(Fragment::ValueClose.as_str())?;
        out.write_str(Fragment::PointClose.as_str())?;
    }
    out.write_str(Fragment::BodyClose.as_str())?;
    out.write_str(Fragment::TransportClose.as_str())?;
    out.write_str(Fragment::DataRqClose.as_str())?;
    out.write_str(Fragment::SoapBodyClose.as_str())?;
    out.write_str(Fragment::EnvelopeClose.as_str())
}
