//! IEEE1888 (FIAP) data upload over HTTP
//!
//! This module implements the `dataRQ` write request: point/value/time
//! triples wrapped in a fixed SOAP envelope and POSTed to a FIAP storage
//! server. The defining constraint is RAM: the request is never assembled in
//! memory. [`wire::body_length`] computes the exact serialized size first so
//! the `Content-Length` header can go out ahead of the body, and the client
//! then streams header and body to the transport fragment by fragment.
//!
//! One blocking request/response cycle per [`client::Client::post`] call; no
//! retries, no connection reuse. The response is classified from the status
//! line alone.

/// Upload outcome codes.
pub mod error;

/// The upload client and its configuration types.
pub mod client;

/// Wire-level literals, the body length estimator, and the body serializer.
pub mod wire;
