use hyper::http;
use std::{fmt::Display, io};

#[derive(Debug)]
pub enum Error {
    InvalidProtocol(String),
    InvalidInterface(String),
    IoError(io::Error),
    InvalidStatusLine(String),
    InvalidHeaderLine(String),
    TooManyHeaders,
    InvalidHeaderName,
    InvalidHeaderValue,
    InvalidBody(String),
    JsonError(serde_json::Error),
    XmlError(quick_xml::Error),
    HyperError(hyper::Error),
    HttpError(http::Error),
    InvalidVersion(String),
    NotConfigured,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidProtocol(protocol) => write!(
                f,
                "Invalid discovery protocol \"{}\", expected ipv4 or ipv6",
                protocol
            ),
            Error::InvalidInterface(iface) => {
                write!(f, "Invalid interface address \"{}\"", iface)
            }
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::InvalidStatusLine(line) => {
                write!(f, "Invalid status line: \"{}\"", line.escape_default())
            }
            Error::InvalidHeaderLine(line) => {
                write!(f, "Invalid header line: \"{}\"", line.escape_default())
            }
            Error::TooManyHeaders => write!(f, "Too many headers in the response"),
            Error::InvalidHeaderName => write!(f, "Invalid header name"),
            Error::InvalidHeaderValue => write!(f, "Invalid header value"),
            Error::InvalidBody(reason) => write!(f, "Invalid body: {}", reason),
            Error::JsonError(e) => write!(f, "Json error: {}", e),
            Error::XmlError(e) => write!(f, "Xml error: {}", e),
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
            Error::HttpError(e) => write!(f, "Http Error: {}", e),
            Error::InvalidVersion(version) => {
                write!(f, "Invalid protocol version \"{}\"", version)
            }
            Error::NotConfigured => write!(f, "The validator hasn't been configured"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonError(e)
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::XmlError(e)
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::HttpError(e)
    }
}
