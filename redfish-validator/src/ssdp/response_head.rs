use crate::error::Error;
use hyper::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::BufRead;

const MAX_HEADERS: usize = 64;

lazy_static! {
    static ref STATUS_LINE_REGEX: Regex = Regex::new(
        r"^HTTP/(?P<version>[0-9]\.[0-9]) (?P<status_code>[0-9]{3})(?: (?P<reason>.*))?$"
    )
    .unwrap();
    static ref HEADER_REGEX: Regex = Regex::new(
        r"^(?P<header_key>[!#$%&'*+\-.^_`|~0-9A-Za-z]+):[ \t]*(?P<header_value>.*?)[ \t]*$"
    )
    .unwrap();
}

#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub version: String,
    pub status_code: u16,
    pub reason: String,
    pub headers: HeaderMap,
}

impl ResponseHead {
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, Error> {
        let status_line =
            Self::read_line(reader)?.ok_or_else(|| Error::InvalidStatusLine(String::new()))?;
        let captures = STATUS_LINE_REGEX
            .captures(&status_line)
            .ok_or_else(|| Error::InvalidStatusLine(status_line.clone()))?;

        let version = String::from(&captures["version"]);
        let status_code = captures["status_code"]
            .parse()
            .map_err(|_| Error::InvalidStatusLine(status_line.clone()))?;
        let reason = captures
            .name("reason")
            .map(|reason| String::from(reason.as_str().trim()))
            .unwrap_or_default();

        let mut headers = HeaderMap::new();
        while let Some(line) = Self::read_line(reader)? {
            if line.is_empty() {
                break;
            }
            if headers.len() >= MAX_HEADERS {
                return Err(Error::TooManyHeaders);
            }

            let captures = HEADER_REGEX
                .captures(&line)
                .ok_or_else(|| Error::InvalidHeaderLine(line.clone()))?;
            let header_name = HeaderName::from_bytes(captures["header_key"].as_bytes())?;
            let header_value = HeaderValue::from_str(&captures["header_value"])?;
            headers.append(header_name, header_value);
        }

        Ok(Self {
            version,
            status_code,
            reason,
            headers,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, Error> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(String::from(line.trim_end_matches(&['\r', '\n'][..]))))
    }
}
