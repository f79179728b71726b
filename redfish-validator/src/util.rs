use crate::{error::Error, Interaction};
use hyper::{
    header::{HeaderName, HeaderValue, ETAG, IF_MATCH},
    HeaderMap,
};
use serde_json::Value;
use std::{
    collections::HashSet,
    convert::TryFrom,
    fmt::Display,
    str::FromStr,
};

pub fn put_headers<K, V, I>(header_map: &mut HeaderMap<HeaderValue>, headers: I) -> Result<(), Error>
where
    K: AsRef<str>,
    V: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.as_ref().to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value.as_ref())?;
        header_map.insert(header_name, header_value);
    }

    Ok(())
}

pub fn response_etag(interaction: &Interaction) -> Option<&str> {
    interaction.response_header(ETAG.as_str()).or_else(|| {
        interaction
            .json()
            .and_then(|body| body.get("@odata.etag"))
            .and_then(Value::as_str)
    })
}

pub fn if_match_header(interaction: &Interaction) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if !interaction.is_success() {
        return headers;
    }

    if let Some(value) = interaction
        .response_header(ETAG.as_str())
        .and_then(|etag| HeaderValue::from_str(etag).ok())
    {
        headers.insert(IF_MATCH, value);
    }

    headers
}

pub fn extended_error(interaction: &Interaction) -> String {
    let error = match interaction.json().and_then(|body| body.get("error")) {
        Some(error) => error,
        None => return String::new(),
    };

    let first_info = error
        .get("@Message.ExtendedInfo")
        .and_then(Value::as_array)
        .and_then(|infos| infos.first());

    first_info
        .and_then(|info| info.get("Message").or_else(|| info.get("MessageId")))
        .or_else(|| error.get("message"))
        .or_else(|| error.get("code"))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}

pub fn extended_info_message_keys(body: &Value) -> HashSet<String> {
    let infos = body
        .get("error")
        .and_then(|error| error.get("@Message.ExtendedInfo"))
        .or_else(|| body.get("@Message.ExtendedInfo"))
        .and_then(Value::as_array);

    infos
        .into_iter()
        .flatten()
        .filter_map(|info| info.get("MessageId").and_then(Value::as_str))
        .filter_map(|message_id| message_id.rsplit('.').next())
        .map(String::from)
        .collect()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub errata: u32,
}

impl ProtocolVersion {
    pub fn new(major: u32, minor: u32, errata: u32) -> Self {
        Self {
            major,
            minor,
            errata,
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    fn from_str(version: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidVersion(String::from(version));

        let parts = version
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major] => Ok(Self::new(*major, 0, 0)),
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, errata] => Ok(Self::new(*major, *minor, *errata)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<&str> for ProtocolVersion {
    type Error = Error;

    fn try_from(version: &str) -> Result<Self, Self::Error> {
        version.parse()
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.errata)
    }
}

pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .map(|part| {
            let part = part.trim().to_lowercase();
            match part.split_once('=') {
                Some((key, value)) => format!("{}={}", key.trim(), value.trim().trim_matches('"')),
                None => part,
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

pub fn sanitize<T: Ord>(value: T, minimum: T, maximum: Option<T>) -> T {
    let value = value.max(minimum);
    match maximum {
        Some(maximum) => value.min(maximum),
        None => value,
    }
}
