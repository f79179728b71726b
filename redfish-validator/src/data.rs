use crate::error::Error;
use hyper::{body::Bytes, header::CONTENT_TYPE, HeaderMap, Method};
use log::debug;
use once_cell::sync::OnceCell;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestVariant {
    Normal,
    NoAuth,
    BasicAuth,
    BadAuth,
    BadEtag,
    PatchBadProperty,
    PatchOdataProperties,
    PatchCollection,
    PatchReadOnlyResource,
    ModifyOther,
    PasswordChangeRequired,
    Streaming,
    Yaml,
    UnsupportedRequest,
}

impl Default for RequestVariant {
    fn default() -> Self {
        RequestVariant::Normal
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    ServiceRoot,
    ManagerAccount,
    Role,
    Session,
    EventDestination,
    Collection,
    Other,
}

#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestData {
    pub fn new<S: Into<String>>(method: Method, uri: S) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructuredBody {
    Json(Value),
    Xml(XmlElement),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    fn from_start(start: &BytesStart) -> Result<Self, Error> {
        let mut attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            attributes.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                attribute.unescape_value()?.into_owned(),
            ));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn parse(raw: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(raw);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => open.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| Error::InvalidBody("unbalanced end tag".into()))?;
                    Self::attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = open.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => (),
            }
            buf.clear();
        }

        if !open.is_empty() {
            return Err(Error::InvalidBody("unclosed xml element".into()));
        }

        root.ok_or_else(|| Error::InvalidBody("no xml root element".into()))
    }

    fn attach(
        open: &mut Vec<XmlElement>,
        root: &mut Option<XmlElement>,
        element: XmlElement,
    ) -> Result<(), Error> {
        match open.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(Error::InvalidBody("more than one xml root element".into())),
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Body {
    raw: Bytes,
    content_type: Option<String>,
    structured: OnceCell<Option<StructuredBody>>,
}

impl Body {
    pub fn new<B: Into<Bytes>>(raw: B, content_type: Option<&str>) -> Self {
        Self {
            raw: raw.into(),
            content_type: content_type.map(str::to_ascii_lowercase),
            structured: OnceCell::new(),
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn structured(&self) -> Option<&StructuredBody> {
        self.structured
            .get_or_init(|| match Self::parse(&self.raw, self.content_type()) {
                Ok(structured) => structured,
                Err(e) => {
                    debug!("Couldn't parse the response body: {}", e);
                    None
                }
            })
            .as_ref()
    }

    fn parse(raw: &[u8], content_type: Option<&str>) -> Result<Option<StructuredBody>, Error> {
        let content_type = match content_type {
            Some(content_type) => content_type,
            None => return Ok(None),
        };

        if raw.is_empty() {
            Ok(None)
        } else if content_type.contains("json") {
            Ok(Some(StructuredBody::Json(serde_json::from_slice(raw)?)))
        } else if content_type.contains("xml") {
            Ok(Some(StructuredBody::Xml(XmlElement::parse(raw)?)))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Interaction {
    method: Method,
    uri: String,
    variant: RequestVariant,
    status_code: u16,
    request_headers: HeaderMap,
    response_headers: HeaderMap,
    body: Body,
    resource_type: Option<ResourceType>,
}

impl Interaction {
    pub fn new<S: Into<String>>(
        method: Method,
        uri: S,
        variant: RequestVariant,
        status_code: u16,
    ) -> Self {
        Self {
            method,
            uri: uri.into(),
            variant,
            status_code,
            request_headers: HeaderMap::new(),
            response_headers: HeaderMap::new(),
            body: Body::default(),
            resource_type: None,
        }
    }

    pub fn from_exchange(
        request: RequestData,
        response: ResponseData,
        variant: RequestVariant,
        resource_type: Option<ResourceType>,
    ) -> Self {
        let content_type = Self::header_value(&response.headers, CONTENT_TYPE.as_str());
        let body = Body::new(response.body, content_type);

        Self {
            method: request.method,
            uri: request.uri,
            variant,
            status_code: response.status_code,
            request_headers: request.headers,
            response_headers: response.headers,
            body,
            resource_type,
        }
    }

    pub fn with_request_headers(mut self, headers: HeaderMap) -> Self {
        self.request_headers = headers;
        self
    }

    pub fn with_response_headers(mut self, headers: HeaderMap) -> Self {
        self.response_headers = headers;
        self.body = Body::new(self.body.raw.clone(), self.content_type());
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = Body::new(body, self.content_type());
        self
    }

    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn variant(&self) -> RequestVariant {
        self.variant
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_header(&self, name: &str) -> Option<&str> {
        Self::header_value(&self.response_headers, name)
    }

    fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
        headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type
    }

    pub fn content_type(&self) -> Option<&str> {
        Self::header_value(&self.response_headers, CONTENT_TYPE.as_str())
    }

    pub fn structured_body(&self) -> Option<&StructuredBody> {
        self.body.structured()
    }

    pub fn json(&self) -> Option<&Value> {
        match self.structured_body() {
            Some(StructuredBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    pub fn xml(&self) -> Option<&XmlElement> {
        match self.structured_body() {
            Some(StructuredBody::Xml(element)) => Some(element),
            _ => None,
        }
    }
}
