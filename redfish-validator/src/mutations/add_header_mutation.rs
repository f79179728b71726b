use super::HeadersMutation;
use crate::error::Error;
use hyper::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
};

#[derive(Debug)]
pub struct AddHeaderMutation {
    header_name: HeaderName,
    header_value: HeaderValue,
}

impl AddHeaderMutation {
    pub fn new(name: &str, value: &str) -> Result<Self, Error> {
        Ok(Self {
            header_name: HeaderName::from_bytes(name.as_bytes())?,
            header_value: HeaderValue::from_str(value)?,
        })
    }
}

impl HeadersMutation for AddHeaderMutation {
    fn mutate(&self, headers: &mut HeaderMap) {
        headers.insert(self.header_name.clone(), self.header_value.clone());
    }
}
