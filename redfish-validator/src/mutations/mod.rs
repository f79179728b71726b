mod add_header_mutation;
mod remove_headers_mutation;

pub use add_header_mutation::AddHeaderMutation;
pub use remove_headers_mutation::RemoveHeadersMutation;

use crate::{error::Error, RequestData, RequestVariant};
use base64::{engine::general_purpose::STANDARD, Engine};
use hyper::{
    header::{ACCEPT, AUTHORIZATION, IF_MATCH},
    HeaderMap,
};
use std::fmt::Debug;

const X_AUTH_TOKEN: &str = "x-auth-token";
const BAD_ETAG: &str = "W/\"0000000000000000\"";
const BAD_PASSWORD_SUFFIX: &str = "-not-the-password";

pub trait HeadersMutation: Debug {
    fn mutate(&self, headers: &mut HeaderMap);
}

#[derive(Debug)]
pub struct RequestMutation {
    mutation: Box<dyn HeadersMutation + Send + Sync>,
}

impl RequestMutation {
    pub fn mutate(&self, request_data: &mut RequestData) {
        self.mutation.mutate(&mut request_data.headers);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<S1: Into<String>, S2: Into<String>>(username: S1, password: S2) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn basic_authorization(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

#[derive(Debug, Default)]
pub struct MutationsBuilder {
    mutations: Vec<RequestMutation>,
}

impl MutationsBuilder {
    pub fn new() -> Self {
        Self {
            mutations: Vec::new(),
        }
    }

    pub fn for_variant(variant: RequestVariant, credentials: &Credentials) -> Result<Self, Error> {
        let mut builder = Self::new();

        match variant {
            RequestVariant::NoAuth => {
                builder.remove_headers(vec![AUTHORIZATION.as_str(), X_AUTH_TOKEN]);
            }
            RequestVariant::BasicAuth => {
                builder
                    .remove_headers(vec![X_AUTH_TOKEN])
                    .add_header(AUTHORIZATION.as_str(), &credentials.basic_authorization())?;
            }
            RequestVariant::BadAuth => {
                let wrong = Credentials::new(
                    credentials.username.as_str(),
                    format!("{}{}", credentials.password, BAD_PASSWORD_SUFFIX),
                );
                builder
                    .remove_headers(vec![X_AUTH_TOKEN])
                    .add_header(AUTHORIZATION.as_str(), &wrong.basic_authorization())?;
            }
            RequestVariant::BadEtag => {
                builder.add_header(IF_MATCH.as_str(), BAD_ETAG)?;
            }
            RequestVariant::Streaming => {
                builder.add_header(ACCEPT.as_str(), "text/event-stream")?;
            }
            RequestVariant::Yaml => {
                builder.add_header(ACCEPT.as_str(), "application/yaml")?;
            }
            _ => {}
        }

        Ok(builder)
    }

    pub fn remove_headers<S: AsRef<str>, I: IntoIterator<Item = S>>(&mut self, headers: I) -> &mut Self {
        self.add_headers_mutation(RemoveHeadersMutation::new(headers))
    }

    pub fn add_header(&mut self, header_name: &str, header_value: &str) -> Result<&mut Self, Error> {
        let mutation = AddHeaderMutation::new(header_name, header_value)?;
        Ok(self.add_headers_mutation(mutation))
    }

    pub fn add_headers_mutation<HM: HeadersMutation + Send + Sync + 'static>(
        &mut self,
        mutation: HM,
    ) -> &mut Self {
        self.mutations.push(RequestMutation {
            mutation: Box::new(mutation),
        });
        self
    }

    pub fn into_request_mutations(self) -> Vec<RequestMutation> {
        self.mutations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;

    fn authenticated_request() -> RequestData {
        let mut request = RequestData::new(Method::GET, "/redfish/v1/Systems");
        request
            .headers
            .insert(X_AUTH_TOKEN, "1a2b3c4d".parse().unwrap());
        request
    }

    fn apply(variant: RequestVariant) -> RequestData {
        let credentials = Credentials::new("oper", "xyzzy");
        let mut request = authenticated_request();

        for mutation in MutationsBuilder::for_variant(variant, &credentials)
            .unwrap()
            .into_request_mutations()
        {
            mutation.mutate(&mut request);
        }

        request
    }

    #[test]
    fn basic_authorization_encodes_credentials() {
        assert_eq!(
            Credentials::new("oper", "xyzzy").basic_authorization(),
            "Basic b3Blcjp4eXp6eQ=="
        );
    }

    #[test]
    fn normal_variant_leaves_request_untouched() {
        let request = apply(RequestVariant::Normal);
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[X_AUTH_TOKEN], "1a2b3c4d");
    }

    #[test]
    fn no_auth_strips_credentials() {
        let mut request = authenticated_request();
        request
            .headers
            .insert(AUTHORIZATION, "Basic b3Blcjp4eXp6eQ==".parse().unwrap());
        let credentials = Credentials::default();

        for mutation in MutationsBuilder::for_variant(RequestVariant::NoAuth, &credentials)
            .unwrap()
            .into_request_mutations()
        {
            mutation.mutate(&mut request);
        }

        assert!(request.headers.is_empty());
    }

    #[test]
    fn basic_and_bad_auth_replace_the_session_token() {
        let basic = apply(RequestVariant::BasicAuth);
        assert!(basic.headers.get(X_AUTH_TOKEN).is_none());
        assert_eq!(basic.headers[AUTHORIZATION], "Basic b3Blcjp4eXp6eQ==");

        let bad = apply(RequestVariant::BadAuth);
        assert!(bad.headers.get(X_AUTH_TOKEN).is_none());
        assert_ne!(bad.headers[AUTHORIZATION], "Basic b3Blcjp4eXp6eQ==");
        assert!(bad.headers[AUTHORIZATION].to_str().unwrap().starts_with("Basic "));
    }

    #[test]
    fn content_negotiation_variants_set_accept() {
        assert_eq!(apply(RequestVariant::Streaming).headers[ACCEPT], "text/event-stream");
        assert_eq!(apply(RequestVariant::Yaml).headers[ACCEPT], "application/yaml");
        assert_eq!(apply(RequestVariant::BadEtag).headers[IF_MATCH], BAD_ETAG);
    }
}
