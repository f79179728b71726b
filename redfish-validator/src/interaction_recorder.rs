use crate::{
    error::Error,
    http_client::HttpClient,
    interaction_ledger::InteractionLedger,
    mutations::{Credentials, MutationsBuilder},
    validator_configuration::ValidatorConfiguration,
    Interaction, RequestData, RequestVariant, ResourceType,
};
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InteractionRecorder {
    base_url: String,
    credentials: Credentials,
    http_client: Arc<dyn HttpClient + Send + Sync>,
}

impl InteractionRecorder {
    pub fn new<S: Into<String>>(
        base_url: S,
        credentials: Credentials,
        http_client: Arc<dyn HttpClient + Send + Sync>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            http_client,
        }
    }

    pub fn from_configuration(configuration: &ValidatorConfiguration) -> Result<Self, Error> {
        let base_url = configuration.base_url().ok_or(Error::NotConfigured)?;

        Ok(Self::new(
            base_url.as_str(),
            configuration.credentials().clone(),
            configuration.http_client(),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Nothing is recorded when the request fails.
    pub async fn exchange<'l>(
        &self,
        ledger: &'l mut InteractionLedger,
        mut request: RequestData,
        variant: RequestVariant,
        resource_type: Option<ResourceType>,
    ) -> Result<&'l Interaction, Error> {
        for mutation in MutationsBuilder::for_variant(variant, &self.credentials)?.into_request_mutations() {
            mutation.mutate(&mut request);
        }

        let response = match self.http_client.make_request(&self.base_url, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} ({:?}) failed: {}", request.method, request.uri, variant, e);
                return Err(e);
            }
        };
        debug!(
            "{} {} ({:?}) returned {}",
            request.method, request.uri, variant, response.status_code
        );

        Ok(ledger.record(Interaction::from_exchange(
            request,
            response,
            variant,
            resource_type,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseData;
    use async_trait::async_trait;
    use hyper::{
        body::Bytes,
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, Method,
    };
    use std::{io, sync::Mutex};

    #[derive(Debug, Default)]
    struct MockHttpClient {
        requests: Mutex<Vec<(String, RequestData)>>,
        fail: bool,
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn make_request(
            &self,
            base_url: &str,
            request_data: &RequestData,
        ) -> Result<ResponseData, Error> {
            self.requests
                .lock()
                .unwrap()
                .push((String::from(base_url), request_data.clone()));

            if self.fail {
                return Err(Error::IoError(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )));
            }

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            let status_code = if request_data.headers.contains_key(AUTHORIZATION) {
                200
            } else {
                401
            };

            Ok(ResponseData {
                status_code,
                headers,
                body: Bytes::from_static(br#"{"@odata.id": "/redfish/v1/Systems"}"#),
            })
        }
    }

    fn recorder(client: &Arc<MockHttpClient>) -> InteractionRecorder {
        InteractionRecorder::new(
            "https://127.0.0.1:8000",
            Credentials::new("oper", "xyzzy"),
            client.clone(),
        )
    }

    #[tokio::test]
    async fn exchange_records_the_interaction() {
        let client = Arc::new(MockHttpClient::default());
        let mut ledger = InteractionLedger::new();

        let interaction = recorder(&client)
            .exchange(
                &mut ledger,
                RequestData::new(Method::GET, "/redfish/v1/Systems"),
                RequestVariant::BasicAuth,
                Some(ResourceType::Collection),
            )
            .await
            .unwrap();

        assert_eq!(interaction.status_code(), 200);
        assert_eq!(interaction.variant(), RequestVariant::BasicAuth);
        assert_eq!(interaction.resource_type(), Some(ResourceType::Collection));
        assert_eq!(
            interaction.json().unwrap()["@odata.id"],
            "/redfish/v1/Systems"
        );
        assert!(interaction.request_headers().contains_key(AUTHORIZATION));

        assert_eq!(ledger.len(), 1);
        assert!(ledger
            .find(&Method::GET, "/redfish/v1/Systems", RequestVariant::BasicAuth)
            .is_some());
        assert!(ledger.find_normal(&Method::GET, "/redfish/v1/Systems").is_none());

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "https://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn failed_exchange_records_nothing() {
        let client = Arc::new(MockHttpClient {
            fail: true,
            ..MockHttpClient::default()
        });
        let mut ledger = InteractionLedger::new();

        let result = recorder(&client)
            .exchange(
                &mut ledger,
                RequestData::new(Method::GET, "/redfish/v1/"),
                RequestVariant::Normal,
                Some(ResourceType::ServiceRoot),
            )
            .await;

        match result {
            Err(Error::IoError(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionRefused),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn recorder_needs_a_base_url() {
        let mut configuration = ValidatorConfiguration::new();
        match InteractionRecorder::from_configuration(&configuration) {
            Err(Error::NotConfigured) => (),
            other => panic!("Unexpected result: {:?}", other),
        }

        configuration.set_base_url("https://10.0.0.1");
        configuration.set_http_client(Arc::new(MockHttpClient::default()));
        let recorder = InteractionRecorder::from_configuration(&configuration).unwrap();
        assert_eq!(recorder.base_url(), "https://10.0.0.1");
    }
}
