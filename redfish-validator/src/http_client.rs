use crate::{error::Error, RequestData, ResponseData};
use async_trait::async_trait;
use hyper::{body, client::HttpConnector, header::HOST, Body, Client, Request};
use hyper_tls::HttpsConnector;
use log::debug;
use std::fmt::Debug;

#[async_trait]
pub trait HttpClient: Debug {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error>;
}

#[derive(Debug)]
pub struct HyperHttpClient {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HyperHttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder().build(HttpsConnector::new()),
        }
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn make_request(
        &self,
        base_url: &str,
        request_data: &RequestData,
    ) -> Result<ResponseData, Error> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), request_data.uri);
        let mut request_builder = Request::builder()
            .uri(url.as_str())
            .method(request_data.method.clone());

        if let Some(headers_mut) = request_builder.headers_mut() {
            headers_mut.extend(
                request_data
                    .headers
                    .iter()
                    .filter(|(header_name, _)| **header_name != HOST)
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }

        let request: Request<Body> = request_builder.body(request_data.body.clone().into())?;

        debug!("{} {}", request_data.method, url);
        let response = self.client.request(request).await?;

        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = body::to_bytes(response.into_body()).await?;

        Ok(ResponseData {
            status_code,
            headers,
            body,
        })
    }
}

impl Default for HyperHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
