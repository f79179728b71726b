#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hyper::{
        body::Bytes,
        header::{HeaderValue, CONTENT_TYPE, ETAG},
        HeaderMap, Method,
    };
    use redfish_validator::{
        entropy::TokenVerdict,
        ssdp::{DatagramSocket, IpProtocol, SocketOpener},
        util, AssertionId, Error, HttpClient, InteractionLedger, InteractionRecorder, Outcome,
        RequestData, RequestVariant, ResourceType, ResponseData, ResultAggregator,
        SsdpDiscoveryClient, TokenAnalyzer, ValidatorConfiguration,
    };
    use serde_json::{json, Value};
    use std::{
        collections::VecDeque,
        io,
        net::SocketAddr,
        sync::{Arc, Mutex},
        time::Duration,
    };

    const SESSION_TOKEN: &str = "C90FDAA22168C234C4C6628B80DC1CD1";
    const ACCOUNT_URI: &str = "/redfish/v1/AccountService/Accounts/1";

    #[derive(Debug)]
    struct FakeService;

    impl FakeService {
        fn json(status_code: u16, body: Value, extra: &[(&str, &str)]) -> ResponseData {
            let mut headers = HeaderMap::new();
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json;charset=utf-8"),
            );
            util::put_headers(&mut headers, extra.iter().copied()).unwrap();

            ResponseData {
                status_code,
                headers,
                body: Bytes::from(body.to_string()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for FakeService {
        async fn make_request(
            &self,
            _base_url: &str,
            request_data: &RequestData,
        ) -> Result<ResponseData, Error> {
            let authenticated = request_data.headers.contains_key("x-auth-token")
                || request_data.headers.contains_key("authorization");

            let response = match (&request_data.method, request_data.uri.as_str()) {
                (&Method::GET, "/redfish/v1/") => {
                    Self::json(200, json!({ "RedfishVersion": "1.6.0" }), &[])
                }
                (&Method::POST, "/redfish/v1/SessionService/Sessions") => Self::json(
                    201,
                    json!({ "UserName": "oper" }),
                    &[("X-Auth-Token", SESSION_TOKEN)],
                ),
                (_, _) if !authenticated => Self::json(
                    401,
                    json!({
                        "error": {
                            "code": "Base.1.8.GeneralError",
                            "@Message.ExtendedInfo": [{
                                "MessageId": "Base.1.8.NoValidSession",
                                "Message": "No valid session found"
                            }]
                        }
                    }),
                    &[],
                ),
                (&Method::GET, ACCOUNT_URI) => Self::json(
                    200,
                    json!({ "UserName": "oper", "@odata.etag": "W/\"1234\"" }),
                    &[],
                ),
                (_, _) => Self::json(404, json!({}), &[]),
            };

            Ok(response)
        }
    }

    #[derive(Debug)]
    struct OneShotSocket {
        replies: Mutex<VecDeque<Vec<u8>>>,
    }

    impl DatagramSocket for OneShotSocket {
        fn send_to(&self, buf: &[u8], _target: SocketAddr) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn recv(&self, buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
            match self.replies.lock().unwrap().pop_front() {
                Some(datagram) => {
                    buf[..datagram.len()].copy_from_slice(&datagram);
                    Ok(datagram.len())
                }
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            }
        }
    }

    #[derive(Debug)]
    struct OneShotOpener;

    impl SocketOpener for OneShotOpener {
        fn open(
            &self,
            _protocol: IpProtocol,
            _iface: Option<&str>,
        ) -> Result<Box<dyn DatagramSocket>, Error> {
            let advertisement = b"HTTP/1.1 200 OK\r\n\
                ST: urn:dmtf-org:service:redfish-rest:1\r\n\
                USN: uuid:92384634-2938-2342-8820-489239905423::urn:dmtf-org:service:redfish-rest:1:6\r\n\
                AL: https://192.168.1.50/redfish/v1/\r\n\
                \r\n";

            Ok(Box::new(OneShotSocket {
                replies: Mutex::new(vec![b"garbage".to_vec(), advertisement.to_vec()].into()),
            }))
        }
    }

    fn configuration() -> ValidatorConfiguration {
        let mut configuration = ValidatorConfiguration::new();
        configuration.set_base_url("https://192.168.1.50");
        configuration.set_credentials("oper", "xyzzy");
        configuration.set_http_client(Arc::new(FakeService));
        configuration.discovery_mut().set_timeout(Duration::from_millis(200));
        configuration
    }

    async fn record_run(
        recorder: &InteractionRecorder,
        ledger: &mut InteractionLedger,
    ) -> Result<(), Error> {
        recorder
            .exchange(
                ledger,
                RequestData::new(Method::GET, "/redfish/v1/"),
                RequestVariant::Normal,
                Some(ResourceType::ServiceRoot),
            )
            .await?;
        recorder
            .exchange(
                ledger,
                RequestData::new(Method::POST, "/redfish/v1/SessionService/Sessions"),
                RequestVariant::Normal,
                Some(ResourceType::Session),
            )
            .await?;
        recorder
            .exchange(
                ledger,
                RequestData::new(Method::GET, ACCOUNT_URI),
                RequestVariant::BasicAuth,
                Some(ResourceType::ManagerAccount),
            )
            .await?;
        recorder
            .exchange(
                ledger,
                RequestData::new(Method::GET, ACCOUNT_URI),
                RequestVariant::NoAuth,
                Some(ResourceType::ManagerAccount),
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn recorded_run_produces_a_summary() {
        let configuration = configuration();
        let recorder = InteractionRecorder::from_configuration(&configuration).unwrap();
        let mut ledger = InteractionLedger::new();
        let mut aggregator = ResultAggregator::new();

        record_run(&recorder, &mut ledger).await.unwrap();
        assert_eq!(ledger.len(), 4);

        let root = ledger.find_normal(&Method::GET, "/redfish/v1/").unwrap();
        let version: util::ProtocolVersion = root.json().unwrap()["RedfishVersion"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        let media_type = util::normalize_media_type(root.content_type().unwrap());
        if media_type.starts_with("application/json") && version.minor >= 6 {
            aggregator.log_interaction(Outcome::Pass, root, AssertionId::ProtoJsonRfc, "Test passed");
        }

        let session = ledger
            .find_normal(&Method::POST, "/redfish/v1/SessionService/Sessions")
            .unwrap();
        let token = session.response_header("X-Auth-Token").unwrap();
        let classification = TokenAnalyzer::new(*configuration.entropy_thresholds())
            .classify(token)
            .unwrap();
        assert_eq!(classification.verdict, TokenVerdict::Pass);
        aggregator.log_interaction(
            Outcome::Pass,
            session,
            AssertionId::SecSessionIdEntropy,
            "Session token passed the randomness tests",
        );

        let account = ledger
            .find(&Method::GET, ACCOUNT_URI, RequestVariant::BasicAuth)
            .unwrap();
        match util::response_etag(account) {
            Some(_) if account.response_header(ETAG.as_str()).is_some() => {
                aggregator.log_interaction(
                    Outcome::Pass,
                    account,
                    AssertionId::ProtoEtagOnGetAccount,
                    "Test passed",
                );
            }
            _ => aggregator.log_interaction(
                Outcome::Fail,
                account,
                AssertionId::ProtoEtagOnGetAccount,
                "did not return an ETag header",
            ),
        }
        assert!(util::if_match_header(account).is_empty());

        let rejected = ledger
            .find(&Method::GET, ACCOUNT_URI, RequestVariant::NoAuth)
            .unwrap();
        assert_eq!(rejected.status_code(), 401);
        assert_eq!(util::extended_error(rejected), "No valid session found");
        assert!(util::extended_info_message_keys(rejected.json().unwrap()).contains("NoValidSession"));
        aggregator.log_interaction(
            Outcome::Warn,
            rejected,
            AssertionId::SecSessionIdEntropy,
            "some warning message",
        );
        aggregator.log_not_tested(
            AssertionId::ProtoHttpUnsupportedMethods,
            "TRACE was not exercised",
        );

        let summary = aggregator.summarize();
        assert_eq!(summary.pass, 2);
        assert_eq!(summary.fail, 1);
        assert_eq!(summary.warn, 1);
        assert_eq!(summary.not_tested, 1);

        let banner = aggregator.render(&summary);
        assert!(banner.contains("PASS: 2"));
        assert!(banner.contains("FAIL: 1"));
        assert!(banner.contains("WARN: 1"));
        assert!(banner.contains("NOT_TESTED: 1"));

        let report = serde_json::to_value(aggregator.verdicts()).unwrap();
        assert_eq!(report.as_array().unwrap().len(), 5);
        assert_eq!(report[0]["assertion"], "PROTO_JSON_RFC");
        assert_eq!(report[0]["method"], "GET");
    }

    #[tokio::test]
    async fn every_exchange_is_kept_in_order() {
        let recorder = InteractionRecorder::from_configuration(&configuration()).unwrap();
        let mut ledger = InteractionLedger::new();

        record_run(&recorder, &mut ledger).await.unwrap();
        record_run(&recorder, &mut ledger).await.unwrap();

        assert_eq!(ledger.len(), 8);
        assert_eq!(
            ledger
                .history(&Method::GET, ACCOUNT_URI, RequestVariant::NoAuth)
                .len(),
            2
        );
        let uris: Vec<&str> = ledger
            .find_all_by_method(&Method::GET)
            .into_iter()
            .map(|(uri, _)| uri)
            .collect();
        assert_eq!(uris, vec!["/redfish/v1/"]);
        assert_eq!(
            ledger.find_all_by_resource_type(ResourceType::ManagerAccount).len(),
            4
        );
    }

    #[test]
    fn discovery_feeds_the_aggregator() {
        let configuration = configuration();
        let client = SsdpDiscoveryClient::from_configuration(configuration.discovery())
            .with_socket_opener(Arc::new(OneShotOpener));
        let mut aggregator = ResultAggregator::new();

        let services = client.discover_configured(configuration.discovery()).unwrap();

        assert_eq!(services.len(), 1);
        let service = &services["92384634-2938-2342-8820-489239905423"];
        assert_eq!(service.location(), Some("https://192.168.1.50/redfish/v1/"));

        aggregator.log(
            Outcome::Pass,
            None,
            None,
            service.location(),
            AssertionId::ServiceDiscoverySsdp,
            "Service discovered via SSDP",
        );
        assert!(aggregator.has_conclusive_result(AssertionId::ServiceDiscoverySsdp));
        assert_eq!(aggregator.summarize().pass, 1);
    }
}
