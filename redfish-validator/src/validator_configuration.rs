use crate::{
    entropy::EntropyThresholds,
    error::Error,
    http_client::{HttpClient, HyperHttpClient},
    mutations::Credentials,
    ssdp::{IpProtocol, SSDP_REDFISH},
    util,
};
use std::{sync::Arc, time::Duration};

const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_MAX_RESPONSES: usize = 100;
const DEFAULT_MX: u8 = 2;
const MAX_MX: u8 = 5;

#[derive(Debug, Clone)]
pub struct DiscoveryConfiguration {
    protocol: IpProtocol,
    iface: Option<String>,
    timeout: Duration,
    max_responses: usize,
    search_target: String,
    mx: u8,
}

impl DiscoveryConfiguration {
    pub fn new() -> Self {
        Self {
            protocol: IpProtocol::Ipv4,
            iface: None,
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
            max_responses: DEFAULT_MAX_RESPONSES,
            search_target: String::from(SSDP_REDFISH),
            mx: DEFAULT_MX,
        }
    }

    pub fn set_protocol(&mut self, protocol: &str) -> Result<(), Error> {
        self.protocol = protocol.parse()?;
        Ok(())
    }

    pub fn protocol(&self) -> IpProtocol {
        self.protocol
    }

    pub fn set_iface<S: Into<String>>(&mut self, iface: S) {
        self.iface = Some(iface.into());
    }

    pub fn iface(&self) -> Option<&str> {
        self.iface.as_deref()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_max_responses(&mut self, max_responses: usize) {
        self.max_responses = max_responses;
    }

    pub fn max_responses(&self) -> usize {
        self.max_responses
    }

    pub fn set_search_target<S: Into<String>>(&mut self, search_target: S) {
        self.search_target = search_target.into();
    }

    pub fn search_target(&self) -> &str {
        &self.search_target
    }

    pub fn set_mx(&mut self, mx: u8) {
        self.mx = util::sanitize(mx, 1, Some(MAX_MX));
    }

    pub fn mx(&self) -> u8 {
        self.mx
    }
}

impl Default for DiscoveryConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ValidatorConfiguration {
    base_url: Option<String>,
    credentials: Credentials,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
    discovery: DiscoveryConfiguration,
    entropy_thresholds: EntropyThresholds,
}

impl ValidatorConfiguration {
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: Credentials::default(),
            http_client: None,
            discovery: DiscoveryConfiguration::new(),
            entropy_thresholds: EntropyThresholds::default(),
        }
    }

    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.base_url = Some(base_url.into());
    }

    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    pub fn set_credentials<S1: Into<String>, S2: Into<String>>(&mut self, username: S1, password: S2) {
        self.credentials = Credentials::new(username, password);
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(HyperHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }

    pub fn discovery(&self) -> &DiscoveryConfiguration {
        &self.discovery
    }

    pub fn discovery_mut(&mut self) -> &mut DiscoveryConfiguration {
        &mut self.discovery
    }

    pub fn set_entropy_thresholds(&mut self, entropy_thresholds: EntropyThresholds) {
        self.entropy_thresholds = entropy_thresholds;
    }

    pub fn entropy_thresholds(&self) -> &EntropyThresholds {
        &self.entropy_thresholds
    }
}

impl Default for ValidatorConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
