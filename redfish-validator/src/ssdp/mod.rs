mod fake_socket;
mod response_head;
mod socket;

pub use fake_socket::FakeDatagramSocket;
pub use response_head::ResponseHead;
pub use socket::{DatagramSocket, Interface, IpProtocol, SocketOpener, UdpSocketOpener};

use crate::{error::Error, validator_configuration::DiscoveryConfiguration};
use hyper::HeaderMap;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::{
    collections::HashMap,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

pub const SSDP_REDFISH: &str = "urn:dmtf-org:service:redfish-rest:1";
const DEFAULT_MX: u8 = 2;
const MAX_DATAGRAM_SIZE: usize = 8192;

lazy_static! {
    static ref REDFISH_USN_REGEX: Regex = Regex::new(
        r"^uuid:(?P<uuid>[a-fA-F0-9\-]+)::urn:dmtf-org:service:redfish-rest:1(?::[0-9]+)?$"
    )
    .unwrap();
}

pub type DiscoveredServices = HashMap<String, DiscoveredService>;

#[derive(Debug, Clone, Default)]
pub struct DiscoveredService {
    headers: HeaderMap,
}

impl DiscoveredService {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn search_target(&self) -> Option<&str> {
        self.header("ST")
    }

    pub fn usn(&self) -> Option<&str> {
        self.header("USN")
    }

    pub fn location(&self) -> Option<&str> {
        self.header("AL").or_else(|| self.header("LOCATION"))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum DiscoveryState {
    Idle,
    SocketOpen,
    SearchSent,
    Collecting,
    TimedOut,
    Closed,
}

#[derive(Debug)]
struct DiscoveryRun {
    state: DiscoveryState,
}

impl DiscoveryRun {
    fn new() -> Self {
        Self {
            state: DiscoveryState::Idle,
        }
    }

    fn transition(&mut self, state: DiscoveryState) {
        debug!("SSDP discovery {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

#[derive(Debug, Clone)]
pub struct SsdpDiscoveryClient {
    socket_opener: Arc<dyn SocketOpener + Send + Sync>,
    search_target: String,
    mx: u8,
    usn_pattern: Regex,
}

impl SsdpDiscoveryClient {
    pub fn new() -> Self {
        Self {
            socket_opener: Arc::new(UdpSocketOpener),
            search_target: String::from(SSDP_REDFISH),
            mx: DEFAULT_MX,
            usn_pattern: REDFISH_USN_REGEX.clone(),
        }
    }

    pub fn from_configuration(configuration: &DiscoveryConfiguration) -> Self {
        Self::new()
            .with_search_target(configuration.search_target())
            .with_mx(configuration.mx())
    }

    pub fn with_socket_opener(mut self, socket_opener: Arc<dyn SocketOpener + Send + Sync>) -> Self {
        self.socket_opener = socket_opener;
        self
    }

    pub fn with_search_target<S: Into<String>>(mut self, search_target: S) -> Self {
        self.search_target = search_target.into();
        self
    }

    pub fn with_mx(mut self, mx: u8) -> Self {
        self.mx = mx;
        self
    }

    /// The pattern should name the identifier group `uuid`; the first group is used otherwise.
    pub fn with_usn_pattern(mut self, usn_pattern: Regex) -> Self {
        self.usn_pattern = usn_pattern;
        self
    }

    pub fn search_request(&self, protocol: IpProtocol) -> String {
        format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: {}\r\n\
             ST: {}\r\n\
             \r\n",
            protocol.host_header(),
            self.mx,
            self.search_target
        )
    }

    pub fn discover(
        &self,
        protocol: &str,
        iface: Option<&str>,
        timeout: Duration,
        max_responses: usize,
    ) -> Result<DiscoveredServices, Error> {
        let protocol: IpProtocol = protocol.parse()?;
        self.discover_with(protocol, iface, timeout, max_responses)
    }

    pub fn discover_configured(
        &self,
        configuration: &DiscoveryConfiguration,
    ) -> Result<DiscoveredServices, Error> {
        self.discover_with(
            configuration.protocol(),
            configuration.iface(),
            configuration.timeout(),
            configuration.max_responses(),
        )
    }

    pub fn discover_with(
        &self,
        protocol: IpProtocol,
        iface: Option<&str>,
        timeout: Duration,
        max_responses: usize,
    ) -> Result<DiscoveredServices, Error> {
        let mut run = DiscoveryRun::new();

        let scope_id = match (protocol, iface) {
            (IpProtocol::Ipv6, Some(iface)) => protocol.resolve_interface(iface)?.scope_id(),
            _ => 0,
        };

        let socket = self.socket_opener.open(protocol, iface)?;
        run.transition(DiscoveryState::SocketOpen);

        let result = self.search_and_collect(
            &mut run,
            socket.as_ref(),
            protocol,
            scope_id,
            timeout,
            max_responses,
        );

        drop(socket);
        run.transition(DiscoveryState::Closed);

        result
    }

    fn search_and_collect(
        &self,
        run: &mut DiscoveryRun,
        socket: &dyn DatagramSocket,
        protocol: IpProtocol,
        scope_id: u32,
        timeout: Duration,
        max_responses: usize,
    ) -> Result<DiscoveredServices, Error> {
        let target = protocol.multicast_target(scope_id);
        socket.send_to(self.search_request(protocol).as_bytes(), target)?;
        run.transition(DiscoveryState::SearchSent);

        let deadline = Instant::now() + timeout;
        let mut services = DiscoveredServices::new();
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let mut received = 0;

        run.transition(DiscoveryState::Collecting);
        while received < max_responses {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.as_nanos() == 0 {
                run.transition(DiscoveryState::TimedOut);
                break;
            }

            let size = match socket.recv(&mut buf, remaining) {
                Ok(size) => size,
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    run.transition(DiscoveryState::TimedOut);
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            received += 1;
            self.process_datagram(&buf[..size], &mut services);
        }

        info!(
            "SSDP discovery received {} responses from {} services",
            received,
            services.len()
        );

        Ok(services)
    }

    fn process_datagram(&self, datagram: &[u8], services: &mut DiscoveredServices) {
        let mut socket = FakeDatagramSocket::new(datagram);

        match ResponseHead::read_from(socket.make_file()) {
            Ok(head) => {
                self.process_response(head, services);
            }
            Err(e) => debug!("Discarding malformed SSDP datagram: {}", e),
        }
    }

    pub fn process_response(&self, head: ResponseHead, services: &mut DiscoveredServices) -> bool {
        let uuid = match head.header("USN").and_then(|usn| self.usn_pattern.captures(usn)) {
            Some(captures) => match captures.name("uuid").or_else(|| captures.get(1)) {
                Some(uuid) => String::from(uuid.as_str()),
                None => return false,
            },
            None => {
                debug!("Discarding SSDP response without a matching USN header");
                return false;
            }
        };

        let service = DiscoveredService::new(head.headers);
        info!(
            "Discovered service {} at {}",
            uuid,
            service.location().unwrap_or("<no location>")
        );
        services.insert(uuid, service);

        true
    }
}

impl Default for SsdpDiscoveryClient {
    fn default() -> Self {
        Self::new()
    }
}
