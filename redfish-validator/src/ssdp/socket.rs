use crate::error::Error;
use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::{
    fmt::Debug,
    io,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6, UdpSocket},
    str::FromStr,
    time::Duration,
};

const SSDP_PORT: u16 = 1900;
const SSDP_MULTICAST_IPV4: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
const SSDP_MULTICAST_IPV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0x000c);
const MULTICAST_TTL: u32 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IpProtocol {
    Ipv4,
    Ipv6,
}

impl IpProtocol {
    pub fn multicast_target(&self, scope_id: u32) -> SocketAddr {
        match self {
            IpProtocol::Ipv4 => SocketAddr::V4(SocketAddrV4::new(SSDP_MULTICAST_IPV4, SSDP_PORT)),
            IpProtocol::Ipv6 => {
                SocketAddr::V6(SocketAddrV6::new(SSDP_MULTICAST_IPV6, SSDP_PORT, 0, scope_id))
            }
        }
    }

    pub fn host_header(&self) -> String {
        match self {
            IpProtocol::Ipv4 => format!("{}:{}", SSDP_MULTICAST_IPV4, SSDP_PORT),
            IpProtocol::Ipv6 => format!("[{}]:{}", SSDP_MULTICAST_IPV6, SSDP_PORT),
        }
    }

    fn unspecified(&self) -> SocketAddr {
        match self {
            IpProtocol::Ipv4 => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpProtocol::Ipv6 => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        }
    }

    fn domain(&self) -> Domain {
        match self {
            IpProtocol::Ipv4 => Domain::IPV4,
            IpProtocol::Ipv6 => Domain::IPV6,
        }
    }

    /// `iface` is either a device name (`eth0`) or an address of the matching
    /// family; ipv6 addresses may carry a `%scope` given as an index or a name.
    pub fn resolve_interface(&self, iface: &str) -> Result<Interface, Error> {
        let invalid = || Error::InvalidInterface(String::from(iface));

        if let Ok(address) = iface.parse::<IpAddr>() {
            return match (self, address) {
                (IpProtocol::Ipv4, IpAddr::V4(address)) => Ok(Interface::Address(
                    SocketAddr::V4(SocketAddrV4::new(address, 0)),
                )),
                (IpProtocol::Ipv6, IpAddr::V6(address)) => Ok(Interface::Address(
                    SocketAddr::V6(SocketAddrV6::new(address, 0, 0, 0)),
                )),
                _ => Err(invalid()),
            };
        }

        match (self, iface.split_once('%')) {
            (IpProtocol::Ipv6, Some((address, scope))) => {
                let address: Ipv6Addr = address.parse().map_err(|_| invalid())?;
                let scope_id = match scope.parse::<u32>() {
                    Ok(scope_id) => scope_id,
                    Err(_) => interface_index(scope).ok_or_else(invalid)?,
                };
                Ok(Interface::Address(SocketAddr::V6(SocketAddrV6::new(
                    address, 0, 0, scope_id,
                ))))
            }
            (_, Some(_)) => Err(invalid()),
            (_, None) => {
                let index = interface_index(iface).ok_or_else(invalid)?;
                Ok(Interface::Device {
                    name: String::from(iface),
                    index,
                })
            }
        }
    }
}

impl FromStr for IpProtocol {
    type Err = Error;

    fn from_str(protocol: &str) -> Result<Self, Self::Err> {
        match protocol.to_ascii_lowercase().as_str() {
            "ipv4" => Ok(IpProtocol::Ipv4),
            "ipv6" => Ok(IpProtocol::Ipv6),
            _ => Err(Error::InvalidProtocol(String::from(protocol))),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Interface {
    Address(SocketAddr),
    Device { name: String, index: u32 },
}

impl Interface {
    pub fn scope_id(&self) -> u32 {
        match self {
            Interface::Address(SocketAddr::V6(address)) => address.scope_id(),
            Interface::Address(SocketAddr::V4(_)) => 0,
            Interface::Device { index, .. } => *index,
        }
    }
}

#[cfg(unix)]
fn interface_index(name: &str) -> Option<u32> {
    let name = std::ffi::CString::new(name).ok()?;
    // SAFETY: `name` is a valid NUL terminated string for the duration of the call.
    match unsafe { libc::if_nametoindex(name.as_ptr()) } {
        0 => None,
        index => Some(index),
    }
}

#[cfg(not(unix))]
fn interface_index(_name: &str) -> Option<u32> {
    None
}

pub trait DatagramSocket: Debug {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;
    fn recv(&self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;
}

pub trait SocketOpener: Debug {
    fn open(
        &self,
        protocol: IpProtocol,
        iface: Option<&str>,
    ) -> Result<Box<dyn DatagramSocket>, Error>;
}

#[derive(Debug, Default)]
pub struct UdpSocketOpener;

impl UdpSocketOpener {
    #[cfg(any(target_os = "linux", target_os = "android", target_os = "fuchsia"))]
    fn bind_device(socket: &Socket, name: &str) -> io::Result<()> {
        socket.bind_device(Some(name.as_bytes()))
    }

    #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "fuchsia")))]
    fn bind_device(_socket: &Socket, name: &str) -> io::Result<()> {
        debug!("Binding to device {} isn't supported here, using the default route", name);
        Ok(())
    }
}

impl SocketOpener for UdpSocketOpener {
    fn open(
        &self,
        protocol: IpProtocol,
        iface: Option<&str>,
    ) -> Result<Box<dyn DatagramSocket>, Error> {
        let interface = iface
            .map(|iface| protocol.resolve_interface(iface))
            .transpose()?;

        let socket = Socket::new(protocol.domain(), Type::DGRAM, Some(Protocol::UDP))?;

        match &interface {
            Some(Interface::Address(address)) => socket.bind(&SockAddr::from(*address))?,
            Some(Interface::Device { name, .. }) => {
                Self::bind_device(&socket, name)?;
                socket.bind(&SockAddr::from(protocol.unspecified()))?;
            }
            None => socket.bind(&SockAddr::from(protocol.unspecified()))?,
        }

        match protocol {
            IpProtocol::Ipv4 => socket.set_multicast_ttl_v4(MULTICAST_TTL)?,
            IpProtocol::Ipv6 => {
                socket.set_multicast_hops_v6(MULTICAST_TTL)?;
                if let Some(interface) = &interface {
                    if interface.scope_id() != 0 {
                        socket.set_multicast_if_v6(interface.scope_id())?;
                    }
                }
            }
        }
        debug!("Opened {:?} discovery socket on {:?}", protocol, interface);

        Ok(Box::new(UdpSocket::from(socket)))
    }
}

impl DatagramSocket for UdpSocket {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target)
    }

    fn recv(&self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        self.set_read_timeout(Some(timeout))?;
        UdpSocket::recv(self, buf)
    }
}
