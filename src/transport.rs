use std::io;
use std::io::{Error, ErrorKind};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use rand::Rng;


/// A connectionless endpoint able to carry one datagram per `send`.
///
/// Dropping the endpoint releases the underlying resource.
pub trait Endpoint {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize>;
}


/// Opens endpoints pointed at a statsd server.
pub trait Transport {
    type Endpoint: Endpoint;

    fn open(&self, host: &str, port: u16) -> io::Result<Self::Endpoint>;
}


/// Plain UDP transport.
///
/// Every `open` resolves the destination and binds a fresh ephemeral
/// socket of the same address family.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpTransport;

pub struct UdpEndpoint {
    socket: UdpSocket,
    server_address: SocketAddr,
}

impl Transport for UdpTransport {
    type Endpoint = UdpEndpoint;

    fn open(&self, host: &str, port: u16) -> io::Result<UdpEndpoint> {
        let server_address = preferred_address((host, port).to_socket_addrs()?).ok_or_else(|| {
            Error::new(ErrorKind::AddrNotAvailable, format!("{} did not resolve", host))
        })?;

        // Bind to a generic port as we'll only be writing on this
        // socket.
        let client_address: SocketAddr = if server_address.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(client_address)?;

        Ok(UdpEndpoint { socket, server_address })
    }
}

/// First IPv4 address, or the first address of any family when there is none.
fn preferred_address<I: IntoIterator<Item = SocketAddr>>(addrs: I) -> Option<SocketAddr> {
    let mut fallback = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback = fallback.or(Some(addr));
    }
    fallback
}

impl Endpoint for UdpEndpoint {
    fn send(&mut self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send_to(payload, self.server_address)
    }
}


/// Source of uniform draws in `[0, 1)` used for sampling decisions.
pub trait RandomSource {
    fn next_f64(&self) -> f64;
}

/// Draws from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}
