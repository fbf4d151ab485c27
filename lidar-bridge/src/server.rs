use crate::error::BridgeError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

/// Binds the listening socket with a backlog of one: the bridge serves a
/// single client relationship at a time. The listener is non-blocking so the
/// delivery loop can keep observing the stop signal between accepts.
pub(crate) fn bind_listener(address: &str, port: u16) -> Result<TcpListener, BridgeError> {
    let addr = (address, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| BridgeError::InvalidAddress(format!("{}:{}", address, port)))?;

    let domain = match addr {
        SocketAddr::V4(_) => Domain::IPV4,
        SocketAddr::V6(_) => Domain::IPV6,
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.bind(&addr.into())?;
    socket.listen(1)?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

/// Sends one frame in full. The caller closes the connection afterwards on
/// every path, success or failure.
pub(crate) fn send_frame(stream: &mut TcpStream, frame: &[u8]) -> std::io::Result<()> {
    stream.write_all(frame)?;
    stream.flush()
}
