use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Packet from lidar is too small. Only got {0} bytes.")]
    PacketTooShort(usize),
    #[error("Packet header must start with AA BB CC DD. Observed = {0}.")]
    InvalidHeader(String),
    #[error("Cannot resolve listen address \"{0}\".")]
    InvalidAddress(String),
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
