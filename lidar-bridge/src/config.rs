/// Runtime configuration for the bridge. Defaults match the values the
/// deployed service has always used.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Address the TCP server listens on.
    pub address: String,
    /// Port the TCP server listens on.
    pub port: u16,
    /// Serial device path of the sensor.
    pub device: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// How long one sensor read may wait for a full packet.
    pub serial_timeout_ms: u64,
    /// Bound on each wait for a client connection.
    pub accept_timeout_ms: u64,
    /// Use the synthetic sensor instead of a serial device.
    pub mock: bool,
}

impl Default for BridgeConfig {
    fn default() -> BridgeConfig {
        BridgeConfig {
            address: "localhost".to_string(),
            port: 5005,
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: 115200,
            serial_timeout_ms: 1000,
            accept_timeout_ms: 1000,
            mock: false,
        }
    }
}
