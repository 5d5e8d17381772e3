use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Port the stub server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 5050;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    /// 0 binds an ephemeral port.
    pub port: u16,
    pub journal_limit: Option<usize>,
    pub mappings: Option<PathBuf>,
    pub reqres_fixtures: bool,
}

impl ServerConfig {
    /// Loopback on an ephemeral port; what tests want.
    pub fn ephemeral() -> Self {
        Self {
            port: 0,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_reqres_fixtures(mut self) -> Self {
        self.reqres_fixtures = true;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            journal_limit: None,
            mappings: None,
            reqres_fixtures: false,
        }
    }
}
