use crate::service::Endpoint;

pub const LOCAL_ADDRESS: &str = "http://localhost:5000";
pub const HOSTED_ADDRESS: &str = "https://quantumsatsolver.onrender.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_address : String,
}

impl Config {
    pub fn new(base_address: impl Into<String>) -> Config {
        let base_address: String = base_address.into();
        Config { base_address: base_address.trim_end_matches('/').to_string() }
    }

    pub fn local() -> Config {
        Config::new(LOCAL_ADDRESS)
    }

    pub fn hosted() -> Config {
        Config::new(HOSTED_ADDRESS)
    }

    /// Service for a front end served from `hostname`: a page served from
    /// `127.0.0.1` talks to the local server, anything else to the hosted one.
    pub fn for_host(hostname: &str) -> Config {
        if hostname.contains("127.0.0.1") {
            Config::local()
        } else {
            Config::hosted()
        }
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_address, endpoint.path())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::hosted()
    }
}
