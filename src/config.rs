use std::env;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_VOLC_HOST: &str = "visual.volcengineapi.com";
pub const DEFAULT_VOLC_REGION: &str = "cn-north-1";
pub const DEFAULT_VOLC_SERVICE: &str = "cv";
pub const DEFAULT_REQ_KEY: &str = "jimeng_t2i_v40";
pub const CV_PROCESS_ACTION: &str = "CVProcess";
pub const CV_PROCESS_VERSION: &str = "2022-08-31";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: None,
            port: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").ok().filter(|h| !h.is_empty());
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        ServerConfig { host, port }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Credentials and endpoint for the Volcengine visual service.
#[derive(Debug, Clone)]
pub struct VolcConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
    pub service: String,
    pub host: String,
    pub req_key: String,
}

impl Default for VolcConfig {
    fn default() -> Self {
        VolcConfig {
            access_key: None,
            secret_key: None,
            region: DEFAULT_VOLC_REGION.to_string(),
            service: DEFAULT_VOLC_SERVICE.to_string(),
            host: DEFAULT_VOLC_HOST.to_string(),
            req_key: DEFAULT_REQ_KEY.to_string(),
        }
    }
}

impl VolcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

        VolcConfig {
            access_key: non_empty("VOLC_AK"),
            secret_key: non_empty("VOLC_SK"),
            region: non_empty("VOLC_REGION").unwrap_or(defaults.region),
            service: defaults.service,
            host: non_empty("VOLC_HOST").unwrap_or(defaults.host),
            req_key: non_empty("VOLC_REQ_KEY").unwrap_or(defaults.req_key),
        }
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_req_key(mut self, req_key: impl Into<String>) -> Self {
        self.req_key = req_key.into();
        self
    }

    /// Access key with everything past the first four characters hidden.
    pub fn masked_access_key(&self) -> String {
        match &self.access_key {
            Some(key) => {
                let visible: String = key.chars().take(4).collect();
                format!("{}****", visible)
            }
            None => "<unset>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub volc: VolcConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            server: ServerConfig::from_env(),
            volc: VolcConfig::from_env(),
        }
    }

    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    pub fn with_volc(mut self, volc: VolcConfig) -> Self {
        self.volc = volc;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::new();
        assert_eq!(server.host(), "0.0.0.0");
        assert_eq!(server.port(), 8000);

        let server = server.with_host("127.0.0.1").with_port(9090);
        assert_eq!(server.host(), "127.0.0.1");
        assert_eq!(server.port(), 9090);
    }

    #[test]
    fn test_volc_builder() {
        let volc = VolcConfig::new()
            .with_credentials("AKLTexample", "secret")
            .with_req_key("custom_key");

        assert_eq!(volc.access_key.as_deref(), Some("AKLTexample"));
        assert_eq!(volc.req_key, "custom_key");
        assert_eq!(volc.region, "cn-north-1");
        assert_eq!(volc.host, "visual.volcengineapi.com");
        assert_eq!(volc.masked_access_key(), "AKLT****");
    }

    #[test]
    fn test_masked_key_unset() {
        assert_eq!(VolcConfig::new().masked_access_key(), "<unset>");
    }
}
