//! Server configuration.

use std::path::PathBuf;

/// Configuration for the taskdeck server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `3000`; `0` auto-assigns, for tests).
    pub port: u16,
    /// Directory of client assets served from the same origin, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            static_dir: None,
        }
    }
}
