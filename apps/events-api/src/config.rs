use core_config::{FromEnv, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Directory uploaded event images are written to
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let upload_dir = env_or_default("UPLOAD_DIR", "uploads");

        Ok(Self {
            mongodb,
            server,
            environment,
            upload_dir,
        })
    }
}
