//! Application configuration: defaults, then `blog.json`, then `BLOG_*`
//! environment variables.

use std::time::Duration;

use blog_core::QueryConfig;
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the `/blogs` backend.
    pub backend_url: String,
    pub listen_addr: String,
    /// Seconds a successful read is served without revalidation.
    pub stale_time_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001".to_string(),
            listen_addr: "127.0.0.1:3000".to_string(),
            stale_time_secs: 5,
        }
    }
}

impl AppConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Json::file("blog.json"))
            .merge(Env::prefixed("BLOG_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_secs(self.stale_time_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_sources() {
        Jail::expect_with(|_jail| {
            assert_eq!(AppConfig::load()?, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "blog.json",
                r#"{ "backend_url": "http://from-file:9000", "stale_time_secs": 30 }"#,
            )?;
            jail.set_env("BLOG_BACKEND_URL", "http://from-env:9001");

            let config = AppConfig::load()?;
            assert_eq!(config.backend_url, "http://from-env:9001");
            assert_eq!(config.stale_time_secs, 30);
            assert_eq!(config.listen_addr, "127.0.0.1:3000");
            assert_eq!(config.query_config().stale_time, Duration::from_secs(30));
            Ok(())
        });
    }
}
