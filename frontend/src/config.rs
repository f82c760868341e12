use events_shared::CacheConfig;

const DEFAULT_DATABASE_URL: &str = "http://localhost:9000";

/// Settings baked in at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    pub database_url: String,
    pub database_auth: Option<String>,
    pub cache: CacheConfig,
}

impl FrontendConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("EVENTS_DATABASE_URL"),
            option_env!("EVENTS_DATABASE_AUTH"),
            option_env!("EVENTS_CACHE_TTL_SECS"),
        )
    }

    fn from_values(
        database_url: Option<&str>,
        database_auth: Option<&str>,
        cache_ttl_secs: Option<&str>,
    ) -> Self {
        let cache = match cache_ttl_secs.map(str::parse::<u64>) {
            Some(Ok(ttl_secs)) => CacheConfig { ttl_secs },
            Some(Err(e)) => {
                tracing::warn!("EVENTS_CACHE_TTL_SECS must be a valid number, using default: {}", e);
                CacheConfig::default()
            }
            None => CacheConfig::default(),
        };

        Self {
            database_url: database_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(DEFAULT_DATABASE_URL)
                .to_string(),
            database_auth: database_auth
                .filter(|token| !token.trim().is_empty())
                .map(str::to_string),
            cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events_shared::cache::DEFAULT_TTL_SECS;

    #[test]
    fn test_defaults() {
        let config = FrontendConfig::from_values(None, None, None);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_auth, None);
        assert_eq!(config.cache.ttl_secs, DEFAULT_TTL_SECS);
    }

    #[test]
    fn test_explicit_values() {
        let config = FrontendConfig::from_values(
            Some("https://events-demo.firebaseio.com"),
            Some("secret"),
            Some("60"),
        );
        assert_eq!(config.database_url, "https://events-demo.firebaseio.com");
        assert_eq!(config.database_auth.as_deref(), Some("secret"));
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn test_bad_ttl_falls_back() {
        let config = FrontendConfig::from_values(None, Some(""), Some("soon"));
        assert_eq!(config.database_auth, None);
        assert_eq!(config.cache.ttl_secs, DEFAULT_TTL_SECS);
    }
}
