//! Backend configuration from environment variables.
//!
//! Web builds cannot read a process environment at runtime, so every
//! variable also has a compile-time `option_env!` fallback baked in at
//! build time.

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the hosted backend, e.g. `https://abc.example.co`.
    pub backend_url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
    /// Maps provider key for static map rendering (optional feature).
    pub maps_api_key: Option<String>,
    /// Plaintext admin gate code. A placeholder, not a security
    /// mechanism: the real access control is the backend's row-level
    /// security.
    pub admin_access_code: Option<String>,
}

impl AppConfig {
    /// Load configuration from the environment (`.env` supported).
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let backend_url = var("BACKEND_URL", option_env!("BACKEND_URL"))
            .ok_or("BACKEND_URL not set")?;
        let anon_key = var("BACKEND_ANON_KEY", option_env!("BACKEND_ANON_KEY"))
            .ok_or("BACKEND_ANON_KEY not set")?;

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            anon_key,
            maps_api_key: var("MAPS_API_KEY", option_env!("MAPS_API_KEY")),
            admin_access_code: var("ADMIN_ACCESS_CODE", option_env!("ADMIN_ACCESS_CODE")),
        })
    }

    /// REST endpoint for a table.
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.backend_url, table)
    }

    /// Object storage endpoint for a bucket path.
    pub fn storage_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.backend_url, bucket, path)
    }

    /// Public download URL for an uploaded object.
    pub fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.backend_url, bucket, path
        )
    }

    /// WebSocket URL of the realtime endpoint.
    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.backend_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.backend_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.backend_url.clone()
        };
        format!("{ws_base}/realtime/v1/websocket?apikey={}", self.anon_key)
    }
}

fn var(name: &str, baked: Option<&str>) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| baked.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            backend_url: "https://demo.example.co".into(),
            anon_key: "anon-key".into(),
            maps_api_key: None,
            admin_access_code: None,
        }
    }

    #[test]
    fn urls_are_derived_from_the_base() {
        let config = test_config();
        assert_eq!(
            config.rest_url("cars"),
            "https://demo.example.co/rest/v1/cars"
        );
        assert_eq!(
            config.public_object_url("car-images", "c1/front.jpg"),
            "https://demo.example.co/storage/v1/object/public/car-images/c1/front.jpg"
        );
        assert_eq!(
            config.realtime_url(),
            "wss://demo.example.co/realtime/v1/websocket?apikey=anon-key"
        );
    }
}
