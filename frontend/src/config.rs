use crate::error::FormError;

pub const DEFAULT_API_ENDPOINT: &str = match option_env!("FINANCE_API_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "https://ai-finance-analyzer.onrender.com",
};

const ENDPOINT_KEY: &str = "apiEndpoint";

pub const DASHBOARD_REFRESH_MS: u32 = 30_000;
pub const ANALYTICS_REFRESH_MS: u32 = 60_000;
pub const BANNER_TIMEOUT_MS: u32 = 5_000;
pub const DEMO_DELAY_MS: u32 = 2_000;
pub const RECENT_TRANSACTION_ROWS: usize = 10;
pub const ANOMALY_DISPLAY_LIMIT: usize = 5;
pub const MOVING_AVERAGE_WINDOW: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub api_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
        }
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub fn load_settings() -> Settings {
    let stored = local_storage().and_then(|storage| storage.get_item(ENDPOINT_KEY).ok().flatten());
    settings_from_stored(stored)
}

pub fn save_settings(settings: &Settings) {
    if let Some(storage) = local_storage() {
        if storage.set_item(ENDPOINT_KEY, &settings.api_endpoint).is_err() {
            tracing::warn!("could not persist API endpoint");
        }
    }
}

fn settings_from_stored(stored: Option<String>) -> Settings {
    match stored.as_deref().map(normalize_endpoint) {
        Some(Ok(api_endpoint)) => Settings { api_endpoint },
        Some(Err(err)) => {
            tracing::warn!(error = %err, "ignoring stored API endpoint");
            Settings::default()
        }
        None => Settings::default(),
    }
}

pub fn normalize_endpoint(input: &str) -> Result<String, FormError> {
    let trimmed = input.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(FormError::InvalidEndpoint(trimmed.to_string()));
    }
    let endpoint = trimmed.trim_end_matches('/');
    if endpoint.ends_with("://") {
        return Err(FormError::InvalidEndpoint(trimmed.to_string()));
    }
    Ok(endpoint.to_string())
}
