use crate::model::StageConfig;
use serde::Deserialize;

/// Main configuration structure for LinkAmp
///
/// Every section has sensible defaults, so an empty file is a valid
/// configuration pointing at the real third-party endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub stages: StagesConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mode: ModeConfig,
}

/// HTTP client identification and timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Name of the tool, used in the User-Agent header
    #[serde(rename = "agent-name", default = "default_agent_name")]
    pub agent_name: String,

    /// Version advertised in the User-Agent header
    #[serde(rename = "agent-version", default = "default_agent_version")]
    pub agent_version: String,

    /// URL with information about the tool
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Total per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Artificial pacing between pipeline suspension points
///
/// These delays are a courtesy toward third-party endpoints, not a
/// correctness requirement; tests set them to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Delay before each pipeline stage (milliseconds)
    #[serde(rename = "stage-delay-ms", default = "default_stage_delay")]
    pub stage_delay_ms: u64,

    /// Delay before the shortening fallback attempt (milliseconds)
    #[serde(rename = "fallback-delay-ms", default = "default_fallback_delay")]
    pub fallback_delay_ms: u64,
}

/// Default stage toggles for amplification runs
#[derive(Debug, Clone, Deserialize)]
pub struct StagesConfig {
    #[serde(default = "default_true")]
    pub validate: bool,

    #[serde(rename = "search-notify", default = "default_true")]
    pub search_notify: bool,

    #[serde(rename = "aggregator-ping", default = "default_true")]
    pub aggregator_ping: bool,

    #[serde(rename = "short-link", default = "default_true")]
    pub short_link: bool,
}

impl StagesConfig {
    /// Converts the configured toggles into a run-scoped StageConfig
    pub fn to_stage_config(&self) -> StageConfig {
        StageConfig {
            validate: self.validate,
            search_notify: self.search_notify,
            aggregator_ping: self.aggregator_ping,
            short_link: self.short_link,
        }
    }
}

/// Endpoint templates for the remote operation adapters
///
/// Each template contains a `{url}` placeholder that is replaced with the
/// percent-encoded backlink URL. An empty `fetch-proxy` means pages are
/// fetched directly.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// HTML-fetch proxy template; empty string fetches the page directly
    #[serde(rename = "fetch-proxy", default)]
    pub fetch_proxy: String,

    /// Search engine notification endpoint template
    #[serde(rename = "search-notify-url", default = "default_search_notify_url")]
    pub search_notify_url: String,

    /// Substring the notification response must contain to count as accepted
    #[serde(rename = "search-ack-marker", default = "default_search_ack_marker")]
    pub search_ack_marker: String,

    /// Ping aggregator endpoint template
    #[serde(rename = "aggregator-url", default = "default_aggregator_url")]
    pub aggregator_url: String,

    /// Substring confirming the aggregator processed the ping
    #[serde(
        rename = "aggregator-ack-marker",
        default = "default_aggregator_ack_marker"
    )]
    pub aggregator_ack_marker: String,

    /// Primary URL shortener endpoint template
    #[serde(rename = "shortener-url", default = "default_shortener_url")]
    pub shortener_url: String,

    /// Fallback URL shortener endpoint template
    #[serde(
        rename = "shortener-fallback-url",
        default = "default_shortener_fallback_url"
    )]
    pub shortener_fallback_url: String,
}

/// Search engine notification credential
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    /// Bearer credential for the notification service; absent means the
    /// search-notify stage fails with an authentication error
    #[serde(default)]
    pub token: Option<String>,
}

/// Campaign storage location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

/// Operation mode settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeConfig {
    /// Privacy mode forbids the search-notification stage unconditionally
    #[serde(rename = "operation-mode", default)]
    pub operation_mode: OperationMode,
}

/// Whether the tool is allowed to notify search engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    #[default]
    Standard,
    Privacy,
}

impl OperationMode {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Privacy => "privacy",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "privacy" => Some(Self::Privacy),
            _ => None,
        }
    }
}

fn default_agent_name() -> String {
    "LinkAmp".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://github.com/linkamp/linkamp".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_stage_delay() -> u64 {
    500
}

fn default_fallback_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_search_notify_url() -> String {
    "https://www.google.com/ping?sitemap={url}".to_string()
}

fn default_search_ack_marker() -> String {
    "Sitemap notification received".to_string()
}

fn default_aggregator_url() -> String {
    "http://pingomatic.com/ping/?title=New_Content_Update&blogurl={url}&rssurl={url}&chk_weblogscom=on"
        .to_string()
}

fn default_aggregator_ack_marker() -> String {
    "Pinging complete!".to_string()
}

fn default_shortener_url() -> String {
    "https://tinyurl.com/api-create.php?url={url}".to_string()
}

fn default_shortener_fallback_url() -> String {
    "https://is.gd/create.php?format=simple&url={url}".to_string()
}

fn default_database_path() -> String {
    "./linkamp.db".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            agent_version: default_agent_version(),
            contact_url: default_contact_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            stage_delay_ms: default_stage_delay(),
            fallback_delay_ms: default_fallback_delay(),
        }
    }
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            validate: true,
            search_notify: true,
            aggregator_ping: true,
            short_link: true,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            fetch_proxy: String::new(),
            search_notify_url: default_search_notify_url(),
            search_ack_marker: default_search_ack_marker(),
            aggregator_url: default_aggregator_url(),
            aggregator_ack_marker: default_aggregator_ack_marker(),
            shortener_url: default_shortener_url(),
            shortener_fallback_url: default_shortener_fallback_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}
