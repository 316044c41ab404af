use crate::application::crosshair::SyncMode;
use crate::domain::chart::ChartArea;
use crate::domain::palette::Palette;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Flask backend serving /routes, /route, /compare and /reverse_geocode
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Severe impact threshold in m/s²
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default = "default_bounds_padding")]
    pub bounds_padding: f64,
    #[serde(default)]
    pub crosshair_sync: SyncMode,
    #[serde(default)]
    pub chart_area: ChartArea,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_threshold: default_threshold(),
            palette: Palette::default(),
            bounds_padding: default_bounds_padding(),
            crosshair_sync: SyncMode::default(),
            chart_area: ChartArea::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_threshold() -> f64 {
    8.0
}

fn default_bounds_padding() -> f64 {
    0.1
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from("config/dashboard")
}

/// Reads `path` (any format the config crate knows, optional) and `DASHBOARD__*` overrides.
pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    if !(config.dashboard.default_threshold.is_finite() && config.dashboard.default_threshold > 0.0)
    {
        anyhow::bail!(
            "dashboard.default_threshold must be positive, got {}",
            config.dashboard.default_threshold
        );
    }
    Ok(config)
}
