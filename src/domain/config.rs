/// Who owns the open/click tracking flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Flags are user input, pushed through the tracking settings endpoint.
    #[default]
    Managed,
    /// Flags are derived by the service; existing domains cannot be updated.
    Computed,
}

pub(crate) fn default_check_records() -> bool {
    true
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking_mode: TrackingMode,
    /// Run the verification check after every successful apply.
    /// Only takes effect with managed tracking.
    #[serde(default = "default_check_records")]
    pub check_records: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracking_mode: TrackingMode::default(),
            check_records: default_check_records(),
        }
    }
}
