use std::path::PathBuf;

use crate::common::Result;
use crate::domain::{default_check_records, DomainReconciler, TrackingMode};
use crate::service::Provisioner;
use crate::state::StateFile;
use crate::sweego::SweegoClient;

pub const DEFAULT_STATE_FILE: &str = "sweego-state.json";

fn default_state_file() -> PathBuf {
    DEFAULT_STATE_FILE.into()
}

/// Flat settings, so that every key maps onto one `SWEEGO_*` variable.
#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub base_url: Option<url::Url>,
    pub api_key: String,
    pub client_id: String,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub tracking_mode: TrackingMode,
    #[serde(default = "default_check_records")]
    pub check_records: bool,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Config {
    /// Reads `SWEEGO_*` environment variables, e.g. `SWEEGO_API_KEY`.
    #[cfg(feature = "cli")]
    pub fn from_env() -> Result<Self> {
        use crate::common::ConfigSnafu;

        ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("SWEEGO"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|err| {
                ConfigSnafu {
                    prefix: "SWEEGO",
                    message: err.to_string(),
                }
                .build()
            })
    }

    pub fn sweego(&self) -> crate::sweego::Config {
        crate::sweego::Config {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            client_id: self.client_id.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn domain(&self) -> crate::domain::Config {
        crate::domain::Config {
            tracking_mode: self.tracking_mode,
            check_records: self.check_records,
        }
    }

    pub fn client(&self) -> Result<SweegoClient> {
        SweegoClient::try_from(self.sweego())
    }

    pub fn get_service(self) -> Result<Provisioner<SweegoClient>> {
        let reconciler = DomainReconciler::new(self.client()?, self.domain());
        Ok(Provisioner::new(reconciler, StateFile::new(self.state_file)))
    }
}
