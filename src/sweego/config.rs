#[derive(Clone, serde::Deserialize)]
pub struct Config {
    pub base_url: Option<url::Url>,
    pub api_key: String,
    pub client_id: String,
    pub timeout_secs: Option<u64>,
}
