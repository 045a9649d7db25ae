use std::collections::BTreeMap;

use crate::domain::DomainState;

/// Everything the host remembers between runs, keyed by resource name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct State {
    #[serde(default)]
    pub resources: BTreeMap<String, DomainState>,
}
