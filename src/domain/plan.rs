use super::{DesiredDomain, DomainState, TrackingMode};

/// What has to happen to bring a resource to its desired configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    /// The domain name changed. Destroy the old resource, create a new one.
    Replace,
    /// An existing domain was adopted into state.
    Import,
    NoOp,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Replace => "replace",
            Action::Import => "import",
            Action::NoOp => "no-op",
        })
    }
}

/// The domain name is the identity of a resource: changing it is never an
/// in-place update. An empty stored domain is unknown, not changed.
pub fn plan(desired: &DesiredDomain, prior: Option<&DomainState>, mode: TrackingMode) -> Action {
    let prior = match prior {
        Some(prior) if !prior.uuid.is_empty() => prior,
        _ => return Action::Create,
    };

    if !prior.domain.is_empty() && prior.domain != desired.domain {
        return Action::Replace;
    }

    match mode {
        TrackingMode::Managed if prior.tracking_settings() != desired.tracking_settings() => {
            Action::Update
        }
        _ => Action::NoOp,
    }
}
