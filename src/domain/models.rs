use crate::common::{DnsRecord, Warning};
use crate::sweego::{DomainDetails, TrackingSettings};

/// Desired configuration of a domain, as declared by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DesiredDomain {
    pub domain: String,
    #[serde(default)]
    pub open_tracking_enabled: Option<bool>,
    #[serde(default)]
    pub click_tracking_enabled: Option<bool>,
}

impl DesiredDomain {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// Unset flags mean tracking is disabled.
    pub fn tracking_settings(&self) -> TrackingSettings {
        TrackingSettings {
            tracking_open_enabled: self.open_tracking_enabled.unwrap_or(false),
            tracking_click_enabled: self.click_tracking_enabled.unwrap_or(false),
        }
    }
}

/// Persisted state of one domain resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DomainState {
    pub uuid: String,
    pub domain: String,
    pub is_verified: bool,
    pub open_tracking_enabled: bool,
    pub click_tracking_enabled: bool,
    pub domain_record: DnsRecord,
    pub dkim_record: DnsRecord,
    pub dmarc_record: DnsRecord,
    pub tracking_record: DnsRecord,
    pub inbound_record_list: Vec<DnsRecord>,
}

impl DomainState {
    /// Overwrites every field from the response. The uuid and domain are only
    /// taken over when the response carries them, so a known identity is never
    /// cleared by a partial read.
    pub fn merge_response(mut self, response: DomainDetails) -> Self {
        if !response.uuid.is_empty() {
            self.uuid = response.uuid;
        }
        if !response.domain.is_empty() {
            self.domain = response.domain;
        }
        self.is_verified = response.is_verified;
        self.open_tracking_enabled = response.tracking_open_enabled;
        self.click_tracking_enabled = response.tracking_click_enabled;
        self.domain_record = response.domain_record.into();
        self.dkim_record = response.dkim_record.into();
        self.dmarc_record = response.dmarc_record.into();
        self.tracking_record = response.tracking_record.into();
        self.inbound_record_list = response
            .inbound_record_list
            .into_iter()
            .map(DnsRecord::from)
            .collect();
        self
    }

    pub fn tracking_settings(&self) -> TrackingSettings {
        TrackingSettings {
            tracking_open_enabled: self.open_tracking_enabled,
            tracking_click_enabled: self.click_tracking_enabled,
        }
    }
}

/// Result of a successful operation: the state to persist plus any
/// verification warnings raised along the way.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Applied {
    pub state: DomainState,
    pub warnings: Vec<Warning>,
}
