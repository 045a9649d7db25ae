use serde::{Deserialize, Deserializer};

use crate::common::DnsRecord;

/// Explicit `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entry of the domain collection.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct DomainSummary {
    pub id: i64,
    pub client_id: i64,
    pub uuid: String,
    #[serde(rename = "creation_dt")]
    pub created_at: String,
    #[serde(rename = "last_verification_dt", default)]
    pub last_verified_at: Option<String>,
    pub tracking_open_enabled: bool,
    pub tracking_click_enabled: bool,
    pub is_verified: bool,
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DomainRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub verified: bool,
}

/// Full view of one domain.
///
/// Every field defaults, since a read issued right after creation can race
/// with provisioning on the service side and come back partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DomainDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_open_enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_click_enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain_record: DomainRecord,
    #[serde(deserialize_with = "null_as_default")]
    pub dkim_record: DomainRecord,
    #[serde(deserialize_with = "null_as_default")]
    pub dmarc_record: DomainRecord,
    #[serde(deserialize_with = "null_as_default")]
    pub inbound_record_list: Vec<DomainRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_record: DomainRecord,
}

#[derive(Debug, Clone, serde::Serialize)]
pub(super) struct CreateDomainRequest<'a> {
    pub domain: &'a str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TrackingSettings {
    pub tracking_open_enabled: bool,
    pub tracking_click_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CheckSingleResult {
    #[serde(deserialize_with = "null_as_default")]
    pub verified: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub error_string: String,
}

/// Verification status of every record the service expects to find.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CheckResult {
    #[serde(deserialize_with = "null_as_default")]
    pub dkim_record: CheckSingleResult,
    #[serde(deserialize_with = "null_as_default")]
    pub dmarc_record: CheckSingleResult,
    #[serde(deserialize_with = "null_as_default")]
    pub spf_record: CheckSingleResult,
    #[serde(deserialize_with = "null_as_default")]
    pub tracking_record: CheckSingleResult,
    #[serde(deserialize_with = "null_as_default")]
    pub inbound_record_list: Vec<CheckSingleResult>,
}

impl From<DomainRecord> for DnsRecord {
    fn from(value: DomainRecord) -> Self {
        DnsRecord {
            kind: value.kind,
            name: value.name,
            data: value.data,
        }
    }
}

impl From<DnsRecord> for DomainRecord {
    fn from(value: DnsRecord) -> Self {
        Self {
            name: value.name,
            kind: value.kind,
            data: value.data,
            verified: false,
        }
    }
}
