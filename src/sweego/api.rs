use crate::common::Result;

use super::models::{CheckResult, DomainDetails, DomainSummary, TrackingSettings};

/// Operations of the domain API the reconciler relies on.
///
/// Every method targets the client the implementation is bound to.
pub trait DomainApi {
    fn list_domains(&self) -> Result<Vec<DomainSummary>>;
    fn get_domain(&self, uuid: &str) -> Result<DomainDetails>;
    fn create_domain(&self, domain: &str) -> Result<DomainDetails>;
    fn update_tracking(&self, uuid: &str, settings: &TrackingSettings) -> Result<()>;
    fn delete_domain(&self, uuid: &str) -> Result<()>;
    fn check_domain(&self, uuid: &str) -> Result<CheckResult>;
}
