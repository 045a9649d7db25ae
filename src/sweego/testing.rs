use std::cell::RefCell;
use std::collections::HashMap;

use crate::common::{Error, Result};

use super::{
    CheckResult, CheckSingleResult, DomainApi, DomainDetails, DomainRecord, DomainSummary,
    TrackingSettings,
};

/// In-memory `DomainApi` recording every call it receives.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: RefCell<Vec<String>>,
    pub created: RefCell<DomainDetails>,
    pub details: RefCell<DomainDetails>,
    pub check: RefCell<CheckResult>,
    pub domains: RefCell<Vec<DomainSummary>>,
    failures: HashMap<&'static str, u16>,
}

pub(crate) fn record(name: &str, kind: &str, data: &str) -> DomainRecord {
    DomainRecord {
        name: name.into(),
        kind: kind.into(),
        data: data.into(),
        verified: false,
    }
}

pub(crate) fn verified() -> CheckSingleResult {
    CheckSingleResult {
        verified: true,
        error_string: String::new(),
    }
}

pub(crate) fn all_verified(inbound: usize) -> CheckResult {
    CheckResult {
        dkim_record: verified(),
        dmarc_record: verified(),
        spf_record: verified(),
        tracking_record: verified(),
        inbound_record_list: vec![verified(); inbound],
    }
}

impl FakeApi {
    /// A service where creating `domain` yields `uuid` with no records yet,
    /// and reading it back yields the populated records.
    pub fn with_domain(uuid: &str, domain: &str) -> Self {
        let created = DomainDetails {
            uuid: uuid.into(),
            domain: domain.into(),
            ..Default::default()
        };
        let details = DomainDetails {
            uuid: uuid.into(),
            domain: domain.into(),
            is_verified: false,
            domain_record: record(&format!("_sweego.{domain}"), "TXT", "sweego-verify=1"),
            dkim_record: record(&format!("swg._domainkey.{domain}"), "CNAME", "dkim.sweego.io"),
            dmarc_record: record(&format!("_dmarc.{domain}"), "TXT", "v=DMARC1; p=none"),
            tracking_record: record(&format!("track.{domain}"), "CNAME", "t.sweego.io"),
            inbound_record_list: vec![
                record(domain, "MX", "10 in1.sweego.io"),
                record(domain, "MX", "20 in2.sweego.io"),
            ],
            ..Default::default()
        };
        Self {
            created: RefCell::new(created),
            details: RefCell::new(details),
            check: RefCell::new(all_verified(2)),
            ..Default::default()
        }
    }

    /// Make every call of `operation` fail with `status`.
    pub fn failing(mut self, operation: &'static str, status: u16) -> Self {
        self.failures.insert(operation, status);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn call(&self, operation: &'static str, argument: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("{operation}({argument})"));
        match self.failures.get(operation) {
            Some(404) => Err(Error::NotFoundError {
                method: "FAKE".into(),
                url: operation.into(),
                body: "not found".into(),
            }),
            Some(status) => Err(Error::HttpStatusError {
                method: "FAKE".into(),
                url: operation.into(),
                status: *status,
                body: "fake failure".into(),
            }),
            None => Ok(()),
        }
    }
}

impl DomainApi for FakeApi {
    fn list_domains(&self) -> Result<Vec<DomainSummary>> {
        self.call("list_domains", "")?;
        Ok(self.domains.borrow().clone())
    }

    fn get_domain(&self, uuid: &str) -> Result<DomainDetails> {
        self.call("get_domain", uuid)?;
        Ok(self.details.borrow().clone())
    }

    fn create_domain(&self, domain: &str) -> Result<DomainDetails> {
        self.call("create_domain", domain)?;
        Ok(self.created.borrow().clone())
    }

    fn update_tracking(&self, uuid: &str, settings: &TrackingSettings) -> Result<()> {
        self.call("update_tracking", uuid)?;
        let mut details = self.details.borrow_mut();
        details.tracking_open_enabled = settings.tracking_open_enabled;
        details.tracking_click_enabled = settings.tracking_click_enabled;
        Ok(())
    }

    fn delete_domain(&self, uuid: &str) -> Result<()> {
        self.call("delete_domain", uuid)
    }

    fn check_domain(&self, uuid: &str) -> Result<CheckResult> {
        self.call("check_domain", uuid)?;
        Ok(self.check.borrow().clone())
    }
}
