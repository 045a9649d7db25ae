use snafu::prelude::*;
use uuid::Uuid;

use crate::common::{SharedLogger, TracingLogger, Warning};
use crate::sweego::{CheckSingleResult, DomainApi};

use super::{
    Applied, Config, CreateSnafu, DeleteSnafu, DesiredDomain, DomainState, Error, ImportSnafu,
    MissingUuidSnafu, ReadBackSnafu, ReadSnafu, RequiresReplaceSnafu, Result, TrackingMode,
    TrackingUpdateSnafu, UnsupportedOperationSnafu,
};

pub const RECONCILER_NAME: &str = "DomainReconciler";

const UNVERIFIED_SUMMARY: &str = "DNS Record not verified";
const CHECK_FAILED_SUMMARY: &str = "Error checking domain status";

/// Drives the lifecycle of a single domain resource against the API.
///
/// Holds no state between operations: every call takes the prior state it
/// needs and returns the state to persist.
pub struct DomainReconciler<A> {
    api: A,
    config: Config,
    logger: SharedLogger,
}

impl<A: DomainApi> DomainReconciler<A> {
    pub fn new(api: A, config: Config) -> Self {
        Self {
            api,
            config,
            logger: TracingLogger::shared(RECONCILER_NAME),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates the domain remotely.
    ///
    /// The API cannot create and configure in one call, and only the create
    /// response is guaranteed to carry the uuid. So: create, push tracking
    /// settings, read back, then pin the uuid from the create response.
    pub fn create(&self, desired: &DesiredDomain) -> Result<Applied> {
        let operation = Uuid::new_v4();
        self.logger.info(&format!(
            "[{operation}] Creating domain {}",
            desired.domain
        ));

        let created = self
            .api
            .create_domain(&desired.domain)
            .context(CreateSnafu {
                domain: &desired.domain,
            })
            .map_err(|err| self.failed(operation, err))?;
        if created.uuid.is_empty() {
            return Err(self.failed(
                operation,
                MissingUuidSnafu {
                    domain: &desired.domain,
                }
                .build(),
            ));
        }
        let uuid = created.uuid;
        self.logger
            .debug(&format!("[{operation}] Domain {} created as {uuid}", desired.domain));

        if self.config.tracking_mode == TrackingMode::Managed {
            self.api
                .update_tracking(&uuid, &desired.tracking_settings())
                .context(TrackingUpdateSnafu { uuid: &uuid })
                .map_err(|err| {
                    self.logger.error(&format!(
                        "[{operation}] Domain {uuid} exists remotely but was not recorded; import it once the API recovers"
                    ));
                    self.failed(operation, err)
                })?;
        }

        let mut details = self
            .api
            .get_domain(&uuid)
            .context(ReadBackSnafu { uuid: &uuid })
            .map_err(|err| self.failed(operation, err))?;
        details.uuid = uuid;
        if details.domain.is_empty() {
            details.domain = desired.domain.clone();
        }

        let state = DomainState::default().merge_response(details);
        Ok(self.applied(operation, state))
    }

    /// Refreshes `prior` from the service. A failure leaves the decision
    /// whether the resource is gone to the caller; see `Error::is_not_found`.
    pub fn read(&self, prior: &DomainState) -> Result<Applied> {
        let operation = Uuid::new_v4();
        self.require_uuid(operation, prior)?;
        self.logger
            .info(&format!("[{operation}] Reading domain {}", prior.uuid));

        let details = self
            .api
            .get_domain(&prior.uuid)
            .context(ReadSnafu { uuid: &prior.uuid })
            .map_err(|err| self.failed(operation, err))?;

        let state = prior.clone().merge_response(details);
        Ok(self.applied(operation, state))
    }

    pub fn update(&self, prior: &DomainState, desired: &DesiredDomain) -> Result<Applied> {
        let operation = Uuid::new_v4();
        if self.config.tracking_mode == TrackingMode::Computed {
            return Err(self.failed(
                operation,
                UnsupportedOperationSnafu {
                    message: "Updating existing domains is not supported",
                }
                .build(),
            ));
        }
        self.require_uuid(operation, prior)?;
        if !prior.domain.is_empty() && prior.domain != desired.domain {
            return Err(self.failed(
                operation,
                RequiresReplaceSnafu {
                    current: &prior.domain,
                    desired: &desired.domain,
                }
                .build(),
            ));
        }

        let uuid = &prior.uuid;
        self.logger.info(&format!(
            "[{operation}] Updating tracking settings of {uuid}"
        ));
        self.api
            .update_tracking(uuid, &desired.tracking_settings())
            .context(TrackingUpdateSnafu { uuid })
            .map_err(|err| self.failed(operation, err))?;

        let mut details = self
            .api
            .get_domain(uuid)
            .context(ReadBackSnafu { uuid })
            .map_err(|err| self.failed(operation, err))?;
        if details.domain.is_empty() {
            details.domain = desired.domain.clone();
        }

        let state = prior.clone().merge_response(details);
        Ok(self.applied(operation, state))
    }

    pub fn delete(&self, prior: &DomainState) -> Result<()> {
        let operation = Uuid::new_v4();
        self.require_uuid(operation, prior)?;
        self.logger
            .info(&format!("[{operation}] Deleting domain {}", prior.uuid));

        self.api
            .delete_domain(&prior.uuid)
            .context(DeleteSnafu { uuid: &prior.uuid })
            .map_err(|err| self.failed(operation, err))
    }

    /// Adopts an existing domain. `id` is its uuid, and it wins over whatever
    /// uuid the response carries.
    pub fn import(&self, id: &str) -> Result<Applied> {
        let operation = Uuid::new_v4();
        if id.is_empty() {
            return Err(self.failed(
                operation,
                MissingUuidSnafu { domain: "(import)" }.build(),
            ));
        }
        self.logger
            .info(&format!("[{operation}] Importing domain {id}"));

        let details = self
            .api
            .get_domain(id)
            .context(ImportSnafu { id })
            .map_err(|err| self.failed(operation, err))?;

        let mut state = DomainState::default().merge_response(details);
        state.uuid = id.to_string();
        Ok(self.applied(operation, state))
    }

    /// Runs the verification check and turns every unverified record into a
    /// warning. Never fails: a failing check is a warning as well.
    pub fn verify(&self, state: &DomainState) -> Vec<Warning> {
        let check = match self.api.check_domain(&state.uuid) {
            Ok(check) => check,
            Err(err) => {
                self.logger
                    .error(&format!("Checking domain {} failed: {err}", state.uuid));
                return vec![Warning {
                    summary: CHECK_FAILED_SUMMARY.into(),
                    detail: format!("{CHECK_FAILED_SUMMARY}: {err}"),
                }];
            }
        };

        let categories = [
            ("DKIM".to_string(), &check.dkim_record),
            ("DMARC".to_string(), &check.dmarc_record),
            ("SPF".to_string(), &check.spf_record),
            ("Tracking".to_string(), &check.tracking_record),
        ];
        let inbound = check
            .inbound_record_list
            .iter()
            .enumerate()
            .map(|(i, result)| (format!("Inbound[{i}]"), result));

        categories
            .into_iter()
            .chain(inbound)
            .filter_map(|(kind, result)| unverified_warning(&state.domain, &kind, result))
            .inspect(|warning| self.logger.info(&warning.detail))
            .collect()
    }

    fn applied(&self, operation: Uuid, state: DomainState) -> Applied {
        let warnings = match self.config.tracking_mode {
            TrackingMode::Managed if self.config.check_records => self.verify(&state),
            _ => Vec::new(),
        };
        self.logger.info(&format!(
            "[{operation}] Domain {} ({}) in sync, verified: {}, warnings: {}",
            state.domain,
            state.uuid,
            state.is_verified,
            warnings.len()
        ));
        Applied { state, warnings }
    }

    fn require_uuid(&self, operation: Uuid, prior: &DomainState) -> Result<()> {
        if prior.uuid.is_empty() {
            return Err(self.failed(
                operation,
                MissingUuidSnafu {
                    domain: &prior.domain,
                }
                .build(),
            ));
        }
        Ok(())
    }

    fn failed(&self, operation: Uuid, err: Error) -> Error {
        self.logger.error(&format!("[{operation}] {err}"));
        err
    }
}

fn unverified_warning(domain: &str, kind: &str, result: &CheckSingleResult) -> Option<Warning> {
    (!result.verified).then(|| Warning {
        summary: UNVERIFIED_SUMMARY.into(),
        detail: format!(
            "Domain {domain} does not have a sweego-verified {kind} Record: {}\n\
             In order to ensure verification, use the DNS-Record information returned by the \
             resource to create a record with your DNS-Provider",
            result.error_string
        ),
    })
}
