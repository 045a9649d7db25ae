use snafu::{OptionExt, ResultExt};

use crate::common::Warning;
use crate::domain::{plan, Action, DesiredDomain, DomainReconciler, DomainState};
use crate::state::{State, StateFile};
use crate::sweego::{DomainApi, DomainSummary};

use super::{
    AlreadyManagedSnafu, ListSnafu, ReconcileSnafu, Result, StoreSnafu, UnknownResourceSnafu,
};

/// Outcome of `apply` for one resource.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub action: Action,
    pub state: DomainState,
    pub warnings: Vec<Warning>,
}

/// Host side of the lifecycle: plans, calls the reconciler and persists the
/// resulting state.
pub struct Provisioner<A> {
    reconciler: DomainReconciler<A>,
    store: StateFile,
}

impl<A: DomainApi> Provisioner<A> {
    pub fn new(reconciler: DomainReconciler<A>, store: StateFile) -> Self {
        Self { reconciler, store }
    }

    pub fn reconciler(&self) -> &DomainReconciler<A> {
        &self.reconciler
    }

    pub fn store(&self) -> &StateFile {
        &self.store
    }

    pub fn show(&self) -> Result<State> {
        self.store.load().context(StoreSnafu)
    }

    pub fn list_remote(&self) -> Result<Vec<DomainSummary>> {
        self.reconciler.api().list_domains().context(ListSnafu)
    }

    pub fn apply(&self, name: &str, desired: &DesiredDomain) -> Result<Report> {
        let mut state = self.show()?;
        let prior = state.resources.get(name).cloned();
        let action = plan(
            desired,
            prior.as_ref(),
            self.reconciler.config().tracking_mode,
        );
        tracing::info!(resource = name, domain = %desired.domain, %action, "Planned");

        let applied = match (action, prior) {
            (Action::NoOp, Some(prior)) => {
                return Ok(Report {
                    action,
                    state: prior,
                    warnings: Vec::new(),
                })
            }
            (Action::Update, Some(prior)) => self
                .reconciler
                .update(&prior, desired)
                .context(ReconcileSnafu)?,
            (Action::Replace, Some(prior)) => {
                self.reconciler.delete(&prior).context(ReconcileSnafu)?;
                // The old domain is gone; don't keep pointing at it if the
                // create below fails.
                state.resources.remove(name);
                self.store.save(&state).context(StoreSnafu)?;
                self.reconciler.create(desired).context(ReconcileSnafu)?
            }
            _ => self.reconciler.create(desired).context(ReconcileSnafu)?,
        };

        state
            .resources
            .insert(name.to_string(), applied.state.clone());
        self.store.save(&state).context(StoreSnafu)?;

        Ok(Report {
            action,
            state: applied.state,
            warnings: applied.warnings,
        })
    }

    /// Refreshes the stored state. A domain the service no longer knows is
    /// dropped from state and `None` is returned.
    pub fn refresh(&self, name: &str) -> Result<Option<Report>> {
        let mut state = self.show()?;
        let prior = state
            .resources
            .get(name)
            .cloned()
            .context(UnknownResourceSnafu { name })?;

        match self.reconciler.read(&prior) {
            Ok(applied) => {
                state
                    .resources
                    .insert(name.to_string(), applied.state.clone());
                self.store.save(&state).context(StoreSnafu)?;
                Ok(Some(Report {
                    action: Action::NoOp,
                    state: applied.state,
                    warnings: applied.warnings,
                }))
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    resource = name,
                    uuid = %prior.uuid,
                    "Domain no longer exists remotely, dropping it from state"
                );
                state.resources.remove(name);
                self.store.save(&state).context(StoreSnafu)?;
                Ok(None)
            }
            Err(err) => Err(err).context(ReconcileSnafu),
        }
    }

    /// Deletes the domain remotely. The resource is forgotten locally even
    /// when the remote delete fails; the failure is still returned.
    pub fn destroy(&self, name: &str) -> Result<()> {
        let mut state = self.show()?;
        let prior = state
            .resources
            .remove(name)
            .context(UnknownResourceSnafu { name })?;

        let result = self.reconciler.delete(&prior);
        if let Err(err) = &result {
            tracing::error!(
                resource = name,
                uuid = %prior.uuid,
                error = %err,
                "Remote delete failed, forgetting the resource anyway"
            );
        }

        self.store.save(&state).context(StoreSnafu)?;
        result.context(ReconcileSnafu)
    }

    pub fn import(&self, name: &str, id: &str) -> Result<Report> {
        let mut state = self.show()?;
        if let Some(existing) = state.resources.get(name) {
            return AlreadyManagedSnafu {
                name,
                uuid: &existing.uuid,
            }
            .fail();
        }

        let applied = self.reconciler.import(id).context(ReconcileSnafu)?;
        state
            .resources
            .insert(name.to_string(), applied.state.clone());
        self.store.save(&state).context(StoreSnafu)?;

        Ok(Report {
            action: Action::Import,
            state: applied.state,
            warnings: applied.warnings,
        })
    }

    pub fn check(&self, name: &str) -> Result<Vec<Warning>> {
        let state = self.show()?;
        let prior = state
            .resources
            .get(name)
            .context(UnknownResourceSnafu { name })?;
        Ok(self.reconciler.verify(prior))
    }
}
