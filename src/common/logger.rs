use std::sync::Arc;

/// Sink for request traces and reconciliation decisions.
///
/// Hosts inject their own implementation so the client and reconciler never
/// bind to a concrete logging backend.
pub trait ApiLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

pub type SharedLogger = Arc<dyn ApiLogger>;

/// Forwards to `tracing`, tagging every event with the emitting component.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn shared(component: &'static str) -> SharedLogger {
        Arc::new(Self::new(component))
    }
}

impl ApiLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(component = self.component, "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{message}");
    }
}
