//! Shared engine state.
//!
//! Construct once at startup, then clone freely: every clone shares the same
//! immutable limits and template catalog. `decide` takes `&self`, so one
//! engine serves any number of threads without locking.

use std::sync::Arc;

use cyconetics_core::error::{CyconeticsError, Result};
use cyconetics_core::protocol::{Decision, Request};

use crate::config::EngineConfig;
use crate::policy::PolicyLimits;
use crate::router::DecisionRouter;
use crate::templates::TemplateCatalog;
use crate::trace::{SequentialTraceIds, TraceIdSource};

#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    cfg: EngineConfig,
    limits: PolicyLimits,
    catalog: TemplateCatalog,
    traces: Arc<dyn TraceIdSource>,
}

impl Engine {
    /// Engine with the builtin catalog and sequential trace ids.
    pub fn new(cfg: EngineConfig) -> Result<Self> {
        let limits = PolicyLimits::from_config(&cfg.policy);
        let catalog = TemplateCatalog::builtin(&limits);
        Self::with_parts(cfg, catalog, Arc::new(SequentialTraceIds::new()))
    }

    /// Engine over an explicit catalog and trace id source.
    pub fn with_parts(
        cfg: EngineConfig,
        catalog: TemplateCatalog,
        traces: Arc<dyn TraceIdSource>,
    ) -> Result<Self> {
        cfg.validate()?;
        let limits = PolicyLimits::from_config(&cfg.policy);

        // catalog <-> kind sanity check
        let missing_objects = catalog.missing_object_kinds();
        let missing_incentives = catalog.missing_incentive_kinds();
        for kind in &missing_objects {
            tracing::warn!(kind = %kind, "no object template registered; requests will fail");
        }
        for kind in &missing_incentives {
            tracing::warn!(kind = %kind, "no incentive template registered; requests will fail");
        }
        if cfg.catalog.fail_fast_on_missing
            && !(missing_objects.is_empty() && missing_incentives.is_empty())
        {
            return Err(CyconeticsError::BadRequest(format!(
                "template catalog incomplete: objects={missing_objects:?} incentives={missing_incentives:?}"
            )));
        }

        tracing::info!(
            risk_ceiling = limits.risk_ceiling,
            hex_stamp = %limits.hex_stamp,
            unknown_fields = ?cfg.overrides.unknown_fields,
            "engine ready"
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                cfg,
                limits,
                catalog,
                traces,
            }),
        })
    }

    pub fn cfg(&self) -> &EngineConfig {
        &self.inner.cfg
    }

    pub fn limits(&self) -> &PolicyLimits {
        &self.inner.limits
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.inner.catalog
    }

    /// Decide one request. Always returns a decision.
    pub fn decide(&self, request: &Request) -> Decision {
        let inner = &*self.inner;
        let trace_id = match request.envelope.trace_id() {
            Some(t) => t.to_string(),
            None => inner.traces.next_trace_id(),
        };
        if let Some(intent) = request.intent {
            tracing::debug!(trace_id = %trace_id, ?intent, "request intent");
        }
        DecisionRouter::new(&inner.limits, &inner.catalog, inner.cfg.overrides.unknown_fields)
            .decide(request, trace_id)
    }
}
