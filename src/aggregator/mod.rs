//! View aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! ViewRequest (route + params)
//!     → routes.rs (route declaration, call plan)
//!     → upstream client (all planned calls issued concurrently)
//!     → join: wait for every call to settle
//!     → all ok:   ViewModel with every slot populated
//!       any fail: ViewModel with every slot empty + error string
//!     → Page (template + model), never an Err
//! ```
//!
//! # Design Decisions
//! - All-or-nothing per route: a partial join degrades the whole view
//! - Degraded pages keep their template so navigation stays usable
//! - Single attempt per call; failures are logged, never retried

pub mod request;
pub mod routes;
pub mod view_model;

use futures_util::future::join_all;
use serde_json::Value;

use crate::observability::metrics;
use crate::render::Template;
use crate::upstream::{UpstreamClient, UpstreamError, UpstreamResult};

pub use request::{RouteId, ViewRequest};
pub use routes::{plan, route_spec, PlanError, PlannedCall, RouteSpec, ViewPlan};
pub use view_model::{SlotDecl, SlotKind, ViewModel};

/// A chosen template and the model it renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub route: RouteId,
    pub template: Template,
    pub model: ViewModel,
}

/// Builds pages from upstream data.
#[derive(Debug, Clone)]
pub struct ViewAggregator {
    upstream: UpstreamClient,
}

impl ViewAggregator {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Produce the page for `request`. Upstream failures degrade the model;
    /// this never fails.
    pub async fn aggregate(&self, request: &ViewRequest, request_id: &str) -> Page {
        let spec = route_spec(request.route);

        let plan = match plan(request) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    route = spec.route.as_str(),
                    error = %e,
                    "Cannot plan upstream calls"
                );
                return self.finish(spec, ViewModel::degraded(spec.slots, spec.failure_message));
            }
        };

        let results = join_all(plan.calls.iter().map(|planned| self.fetch_slot(spec, planned))).await;

        let mut values: Vec<(&str, Value)> = Vec::with_capacity(results.len() + plan.echoes.len());
        let mut failed = false;
        for (planned, result) in plan.calls.iter().zip(results) {
            match result {
                Ok(value) => values.push((planned.slot, value)),
                Err(e) => {
                    failed = true;
                    tracing::error!(
                        request_id = %request_id,
                        route = spec.route.as_str(),
                        slot = planned.slot,
                        upstream_path = %planned.call.display_path(),
                        error = %e,
                        "Upstream call failed"
                    );
                }
            }
        }

        let model = if failed {
            ViewModel::degraded(spec.slots, spec.failure_message)
        } else {
            values.extend(plan.echoes.iter().map(|(name, v)| (*name, Value::String(v.clone()))));
            ViewModel::populated(spec.slots, values)
        };

        self.finish(spec, model)
    }

    async fn fetch_slot(&self, spec: &RouteSpec, planned: &PlannedCall) -> UpstreamResult<Value> {
        let payload = self.upstream.execute(&planned.call).await?.unwrap_or(Value::Null);

        let kind = spec.slot_kind(planned.slot).unwrap_or(SlotKind::Entity);
        if !kind.accepts(&payload) {
            return Err(UpstreamError::Malformed(format!(
                "slot '{}' expects {}",
                planned.slot,
                kind.describe()
            )));
        }

        Ok(payload)
    }

    fn finish(&self, spec: &RouteSpec, model: ViewModel) -> Page {
        metrics::record_page(spec.route.as_str(), model.is_degraded());
        Page {
            route: spec.route,
            template: spec.template,
            model,
        }
    }
}
