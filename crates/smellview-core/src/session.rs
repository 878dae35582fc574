//! The single "current report" slot.
//!
//! Each accepted response replaces the slot wholesale. Reports are never
//! merged; a response that fails to normalize clears the slot so the caller
//! shows the empty state. Overlapping submissions are not ordered: whichever
//! response is accepted last is what the slot holds.

use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::CountPolicy;
use crate::error::ReportError;
use crate::normalize::{NormalizedReport, normalize};
use crate::project::{Projection, project};

/// A normalized report together with its projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub normalized: NormalizedReport,
    pub projection: Projection,
}

impl ReportView {
    pub fn build(raw: &Value, policy: CountPolicy) -> Result<Self, ReportError> {
        let normalized = normalize(raw, policy)?;
        let projection = project(&normalized);
        Ok(Self {
            normalized,
            projection,
        })
    }
}

#[derive(Debug, Default)]
pub struct ReportSlot {
    policy: CountPolicy,
    current: Option<ReportView>,
}

impl ReportSlot {
    pub fn new(policy: CountPolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// Replace the slot with the view built from `raw`.
    ///
    /// On `InvalidReport` the slot is emptied and the error is returned so the
    /// caller can surface it once.
    pub fn accept(&mut self, raw: &Value) -> Result<&ReportView, ReportError> {
        match ReportView::build(raw, self.policy) {
            Ok(view) => {
                debug!(total = view.normalized.total, "replacing current report");
                Ok(&*self.current.insert(view))
            }
            Err(err) => {
                warn!(%err, "clearing current report");
                self.current = None;
                Err(err)
            }
        }
    }

    pub fn current(&self) -> Option<&ReportView> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
