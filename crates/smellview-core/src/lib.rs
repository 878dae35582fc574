pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod normalize;
pub mod project;
pub mod raw;
pub mod report;
pub mod session;
pub mod util;

use serde_json::Value;

use crate::catalog::CountPolicy;
use crate::error::ReportError;
use crate::session::ReportView;

pub const TOOL_NAME: &str = "smellview";

/// JSON schema version of rendered report documents.
/// Bump only when the document layout changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Normalize and project a raw service report in one step.
///
/// Fails only with `ReportError::InvalidReport`; every other problem in the
/// input is carried as a diagnostic on the returned view.
pub fn view(raw: &Value, policy: CountPolicy) -> Result<ReportView, ReportError> {
    ReportView::build(raw, policy)
}
