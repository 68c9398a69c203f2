//! Push Result

use crate::domain::ports::ApiBinding;
use crate::domain::services::SizeReport;

/// What one push uploaded
#[derive(Debug, Clone)]
pub struct PushOutcome {
    /// Number of this push within the invocation (1 = first)
    pub push_number: u32,
    pub push_id: Option<String>,
    pub bindings: Vec<ApiBinding>,
    pub part_names: Vec<String>,
    pub size: SizeReport,
}
