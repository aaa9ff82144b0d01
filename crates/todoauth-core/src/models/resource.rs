use serde_json::Value;

use crate::api::TransportError;

/// Classified outcome of a request to a protected endpoint.
///
/// A rejected request (`Unauthorized`) and a request that never got a
/// response (`TransportFailure`) are separate variants so callers can tell
/// "the server said no" apart from "the server could not be reached".
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResult {
    /// 2xx response with its parsed payload
    Ok { body: Value },
    /// Any non-2xx response, with a best-effort parsed body
    Unauthorized { status: u16, body: Value },
    /// No response was received
    TransportFailure { error: TransportError },
}

impl ResourceResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResourceResult::Ok { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ResourceResult::Unauthorized { .. })
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, ResourceResult::TransportFailure { .. })
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ResourceResult::Ok { body } | ResourceResult::Unauthorized { body, .. } => Some(body),
            ResourceResult::TransportFailure { .. } => None,
        }
    }
}
