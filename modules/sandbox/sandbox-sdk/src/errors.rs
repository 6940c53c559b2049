use thiserror::Error;

/// A string that does not name a known model value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseModelError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
