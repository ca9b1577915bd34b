use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// a token on `line` (1-based, counting non-blank lines) is not a non-zero integer
    #[error("line {line}: `{token}` is not a valid literal")]
    MalformedLiteral { line: usize, token: String },

    #[error("formula has no clauses, cannot count variables")]
    EmptyFormula,

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("malformed service response: {0}")]
    MalformedServiceResponse(String),

    #[error("malformed exchange header: `{0}`")]
    MalformedHeader(String),

    #[error("header declares {declared} clauses, found {found}")]
    ClauseCountMismatch { declared: usize, found: usize },
}
