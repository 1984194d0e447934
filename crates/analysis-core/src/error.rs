use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl AnalysisError {
    /// Terminal errors end the request; nothing else is worth rendering.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisError::SymbolNotFound(_) | AnalysisError::InvalidSymbol(_))
    }
}
