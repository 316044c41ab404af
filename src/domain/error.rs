// Error taxonomy surfaced at the action boundary
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Network failure or an unreadable response body
    #[error("{0}")]
    Transport(String),

    /// `{error: ...}` payload reported by the backend
    #[error("{0}")]
    Server(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Selecione pelo menos dois ensaios para comparar.")]
    TooFewRoutes { selected: usize },

    #[error("Por favor, insira um valor numérico válido.")]
    InvalidThreshold(String),

    #[error("Todos os campos e o arquivo são obrigatórios")]
    MissingField(&'static str),

    #[error("Selecione um ensaio ou uma comparação para gerar o relatório.")]
    NothingToExport,
}

impl DashboardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, DashboardError::Validation(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(err.to_string())
    }
}
