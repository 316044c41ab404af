// View mode and user-facing feedback
use super::error::DashboardError;
use super::route::RouteId;
use serde::Serialize;
use std::collections::BTreeSet;

pub const WELCOME_TITLE: &str = "Análise de Sensores";
pub const COMPARE_SELECT_TITLE: &str = "Modo de Comparação: Selecione os Ensaios";
pub const COMPARE_RESULT_TITLE: &str = "Comparação de Ensaios";

/// Exactly one mode is active. `Single(None)` is the empty welcome state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewMode {
    Single { route: Option<RouteId> },
    CompareSelect { selected: BTreeSet<RouteId> },
    CompareResult { selected: BTreeSet<RouteId> },
}

impl ViewMode {
    pub fn welcome() -> Self {
        ViewMode::Single { route: None }
    }

    pub fn compare_select() -> Self {
        ViewMode::CompareSelect {
            selected: BTreeSet::new(),
        }
    }

    pub fn is_comparing(&self) -> bool {
        !matches!(self, ViewMode::Single { .. })
    }

    pub fn active_route(&self) -> Option<RouteId> {
        match self {
            ViewMode::Single { route } => *route,
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&BTreeSet<RouteId>> {
        match self {
            ViewMode::Single { .. } => None,
            ViewMode::CompareSelect { selected } | ViewMode::CompareResult { selected } => {
                Some(selected)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Transport,
    Server,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn from_error(err: &DashboardError) -> Self {
        let kind = match err {
            DashboardError::Transport(_) => AlertKind::Transport,
            DashboardError::Server(_) => AlertKind::Server,
            DashboardError::Validation(_) => AlertKind::Validation,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }

    pub fn with_prefix(prefix: &str, err: &DashboardError) -> Self {
        let mut alert = Self::from_error(err);
        alert.message = format!("{}: {}", prefix, alert.message);
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ValidationError;

    #[test]
    fn test_mode_accessors() {
        assert_eq!(ViewMode::welcome().active_route(), None);
        assert!(!ViewMode::welcome().is_comparing());

        let mode = ViewMode::CompareResult {
            selected: BTreeSet::from([1, 2]),
        };
        assert!(mode.is_comparing());
        assert_eq!(mode.selected().map(|s| s.len()), Some(2));
        assert_eq!(ViewMode::Single { route: Some(4) }.active_route(), Some(4));
    }

    #[test]
    fn test_alert_kinds() {
        let alert = Alert::with_prefix("Erro", &DashboardError::Server("Arquivo vazio.".to_string()));
        assert_eq!(alert.kind, AlertKind::Server);
        assert_eq!(alert.message, "Erro: Arquivo vazio.");

        let alert = Alert::from_error(&ValidationError::NothingToExport.into());
        assert_eq!(alert.kind, AlertKind::Validation);
    }
}
