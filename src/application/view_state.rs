// View state machine - single route vs. compare mode coordination
use crate::application::action::{Action, Completion, Request};
use crate::domain::error::{DashboardError, ValidationError};
use crate::domain::route::{ComparisonData, RouteData, RouteId, RouteSummary};
use crate::domain::view::{Alert, ViewMode};
use std::collections::BTreeSet;

/// Side effects the machine asks the controller to carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ClearVisuals,
    RenderRoute { id: RouteId, data: RouteData },
    RenderComparison(ComparisonData),
    ShowRoutes(Vec<RouteSummary>),
    Issue(Request),
    Alert(Alert),
    UploadFeedback(Option<String>),
}

/// The view fetch currently allowed to land, with what it was issued for.
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Route { generation: u64, id: RouteId },
    Comparison { generation: u64, ids: BTreeSet<RouteId> },
}

#[derive(Debug, Clone)]
pub struct ViewStateMachine {
    mode: ViewMode,
    threshold: f64,
    generation: u64,
    pending: Option<Pending>,
    routes_generation: u64,
}

impl ViewStateMachine {
    pub fn new(threshold: f64) -> Self {
        Self {
            mode: ViewMode::welcome(),
            threshold,
            generation: 0,
            pending: None,
            routes_generation: 0,
        }
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::LoadRoutes => vec![self.list_routes()],
            Action::ClickRouteCard(id) => {
                if self.mode.is_comparing() {
                    self.toggle(id)
                } else {
                    self.load_route(id)
                }
            }
            Action::ToggleRoute(id) => self.toggle(id),
            Action::EnterCompare => self.enter_compare(),
            Action::GenerateComparison => self.generate_comparison(),
            Action::CancelCompare => self.cancel_compare(),
            Action::SetThreshold(raw) => self.set_threshold(&raw),
            Action::DeleteRoute(id) => vec![Command::Issue(Request::DeleteRoute { id })],
            Action::CreateRoute(route) => match route.validate() {
                Ok(()) => vec![
                    Command::UploadFeedback(None),
                    Command::Issue(Request::CreateRoute { route }),
                ],
                Err(err) => vec![Command::UploadFeedback(Some(err.to_string()))],
            },
            Action::Completed(completion) => self.complete(completion),
            Action::PointerMove { .. }
            | Action::PointerLeave { .. }
            | Action::ChartClick { .. }
            | Action::ResizeChart { .. }
            | Action::DismissAlert => Vec::new(),
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Invalidates any in-flight view fetch.
    fn abandon_pending(&mut self) {
        self.next_generation();
        self.pending = None;
    }

    fn list_routes(&mut self) -> Command {
        self.routes_generation += 1;
        Command::Issue(Request::ListRoutes {
            generation: self.routes_generation,
        })
    }

    fn load_route(&mut self, id: RouteId) -> Vec<Command> {
        let generation = self.next_generation();
        self.pending = Some(Pending::Route { generation, id });
        self.mode = ViewMode::Single { route: Some(id) };
        vec![Command::Issue(Request::FetchRoute {
            generation,
            id,
            threshold: self.threshold,
        })]
    }

    fn toggle(&mut self, id: RouteId) -> Vec<Command> {
        let mut selected = match &self.mode {
            ViewMode::CompareSelect { selected } | ViewMode::CompareResult { selected } => {
                selected.clone()
            }
            ViewMode::Single { .. } => {
                tracing::debug!("Ignoring route toggle {} outside compare mode", id);
                return Vec::new();
            }
        };
        if !selected.remove(&id) {
            selected.insert(id);
        }
        self.abandon_comparison();
        self.mode = ViewMode::CompareSelect { selected };
        Vec::new()
    }

    /// A comparison in flight no longer matches the selection once it changes.
    fn abandon_comparison(&mut self) {
        if matches!(self.pending, Some(Pending::Comparison { .. })) {
            self.abandon_pending();
        }
    }

    fn enter_compare(&mut self) -> Vec<Command> {
        self.abandon_pending();
        self.mode = ViewMode::compare_select();
        vec![Command::ClearVisuals]
    }

    fn cancel_compare(&mut self) -> Vec<Command> {
        self.abandon_pending();
        self.mode = match self.mode {
            ViewMode::CompareSelect { .. } => ViewMode::welcome(),
            ViewMode::CompareResult { .. } | ViewMode::Single { .. } => ViewMode::compare_select(),
        };
        vec![Command::ClearVisuals]
    }

    fn generate_comparison(&mut self) -> Vec<Command> {
        let Some(selected) = self.mode.selected() else {
            tracing::debug!("Ignoring comparison request outside compare mode");
            return Vec::new();
        };
        if selected.len() < 2 {
            let err = DashboardError::from(ValidationError::TooFewRoutes {
                selected: selected.len(),
            });
            return vec![Command::Alert(Alert::from_error(&err))];
        }
        let ids = selected.clone();
        let generation = self.next_generation();
        let request = Request::FetchComparison {
            generation,
            ids: ids.iter().copied().collect(),
            threshold: self.threshold,
        };
        self.pending = Some(Pending::Comparison { generation, ids });
        vec![Command::Issue(request)]
    }

    fn set_threshold(&mut self, raw: &str) -> Vec<Command> {
        let value = match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => {
                let err = DashboardError::from(ValidationError::InvalidThreshold(raw.to_string()));
                return vec![Command::Alert(Alert::from_error(&err))];
            }
        };
        self.threshold = value;
        match self.mode.active_route() {
            Some(id) => self.load_route(id),
            None => Vec::new(),
        }
    }

    fn complete(&mut self, completion: Completion) -> Vec<Command> {
        match completion {
            Completion::RoutesListed { generation, result } => {
                if generation != self.routes_generation {
                    tracing::debug!("Discarding stale route list (generation {})", generation);
                    return Vec::new();
                }
                match result {
                    Ok(routes) => vec![Command::ShowRoutes(routes)],
                    Err(err) => {
                        tracing::error!("Failed to load routes: {}", err);
                        Vec::new()
                    }
                }
            }
            Completion::RouteFetched { generation, result } => {
                let id = match self.pending {
                    Some(Pending::Route { generation: current, id }) if current == generation => id,
                    _ => {
                        tracing::debug!("Discarding stale route response (generation {})", generation);
                        return Vec::new();
                    }
                };
                self.pending = None;
                let mut commands = vec![Command::ClearVisuals];
                match result {
                    Ok(data) => commands.push(Command::RenderRoute { id, data }),
                    Err(err) => {
                        self.mode = ViewMode::welcome();
                        commands.push(Command::Alert(Alert::with_prefix("Erro", &err)));
                    }
                }
                commands.push(self.list_routes());
                commands
            }
            Completion::ComparisonFetched { generation, result } => {
                let ids = match self.pending.take() {
                    Some(Pending::Comparison {
                        generation: current,
                        ids,
                    }) if current == generation => ids,
                    other => {
                        self.pending = other;
                        tracing::debug!(
                            "Discarding stale comparison response (generation {})",
                            generation
                        );
                        return Vec::new();
                    }
                };
                match result {
                    Ok(data) => {
                        self.mode = ViewMode::CompareResult { selected: ids };
                        vec![Command::ClearVisuals, Command::RenderComparison(data)]
                    }
                    Err(err) => vec![Command::Alert(Alert::with_prefix("Erro ao comparar", &err))],
                }
            }
            Completion::RouteDeleted { id, result } => match result {
                Ok(()) => self.forget_route(id),
                Err(err) => {
                    tracing::error!("Failed to delete route {}: {}", id, err);
                    let err = DashboardError::Transport("Erro ao excluir o ensaio.".to_string());
                    vec![Command::Alert(Alert::from_error(&err))]
                }
            },
            Completion::RouteCreated { result } => match result {
                Ok(()) => vec![Command::UploadFeedback(None), self.list_routes()],
                Err(err) => vec![Command::UploadFeedback(Some(format!("Erro: {}", err)))],
            },
            Completion::AddressResolved { .. } => Vec::new(),
        }
    }

    fn forget_route(&mut self, id: RouteId) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.mode.active_route() == Some(id) {
            self.abandon_pending();
            self.mode = ViewMode::welcome();
            commands.push(Command::ClearVisuals);
        } else {
            let removed = match &mut self.mode {
                ViewMode::CompareSelect { selected } | ViewMode::CompareResult { selected } => {
                    selected.remove(&id)
                }
                ViewMode::Single { .. } => false,
            };
            if removed {
                self.abandon_comparison();
            }
        }
        commands.push(self.list_routes());
        commands
    }
}
