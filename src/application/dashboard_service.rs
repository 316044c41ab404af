// Dashboard service - owns the controller on one task and runs backend calls
use crate::application::action::{Action, Completion, Request};
use crate::application::controller::DashboardController;
use crate::application::dashboard_api::DashboardApi;
use crate::application::report::ReportContent;
use crate::domain::dashboard::ViewSnapshot;
use crate::domain::error::DashboardError;
use crate::infrastructure::config::DashboardSettings;
use anyhow::anyhow;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const CHANNEL_CAPACITY: usize = 100;

enum Envelope {
    Dispatch {
        action: Action,
        reply: Option<oneshot::Sender<ViewSnapshot>>,
    },
    Report {
        reply: oneshot::Sender<Result<ReportContent, DashboardError>>,
    },
}

/// Handle to the dashboard task. The task stops once every handle is dropped.
#[derive(Clone)]
pub struct DashboardService {
    tx: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<ViewSnapshot>,
}

impl DashboardService {
    pub fn spawn(api: Arc<dyn DashboardApi>, settings: &DashboardSettings) -> Self {
        let controller = DashboardController::new(settings);
        let (snapshot_tx, snapshots) = watch::channel(controller.snapshot());
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        tokio::spawn(run(controller, api, rx, tx.downgrade(), snapshot_tx));

        Self { tx, snapshots }
    }

    /// Handles `action` and returns the snapshot right after it. Backend
    /// requests it triggers are still running at that point.
    pub async fn dispatch(&self, action: Action) -> anyhow::Result<ViewSnapshot> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope::Dispatch {
                action,
                reply: Some(reply),
            })
            .await
            .map_err(|_| anyhow!("dashboard task stopped"))?;
        Ok(response.await?)
    }

    pub async fn send(&self, action: Action) -> anyhow::Result<()> {
        self.tx
            .send(Envelope::Dispatch {
                action,
                reply: None,
            })
            .await
            .map_err(|_| anyhow!("dashboard task stopped"))
    }

    pub fn current(&self) -> ViewSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshots.clone()
    }

    pub async fn report(&self) -> anyhow::Result<Result<ReportContent, DashboardError>> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope::Report { reply })
            .await
            .map_err(|_| anyhow!("dashboard task stopped"))?;
        Ok(response.await?)
    }
}

async fn run(
    mut controller: DashboardController,
    api: Arc<dyn DashboardApi>,
    mut rx: mpsc::Receiver<Envelope>,
    completions: mpsc::WeakSender<Envelope>,
    snapshots: watch::Sender<ViewSnapshot>,
) {
    while let Some(envelope) = rx.recv().await {
        match envelope {
            Envelope::Dispatch { action, reply } => {
                for request in controller.handle(action) {
                    perform(api.clone(), completions.clone(), request);
                }
                let snapshot = controller.snapshot();
                snapshots.send_replace(snapshot.clone());
                if let Some(reply) = reply {
                    let _ = reply.send(snapshot);
                }
            }
            Envelope::Report { reply } => {
                let generated_at = chrono::Local::now().naive_local();
                let _ = reply.send(controller.report(generated_at));
            }
        }
    }
    tracing::debug!("Dashboard task stopped");
}

fn perform(api: Arc<dyn DashboardApi>, completions: mpsc::WeakSender<Envelope>, request: Request) {
    tokio::spawn(async move {
        let completion = execute(api.as_ref(), request).await;
        let Some(tx) = completions.upgrade() else {
            tracing::debug!("Dropping completion, dashboard task is gone");
            return;
        };
        let _ = tx
            .send(Envelope::Dispatch {
                action: Action::Completed(completion),
                reply: None,
            })
            .await;
    });
}

async fn execute(api: &dyn DashboardApi, request: Request) -> Completion {
    match request {
        Request::ListRoutes { generation } => Completion::RoutesListed {
            generation,
            result: api.list_routes().await,
        },
        Request::FetchRoute {
            generation,
            id,
            threshold,
        } => Completion::RouteFetched {
            generation,
            result: api.get_route(id, threshold).await,
        },
        Request::FetchComparison {
            generation,
            ids,
            threshold,
        } => Completion::ComparisonFetched {
            generation,
            result: api.compare(&ids, threshold).await,
        },
        Request::DeleteRoute { id } => Completion::RouteDeleted {
            id,
            result: api.delete_route(id).await,
        },
        Request::CreateRoute { route } => Completion::RouteCreated {
            result: api.create_route(route).await,
        },
        Request::ReverseGeocode { marker, at } => Completion::AddressResolved {
            marker,
            result: api.reverse_geocode(at).await,
        },
    }
}
