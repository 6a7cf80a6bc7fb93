// Stats card - async driver owning one StatsEngine
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_engine::{CardStatus, FetchRequest, StatsEngine};
use crate::application::stats_repository::StatsRepository;
use crate::application::surface::Surface;
use crate::domain::stats::{Category, RenderState};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::WatchStream;

const COMMAND_BUFFER: usize = 32;
const COMPLETION_BUFFER: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("stats card is no longer running")]
    Closed,
    #[error("stats card did not become ready in time")]
    ReadyTimeout,
}

#[derive(Debug)]
enum CardCommand {
    SelectCategory(Category),
    Resize,
    Teardown,
}

struct FetchCompletion<D> {
    request: FetchRequest,
    result: anyhow::Result<Vec<D>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSnapshot<D> {
    pub status: CardStatus,
    pub state: RenderState<D>,
}

/// Cloneable handle to a running card
pub struct CardHandle<V: ChartVariant> {
    commands: mpsc::Sender<CardCommand>,
    snapshots: watch::Receiver<CardSnapshot<V::Datum>>,
}

impl<V: ChartVariant> Clone for CardHandle<V> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<V: ChartVariant> CardHandle<V> {
    pub async fn select_category(&self, category: Category) -> Result<(), CardError> {
        self.send(CardCommand::SelectCategory(category)).await
    }

    /// Tell the card its surface changed size; it re-measures on receipt
    pub async fn notify_resize(&self) -> Result<(), CardError> {
        self.send(CardCommand::Resize).await
    }

    pub async fn teardown(&self) -> Result<(), CardError> {
        self.send(CardCommand::Teardown).await
    }

    pub fn snapshot(&self) -> CardSnapshot<V::Datum> {
        self.snapshots.borrow().clone()
    }

    /// Wait for the first snapshot matching `predicate`, including the current one
    pub async fn wait_for<F>(
        &self,
        timeout: Duration,
        mut predicate: F,
    ) -> Result<CardSnapshot<V::Datum>, CardError>
    where
        F: FnMut(&CardSnapshot<V::Datum>) -> bool,
    {
        let mut snapshots = self.snapshots.clone();
        match tokio::time::timeout(timeout, snapshots.wait_for(|s| predicate(s))).await {
            Ok(Ok(snapshot)) => Ok(snapshot.clone()),
            Ok(Err(_)) => Err(CardError::Closed),
            Err(_) => Err(CardError::ReadyTimeout),
        }
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<CardSnapshot<V::Datum>, CardError> {
        self.wait_for(timeout, |s| s.status == CardStatus::Ready).await
    }

    /// Stream of snapshots, starting with the current one
    pub fn updates(&self) -> WatchStream<CardSnapshot<V::Datum>> {
        WatchStream::new(self.snapshots.clone())
    }

    async fn send(&self, command: CardCommand) -> Result<(), CardError> {
        self.commands.send(command).await.map_err(|_| CardError::Closed)
    }
}

pub struct StatsCard<V: ChartVariant> {
    engine: StatsEngine<V>,
    repository: Arc<dyn StatsRepository>,
    surface: Arc<dyn Surface>,
    commands: mpsc::Receiver<CardCommand>,
    completions_tx: mpsc::Sender<FetchCompletion<V::Datum>>,
    completions: mpsc::Receiver<FetchCompletion<V::Datum>>,
    snapshots: watch::Sender<CardSnapshot<V::Datum>>,
}

impl<V: ChartVariant> StatsCard<V> {
    /// Mount a card: measure the surface, issue the first fetch and run the
    /// event loop on its own task.
    pub fn spawn(repository: Arc<dyn StatsRepository>, surface: Arc<dyn Surface>) -> CardHandle<V> {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completions_tx, completions) = mpsc::channel(COMPLETION_BUFFER);

        let mut engine = StatsEngine::<V>::new();
        let first_request = engine.start(surface.measure_width());
        let (snapshots, snapshots_rx) = watch::channel(Self::snapshot_of(&engine));

        let card = Self {
            engine,
            repository,
            surface,
            commands,
            completions_tx,
            completions,
            snapshots,
        };

        if let Some(request) = first_request {
            card.dispatch(request);
        }

        tracing::info!(card = V::NAME, "stats card mounted");
        tokio::spawn(card.run());

        CardHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(CardCommand::SelectCategory(category)) => {
                        if let Some(request) = self.engine.select_category(category) {
                            self.dispatch(request);
                            self.publish();
                        }
                    }
                    Some(CardCommand::Resize) => {
                        if self.engine.resize(self.surface.measure_width()) {
                            self.publish();
                        }
                    }
                    Some(CardCommand::Teardown) | None => {
                        self.engine.teardown();
                        self.publish();
                        break;
                    }
                },
                Some(completion) = self.completions.recv() => self.on_completion(completion),
            }
        }

        tracing::info!(card = V::NAME, "stats card stopped");
    }

    /// Fetches are never cancelled; a stale result is simply rejected by the engine
    fn dispatch(&self, request: FetchRequest) {
        let repository = self.repository.clone();
        let completions = self.completions_tx.clone();

        tracing::debug!(card = V::NAME, category = %request.category(), "fetching stats");
        tokio::spawn(async move {
            let locale = request.locale().map(str::to_string);
            let result = V::fetch(&*repository, locale.as_deref()).await;
            // Receiver gone means the card was torn down
            let _ = completions.send(FetchCompletion { request, result }).await;
        });
    }

    fn on_completion(&mut self, completion: FetchCompletion<V::Datum>) {
        match completion.result {
            Ok(data) => {
                if self.engine.complete_fetch(&completion.request, data) {
                    self.publish();
                }
            }
            Err(e) => {
                tracing::error!(
                    card = V::NAME,
                    category = %completion.request.category(),
                    "Error fetching stats: {:#}",
                    e
                );
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(Self::snapshot_of(&self.engine));
    }

    fn snapshot_of(engine: &StatsEngine<V>) -> CardSnapshot<V::Datum> {
        CardSnapshot {
            status: engine.status(),
            state: engine.state().clone(),
        }
    }
}
