//! The sync engine: sole owner of the [`Store`], fed by one ordered bus.
//!
//! UI commands, change-feed events, debounce expiries and persistence
//! completions are all handled one message at a time. Writes go to a single
//! writer task that runs them in issue order and reports back through the
//! bus; nothing blocks the loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::kernel::view::{save_status, SaveStatus};
use crate::kernel::{
    reconcile, Action, AppState, Effect, PersistOp, PersistRequest, Planner, Route, Step, Store,
    UserCommand,
};
use crate::models::{EntityRef, Table};

use super::bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
use super::ports::{
    ChangeFeed, DocumentStore, Navigator, Notice, Notifier, StoreError, StoreResult, SyncConfig,
};

pub struct SyncPorts {
    pub documents: Arc<dyn DocumentStore>,
    pub feed: Arc<dyn ChangeFeed>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// Number of writes (and pending body saves) not yet resolved.
#[derive(Clone, Debug, Default)]
pub struct SaveCounter(Arc<AtomicUsize>);

impl SaveCounter {
    pub fn begin(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn end(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    pub fn in_flight(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct SyncEngine {
    store: Store,
    bus: KernelBusSender,
    rx: KernelBusReceiver,
    ports: SyncPorts,
    runtime: Handle,
    saves: SaveCounter,
    writes: mpsc::UnboundedSender<PersistRequest>,
    body_generations: FxHashMap<EntityRef, u64>,
    pending_bodies: FxHashMap<EntityRef, String>,
    config: SyncConfig,
    snapshot_tx: watch::Sender<Arc<AppState>>,
    subscriptions: Vec<JoinHandle<()>>,
}

impl SyncEngine {
    pub fn new(ports: SyncPorts, config: SyncConfig, runtime: Handle) -> Self {
        let (bus, rx) = kernel_bus();
        let store = Store::with_planner(AppState::default(), Planner::from_config(&config));
        let (snapshot_tx, _) = watch::channel(Arc::new(store.state().clone()));
        let writes = spawn_writer(&runtime, Arc::clone(&ports.documents), bus.clone());
        Self {
            store,
            bus,
            rx,
            ports,
            runtime,
            saves: SaveCounter::default(),
            writes,
            body_generations: FxHashMap::default(),
            pending_bodies: FxHashMap::default(),
            config,
            snapshot_tx,
            subscriptions: Vec::new(),
        }
    }

    pub fn handle(&self) -> SyncHandle {
        SyncHandle {
            bus: self.bus.clone(),
            snapshots: self.snapshot_tx.subscribe(),
            saves: self.saves.clone(),
            route_prefix: self.config.route_prefix.clone(),
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Subscribes the three tables, then hydrates the workspaces owned by
    /// `owner_id`. Events arriving meanwhile queue on the bus.
    pub async fn start(&mut self, owner_id: &str) -> StoreResult<()> {
        for table in Table::ALL {
            let mut subscription = self.ports.feed.subscribe(table);
            let bus = self.bus.clone();
            let task = self.runtime.spawn(async move {
                while let Some(event) = subscription.next().await {
                    if bus.send(KernelMessage::Change { table, event }).is_err() {
                        break;
                    }
                }
                tracing::debug!(%table, "change subscription ended");
            });
            self.subscriptions.push(task);
        }

        let workspaces = self
            .ports
            .documents
            .list_workspaces(owner_id.to_string())
            .await?;
        tracing::info!(owner_id, workspaces = workspaces.len(), "workspaces hydrated");
        self.apply(Action::SetWorkspaces { workspaces });
        self.publish();
        Ok(())
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            if !self.handle_message(msg) {
                break;
            }
        }
        self.teardown();
    }

    /// Handles one message to completion. Returns `false` on shutdown.
    pub fn handle_message(&mut self, msg: KernelMessage) -> bool {
        match msg {
            KernelMessage::Action(action) => self.apply(action),
            KernelMessage::Command(command) => {
                let steps = self.store.planner().plan(self.store.state(), command);
                self.run_steps(steps);
            }
            KernelMessage::Select(route) => self.apply(Action::SelectView(route.selection())),
            KernelMessage::Change { table, event } => {
                let steps = reconcile(self.store.state(), table, &event);
                self.run_steps(steps);
            }
            KernelMessage::BodyEdited { target, data } => self.on_body_edited(target, data),
            KernelMessage::BodyDue { target, generation } => self.on_body_due(target, generation),
            KernelMessage::Persisted { request, result } => self.on_persisted(request, result),
            KernelMessage::Flush(done) => {
                let _ = done.send(());
            }
            KernelMessage::Shutdown => {
                self.publish();
                return false;
            }
        }
        self.publish();
        true
    }

    pub fn teardown(&mut self) {
        for task in self.subscriptions.drain(..) {
            task.abort();
        }
        tracing::info!("sync engine stopped");
    }

    fn run_steps(&mut self, steps: Vec<Step>) {
        for step in steps {
            match step {
                Step::Navigate(route) => self.navigate(route),
                Step::Apply(action) => self.apply(action),
                Step::Persist(request) => self.persist(request),
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let result = self.store.dispatch(action);
        let mut loads = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::Navigate(route) => {
                    self.publish();
                    self.ports.navigator.navigate(&route);
                }
                Effect::Persist(request) => self.persist(request),
                load @ (Effect::LoadFolders { .. } | Effect::LoadFiles { .. }) => loads.push(load),
            }
        }
        if !loads.is_empty() {
            self.hydrate(loads);
        }
    }

    /// Runs the listings in order on one task, so folders land before the
    /// files that belong to them.
    fn hydrate(&self, loads: Vec<Effect>) {
        let documents = Arc::clone(&self.ports.documents);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            for load in loads {
                let action = match load {
                    Effect::LoadFolders { workspace_id } => {
                        match documents.list_folders(workspace_id.clone()).await {
                            Ok(folders) => Action::SetFolders {
                                workspace_id,
                                folders,
                            },
                            Err(e) => {
                                tracing::warn!(workspace_id = %workspace_id, error = %e, "load folders failed");
                                continue;
                            }
                        }
                    }
                    Effect::LoadFiles {
                        workspace_id,
                        folder_id,
                    } => match documents.list_files(folder_id.clone()).await {
                        Ok(files) => Action::SetFiles {
                            workspace_id,
                            folder_id,
                            files,
                        },
                        Err(e) => {
                            tracing::warn!(folder_id = %folder_id, error = %e, "load files failed");
                            continue;
                        }
                    },
                    _ => continue,
                };
                if bus.send_action(action).is_err() {
                    break;
                }
            }
        });
    }

    /// Readers see the state as it was just before the route changes; the
    /// selection is recorded afterwards.
    fn navigate(&mut self, route: Route) {
        self.publish();
        tracing::debug!(path = %route.path(&self.config.route_prefix), "navigate");
        self.ports.navigator.navigate(&route);
        self.apply(Action::SelectView(route.selection()));
    }

    fn persist(&mut self, request: PersistRequest) {
        self.saves.begin();
        if let Err(rejected) = self.writes.send(request) {
            tracing::warn!(id = rejected.0.id(), "writer stopped, dropping write");
            self.saves.end();
        }
    }

    fn on_persisted(&mut self, request: PersistRequest, result: Result<(), StoreError>) {
        self.saves.end();
        let kind = request.kind().as_str();
        match result {
            Ok(()) => {
                tracing::debug!(kind, id = request.id(), op = ?request.op(), "persisted");
                if request.op() == PersistOp::Create {
                    self.ports
                        .notifier
                        .notify(Notice::success(format!("Created {kind}.")));
                }
            }
            Err(e) => {
                tracing::warn!(kind, id = request.id(), op = ?request.op(), error = %e, "persist failed");
                let verb = match request.op() {
                    PersistOp::Create => "create",
                    PersistOp::Update => "update",
                    PersistOp::Delete => "delete",
                };
                self.ports.notifier.notify(Notice::error(
                    format!("Could not {verb} the {kind}"),
                    e.to_string(),
                ));
            }
        }
    }

    fn on_body_edited(&mut self, target: EntityRef, data: String) {
        self.saves.begin();
        let generation = self.body_generations.entry(target.clone()).or_insert(0);
        *generation += 1;
        let generation = *generation;
        self.pending_bodies.insert(target.clone(), data);

        let bus = self.bus.clone();
        let delay = self.config.body_debounce();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = bus.send(KernelMessage::BodyDue { target, generation });
        });
    }

    fn on_body_due(&mut self, target: EntityRef, generation: u64) {
        if self.body_generations.get(&target) == Some(&generation) {
            self.body_generations.remove(&target);
            if let Some(data) = self.pending_bodies.remove(&target) {
                let command = UserCommand::SaveBody {
                    target: target.clone(),
                    data,
                };
                let steps = self.store.planner().plan(self.store.state(), command);
                self.run_steps(steps);
            }
        }
        self.saves.end();
    }

    fn publish(&self) {
        let state = self.store.state();
        if self.snapshot_tx.borrow().revision == state.revision {
            return;
        }
        self.snapshot_tx.send_replace(Arc::new(state.clone()));
    }
}

/// Drains write requests one at a time, so a child is never written before
/// its parent and later patches land after earlier ones.
fn spawn_writer(
    runtime: &Handle,
    documents: Arc<dyn DocumentStore>,
    bus: KernelBusSender,
) -> mpsc::UnboundedSender<PersistRequest> {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistRequest>();
    runtime.spawn(async move {
        while let Some(request) = rx.recv().await {
            let result = execute(documents.as_ref(), request.clone()).await;
            if bus.send(KernelMessage::Persisted { request, result }).is_err() {
                break;
            }
        }
        tracing::debug!("writer stopped");
    });
    tx
}

async fn execute(documents: &dyn DocumentStore, request: PersistRequest) -> StoreResult<()> {
    match request {
        PersistRequest::CreateWorkspace(workspace) => documents.create_workspace(workspace).await,
        PersistRequest::CreateFolder(folder) => documents.create_folder(folder).await,
        PersistRequest::CreateFile(file) => documents.create_file(file).await,
        PersistRequest::UpdateWorkspace { id, patch } => documents.update_workspace(id, patch).await,
        PersistRequest::UpdateFolder { id, patch } => documents.update_folder(id, patch).await,
        PersistRequest::UpdateFile { id, patch } => documents.update_file(id, patch).await,
        PersistRequest::DeleteWorkspace { id } => documents.delete_workspace(id).await,
        PersistRequest::DeleteFolder { id } => documents.delete_folder(id).await,
        PersistRequest::DeleteFile { id } => documents.delete_file(id).await,
    }
}

/// Cloneable entry point for UI code. Sends are fire-and-forget; a stopped
/// engine silently drops them.
#[derive(Clone)]
pub struct SyncHandle {
    bus: KernelBusSender,
    snapshots: watch::Receiver<Arc<AppState>>,
    saves: SaveCounter,
    route_prefix: String,
}

impl SyncHandle {
    pub fn run_command(&self, command: UserCommand) {
        let _ = self.bus.send(KernelMessage::Command(command));
    }

    pub fn dispatch(&self, action: Action) {
        let _ = self.bus.send_action(action);
    }

    /// Records a route the router has already entered.
    pub fn select(&self, route: Route) {
        let _ = self.bus.send(KernelMessage::Select(route));
    }

    pub fn report_body(&self, target: EntityRef, data: impl Into<String>) {
        let _ = self.bus.send(KernelMessage::BodyEdited {
            target,
            data: data.into(),
        });
    }

    pub fn shutdown(&self) {
        let _ = self.bus.send(KernelMessage::Shutdown);
    }

    /// Resolves once every message sent before it has been handled.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.bus.send(KernelMessage::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.snapshots.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.clone()
    }

    pub fn save_status(&self) -> SaveStatus {
        save_status(self.saves.in_flight())
    }

    pub fn in_flight(&self) -> usize {
        self.saves.in_flight()
    }

    pub fn route_path(&self, route: &Route) -> String {
        route.path(&self.route_prefix)
    }

    /// Waits until a published snapshot satisfies `pred`. Returns `false` on
    /// timeout or when the engine has stopped.
    pub async fn wait_until<F>(&self, timeout: Duration, pred: F) -> bool
    where
        F: Fn(&AppState) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let wait = async move {
            loop {
                let done = pred(&rx.borrow_and_update());
                if done {
                    return true;
                }
                if rx.changed().await.is_err() {
                    return false;
                }
            }
        };
        tokio::time::timeout(timeout, wait).await.unwrap_or(false)
    }

    /// Waits until no write or body save is pending.
    pub async fn wait_for_saves(&self, timeout: Duration) -> bool {
        let saves = self.saves.clone();
        let wait = async move {
            while saves.in_flight() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}
