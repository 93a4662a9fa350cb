//docspace/src/main.rs
//!
//! Replays a JSON-lines script against an in-memory store and prints what a
//! client would render afterwards.
//!
//! usage: docspace [SCRIPT|-] [OWNER_ID] [--stderr]

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use docspace::kernel::services::adapters::{
    ensure_settings_file, load_settings, AsyncRuntime, LogNavigator, LogNotifier, MemoryStore,
};
use docspace::kernel::services::{SyncEngine, SyncHandle, SyncPorts};
use docspace::kernel::view::{trash_listing, ViewCache};
use docspace::kernel::{Route, UserCommand};
use docspace::models::{ChangeEvent, EntityRef, Table};

mod logging;

const DEFAULT_OWNER: &str = "local-user";
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptLine {
    Command { command: UserCommand },
    Remote { table: Table, event: ChangeEvent },
    Select { route: Route },
    Body { target: EntityRef, data: String },
    Wait { ms: u64 },
}

fn main() -> io::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let tee_stderr = match args.iter().position(|a| a == "--stderr") {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    };
    let script_path = args.first().cloned().unwrap_or_else(|| "-".to_string());
    let owner_id = args.get(1).cloned().unwrap_or_else(|| DEFAULT_OWNER.to_string());

    if let Err(e) = ensure_settings_file() {
        eprintln!("settings: {e}");
    }
    let config = load_settings();
    let logging_guard = logging::init(&config.log_filter, tee_stderr);
    if let Some(guard) = &logging_guard {
        tracing::info!(log_dir = %guard.log_dir().display(), "docspace starting");
    }

    let script = read_script(&script_path)?;
    let runtime = AsyncRuntime::new()?;

    let store = Arc::new(MemoryStore::new());
    let ports = SyncPorts {
        documents: store.clone(),
        feed: store.clone(),
        navigator: Arc::new(LogNavigator::new(config.route_prefix.clone())),
        notifier: Arc::new(LogNotifier),
    };
    let mut engine = SyncEngine::new(ports, config, runtime.tokio_handle());
    let handle = engine.handle();

    runtime.block_on(async move {
        if let Err(e) = engine.start(&owner_id).await {
            tracing::warn!(error = %e, "initial hydration failed");
        }
        let engine_task = tokio::spawn(engine.run());

        let mut views = ViewCache::new();
        for (index, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<ScriptLine>(line) {
                Ok(step) => {
                    replay(&handle, &store, step).await;
                    let state = handle.snapshot();
                    let view = views.get(&state);
                    tracing::debug!(line = index + 1, breadcrumb = %view.breadcrumb, "replayed");
                }
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "skipping script line");
                    eprintln!("line {}: {e}", index + 1);
                }
            }
        }

        handle.flush().await;
        if !handle.wait_for_saves(SETTLE_TIMEOUT).await {
            eprintln!("writes still pending after {SETTLE_TIMEOUT:?}");
        }
        handle.flush().await;
        print_view(&handle, &mut views);

        handle.shutdown();
        let _ = engine_task.await;
    });
    Ok(())
}

fn read_script(path: &str) -> io::Result<String> {
    let mut script = String::new();
    if path == "-" {
        io::stdin().lock().read_to_string(&mut script)?;
    } else {
        let file = std::fs::File::open(path)?;
        for line in BufReader::new(file).lines() {
            script.push_str(&line?);
            script.push('\n');
        }
    }
    Ok(script)
}

async fn replay(handle: &SyncHandle, store: &MemoryStore, step: ScriptLine) {
    match step {
        ScriptLine::Command { command } => handle.run_command(command),
        ScriptLine::Remote { table, event } => store.inject(table, event),
        ScriptLine::Select { route } => handle.select(route),
        ScriptLine::Body { target, data } => handle.report_body(target, data),
        ScriptLine::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
    }
    handle.flush().await;
}

fn print_view(handle: &SyncHandle, views: &mut ViewCache) {
    let state = handle.snapshot();
    let counts = state.tree.counts();
    let view = views.get(&state);

    println!("route: {}", handle.route_path(&route_of(&state.selection)));
    println!("breadcrumb: {}", view.breadcrumb);
    if let Some(notice) = &view.trash_notice {
        println!("notice: {notice}");
    }
    println!("status: {}", handle.save_status().label());
    println!(
        "tree: {} workspaces, {} folders, {} files",
        counts.workspaces, counts.folders, counts.files
    );
    for entry in &view.listing {
        let mark = if entry.trashed { " (trash)" } else { "" };
        println!("  {} {} [{}]{}", entry.icon_id, entry.title, entry.id, mark);
    }
    if let Some(workspace_id) = state.selection.workspace_id.as_deref() {
        let trash = trash_listing(&state.tree, workspace_id);
        if !trash.is_empty() {
            println!("trash:");
            for entry in trash {
                println!("  {} {} [{}]", entry.icon_id, entry.title, entry.id);
            }
        }
    }
    tracing::debug!(recomputes = views.recomputes(), "view cache");
    match serde_json::to_string_pretty(&state.tree) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("cannot render tree: {e}"),
    }
}

fn route_of(selection: &docspace::kernel::ViewSelection) -> Route {
    match selection.target() {
        Some(target) => Route::from(&target),
        None => Route::Dashboard,
    }
}
