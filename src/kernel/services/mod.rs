//! Services layer (ports + adapters) and the engine that drives the store.
//!
//! - `ports`: contracts the engine depends on (store, change feed, routing).
//! - `adapters`: in-memory store, settings, directories, runtime, console.

pub mod adapters;
pub mod bus;
pub mod engine;
pub mod ports;

pub use bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
pub use engine::{SaveCounter, SyncEngine, SyncHandle, SyncPorts};
