use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::kernel::{Action, PersistRequest, Route, UserCommand};
use crate::models::{ChangeEvent, EntityRef, Table};

use super::ports::StoreError;

/// Everything the engine reacts to arrives as one of these, in order.
#[derive(Debug)]
pub enum KernelMessage {
    Action(Action),
    Command(UserCommand),
    Select(Route),
    Change {
        table: Table,
        event: ChangeEvent,
    },
    BodyEdited {
        target: EntityRef,
        data: String,
    },
    BodyDue {
        target: EntityRef,
        generation: u64,
    },
    Persisted {
        request: PersistRequest,
        result: Result<(), StoreError>,
    },
    /// Answered once every earlier message has been handled.
    Flush(oneshot::Sender<()>),
    Shutdown,
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: UnboundedSender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: UnboundedReceiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    pub fn send_action(&self, action: Action) -> Result<(), SendError<KernelMessage>> {
        self.send(KernelMessage::Action(action))
    }
}

impl KernelBusReceiver {
    pub async fn recv(&mut self) -> Option<KernelMessage> {
        self.rx.recv().await
    }
}
