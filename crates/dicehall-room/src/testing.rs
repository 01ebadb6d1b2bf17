//! In-memory doubles for exercising rooms without a network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use dicehall_protocol::Message;
use tokio::sync::mpsc;

use crate::connection::PlayerConnection;
use crate::dice::{DiceFactory, DiceSource};

// ---------------------------------------------------------------------------
// MockConnection
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MockConnectionError {
    #[error("simulated send failure")]
    SendFailed,

    #[error("connection closed")]
    Closed,
}

/// A [`PlayerConnection`] that records what it is sent and replays
/// whatever is pushed into it.
pub struct MockConnection {
    sent: Mutex<Vec<Message>>,
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    inbound_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Message>>,
    fail_sends: AtomicBool,
    closed: AtomicBool,
}

impl MockConnection {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sent: Mutex::new(Vec::new()),
            inbound_tx: Mutex::new(Some(tx)),
            inbound_rx: tokio::sync::Mutex::new(rx),
            fail_sends: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Every message sent so far, in order.
    pub fn sent(&self) -> Vec<Message> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the sent log.
    pub fn take_sent(&self) -> Vec<Message> {
        std::mem::take(&mut *self.sent.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Type tags of every message sent so far.
    pub fn sent_kinds(&self) -> Vec<&'static str> {
        self.sent().iter().map(Message::kind).collect()
    }

    /// Queues a message for [`receive`](PlayerConnection::receive).
    pub fn push_inbound(&self, message: Message) {
        if let Some(tx) = self
            .inbound_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            let _ = tx.send(message);
        }
    }

    /// Makes every following send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerConnection for MockConnection {
    type Error = MockConnectionError;

    async fn send(&self, message: &Message) -> Result<(), Self::Error> {
        if self.is_closed() {
            return Err(MockConnectionError::Closed);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(MockConnectionError::SendFailed);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }

    async fn receive(&self) -> Result<Option<Message>, Self::Error> {
        Ok(self.inbound_rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.closed.store(true, Ordering::SeqCst);
        // Dropping the sender ends any pending receive once the queue drains.
        self.inbound_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedDice
// ---------------------------------------------------------------------------

/// A [`DiceSource`] that cycles through fixed faces and picks.
///
/// With no faces it always rolls 1; with no picks it always picks 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next_face: usize,
    picks: Vec<usize>,
    next_pick: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks = picks.into_iter().collect();
        self
    }

    /// A factory giving every room its own copy of this script.
    pub fn factory(self) -> DiceFactory {
        std::sync::Arc::new(move || -> Box<dyn DiceSource> { Box::new(self.clone()) })
    }
}

impl DiceSource for ScriptedDice {
    fn roll_face(&mut self) -> u8 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.next_face % self.faces.len()];
        self.next_face += 1;
        face
    }

    fn pick_index(&mut self, upper: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.next_pick % self.picks.len()];
        self.next_pick += 1;
        pick % upper
    }
}
