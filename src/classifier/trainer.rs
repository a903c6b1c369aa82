//! Training: feeding tokens into class storages.
//!
//! Tokens can be ingested in three ways:
//!
//! - a batch call over an already materialized slice ([`Trainer::add_words`])
//! - a blocking consumer of a `crossbeam-channel` receiver fed by an
//!   independent producer ([`Trainer::add_from_stream`]), optionally
//!   cancellable through a [`CancellationToken`]
//! - a dedicated consumer thread owned by a [`StreamTrainer`] handle, or an
//!   async consumer of a tokio channel ([`Trainer::add_from_async_stream`])
//!
//! Every consumer reads sequentially and stops cleanly once all senders of its
//! channel are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::classifier::registry::ClassifierRegistry;
use crate::error::{NaiveBayesError, Result};
use crate::storage::WordStorage;

/// A cloneable, thread-safe cancellation signal for streaming trainers.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<CancelState>,
}

#[derive(Debug)]
struct CancelState {
    cancelled: AtomicBool,
    // Dropping the sender disconnects `receiver`, which wakes every `select!`.
    sender: Mutex<Option<Sender<()>>>,
    receiver: Receiver<()>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        let (sender, receiver) = bounded(0);
        CancellationToken {
            inner: Arc::new(CancelState {
                cancelled: AtomicBool::new(false),
                sender: Mutex::new(Some(sender)),
                receiver,
            }),
        }
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.sender.lock().take();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    fn receiver(&self) -> &Receiver<()> {
        &self.inner.receiver
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Ingests tokens into the storages of a [`ClassifierRegistry`].
#[derive(Debug, Clone)]
pub struct Trainer {
    registry: Arc<ClassifierRegistry>,
}

impl Trainer {
    /// Create a trainer writing into `registry`.
    pub fn new(registry: Arc<ClassifierRegistry>) -> Self {
        Trainer { registry }
    }

    /// Store every word of `words` for `class`, in order.
    ///
    /// Returns the number of words stored. A storage failure aborts the call;
    /// words stored before the failure stay stored.
    pub fn add_words<S: AsRef<str>>(&self, class: &str, words: &[S]) -> Result<u64> {
        let storage = self.registry.storage_for(class);
        for word in words {
            store_word(storage.as_ref(), class, word.as_ref())?;
        }
        debug!(class, words = words.len(), "trained batch");
        Ok(words.len() as u64)
    }

    /// Store every word received from `receiver` until all senders are dropped.
    ///
    /// Blocks while waiting for the next word. Returns the number of words stored.
    pub fn add_from_stream(&self, class: &str, receiver: Receiver<String>) -> Result<u64> {
        let storage = self.registry.storage_for(class);
        let mut stored = 0u64;
        for word in receiver.iter() {
            store_word(storage.as_ref(), class, &word)?;
            stored += 1;
        }
        debug!(class, words = stored, "stream closed");
        Ok(stored)
    }

    /// Like [`add_from_stream`](Self::add_from_stream), but returns
    /// [`NaiveBayesError::OperationCancelled`] as soon as `cancel` fires.
    ///
    /// Words stored before cancellation are kept.
    pub fn add_from_stream_with_cancel(
        &self,
        class: &str,
        receiver: Receiver<String>,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let storage = self.registry.storage_for(class);
        consume_until_closed(storage.as_ref(), class, &receiver, cancel)
    }

    /// Store every word received from a tokio channel until it is closed.
    pub async fn add_from_async_stream(
        &self,
        class: &str,
        mut receiver: tokio::sync::mpsc::Receiver<String>,
    ) -> Result<u64> {
        let storage = self.registry.storage_for(class);
        let mut stored = 0u64;
        while let Some(word) = receiver.recv().await {
            store_word(storage.as_ref(), class, &word)?;
            stored += 1;
        }
        debug!(class, words = stored, "async stream closed");
        Ok(stored)
    }

    /// Spawn a dedicated consumer thread for `class`.
    ///
    /// `capacity` bounds the channel between producer and consumer; `0` makes
    /// it unbounded.
    pub fn spawn_stream(&self, class: &str, capacity: usize) -> Result<StreamTrainer> {
        let (sender, receiver) = if capacity == 0 {
            unbounded()
        } else {
            bounded(capacity)
        };
        let cancel = CancellationToken::new();
        let storage = self.registry.storage_for(class);

        let thread_class = class.to_string();
        let thread_cancel = cancel.clone();
        let handle = thread::Builder::new()
            .name(format!("naivebayes-train-{class}"))
            .spawn(move || {
                consume_until_closed(storage.as_ref(), &thread_class, &receiver, &thread_cancel)
            })?;

        Ok(StreamTrainer {
            class: class.to_string(),
            sender: Some(sender),
            cancel,
            handle: Some(handle),
        })
    }
}

/// Handle to a consumer thread spawned by [`Trainer::spawn_stream`].
///
/// Dropping the handle without calling [`finish`](Self::finish) closes the
/// channel and detaches the consumer, which exits once every cloned sender is
/// gone as well.
#[derive(Debug)]
pub struct StreamTrainer {
    class: String,
    sender: Option<Sender<String>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<u64>>>,
}

impl StreamTrainer {
    /// Class this trainer writes into.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// A sender for producers running on other threads.
    pub fn sender(&self) -> Option<Sender<String>> {
        self.sender.clone()
    }

    /// Send one word to the consumer, blocking while the channel is full.
    pub fn send<S: Into<String>>(&self, word: S) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| NaiveBayesError::other("stream trainer already finished"))?;
        sender.send(word.into()).map_err(|_| {
            NaiveBayesError::other(format!(
                "stream trainer for class '{}' is no longer receiving",
                self.class
            ))
        })
    }

    /// Ask the consumer to stop without draining the channel.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Close the channel and wait for the consumer to store everything sent.
    ///
    /// Returns the number of words stored, or the error that stopped the consumer.
    pub fn finish(mut self) -> Result<u64> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                NaiveBayesError::ThreadJoinError(format!(
                    "stream trainer for class '{}' panicked",
                    self.class
                ))
            })?,
            None => Ok(0),
        }
    }
}

fn store_word(storage: &dyn WordStorage, class: &str, word: &str) -> Result<()> {
    storage.store(word)?;
    trace!(class, word, "stored word");
    Ok(())
}

fn consume_until_closed(
    storage: &dyn WordStorage,
    class: &str,
    receiver: &Receiver<String>,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut stored = 0u64;
    loop {
        if cancel.is_cancelled() {
            debug!(class, words = stored, "stream training cancelled");
            return Err(NaiveBayesError::cancelled(format!(
                "training of class '{class}' cancelled after {stored} words"
            )));
        }

        select! {
            recv(receiver) -> message => match message {
                Ok(word) => {
                    store_word(storage, class, &word)?;
                    stored += 1;
                }
                Err(_) => break,
            },
            // Only ever fires by disconnection, checked at the top of the loop.
            recv(cancel.receiver()) -> _ => {}
        }
    }

    debug!(class, words = stored, "stream closed");
    Ok(stored)
}
