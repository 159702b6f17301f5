//! The capability-request broker.
//!
//! [`CapabilityBroker`] is the public entry point of this crate. It owns the
//! pending-request table, classifies every requested capability as
//! already-decided, already-pending, or needs-a-new-prompt, and batches the
//! needs-a-new-prompt set into a single platform issuance. Completions are
//! dispatched by name, so out-of-order, merged, or partial callbacks resolve
//! the right waiters.
//!
//! The broker is a cheap handle: clone it freely and hand clones to every
//! caller. All clones share one table, which is what makes coalescing work.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::types::Capability;

/// How one distinct capability name was classified within a single call.
enum Class {
    /// The oracle already knew the answer; no table interaction.
    Decided(bool),
    /// An entry is (now) in the table; waiters subscribe to its broadcast.
    InFlight(broadcast::Sender<Capability>),
}

/// One queued waiter per input name occurrence, in input order.
enum Waiter {
    Ready(Capability),
    Pending(String, broadcast::Receiver<Capability>),
}

/// Asynchronous capability-request broker.
///
/// Wraps a [`Platform`] so that concurrent requests for the same undecided
/// capability share a single outstanding prompt, and every subscriber
/// receives the identical terminal outcome.
#[derive(Clone)]
pub struct CapabilityBroker {
    platform: Arc<dyn Platform>,
    /// Pending-request table: a name is present iff a prompt for it has been
    /// issued and not yet resolved. Lookup-or-insert and lookup-and-remove
    /// both happen under this lock, so classification and dispatch can never
    /// interleave on the same name.
    pending: Arc<Mutex<HashMap<String, broadcast::Sender<Capability>>>>,
}

impl CapabilityBroker {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Request each capability in `names` and resolve them individually.
    ///
    /// Returns one [`Capability`] per input name, in input order, regardless
    /// of the order the platform resolves them internally. Duplicate names
    /// are classified once but still yield one outcome per occurrence.
    ///
    /// Denial is an outcome, not an error; the only caller error is an empty
    /// input sequence.
    pub async fn request_each<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Capability>> {
        if names.is_empty() {
            return Err(Error::EmptyRequest);
        }

        let mut waiters = Vec::with_capacity(names.len());
        let mut to_issue: Vec<String> = Vec::new();

        {
            // Single critical section for the whole batch: lookup-or-insert
            // and subscription happen before any completion can be
            // dispatched, so every waiter observes its terminal value.
            let mut pending = self.pending.lock();
            let mut classified: HashMap<String, Class> = HashMap::new();

            for name in names {
                let name = name.as_ref();
                let class = match classified.entry(name.to_string()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(slot) => {
                        let class = if self.granted(name) {
                            Class::Decided(true)
                        } else if self.revoked(name) {
                            Class::Decided(false)
                        } else {
                            match pending.entry(name.to_string()) {
                                Entry::Occupied(entry) => Class::InFlight(entry.get().clone()),
                                Entry::Vacant(entry) => {
                                    let (tx, _) = broadcast::channel(1);
                                    entry.insert(tx.clone());
                                    to_issue.push(name.to_string());
                                    Class::InFlight(tx)
                                }
                            }
                        };
                        slot.insert(class)
                    }
                };

                waiters.push(match class {
                    Class::Decided(granted) => Waiter::Ready(Capability::new(name, *granted)),
                    Class::InFlight(tx) => Waiter::Pending(name.to_string(), tx.subscribe()),
                });
            }
        }

        // One platform invocation for the whole batch, never one per name.
        if !to_issue.is_empty() {
            self.issue_prompt(to_issue);
        }

        let mut outcomes = Vec::with_capacity(waiters.len());
        for waiter in waiters {
            match waiter {
                Waiter::Ready(cap) => outcomes.push(cap),
                Waiter::Pending(name, mut rx) => match rx.recv().await {
                    Ok(cap) => outcomes.push(cap),
                    Err(_) => return Err(Error::prompt_abandoned(name)),
                },
            }
        }

        Ok(outcomes)
    }

    /// Request every capability in `names` and reduce to a single flag.
    ///
    /// Returns `true` iff every outcome is granted. Waits for the full batch
    /// before deciding; a denial does not short-circuit, since outcomes for
    /// names already in flight from earlier batches may resolve later.
    pub async fn request_all<S: AsRef<str>>(&self, names: &[S]) -> Result<bool> {
        let outcomes = self.request_each(names).await?;
        Ok(outcomes.iter().all(|cap| cap.granted))
    }

    /// Whether an explanation should be shown before requesting `names`.
    ///
    /// Evaluates each name in order and short-circuits to `false` on the
    /// first one that is not granted and for which the platform reports no
    /// rationale. Constant `false` on platform levels without runtime
    /// prompts. This intentionally aggregates differently from
    /// [`request_all`](Self::request_all): it answers "should I explain right
    /// now", not "did everything succeed".
    pub fn should_explain_before_requesting<S: AsRef<str>>(&self, names: &[S]) -> bool {
        if !self.platform.supports_runtime_prompts() {
            return false;
        }

        for name in names {
            let name = name.as_ref();
            if !self.platform.is_granted(name) && !self.platform.should_show_rationale(name) {
                return false;
            }
        }

        true
    }

    /// Dispatch a platform completion callback.
    ///
    /// `names` and `grants` are the callback's positionally paired parallel
    /// arrays; the batch may cover any subset or rearrangement of one or more
    /// issuances. Each pair resolves its pending entry exactly once and
    /// retires it from the table.
    ///
    /// A pair naming a capability with no pending entry means the broker's
    /// and platform's bookkeeping have desynchronized; the error is returned
    /// and no recovery is attempted. Pairs dispatched before the bad one
    /// stay resolved, since delivery cannot be recalled.
    pub fn on_result(&self, names: &[String], grants: &[bool]) -> Result<()> {
        if names.len() != grants.len() {
            return Err(Error::MismatchedCompletion {
                names: names.len(),
                grants: grants.len(),
            });
        }

        let mut pending = self.pending.lock();
        for (name, granted) in names.iter().zip(grants.iter().copied()) {
            let tx = pending
                .remove(name)
                .ok_or_else(|| Error::unexpected_result(name.as_str()))?;

            debug!(capability = %name, granted, "resolving capability");
            // Publish the single terminal value; dropping the sender closes
            // the channel for every subscriber.
            if tx.send(Capability::new(name.clone(), granted)).is_err() {
                debug!(capability = %name, "no subscribers for capability outcome");
            }
        }

        Ok(())
    }

    /// Number of capabilities with an outstanding platform prompt.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether `name` currently has an outstanding platform prompt.
    pub fn has_pending(&self, name: &str) -> bool {
        self.pending.lock().contains_key(name)
    }

    /// Issue one platform prompt for `names` and bridge its completion back
    /// into the dispatcher. The requesting flow never blocks on this; it
    /// suspends on its subscriptions instead.
    fn issue_prompt(&self, names: Vec<String>) {
        debug!(capabilities = ?names, "issuing platform prompt");
        let broker = self.clone();
        tokio::spawn(async move {
            let completion = broker.platform.request_capabilities(names).await;
            if let Err(err) = broker.on_result(&completion.names, &completion.grants) {
                error!(error = %err, "failed to dispatch prompt completion");
                panic!("failed to dispatch prompt completion: {err}");
            }
        });
    }

    fn granted(&self, name: &str) -> bool {
        // Below the runtime-prompt platform level every capability is
        // implicitly granted.
        !self.platform.supports_runtime_prompts() || self.platform.is_granted(name)
    }

    fn revoked(&self, name: &str) -> bool {
        self.platform.supports_runtime_prompts() && self.platform.is_revoked(name)
    }
}
