//! Generation-guarded query slot
//!
//! A slot is the place one panel reads its data from. Every load takes a
//! ticket; only the most recent ticket may commit, so a slow response for
//! superseded parameters never overwrites the result of a newer request.

use super::QueryState;
use parking_lot::Mutex;
use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Proof that a load was started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket(u64);

impl SlotTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

pub struct QuerySlot<T> {
    name: &'static str,
    generation: Mutex<u64>,
    state: watch::Sender<QueryState<T>>,
}

impl<T> QuerySlot<T> {
    pub fn new(name: &'static str) -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self {
            name,
            generation: Mutex::new(0),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a load, superseding any load still in flight
    pub fn begin(&self) -> SlotTicket {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.send_modify(|state| state.begin_fetch());
        SlotTicket(*generation)
    }

    /// Publish a result if its ticket is still current
    pub fn commit(&self, ticket: SlotTicket, state: QueryState<T>) -> bool {
        let generation = self.generation.lock();
        if *generation != ticket.0 {
            debug!(
                "Dropping superseded result for {} (generation {} < {})",
                self.name, ticket.0, *generation
            );
            return false;
        }
        self.state.send_replace(state);
        true
    }

    /// Begin, await `load`, and commit
    pub async fn run<F>(&self, load: F) -> bool
    where
        F: Future<Output = QueryState<T>>,
    {
        let ticket = self.begin();
        let state = load.await;
        self.commit(ticket, state)
    }

    /// Reset to idle, superseding anything in flight
    pub fn reset(&self) {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.state.send_replace(QueryState::idle());
    }

    pub fn current(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::oneshot;

    fn ready(value: u32) -> QueryState<u32> {
        QueryState::success(Arc::new(value), Instant::now(), false)
    }

    #[test]
    fn test_superseded_ticket_cannot_commit() {
        let slot = QuerySlot::new("kpis");
        let old = slot.begin();
        let new = slot.begin();

        assert!(slot.commit(new, ready(2)));
        assert!(!slot.commit(old, ready(1)));
        assert_eq!(slot.current().data.map(|d| *d), Some(2));
    }

    #[test]
    fn test_loading_transitions_once() {
        let slot = QuerySlot::new("events");
        let mut rx = slot.subscribe();
        assert!(slot.current().is_idle());

        let ticket = slot.begin();
        assert!(rx.borrow_and_update().is_loading());

        assert!(slot.commit(ticket, ready(3)));
        let state = rx.borrow_and_update().clone();
        assert!(!state.is_loading());
        assert!(state.is_success());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_discarded() {
        let slot = Arc::new(QuerySlot::new("brand-chart"));
        let (release_old, old_gate) = oneshot::channel::<()>();

        let slow = {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move {
                slot.run(async move {
                    let _ = old_gate.await;
                    ready(1)
                })
                .await
            })
        };

        // Let the slow load take its ticket before the newer one starts
        while slot.current().is_idle() {
            tokio::task::yield_now().await;
        }

        assert!(slot.run(async { ready(2) }).await);
        let _ = release_old.send(());
        assert!(!slow.await.unwrap());
        assert_eq!(slot.current().data.map(|d| *d), Some(2));
    }

    #[test]
    fn test_reset_supersedes_in_flight() {
        let slot: QuerySlot<u32> = QuerySlot::new("event-brands");
        let ticket = slot.begin();
        slot.reset();
        assert!(!slot.commit(ticket, ready(1)));
        assert!(slot.current().is_idle());
    }
}
