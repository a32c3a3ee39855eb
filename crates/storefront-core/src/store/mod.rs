//! # Store Module
//!
//! Owns the [`AppState`] and applies [`Action`]s through [`reduce`].
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store::dispatch                                 │
//! │                                                                         │
//! │   Action ──► reduce(&state, action) ──► next state                      │
//! │                                            │                            │
//! │                                 state = next (commit)                   │
//! │                                            │                            │
//! │                                            ▼                            │
//! │               for each subscriber: on_commit(Commit {                   │
//! │                   action, previous, current, changed slices })          │
//! │                                            │                            │
//! │                                            ▼                            │
//! │              PersistenceSubscriber (storefront-db) queues writes        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `dispatch` takes `&mut self`, so two transitions can never interleave.

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::reduce;
pub use state::{AppState, StateSlice};

use tracing::debug;

// =============================================================================
// Subscribers
// =============================================================================

/// What a subscriber sees after a transition commits.
#[derive(Debug)]
pub struct Commit<'a> {
    /// Name of the action that produced this commit.
    pub action: &'static str,
    pub previous: &'a AppState,
    pub current: &'a AppState,
    /// Slices whose value changed. Empty when the action was a no-op.
    pub changed: &'a [StateSlice],
}

impl Commit<'_> {
    /// Whether `slice` changed in this commit.
    pub fn touched(&self, slice: StateSlice) -> bool {
        self.changed.contains(&slice)
    }
}

/// Receives every commit, in dispatch order.
pub trait Subscriber {
    fn on_commit(&mut self, commit: &Commit<'_>);
}

impl<F> Subscriber for F
where
    F: FnMut(&Commit<'_>),
{
    fn on_commit(&mut self, commit: &Commit<'_>) {
        self(commit)
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// =============================================================================
// Store
// =============================================================================

/// The application store.
pub struct Store {
    state: AppState,
    subscribers: Vec<(SubscriptionId, Box<dyn Subscriber + Send>)>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Store::new(AppState::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Store {
    /// Creates a store holding `state`, with no subscribers.
    pub fn new(state: AppState) -> Self {
        Store {
            state,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `action`, commits the result, then notifies subscribers.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        let name = action.name();
        let next = reduce(&self.state, action);
        let previous = std::mem::replace(&mut self.state, next);
        let changed = previous.changed_slices(&self.state);

        debug!(action = name, changed = ?changed, "Dispatched action");

        let commit = Commit {
            action: name,
            previous: &previous,
            current: &self.state,
            changed: &changed,
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber.on_commit(&commit);
        }

        &self.state
    }

    /// Registers a subscriber for all future commits.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber + Send>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    /// Removes a subscriber. Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CartItem;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_end_to_end_cart_scenario() {
        let mut store = Store::new(AppState {
            products: crate::seed::products(),
            ..AppState::default()
        });
        let serum = store.state().product("1").cloned().unwrap();
        assert_eq!(serum.price_paise, 49900);
        assert_eq!(serum.category, "Serum");

        store.dispatch(Action::AddToCart(CartItem::for_product(&serum, 1, None)));
        assert_eq!(store.state().cart.len(), 1);
        assert_eq!(store.state().cart[0].quantity, 1);

        store.dispatch(Action::AddToCart(CartItem::for_product(&serum, 1, None)));
        assert_eq!(store.state().cart.len(), 1);
        assert_eq!(store.state().cart[0].quantity, 2);

        let entry_id = store.state().cart[0].id.clone();
        store.dispatch(Action::RemoveFromCart(entry_id));
        assert!(store.state().cart.is_empty());
    }

    #[test]
    fn test_subscribers_see_committed_state_and_changes() {
        let seen: Arc<Mutex<Vec<(String, Vec<StateSlice>, usize, usize)>>> = Arc::default();
        let sink = Arc::clone(&seen);

        let mut store = Store::default();
        store.subscribe(Box::new(move |commit: &Commit<'_>| {
            sink.lock().unwrap().push((
                commit.action.to_string(),
                commit.changed.to_vec(),
                commit.previous.wishlist.len(),
                commit.current.wishlist.len(),
            ));
        }));

        store.dispatch(Action::AddToWishlist("1".into()));
        store.dispatch(Action::AddToWishlist("1".into()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            ("ADD_TO_WISHLIST".to_string(), vec![StateSlice::Wishlist], 0, 1)
        );
        // no-op still notifies, with nothing changed
        assert_eq!(seen[1], ("ADD_TO_WISHLIST".to_string(), vec![], 1, 1));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);

        let mut store = Store::default();
        let id = store.subscribe(Box::new(move |_: &Commit<'_>| {
            *sink.lock().unwrap() += 1;
        }));

        store.dispatch(Action::ClearCart);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Action::ClearCart);

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
