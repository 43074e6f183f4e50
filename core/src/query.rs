//! Request-deduplicating result cache keyed by query descriptors.
//!
//! # Design
//! A `QueryCache` maps each key to an entry holding the last good value, the
//! last error, and at most one in-flight request. Readers of a key that is
//! already loading join the same `Shared` future instead of issuing another
//! round-trip. Every request is spawned onto the tokio runtime, so a reader
//! that stops waiting never abandons it.
//!
//! Each entry carries a `generation`. `invalidate` bumps it and forgets the
//! in-flight handle; a request that completes under an older generation is
//! discarded rather than written back, so a superseded response can never
//! overwrite newer state.
//!
//! Rendering code reads `state` synchronously. Only `settle` and `fetch`
//! suspend, and only on a network round-trip.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, trace};

use crate::error::TransportError;

type Inflight<V> = Shared<BoxFuture<'static, Result<V, TransportError>>>;

/// What a view can render for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<V> {
    /// No data yet; a request may be in flight.
    Pending,
    /// The last attempt failed, there is no usable data and nothing is
    /// in flight.
    Error(TransportError),
    /// Data is available. `stale` data is due for revalidation; `fetching`
    /// means a newer value is already on its way.
    Success { data: V, stale: bool, fetching: bool },
}

impl<V> QueryState<V> {
    pub fn data(&self) -> Option<&V> {
        match self {
            QueryState::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }
}

struct Entry<V> {
    data: Option<V>,
    error: Option<TransportError>,
    updated_at: Option<Instant>,
    invalidated: bool,
    generation: u64,
    inflight: Option<Inflight<V>>,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            generation: 0,
            inflight: None,
        }
    }
}

impl<V: Clone> Entry<V> {
    fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated || self.updated_at.map_or(true, |at| at.elapsed() >= stale_time)
    }

    /// Whether an observer should start a request. A failed key is left alone
    /// until something invalidates it.
    fn needs_request(&self, stale_time: Duration) -> bool {
        if self.inflight.is_some() {
            return false;
        }
        if self.invalidated {
            return true;
        }
        if self.error.is_some() {
            return false;
        }
        self.data.is_none() || self.is_stale(stale_time)
    }

    fn fresh_data(&self, stale_time: Duration) -> Option<V> {
        if self.is_stale(stale_time) {
            return None;
        }
        self.data.clone()
    }

    fn state(&self, stale_time: Duration) -> QueryState<V> {
        match (&self.data, &self.error) {
            (Some(data), _) => QueryState::Success {
                data: data.clone(),
                stale: self.is_stale(stale_time),
                fetching: self.inflight.is_some(),
            },
            (None, Some(err)) if self.inflight.is_none() => QueryState::Error(err.clone()),
            (None, _) => QueryState::Pending,
        }
    }
}

struct Inner<K, V> {
    name: &'static str,
    stale_time: Duration,
    entries: DashMap<K, Entry<V>>,
}

impl<K, V> Inner<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    fn complete(&self, key: &K, generation: u64, result: &Result<V, TransportError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation {
            debug!(cache = self.name, ?key, generation, "discarding superseded response");
            return;
        }
        entry.inflight = None;
        entry.invalidated = false;
        match result {
            Ok(data) => {
                entry.data = Some(data.clone());
                entry.error = None;
                entry.updated_at = Some(Instant::now());
            }
            Err(err) => {
                entry.error = Some(err.clone());
            }
        }
        trace!(cache = self.name, ?key, ok = result.is_ok(), "query settled");
    }
}

/// Cloneable handle to one shared cache; clones see the same entries.
pub struct QueryCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

enum Lookup<V> {
    Fresh(V),
    Waiting(Inflight<V>),
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, stale_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                stale_time,
                entries: DashMap::new(),
            }),
        }
    }

    /// Current state of `key` without side effects.
    pub fn state(&self, key: &K) -> QueryState<V> {
        self.inner
            .entries
            .get(key)
            .map_or(QueryState::Pending, |entry| entry.state(self.inner.stale_time))
    }

    /// Read `key` as a view would: start a background request if the key was
    /// never loaded, was invalidated, or holds stale data, then return the
    /// current state immediately.
    pub fn observe<F, Fut>(&self, key: K, fetcher: F) -> QueryState<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        self.observe_inflight(&key, &fetcher);
        self.state(&key)
    }

    /// Like `observe`, but wait for any in-flight request and return the
    /// settled state.
    pub async fn settle<F, Fut>(&self, key: K, fetcher: F) -> QueryState<V>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        let mut waiting = self.observe_inflight(&key, &fetcher);
        while let Some(request) = waiting {
            let _ = request.await;
            waiting = self.inflight(&key);
        }
        self.state(&key)
    }

    /// Imperative read: fresh cached data, else the joined or newly started
    /// request's result.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> Result<V, TransportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        match self.lookup(key, fetcher) {
            Lookup::Fresh(data) => Ok(data),
            Lookup::Waiting(request) => request.await,
        }
    }

    /// Mark `key` stale so the next read refetches. A request already in
    /// flight for it will be discarded when it completes.
    pub fn invalidate(&self, key: &K) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            entry.generation += 1;
            entry.invalidated = true;
            entry.inflight = None;
            debug!(cache = self.inner.name, ?key, "invalidated");
        }
    }

    /// Let a failed key be read again. Background observers never retry on
    /// their own; this is for reads a user asked for (opening a view,
    /// reloading the page). Keys that did not fail, or are loading, are left
    /// alone.
    pub fn retry_failed(&self, key: &K) {
        if let Some(mut entry) = self.inner.entries.get_mut(key) {
            if entry.error.is_some() && entry.inflight.is_none() {
                entry.invalidated = true;
                debug!(cache = self.inner.name, ?key, "failed key armed for retry");
            }
        }
    }

    /// Forget every key. Requests still in flight complete without writing
    /// back.
    pub fn clear(&self) {
        self.inner.entries.clear();
    }

    fn lookup<F, Fut>(&self, key: K, fetcher: F) -> Lookup<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        let mut entry = self.inner.entries.entry(key.clone()).or_default();
        if let Some(data) = entry.fresh_data(self.inner.stale_time) {
            trace!(cache = self.inner.name, ?key, "cache hit");
            return Lookup::Fresh(data);
        }
        if let Some(request) = &entry.inflight {
            return Lookup::Waiting(request.clone());
        }
        Lookup::Waiting(self.start(&mut entry, key, fetcher))
    }

    /// Start a request if one is due and return whatever is in flight.
    fn observe_inflight<F, Fut>(&self, key: &K, fetcher: &F) -> Option<Inflight<V>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        let mut entry = self.inner.entries.entry(key.clone()).or_default();
        if entry.needs_request(self.inner.stale_time) {
            self.start(&mut entry, key.clone(), fetcher);
        }
        entry.inflight.clone()
    }

    fn inflight(&self, key: &K) -> Option<Inflight<V>> {
        self.inner.entries.get(key)?.inflight.clone()
    }

    fn start<F, Fut>(&self, entry: &mut Entry<V>, key: K, fetcher: F) -> Inflight<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, TransportError>> + Send + 'static,
    {
        let generation = entry.generation;
        debug!(cache = self.inner.name, ?key, generation, "starting request");

        let inner = Arc::clone(&self.inner);
        let request = fetcher();
        let request = async move {
            let result = request.await;
            inner.complete(&key, generation, &result);
            result
        }
        .boxed()
        .shared();

        entry.inflight = Some(request.clone());
        tokio::spawn(request.clone());
        request
    }
}
