/// Event chain resolver
///
/// Fetches single events and walks `previous` links back to the sentinel.
use crate::{
    blob_store::EventBackend,
    error::{ChainError, ChainResult},
    events::{Event, History, SENTINEL_KEY},
    metrics,
};
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum number of events a single walk may read
    pub max_hops: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { max_hops: 10_000 }
    }
}

/// Resolves event keys against a storage backend
///
/// Holds no state besides the shared backend handle, every call is independent.
#[derive(Clone)]
pub struct EventResolver {
    backend: Arc<dyn EventBackend>,
    config: ResolverConfig,
}

impl EventResolver {
    /// Create a new resolver over `backend`
    pub fn new(backend: Arc<dyn EventBackend>, config: ResolverConfig) -> Self {
        Self { backend, config }
    }

    /// Backend the resolver reads from
    pub fn backend(&self) -> &Arc<dyn EventBackend> {
        &self.backend
    }

    /// Fetch and decode the event stored under `key`
    pub async fn fetch_event(&self, key: &str, deadline: Instant) -> ChainResult<Event> {
        if key.trim().is_empty() {
            return Err(ChainError::BadRequest("Event ID cannot be empty".to_string()));
        }

        self.read_event(key, deadline).await
    }

    /// Walk the chain ending at `head` back to the sentinel
    ///
    /// Any failing hop aborts the whole walk, partial histories are never returned.
    pub async fn resolve_history(&self, head: &str, deadline: Instant) -> ChainResult<History> {
        if head.trim().is_empty() {
            return Err(ChainError::BadRequest(
                "Head event ID cannot be empty".to_string(),
            ));
        }

        match self.walk(head, deadline).await {
            Ok(history) => {
                metrics::record_chain_walk("ok", Some(history.items.len()));
                debug!(head, hops = history.items.len(), "Chain walk completed");
                Ok(history)
            }
            Err(e) => {
                metrics::record_chain_walk(e.kind(), None);
                Err(e)
            }
        }
    }

    async fn walk(&self, head: &str, deadline: Instant) -> ChainResult<History> {
        let mut items = Vec::new();
        let mut cursor = head.to_string();

        while cursor != SENTINEL_KEY {
            let hop = items.len();
            if hop >= self.config.max_hops {
                warn!(head, max_hops = self.config.max_hops, "Chain walk hop limit reached");
                return Err(ChainError::ChainTooLong {
                    head: head.to_string(),
                    max_hops: self.config.max_hops,
                });
            }

            let event = match self.read_event(&cursor, deadline).await {
                Ok(event) => event,
                Err(e) => {
                    warn!(head, hop, key = %cursor, error = %e, "Chain walk aborted");
                    return Err(e);
                }
            };

            // Blank keys are never valid store keys
            if event.previous.trim().is_empty() {
                warn!(head, hop, key = %cursor, "Chain walk hit an event without previous");
                return Err(ChainError::MissingPrevious { key: cursor });
            }

            debug!(hop, key = %cursor, previous = %event.previous, "Followed chain link");
            cursor = event.previous.clone();
            items.push(event);
        }

        Ok(History { items })
    }

    /// One hop: read the raw bytes under `key` and decode them
    async fn read_event(&self, key: &str, deadline: Instant) -> ChainResult<Event> {
        let result = self.read_event_inner(key, deadline).await;
        metrics::record_event_fetch(match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        });
        result
    }

    async fn read_event_inner(&self, key: &str, deadline: Instant) -> ChainResult<Event> {
        if Instant::now() >= deadline {
            return Err(ChainError::DeadlineExceeded {
                key: key.to_string(),
            });
        }

        debug!(key, backend = self.backend.name(), "Fetching event");

        let bytes = match timeout_at(deadline, self.backend.get(key)).await {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => {
                return Err(ChainError::NotFound {
                    key: key.to_string(),
                })
            }
            Ok(Err(source)) => {
                return Err(ChainError::Transport {
                    key: key.to_string(),
                    source,
                })
            }
            Err(_) => {
                return Err(ChainError::DeadlineExceeded {
                    key: key.to_string(),
                })
            }
        };

        debug!(key, payload = %String::from_utf8_lossy(&bytes), "Fetched event payload");

        Event::decode(&bytes).map_err(|source| ChainError::Decode {
            key: key.to_string(),
            source,
        })
    }
}
