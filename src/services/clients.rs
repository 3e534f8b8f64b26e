//! Client directory access used by the maintenance form and remito view.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::client::Client;
use crate::domain::remito::RemitoContext;
use crate::domain::report::{FIELD_CLIENTE_ID, MaintenanceReport};
use crate::domain::types::RemoteId;
use crate::repository::ClientReader;

/// Backoff schedule for the client list prefetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before each retry, doubling every time.
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries)
            .map(|attempt| self.base_delay * 2u32.pow(attempt))
            .collect()
    }
}

/// Loads the client list, retrying with exponential backoff.
///
/// Gives up silently with an empty list; the form stays usable without it.
pub async fn prefetch_clients<R>(repo: &R, policy: RetryPolicy) -> Vec<Client>
where
    R: ClientReader + ?Sized,
{
    let mut delays = policy.delays().into_iter();

    loop {
        match repo.list_clients().await {
            Ok(clients) => return clients,
            Err(err) => match delays.next() {
                Some(delay) => {
                    log::warn!("Client list fetch failed, retrying in {delay:?}: {err}");
                    tokio::time::sleep(delay).await;
                }
                None => {
                    log::warn!("Giving up on client list prefetch: {err}");
                    return Vec::new();
                }
            },
        }
    }
}

/// Last client list fetched, shared by every form render.
#[derive(Debug)]
pub struct ClientCache {
    entry: Mutex<Option<(Instant, Vec<Client>)>>,
    ttl: Duration,
}

impl ClientCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
        }
    }

    fn fresh(&self, now: Instant) -> Result<Vec<Client>, Vec<Client>> {
        let entry = match self.entry.lock() {
            Ok(entry) => entry,
            Err(poisoned) => poisoned.into_inner(),
        };
        match entry.as_ref() {
            Some((fetched_at, clients)) if now.duration_since(*fetched_at) < self.ttl => {
                Ok(clients.clone())
            }
            Some((_, clients)) => Err(clients.clone()),
            None => Err(Vec::new()),
        }
    }

    fn store(&self, fetched_at: Instant, clients: Vec<Client>) {
        let mut entry = match self.entry.lock() {
            Ok(entry) => entry,
            Err(poisoned) => poisoned.into_inner(),
        };
        *entry = Some((fetched_at, clients));
    }
}

/// Client list for the form, refetched at most once per cache period.
///
/// A failed refetch keeps serving the previous list until the next period,
/// so an outage delays at most one render per period.
pub async fn cached_clients<R>(repo: &R, cache: &ClientCache, policy: RetryPolicy) -> Vec<Client>
where
    R: ClientReader + ?Sized,
{
    let stale = match cache.fresh(Instant::now()) {
        Ok(clients) => return clients,
        Err(stale) => stale,
    };

    let fetched = prefetch_clients(repo, policy).await;
    let clients = if fetched.is_empty() { stale } else { fetched };
    cache.store(Instant::now(), clients.clone());
    clients
}

/// Client display fields for the report's `cliente_id`, if it can be found.
pub async fn find_remito_context<R>(repo: &R, report: &MaintenanceReport) -> Option<RemitoContext>
where
    R: ClientReader + ?Sized,
{
    let id = RemoteId::new(report.field(FIELD_CLIENTE_ID)).ok()?;

    match repo.get_client(&id).await {
        Ok(client) => client.as_ref().map(RemitoContext::from),
        Err(err) => {
            log::error!("Failed to load client {id} for remito context: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn client(id: &str, nombre: &str) -> Client {
        Client {
            id: RemoteId::new(id).unwrap(),
            nombre: nombre.to_string(),
            direccion: None,
            telefono: Some("011-4444".to_string()),
            email: None,
            cuit: None,
        }
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn default_delays_double() {
        assert_eq!(
            RetryPolicy::default().delays(),
            vec![
                Duration::from_millis(500),
                Duration::from_millis(1000),
                Duration::from_millis(2000)
            ]
        );
    }

    #[tokio::test]
    async fn prefetch_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut repo = MockRepository::new();
        repo.expect_list_clients().times(3).returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(RepositoryError::ConnectionError("down".to_string()))
            } else {
                Ok(vec![client("1", "ACME")])
            }
        });

        let clients = prefetch_clients(&repo, no_wait()).await;

        assert_eq!(clients.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn prefetch_gives_up_after_three_retries() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .times(4)
            .returning(|| Err(RepositoryError::ConnectionError("down".to_string())));

        assert!(prefetch_clients(&repo, no_wait()).await.is_empty());
    }

    #[tokio::test]
    async fn cache_serves_fresh_list_without_refetch() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .times(1)
            .returning(|| Ok(vec![client("1", "ACME")]));
        let cache = ClientCache::new(Duration::from_secs(300));

        assert_eq!(cached_clients(&repo, &cache, no_wait()).await.len(), 1);
        assert_eq!(cached_clients(&repo, &cache, no_wait()).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_refetch_keeps_previous_list() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut repo = MockRepository::new();
        repo.expect_list_clients().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(vec![client("1", "ACME")])
            } else {
                Err(RepositoryError::ConnectionError("down".to_string()))
            }
        });
        let cache = ClientCache::new(Duration::ZERO);

        cached_clients(&repo, &cache, no_wait()).await;
        let clients = cached_clients(&repo, &cache, no_wait()).await;

        assert_eq!(clients[0].nombre, "ACME");
        // One success, then the first attempt and three retries.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn outage_is_not_retried_within_the_period() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .times(4)
            .returning(|| Err(RepositoryError::ConnectionError("down".to_string())));
        let cache = ClientCache::new(Duration::from_secs(300));

        assert!(cached_clients(&repo, &cache, no_wait()).await.is_empty());
        assert!(cached_clients(&repo, &cache, no_wait()).await.is_empty());
    }

    #[tokio::test]
    async fn context_lookup_uses_cliente_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_client()
            .withf(|id| id.as_str() == "7")
            .times(1)
            .returning(|_| Ok(Some(client("7", "Aguas del Sur"))));
        let mut report = MaintenanceReport::default();
        report.set_field("cliente_id", "7");

        let context = find_remito_context(&repo, &report).await.unwrap();

        assert_eq!(context.nombre, "Aguas del Sur");
        assert_eq!(context.telefono, "011-4444");
    }

    #[tokio::test]
    async fn context_lookup_without_id_skips_the_platform() {
        let mut repo = MockRepository::new();
        repo.expect_get_client().times(0);

        assert!(find_remito_context(&repo, &MaintenanceReport::default()).await.is_none());
    }
}
