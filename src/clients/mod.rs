//! The ordering client and the ports it talks through.
//!
//! - [`OrderingClient`]: domain wrapper around the session actor's generic client
//! - [`DataService`] / [`SheetDbClient`]: remote catalog, settings and order log
//! - [`ChatHost`] / [`Clipboard`]: the embedding chat application

pub mod chat_host;
pub mod data_service;
pub mod ordering_client;

pub use chat_host::*;
pub use data_service::*;
pub use ordering_client::*;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::session_actor::{NetworkError, NetworkStep};

/// Characters left unescaped by a URI-component encoding.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Runs one network step under `limit`, mapping both failure modes to [`NetworkError`].
pub async fn bounded<T, E, F>(step: NetworkStep, limit: Duration, call: F) -> Result<T, NetworkError>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(NetworkError::failed(step, e)),
        Err(_) => Err(NetworkError::timed_out(step, limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("Auntie Lin's"), "Auntie%20Lin's");
        assert_eq!(encode_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_component("-_.!~*()"), "-_.!~*()");
    }

    #[tokio::test]
    async fn test_bounded_maps_errors_and_timeouts() {
        let ok: Result<u32, NetworkError> =
            bounded(NetworkStep::Persist, Duration::from_secs(1), async { Ok::<_, String>(7) }).await;
        assert_eq!(ok, Ok(7));

        let failed = bounded(NetworkStep::Persist, Duration::from_secs(1), async {
            Err::<(), _>("boom")
        })
        .await;
        assert_eq!(failed, Err(NetworkError::failed(NetworkStep::Persist, "boom")));

        let slow = bounded(NetworkStep::StatusPatch, Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), String>(())
        })
        .await;
        assert_eq!(
            slow,
            Err(NetworkError::TimedOut {
                step: NetworkStep::StatusPatch,
                after_ms: 10
            })
        );
    }
}
