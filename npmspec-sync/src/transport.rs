//! HTTP seam.
//!
//! Everything the sync workflow needs from the network goes through
//! [`Transport`]: the registry fetch, the build service probes and the
//! tarball download. [`UreqTransport`] is the blocking production
//! implementation; tests substitute an in-memory fake.

use std::io::{self, Read, Write};
use std::time::Duration;

use thiserror::Error;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// DNS, TLS, connection or protocol failure.
    #[error("GET {url} failed: {message}")]
    Network { url: String, message: String },

    /// Reading the body or writing it to the sink failed.
    #[error("GET {url}: body transfer failed: {source}")]
    Io {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a (possibly conditional) registry request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryResponse {
    /// 2xx with a body. `etag` is the validator to send next time.
    Fresh { body: Vec<u8>, etag: Option<String> },
    /// 304: the validator still matches.
    NotModified,
}

/// Outcome of a build service request where "missing" is an answer, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Found(Vec<u8>),
    Missing(u16),
}

/// Blocking HTTP operations used by the sync workflow.
pub trait Transport {
    /// `GET url` with `accept: application/json`; when `validator` is given
    /// it is sent as `etag` and `if-none-match`.
    fn fetch_registry(
        &self,
        url: &str,
        validator: Option<&str>,
    ) -> Result<RegistryResponse, TransportError>;

    /// `GET url`; any non-success status is [`Probe::Missing`].
    fn probe(&self, url: &str) -> Result<Probe, TransportError>;

    /// `GET url`, streaming the body into `sink`. Returns bytes written.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError>;
}

/// [`Transport`] backed by a shared `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(TIMEOUT)
            .user_agent(concat!("npmspec/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }

    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<ureq::Response, TransportError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }
        match request.call() {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, _)) => Err(TransportError::Status {
                url: url.to_string(),
                status,
            }),
            Err(ureq::Error::Transport(t)) => Err(TransportError::Network {
                url: url.to_string(),
                message: t.to_string(),
            }),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn fetch_registry(
        &self,
        url: &str,
        validator: Option<&str>,
    ) -> Result<RegistryResponse, TransportError> {
        let mut headers = vec![("accept", "application/json")];
        if let Some(etag) = validator {
            headers.push(("etag", etag));
            headers.push(("if-none-match", etag));
        }

        let response = self.get(url, &headers)?;
        match response.status() {
            304 => Ok(RegistryResponse::NotModified),
            200..=299 => {
                let etag = response.header("etag").map(str::to_string);
                let body = read_body(url, response)?;
                Ok(RegistryResponse::Fresh { body, etag })
            }
            status => Err(TransportError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }

    fn probe(&self, url: &str) -> Result<Probe, TransportError> {
        match self.get(url, &[]) {
            Ok(response) if (200..300).contains(&response.status()) => {
                Ok(Probe::Found(read_body(url, response)?))
            }
            Ok(response) => Ok(Probe::Missing(response.status())),
            Err(TransportError::Status { status, .. }) => Ok(Probe::Missing(status)),
            Err(err) => Err(err),
        }
    }

    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        let response = self.get(url, &[])?;
        if !(200..300).contains(&response.status()) {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        let mut reader = response.into_reader();
        io::copy(&mut reader, sink).map_err(|source| TransportError::Io {
            url: url.to_string(),
            source,
        })
    }
}

fn read_body(url: &str, response: ureq::Response) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|source| TransportError::Io {
            url: url.to_string(),
            source,
        })?;
    Ok(body)
}
