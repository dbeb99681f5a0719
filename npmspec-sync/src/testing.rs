//! In-memory [`Transport`] for tests.
//!
//! Every request is recorded so tests can assert on what went over the
//! wire. URLs that were never registered answer 404.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use crate::transport::{Probe, RegistryResponse, Transport, TransportError};

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Registry { url: String, validator: Option<String> },
    Probe { url: String },
    Download { url: String },
}

#[derive(Debug, Clone)]
enum RegistryReply {
    Body { body: Vec<u8>, etag: Option<String> },
    NotModified,
}

#[derive(Debug, Clone)]
enum ProbeReply {
    Found(Vec<u8>),
    Missing(u16),
    NetworkError,
}

/// Scripted transport; build it with the `with_*` methods.
#[derive(Debug, Default)]
pub struct FakeTransport {
    registry: HashMap<String, RegistryReply>,
    probes: HashMap<String, ProbeReply>,
    downloads: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`. A request whose validator equals `etag` gets
    /// a 304 instead.
    pub fn with_registry_body(mut self, url: &str, body: Vec<u8>, etag: Option<&str>) -> Self {
        self.registry.insert(
            url.to_string(),
            RegistryReply::Body {
                body,
                etag: etag.map(str::to_string),
            },
        );
        self
    }

    /// Always answer 304 at `url`.
    pub fn with_registry_not_modified(mut self, url: &str) -> Self {
        self.registry
            .insert(url.to_string(), RegistryReply::NotModified);
        self
    }

    pub fn with_probe_found(mut self, url: &str, body: &str) -> Self {
        self.probes
            .insert(url.to_string(), ProbeReply::Found(body.as_bytes().to_vec()));
        self
    }

    pub fn with_probe_missing(mut self, url: &str, status: u16) -> Self {
        self.probes.insert(url.to_string(), ProbeReply::Missing(status));
        self
    }

    pub fn with_probe_network_error(mut self, url: &str) -> Self {
        self.probes.insert(url.to_string(), ProbeReply::NetworkError);
        self
    }

    pub fn with_download(mut self, url: &str, body: &[u8]) -> Self {
        self.downloads.insert(url.to_string(), body.to_vec());
        self
    }

    /// Every request made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Validators sent with each registry request, in order.
    pub fn registry_validators(&self) -> Vec<Option<String>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Registry { validator, .. } => Some(validator.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn download_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Download { .. }))
            .count()
    }

    pub fn probe_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Probe { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn not_found(url: &str) -> TransportError {
    TransportError::Status {
        url: url.to_string(),
        status: 404,
    }
}

impl Transport for FakeTransport {
    fn fetch_registry(
        &self,
        url: &str,
        validator: Option<&str>,
    ) -> Result<RegistryResponse, TransportError> {
        self.record(Call::Registry {
            url: url.to_string(),
            validator: validator.map(str::to_string),
        });
        match self.registry.get(url) {
            None => Err(not_found(url)),
            Some(RegistryReply::NotModified) => Ok(RegistryResponse::NotModified),
            Some(RegistryReply::Body { body, etag }) => {
                if validator.is_some() && validator == etag.as_deref() {
                    Ok(RegistryResponse::NotModified)
                } else {
                    Ok(RegistryResponse::Fresh {
                        body: body.clone(),
                        etag: etag.clone(),
                    })
                }
            }
        }
    }

    fn probe(&self, url: &str) -> Result<Probe, TransportError> {
        self.record(Call::Probe {
            url: url.to_string(),
        });
        match self.probes.get(url) {
            None => Ok(Probe::Missing(404)),
            Some(ProbeReply::Found(body)) => Ok(Probe::Found(body.clone())),
            Some(ProbeReply::Missing(status)) => Ok(Probe::Missing(*status)),
            Some(ProbeReply::NetworkError) => Err(TransportError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }

    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError> {
        self.record(Call::Download {
            url: url.to_string(),
        });
        let body = self.downloads.get(url).ok_or_else(|| not_found(url))?;
        sink.write_all(body).map_err(|source| TransportError::Io {
            url: url.to_string(),
            source,
        })?;
        Ok(body.len() as u64)
    }
}
