//! Build service check: is the package already tracked in the devel project?
//!
//! Two sequential requests against the Open Build Service API:
//!
//! 1. `GET <api>/source/<project>/<package>`: any non-success status means
//!    the package is not tracked.
//! 2. `GET <api>/build/<project>/<repository>/<arch>/_repository/<package>?view=fileinfo`
//!    carries the version in the `<version>` element of its `<fileinfo>`.

use npmspec_core::Config;

use crate::error::SyncError;
use crate::transport::{Probe, Transport};

/// Result of the tracking check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracking {
    /// No source package in the project.
    Untracked,
    /// Tracked; the version is empty when the build service could not tell.
    Tracked(String),
}

/// Check whether `rpm_name` (`nodejs-foo`) already exists in the configured
/// build service project.
///
/// Network-level errors propagate; a clean non-success answer does not.
pub fn tracked_version(
    transport: &dyn Transport,
    config: &Config,
    rpm_name: &str,
) -> Result<Tracking, SyncError> {
    let api = config.obs_api.trim_end_matches('/');

    tracing::debug!("checking {}", config.obs_project);
    let source_url = format!("{api}/source/{}/{rpm_name}", config.obs_project);
    if let Probe::Missing(status) = transport.probe(&source_url)? {
        tracing::debug!("{rpm_name} not in {} (HTTP {status})", config.obs_project);
        return Ok(Tracking::Untracked);
    }

    let fileinfo_url = format!(
        "{api}/build/{}/{}/{}/_repository/{rpm_name}?view=fileinfo",
        config.obs_project, config.obs_repository, config.obs_arch
    );
    match transport.probe(&fileinfo_url)? {
        Probe::Found(body) => Ok(Tracking::Tracked(fileinfo_version(&body)?)),
        Probe::Missing(status) => {
            tracing::debug!("no fileinfo for {rpm_name} (HTTP {status})");
            Ok(Tracking::Tracked(String::new()))
        }
    }
}

/// Text of the root's `<version>` child; empty when absent.
fn fileinfo_version(body: &[u8]) -> Result<String, SyncError> {
    let text = String::from_utf8_lossy(body);
    let doc = roxmltree::Document::parse(&text)?;
    Ok(doc
        .root_element()
        .children()
        .find(|node| node.has_tag_name("version"))
        .and_then(|node| node.text())
        .map(|v| v.trim().to_string())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::TransportError;

    const SOURCE: &str = "https://build.opensuse.org/source/devel:languages:nodejs/nodejs-foo";
    const FILEINFO: &str = "https://build.opensuse.org/build/devel:languages:nodejs/Tumbleweed/x86_64/_repository/nodejs-foo?view=fileinfo";

    #[test]
    fn missing_source_is_untracked() {
        let transport = FakeTransport::new().with_probe_missing(SOURCE, 404);
        let tracking = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap();
        assert_eq!(tracking, Tracking::Untracked);
        assert_eq!(transport.probe_count(), 1, "fileinfo must not be queried");
    }

    #[test]
    fn fileinfo_version_is_reported() {
        let transport = FakeTransport::new()
            .with_probe_found(SOURCE, "<directory/>")
            .with_probe_found(
                FILEINFO,
                "<fileinfo filename=\"nodejs-foo-1.0.0-1.1.noarch.rpm\">\n  <name>nodejs-foo</name>\n  <version>1.0.0</version>\n  <release>1.1</release>\n</fileinfo>",
            );
        let tracking = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap();
        assert_eq!(tracking, Tracking::Tracked("1.0.0".to_string()));
    }

    #[test]
    fn fileinfo_without_version_is_tracked_unknown() {
        let transport = FakeTransport::new()
            .with_probe_found(SOURCE, "<directory/>")
            .with_probe_found(FILEINFO, "<fileinfo><name>nodejs-foo</name></fileinfo>");
        let tracking = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap();
        assert_eq!(tracking, Tracking::Tracked(String::new()));
    }

    #[test]
    fn failed_fileinfo_is_tracked_unknown() {
        let transport = FakeTransport::new()
            .with_probe_found(SOURCE, "<directory/>")
            .with_probe_missing(FILEINFO, 404);
        let tracking = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap();
        assert_eq!(tracking, Tracking::Tracked(String::new()));
    }

    #[test]
    fn network_error_propagates() {
        let transport = FakeTransport::new().with_probe_network_error(SOURCE);
        let err = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap_err();
        assert!(matches!(err, SyncError::Transport(TransportError::Network { .. })));
    }

    #[test]
    fn malformed_fileinfo_is_an_error() {
        let transport = FakeTransport::new()
            .with_probe_found(SOURCE, "<directory/>")
            .with_probe_found(FILEINFO, "<fileinfo><version>");
        let err = tracked_version(&transport, &Config::default(), "nodejs-foo").unwrap_err();
        assert!(matches!(err, SyncError::Xml(_)));
    }

    #[test]
    fn configured_project_is_used() {
        let config = Config {
            obs_api: "https://api.example/".to_string(),
            obs_project: "home:me".to_string(),
            ..Config::default()
        };
        let transport = FakeTransport::new();
        tracked_version(&transport, &config, "nodejs-foo").unwrap();
        assert_eq!(
            transport.calls(),
            vec![crate::testing::Call::Probe {
                url: "https://api.example/source/home:me/nodejs-foo".to_string()
            }]
        );
    }
}
