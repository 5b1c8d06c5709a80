//! Test-lifecycle adapter for WireMock stub imports.
//!
//! The host scheduler drives a [`TestLifecycleListener`] through two
//! callbacks:
//!
//! - `before_test` resolves `wiremockFilesDir` and `wiremockUrl` and binds one
//!   client per endpoint. Any problem here is fatal for the test.
//! - `custom_event` runs an import pass when the event is named
//!   `wiremock-change-delay` (case-insensitive), using the event settings
//!   (`key=value;...`) as placeholder replacements. Other events are ignored.

use crate::client::{ClientBuildError, StubUploader, WiremockClient};
use crate::config::{ConfigError, EventProperties, TestContext, WiremockSettings};
use crate::importer::{ImportError, Importer};
use crate::logging::LoggingConfig;
use crate::report::ImportReport;
use crate::settings::parse_settings;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Custom event name that triggers an import pass.
pub const CHANGE_DELAY_EVENT: &str = "wiremock-change-delay";

/// A named custom event with free-form settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomEvent {
    pub name: String,
    pub settings: Option<String>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>, settings: Option<&str>) -> Self {
        Self {
            name: name.into(),
            settings: settings.map(String::from),
        }
    }
}

/// What a custom event led to.
#[derive(Debug)]
pub enum EventOutcome {
    /// Event name not handled by this listener.
    Ignored,
    /// Event arrived before a successful `before_test`.
    NotConfigured,
    /// Import pass ran; per-unit results are in the report.
    Imported(ImportReport),
    /// Import pass could not list the files directory.
    ImportFailed(ImportError),
}

/// Callbacks a host scheduler invokes over a test's lifetime.
pub trait TestLifecycleListener {
    /// Name this listener was registered under.
    fn name(&self) -> &str;

    /// Resolve configuration before the test starts.
    fn before_test(
        &mut self,
        context: &TestContext,
        properties: &EventProperties,
    ) -> Result<(), ConfigError>;

    /// React to a custom event fired during the test.
    fn custom_event(&mut self, event: &CustomEvent) -> EventOutcome;
}

/// Builds the uploader bound to one endpoint.
pub type Connector =
    dyn Fn(&str, Duration) -> Result<Box<dyn StubUploader>, ClientBuildError> + Send + Sync;

fn connect_http(endpoint: &str, timeout: Duration) -> Result<Box<dyn StubUploader>, ClientBuildError> {
    let client = WiremockClient::with_timeout(endpoint, timeout)?;
    Ok(Box::new(client))
}

/// State resolved by `before_test`.
struct Bound {
    importer: Importer,
    uploaders: Vec<Box<dyn StubUploader>>,
}

/// Uploads templated stub mappings to WireMock on `wiremock-change-delay`.
pub struct WiremockEvent {
    name: String,
    logging: LoggingConfig,
    connector: Box<Connector>,
    bound: Option<Bound>,
}

impl WiremockEvent {
    /// Create an event that talks HTTP to the configured endpoints.
    pub fn new(name: impl Into<String>, logging: LoggingConfig) -> Self {
        Self::with_connector(name, logging, connect_http)
    }

    /// Create an event with a custom endpoint connector.
    pub fn with_connector<F>(name: impl Into<String>, logging: LoggingConfig, connector: F) -> Self
    where
        F: Fn(&str, Duration) -> Result<Box<dyn StubUploader>, ClientBuildError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            logging,
            connector: Box::new(connector),
            bound: None,
        }
    }

    /// Endpoints bound by the last successful `before_test`.
    pub fn endpoints(&self) -> Vec<&str> {
        self.bound
            .as_ref()
            .map(|b| b.uploaders.iter().map(|u| u.endpoint()).collect())
            .unwrap_or_default()
    }

    fn import_with_settings(&self, settings: Option<&str>) -> EventOutcome {
        let Some(bound) = &self.bound else {
            warn!(event = %self.name, "received {CHANGE_DELAY_EVENT} before test setup, nothing imported");
            return EventOutcome::NotConfigured;
        };

        let replacements = parse_settings(settings);
        debug!(event = %self.name, replacements = replacements.len(), "starting import pass");

        match bound.importer.import_all(&bound.uploaders, &replacements) {
            Ok(report) => {
                info!(
                    event = %self.name,
                    files = report.files_imported,
                    uploads = report.attempted(),
                    failed = report.failed(),
                    "import pass finished"
                );
                EventOutcome::Imported(report)
            }
            Err(e) => {
                error!(event = %self.name, error = %e, "import pass failed");
                EventOutcome::ImportFailed(e)
            }
        }
    }
}

impl TestLifecycleListener for WiremockEvent {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_test(
        &mut self,
        context: &TestContext,
        properties: &EventProperties,
    ) -> Result<(), ConfigError> {
        info!(event = %self.name, test_run_id = %context.test_run_id, "before test");
        self.bound = None;

        let settings = WiremockSettings::from_properties(properties)?;
        let uploaders = settings
            .endpoints
            .iter()
            .map(|endpoint| {
                (self.connector)(endpoint.as_str(), settings.timeout).map_err(|e| match e {
                    ClientBuildError::InvalidUrl { url, reason } => {
                        ConfigError::InvalidUrl { url, reason }
                    }
                    ClientBuildError::Http(e) => ConfigError::InvalidUrl {
                        url: endpoint.clone(),
                        reason: e.to_string(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            event = %self.name,
            files_dir = %settings.files_dir.display(),
            endpoints = ?settings.endpoints,
            "wiremock configured"
        );

        self.bound = Some(Bound {
            importer: Importer::new(settings.files_dir).verbose(self.logging.debug),
            uploaders,
        });
        Ok(())
    }

    fn custom_event(&mut self, event: &CustomEvent) -> EventOutcome {
        if event.name.eq_ignore_ascii_case(CHANGE_DELAY_EVENT) {
            self.import_with_settings(event.settings.as_deref())
        } else {
            debug!(event = %self.name, "ignoring unknown event [{}]", event.name);
            EventOutcome::Ignored
        }
    }
}

/// Creates named [`WiremockEvent`] instances for a host scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct WiremockEventFactory;

impl WiremockEventFactory {
    pub fn create(&self, name: &str, logging: LoggingConfig) -> Box<dyn TestLifecycleListener> {
        Box::new(WiremockEvent::new(name, logging))
    }
}
