//! WireMock stub import for load-test lifecycles.
//!
//! At the start of a test, and again every time a `wiremock-change-delay`
//! custom event fires, the files in a stub-definition directory are read,
//! their `${key}` placeholders are replaced with values from the event
//! settings, and the result is posted to every configured WireMock server.
//!
//! # Example
//!
//! ```no_run
//! use wiremock_event::{
//!     CustomEvent, EventOutcome, EventProperties, LoggingConfig, TestContext,
//!     TestLifecycleListener, WiremockEvent,
//! };
//!
//! let mut event = WiremockEvent::new("wiremock", LoggingConfig::default());
//! let properties: EventProperties = [
//!     ("wiremockFilesDir", "./stubs"),
//!     ("wiremockUrl", "http://localhost:8080,http://localhost:8081"),
//! ]
//! .into_iter()
//! .collect();
//!
//! event.before_test(&TestContext::new("run-42"), &properties)?;
//!
//! let outcome = event.custom_event(&CustomEvent::new("wiremock-change-delay", Some("delay=500")));
//! if let EventOutcome::Imported(report) = outcome {
//!     println!("{} of {} uploads succeeded", report.succeeded(), report.attempted());
//! }
//! # Ok::<(), wiremock_event::ConfigError>(())
//! ```

pub mod client;
pub mod config;
pub mod event;
pub mod importer;
pub mod logging;
pub mod report;
pub mod settings;
pub mod template;

pub use client::{StubUploader, UploadError, WiremockClient};
pub use config::{ConfigError, EventProperties, TestContext, WiremockSettings};
pub use event::{
    CustomEvent, EventOutcome, TestLifecycleListener, WiremockEvent, WiremockEventFactory,
    CHANGE_DELAY_EVENT,
};
pub use importer::{ImportError, Importer};
pub use logging::LoggingConfig;
pub use report::{ImportReport, SkipReason, SkippedEntry, UploadOutcome};
pub use settings::{parse_settings, Replacements};
pub use template::substitute;
