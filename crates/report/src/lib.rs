mod config;
mod errors;
mod reporter;

pub use config::{DEFAULT_RELEASE_STAGE, ErrorHookConfig};
pub use errors::Error;
pub use reporter::{ErrorReport, JsonLinesReporter, NoopReporter, RecordingReporter, Reporter};
