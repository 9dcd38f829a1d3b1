//! Error reporting sinks
//!
//! Recoverable failures (a misbehaving observer, unexpected data met during a
//! walk) are handed to an [`ErrorReporter`] instead of being returned to the
//! caller. The default sink, [`LogErrorReporter`], forwards everything to the
//! `log` facade so problems are always visible somewhere.

use std::error::Error;
use std::rc::Rc;

/// Shared, externally-owned reporter reference
pub type ReporterHandle = Rc<dyn ErrorReporter>;

/// Sink for messages, warnings and errors that must not abort the caller
pub trait ErrorReporter {
    /// Report an informational message
    fn message_report(&self, msg: &str) {
        log::info!("{}", msg);
    }

    /// Report a recoverable problem, with the underlying cause if there is one
    fn warning_report(&self, msg: &str, cause: Option<&(dyn Error + 'static)>);

    /// Report a serious problem that still leaves the caller able to continue
    fn error_report(&self, msg: &str, cause: Option<&(dyn Error + 'static)>) {
        self.warning_report(msg, cause);
    }
}

/// Default reporter writing through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorReporter;

impl LogErrorReporter {
    /// Create a new log-backed reporter
    pub const fn new() -> Self {
        Self
    }

    /// Create a shareable handle to a log-backed reporter
    pub fn handle() -> ReporterHandle {
        Rc::new(Self)
    }
}

impl ErrorReporter for LogErrorReporter {
    fn warning_report(&self, msg: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(err) => log::warn!("{}: {}", msg, err),
            None => log::warn!("{}", msg),
        }
    }

    fn error_report(&self, msg: &str, cause: Option<&(dyn Error + 'static)>) {
        match cause {
            Some(err) => log::error!("{}: {}", msg, err),
            None => log::error!("{}", msg),
        }
    }
}
