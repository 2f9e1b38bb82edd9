//! Rendering of app-reserved codes.
//!
//! The crate has no registry for the app-reserved range; the host application
//! supplies one. There are two ways to do that:
//!
//! 1. **Injection**: pass any [`AppFormatter`] to
//!    [`CodedError::describe_with`](crate::CodedError::describe_with) or
//!    [`code_to_string_with`](crate::definitions::code_to_string_with).
//! 2. **Process-wide hook**: call [`set_app_formatter`] once at startup,
//!    before any app-specific error is rendered. Plain
//!    [`describe`](crate::CodedError::describe) then picks it up.
//!
//! The hook is write-once. A second installation is rejected with
//! [`AppFormatterAlreadySet`] and the first formatter stays in place.
//!
//! ```rust,no_run
//! use ranged_errors::{ErrorCode, Group, set_app_formatter};
//!
//! const JOB_FAILED: ErrorCode = ErrorCode::in_group(Group::App, 0);
//!
//! fn app_codes(code: ErrorCode) -> String {
//!     match code {
//!         JOB_FAILED => "job failed".to_string(),
//!         other => format!("unknown app-specific error code ({})", other.value()),
//!     }
//! }
//!
//! set_app_formatter(app_codes).expect("formatter installed once at startup");
//! ```

use crate::ErrorCode;
use std::fmt;
use std::sync::OnceLock;

/// Signature of the process-wide app formatter.
pub type AppFormatFn = fn(ErrorCode) -> String;

/// Renders app-reserved codes into descriptions.
pub trait AppFormatter {
    /// Describe an app-reserved `code`.
    fn format_app_code(&self, code: ErrorCode) -> String;
}

impl<F> AppFormatter for F
where
    F: Fn(ErrorCode) -> String,
{
    #[inline]
    fn format_app_code(&self, code: ErrorCode) -> String {
        self(code)
    }
}

/// Fallback used when the host application installs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAppFormatter;

impl AppFormatter for DefaultAppFormatter {
    fn format_app_code(&self, code: ErrorCode) -> String {
        format!("undefined app-specific error ({})", code.value())
    }
}

static APP_FORMATTER: OnceLock<AppFormatFn> = OnceLock::new();

/// Install the process-wide app formatter.
///
/// # Errors
///
/// Returns [`AppFormatterAlreadySet`] if a formatter was installed before.
/// The earlier formatter is kept.
pub fn set_app_formatter(formatter: AppFormatFn) -> Result<(), AppFormatterAlreadySet> {
    APP_FORMATTER.set(formatter).map_err(|_| {
        tracing::warn!("app formatter already installed; keeping the first one");
        AppFormatterAlreadySet
    })
}

/// True once [`set_app_formatter`] succeeded.
pub fn app_formatter_installed() -> bool {
    APP_FORMATTER.get().is_some()
}

/// The formatter [`describe`](crate::CodedError::describe) uses: the installed
/// hook, or [`DefaultAppFormatter`].
pub fn global() -> &'static dyn AppFormatter {
    match APP_FORMATTER.get() {
        Some(installed) => installed,
        None => &DefaultAppFormatter,
    }
}

/// Describe an app-reserved code with the process-wide formatter.
pub fn app_code_to_string(code: ErrorCode) -> String {
    global().format_app_code(code)
}

/// A second app formatter installation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppFormatterAlreadySet;

impl fmt::Display for AppFormatterAlreadySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("app-specific code formatter is already installed")
    }
}

impl std::error::Error for AppFormatterAlreadySet {}

// The global hook itself is exercised in tests/app_formatter.rs, which runs
// in its own process. Unit tests here must never install it.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn default_formatter_embeds_code() {
        let code = ErrorCode::new(Group::App.begin());
        assert_eq!(
            DefaultAppFormatter.format_app_code(code),
            "undefined app-specific error (1000000000)"
        );
    }

    #[test]
    fn closures_are_formatters() {
        let prefix = String::from("svc");
        let formatter = move |code: ErrorCode| format!("{}-{}", prefix, code.value());
        assert_eq!(formatter.format_app_code(ErrorCode::new(7)), "svc-7");
    }

    #[test]
    fn global_falls_back_to_default() {
        assert!(!app_formatter_installed());
        let code = ErrorCode::new(Group::App.end());
        assert_eq!(app_code_to_string(code), "undefined app-specific error (1000099999)");
    }
}
