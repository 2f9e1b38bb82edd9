//! Translation of platform errors into coded errors.
//!
//! Rules are tried in order and the first match wins:
//!
//! 1. a timeout (`io::ErrorKind::TimedOut`, or an [`ExitError`] killed after a
//!    timeout) becomes `basic::TIMED_OUT`;
//! 2. an `io::Error` is matched by its normalized message text (the
//!    ` (os error N)` suffix stripped, ASCII case ignored) against the text
//!    rules, then by its `io::ErrorKind` against the kind rules, and falls back
//!    to `basic::OTHER`;
//! 3. an [`ExitError`] becomes `basic::PROCESS_EXIT`;
//! 4. anything else becomes `basic::OTHER`.
//!
//! The original error is always kept as the cause of the result.
//!
//! Rules are data. The process-wide [`TranslationTable::standard`] table is
//! built once and never changes; callers that need different mappings build
//! their own table with [`TranslationTable::with_text_rule`] and
//! [`TranslationTable::with_kind_rule`].
//!
//! ```rust
//! use ranged_errors::{TranslationTable, definitions::{basic, db}};
//! use std::io;
//!
//! let table = TranslationTable::standard()
//!     .clone()
//!     .with_text_rule("database is locked", db::ERROR);
//! let err = table.translate(io::Error::other("Database is locked"));
//! assert!(err.code_equals(db::ERROR));
//!
//! let err = table.translate(io::Error::from(io::ErrorKind::NotFound));
//! assert!(err.code_equals(basic::NOT_FOUND));
//! ```

use crate::definitions::{basic, fs, net};
use crate::{CodedError, ErrorCode};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io::{self, ErrorKind};
use std::process::ExitStatus;
use std::sync::LazyLock;

/// Suffix the standard library appends to OS error messages.
const OS_ERROR_SUFFIX: &str = " (os error ";

/// Translate with the process-wide standard table.
#[inline]
pub fn from_platform_error<E>(error: E) -> CodedError
where
    E: Error + Send + Sync + 'static,
{
    TranslationTable::standard().translate(error)
}

// ============================================================================
// Rules
// ============================================================================

/// Exact, case-insensitive match on a normalized platform message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    /// Lower-case message text.
    pub text: Cow<'static, str>,
    /// Code assigned on match.
    pub code: ErrorCode,
}

/// Match on an `io::ErrorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRule {
    /// Kind to match.
    pub kind: ErrorKind,
    /// Code assigned on match.
    pub code: ErrorCode,
}

const STANDARD_TEXT_RULES: &[(&str, ErrorCode)] = &[
    // unix
    ("read-only file system", basic::PERMISSION_DENIED),
    ("invalid argument", basic::INVALID_INPUT),
    ("permission denied", basic::PERMISSION_DENIED),
    ("file already exists", basic::ALREADY_EXISTS),
    ("file exists", basic::ALREADY_EXISTS),
    ("file does not exist", basic::NOT_FOUND),
    ("no such file or directory", basic::NOT_FOUND),
    ("file already closed", basic::ALREADY_CLOSED),
    // windows
    ("access is denied.", basic::PERMISSION_DENIED),
    ("the name of the file cannot be resolved by the system.", basic::SYMLINKS_NOT_SUPPORTED),
    ("the system cannot find the file specified.", basic::NOT_FOUND),
];

const STANDARD_KIND_RULES: &[(ErrorKind, ErrorCode)] = &[
    (ErrorKind::NotFound, basic::NOT_FOUND),
    (ErrorKind::PermissionDenied, basic::PERMISSION_DENIED),
    (ErrorKind::ReadOnlyFilesystem, basic::PERMISSION_DENIED),
    (ErrorKind::AlreadyExists, basic::ALREADY_EXISTS),
    (ErrorKind::BrokenPipe, basic::BROKEN_PIPE),
    (ErrorKind::WouldBlock, basic::WOULD_BLOCK),
    (ErrorKind::InvalidInput, basic::INVALID_INPUT),
    (ErrorKind::InvalidData, basic::INVALID_DATA),
    (ErrorKind::WriteZero, basic::WRITE_ZERO),
    (ErrorKind::Interrupted, basic::INTERRUPTED),
    (ErrorKind::Unsupported, basic::UNSUPPORTED),
    (ErrorKind::UnexpectedEof, basic::UNEXPECTED_EOF),
    (ErrorKind::OutOfMemory, basic::MEMORY),
    (ErrorKind::NotADirectory, fs::NOT_A_DIR),
    (ErrorKind::IsADirectory, fs::NOT_A_FILE),
    (ErrorKind::FileTooLarge, fs::FILE_TOO_LARGE),
    (ErrorKind::ConnectionRefused, net::CONNECTION_REFUSED),
    (ErrorKind::ConnectionReset, net::CONNECTION_RESET),
    (ErrorKind::ConnectionAborted, net::CONNECTION_ABORTED),
    (ErrorKind::NotConnected, net::NOT_CONNECTED),
    (ErrorKind::AddrInUse, net::ADDR_IN_USE),
    (ErrorKind::AddrNotAvailable, net::ADDR_NOT_AVAILABLE),
    (ErrorKind::HostUnreachable, net::ERROR),
    (ErrorKind::NetworkUnreachable, net::ERROR),
    (ErrorKind::NetworkDown, net::ERROR),
];

static STANDARD: LazyLock<TranslationTable> = LazyLock::new(|| {
    let mut table = TranslationTable::empty();
    for &(text, code) in STANDARD_TEXT_RULES {
        table = table.with_text_rule(text, code);
    }
    for &(kind, code) in STANDARD_KIND_RULES {
        table = table.with_kind_rule(kind, code);
    }
    table
});

// ============================================================================
// Translation table
// ============================================================================

/// Ordered rule set used to classify platform errors.
///
/// Rules are checked in insertion order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    text_rules: SmallVec<[TextRule; 16]>,
    kind_rules: SmallVec<[KindRule; 32]>,
}

impl TranslationTable {
    /// Table without rules. Every `io::Error` that is not a timeout becomes
    /// `basic::OTHER`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The process-wide default table.
    pub fn standard() -> &'static TranslationTable {
        &STANDARD
    }

    /// Append a text rule. `text` is compared case-insensitively.
    pub fn with_text_rule(mut self, text: impl Into<Cow<'static, str>>, code: ErrorCode) -> Self {
        let text = text.into();
        let text = if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            text
        };
        self.text_rules.push(TextRule { text, code });
        self
    }

    /// Append a kind rule.
    pub fn with_kind_rule(mut self, kind: ErrorKind, code: ErrorCode) -> Self {
        self.kind_rules.push(KindRule { kind, code });
        self
    }

    /// Text rules in match order.
    pub fn text_rules(&self) -> &[TextRule] {
        &self.text_rules
    }

    /// Kind rules in match order.
    pub fn kind_rules(&self) -> &[KindRule] {
        &self.kind_rules
    }

    /// First text rule matching `message` after normalization.
    pub fn match_text(&self, message: &str) -> Option<ErrorCode> {
        let normalized = strip_os_suffix(message);
        self.text_rules
            .iter()
            .find(|rule| normalized.eq_ignore_ascii_case(&rule.text))
            .map(|rule| rule.code)
    }

    /// First kind rule matching `kind`.
    pub fn match_kind(&self, kind: ErrorKind) -> Option<ErrorCode> {
        self.kind_rules.iter().find(|rule| rule.kind == kind).map(|rule| rule.code)
    }

    /// Code for `error`, without wrapping it.
    pub fn classify(&self, error: &(dyn Error + 'static)) -> ErrorCode {
        if let Some(io_err) = error.downcast_ref::<io::Error>() {
            if io_err.kind() == ErrorKind::TimedOut {
                return basic::TIMED_OUT;
            }
            let message = io_err.to_string();
            if let Some(code) = self.match_text(&message) {
                return code;
            }
            if let Some(code) = self.match_kind(io_err.kind()) {
                return code;
            }
            tracing::debug!(
                kind = ?io_err.kind(),
                error = %message,
                "unrecognized io error, classified as OTHER"
            );
            return basic::OTHER;
        }

        if let Some(exit) = error.downcast_ref::<ExitError>() {
            return if exit.is_timeout() { basic::TIMED_OUT } else { basic::PROCESS_EXIT };
        }

        tracing::debug!(error = %error, "unrecognized platform error, classified as OTHER");
        basic::OTHER
    }

    /// Classify `error` and wrap it as the cause of the result.
    pub fn translate<E>(&self, error: E) -> CodedError
    where
        E: Error + Send + Sync + 'static,
    {
        let code = self.classify(&error);
        CodedError::new(code).with_foreign_cause(error)
    }
}

/// Remove a trailing ` (os error N)`.
fn strip_os_suffix(message: &str) -> &str {
    match message.rfind(OS_ERROR_SUFFIX) {
        Some(idx) if message.ends_with(')') => &message[..idx],
        _ => message,
    }
}

// ============================================================================
// Subprocess exit
// ============================================================================

/// A subprocess that did not exit successfully.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExitError {
    code: Option<i32>,
    stderr: Option<String>,
    timed_out: bool,
}

impl ExitError {
    /// Exit with `code`; `None` when the process was terminated by a signal.
    pub fn new(code: Option<i32>) -> Self {
        Self {
            code,
            stderr: None,
            timed_out: false,
        }
    }

    /// The process was killed because it ran past its deadline.
    pub fn killed_on_timeout() -> Self {
        Self {
            code: None,
            stderr: None,
            timed_out: true,
        }
    }

    /// Attach captured standard error output.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        self.stderr = if stderr.trim().is_empty() { None } else { Some(stderr) };
        self
    }

    /// `Ok(())` on success, an `ExitError` carrying the exit code otherwise.
    ///
    /// # Errors
    ///
    /// Returns an [`ExitError`] if `status` is not a success.
    pub fn check(status: ExitStatus) -> Result<(), ExitError> {
        if status.success() { Ok(()) } else { Err(Self::new(status.code())) }
    }

    /// Exit code, if the process exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Captured standard error output.
    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    /// True if the process was killed after a timeout.
    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl From<ExitStatus> for ExitError {
    fn from(status: ExitStatus) -> Self {
        Self::new(status.code())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.timed_out, self.code) {
            (true, _) => f.write_str("process killed after timeout")?,
            (false, Some(code)) => write!(f, "process exited with status {}", code)?,
            (false, None) => f.write_str("process terminated by signal")?,
        }
        if let Some(stderr) = &self.stderr {
            write!(f, ": {}", stderr.trim_end())?;
        }
        Ok(())
    }
}

impl Error for ExitError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cause, Group};

    #[derive(Debug)]
    struct Opaque;

    impl fmt::Display for Opaque {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("opaque failure")
        }
    }

    impl Error for Opaque {}

    #[test]
    fn missing_file_is_not_found() {
        let io_err = std::fs::File::open("/definitely/not/here/ranged-errors").unwrap_err();
        let err = from_platform_error(io_err);
        assert!(err.code_equals(basic::NOT_FOUND));
        assert!(matches!(err.cause(), Some(Cause::Foreign(_))));
    }

    #[cfg(unix)]
    #[test]
    fn os_messages_match_text_rules() {
        // EACCES, EEXIST, EINVAL
        let cases = [
            (13, basic::PERMISSION_DENIED),
            (17, basic::ALREADY_EXISTS),
            (22, basic::INVALID_INPUT),
        ];
        for (errno, expected) in cases {
            let err = from_platform_error(io::Error::from_raw_os_error(errno));
            assert!(err.code_equals(expected), "errno {} -> {:?}", errno, err.code());
        }
    }

    #[test]
    fn text_match_strips_os_suffix_and_case() {
        let table = TranslationTable::standard();
        assert_eq!(
            table.match_text("Permission denied (os error 13)"),
            Some(basic::PERMISSION_DENIED)
        );
        assert_eq!(
            table.match_text("Access is denied. (os error 5)"),
            Some(basic::PERMISSION_DENIED)
        );
        assert_eq!(
            table.match_text("The system cannot find the file specified. (os error 2)"),
            Some(basic::NOT_FOUND)
        );
        assert_eq!(
            table.match_text("The name of the file cannot be resolved by the system."),
            Some(basic::SYMLINKS_NOT_SUPPORTED)
        );
        assert_eq!(table.match_text("permission denied for user"), None);
    }

    #[test]
    fn custom_io_messages_use_text_rules() {
        let err = from_platform_error(io::Error::other("File already closed"));
        assert!(err.code_equals(basic::ALREADY_CLOSED));
    }

    #[test]
    fn timeouts_win() {
        let err = from_platform_error(io::Error::from(ErrorKind::TimedOut));
        assert!(err.code_equals(basic::TIMED_OUT));

        let err = from_platform_error(ExitError::killed_on_timeout());
        assert!(err.code_equals(basic::TIMED_OUT));
    }

    #[test]
    fn subprocess_exit_is_process_exit() {
        let err = from_platform_error(ExitError::new(Some(2)).with_stderr("boom\n"));
        assert!(err.code_equals(basic::PROCESS_EXIT));
        assert_eq!(err.describe(), "process exited with error: process exited with status 2: boom");
    }

    #[test]
    fn kind_rules_cover_network_group() {
        for kind in [
            ErrorKind::ConnectionRefused,
            ErrorKind::ConnectionReset,
            ErrorKind::ConnectionAborted,
            ErrorKind::NotConnected,
            ErrorKind::AddrInUse,
            ErrorKind::AddrNotAvailable,
            ErrorKind::HostUnreachable,
        ] {
            let err = from_platform_error(io::Error::from(kind));
            assert_eq!(err.group(), Some(Group::Network), "{:?}", kind);
        }
    }

    #[test]
    fn unrecognized_io_error_is_other() {
        let err = from_platform_error(io::Error::from(ErrorKind::Other));
        assert!(err.code_equals(basic::OTHER));
    }

    #[test]
    fn unknown_error_is_other_and_kept() {
        let err = from_platform_error(Opaque);
        assert!(err.code_equals(basic::OTHER));
        assert!(err.find_in_chain::<Opaque>().is_some());
        assert_eq!(err.describe(), "other error: opaque failure");
    }

    #[test]
    fn empty_table_only_knows_timeouts() {
        let table = TranslationTable::empty();
        assert!(table.translate(io::Error::from(ErrorKind::NotFound)).code_equals(basic::OTHER));
        assert!(
            table
                .translate(io::Error::from(ErrorKind::TimedOut))
                .code_equals(basic::TIMED_OUT)
        );
    }

    #[test]
    fn custom_rules_are_appended_in_order() {
        let table = TranslationTable::empty()
            .with_text_rule("Disk Quota Exceeded", fs::FILE_TOO_LARGE)
            .with_kind_rule(ErrorKind::NotFound, fs::INVALID_PATH)
            .with_kind_rule(ErrorKind::NotFound, basic::NOT_FOUND);

        assert_eq!(table.text_rules()[0].text, "disk quota exceeded");
        assert!(
            table
                .translate(io::Error::other("disk quota exceeded"))
                .code_equals(fs::FILE_TOO_LARGE)
        );
        assert!(
            table
                .translate(io::Error::from(ErrorKind::NotFound))
                .code_equals(fs::INVALID_PATH)
        );
    }

    #[test]
    fn standard_table_is_shared() {
        assert!(std::ptr::eq(TranslationTable::standard(), TranslationTable::standard()));
        assert_eq!(TranslationTable::standard().text_rules().len(), STANDARD_TEXT_RULES.len());
    }

    #[test]
    fn exit_check_passes_success() {
        let ok = std::process::Command::new("true").status();
        if let Ok(status) = ok {
            assert!(ExitError::check(status).is_ok());
        }
        let failed = std::process::Command::new("false").status();
        if let Ok(status) = failed {
            let exit = ExitError::check(status).unwrap_err();
            assert_eq!(exit.code(), Some(1));
            assert!(CodedError::from(exit).code_equals(basic::PROCESS_EXIT));
        }
    }

    #[test]
    fn exit_display() {
        assert_eq!(ExitError::new(None).to_string(), "process terminated by signal");
        assert_eq!(ExitError::killed_on_timeout().to_string(), "process killed after timeout");
        assert_eq!(ExitError::new(Some(3)).with_stderr("  ").stderr(), None);
    }
}
