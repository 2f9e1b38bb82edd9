//! # Ranged Errors
//!
//! Lightweight coded error values over a partitioned error code space.
//!
//! ## Design Philosophy
//!
//! 1. **One error type** is returned by every fallible operation
//! 2. **Codes are plain integers** grouped into disjoint, fixed ranges
//! 3. **Classification is a comparison**, not a type tag or a downcast
//! 4. **Messages append context**, they never replace the canonical description
//! 5. **Causes form a finite chain** that mixes coded and foreign errors
//! 6. **Platform errors are translated** into codes by a data-driven table
//!
//! ## Code Space
//!
//! | group        | range                           | registry               |
//! |--------------|---------------------------------|------------------------|
//! | basic        | 0 - 99                          | [`definitions::basic`] |
//! | http         | 100 - 599                       | [`definitions::http`]  |
//! | filesystem   | 1 000 000 - 1 000 299           | [`definitions::fs`]    |
//! | auth         | 1 000 300 - 1 000 599           | [`definitions::auth`]  |
//! | network      | 1 000 600 - 1 000 899           | [`definitions::net`]   |
//! | database     | 1 000 900 - 1 001 199           | [`definitions::db`]    |
//! | math         | 1 001 200 - 1 001 499           | [`definitions::math`]  |
//! | system       | 1 001 500 - 1 001 799           | [`definitions::sys`]   |
//! | app-reserved | 1 000 000 000 - 1 000 099 999   | host application       |
//!
//! ## Quick Start
//!
//! ```rust
//! use ranged_errors::{CodedError, Result, definitions::{basic, fs}};
//!
//! fn ensure_dir(is_dir: bool) -> Result<()> {
//!     if !is_dir {
//!         return Err(CodedError::new(fs::NOT_A_DIR).with_message("'/srv/data'"));
//!     }
//!     Ok(())
//! }
//!
//! let err = ensure_dir(false).unwrap_err();
//! assert!(err.is_failure());
//! assert!(err.is_filesystem());
//! assert!(err.code_equals(fs::NOT_A_DIR));
//! assert!(!err.code_equals(basic::NOT_FOUND));
//! assert_eq!(err.describe(), "not a directory '/srv/data'");
//! ```
//!
//! ## Wrapping and Matching
//!
//! ```rust
//! use ranged_errors::{CodedError, Target, definitions::basic};
//! use std::io;
//!
//! let io_err = io::Error::new(io::ErrorKind::NotFound, "config.toml");
//! let inner = CodedError::new(basic::NOT_FOUND).with_foreign_cause(io_err);
//! let outer = CodedError::new(basic::OTHER)
//!     .with_message("loading settings")
//!     .with_cause(inner);
//!
//! assert!(outer.matches_in_chain(Some(Target::Code(basic::NOT_FOUND))));
//! assert!(!outer.matches_in_chain(None));
//! assert_eq!(
//!     outer.describe(),
//!     "other error loading settings: entity not found: config.toml"
//! );
//! ```
//!
//! ## Platform Errors
//!
//! ```rust
//! use ranged_errors::{CodedError, definitions::basic};
//! use std::fs::File;
//!
//! let err = File::open("/definitely/not/here")
//!     .map_err(CodedError::from_platform_error)
//!     .unwrap_err();
//! assert!(err.code_equals(basic::NOT_FOUND));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::error::Error;
use std::fmt;
use std::io;
use std::result;
use std::sync::Arc;

pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod formatter;
pub mod logging;
pub mod models;
pub mod platform;

pub use codes::{ErrorCode, Group, group_of, ranges};
pub use formatter::{
    AppFormatFn, AppFormatter, AppFormatterAlreadySet, DefaultAppFormatter, set_app_formatter,
};
pub use logging::{ChainLog, LinkLog};
pub use models::{Cause, Chain, ForeignError, Link, Message, Target};
pub use platform::{ExitError, TranslationTable, from_platform_error};

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, CodedError>;

/// The canonical "no error" value.
///
/// This is a `const`: every use is a fresh value, so no caller can change
/// what another caller sees.
pub const NO_ERROR: CodedError = CodedError::NONE;

/// Delimiter between links in [`CodedError::describe`].
pub const CHAIN_DELIMITER: &str = ": ";

/// Error value: a code, an optional message and an optional cause.
///
/// # Key Properties
///
/// - Value semantics: `clone()` yields an independent copy
/// - `code_equals` and every group predicate are O(1) and allocation-free
/// - The cause chain is finite; coded causes are boxed, foreign causes shared
/// - `Display` renders this link only; [`describe`](Self::describe) renders
///   the whole chain
#[must_use = "errors should be handled or logged"]
#[derive(Debug, Default)]
pub struct CodedError {
    code: ErrorCode,
    message: Option<Message>,
    cause: Option<Cause>,
}

impl CodedError {
    /// Zero code, no message, no cause.
    pub const NONE: CodedError = CodedError {
        code: ErrorCode::NO_ERROR,
        message: None,
        cause: None,
    };

    /// Create an error with a code only.
    #[inline]
    pub const fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            cause: None,
        }
    }

    /// Create an error with `code` wrapping `error` as its cause.
    #[inline]
    pub fn wrap<E>(code: ErrorCode, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::new(code).with_foreign_cause(error)
    }

    /// Translate a platform error (I/O error, subprocess exit, ...) into a
    /// coded error that keeps the original as its cause.
    ///
    /// See [`platform`] for the mapping rules.
    #[inline]
    pub fn from_platform_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        platform::from_platform_error(error)
    }

    /// Attach a message. Empty messages are dropped.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.set_message(message);
        self
    }

    /// Attach a coded cause.
    #[inline]
    pub fn with_cause(mut self, cause: CodedError) -> Self {
        self.cause = Some(Cause::Coded(Box::new(cause)));
        self
    }

    /// Attach any error as the cause.
    ///
    /// A `CodedError` passed here is still stored as a coded cause. The error
    /// moves into the chain; keep a handle with
    /// [`with_shared_cause`](Self::with_shared_cause) to match it by identity
    /// later.
    #[inline]
    pub fn with_foreign_cause<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Cause::foreign(cause));
        self
    }

    /// Attach a foreign error the caller keeps a handle to.
    ///
    /// ```rust
    /// use ranged_errors::{CodedError, ForeignError, Target, definitions::basic};
    /// use std::{io, sync::Arc};
    ///
    /// let leaf: ForeignError = Arc::new(io::Error::other("disk gone"));
    /// let err = CodedError::new(basic::OTHER)
    ///     .with_cause(CodedError::new(basic::NOT_FOUND).with_shared_cause(leaf.clone()));
    ///
    /// assert!(err.matches_in_chain(Some(Target::Foreign(&*leaf))));
    /// ```
    #[inline]
    pub fn with_shared_cause(mut self, cause: ForeignError) -> Self {
        self.cause = Some(Cause::Foreign(cause));
        self
    }

    /// Replace the message of this value.
    #[inline]
    pub fn set_message(&mut self, message: impl Into<Message>) {
        let message = message.into();
        self.message = if message.is_empty() { None } else { Some(message) };
    }

    /// Replace the cause of this value.
    #[inline]
    pub fn set_cause(&mut self, cause: Option<Cause>) {
        self.cause = cause;
    }

    /// Error code.
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message, if any.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(Message::as_str)
    }

    /// Direct cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    /// True iff the code is the "no error" sentinel.
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.code.is_no_error()
    }

    /// Negation of [`is_success`](Self::is_success).
    #[inline]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Compare codes only; message and cause are ignored.
    #[inline]
    pub const fn code_equals(&self, candidate: ErrorCode) -> bool {
        self.code.value() == candidate.value()
    }

    /// Code belongs to the basic group.
    #[inline]
    pub const fn is_basic(&self) -> bool {
        Group::Basic.contains(self.code)
    }

    /// Code belongs to the auth group.
    #[inline]
    pub const fn is_auth(&self) -> bool {
        Group::Auth.contains(self.code)
    }

    /// Code belongs to the database group.
    #[inline]
    pub const fn is_database(&self) -> bool {
        Group::Database.contains(self.code)
    }

    /// Code belongs to the filesystem group.
    #[inline]
    pub const fn is_filesystem(&self) -> bool {
        Group::Filesystem.contains(self.code)
    }

    /// Code belongs to the HTTP group.
    #[inline]
    pub const fn is_http(&self) -> bool {
        Group::Http.contains(self.code)
    }

    /// Code belongs to the math group.
    #[inline]
    pub const fn is_math(&self) -> bool {
        Group::Math.contains(self.code)
    }

    /// Code belongs to the network group.
    #[inline]
    pub const fn is_network(&self) -> bool {
        Group::Network.contains(self.code)
    }

    /// Code belongs to the system group.
    #[inline]
    pub const fn is_system(&self) -> bool {
        Group::System.contains(self.code)
    }

    /// Code belongs to the app-reserved group.
    #[inline]
    pub const fn is_app_specific(&self) -> bool {
        Group::App.contains(self.code)
    }

    /// Group of the code, `None` when the code is unknown.
    #[inline]
    pub const fn group(&self) -> Option<Group> {
        self.code.group()
    }

    // ------------------------------------------------------------------------
    // Chain
    // ------------------------------------------------------------------------

    /// Iterate the cause chain, starting with `self`.
    #[inline]
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Innermost link of the chain.
    pub fn root_cause(&self) -> Link<'_> {
        // The chain always yields at least `self`.
        self.chain().last().unwrap_or(Link::Coded(self))
    }

    /// Walk `self`, its cause, the cause's cause, ... and report whether any
    /// link matches `target`. `None` never matches.
    ///
    /// Coded targets compare codes on coded links. Foreign targets compare
    /// object identity on foreign links, so the target must be the object
    /// stored in the chain (see [`with_shared_cause`](Self::with_shared_cause)).
    /// A `&'static` sentinel attached with `with_foreign_cause` is stored as a
    /// reference wrapper and never matches by identity; use
    /// [`chain_contains`](Self::chain_contains) for it.
    pub fn matches_in_chain(&self, target: Option<Target<'_>>) -> bool {
        match target {
            Some(target) => self.chain().any(|link| target.matches(&link)),
            None => false,
        }
    }

    /// Shorthand for `matches_in_chain(Some(Target::Code(code)))`.
    #[inline]
    pub fn chain_contains_code(&self, code: ErrorCode) -> bool {
        self.matches_in_chain(Some(Target::Code(code)))
    }

    /// Whether any foreign link of type `E` (or `&'static E`) equals `target`.
    ///
    /// Uses `E`'s own `PartialEq`; links of other types are skipped.
    pub fn chain_contains<E>(&self, target: &E) -> bool
    where
        E: Error + PartialEq + 'static,
    {
        self.chain().any(|link| match link {
            Link::Foreign(foreign) => foreign
                .downcast_ref::<E>()
                .or_else(|| foreign.downcast_ref::<&'static E>().copied())
                .is_some_and(|candidate| candidate == target),
            Link::Coded(_) => false,
        })
    }

    /// Find the first link of type `E` in the chain.
    pub fn find_in_chain<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.chain().find_map(|link| link.as_error().downcast_ref::<E>())
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Render the whole chain, outermost first, joined by `": "`.
    ///
    /// App-reserved codes are rendered by the process-wide formatter.
    pub fn describe(&self) -> String {
        self.describe_with(formatter::global())
    }

    /// Render the whole chain with an injected app formatter.
    pub fn describe_with(&self, app: &dyn AppFormatter) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_chain(&mut out, app);
        out
    }

    /// Write the rendered chain to any `fmt::Write`.
    pub fn write_chain(&self, out: &mut impl fmt::Write, app: &dyn AppFormatter) -> fmt::Result {
        for (depth, link) in self.chain().enumerate() {
            if depth > 0 {
                out.write_str(CHAIN_DELIMITER)?;
            }
            match link {
                Link::Coded(coded) => coded.write_link(out, app)?,
                Link::Foreign(foreign) => write!(out, "{}", foreign)?,
            }
        }
        Ok(())
    }

    /// Description of this link only: canonical text, then the message.
    fn write_link(&self, out: &mut impl fmt::Write, app: &dyn AppFormatter) -> fmt::Result {
        out.write_str(&definitions::code_to_string_with(self.code, app))?;
        if let Some(message) = self.message() {
            write!(out, " {}", message)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------------

    /// `Ok(())` for the no-error value, `Err(self)` otherwise.
    #[inline]
    pub fn into_result(self) -> Result<()> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }

    /// View a `dyn Error` as a `CodedError`, if it is one.
    #[inline]
    pub fn as_coded<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a CodedError> {
        error.downcast_ref::<CodedError>()
    }

    /// Structured log view over the chain. Cannot outlive `self`.
    #[inline]
    pub fn chain_log(&self) -> ChainLog<'_> {
        ChainLog::new(self)
    }

    /// Callback-style access to the structured log view.
    #[inline]
    pub fn with_chain_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ChainLog<'_>) -> R,
    {
        let log = self.chain_log();
        f(&log)
    }
}

impl Clone for CodedError {
    /// Copies the chain without recursion, rebuilding from the innermost link.
    fn clone(&self) -> Self {
        let mut links = Vec::new();
        let mut tail = None;
        let mut current = Some(self);
        while let Some(err) = current {
            links.push(err);
            current = match &err.cause {
                Some(Cause::Coded(next)) => Some(&**next),
                Some(Cause::Foreign(foreign)) => {
                    tail = Some(Cause::Foreign(Arc::clone(foreign)));
                    None
                }
                None => None,
            };
        }

        let mut rebuilt: Option<CodedError> = None;
        for err in links.into_iter().rev() {
            let cause = match rebuilt.take() {
                Some(inner) => Some(Cause::Coded(Box::new(inner))),
                None => tail.take(),
            };
            rebuilt = Some(CodedError {
                code: err.code,
                message: err.message.clone(),
                cause,
            });
        }
        rebuilt.unwrap_or_default()
    }
}

impl Drop for CodedError {
    /// Unlinks coded causes one at a time so long chains do not recurse.
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(Cause::Coded(mut coded)) = next {
            next = coded.cause.take();
        }
    }
}

impl From<ErrorCode> for CodedError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl From<io::Error> for CodedError {
    fn from(error: io::Error) -> Self {
        platform::from_platform_error(error)
    }
}

impl From<ExitError> for CodedError {
    fn from(error: ExitError) -> Self {
        platform::from_platform_error(error)
    }
}

impl fmt::Display for CodedError {
    /// This link only; see [`CodedError::describe`] for the whole chain.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_link(f, formatter::global())
    }
}

impl Error for CodedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(Cause::as_error)
    }
}

// ============================================================================
// Result extension
// ============================================================================

/// Attach codes to foreign `Result`s.
///
/// ```rust
/// use ranged_errors::{ResultExt, definitions::fs};
///
/// let parsed: ranged_errors::Result<u32> =
///     "12x".parse::<u32>().coded_with(fs::FILE_CORRUPT, "size field");
/// let err = parsed.unwrap_err();
/// assert!(err.code_equals(fs::FILE_CORRUPT));
/// assert_eq!(err.describe(), "file is corrupt size field: invalid digit found in string");
/// ```
pub trait ResultExt<T> {
    /// Wrap the error under `code`.
    fn coded(self, code: ErrorCode) -> Result<T>;

    /// Wrap the error under `code` with a message.
    fn coded_with(self, code: ErrorCode, message: impl Into<Message>) -> Result<T>;

    /// Translate the error with the platform table.
    fn classify_platform(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for result::Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline]
    fn coded(self, code: ErrorCode) -> Result<T> {
        self.map_err(|e| CodedError::wrap(code, e))
    }

    #[inline]
    fn coded_with(self, code: ErrorCode, message: impl Into<Message>) -> Result<T> {
        self.map_err(|e| CodedError::wrap(code, e).with_message(message))
    }

    #[inline]
    fn classify_platform(self) -> Result<T> {
        self.map_err(platform::from_platform_error)
    }
}
