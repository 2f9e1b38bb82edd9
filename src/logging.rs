//! Structured log view over a cause chain.
//!
//! # Properties
//!
//! - Borrows from a [`CodedError`] with an explicit lifetime
//! - Cannot outlive the error that created it
//! - Per-link fields are plain borrowed data, ready for structured loggers
//! - Rendered output is bounded: every field is truncated on a UTF-8 boundary
//!
//! ```rust
//! use ranged_errors::{CodedError, definitions::{basic, fs}};
//!
//! let err = CodedError::new(basic::OTHER)
//!     .with_message("loading settings")
//!     .with_cause(CodedError::new(fs::NOT_A_DIR).with_message("/etc/app"));
//!
//! err.with_chain_log(|log| {
//!     let mut line = String::new();
//!     log.write_to(&mut line).unwrap();
//!     assert_eq!(
//!         line,
//!         "#0 code=12 group=basic name=OTHER message='loading settings' \
//!          <- #1 code=1000002 group=fs name=NOT_A_DIR message='/etc/app'"
//!     );
//! });
//! ```

use crate::{CodedError, ErrorCode, Group, Link};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use tracing::Level;

/// Maximum length for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Maximum number of links rendered by [`ChainLog::write_to`].
pub const MAX_RENDERED_LINKS: usize = 32;

/// Truncation indicator appended to truncated strings.
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

const LINK_SEPARATOR: &str = " <- ";

/// One link of a [`ChainLog`].
#[derive(Debug, Clone, Copy)]
pub struct LinkLog<'a> {
    /// Position in the chain, `0` for the outermost error.
    pub depth: usize,
    /// The link itself.
    pub link: Link<'a>,
}

impl<'a> LinkLog<'a> {
    /// Code of a coded link.
    #[inline]
    pub fn code(&self) -> Option<ErrorCode> {
        self.link.code()
    }

    /// Group of a coded link with a known code.
    #[inline]
    pub fn group(&self) -> Option<Group> {
        self.code().and_then(ErrorCode::group)
    }

    /// Registry name of a coded link.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        self.code().and_then(ErrorCode::name)
    }

    /// Message of a coded link.
    #[inline]
    pub fn message(&self) -> Option<&'a str> {
        match self.link {
            Link::Coded(coded) => coded.message(),
            Link::Foreign(_) => None,
        }
    }

    /// The foreign error of a foreign link.
    #[inline]
    pub fn foreign(&self) -> Option<&'a (dyn Error + 'static)> {
        match self.link {
            Link::Foreign(foreign) => Some(foreign),
            Link::Coded(_) => None,
        }
    }

    /// Write `key='value'` pairs for this link.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "#{}", self.depth)?;
        match self.link {
            Link::Coded(coded) => {
                write!(f, " code={}", coded.code().value())?;
                if let Some(group) = self.group() {
                    write!(f, " group={}", group.label())?;
                }
                if let Some(name) = self.name() {
                    write!(f, " name={}", name)?;
                }
                if let Some(message) = self.message() {
                    write!(f, " message='{}'", truncate_with_indicator(message))?;
                }
            }
            Link::Foreign(foreign) => {
                let rendered = foreign.to_string();
                write!(f, " foreign='{}'", truncate_with_indicator(&rendered))?;
            }
        }
        Ok(())
    }
}

/// Borrowed, per-link view of a [`CodedError`] chain for logging.
///
/// Created by [`CodedError::chain_log`] or [`CodedError::with_chain_log`].
#[derive(Debug)]
pub struct ChainLog<'a> {
    head: &'a CodedError,
    links: SmallVec<[LinkLog<'a>; 4]>,
}

impl<'a> ChainLog<'a> {
    pub(crate) fn new(head: &'a CodedError) -> Self {
        let links = head
            .chain()
            .enumerate()
            .map(|(depth, link)| LinkLog { depth, link })
            .collect();
        Self { head, links }
    }

    /// The error the view was built from.
    #[inline]
    pub const fn head(&self) -> &'a CodedError {
        self.head
    }

    /// Every link, outermost first.
    #[inline]
    pub fn links(&self) -> &[LinkLog<'a>] {
        &self.links
    }

    /// Number of links.
    #[inline]
    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Innermost link.
    #[inline]
    pub fn root(&self) -> Option<&LinkLog<'a>> {
        self.links.last()
    }

    /// Write the chain as one bounded line.
    ///
    /// At most [`MAX_RENDERED_LINKS`] links are written; each field is capped
    /// at [`MAX_FIELD_OUTPUT_LEN`] bytes.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        for (i, link) in self.links.iter().take(MAX_RENDERED_LINKS).enumerate() {
            if i > 0 {
                f.write_str(LINK_SEPARATOR)?;
            }
            link.write_to(f)?;
        }
        if self.links.len() > MAX_RENDERED_LINKS {
            write!(f, "{}({} more links)", LINK_SEPARATOR, self.links.len() - MAX_RENDERED_LINKS)?;
        }
        Ok(())
    }

    /// Emit one `tracing` event for the whole chain at `level`.
    pub fn emit(&self, level: Level) {
        let code = self.head.code().value();
        let group = self.head.group().map_or("unknown", Group::label);
        let depth = self.depth();

        if level == Level::ERROR {
            tracing::error!(code, group, depth, chain = %self, "coded error");
        } else if level == Level::WARN {
            tracing::warn!(code, group, depth, chain = %self, "coded error");
        } else if level == Level::INFO {
            tracing::info!(code, group, depth, chain = %self, "coded error");
        } else if level == Level::DEBUG {
            tracing::debug!(code, group, depth, chain = %self, "coded error");
        } else {
            tracing::trace!(code, group, depth, chain = %self, "coded error");
        }
    }
}

impl fmt::Display for ChainLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl CodedError {
    /// Emit the chain as one `tracing` event at `level`.
    #[inline]
    pub fn log_chain(&self, level: Level) {
        self.chain_log().emit(level);
    }
}

/// Truncate a string for display.
///
/// Strings longer than [`MAX_FIELD_OUTPUT_LEN`] are cut on a character
/// boundary and end with [`TRUNCATION_INDICATOR`].
pub fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{basic, fs};
    use std::io;

    #[test]
    fn truncate_ascii() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN + 10);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn no_truncate_when_under_limit() {
        let s = "short string";
        let truncated = truncate_with_indicator(s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated, s);
    }

    #[test]
    fn truncate_utf8_boundary() {
        // two bytes per char
        let s = "й".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn truncate_emoji() {
        let s = "🔥".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(std::str::from_utf8(truncated.as_bytes()).is_ok());
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);
        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated.len(), MAX_FIELD_OUTPUT_LEN);
    }

    #[test]
    fn one_over_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN + 1);
        let truncated = truncate_with_indicator(&s);
        assert!(matches!(truncated, Cow::Owned(_)));
        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
    }

    #[test]
    fn links_expose_fields() {
        let err = CodedError::new(basic::OTHER).with_cause(
            CodedError::new(fs::INVALID_PATH)
                .with_message("a\0b")
                .with_foreign_cause(io::Error::other("nul byte")),
        );
        let log = err.chain_log();

        assert_eq!(log.depth(), 3);
        let links = log.links();
        assert_eq!(links[0].name(), Some("OTHER"));
        assert_eq!(links[0].message(), None);
        assert_eq!(links[1].group(), Some(Group::Filesystem));
        assert_eq!(links[1].message(), Some("a\0b"));
        assert_eq!(links[2].code(), None);
        assert_eq!(links[2].foreign().map(|e| e.to_string()), Some("nul byte".to_string()));
        assert_eq!(log.root().map(|l| l.depth), Some(2));
    }

    #[test]
    fn write_to_renders_foreign_and_unknown_links() {
        let err = CodedError::new(ErrorCode::new(-1)).with_foreign_cause(io::Error::other("boom"));
        let mut line = String::new();
        err.chain_log().write_to(&mut line).unwrap();
        assert_eq!(line, "#0 code=-1 <- #1 foreign='boom'");
    }

    #[test]
    fn write_to_is_bounded() {
        let mut err = CodedError::new(basic::DUMMY);
        for _ in 0..100 {
            err = CodedError::new(basic::OTHER).with_cause(err);
        }
        let err = CodedError::new(basic::KEY)
            .with_message("x".repeat(10 * MAX_FIELD_OUTPUT_LEN))
            .with_cause(err);
        let rendered = err.chain_log().to_string();
        assert!(rendered.ends_with("(70 more links)"));
        assert!(rendered.contains(TRUNCATION_INDICATOR));
        assert!(!rendered.contains(&"x".repeat(MAX_FIELD_OUTPUT_LEN)));
    }

    #[test]
    fn emit_without_subscriber_is_silent() {
        let err = CodedError::new(basic::DUMMY).with_message("nobody listens");
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            err.log_chain(level);
        }
    }
}
