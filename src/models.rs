//! Building blocks of a [`CodedError`]: message, cause, chain traversal.
//!
//! # Cause chain
//!
//! A cause is a sum type: another [`CodedError`] or a foreign
//! `std::error::Error`. Traversal is a `match`, never a runtime type probe:
//!
//! ```text
//! CodedError ──cause──▶ CodedError ──cause──▶ Foreign ──source()──▶ Foreign
//! ```
//!
//! Coded causes are owned through a `Box`, so a coded cycle cannot be built.
//! Foreign causes are shared through an `Arc` because foreign errors are not
//! `Clone`; they are immutable once wrapped, so sharing them does not break the
//! value semantics of `CodedError::clone`.
//!
//! # Message memory
//!
//! Messages often carry paths, user names and command lines produced by
//! collaborators. Owned message buffers are zeroized on drop; borrowed
//! `&'static str` messages are assumed to be literals and left alone.

use crate::{CodedError, ErrorCode};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroize;

/// Shared, immutable foreign error.
pub type ForeignError = Arc<dyn Error + Send + Sync + 'static>;

// ============================================================================
// Message
// ============================================================================

/// Human-supplied context appended to a code's canonical description.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    value: Cow<'static, str>,
}

impl Message {
    /// Message text.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_ref()
    }

    /// True for an empty message.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&'static str> for Message {
    fn from(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }
}

impl From<Cow<'static, str>> for Message {
    fn from(value: Cow<'static, str>) -> Self {
        Self { value }
    }
}

impl Zeroize for Message {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.value {
            s.zeroize();
        }
    }
}

impl Drop for Message {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Cause
// ============================================================================

/// What a [`CodedError`] wraps.
#[derive(Clone)]
pub enum Cause {
    /// Another coded error.
    Coded(Box<CodedError>),
    /// Any other error. Its own `source()` chain continues the traversal.
    Foreign(ForeignError),
}

impl Cause {
    /// Wrap a foreign error. A `CodedError` passed here is stored as
    /// [`Cause::Coded`] so its code stays visible to chain matching.
    pub fn foreign<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn Error + Send + Sync + 'static> = Box::new(error);
        match boxed.downcast::<CodedError>() {
            Ok(coded) => Cause::Coded(coded),
            Err(other) => Cause::Foreign(Arc::from(other)),
        }
    }

    /// The cause as a link of the chain.
    #[inline]
    pub fn as_link(&self) -> Link<'_> {
        match self {
            Cause::Coded(coded) => Link::Coded(&**coded),
            Cause::Foreign(foreign) => Link::Foreign(&**foreign),
        }
    }

    /// The cause as a `dyn Error`.
    #[inline]
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Cause::Coded(coded) => &**coded,
            Cause::Foreign(foreign) => &**foreign,
        }
    }
}

impl From<CodedError> for Cause {
    fn from(error: CodedError) -> Self {
        Cause::Coded(Box::new(error))
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Coded(coded) => f.debug_tuple("Coded").field(coded).finish(),
            Cause::Foreign(foreign) => f.debug_tuple("Foreign").field(foreign).finish(),
        }
    }
}

// ============================================================================
// Chain traversal
// ============================================================================

/// One element of a cause chain.
#[derive(Clone, Copy)]
pub enum Link<'a> {
    /// A coded error.
    Coded(&'a CodedError),
    /// A foreign error, including errors reached through `source()`.
    Foreign(&'a (dyn Error + 'static)),
}

impl<'a> Link<'a> {
    /// Code of a coded link.
    #[inline]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Link::Coded(coded) => Some(coded.code()),
            Link::Foreign(_) => None,
        }
    }

    /// The link as a `dyn Error`.
    #[inline]
    pub fn as_error(&self) -> &'a (dyn Error + 'static) {
        match *self {
            Link::Coded(coded) => coded,
            Link::Foreign(foreign) => foreign,
        }
    }

    /// Classify an arbitrary error; a `CodedError` behind a `dyn Error`
    /// becomes a coded link.
    #[inline]
    pub fn from_error(error: &'a (dyn Error + 'static)) -> Self {
        match error.downcast_ref::<CodedError>() {
            Some(coded) => Link::Coded(coded),
            None => Link::Foreign(error),
        }
    }

    /// Next link: the cause of a coded link, `source()` of a foreign one.
    #[inline]
    pub fn next(&self) -> Option<Link<'a>> {
        match *self {
            Link::Coded(coded) => coded.cause().map(Cause::as_link),
            Link::Foreign(foreign) => foreign.source().map(Link::from_error),
        }
    }
}

impl fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Coded(coded) => f.debug_tuple("Coded").field(&coded.code()).finish(),
            Link::Foreign(foreign) => f.debug_tuple("Foreign").field(&foreign.to_string()).finish(),
        }
    }
}

/// Iterator over a cause chain, outermost first.
///
/// Finite by construction: coded causes are boxed and cannot form a cycle,
/// and foreign errors end where `source()` returns `None`.
pub struct Chain<'a> {
    next: Option<Link<'a>>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(head: &'a CodedError) -> Self {
        Self {
            next: Some(Link::Coded(head)),
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next();
        Some(current)
    }
}

// ============================================================================
// Chain matching target
// ============================================================================

/// What [`CodedError::matches_in_chain`] looks for.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// Any coded link with this code.
    Code(ErrorCode),
    /// Any coded link with the same code as this error (message and cause
    /// are ignored).
    Coded(&'a CodedError),
    /// This exact foreign error object.
    ///
    /// Matching compares addresses with the object stored in the chain. Keep a
    /// handle to it with [`CodedError::with_shared_cause`]; a value moved in
    /// with `with_foreign_cause` (including a `&'static` sentinel, which is
    /// stored as a reference) is matched with [`CodedError::chain_contains`].
    Foreign(&'a (dyn Error + 'static)),
}

impl Target<'_> {
    pub(crate) fn matches(&self, link: &Link<'_>) -> bool {
        match (self, link) {
            (Target::Code(code), Link::Coded(coded)) => coded.code_equals(*code),
            (Target::Coded(target), Link::Coded(coded)) => coded.code_equals(target.code()),
            (Target::Foreign(target), Link::Foreign(foreign)) => {
                std::ptr::addr_eq(*target as *const dyn Error, *foreign as *const dyn Error)
            }
            _ => false,
        }
    }
}

impl From<ErrorCode> for Target<'_> {
    fn from(code: ErrorCode) -> Self {
        Target::Code(code)
    }
}

impl<'a> From<&'a CodedError> for Target<'a> {
    fn from(error: &'a CodedError) -> Self {
        Target::Coded(error)
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Code(code) => f.debug_tuple("Code").field(code).finish(),
            Target::Coded(coded) => f.debug_tuple("Coded").field(&coded.code()).finish(),
            Target::Foreign(foreign) => {
                f.debug_tuple("Foreign").field(&foreign.to_string()).finish()
            }
        }
    }
}
