//! Error code space - a flat `i32` identifier range partitioned into groups.
//!
//! Every group owns one closed, contiguous interval of the code space. The
//! intervals never overlap, so classifying a code is a handful of integer
//! comparisons instead of a type tag:
//!
//! | group        | begin         | end           |
//! |--------------|---------------|---------------|
//! | basic        | 0             | 99            |
//! | http         | 100           | 599           |
//! | filesystem   | 1 000 000     | 1 000 299     |
//! | auth         | 1 000 300     | 1 000 599     |
//! | network      | 1 000 600     | 1 000 899     |
//! | database     | 1 000 900     | 1 001 199     |
//! | math         | 1 001 200     | 1 001 499     |
//! | system       | 1 001 500     | 1 001 799     |
//! | app-reserved | 1 000 000 000 | 1 000 099 999 |
//!
//! Codes outside every interval are "unknown". Nothing in this crate panics on
//! an unknown code; [`group_of`] returns `None` and rendering falls back to a
//! string that embeds the number.
//!
//! # Example
//!
//! ```rust
//! use ranged_errors::{ErrorCode, Group, group_of, definitions::fs};
//!
//! assert_eq!(group_of(fs::NOT_A_DIR), Some(Group::Filesystem));
//! assert_eq!(group_of(ErrorCode::new(-1)), None);
//! ```

use std::fmt;

/// Range boundary constants for every group.
///
/// Checked for disjointness and capacity in the `tests` module.
#[allow(missing_docs)]
#[rustfmt::skip]
pub mod ranges {
    pub const BASIC_BEGIN: i32 = 0;             pub const BASIC_END: i32 = 99;
    pub const HTTP_BEGIN: i32 = 100;            pub const HTTP_END: i32 = 599;
    pub const FS_BEGIN: i32 = 1_000_000;        pub const FS_END: i32 = 1_000_299;
    pub const AUTH_BEGIN: i32 = 1_000_300;      pub const AUTH_END: i32 = 1_000_599;
    pub const NET_BEGIN: i32 = 1_000_600;       pub const NET_END: i32 = 1_000_899;
    pub const DB_BEGIN: i32 = 1_000_900;        pub const DB_END: i32 = 1_001_199;
    pub const MATH_BEGIN: i32 = 1_001_200;      pub const MATH_END: i32 = 1_001_499;
    pub const SYS_BEGIN: i32 = 1_001_500;       pub const SYS_END: i32 = 1_001_799;
    pub const APP_BEGIN: i32 = 1_000_000_000;   pub const APP_END: i32 = 1_000_099_999;

    /// Every group is guaranteed at least this many contiguous values.
    pub const MIN_CAPACITY: i32 = 100;
}

// ============================================================================
// Group
// ============================================================================

/// A named, fixed-capacity sub-range of the code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    /// General-purpose codes, including the `0` "no error" sentinel.
    Basic,
    /// Codes whose value is an HTTP status.
    Http,
    /// File system errors.
    Filesystem,
    /// Authentication and authorization errors.
    Auth,
    /// Network errors.
    Network,
    /// Database errors.
    Database,
    /// Arithmetic errors.
    Math,
    /// System-level events (exit, keyboard interrupt).
    System,
    /// Reserved for codes defined by the host application.
    App,
}

impl Group {
    /// All groups in ascending range order.
    pub const ALL: [Group; 9] = [
        Group::Basic,
        Group::Http,
        Group::Filesystem,
        Group::Auth,
        Group::Network,
        Group::Database,
        Group::Math,
        Group::System,
        Group::App,
    ];

    /// First code of the group (inclusive).
    #[inline]
    pub const fn begin(self) -> i32 {
        use ranges::*;
        match self {
            Group::Basic => BASIC_BEGIN,
            Group::Http => HTTP_BEGIN,
            Group::Filesystem => FS_BEGIN,
            Group::Auth => AUTH_BEGIN,
            Group::Network => NET_BEGIN,
            Group::Database => DB_BEGIN,
            Group::Math => MATH_BEGIN,
            Group::System => SYS_BEGIN,
            Group::App => APP_BEGIN,
        }
    }

    /// Last code of the group (inclusive).
    #[inline]
    pub const fn end(self) -> i32 {
        use ranges::*;
        match self {
            Group::Basic => BASIC_END,
            Group::Http => HTTP_END,
            Group::Filesystem => FS_END,
            Group::Auth => AUTH_END,
            Group::Network => NET_END,
            Group::Database => DB_END,
            Group::Math => MATH_END,
            Group::System => SYS_END,
            Group::App => APP_END,
        }
    }

    /// Number of codes the group can hold.
    #[inline]
    pub const fn capacity(self) -> i32 {
        self.end() - self.begin() + 1
    }

    /// Check whether `code` lies inside this group's interval.
    #[inline]
    pub const fn contains(self, code: ErrorCode) -> bool {
        code.0 >= self.begin() && code.0 <= self.end()
    }

    /// Human-readable group name.
    pub const fn name(self) -> &'static str {
        match self {
            Group::Basic => "basic",
            Group::Http => "http",
            Group::Filesystem => "filesystem",
            Group::Auth => "auth",
            Group::Network => "network",
            Group::Database => "database",
            Group::Math => "math",
            Group::System => "system",
            Group::App => "app",
        }
    }

    /// Short label matching the registry module name (`fs`, `net`, ...).
    pub const fn label(self) -> &'static str {
        match self {
            Group::Basic => "basic",
            Group::Http => "http",
            Group::Filesystem => "fs",
            Group::Auth => "auth",
            Group::Network => "net",
            Group::Database => "db",
            Group::Math => "math",
            Group::System => "sys",
            Group::App => "app",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a code into its group.
///
/// Total and pure: every `i32` maps to exactly one group, or to `None` when it
/// lies outside every interval.
#[inline]
pub const fn group_of(code: ErrorCode) -> Option<Group> {
    let mut i = 0;
    while i < Group::ALL.len() {
        let group = Group::ALL[i];
        if group.contains(code) {
            return Some(group);
        }
        i += 1;
    }
    None
}

// ============================================================================
// Error Code
// ============================================================================

/// A 32-bit error code identifier.
///
/// Codes are plain values: `Copy`, compared by number, hashed by number.
/// Display renders the canonical description from the owning registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ErrorCode(i32);

impl ErrorCode {
    /// The "no error" sentinel (basic group, offset 0).
    pub const NO_ERROR: ErrorCode = ErrorCode(ranges::BASIC_BEGIN);

    /// Wrap a raw code. Any value is accepted; unknown codes are legal.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Build the code at `offset` inside `group`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is negative or does not fit the group capacity.
    /// In const contexts this is a compile error.
    #[inline]
    pub const fn in_group(group: Group, offset: i32) -> Self {
        assert!(
            offset >= 0 && offset < group.capacity(),
            "offset exceeds group capacity"
        );
        Self(group.begin() + offset)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Owning group, or `None` for unknown codes.
    #[inline]
    pub const fn group(self) -> Option<Group> {
        group_of(self)
    }

    /// Offset of the code inside its group.
    #[inline]
    pub const fn offset(self) -> Option<i32> {
        match group_of(self) {
            Some(group) => Some(self.0 - group.begin()),
            None => None,
        }
    }

    /// True for the `0` sentinel.
    #[inline]
    pub const fn is_no_error(self) -> bool {
        self.0 == Self::NO_ERROR.0
    }

    /// Registry name such as `NOT_FOUND`, if the code is a named member.
    pub fn name(self) -> Option<&'static str> {
        crate::definitions::lookup(self).map(|entry| entry.name)
    }
}

impl From<i32> for ErrorCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.group(), self.name()) {
            (Some(group), Some(name)) => {
                write!(f, "ErrorCode({} {}::{})", self.0, group.label(), name)
            }
            _ => write!(f, "ErrorCode({})", self.0),
        }
    }
}

impl fmt::Display for ErrorCode {
    /// Canonical description, e.g. `not a directory`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::definitions::code_to_string(*self))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_have_minimum_capacity() {
        for group in Group::ALL {
            assert!(
                group.end() - group.begin() >= ranges::MIN_CAPACITY - 1,
                "group '{}' has capacity {}",
                group,
                group.capacity()
            );
        }
    }

    #[test]
    fn ranges_are_disjoint() {
        for (i, a) in Group::ALL.iter().enumerate() {
            for b in &Group::ALL[i + 1..] {
                let overlap = a.begin() <= b.end() && b.begin() <= a.end();
                assert!(!overlap, "groups '{}' and '{}' overlap", a, b);
            }
        }
    }

    #[test]
    fn range_edges_belong_to_exactly_one_group() {
        for group in Group::ALL {
            for edge in [group.begin(), group.end()] {
                let code = ErrorCode::new(edge);
                assert_eq!(group_of(code), Some(group));
                let owners = Group::ALL.iter().filter(|g| g.contains(code)).count();
                assert_eq!(owners, 1);
            }
        }
    }

    #[test]
    fn codes_outside_ranges_are_unknown() {
        for raw in [-1, 600, 999_999, 1_001_800, 999_999_999, 1_000_100_000, i32::MIN, i32::MAX] {
            assert_eq!(group_of(ErrorCode::new(raw)), None, "{} classified", raw);
        }
    }

    #[test]
    fn in_group_offsets_from_begin() {
        let code = ErrorCode::in_group(Group::Network, 3);
        assert_eq!(code.value(), ranges::NET_BEGIN + 3);
        assert_eq!(code.offset(), Some(3));
        assert_eq!(ErrorCode::new(-5).offset(), None);
    }

    #[test]
    #[should_panic(expected = "offset exceeds group capacity")]
    fn in_group_rejects_overflowing_offset() {
        let _ = ErrorCode::in_group(Group::Basic, 100);
    }

    #[test]
    fn no_error_is_basic_zero() {
        assert!(ErrorCode::NO_ERROR.is_no_error());
        assert_eq!(ErrorCode::default(), ErrorCode::NO_ERROR);
        assert_eq!(ErrorCode::NO_ERROR.group(), Some(Group::Basic));
    }

    #[test]
    fn debug_includes_registry_name() {
        let code = crate::definitions::fs::NOT_A_DIR;
        assert_eq!(format!("{:?}", code), "ErrorCode(1000002 fs::NOT_A_DIR)");
        assert_eq!(format!("{:?}", ErrorCode::new(-7)), "ErrorCode(-7)");
    }
}
