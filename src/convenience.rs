//! Convenience macros for declaring code registries and building errors.
//!
//! # Declaring a group
//!
//! [`define_code_group!`] turns a list of `NAME = (offset, "description")`
//! pairs into `pub const` codes, an `ENTRIES` table and the lookup and
//! rendering functions every registry exposes. Offsets are checked against
//! the group capacity at compile time.
//!
//! ```rust
//! mod jobs {
//!     use ranged_errors::{define_code_group, Group};
//!
//!     define_code_group! {
//!         Group::App, "jobs" => {
//!             /// The job queue is full.
//!             QUEUE_FULL = (0, "job queue is full"),
//!             /// The job was cancelled.
//!             CANCELLED = (1, "job was cancelled"),
//!         }
//!     }
//! }
//!
//! assert_eq!(jobs::CANCELLED.value(), 1_000_000_001);
//! assert_eq!(jobs::code_to_string(jobs::QUEUE_FULL), "job queue is full");
//! assert_eq!(jobs::name(jobs::CANCELLED), Some("CANCELLED"));
//! ```
//!
//! # Building errors
//!
//! ```rust
//! # use ranged_errors::{coded_err, definitions::fs};
//! let path = "/var/lib/thing";
//! let err = coded_err!(fs::NOT_A_DIR, "'{}'", path);
//! assert_eq!(err.describe(), "not a directory '/var/lib/thing'");
//! ```

/// Declare the codes of one group as sequential offsets from its start.
///
/// Expands in the calling module to:
/// - one `pub const NAME: ErrorCode` per entry,
/// - `GROUP`, the group the codes belong to,
/// - `ENTRIES`, the static registry table,
/// - `lookup`, `name` and `code_to_string`.
///
/// `code_to_string` never panics: codes without an entry render as
/// `unknown <label> error code (<n>)`.
#[macro_export]
macro_rules! define_code_group {
    (
        $group:expr, $label:literal => {
            $(
                $(#[$meta:meta])*
                $name:ident = ($offset:expr, $desc:literal)
            ),* $(,)?
        }
    ) => {
        $(
            $(#[$meta])*
            pub const $name: $crate::ErrorCode = $crate::ErrorCode::in_group($group, $offset);
        )*

        /// Group owning every code in this registry.
        pub const GROUP: $crate::Group = $group;

        /// Static registry table, in declaration order.
        pub const ENTRIES: &[$crate::definitions::RegistryEntry] = &[
            $(
                $crate::definitions::RegistryEntry {
                    name: stringify!($name),
                    code: $name,
                    description: $desc,
                },
            )*
        ];

        /// Find the registry entry for `code`.
        pub fn lookup(
            code: $crate::ErrorCode,
        ) -> Option<&'static $crate::definitions::RegistryEntry> {
            ENTRIES.iter().find(|entry| entry.code == code)
        }

        /// Registry name of `code`, e.g. `NOT_FOUND`.
        pub fn name(code: $crate::ErrorCode) -> Option<&'static str> {
            lookup(code).map(|entry| entry.name)
        }

        /// Canonical description of `code`, with a numeric fallback.
        pub fn code_to_string(code: $crate::ErrorCode) -> ::std::borrow::Cow<'static, str> {
            match lookup(code) {
                Some(entry) => ::std::borrow::Cow::Borrowed(entry.description),
                None => ::std::borrow::Cow::Owned(format!(
                    "unknown {} error code ({})",
                    $label,
                    code.value()
                )),
            }
        }
    };
}

/// Build a [`CodedError`](crate::CodedError) with an optional formatted message.
///
/// ```rust
/// # use ranged_errors::{coded_err, definitions::basic};
/// let bare = coded_err!(basic::TIMED_OUT);
/// let fixed = coded_err!(basic::INVALID_INPUT, "empty user name");
/// let formatted = coded_err!(basic::INDEX, "{} >= {}", 7, 3);
///
/// assert!(bare.message().is_none());
/// assert_eq!(fixed.message(), Some("empty user name"));
/// assert_eq!(formatted.message(), Some("7 >= 3"));
/// ```
#[macro_export]
macro_rules! coded_err {
    ($code:expr $(,)?) => {
        $crate::CodedError::new($code)
    };
    ($code:expr, $msg:literal $(,)?) => {
        $crate::CodedError::new($code).with_message($msg)
    };
    ($code:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::CodedError::new($code).with_message(format!($fmt, $($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{ErrorCode, Group};

    mod sample {
        use crate::Group;

        define_code_group! {
            Group::Math, "sample" => {
                FIRST = (0, "first sample"),
                /// Documented entry.
                SECOND = (1, "second sample"),
            }
        }
    }

    #[test]
    fn macro_assigns_sequential_offsets() {
        assert_eq!(sample::FIRST.value(), Group::Math.begin());
        assert_eq!(sample::SECOND.value(), Group::Math.begin() + 1);
        assert_eq!(sample::GROUP, Group::Math);
        assert_eq!(sample::ENTRIES.len(), 2);
    }

    #[test]
    fn macro_lookup_and_fallback() {
        assert_eq!(sample::name(sample::SECOND), Some("SECOND"));
        assert_eq!(sample::code_to_string(sample::FIRST), "first sample");

        let unknown = ErrorCode::new(Group::Math.begin() + 50);
        assert_eq!(sample::lookup(unknown), None);
        assert_eq!(
            sample::code_to_string(unknown),
            format!("unknown sample error code ({})", unknown.value())
        );
    }

    #[test]
    fn coded_err_variants() {
        let e = coded_err!(sample::FIRST, "value {}", 42);
        assert!(e.code_equals(sample::FIRST));
        assert_eq!(e.message(), Some("value 42"));

        let bare = coded_err!(sample::SECOND);
        assert!(bare.message().is_none());
    }
}
