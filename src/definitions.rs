//! Group registries - the named codes of every group.
//!
//! # Taxonomy
//!
//! Each submodule owns one group of the code space (see [`crate::codes`]) and
//! assigns its codes sequentially from the group's first value:
//!
//! - [`basic`]: general-purpose codes; offset 0 is the global "no error"
//! - [`http`]: HTTP statuses, the code value *is* the status
//! - [`fs`]: file system
//! - [`auth`]: authentication and authorization
//! - [`net`]: network
//! - [`db`]: database
//! - [`math`]: arithmetic
//! - [`sys`]: system events
//!
//! App-reserved codes have no registry here; the host application renders
//! them through [`crate::formatter`].
//!
//! Every registry keeps its generic, unspecified code at offset 0 and exports
//! it as `GENERIC`, with two exceptions: offset 0 of `basic` is `NO_ERROR`, and
//! offset 0 of `http` is 100 Continue, which is not an error.
//!
//! # Governance
//!
//! Registry consistency (entries inside their range, unique names, unique
//! descriptions, `NO_ERROR` only in `basic`) is enforced by the `tests` module
//! at the bottom of this file.

use crate::formatter::{self, AppFormatter};
use crate::{ErrorCode, Group};
use std::borrow::Cow;

/// One named member of a group registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Constant name, e.g. `NOT_FOUND`.
    pub name: &'static str,
    /// Numeric code.
    pub code: ErrorCode,
    /// Canonical human-readable description.
    pub description: &'static str,
}

// -----------------------------------------------------------------------------
// BASIC (0-99)
// -----------------------------------------------------------------------------

/// General-purpose codes shared by every collaborator.
pub mod basic {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Basic, "basic" => {
            /// Zero code, means no error.
            NO_ERROR = (0, "no error"),
            /// Entity not found.
            NOT_FOUND = (1, "entity not found"),
            /// Operation lacked the necessary privileges to complete.
            PERMISSION_DENIED = (2, "permission denied"),
            /// Operation failed because a pipe was closed.
            BROKEN_PIPE = (3, "broken pipe"),
            /// Entity already exists, often a file.
            ALREADY_EXISTS = (4, "entity already exists"),
            /// Entity already closed, often a file.
            ALREADY_CLOSED = (5, "entity already closed"),
            /// Operation needs to block to complete, but blocking was not allowed.
            WOULD_BLOCK = (6, "operation would block"),
            /// A parameter was incorrect.
            INVALID_INPUT = (7, "invalid input parameter"),
            /// Source data is malformed, e.g. a file that should be UTF-8 is not.
            INVALID_DATA = (8, "invalid source data"),
            /// Operation timed out and was cancelled.
            TIMED_OUT = (9, "operation timed out"),
            /// A write returned zero bytes; nothing more can be written right now.
            WRITE_ZERO = (10, "write returned zero bytes"),
            /// Operation was interrupted and can typically be retried.
            INTERRUPTED = (11, "operation interrupted"),
            /// An error the normal flow control did not anticipate.
            OTHER = (12, "other error"),
            /// End of file was reached prematurely.
            UNEXPECTED_EOF = (13, "unexpected end of file"),
            /// Unsupported on the current platform.
            UNSUPPORTED = (14, "unsupported operation"),
            /// An assertion did not hold.
            ASSERTION = (15, "assertion failed"),
            /// Index out of range.
            INDEX = (16, "index out of range"),
            /// Key missing or invalid.
            KEY = (17, "key error"),
            /// Memory corruption or allocation failure.
            MEMORY = (18, "memory error"),
            /// Entity not implemented.
            NOT_IMPLEMENTED = (19, "not implemented"),
            /// Recursion not allowed or unbounded.
            RECURSION = (20, "recursion error"),
            /// Generic syntax error.
            SYNTAX = (21, "syntax error"),
            /// A type is invalid.
            TYPE = (22, "type error"),
            /// A value is invalid.
            VALUE = (23, "value error"),
            /// Placeholder used by tests and benchmarks.
            DUMMY = (24, "dummy error for testing purposes"),
            /// A Unix symlink was found on a platform that cannot resolve it.
            SYMLINKS_NOT_SUPPORTED = (25, "symlinks not supported on this platform"),
            /// A subprocess exited unsuccessfully.
            PROCESS_EXIT = (26, "process exited with error"),
            /// Result already achieved or the job cannot be done.
            NOTHING_DONE = (27, "nothing done (result already achieved or job can't be done)"),
        }
    }

    /// Generic code of the basic group. Offset 0 is reserved for `NO_ERROR`.
    pub const GENERIC: ErrorCode = OTHER;
}

// -----------------------------------------------------------------------------
// FS (1 000 000 - 1 000 299)
// -----------------------------------------------------------------------------

/// File system codes.
pub mod fs {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Filesystem, "fs" => {
            /// Generic file system error.
            ERROR = (0, "file system error"),
            /// Entity is not a file.
            NOT_A_FILE = (1, "not a file"),
            /// Entity is not a directory.
            NOT_A_DIR = (2, "not a directory"),
            /// Entity is not a symlink.
            NOT_A_SYMLINK = (3, "not a symlink"),
            /// Entity is not a hardlink.
            NOT_A_HARDLINK = (4, "not a hardlink"),
            /// File contents are corrupt.
            FILE_CORRUPT = (5, "file is corrupt"),
            /// File is too large.
            FILE_TOO_LARGE = (6, "file is too large"),
            /// Path is malformed.
            INVALID_PATH = (7, "invalid path"),
        }
    }

    /// Generic file system code.
    pub const GENERIC: ErrorCode = ERROR;
}

// -----------------------------------------------------------------------------
// AUTH (1 000 300 - 1 000 599)
// -----------------------------------------------------------------------------

/// Authentication and authorization codes.
pub mod auth {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Auth, "auth" => {
            /// Authentication failed without further detail.
            FAILED = (0, "authentication failed"),
            /// Bad credentials.
            CREDENTIALS = (1, "bad credentials"),
            /// Proposed authentication method not supported.
            UNSUPPORTED_METHOD = (2, "unsupported authentication method"),
        }
    }

    /// Generic auth code.
    pub const GENERIC: ErrorCode = FAILED;
}

// -----------------------------------------------------------------------------
// NET (1 000 600 - 1 000 899)
// -----------------------------------------------------------------------------

/// Network codes.
pub mod net {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Network, "net" => {
            /// Generic network error.
            ERROR = (0, "network error"),
            /// Connection refused by the remote host.
            CONNECTION_REFUSED = (1, "connection refused"),
            /// Connection reset by the remote host.
            CONNECTION_RESET = (2, "connection reset"),
            /// Connection aborted by the remote host.
            CONNECTION_ABORTED = (3, "connection aborted"),
            /// Operation failed because the socket is not connected.
            NOT_CONNECTED = (4, "not connected"),
            /// Socket address already in use.
            ADDR_IN_USE = (5, "address in use"),
            /// Interface does not exist or address is not local.
            ADDR_NOT_AVAILABLE = (6, "address not available"),
        }
    }

    /// Generic network code.
    pub const GENERIC: ErrorCode = ERROR;
}

// -----------------------------------------------------------------------------
// DB (1 000 900 - 1 001 199)
// -----------------------------------------------------------------------------

/// Database codes.
pub mod db {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Database, "db" => {
            /// Generic database error.
            ERROR = (0, "database error"),
        }
    }

    /// Generic database code.
    pub const GENERIC: ErrorCode = ERROR;
}

// -----------------------------------------------------------------------------
// MATH (1 001 200 - 1 001 499)
// -----------------------------------------------------------------------------

/// Arithmetic codes.
pub mod math {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::Math, "math" => {
            /// Generic math error.
            ERROR = (0, "math error"),
            /// Floating point operation failed.
            FLOATING_POINT = (1, "floating point error"),
            /// Arithmetic overflow.
            OVERFLOW = (2, "overflow"),
            /// Division by zero.
            ZERO_DIVISION = (3, "division by zero"),
        }
    }

    /// Generic math code.
    pub const GENERIC: ErrorCode = ERROR;
}

// -----------------------------------------------------------------------------
// SYS (1 001 500 - 1 001 799)
// -----------------------------------------------------------------------------

/// System event codes.
pub mod sys {
    use crate::{define_code_group, ErrorCode, Group};

    define_code_group! {
        Group::System, "sys" => {
            /// Generic system error.
            ERROR = (0, "system error"),
            /// The process was asked to exit.
            SYSTEM_EXIT = (1, "system exit"),
            /// Interrupted from the keyboard.
            KEYBOARD_INTERRUPT = (2, "keyboard interrupt"),
        }
    }

    /// Generic system code.
    pub const GENERIC: ErrorCode = ERROR;
}

// -----------------------------------------------------------------------------
// HTTP (100-599)
// -----------------------------------------------------------------------------

/// HTTP status codes. The numeric value of a code equals the status.
///
/// Unlike the other registries this one is not sequential: the range mirrors
/// the status space, and any status inside it is a valid code even without a
/// named constant.
///
/// The first code of the range is 100 Continue, an informational status that
/// is not an error, so `GENERIC` is 500 Internal Server Error rather than the
/// range start.
pub mod http {
    use super::RegistryEntry;
    use crate::{ErrorCode, Group};
    use std::borrow::Cow;

    macro_rules! http_statuses {
        ($($name:ident = ($status:literal, $desc:literal)),* $(,)?) => {
            $(
                #[doc = concat!("HTTP ", $desc, ".")]
                pub const $name: ErrorCode = ErrorCode::new($status);
            )*

            /// Static registry table of named statuses.
            pub const ENTRIES: &[RegistryEntry] = &[
                $(RegistryEntry { name: stringify!($name), code: $name, description: $desc },)*
            ];
        };
    }

    http_statuses! {
        CONTINUE = (100, "100 continue"),
        SWITCHING_PROTOCOLS = (101, "101 switching protocols"),
        PROCESSING = (102, "102 processing"),
        EARLY_HINTS = (103, "103 early hints"),
        OK = (200, "200 ok"),
        CREATED = (201, "201 created"),
        ACCEPTED = (202, "202 accepted"),
        NON_AUTHORITATIVE_INFORMATION = (203, "203 non-authoritative information"),
        NO_CONTENT = (204, "204 no content"),
        RESET_CONTENT = (205, "205 reset content"),
        PARTIAL_CONTENT = (206, "206 partial content"),
        MULTIPLE_CHOICES = (300, "300 multiple choices"),
        MOVED_PERMANENTLY = (301, "301 moved permanently"),
        FOUND = (302, "302 found"),
        SEE_OTHER = (303, "303 see other"),
        NOT_MODIFIED = (304, "304 not modified"),
        TEMPORARY_REDIRECT = (307, "307 temporary redirect"),
        PERMANENT_REDIRECT = (308, "308 permanent redirect"),
        BAD_REQUEST = (400, "400 bad request"),
        UNAUTHORIZED = (401, "401 unauthorized"),
        PAYMENT_REQUIRED = (402, "402 payment required"),
        FORBIDDEN = (403, "403 forbidden"),
        NOT_FOUND = (404, "404 not found"),
        METHOD_NOT_ALLOWED = (405, "405 method not allowed"),
        NOT_ACCEPTABLE = (406, "406 not acceptable"),
        PROXY_AUTHENTICATION_REQUIRED = (407, "407 proxy authentication required"),
        REQUEST_TIMEOUT = (408, "408 request timeout"),
        CONFLICT = (409, "409 conflict"),
        GONE = (410, "410 gone"),
        LENGTH_REQUIRED = (411, "411 length required"),
        PRECONDITION_FAILED = (412, "412 precondition failed"),
        PAYLOAD_TOO_LARGE = (413, "413 payload too large"),
        URI_TOO_LONG = (414, "414 uri too long"),
        UNSUPPORTED_MEDIA_TYPE = (415, "415 unsupported media type"),
        RANGE_NOT_SATISFIABLE = (416, "416 range not satisfiable"),
        EXPECTATION_FAILED = (417, "417 expectation failed"),
        IM_A_TEAPOT = (418, "418 i'm a teapot"),
        MISDIRECTED_REQUEST = (421, "421 misdirected request"),
        UNPROCESSABLE_ENTITY = (422, "422 unprocessable entity"),
        LOCKED = (423, "423 locked"),
        FAILED_DEPENDENCY = (424, "424 failed dependency"),
        TOO_EARLY = (425, "425 too early"),
        UPGRADE_REQUIRED = (426, "426 upgrade required"),
        PRECONDITION_REQUIRED = (428, "428 precondition required"),
        TOO_MANY_REQUESTS = (429, "429 too many requests"),
        REQUEST_HEADER_FIELDS_TOO_LARGE = (431, "431 request header fields too large"),
        UNAVAILABLE_FOR_LEGAL_REASONS = (451, "451 unavailable for legal reasons"),
        INTERNAL_SERVER_ERROR = (500, "500 internal server error"),
        NOT_IMPLEMENTED = (501, "501 not implemented"),
        BAD_GATEWAY = (502, "502 bad gateway"),
        SERVICE_UNAVAILABLE = (503, "503 service unavailable"),
        GATEWAY_TIMEOUT = (504, "504 gateway timeout"),
        HTTP_VERSION_NOT_SUPPORTED = (505, "505 http version not supported"),
        VARIANT_ALSO_NEGOTIATES = (506, "506 variant also negotiates"),
        INSUFFICIENT_STORAGE = (507, "507 insufficient storage"),
        LOOP_DETECTED = (508, "508 loop detected"),
        NOT_EXTENDED = (510, "510 not extended"),
        NETWORK_AUTHENTICATION_REQUIRED = (511, "511 network authentication required"),
    }

    /// Group owning every HTTP code.
    pub const GROUP: Group = Group::Http;

    /// Generic HTTP code: 500, not the informational 100 at the range start.
    pub const GENERIC: ErrorCode = INTERNAL_SERVER_ERROR;

    /// Map an HTTP status onto the code space.
    ///
    /// Returns `None` for statuses outside `100..=599`.
    pub const fn from_status(status: u16) -> Option<ErrorCode> {
        let code = ErrorCode::new(status as i32);
        if GROUP.contains(code) { Some(code) } else { None }
    }

    /// HTTP status carried by `code`, if it is an HTTP code.
    pub const fn status(code: ErrorCode) -> Option<u16> {
        if GROUP.contains(code) {
            Some(code.value() as u16)
        } else {
            None
        }
    }

    /// Find the registry entry for `code`.
    pub fn lookup(code: ErrorCode) -> Option<&'static RegistryEntry> {
        ENTRIES.iter().find(|entry| entry.code == code)
    }

    /// Registry name of `code`, e.g. `NOT_FOUND`.
    pub fn name(code: ErrorCode) -> Option<&'static str> {
        lookup(code).map(|entry| entry.name)
    }

    /// Reason phrase for named statuses, `HTTP status code N` otherwise.
    pub fn code_to_string(code: ErrorCode) -> Cow<'static, str> {
        match lookup(code) {
            Some(entry) => Cow::Borrowed(entry.description),
            None => Cow::Owned(format!("HTTP status code {}", code.value())),
        }
    }
}

// ============================================================================
// Cross-group dispatch
// ============================================================================

/// Registry table of a group. App-reserved codes have none.
pub fn entries(group: Group) -> &'static [RegistryEntry] {
    match group {
        Group::Basic => basic::ENTRIES,
        Group::Http => http::ENTRIES,
        Group::Filesystem => fs::ENTRIES,
        Group::Auth => auth::ENTRIES,
        Group::Network => net::ENTRIES,
        Group::Database => db::ENTRIES,
        Group::Math => math::ENTRIES,
        Group::System => sys::ENTRIES,
        Group::App => &[],
    }
}

/// Find the registry entry for any code.
pub fn lookup(code: ErrorCode) -> Option<&'static RegistryEntry> {
    let group = code.group()?;
    entries(group).iter().find(|entry| entry.code == code)
}

/// Canonical description of any code.
///
/// App-reserved codes go through the process-wide app formatter (or its
/// default). Total for every `i32`.
pub fn code_to_string(code: ErrorCode) -> Cow<'static, str> {
    code_to_string_with(code, formatter::global())
}

/// Canonical description of any code, rendering app-reserved codes with `app`.
pub fn code_to_string_with(code: ErrorCode, app: &dyn AppFormatter) -> Cow<'static, str> {
    match code.group() {
        Some(Group::Basic) => basic::code_to_string(code),
        Some(Group::Http) => http::code_to_string(code),
        Some(Group::Filesystem) => fs::code_to_string(code),
        Some(Group::Auth) => auth::code_to_string(code),
        Some(Group::Network) => net::code_to_string(code),
        Some(Group::Database) => db::code_to_string(code),
        Some(Group::Math) => math::code_to_string(code),
        Some(Group::System) => sys::code_to_string(code),
        Some(Group::App) => Cow::Owned(app.format_app_code(code)),
        None => Cow::Owned(format!("unknown error code ({})", code.value())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Enforce that every registry entry falls inside its group's range.
    #[test]
    fn enforce_registry_ranges() {
        for group in Group::ALL {
            for entry in entries(group) {
                assert_eq!(
                    entry.code.group(),
                    Some(group),
                    "{} ({}) outside group '{}'",
                    entry.name,
                    entry.code.value(),
                    group
                );
            }
        }
    }

    #[test]
    fn registry_names_and_descriptions_are_unique() {
        for group in Group::ALL {
            let mut names = HashSet::new();
            let mut descriptions = HashSet::new();
            let mut codes = HashSet::new();
            for entry in entries(group) {
                assert!(names.insert(entry.name), "duplicate name {}", entry.name);
                assert!(
                    descriptions.insert(entry.description),
                    "duplicate description {}",
                    entry.description
                );
                assert!(codes.insert(entry.code), "duplicate code {}", entry.code.value());
            }
        }
    }

    #[test]
    fn sequential_groups_start_at_offset_zero() {
        let tables = [
            basic::ENTRIES,
            fs::ENTRIES,
            auth::ENTRIES,
            net::ENTRIES,
            db::ENTRIES,
            math::ENTRIES,
            sys::ENTRIES,
        ];
        for table in tables {
            for (i, entry) in table.iter().enumerate() {
                assert_eq!(entry.code.offset(), Some(i as i32), "{} not sequential", entry.name);
            }
        }
    }

    #[test]
    fn generic_codes_sit_at_group_start() {
        assert_eq!(fs::GENERIC.offset(), Some(0));
        assert_eq!(auth::GENERIC.offset(), Some(0));
        assert_eq!(net::GENERIC.offset(), Some(0));
        assert_eq!(db::GENERIC.offset(), Some(0));
        assert_eq!(math::GENERIC.offset(), Some(0));
        assert_eq!(sys::GENERIC.offset(), Some(0));
        assert_eq!(basic::GENERIC, basic::OTHER);
        assert_eq!(http::GENERIC, http::INTERNAL_SERVER_ERROR);
        assert_eq!(http::GENERIC.value(), 500);
        assert_eq!(http::GROUP.begin(), http::CONTINUE.value());
    }

    #[test]
    fn no_error_only_in_basic() {
        for group in Group::ALL {
            let has_zero = entries(group).iter().any(|e| e.code.is_no_error());
            assert_eq!(has_zero, group == Group::Basic, "group '{}'", group);
        }
    }

    #[test]
    fn registry_fallbacks_embed_number() {
        let unknown_fs = ErrorCode::new(Group::Filesystem.end());
        assert_eq!(fs::code_to_string(unknown_fs), "unknown fs error code (1000299)");

        let unknown_basic = ErrorCode::new(99);
        assert_eq!(basic::code_to_string(unknown_basic), "unknown basic error code (99)");

        assert_eq!(http::code_to_string(ErrorCode::new(599)), "HTTP status code 599");
        assert_eq!(code_to_string(ErrorCode::new(-3)), "unknown error code (-3)");
    }

    #[test]
    fn dispatch_uses_owning_registry() {
        assert_eq!(code_to_string(basic::NOT_FOUND), "entity not found");
        assert_eq!(code_to_string(net::ADDR_IN_USE), "address in use");
        assert_eq!(code_to_string(http::NOT_FOUND), "404 not found");
        assert_eq!(code_to_string(sys::KEYBOARD_INTERRUPT), "keyboard interrupt");
    }

    #[test]
    fn app_codes_use_injected_formatter() {
        let app = |code: ErrorCode| format!("job failure #{}", code.value() - Group::App.begin());
        let code = ErrorCode::new(Group::App.begin() + 4);
        assert_eq!(code_to_string_with(code, &app), "job failure #4");
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(http::from_status(404), Some(http::NOT_FOUND));
        assert_eq!(http::from_status(99), None);
        assert_eq!(http::from_status(600), None);
        assert_eq!(http::status(http::BAD_GATEWAY), Some(502));
        assert_eq!(http::status(basic::OTHER), None);
        assert_eq!(http::name(http::IM_A_TEAPOT), Some("IM_A_TEAPOT"));
    }

    #[test]
    fn global_lookup_resolves_names() {
        assert_eq!(lookup(fs::INVALID_PATH).map(|e| e.name), Some("INVALID_PATH"));
        assert_eq!(lookup(ErrorCode::new(Group::App.begin())), None);
        assert_eq!(lookup(ErrorCode::new(i32::MIN)), None);
    }
}
