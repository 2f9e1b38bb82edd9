//! Process-wide app formatter.
//!
//! Lives in its own test binary: installing the formatter is irreversible for
//! the process, so nothing else may run here.

use ranged_errors::formatter::{app_code_to_string, app_formatter_installed};
use ranged_errors::{AppFormatterAlreadySet, CodedError, ErrorCode, Group, set_app_formatter};

const QUEUE_FULL: ErrorCode = ErrorCode::in_group(Group::App, 0);
const JOB_CANCELLED: ErrorCode = ErrorCode::in_group(Group::App, 1);

fn describe_jobs(code: ErrorCode) -> String {
    match code {
        QUEUE_FULL => "job queue is full".to_string(),
        JOB_CANCELLED => "job was cancelled".to_string(),
        other => format!("unknown job error ({})", other.value()),
    }
}

fn describe_nothing(_: ErrorCode) -> String {
    String::from("second formatter")
}

#[test]
fn formatter_is_installed_once() {
    assert!(!app_formatter_installed());
    assert!(
        CodedError::new(QUEUE_FULL)
            .describe()
            .starts_with("undefined app-specific error")
    );

    assert_eq!(set_app_formatter(describe_jobs), Ok(()));
    assert!(app_formatter_installed());

    let err = CodedError::new(JOB_CANCELLED).with_message("by operator");
    assert_eq!(err.describe(), "job was cancelled by operator");
    assert_eq!(err.to_string(), "job was cancelled by operator");
    assert_eq!(
        app_code_to_string(ErrorCode::new(Group::App.begin() + 9)),
        "unknown job error (1000000009)"
    );

    // Second installation is rejected; the first formatter stays.
    assert_eq!(set_app_formatter(describe_nothing), Err(AppFormatterAlreadySet));
    assert_eq!(CodedError::new(QUEUE_FULL).describe(), "job queue is full");

    // Injection still wins over the global hook.
    let injected = |_: ErrorCode| String::from("injected");
    assert_eq!(CodedError::new(QUEUE_FULL).describe_with(&injected), "injected");

    // Codes outside the app range never reach the formatter.
    assert_eq!(
        CodedError::new(ranged_errors::definitions::basic::KEY).describe(),
        "key error"
    );
}
