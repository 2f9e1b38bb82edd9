mod jobs {
    #![allow(dead_code)]

    use ranged_errors::{Group, define_code_group};

    define_code_group! {
        Group::App, "jobs" => {
            /// The job queue is full.
            QUEUE_FULL = (0, "job queue is full"),
            /// The job was cancelled before it started.
            CANCELLED = (1, "job was cancelled"),
            /// The job ran past its deadline.
            DEADLINE = (2, "job deadline exceeded"),
        }
    }
}

use ranged_errors::definitions::basic;
use ranged_errors::{CodedError, ExitError, Result, set_app_formatter};

fn run_job(id: u32) -> Result<()> {
    match id {
        0 => Err(CodedError::new(jobs::QUEUE_FULL).with_message("capacity 64")),
        1 => Err(CodedError::new(jobs::DEADLINE)
            .with_message(format!("job {}", id))
            .with_foreign_cause(ExitError::killed_on_timeout())),
        _ => Err(CodedError::from(ExitError::new(Some(3)).with_stderr("segment missing"))),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    // Before installation app codes render with the default text.
    println!("{}", CodedError::new(jobs::CANCELLED).describe());

    // Install the registry once, at startup.
    if let Err(e) = set_app_formatter(|code| jobs::code_to_string(code).into_owned()) {
        eprintln!("{}", e);
    }

    for id in 0..3 {
        if let Err(err) = run_job(id) {
            let tag = if err.is_app_specific() {
                "app"
            } else if err.code_equals(basic::PROCESS_EXIT) {
                "subprocess"
            } else {
                "other"
            };
            println!("[{}] {}", tag, err.describe());
        }
    }

    // The hook is write-once.
    let second = set_app_formatter(|_| String::from("ignored"));
    println!("second install: {:?}", second);
}
