use ranged_errors::definitions::{basic, fs};
use ranged_errors::{CodedError, Result, ResultExt, Target, coded_err};
use std::path::Path;
use tracing::Level;

fn read_settings(path: &Path) -> Result<String> {
    if path.is_dir() {
        return Err(coded_err!(fs::NOT_A_FILE, "'{}'", path.display()));
    }
    std::fs::read_to_string(path).classify_platform()
}

fn load_configuration(path: &Path) -> Result<u32> {
    let text = read_settings(path).map_err(|e| {
        CodedError::new(basic::OTHER)
            .with_message("loading configuration")
            .with_cause(e)
    })?;
    text.trim().parse::<u32>().coded_with(basic::VALUE, "worker count")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    println!("--- Basic Usage Example ---\n");

    match load_configuration(Path::new("/definitely/not/here/settings.toml")) {
        Ok(workers) => println!("workers: {}", workers),
        Err(err) => {
            // What a user sees: the whole chain as one line.
            println!("1. [DESCRIBE]\n   {}", err.describe());

            // What a caller branches on: codes, not strings.
            println!("\n2. [CLASSIFY]");
            println!("   failure:          {}", err.is_failure());
            println!("   outer code:       {:?}", err.code());
            println!(
                "   chain has NOT_FOUND: {}",
                err.matches_in_chain(Some(Target::Code(basic::NOT_FOUND)))
            );

            // What an operator sees: one structured event per chain.
            println!("\n3. [LOG VIEW]");
            err.with_chain_log(|log| {
                for link in log.links() {
                    println!(
                        "   #{} code={:?} group={:?} message={:?}",
                        link.depth,
                        link.code(),
                        link.group(),
                        link.message()
                    );
                }
            });
            err.log_chain(Level::ERROR);
        }
    }
}
