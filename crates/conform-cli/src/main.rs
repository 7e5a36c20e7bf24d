//! conform CLI
//!
//! Reads one structured request from standard input, runs the engine, and
//! writes one structured response to standard output. Diagnostics go to
//! standard error (`RUST_LOG` selects the level), so stdout carries
//! nothing but the response. A malformed request produces a structured
//! error object on stderr and a non-zero exit; `non_compliant` and
//! `partial_failure` runs exit zero — they are data-level outcomes, not
//! execution failures.

use std::io::{Read, Write};

use conform_codec::Value;
use conform_core::Request;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        fail_input(&format!("failed to read request from stdin: {e}"));
    }

    let request = match Request::decode(&input) {
        Ok(request) => request,
        Err(e) => fail_input(&e.to_string()),
    };
    tracing::debug!(
        check_only = request.check_only,
        files = request.files.len(),
        "request decoded"
    );

    let response = conform_core::run(&request);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", response.encode()) {
        // Nothing useful can reach stdout anymore; report on stderr only.
        eprintln!("failed to write response: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Emit a structured input error on stderr and terminate without writing
/// anything to stdout.
fn fail_input(message: &str) -> ! {
    let error = Value::Object(vec![(
        "error".to_string(),
        Value::Object(vec![
            ("type".to_string(), Value::from("input_error")),
            ("message".to_string(), Value::from(message)),
        ]),
    )]);
    eprintln!("{}", conform_codec::encode(&error));
    std::process::exit(1);
}
