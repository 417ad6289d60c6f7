//! # hotp-resync
//!
//! Find the counter of a drifted event-based token from two consecutive
//! passcodes and print the new state store entry.
//!
//! ## Example
//!
//! ```bash
//! # search counters 1000..1000+500 for the pair
//! hotp-resync -1 359152 -2 969429 -u alice -k 3132333435363738393031323334353637383930 -i 1000 -f +500
//!
//! # resume from a stored challenge, tracing every probe
//! hotp-resync -1 359152 -2 969429 -c 00000000000003e8 -d
//! ```

use clap::Parser;
use hotp_resync::{
    Algorithm, Config, DEFAULT_KEY, DEFAULT_USERNAME, Error, WindowEnd, WindowStart,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = env!("CARGO_BIN_NAME");

/// Resynchronize an event-based OTP token.
#[derive(Parser, Debug)]
#[command(name = "hotp-resync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// First passcode shown by the token
    #[arg(short = '1', value_name = "OTP1")]
    pass1: String,

    /// Next passcode shown by the token
    #[arg(short = '2', value_name = "OTP2")]
    pass2: String,

    /// Username for the state record
    #[arg(short, default_value = DEFAULT_USERNAME)]
    user: String,

    /// Shared secret as ASCII hex (up to 64 characters)
    #[arg(short, default_value = DEFAULT_KEY)]
    key: String,

    /// Start of the window as a hex challenge
    #[arg(
        short,
        value_name = "CHALLENGE",
        conflicts_with = "initial",
        value_parser = WindowStart::from_challenge
    )]
    challenge: Option<WindowStart>,

    /// Start of the window as a decimal counter
    #[arg(short, value_name = "COUNTER", value_parser = WindowStart::from_counter)]
    initial: Option<WindowStart>,

    /// End of the window (exclusive), absolute or `+N` from the start
    #[arg(short = 'f', value_name = "COUNTER")]
    end: Option<WindowEnd>,

    /// HMAC hash algorithm (sha1, sha256, sha512)
    #[arg(short, long, default_value = "sha1")]
    algorithm: Algorithm,

    /// Trace every probed counter to stderr
    #[arg(short)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.pass1, self.pass2);
        config.username = self.user;
        config.key = self.key;
        config.start = self.challenge.or(self.initial).unwrap_or_default();
        config.end = self.end;
        config.algorithm = self.algorithm;
        config
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("trace")
    } else {
        EnvFilter::new("warn")
    };

    // stdout carries only the state record
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("{PROGRAM}: {err}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // usage errors exit 1; --help and --version go to stdout and succeed
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(cli.debug);

    let job = match cli.into_config().validate() {
        Ok(job) => job,
        Err(e) => return fail(&e),
    };

    tracing::debug!(
        initial = job.window.initial(),
        end = job.window.end(),
        digits = job.passcodes.digits(),
        "searching"
    );

    match job.run() {
        Some(record) => {
            println!("{record}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{PROGRAM}: counter value not found");
            ExitCode::FAILURE
        }
    }
}
