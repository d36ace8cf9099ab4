mod clock;
mod config;
pub(crate) mod error;
mod logging;
mod record;
mod store;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, DEFAULT_STORE_PATH, LOG_LEVEL_VAR, LOG_PATH_VAR, STORE_PATH_VAR};
pub use error::VisitorLogError;
pub use record::{VisitorRecord, RECORD_SEPARATOR, TIMESTAMP_FORMAT};
pub use store::{VisitorLog, MIN_SPACING};

pub const PROMPT: &str = "Enter visitor's name: ";
pub const SUCCESS_MESSAGE: &str = "Visitor added successfully!";

#[derive(Debug)]
pub enum Outcome {
    Accepted(VisitorRecord),
    Rejected(VisitorLogError),
    Failed(VisitorLogError),
}

impl Outcome {
    /// 0 when accepted, 2 when refused by a visitor rule, 1 on fatal errors.
    pub fn code(&self) -> u8 {
        match self {
            Outcome::Accepted(_) => 0,
            Outcome::Rejected(_) => 2,
            Outcome::Failed(_) => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<Result<VisitorRecord, VisitorLogError>> for Outcome {
    fn from(res: Result<VisitorRecord, VisitorLogError>) -> Self {
        match res {
            Ok(r) => Outcome::Accepted(r),
            Err(e) if e.is_rejection() => Outcome::Rejected(e),
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Prompts for one name on `output`, reads it from `input` and submits it.
/// Only terminal I/O failures come back as `Err`; every submission result,
/// fatal or not, is printed and returned as an [`Outcome`].
pub fn run<R, W, C>(input: &mut R, output: &mut W, log: &VisitorLog, clock: &C) -> Result<Outcome, VisitorLogError>
where
    R: BufRead,
    W: Write,
    C: Clock + ?Sized,
{
    let term_err = |e: io::Error| VisitorLogError::Terminal { source: e };

    write!(output, "{}", PROMPT).map_err(term_err)?;
    output.flush().map_err(term_err)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(term_err)?;
    let name = line.trim_end_matches(['\n', '\r']);

    let outcome = Outcome::from(log.submit_with(name, clock));
    let written = match &outcome {
        Outcome::Accepted(_) => writeln!(output, "{}", SUCCESS_MESSAGE),
        Outcome::Rejected(e) | Outcome::Failed(e) => writeln!(output, "Error: {}", e),
    };
    written.map_err(term_err)?;

    if let Outcome::Failed(e) = &outcome {
        error!("{:?}", e);
    }

    Ok(outcome)
}

pub fn start() -> Result<Outcome, VisitorLogError> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    debug!("{:?}", &config);

    let log = VisitorLog::new(&config.store_path);
    log.ensure_store()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut stdin.lock(), &mut stdout.lock(), &log, &SystemClock)
}
