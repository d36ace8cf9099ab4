use std::process::ExitCode;
use visitor_log::visitor;

fn main() -> ExitCode {
    match visitor::start() {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
