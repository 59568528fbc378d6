use std::process::ExitCode;

fn main() -> ExitCode {
    phonematch_cli::run()
}
