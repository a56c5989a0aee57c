use std::process::ExitCode;

fn main() -> ExitCode {
    storebot_cli::run()
}
