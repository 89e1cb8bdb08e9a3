use std::process::ExitCode;

fn main() -> ExitCode {
    modsync_lib::run()
}
