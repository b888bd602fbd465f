use std::process::ExitCode;

fn main() -> ExitCode {
    apigen::cli::run_cli()
}
