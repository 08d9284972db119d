use std::process::ExitCode;

use qbc::{cli, ui};

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(err) => {
            ui::output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
