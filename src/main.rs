use std::process::ExitCode;

fn main() -> ExitCode {
    photo_renamer_lib::run()
}
