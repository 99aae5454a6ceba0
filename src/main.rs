//! Binary entrypoint for the ChatUI server.

use std::process::ExitCode;

use chatui::start_chatui;

fn main() -> ExitCode {
    start_chatui::run()
}
