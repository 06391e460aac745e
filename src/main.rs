//! Binary entrypoint that serves the Invidious engine over HTTP.
//! Run with: `INVIDIOUS_BASE_URL=https://inv.example cargo run`

use std::process::ExitCode;

use invidious_engine::start;

fn main() -> ExitCode {
    start::run()
}
