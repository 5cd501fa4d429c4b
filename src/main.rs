use anyhow::Result;
use std::process::ExitCode;

mod app;
mod crash;
mod logging;

fn main() -> Result<ExitCode> {
    crash::install_panic_hook();
    let args = vmt_rebase::cli::parse();
    app::run(args)
}
