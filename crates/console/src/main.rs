use std::io;

use anyhow::{Context, Result};
use chat_reveal::{logging, ChatSession, EnvConfig};
use galxium_console::app::{self, Console};
use galxium_console::boot::run_boot;
use galxium_console::header::SystemLoad;

fn main() -> Result<()> {
    let config = EnvConfig::from_env().context("invalid console configuration")?;
    logging::init(&config).context("failed to initialize logging")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(run_console(config))
}

async fn run_console(config: EnvConfig) -> Result<()> {
    if !config.skip_boot {
        run_boot(&mut io::stdout())
            .await
            .context("boot sequence failed")?;
    }

    let session = ChatSession::new(config.reveal);
    app::run(Console::new(session, SystemLoad::new(), io::stdout())).await
}
