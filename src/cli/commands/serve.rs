use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server;

/// Handle the `serve` command: bring up the HTTP server on the configured
/// (or overridden) bind address and block until it stops.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { bind } = cmd {
        let mut cfg = cfg.clone();
        if let Some(addr) = bind {
            cfg.bind = addr.clone();
        }

        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        rt.block_on(server::serve(cfg))?;
    }

    Ok(())
}
