use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { file, force } = cmd {
        let written = BackupLogic::backup(cfg, file, *force)?;
        success(format!("Backup created: {}", written.display()));
    }

    Ok(())
}
