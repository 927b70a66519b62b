use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store;
use crate::store::records::RecordStore;
use crate::store::users::UserStore;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the data directory with both documents, seeding the default accounts
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing stempeluhr…");

    let cfg = Config::init_all(cli.data_dir.clone(), cli.test)?;

    println!("📄 Config file : {}", Config::config_file().display());

    let data_dir = Path::new(&cfg.data_dir);
    let users = UserStore::new(data_dir);
    let records = RecordStore::new(data_dir);

    // Loading either document creates it when missing; the user document is
    // seeded with the default accounts on that first load.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        users.load().await?;
        records.load().await?;
        Ok::<_, AppError>(())
    })?;

    println!(
        "✅ Documents   : {} and {}",
        store::USERS_FILE,
        store::RECORDS_FILE
    );
    println!("🎉 stempeluhr initialization completed!");
    Ok(())
}
