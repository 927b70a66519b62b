use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store;
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Archive the data documents (users and attendance) into a zip file.
    pub fn backup(cfg: &Config, dest_file: &str, force: bool) -> AppResult<PathBuf> {
        let data_dir = Path::new(&cfg.data_dir);
        let dest = Path::new(dest_file);

        // 1️⃣ Collect the documents that actually exist
        let sources: Vec<PathBuf> = [store::USERS_FILE, store::RECORDS_FILE]
            .iter()
            .map(|name| data_dir.join(name))
            .filter(|p| p.exists())
            .collect();

        if sources.is_empty() {
            return Err(AppError::Backup(format!(
                "no data documents found in {}",
                data_dir.display()
            )));
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        ensure_writable(dest, force)?;

        // 3️⃣ Write the archive
        let file = fs::File::create(dest)?;
        let mut zip = ZipWriter::new(file);

        for src in &sources {
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(src.file_name().unwrap_or_default().to_string_lossy(), options)
                .map_err(io::Error::other)?;

            let mut f = fs::File::open(src)?;
            io::copy(&mut f, &mut zip)?;
        }

        zip.finish().map_err(io::Error::other)?;

        Ok(dest.to_path_buf())
    }
}

/// Check whether a file can be created or overwritten.
///
/// - If the file does NOT exist → Ok
/// - If it exists and `force` is set → Ok
/// - If it exists and `force == false` → ask the user for confirmation.
fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(AppError::from)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Backup(
            "cancelled: existing file not overwritten".to_string(),
        ))
    }
}
