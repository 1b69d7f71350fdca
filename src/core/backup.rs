use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, or zip it next to it as `<dest_file>.zip`.
    /// Refuses to overwrite an existing target unless `force` is set, and never
    /// writes over the database itself. Returns the final path.
    pub fn backup(db_path: &str, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("Database {}", src.display())));
        }

        let final_target = if compress {
            dest.with_extension("zip")
        } else {
            dest.to_path_buf()
        };

        if final_target.exists() {
            if same_file(src, &final_target)? {
                return Err(AppError::Other(format!(
                    "{} is the database itself",
                    final_target.display()
                )));
            }
            if !force {
                return Err(AppError::Other(format!(
                    "{} already exists (use --force to overwrite)",
                    final_target.display()
                )));
            }
        }

        if let Some(parent) = final_target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if compress {
            let entry_name = dest
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "rlodge.sqlite".to_string());
            zip_database(src, &final_target, &entry_name)?;
        } else {
            fs::copy(src, &final_target)?;
        }

        success(format!("Backup created: {}", final_target.display()));

        if let Ok(conn) = Connection::open(src) {
            audit(
                &conn,
                "backup",
                &final_target.to_string_lossy(),
                if compress {
                    "Backup created and compressed"
                } else {
                    "Backup created"
                },
            );
        }

        Ok(final_target)
    }
}

fn same_file(a: &Path, b: &Path) -> AppResult<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// Write the database straight into a .zip archive holding one `entry_name`.
fn zip_database(src: &Path, zip_path: &Path, entry_name: &str) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(src)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    Ok(())
}
