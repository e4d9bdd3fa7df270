use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info, warn};
use tempfile::TempDir;

use crate::utils::error::{BoxResult, ChmError};

/// Decompress a compiled help archive into a fresh temporary directory.
///
/// 7-Zip is tried first (PATH, then the configured install locations),
/// then the HTML Help Workshop decompiler. The directory is removed when
/// the returned handle is dropped.
pub fn extract_archive(archive: &Path, seven_zip_paths: &[PathBuf]) -> BoxResult<TempDir> {
    let is_chm = archive
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("chm"))
        .unwrap_or(false);
    if !is_chm {
        warn!("{} does not have a .chm extension, trying to extract anyway", archive.display());
    }

    let temp_dir = tempfile::Builder::new().prefix("chmsite_").tempdir()?;
    let out_dir = temp_dir.path();

    if let Some(seven_zip) = find_seven_zip(seven_zip_paths) {
        debug!("Extracting with {}", seven_zip.display());
        if extract_with_seven_zip(&seven_zip, archive, out_dir) {
            info!("Extracted {} with 7-Zip", archive.display());
            return Ok(temp_dir);
        }
        warn!("7-Zip could not extract {}", archive.display());
    }

    if extract_with_hh(archive, out_dir) {
        info!("Extracted {} with hh", archive.display());
        return Ok(temp_dir);
    }

    Err(ChmError::Extract(format!(
        "Unable to extract {}; install 7-Zip or HTML Help Workshop",
        archive.display()
    ))
    .into())
}

fn find_seven_zip(install_paths: &[PathBuf]) -> Option<PathBuf> {
    let on_path = Command::new("7z")
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if on_path {
        return Some(PathBuf::from("7z"));
    }

    install_paths.iter().find(|path| path.exists()).cloned()
}

fn extract_with_seven_zip(seven_zip: &Path, archive: &Path, out_dir: &Path) -> bool {
    let mut out_arg = std::ffi::OsString::from("-o");
    out_arg.push(out_dir);

    match Command::new(seven_zip)
        .arg("x")
        .arg(archive)
        .arg(out_arg)
        .arg("-y")
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            debug!("7-Zip failed: {}", String::from_utf8_lossy(&output.stderr).trim());
            false
        }
        Err(e) => {
            debug!("Failed to run 7-Zip: {}", e);
            false
        }
    }
}

// hh can report failure even when it wrote files, so success means "something was extracted"
fn extract_with_hh(archive: &Path, out_dir: &Path) -> bool {
    if let Err(e) = Command::new("hh")
        .arg("-decompile")
        .arg(out_dir)
        .arg(archive)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        debug!("Failed to run hh: {}", e);
        return false;
    }

    std::fs::read_dir(out_dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
