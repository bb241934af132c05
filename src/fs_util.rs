use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use camino::Utf8Path;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::InteractomeError;

/// Unpacks the single archive member `entry` to `target_dir/entry` and returns
/// its path. Other members are left in the archive.
pub fn extract_entry(
    zip_path: &Path,
    entry: &str,
    target_dir: &Path,
) -> Result<PathBuf, InteractomeError> {
    let zip_error = |err: ZipError| {
        InteractomeError::Filesystem(format!("{}: {err}", zip_path.display()))
    };
    let file = fs::File::open(zip_path).map_err(|err| {
        InteractomeError::Filesystem(format!("open zip {}: {err}", zip_path.display()))
    })?;
    let mut archive = ZipArchive::new(file).map_err(zip_error)?;
    let mut member = match archive.by_name(entry) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => {
            return Err(InteractomeError::Filesystem(format!(
                "archive {} has no {entry}",
                zip_path.display()
            )));
        }
        Err(err) => return Err(zip_error(err)),
    };
    let relative = member.enclosed_name().ok_or_else(|| {
        InteractomeError::Filesystem(format!("unsafe archive member path {entry}"))
    })?;

    let destination = target_dir.join(relative);
    let parent = destination.parent().unwrap_or(target_dir);
    fs::create_dir_all(parent).map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    let bytes = io::copy(&mut member, &mut staged)
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    staged
        .persist(&destination)
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    tracing::debug!(entry, bytes, "archive member extracted");
    Ok(destination)
}

/// Writes through a temp file in the destination directory, then renames.
pub fn write_atomic<F>(path: &Utf8Path, write: F) -> Result<(), InteractomeError>
where
    F: FnOnce(&mut fs::File) -> Result<(), InteractomeError>,
{
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or(Utf8Path::new("."));
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix("kira-im-table")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    write(temp.as_file_mut())?;
    temp.persist(path.as_std_path())
        .map_err(|err| InteractomeError::Filesystem(err.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn archive(dir: &Path, members: &[(&str, &str)]) -> PathBuf {
        let path = dir.join("bundle.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(&path).unwrap());
        for (name, content) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn extracts_only_requested_member() {
        let temp = tempfile::tempdir().unwrap();
        let bundle = archive(temp.path(), &[("map/core.psimitab", "a\tb\n"), ("map/full.psimitab", "x")]);
        let out = temp.path().join("out");

        let path = extract_entry(&bundle, "map/core.psimitab", &out).unwrap();
        assert_eq!(path, out.join("map").join("core.psimitab"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb\n");
        assert!(!out.join("map").join("full.psimitab").exists());
    }

    #[test]
    fn missing_member_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let bundle = archive(temp.path(), &[("other.txt", "x")]);
        let err = extract_entry(&bundle, "map/core.psimitab", temp.path()).unwrap_err();
        assert_matches!(err, InteractomeError::Filesystem(message) if message.contains("has no"));
    }

    #[test]
    fn atomic_write_replaces_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap().join("nested").join("t.csv");
        write_atomic(&path, |file| {
            file.write_all(b"old")
                .map_err(|err| InteractomeError::Filesystem(err.to_string()))
        })
        .unwrap();
        write_atomic(&path, |file| {
            file.write_all(b"new")
                .map_err(|err| InteractomeError::Filesystem(err.to_string()))
        })
        .unwrap();
        assert_eq!(fs::read_to_string(path.as_std_path()).unwrap(), "new");
    }
}
