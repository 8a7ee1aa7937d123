//! Versioned firmware copies with MD5 checksum files.

use md5::{Digest, Md5};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use crate::error::BuildError;

/// The git queries firmware versioning needs.
pub trait GitRepo {
    /// Full hash of `HEAD`.
    fn head_hash(&self) -> Result<String, BuildError>;
    /// Short name of the checked out branch, empty when detached.
    fn current_branch(&self) -> Result<String, BuildError>;
    /// Whether the work tree differs from `HEAD`.
    fn has_local_changes(&self) -> Result<bool, BuildError>;
}

/// Runs the `git` executable in `dir`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    dir: PathBuf,
}

impl SystemGit {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output, BuildError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| BuildError::Git {
                command: args.join(" "),
                reason: e.to_string(),
            })
    }
}

impl GitRepo for SystemGit {
    fn head_hash(&self) -> Result<String, BuildError> {
        let output = self.run(&["rev-parse", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn current_branch(&self) -> Result<String, BuildError> {
        let output = self.run(&["symbolic-ref", "--short", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn has_local_changes(&self) -> Result<bool, BuildError> {
        let output = self.run(&["diff-index", "--quiet", "HEAD", "--"])?;
        Ok(!output.status.success())
    }
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+([_-][a-zA-Z0-9]+)?$").expect("tag pattern is valid")
    })
}

/// Whether `branch` names a release tag such as `v1.2.3` or `v1.2.3-rc1`.
pub fn is_release_tag(branch: &str) -> bool {
    tag_pattern().is_match(branch)
}

/// Version string of the current checkout.
///
/// `ref_name` (the CI ref) is used as branch when set. Otherwise the checked
/// out branch is used with `/`, `-` and `_` removed, and `_modified` is
/// appended when the work tree has local changes. Release tags are used
/// as-is; anything else gets the short commit hash appended.
pub fn resolve_version(git: &dyn GitRepo, ref_name: Option<&str>) -> Result<String, BuildError> {
    let ref_name = ref_name.filter(|r| !r.is_empty());
    let branch = match ref_name {
        Some(name) => name.to_string(),
        None => git.current_branch()?.replace(['/', '-', '_'], ""),
    };
    if branch.is_empty() {
        return Err(BuildError::NoBranch);
    }

    let mut version = branch.clone();
    if !is_release_tag(&branch) {
        let hash = git.head_hash()?;
        let short: String = hash.chars().take(7).collect();
        version.push('_');
        version.push_str(&short);
    }

    if ref_name.is_none() && git.has_local_changes()? {
        version.push_str("_modified");
    }
    Ok(version)
}

/// `<app>_<board>_<version>` with dots in the version turned into dashes.
pub fn firmware_variant(app: &str, board: &str, version: &str) -> String {
    format!("{app}_{board}_{}", version.replace('.', "-"))
}

/// Files written by [`package_firmware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwarePackage {
    pub bin: PathBuf,
    pub md5: PathBuf,
    pub factory_bin: PathBuf,
    pub factory_md5: PathBuf,
}

impl FirmwarePackage {
    fn new(output_dir: &Path, variant: &str) -> Self {
        let dir = output_dir.join("firmware");
        Self {
            bin: dir.join(format!("{variant}.bin")),
            md5: dir.join(format!("{variant}.md5")),
            factory_bin: dir.join(format!("{variant}.factory.bin")),
            factory_md5: dir.join(format!("{variant}.factory.md5")),
        }
    }
}

/// Lowercase hex MD5 of a file.
pub fn md5_hex(path: &Path) -> io::Result<String> {
    let data = fs::read(path)?;
    Ok(hex::encode(Md5::digest(&data)))
}

fn remove_stale(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copy the firmware image to `<output_dir>/firmware/<variant>.bin` and the
/// factory image (the same image unless given) to `.factory.bin`, each with
/// an `.md5` file beside it.
pub fn package_firmware(
    input: &Path,
    factory: Option<&Path>,
    output_dir: &Path,
    variant: &str,
) -> Result<FirmwarePackage, BuildError> {
    let factory = factory.unwrap_or(input);
    for source in [input, factory] {
        if !source.is_file() {
            return Err(BuildError::MissingSource(source.to_path_buf()));
        }
    }

    let package = FirmwarePackage::new(output_dir, variant);
    if let Some(dir) = package.bin.parent() {
        fs::create_dir_all(dir)?;
    }
    for target in [
        &package.bin,
        &package.md5,
        &package.factory_bin,
        &package.factory_md5,
    ] {
        remove_stale(target)?;
    }

    for (source, bin, md5) in [
        (input, &package.bin, &package.md5),
        (factory, &package.factory_bin, &package.factory_md5),
    ] {
        tracing::info!(from = %source.display(), to = %bin.display(), "Copying firmware");
        fs::copy(source, bin)?;
        let digest = md5_hex(bin)?;
        tracing::info!(file = %bin.display(), md5 = %digest, "Calculated MD5");
        fs::write(md5, digest)?;
    }

    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeGit {
        branch: &'static str,
        dirty: bool,
        dirty_checked: Cell<bool>,
    }

    impl FakeGit {
        fn new(branch: &'static str, dirty: bool) -> Self {
            Self {
                branch,
                dirty,
                dirty_checked: Cell::new(false),
            }
        }
    }

    impl GitRepo for FakeGit {
        fn head_hash(&self) -> Result<String, BuildError> {
            Ok("0123456789abcdef0123456789abcdef01234567".to_string())
        }

        fn current_branch(&self) -> Result<String, BuildError> {
            Ok(self.branch.to_string())
        }

        fn has_local_changes(&self) -> Result<bool, BuildError> {
            self.dirty_checked.set(true);
            Ok(self.dirty)
        }
    }

    #[test]
    fn test_release_tags() {
        assert!(is_release_tag("v1.2.3"));
        assert!(is_release_tag("v10.0.12-rc1"));
        assert!(is_release_tag("v1.2.3_beta"));
        assert!(!is_release_tag("v1.2"));
        assert!(!is_release_tag("v1x2x3"));
        assert!(!is_release_tag("1.2.3"));
        assert!(!is_release_tag("v1.2.3-"));
    }

    #[test]
    fn test_branch_is_sanitized_and_hashed() {
        let git = FakeGit::new("feature/new-ui_x", false);
        assert_eq!(resolve_version(&git, None).unwrap(), "featurenewuix_0123456");
    }

    #[test]
    fn test_local_changes_marked() {
        let git = FakeGit::new("main", true);
        assert_eq!(resolve_version(&git, None).unwrap(), "main_0123456_modified");
    }

    #[test]
    fn test_ref_name_tag_skips_hash_and_dirty_check() {
        let git = FakeGit::new("main", true);
        assert_eq!(resolve_version(&git, Some("v1.4.0")).unwrap(), "v1.4.0");
        assert!(!git.dirty_checked.get());
    }

    #[test]
    fn test_ref_name_is_not_sanitized() {
        let git = FakeGit::new("main", false);
        assert_eq!(
            resolve_version(&git, Some("release/x")).unwrap(),
            "release/x_0123456"
        );
    }

    #[test]
    fn test_detached_head_is_error() {
        let git = FakeGit::new("", false);
        assert!(matches!(
            resolve_version(&git, None),
            Err(BuildError::NoBranch)
        ));
    }

    #[test]
    fn test_variant_replaces_dots() {
        assert_eq!(
            firmware_variant("Thingy", "esp32dev", "v1.2.3"),
            "Thingy_esp32dev_v1-2-3"
        );
    }

    #[test]
    fn test_md5_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();
        assert_eq!(md5_hex(&path).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
