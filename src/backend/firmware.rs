use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use zip::read::ZipArchive;

use crate::models::{Board, BoardPlatform, FirmwareRelease};

use super::GatewayError;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v?)(\d+)\.(\d+)\.(\d+)(?:\.([a-f0-9]+|[a-z\-]+))?")
        .expect("version pattern is valid")
});

/// Version components parsed out of a firmware release id, used to derive
/// the asset file name inside a release bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub hash: String,
}

impl FirmwareVersion {
    pub fn parse(version_id: &str) -> Result<Self, GatewayError> {
        let invalid = || GatewayError::InvalidVersion(version_id.to_string());

        let captures = VERSION_RE.captures(version_id).ok_or_else(invalid)?;

        let part = |index: usize| -> Result<u32, GatewayError> {
            captures
                .get(index)
                .ok_or_else(invalid)?
                .as_str()
                .parse::<u32>()
                .map_err(|_| invalid())
        };

        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
            hash: captures.get(4).ok_or_else(invalid)?.as_str().to_string(),
        })
    }
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.hash
        )
    }
}

/// File name of the flashable asset for `board` inside a release bundle.
/// Serial-flashable boards ship a raw `.bin`, mass-storage boards a `.uf2`.
pub fn asset_name(board: &Board, version: &FirmwareVersion) -> String {
    let extension = match board.platform {
        BoardPlatform::SerialFlashable => "bin",
        BoardPlatform::MassStorage | BoardPlatform::Other => "uf2",
    };

    format!(
        "firmware-{}-{}.{}",
        board.hw_model_slug.to_lowercase(),
        version,
        extension
    )
}

/// On-disk cache of extracted firmware assets under the platform cache
/// directory. Bundles are only downloaded when the asset is missing.
pub struct FirmwareCache {
    cache_dir: PathBuf,
}

impl FirmwareCache {
    pub fn new() -> anyhow::Result<Self> {
        let project_dirs = ProjectDirs::from("org", "mesh-flasher", "Mesh Flasher")
            .context("could not determine platform cache directory")?;

        let cache_dir = project_dirs.cache_dir().join("firmware");

        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).context("failed to create firmware cache directory")?;
        }

        Ok(Self { cache_dir })
    }

    #[cfg(test)]
    pub fn at(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Return the cached path of `asset`, downloading and extracting the
    /// release bundle if needed.
    pub async fn fetch_asset(
        &self,
        release: &FirmwareRelease,
        asset: &str,
    ) -> Result<PathBuf, GatewayError> {
        let target = self.cache_dir.join(asset);

        if target.exists() {
            debug!("firmware asset already cached at {}", target.display());
            return Ok(target);
        }

        info!("downloading firmware bundle from {}", release.zip_url);

        let response = reqwest::get(&release.zip_url).await?.error_for_status()?;
        let bytes = response.bytes().await?;

        info!("downloaded {} bytes", bytes.len());

        // ZipFile is not Send, so extraction stays in a scope with no awaits
        let contents: Vec<u8> = {
            let mut archive = ZipArchive::new(Cursor::new(bytes))?;

            let mut file = archive.by_name(asset).map_err(|e| {
                GatewayError::Bundle(format!("{asset} not found in firmware bundle: {e}"))
            })?;

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            contents
        };

        tokio::fs::write(&target, &contents).await?;

        debug!("extracted {} to {}", asset, target.display());

        Ok(target)
    }
}

/// Flash a mass-storage board by copying the UF2 image onto its mounted
/// drive. The bootloader picks the file up and reboots on its own.
pub async fn copy_to_mass_storage(
    binary: &Path,
    mount_dir: &str,
    asset: &str,
) -> Result<(), GatewayError> {
    let destination = Path::new(mount_dir).join(asset);

    info!(
        "copying {} to {}",
        binary.display(),
        destination.display()
    );

    tokio::fs::copy(binary, &destination).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoardPlatform;

    fn board(slug: &str, platform: BoardPlatform) -> Board {
        Board {
            hw_model: 1,
            hw_model_slug: slug.to_string(),
            platformio_target: slug.to_lowercase(),
            architecture: String::new(),
            actively_supported: true,
            display_name: slug.to_string(),
            platform,
        }
    }

    #[test]
    fn parses_release_version_with_hash() {
        let version = FirmwareVersion::parse("v2.1.10.abcdef1").unwrap();

        assert_eq!(version.major, 2);
        assert_eq!(version.minor, 1);
        assert_eq!(version.patch, 10);
        assert_eq!(version.hash, "abcdef1");
    }

    #[test]
    fn parses_version_without_v_prefix() {
        let version = FirmwareVersion::parse("2.0.3.beta").unwrap();

        assert_eq!(version.major, 2);
        assert_eq!(version.hash, "beta");
    }

    #[test]
    fn rejects_version_without_hash() {
        assert!(FirmwareVersion::parse("v2.1.10").is_err());
    }

    #[test]
    fn rejects_garbage_version() {
        assert!(FirmwareVersion::parse("latest").is_err());
    }

    #[test]
    fn serial_boards_use_bin_assets() {
        let version = FirmwareVersion::parse("v2.1.10.abcdef1").unwrap();
        let name = asset_name(&board("TLORA_V2", BoardPlatform::SerialFlashable), &version);

        assert_eq!(name, "firmware-tlora_v2-2.1.10.abcdef1.bin");
    }

    #[test]
    fn mass_storage_boards_use_uf2_assets() {
        let version = FirmwareVersion::parse("v2.1.10.abcdef1").unwrap();
        let name = asset_name(&board("RAK4631", BoardPlatform::MassStorage), &version);

        assert_eq!(name, "firmware-rak4631-2.1.10.abcdef1.uf2");
    }

    #[tokio::test]
    async fn cached_asset_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FirmwareCache::at(dir.path().to_path_buf());

        let asset = "firmware-rak4631-2.1.10.abcdef1.uf2";
        std::fs::write(dir.path().join(asset), b"cached").unwrap();

        // The zip URL is unreachable; a cache hit must not touch it
        let release = FirmwareRelease {
            id: "v2.1.10.abcdef1".to_string(),
            title: String::new(),
            page_url: String::new(),
            zip_url: "http://127.0.0.1:1/firmware.zip".to_string(),
        };

        let path = cache.fetch_asset(&release, asset).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn mass_storage_copy_places_asset_on_mount() {
        let source_dir = tempfile::tempdir().unwrap();
        let mount_dir = tempfile::tempdir().unwrap();

        let binary = source_dir.path().join("firmware-rak4631-2.1.10.abcdef1.uf2");
        std::fs::write(&binary, b"uf2 image").unwrap();

        copy_to_mass_storage(
            &binary,
            mount_dir.path().to_str().unwrap(),
            "firmware-rak4631-2.1.10.abcdef1.uf2",
        )
        .await
        .unwrap();

        let copied = mount_dir.path().join("firmware-rak4631-2.1.10.abcdef1.uf2");
        assert_eq!(std::fs::read(copied).unwrap(), b"uf2 image");
    }
}
