use tracing::{debug, info};

use crate::models::{BoardPlatform, FirmwareCatalog, ListBoardsResponse};

use super::GatewayError;

pub const API_BASE_URL: &str = "https://api.meshtastic.org";

/// Fetch the catalog of supported hardware models, resolving each board's
/// flashing platform while the data is still in hand.
pub async fn fetch_supported_boards() -> Result<ListBoardsResponse, GatewayError> {
    let url = format!("{API_BASE_URL}/resource/deviceHardware");
    debug!("fetching board catalog from {url}");

    let response = reqwest::get(&url).await?.error_for_status()?;
    let body = response.text().await?;

    let mut boards: ListBoardsResponse = serde_json::from_str(&body)?;

    for board in &mut boards {
        board.platform = BoardPlatform::from_architecture(&board.architecture);
    }

    info!("fetched {} supported boards", boards.len());

    Ok(boards)
}

/// Fetch the firmware release index, partitioned into stable and alpha
/// channels plus pull-request builds.
pub async fn fetch_firmware_releases() -> Result<FirmwareCatalog, GatewayError> {
    let url = format!("{API_BASE_URL}/github/firmware/list");
    debug!("fetching firmware releases from {url}");

    let response = reqwest::get(&url).await?.error_for_status()?;
    let body = response.text().await?;

    let catalog: FirmwareCatalog = serde_json::from_str(&body)?;

    info!(
        "fetched {} stable and {} alpha firmware releases",
        catalog.releases.stable.len(),
        catalog.releases.alpha.len()
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use crate::models::{BoardPlatform, FirmwareCatalog, ListBoardsResponse};

    #[test]
    fn board_catalog_wire_format() {
        let body = r#"[{
            "hwModel": 9,
            "hwModelSlug": "RAK4631",
            "platformioTarget": "rak4631",
            "architecture": "nrf52840",
            "activelySupported": true,
            "displayName": "RAK WisBlock 4631"
        }]"#;

        let mut boards: ListBoardsResponse = serde_json::from_str(body).unwrap();
        for board in &mut boards {
            board.platform = BoardPlatform::from_architecture(&board.architecture);
        }

        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].hw_model, 9);
        assert_eq!(boards[0].display_name, "RAK WisBlock 4631");
        assert_eq!(boards[0].platform, BoardPlatform::MassStorage);
    }

    #[test]
    fn firmware_index_wire_format() {
        let body = r#"{
            "releases": {
                "stable": [{
                    "id": "v2.1.10.abcdef1",
                    "title": "Firmware 2.1.10",
                    "page_url": "https://example.org/release",
                    "zip_url": "https://example.org/firmware.zip"
                }],
                "alpha": []
            },
            "pullRequests": [{
                "id": "pr-2048",
                "title": "Test build",
                "page_url": "https://example.org/pr",
                "zip_url": "https://example.org/pr.zip"
            }]
        }"#;

        let catalog: FirmwareCatalog = serde_json::from_str(body).unwrap();

        assert_eq!(catalog.releases.stable.len(), 1);
        assert_eq!(catalog.pull_requests.len(), 1);
        assert_eq!(catalog.releases.stable[0].id, "v2.1.10.abcdef1");
    }
}
