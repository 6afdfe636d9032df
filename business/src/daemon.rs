//! The wallpaper daemon boundary.
//!
//! Every remote call the front-end makes lives here as a small typed
//! function over [`crate::http::Client`]. The daemon itself (storage,
//! thumbnailing, the rotation timer, directory opening) is an external
//! collaborator; tests stand it in with wiremock.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::ShellConfig;
use crate::http::{Client, HttpError, Response};

/// Characters escaped when a file name becomes a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\');

/// One file of an upload batch. `data` serializes as a JSON byte array,
/// the shape the daemon has always accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub name: String,
    pub data: Vec<u8>,
}

/// One stored image as reported by the daemon listing: canonical file name
/// plus the thumbnail payload as base64 text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredImage {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
struct UploadBatchRequest<'a> {
    files: &'a [UploadRecord],
}

#[derive(Debug, Clone, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct IntervalResponse {
    seconds: u64,
}

#[derive(Debug, Clone, Serialize)]
struct SetIntervalRequest {
    #[serde(rename = "newChangeInterval")]
    new_change_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct DeleteResponse {
    ok: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Structured result of a single-image delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The daemon no longer has the file. Distinct from a transport error
    /// so the user learns the item is gone rather than that the call failed.
    NotFound,
}

/// Errors from any daemon call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DaemonError {
    #[error("wallpaper daemon unreachable: {0}")]
    Transport(String),
    #[error("wallpaper daemon rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("malformed daemon response: {0}")]
    Decode(String),
}

impl From<HttpError> for DaemonError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.to_string())
    }
}

fn rejection(response: &Response) -> DaemonError {
    DaemonError::Rejected {
        status: response.status,
        body: response.text().unwrap_or_default(),
    }
}

/// `GET /api/images` — the authoritative stored-image listing.
pub async fn fetch_images(config: &ShellConfig) -> Result<Vec<StoredImage>, DaemonError> {
    let response = Client::get(format!("{}/images", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    response
        .json::<Vec<StoredImage>>()
        .map_err(|err| DaemonError::Decode(err.to_string()))
}

/// `GET /api/images/count` — cheap count used by the render-size guard.
pub async fn count_images(config: &ShellConfig) -> Result<u64, DaemonError> {
    let response = Client::get(format!("{}/images/count", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    response
        .json::<CountResponse>()
        .map(|body| body.count)
        .map_err(|err| DaemonError::Decode(err.to_string()))
}

/// `POST /api/images` — store one batch of files. The batch either lands as
/// a whole or the call fails; retries are left to the user.
pub async fn upload_batch(config: &ShellConfig, files: &[UploadRecord]) -> Result<(), DaemonError> {
    let response = Client::post(format!("{}/images", config.api_url()))
        .json(&UploadBatchRequest { files })
        .map_err(|err| DaemonError::Decode(err.to_string()))?
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    Ok(())
}

/// `DELETE /api/images/{name}` — remove one stored image.
///
/// The daemon's model contract is the structured `{ok, reason}` body; the
/// historical free-text reply is still accepted through
/// [`parse_legacy_delete_text`].
pub async fn delete_image(config: &ShellConfig, name: &str) -> Result<DeleteOutcome, DaemonError> {
    let encoded = utf8_percent_encode(name, PATH_SEGMENT);
    let response = Client::delete(format!("{}/images/{encoded}", config.api_url()))
        .send()
        .await?;

    if response.status == 404 {
        return Ok(DeleteOutcome::NotFound);
    }
    if !response.is_success() {
        return Err(rejection(&response));
    }

    if let Ok(body) = response.json::<DeleteResponse>() {
        if body.ok {
            return Ok(DeleteOutcome::Deleted);
        }
        log::debug!(
            target: "wallshell_business::daemon",
            "delete of {name} refused: {}",
            body.reason.as_deref().unwrap_or("no reason given")
        );
        return Ok(DeleteOutcome::NotFound);
    }

    // Compatibility shim for daemons that still answer with free text.
    let text = response.text().unwrap_or_default();
    parse_legacy_delete_text(&text)
        .ok_or_else(|| DaemonError::Decode(format!("unrecognized delete response: {text:?}")))
}

/// `DELETE /api/images` — clear the whole store in one call.
pub async fn delete_all_images(config: &ShellConfig) -> Result<(), DaemonError> {
    let response = Client::delete(format!("{}/images", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    Ok(())
}

/// `POST /api/wallpaper/rotate` — apply a random wallpaper immediately.
pub async fn rotate_wallpaper(config: &ShellConfig) -> Result<(), DaemonError> {
    let response = Client::post(format!("{}/wallpaper/rotate", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    Ok(())
}

/// `POST /api/directory/open` — open the image directory in the system
/// file manager. Fire-and-forget at the call site.
pub async fn open_images_directory(config: &ShellConfig) -> Result<(), DaemonError> {
    let response = Client::post(format!("{}/directory/open", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    Ok(())
}

/// `PUT /api/interval` — set the rotation interval in seconds.
pub async fn set_change_interval(config: &ShellConfig, seconds: u64) -> Result<(), DaemonError> {
    let response = Client::put(format!("{}/interval", config.api_url()))
        .json(&SetIntervalRequest {
            new_change_interval: seconds,
        })
        .map_err(|err| DaemonError::Decode(err.to_string()))?
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    Ok(())
}

/// `GET /api/interval` — the interval the daemon is actually using. Read
/// back after every write so the UI shows the confirmed value.
pub async fn get_change_interval(config: &ShellConfig) -> Result<u64, DaemonError> {
    let response = Client::get(format!("{}/interval", config.api_url()))
        .send()
        .await?;
    if !response.is_success() {
        return Err(rejection(&response));
    }
    response
        .json::<IntervalResponse>()
        .map(|body| body.seconds)
        .map_err(|err| DaemonError::Decode(err.to_string()))
}

/// Map a legacy free-text delete reply onto [`DeleteOutcome`].
///
/// Older daemons answered with prose and callers matched on the
/// "Successfully deleted" marker. That match lives only here.
pub fn parse_legacy_delete_text(text: &str) -> Option<DeleteOutcome> {
    if text.contains("Successfully deleted") {
        return Some(DeleteOutcome::Deleted);
    }
    if text.to_lowercase().contains("not found") {
        return Some(DeleteOutcome::NotFound);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_success_marker_maps_to_deleted() {
        let text = r#"Successfully deleted file: "C:\\images\\a_b.png""#;
        assert_eq!(parse_legacy_delete_text(text), Some(DeleteOutcome::Deleted));
    }

    #[test]
    fn legacy_not_found_maps_to_not_found() {
        assert_eq!(
            parse_legacy_delete_text("File not found: a.png"),
            Some(DeleteOutcome::NotFound)
        );
    }

    #[test]
    fn unrecognized_legacy_text_is_rejected() {
        assert_eq!(parse_legacy_delete_text("everything is fine"), None);
    }

    #[test]
    fn upload_record_serializes_data_as_byte_array() {
        let record = UploadRecord {
            name: "a_b.png".to_owned(),
            data: vec![1, 2, 3],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "a_b.png");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn interval_request_uses_the_daemon_field_name() {
        let json = serde_json::to_value(SetIntervalRequest {
            new_change_interval: 300,
        })
        .unwrap();
        assert_eq!(json["newChangeInterval"], 300);
    }
}
