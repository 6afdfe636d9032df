//! Gallery synchronization: mirror the daemon's stored-image set.
//!
//! A sync is always a full replace — clear, fetch the authoritative
//! listing, rebuild — never an incremental patch. That keeps the visible
//! gallery equal to daemon state after uploads, deletes, and edits made
//! behind the front-end's back.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use ustr::Ustr;
use wallshell_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::ShellConfig;
use crate::daemon;

/// One gallery tile: canonical file name plus decoded thumbnail bytes.
/// Empty bytes mean the payload failed to decode and the UI shows a
/// placeholder tile, keeping the rendered count equal to the daemon count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub name: Ustr,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GalleryStatus {
    #[default]
    Idle,
    Loading,
    Ready {
        entries: Vec<GalleryEntry>,
    },
    /// The store holds more images than the render cap. No thumbnails were
    /// fetched; the UI renders a single open-directory affordance instead.
    /// Daemon-side rotation keeps working regardless.
    Overflow {
        count: u64,
    },
    Error(String),
}

/// The mirrored gallery. Written only by the synchronizer (full rebuild)
/// and the deletion coordinator (single-entry removal / clear).
#[derive(Debug, Clone, Default)]
pub struct GalleryCompute {
    pub status: GalleryStatus,
    pub last_synced: Option<DateTime<Utc>>,
}

impl GalleryCompute {
    pub fn ready(entries: Vec<GalleryEntry>) -> Self {
        Self {
            status: GalleryStatus::Ready { entries },
            last_synced: Some(Utc::now()),
        }
    }

    pub fn entries(&self) -> Option<&[GalleryEntry]> {
        match &self.status {
            GalleryStatus::Ready { entries } => Some(entries),
            _ => None,
        }
    }
}

impl State for GalleryCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Re-fetch and rebuild the gallery from daemon state.
#[derive(Debug, Default)]
pub struct SyncGalleryCommand;

impl Command for SyncGalleryCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let config: ShellConfig = snap.state();
        Box::pin(async move {
            updater.set(GalleryCompute {
                status: GalleryStatus::Loading,
                last_synced: None,
            });
            updater.set(load_gallery(&config).await);
        })
    }
}

/// The shared fetch-and-rebuild routine. The batch uploader runs it too,
/// on success and failure alike, so the gallery always reflects whatever
/// subset of an upload actually landed.
pub(crate) async fn load_gallery(config: &ShellConfig) -> GalleryCompute {
    let count = match daemon::count_images(config).await {
        Ok(count) => count,
        Err(err) => {
            log::warn!(target: "wallshell_business::gallery", "count failed: {err}");
            return GalleryCompute {
                status: GalleryStatus::Error(err.to_string()),
                last_synced: None,
            };
        }
    };

    // Render-size guard: past the cap the thumbnail fetch is skipped
    // entirely to bound client memory.
    if count > config.render_cap as u64 {
        log::info!(
            target: "wallshell_business::gallery",
            "{count} stored images exceed the render cap of {}, redirecting to the directory view",
            config.render_cap
        );
        return GalleryCompute {
            status: GalleryStatus::Overflow { count },
            last_synced: Some(Utc::now()),
        };
    }

    match daemon::fetch_images(config).await {
        Ok(images) => {
            let entries = images
                .into_iter()
                .map(|image| {
                    let bytes = decode_payload(&image.data).unwrap_or_else(|err| {
                        log::warn!(
                            target: "wallshell_business::gallery",
                            "thumbnail payload for {} failed to decode: {err}",
                            image.name
                        );
                        Vec::new()
                    });
                    GalleryEntry {
                        name: Ustr::from(&image.name),
                        bytes,
                    }
                })
                .collect();
            GalleryCompute::ready(entries)
        }
        Err(err) => {
            log::warn!(target: "wallshell_business::gallery", "listing failed: {err}");
            GalleryCompute {
                status: GalleryStatus::Error(err.to_string()),
                last_synced: None,
            }
        }
    }
}

/// Decode a listing payload: plain base64, tolerating the `data:` URL
/// prefix older daemons emitted.
fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let raw = data
        .rsplit_once("base64,")
        .map(|(_, tail)| tail)
        .unwrap_or(data);
    BASE64.decode(raw.trim())
}
