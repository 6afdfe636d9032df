use egui::{Align2, Color32, FontId, Rect, Sense, vec2};
use ustr::Ustr;
use wallshell_business::{GalleryCompute, GalleryStatus};

use crate::utils::thumbnails::ThumbnailCache;

const TILE_SIZE: egui::Vec2 = vec2(160.0, 120.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryAction {
    /// Delete the image this tile mirrors. Carries the tile's own name so
    /// there is no separately-iterated list to race against.
    Delete(Ustr),
    OpenDirectory,
}

/// The stored-image gallery.
///
/// Renders whatever the last sync produced: a tile per entry, a loading
/// spinner, an inline error, or the over-the-cap redirect. `interactive`
/// is false while an operation is in flight so tiles stop reacting.
pub fn gallery(
    ui: &mut egui::Ui,
    compute: &GalleryCompute,
    thumbnails: &mut ThumbnailCache,
    interactive: bool,
) -> Option<GalleryAction> {
    match &compute.status {
        GalleryStatus::Idle | GalleryStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading images…");
            });
            None
        }
        GalleryStatus::Error(message) => {
            // Inline, in place of content: the gallery must never sit on a
            // stuck loading placeholder.
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!("Could not load images: {message}"),
            );
            None
        }
        GalleryStatus::Overflow { count } => {
            let mut action = None;
            ui.label(format!(
                "{count} images are stored — too many to preview here. Wallpaper rotation still \
                 uses all of them."
            ));
            ui.add_space(4.0);
            if ui.button("Open Image Folder").clicked() && interactive {
                action = Some(GalleryAction::OpenDirectory);
            }
            action
        }
        GalleryStatus::Ready { entries } => {
            if entries.is_empty() {
                ui.weak("No images stored yet. Drop some above to get started.");
                return None;
            }

            let names = entries.iter().map(|entry| entry.name).collect();
            thumbnails.retain_names(&names);

            let mut action = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for entry in entries {
                        let (rect, response) = ui.allocate_exact_size(TILE_SIZE, Sense::click());
                        if !ui.is_rect_visible(rect) {
                            continue;
                        }

                        match thumbnails.texture(ui.ctx(), entry.name, &entry.bytes) {
                            Some(texture) => {
                                egui::Image::new(&texture).paint_at(ui, rect);
                            }
                            None => paint_placeholder(ui, rect),
                        }

                        if interactive && response.hovered() {
                            paint_delete_affordance(ui, rect);
                        }
                        if interactive && response.clicked() {
                            action = Some(GalleryAction::Delete(entry.name));
                        }
                        response.on_hover_text(entry.name.as_str());
                    }
                });
            });

            if let Some(synced) = compute.last_synced {
                ui.add_space(4.0);
                ui.weak(format!(
                    "{} image(s) · synced {}",
                    entries.len(),
                    synced.format("%H:%M:%S")
                ));
            }
            action
        }
    }
}

/// Tile for an entry whose payload did not decode. The tile still counts:
/// one daemon file, one rendered tile.
fn paint_placeholder(ui: &egui::Ui, rect: Rect) {
    ui.painter()
        .rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "🖼",
        FontId::proportional(28.0),
        ui.visuals().weak_text_color(),
    );
}

fn paint_delete_affordance(ui: &egui::Ui, rect: Rect) {
    ui.painter()
        .rect_filled(rect, 4.0, Color32::from_black_alpha(110));
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        "🗑",
        FontId::proportional(26.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use egui_kittest::Harness;
    use kittest::Queryable;
    use wallshell_business::GalleryEntry;

    use super::*;

    fn run_with(compute: GalleryCompute) -> Harness<'static> {
        let mut thumbnails = ThumbnailCache::default();
        let mut harness = Harness::new_ui(move |ui| {
            let _ = gallery(ui, &compute, &mut thumbnails, true);
        });
        harness.run();
        harness
    }

    #[test]
    fn error_status_renders_the_message_inline() {
        let harness = run_with(GalleryCompute {
            status: GalleryStatus::Error("daemon offline".to_owned()),
            last_synced: None,
        });
        assert!(harness.query_by_label_contains("daemon offline").is_some());
    }

    #[test]
    fn overflow_renders_the_directory_redirect() {
        let harness = run_with(GalleryCompute {
            status: GalleryStatus::Overflow { count: 250 },
            last_synced: None,
        });
        assert!(harness.query_by_label("Open Image Folder").is_some());
    }

    #[test]
    fn empty_gallery_invites_a_drop() {
        let harness = run_with(GalleryCompute::ready(Vec::new()));
        assert!(
            harness
                .query_by_label_contains("No images stored yet")
                .is_some()
        );
    }

    #[test]
    fn ready_gallery_renders_one_tile_per_entry() {
        let entries = vec![
            GalleryEntry {
                name: Ustr::from("a.png"),
                bytes: Vec::new(),
            },
            GalleryEntry {
                name: Ustr::from("b.png"),
                bytes: Vec::new(),
            },
        ];
        let harness = run_with(GalleryCompute::ready(entries));
        assert!(harness.query_by_label_contains("2 image(s)").is_some());
    }
}
