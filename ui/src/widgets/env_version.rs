use egui::RichText;

/// Build/version footer label.
pub fn env_version(ui: &mut egui::Ui) {
    ui.label(
        RichText::new(wallshell_utils::format_env_version())
            .small()
            .weak(),
    )
    .on_hover_text(format!(
        "built {} ({})",
        wallshell_utils::build_date(),
        wallshell_utils::build_commit()
    ));
}
