use egui::{Id, Modal, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalFormAction {
    Save(u64),
    Close,
}

/// Form-local state: the text field plus whether the user has touched it
/// (a prefill from the daemon must not clobber typed input).
#[derive(Debug, Default)]
pub struct IntervalFormState {
    pub seconds_text: String,
    pub dirty: bool,
}

impl IntervalFormState {
    pub fn reset(&mut self) {
        self.seconds_text.clear();
        self.dirty = false;
    }

    pub fn prefill(&mut self, seconds: u64) {
        if !self.dirty {
            self.seconds_text = seconds.to_string();
        }
    }

    /// The entered value, when it parses to a positive seconds count.
    pub fn parsed(&self) -> Option<u64> {
        self.seconds_text
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|seconds| *seconds > 0)
    }
}

/// The rotation-interval form.
///
/// Not an alert: Escape and backdrop clicks are ignored; only the Save and
/// Close buttons leave the form.
pub fn interval_form(
    ctx: &egui::Context,
    form: &mut IntervalFormState,
) -> Option<IntervalFormAction> {
    let modal = Modal::new(Id::new("interval-form")).show(ctx, |ui| {
        ui.set_max_width(320.0);
        ui.heading("Wallpaper rotation timer");
        ui.add_space(4.0);
        ui.label("How often the desktop wallpaper changes, in seconds.");
        ui.add_space(8.0);

        let edit = ui.add(
            TextEdit::singleline(&mut form.seconds_text)
                .hint_text("e.g. 300")
                .desired_width(120.0),
        );
        if edit.changed() {
            form.dirty = true;
        }

        let valid = form.parsed().is_some();
        if !valid && !form.seconds_text.trim().is_empty() {
            ui.colored_label(
                ui.visuals().warn_fg_color,
                "Enter a positive number of seconds.",
            );
        }
        ui.add_space(12.0);

        let mut action = None;
        ui.horizontal(|ui| {
            if ui.add_enabled(valid, egui::Button::new("Save")).clicked()
                && let Some(seconds) = form.parsed()
            {
                action = Some(IntervalFormAction::Save(seconds));
            }
            if ui.button("Close").clicked() {
                action = Some(IntervalFormAction::Close);
            }
        });
        action
    });

    modal.inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_accepts_only_positive_seconds() {
        let mut form = IntervalFormState::default();
        for (text, expected) in [
            ("300", Some(300)),
            (" 45 ", Some(45)),
            ("0", None),
            ("-3", None),
            ("ten", None),
            ("", None),
        ] {
            form.seconds_text = text.to_owned();
            assert_eq!(form.parsed(), expected, "input {text:?}");
        }
    }

    #[test]
    fn prefill_never_clobbers_typed_input() {
        let mut form = IntervalFormState::default();
        form.prefill(300);
        assert_eq!(form.seconds_text, "300");

        form.seconds_text = "42".to_owned();
        form.dirty = true;
        form.prefill(600);
        assert_eq!(form.seconds_text, "42");
    }

    #[test]
    fn reset_clears_text_and_dirtiness() {
        let mut form = IntervalFormState {
            seconds_text: "99".to_owned(),
            dirty: true,
        };
        form.reset();
        assert!(form.seconds_text.is_empty());
        assert!(!form.dirty);
        form.prefill(120);
        assert_eq!(form.seconds_text, "120");
    }
}
