//! Reusable UI components

use eframe::egui;
use vesting_dash_core::{BadgeIcon, BadgeTone, PlaceholderKind, StatusBadge};

/// Open URL in the system browser
pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open browser");
    }
}

pub fn copy_to_clipboard(text: &str) -> bool {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            false
        }
    }
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(egui::Color32::from_rgb(0, 212, 170)));
}

pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

/// Error message display
pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(220, 80, 80)));
    });
}

/// Success message display
pub fn success_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("✅").size(16.0));
        ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(80, 200, 120)));
    });
}

/// Primary button with enabled state
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    let accent = egui::Color32::from_rgb(0, 180, 150);
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0).color(egui::Color32::WHITE))
        .min_size(egui::vec2(110.0, 30.0))
        .fill(accent);
    ui.add_enabled(enabled, btn)
}

/// Secondary action button - subdued, outline style
pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    let btn = egui::Button::new(egui::RichText::new(text).size(14.0))
        .min_size(egui::vec2(90.0, 30.0));
    ui.add(btn)
}

/// Render content in a subtle card/frame
pub fn card(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(6.0)
        .inner_margin(12.0)
        .show(ui, add_contents);
}

// =============================================================================
// HISTORY TABLE CELLS
// =============================================================================

pub fn tone_color(tone: BadgeTone) -> egui::Color32 {
    match tone {
        BadgeTone::Success => egui::Color32::from_rgb(80, 200, 120),
        BadgeTone::Neutral => egui::Color32::from_rgb(160, 170, 185),
        BadgeTone::Error => egui::Color32::from_rgb(220, 80, 80),
    }
}

fn icon_glyph(icon: BadgeIcon) -> &'static str {
    match icon {
        BadgeIcon::Check => "✔",
        BadgeIcon::Clock => "⏳",
        BadgeIcon::Cross => "✖",
    }
}

/// Pill-shaped status label
pub fn status_badge(ui: &mut egui::Ui, badge: &StatusBadge) {
    let color = tone_color(badge.tone);
    egui::Frame::none()
        .fill(color.linear_multiply(0.15))
        .rounding(10.0)
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(format!("{} {}", icon_glyph(badge.icon), badge.label))
                    .size(12.0)
                    .color(color),
            );
        });
}

/// Grey block shaped like the content it stands in for
pub fn skeleton(ui: &mut egui::Ui, kind: PlaceholderKind) {
    let fill = ui.visuals().widgets.inactive.bg_fill;
    let blocks: &[(f32, f32, f32)] = match kind {
        PlaceholderKind::Text => &[(90.0, 12.0, 3.0)],
        PlaceholderKind::Badge => &[(76.0, 20.0, 10.0)],
        PlaceholderKind::Actions => &[(18.0, 18.0, 4.0), (18.0, 18.0, 4.0)],
    };
    ui.horizontal(|ui| {
        for &(width, height, rounding) in blocks {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
            ui.painter().rect_filled(rect, rounding, fill);
        }
    });
}

/// `addr_test1qz2f…dzer3`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 20 {
        return address.to_owned();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}…{tail}")
}
