//! egui rendering of the transaction history table.
//!
//! Paints the [`TableView`] produced by the core model and feeds pointer and
//! touch input back into its pan controller. Clicks are returned as
//! [`TableEvent`]s for the page to act on.

use eframe::egui;
use egui::scroll_area::ScrollBarVisibility;
use vesting_dash_core::{
    CancelReadiness, CancelTarget, CellDisplay, CursorHint, PaginationFooter, PointerEvent,
    PointerPhase, TableBody, TableView, TransactionTable,
};

use crate::ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Cancel(CancelTarget),
    View(String),
    CopyLink(String),
}

pub fn show(
    ui: &mut egui::Ui,
    table: &mut TransactionTable,
    readiness: CancelReadiness,
) -> Vec<TableEvent> {
    let mut events = Vec::new();
    let body = match table.render(readiness) {
        TableView::Error => {
            ui::error_message(ui, "Transaction history could not be loaded.");
            return events;
        }
        TableView::Ready(body) => body,
    };

    let output = egui::ScrollArea::horizontal()
        .id_salt("history_pan")
        .enable_scrolling(false)
        .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
        .scroll_offset(egui::vec2(-table.pan().translate_x(), 0.0))
        .show(ui, |ui| grid(ui, &body, &mut events));

    let viewport = output.inner_rect;
    table
        .pan_mut()
        .set_geometry(viewport.width(), output.content_size.x);
    for event in pointer_events(ui, viewport, table.pan().is_dragging()) {
        table.pan_mut().handle(event);
    }
    let hovered = ui.rect_contains_pointer(viewport);
    if hovered || table.pan().is_dragging() {
        match table.pan().cursor() {
            CursorHint::Grabbing => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
            CursorHint::Grab => ui.ctx().set_cursor_icon(egui::CursorIcon::Grab),
            CursorHint::Default => {}
        }
    }

    if body.rows.is_empty() && !table.is_loading() {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("No transactions yet.").weak());
    }

    ui.add_space(8.0);
    footer(ui, table, &body.footer);
    events
}

fn grid(ui: &mut egui::Ui, body: &TableBody, events: &mut Vec<TableEvent>) {
    egui::Grid::new("history_grid")
        .striped(true)
        .spacing([28.0, 10.0])
        .min_col_width(48.0)
        .show(ui, |ui| {
            for header in &body.headers {
                ui.label(egui::RichText::new(&header.title).strong());
            }
            // cancel column has no title
            ui.label("");
            ui.end_row();

            for row in &body.rows {
                for cell in &row.cells {
                    cell_ui(ui, cell, events);
                }
                match &row.cancel {
                    Some(cancel) => {
                        let clicked = ui
                            .add_enabled(cancel.enabled, egui::Button::new("Cancel"))
                            .on_disabled_hover_text("Wallet not ready or a cancellation is running")
                            .clicked();
                        if clicked {
                            events.push(TableEvent::Cancel(cancel.target.clone()));
                        }
                    }
                    None => {
                        ui.label("");
                    }
                }
                ui.end_row();
            }
        });
}

fn cell_ui(ui: &mut egui::Ui, cell: &CellDisplay, events: &mut Vec<TableEvent>) {
    match cell {
        CellDisplay::Text(text) => {
            ui.label(text);
        }
        CellDisplay::Badge(badge) => ui::status_badge(ui, badge),
        CellDisplay::Actions { transaction_link } => {
            ui.horizontal(|ui| {
                if ui
                    .small_button("🔗")
                    .on_hover_text("View transaction")
                    .clicked()
                {
                    events.push(TableEvent::View(transaction_link.clone()));
                }
                if ui.small_button("📋").on_hover_text("Copy link").clicked() {
                    events.push(TableEvent::CopyLink(transaction_link.clone()));
                }
            });
        }
        CellDisplay::Empty => {
            ui.label("");
        }
        CellDisplay::Placeholder(kind) => ui::skeleton(ui, *kind),
    }
}

fn footer(ui: &mut egui::Ui, table: &mut TransactionTable, footer: &PaginationFooter) {
    ui.add_enabled_ui(!footer.disabled, |ui| {
        ui.horizontal(|ui| {
            ui.label("Rows per page:");
            let mut page_size = footer.page_size;
            egui::ComboBox::from_id_salt("rows_per_page")
                .selected_text(page_size.to_string())
                .width(56.0)
                .show_ui(ui, |ui| {
                    for &option in footer.page_size_options {
                        ui.selectable_value(&mut page_size, option, option.to_string());
                    }
                });
            if page_size != footer.page_size {
                table.set_page_size(page_size);
            }

            ui.add_space(12.0);
            ui.label(&footer.range_label);
            if ui
                .add_enabled(footer.has_previous, egui::Button::new("◀"))
                .clicked()
            {
                table.set_page(footer.page.saturating_sub(1));
            }
            if ui
                .add_enabled(footer.has_next, egui::Button::new("▶"))
                .clicked()
            {
                table.set_page(footer.page + 1);
            }
        });
    });
}

/// Translates this frame's raw input into pan events. Touch input wins when
/// present since egui also mirrors touches as mouse events.
fn pointer_events(ui: &egui::Ui, viewport: egui::Rect, dragging: bool) -> Vec<PointerEvent> {
    ui.input(|input| {
        let touches: Vec<PointerEvent> = input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Touch { phase, pos, .. } => {
                    let phase = match phase {
                        egui::TouchPhase::Start if viewport.contains(*pos) => PointerPhase::Down,
                        egui::TouchPhase::Start => return None,
                        egui::TouchPhase::Move => PointerPhase::Move,
                        egui::TouchPhase::End => PointerPhase::Up,
                        egui::TouchPhase::Cancel => PointerPhase::Leave,
                    };
                    Some(PointerEvent::new(pos.x, pos.y, phase))
                }
                _ => None,
            })
            .collect();
        if !touches.is_empty() {
            return touches;
        }

        let pointer = &input.pointer;
        let Some(pos) = pointer.latest_pos() else {
            return if dragging {
                vec![PointerEvent::new(0.0, 0.0, PointerPhase::Leave)]
            } else {
                Vec::new()
            };
        };
        let phase = if pointer.primary_pressed() && viewport.contains(pos) {
            PointerPhase::Down
        } else if pointer.primary_released() {
            PointerPhase::Up
        } else if dragging && !viewport.contains(pos) {
            PointerPhase::Leave
        } else if dragging && pointer.delta() != egui::Vec2::ZERO {
            PointerPhase::Move
        } else {
            return Vec::new();
        };
        vec![PointerEvent::new(pos.x, pos.y, phase)]
    })
}
