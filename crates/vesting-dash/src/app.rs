//! Main application state and update loop

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;
use tracing::{info, warn};
use vesting_dash_adapters::AdapterConfig;
use vesting_dash_core::{CancelReadiness, Row, TransactionTable};

use crate::bridge::{self, CancelSignal, ConnectOutcome, DashboardBridge, Slot};
use crate::history_table::{self, TableEvent};
use crate::rows;
use crate::ui;

/// Outcome shown above the table
#[derive(Debug, Clone)]
enum Notice {
    Success(String),
    Error(String),
}

/// Notice for a finished connect; a connect cut short by Disconnect stays quiet.
fn connect_notice(outcome: ConnectOutcome) -> Option<Notice> {
    match outcome {
        ConnectOutcome::Connected(report) if report.superseded => {
            info!("wallet connect superseded by disconnect");
            None
        }
        ConnectOutcome::Connected(report) if !report.utxos_resolved => Some(Notice::Error(
            "Wallet connected but its UTXOs could not be read.".to_owned(),
        )),
        ConnectOutcome::Connected(_) => None,
        ConnectOutcome::Failed(message) => Some(Notice::Error(message)),
    }
}

/// The main application state
pub struct App {
    /// None when the runtime or HTTP clients failed to start
    bridge: Option<DashboardBridge>,
    table: TransactionTable,
    rows_file: Option<PathBuf>,
    wallet_name: String,
    connecting: bool,
    notice: Option<Notice>,
    rows_result: Slot<Result<Vec<Row>, String>>,
    connect_result: Slot<ConnectOutcome>,
    cancel_signal: Slot<CancelSignal>,
}

impl App {
    /// Create a new App instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut notice = None;
        let config = AdapterConfig::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "invalid configuration, using defaults");
            notice = Some(Notice::Error(format!("Configuration ignored: {e}")));
            AdapterConfig::default()
        });
        let bridge = match DashboardBridge::new(&config) {
            Ok(bridge) => Some(bridge),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "dashboard bridge unavailable");
                notice = Some(Notice::Error(format!("Wallet features unavailable: {e:#}")));
                None
            }
        };

        let mut app = Self {
            bridge,
            table: TransactionTable::new(),
            rows_file: rows::rows_file_from_env(),
            wallet_name: config.default_wallet_name.clone(),
            connecting: false,
            notice,
            rows_result: Arc::new(Mutex::new(None)),
            connect_result: Arc::new(Mutex::new(None)),
            cancel_signal: Arc::new(Mutex::new(None)),
        };
        app.reload_rows(&cc.egui_ctx);
        app
    }

    fn reload_rows(&mut self, ctx: &egui::Context) {
        let Some(path) = self.rows_file.clone() else {
            info!("{} not set, history is empty", rows::ROWS_FILE_ENV);
            self.table.set_rows(Vec::new());
            return;
        };
        self.table.set_loading(true);
        let slot = Arc::clone(&self.rows_result);
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = rows::load_rows(&path).map_err(|e| format!("{e:#}"));
            bridge::store(&slot, result);
            ctx.request_repaint();
        });
    }

    fn check_rows_result(&mut self) {
        let Some(result) = bridge::take(&self.rows_result) else {
            return;
        };
        self.table.set_loading(false);
        match result {
            Ok(rows) => {
                info!(count = rows.len(), "transaction history loaded");
                self.table.set_error(false);
                self.table.set_rows(rows);
            }
            Err(e) => {
                warn!(error = %e, "transaction history failed to load");
                self.table.set_error(true);
            }
        }
    }

    fn check_connect_result(&mut self) {
        let Some(outcome) = bridge::take(&self.connect_result) else {
            return;
        };
        self.connecting = false;
        if let Some(notice) = connect_notice(outcome) {
            self.notice = Some(notice);
        }
    }

    fn check_cancel_signal(&mut self, ctx: &egui::Context) {
        let Some(signal) = bridge::take(&self.cancel_signal) else {
            return;
        };
        match signal {
            CancelSignal::Succeeded => {
                self.notice = Some(Notice::Success(
                    "Cancellation submitted. The request shows as Cancelled once history refreshes."
                        .to_owned(),
                ));
                self.reload_rows(ctx);
            }
            CancelSignal::Failed => {
                self.notice = Some(Notice::Error(
                    "Cancellation failed. Nothing was submitted.".to_owned(),
                ));
            }
        }
    }

    fn readiness(&self) -> CancelReadiness {
        self.bridge
            .as_ref()
            .map(DashboardBridge::readiness)
            .unwrap_or_default()
    }

    fn render_wallet_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let Some(bridge) = self.bridge.clone() else {
            ui.label(egui::RichText::new("Wallet unavailable").weak());
            return;
        };
        let snapshot = bridge.snapshot();

        ui.horizontal(|ui| {
            if snapshot.connected {
                ui.label(format!(
                    "🔌 {}",
                    snapshot.wallet_name.as_deref().unwrap_or_default()
                ));
                match snapshot.change_address.as_deref() {
                    Some(address) => {
                        ui.label(egui::RichText::new(ui::short_address(address)).monospace())
                            .on_hover_text(address);
                    }
                    None => {
                        ui.label(egui::RichText::new("address unavailable").weak());
                    }
                }
                match snapshot.utxos.as_ref() {
                    Some(utxos) => {
                        ui.label(format!("{} UTXOs", utxos.len()));
                    }
                    None => {
                        ui.label(egui::RichText::new("UTXOs unavailable").weak());
                    }
                }
                if ui::secondary_button(ui, "Disconnect").clicked() {
                    bridge.disconnect();
                }
            } else if self.connecting {
                ui::loading_spinner(ui, "Connecting wallet...");
            } else {
                ui.label("Wallet:");
                ui.add(egui::TextEdit::singleline(&mut self.wallet_name).desired_width(100.0));
                let name = self.wallet_name.trim().to_owned();
                if ui::primary_button_enabled(ui, "Connect", !name.is_empty()).clicked() {
                    self.connecting = true;
                    self.notice = None;
                    bridge.connect(name, ctx, Arc::clone(&self.connect_result));
                }
            }
        });
    }

    fn handle_table_event(&mut self, event: TableEvent, ctx: &egui::Context) {
        match event {
            TableEvent::Cancel(target) => {
                let Some(bridge) = self.bridge.as_ref() else {
                    return;
                };
                info!(tx_hash = %target.tx_hash, tx_index = %target.tx_index, "cancel requested");
                if bridge.cancel(target, ctx, Arc::clone(&self.cancel_signal)) {
                    self.notice = None;
                }
            }
            TableEvent::View(link) => ui::open_url_new_tab(&link),
            TableEvent::CopyLink(link) => {
                if ui::copy_to_clipboard(&link) {
                    self.notice = Some(Notice::Success("Transaction link copied.".to_owned()));
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.check_rows_result();
        self.check_connect_result();
        self.check_cancel_signal(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("Vesting Dashboard")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(0, 212, 170)),
                );
                ui.add_space(30.0);
                ui.separator();
                ui.add_space(10.0);
                self.render_wallet_bar(ui, ctx);
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui::styled_heading(ui, "Transaction History");
                if self.rows_file.is_some()
                    && ui
                        .add_enabled(!self.table.is_loading(), egui::Button::new("⟳"))
                        .on_hover_text("Reload")
                        .clicked()
                {
                    self.reload_rows(ctx);
                }
            });
            ui.add_space(10.0);

            match &self.notice {
                Some(Notice::Success(message)) => ui::success_message(ui, message),
                Some(Notice::Error(message)) => ui::error_message(ui, message),
                None => {}
            }
            ui.add_space(6.0);

            let readiness = self.readiness();
            let mut events = Vec::new();
            ui::card(ui, |ui| {
                events = history_table::show(ui, &mut self.table, readiness);
            });
            for event in events {
                self.handle_table_event(event, ctx);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesting_dash_core::ConnectReport;

    #[test]
    fn superseded_connect_is_silent() {
        let outcome = ConnectOutcome::Connected(ConnectReport {
            superseded: true,
            ..ConnectReport::default()
        });
        assert!(connect_notice(outcome).is_none());
    }

    #[test]
    fn unread_utxos_raise_an_error_notice() {
        let outcome = ConnectOutcome::Connected(ConnectReport {
            change_address_resolved: true,
            ..ConnectReport::default()
        });
        assert!(matches!(connect_notice(outcome), Some(Notice::Error(_))));
    }

    #[test]
    fn full_connect_is_silent() {
        let outcome = ConnectOutcome::Connected(ConnectReport {
            superseded: false,
            utxos_resolved: true,
            change_address_resolved: true,
        });
        assert!(connect_notice(outcome).is_none());
    }
}
