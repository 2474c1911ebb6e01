use std::time::Duration;

use client_core::{
    render,
    view::{ErrorPanel, OperationTable, CALCULATING_LABEL, SUBMIT_LABEL, TABLE_HEADERS, TITLE},
    ResolutionMachine, ResolutionView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::{dispatch_backend_command, submit_riddle};
use crate::controller::params::ParameterStore;
use crate::controller::reducer::apply_ui_event;

const ERROR_TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 96, 96);

pub struct RiddleApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    endpoint: String,
    params: ParameterStore,
    resolution: ResolutionMachine,
    status: String,
}

impl RiddleApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, endpoint: String) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            endpoint,
            params: ParameterStore::default(),
            resolution: ResolutionMachine::new(),
            status: "Starting backend worker".to_string(),
        }
    }

    pub fn request_health_check(&mut self) {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckHealth, &mut self.status);
    }

    fn submit(&mut self) {
        submit_riddle(
            &self.params,
            &mut self.resolution,
            &self.cmd_tx,
            &mut self.status,
        );
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.resolution, &mut self.status, event);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let mut x = self.params.x().to_string();
        let mut y = self.params.y().to_string();
        let mut z = self.params.z().to_string();

        let responses = [
            parameter_field(ui, "riddle_x", "X", &mut x),
            parameter_field(ui, "riddle_y", "Y", &mut y),
            parameter_field(ui, "riddle_z", "Z", &mut z),
        ];

        if x != self.params.x() {
            self.params.set_x(x);
        }
        if y != self.params.y() {
            self.params.set_y(y);
        }
        if z != self.params.z() {
            self.params.set_z(z);
        }

        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
        let submitted_with_enter = enter_pressed && responses.iter().any(|r| r.lost_focus());

        ui.add_space(6.0);
        let clicked = ui
            .add_sized(
                [ui.available_width(), 34.0],
                egui::Button::new(egui::RichText::new(SUBMIT_LABEL).strong()),
            )
            .clicked();

        if clicked || submitted_with_enter {
            self.submit();
        }
    }

    fn show_resolution(&self, ui: &mut egui::Ui) {
        match render(self.resolution.state()) {
            ResolutionView::Hidden => {}
            ResolutionView::Calculating => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new(CALCULATING_LABEL).strong().size(16.0));
                });
            }
            ResolutionView::Table(table) => show_operation_table(ui, &table),
            ResolutionView::ErrorPanel(panel) => show_error_panel(ui, &panel),
        }
    }
}

fn parameter_field(
    ui: &mut egui::Ui,
    id: &'static str,
    hint: &str,
    value: &mut String,
) -> egui::Response {
    let edit = egui::TextEdit::singleline(value)
        .id(egui::Id::new(id))
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    ui.add_sized([ui.available_width(), 30.0], edit)
}

fn show_operation_table(ui: &mut egui::Ui, table: &OperationTable) {
    egui::ScrollArea::vertical()
        .max_height((ui.available_height() - 40.0).max(120.0))
        .show(ui, |ui| {
            egui::Grid::new("riddle_operations")
                .num_columns(TABLE_HEADERS.len())
                .striped(true)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for header in TABLE_HEADERS {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for row in &table.rows {
                        for cell in row.cells() {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    ui.add_space(8.0);
    ui.label(egui::RichText::new(table.target_header()).strong().size(16.0));
}

fn show_error_panel(ui: &mut egui::Ui, panel: &ErrorPanel) {
    ui.label(
        egui::RichText::new(ErrorPanel::TITLE)
            .strong()
            .size(16.0)
            .color(ERROR_TITLE_COLOR),
    );
    ui.label(ErrorPanel::LEAD);
    ui.label(panel.message_line());
    ui.label(panel.description_line());
}

impl eframe::App for RiddleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
                ui.separator();
                ui.small(egui::RichText::new(&self.endpoint).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(TITLE);
            ui.add_space(8.0);
            self.show_form(ui);
            ui.add_space(12.0);
            ui.separator();
            self.show_resolution(ui);
        });

        if self.resolution.state().is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
