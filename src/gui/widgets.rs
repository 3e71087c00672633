use eframe::egui::{
    self, Align2, Color32, FontId, Frame, Margin, RichText, Rounding, Sense, Stroke, Ui,
};
use rfd::FileDialog;

use crate::stager::{AcceptFilter, FileStager, StagedFile, StagerEvent, StagerIntent};
use crate::stats::{ChangeTrend, StatCard};
use crate::table::{ColumnKind, Record, SortableTable, EMPTY_MESSAGE};
use crate::theme::active_palette;

/// One-line status shown under a page action.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

impl Notice {
    pub fn show(&self, ui: &mut Ui) {
        let (color, text) = match self {
            Notice::Success(t) => (Color32::from_rgb(0x10, 0xb9, 0x81), t),
            Notice::Info(t) => (Color32::from_rgb(0xf5, 0x9e, 0x0b), t),
            Notice::Error(t) => (Color32::from_rgb(0xf4, 0x3f, 0x5e), t),
        };
        ui.colored_label(color, text);
    }
}

pub fn card<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    let visuals = ui.visuals();
    Frame::none()
        .fill(visuals.faint_bg_color)
        .stroke(visuals.widgets.noninteractive.bg_stroke)
        .rounding(Rounding::same(10.0))
        .inner_margin(Margin::same(14.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub fn badge(ui: &mut Ui, text: &str, fill: Color32, color: Color32) {
    Frame::none()
        .fill(fill)
        .rounding(Rounding::same(9.0))
        .inner_margin(Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().strong().color(color));
        });
}

pub fn stat_card(ui: &mut Ui, stat: &StatCard) {
    let accent = active_palette(ui.ctx()).accent(stat.accent);
    card(ui, |ui| {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(4.0, 36.0), Sense::hover());
            ui.painter().rect_filled(rect, Rounding::same(2.0), accent);
            ui.vertical(|ui| {
                ui.label(RichText::new(&stat.label).small().weak());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&stat.value).size(22.0).strong());
                    if let (Some(change), Some(trend)) = (&stat.change, stat.trend()) {
                        let color = match trend {
                            ChangeTrend::Positive => Color32::from_rgb(0x10, 0xb9, 0x81),
                            ChangeTrend::Negative => Color32::from_rgb(0xf4, 0x3f, 0x5e),
                            ChangeTrend::Neutral => ui.visuals().weak_text_color(),
                        };
                        ui.label(RichText::new(change).small().color(color));
                    }
                });
            });
        });
    });
}

/// Draws `records` through `table`. Header clicks update the sort state; the
/// records themselves are never reordered.
pub fn sortable_table(ui: &mut Ui, id: &str, table: &mut SortableTable, records: &[Record]) {
    if records.is_empty() {
        card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.label(RichText::new(EMPTY_MESSAGE).weak());
                ui.add_space(12.0);
            });
        });
        return;
    }

    let dark = ui.visuals().dark_mode;
    let palette = active_palette(ui.ctx());
    let mut clicked: Option<String> = None;

    egui::ScrollArea::horizontal().id_source(format!("{id}_scroll")).show(ui, |ui| {
        egui::Grid::new(id)
            .striped(true)
            .num_columns(table.columns().len() + 1)
            .spacing([18.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("#").strong());
                for col in table.columns() {
                    let label = match table.sort_state().indicator(&col.key) {
                        Some(arrow) => format!("{} {arrow}", col.label),
                        None => col.label.clone(),
                    };
                    let header = egui::Button::new(RichText::new(label).strong()).frame(false);
                    if ui.add(header).clicked() {
                        clicked = Some(col.key.clone());
                    }
                }
                ui.end_row();

                for (idx, record) in table.sorted(records).into_iter().enumerate() {
                    ui.label(RichText::new((idx + 1).to_string()).weak());
                    for col in table.columns() {
                        let value = record.get(&col.key);
                        match col.kind {
                            ColumnKind::Badge(scheme) => {
                                let text = value.display();
                                let (fill, color) = palette.badge(scheme.tone(&text), dark);
                                badge(ui, &text, fill, color);
                            }
                            ColumnKind::Plain => {
                                ui.label(value.display());
                            }
                        }
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(key) = clicked {
        table.toggle_sort(&key);
    }
}

fn staged_from_drop(file: &egui::DroppedFile) -> Option<StagedFile> {
    if let Some(path) = &file.path {
        return match StagedFile::from_path(path) {
            Ok(staged) => Some(staged),
            Err(e) => {
                log::warn!("ignoring dropped file {}: {e}", path.display());
                None
            }
        };
    }
    file.bytes
        .as_ref()
        .map(|bytes| StagedFile::from_bytes(&file.name, bytes.clone()))
}

fn pick_file(accept: &AcceptFilter) -> Vec<StagedFile> {
    let mut dialog = FileDialog::new();
    if !accept.extensions().is_empty() {
        dialog = dialog.add_filter(accept.as_str(), accept.extensions());
    }
    let Some(path) = dialog.pick_file() else {
        return Vec::new();
    };
    match StagedFile::from_path(&path) {
        Ok(file) => vec![file],
        Err(e) => {
            log::warn!("cannot stage {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Drop zone while nothing is staged, file card once something is. Window
/// level drops only count while the drop zone is on screen.
pub fn file_stager(
    ui: &mut Ui,
    stager: &mut FileStager,
    accept: &AcceptFilter,
    staged: Option<&StagedFile>,
    description: &str,
) -> Option<StagerIntent> {
    if let Some(file) = staged {
        let mut intent = None;
        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("📄").size(22.0));
                ui.vertical(|ui| {
                    ui.label(RichText::new(&file.name).strong());
                    ui.label(RichText::new(file.size_label()).small().weak());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").on_hover_text("Remove file").clicked() {
                        intent = stager.handle(staged, StagerEvent::Clear);
                    }
                });
            });
        });
        return intent;
    }

    let ctx = ui.ctx().clone();
    let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
    if hovering {
        stager.handle(None, StagerEvent::DragOver);
    } else if stager.is_drag_active() {
        stager.handle(None, StagerEvent::DragLeave);
    }

    let mut intent = None;
    let dropped: Vec<egui::DroppedFile> = ctx.input(|i| i.raw.dropped_files.clone());
    if !dropped.is_empty() {
        let files: Vec<StagedFile> = dropped.iter().filter_map(staged_from_drop).collect();
        intent = stager.handle(None, StagerEvent::Drop(files));
    }

    let visuals = ui.visuals().clone();
    let active = stager.is_drag_active();
    let desired = egui::vec2(ui.available_width(), 140.0);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click());
    let stroke_color = if active || response.hovered() {
        visuals.selection.stroke.color
    } else {
        visuals.widgets.noninteractive.bg_stroke.color
    };
    let fill = if active {
        visuals.selection.bg_fill.gamma_multiply(0.25)
    } else {
        visuals.faint_bg_color
    };
    let painter = ui.painter();
    painter.rect(rect, Rounding::same(12.0), fill, Stroke::new(1.5, stroke_color));
    painter.text(
        rect.center() - egui::vec2(0.0, 22.0),
        Align2::CENTER_CENTER,
        "⬆",
        FontId::proportional(26.0),
        stroke_color,
    );
    let headline = if active {
        "Drop file here"
    } else {
        "Drag & drop or click to browse"
    };
    painter.text(
        rect.center() + egui::vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        headline,
        FontId::proportional(15.0),
        visuals.strong_text_color(),
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 34.0),
        Align2::CENTER_CENTER,
        description,
        FontId::proportional(12.0),
        visuals.weak_text_color(),
    );

    if response.clicked() {
        intent = stager.handle(None, StagerEvent::Picked(pick_file(accept)));
    }

    intent
}

/// Wrapping row of topic pills with a remove button on each.
pub fn topic_pills(ui: &mut Ui, topics: &[String]) -> Option<usize> {
    let mut removed = None;
    ui.horizontal_wrapped(|ui| {
        for (idx, topic) in topics.iter().enumerate() {
            Frame::none()
                .fill(ui.visuals().selection.bg_fill.gamma_multiply(0.3))
                .rounding(Rounding::same(10.0))
                .inner_margin(Margin::symmetric(8.0, 2.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(topic);
                        if ui.small_button("✕").clicked() {
                            removed = Some(idx);
                        }
                    });
                });
        }
    });
    removed
}
