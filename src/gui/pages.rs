//! Feature pages. Each page owns its staged file, its in-flight request and
//! its last result; the app only routes between them.

use eframe::egui::{self, Color32, ComboBox, ProgressBar, RichText, ScrollArea, Ui};
use rfd::FileDialog;
use serde_json::Value;
use std::path::Path;

use super::widgets::{badge, card, file_stager, sortable_table, stat_card, topic_pills, Notice};
use crate::api::ApiClient;
use crate::demo::{self, settle, Outcome};
use crate::export::{assessment_text, export_file_name, option_letter, report_text, write_export};
use crate::payloads::{
    Assessment, AssessmentRequest, Difficulty, FeedbackReport, FeedbackRequest, MarksAnalysis,
    SyllabusAnalysis,
};
use crate::stager::{apply_intent, AcceptFilter, FileStager, StagedFile, StagerIntent};
use crate::stats::{class_health, Accent, StatCard};
use crate::table::{format_number, BadgeScheme, Record, SortableTable};
use crate::tasks::{self, take_ready, Pending};
use crate::theme::active_palette;

pub struct PageEnv<'a> {
    pub ctx: &'a egui::Context,
    pub client: &'a ApiClient,
    pub demo_fallback: bool,
    pub exports_dir: &'a Path,
}

/// Reported back to the app so the dashboard can follow along.
#[derive(Debug, Clone)]
pub enum PageEvent {
    MarksAnalyzed(MarksAnalysis),
    SyllabusAnalyzed { file: String, topics: usize },
    AssessmentGenerated { subject: String, unit: String },
    ReportGenerated { student: String, score: f64 },
    MaterialUploaded(String),
}

fn spawn_request<T, F>(ctx: &egui::Context, fut: F) -> Pending<T>
where
    T: Send + 'static,
    F: std::future::Future<Output = crate::api::ApiResult<T>> + Send + 'static,
{
    let ctx = ctx.clone();
    tasks::spawn(fut, move || ctx.request_repaint())
}

fn notice_for<T>(outcome: &Outcome<T>, success: &str) -> Notice {
    let text = outcome.message(success);
    match outcome {
        Outcome::Live(_) => Notice::Success(text),
        Outcome::Demo { .. } => Notice::Info(text),
        Outcome::Failed(_) => Notice::Error(text),
    }
}

fn save_text(exports_dir: &Path, file_name: &str, text: &str) -> Option<Notice> {
    let path = FileDialog::new()
        .set_directory(exports_dir)
        .set_file_name(file_name)
        .add_filter("Text", &["txt"])
        .save_file()?;
    let dir = path.parent().unwrap_or(exports_dir);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    Some(match write_export(dir, &name, text) {
        Ok(saved) => {
            log::info!("export written to {}", saved.display());
            Notice::Success(format!("Downloaded to {}", saved.display()))
        }
        Err(e) => Notice::Error(format!("Could not save {name}: {e}")),
    })
}

fn page_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.heading(title);
    ui.label(RichText::new(subtitle).weak());
    ui.add_space(8.0);
}

fn busy(ui: &mut Ui, label: &str) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new());
        ui.label(label);
    });
}

fn stat_row(ui: &mut Ui, cards: &[StatCard]) {
    ui.columns(cards.len().max(1), |cols| {
        for (col, stat) in cols.iter_mut().zip(cards) {
            stat_card(col, stat);
        }
    });
}

fn scheme_badge(ui: &mut Ui, scheme: BadgeScheme, text: &str) {
    let dark = ui.visuals().dark_mode;
    let (fill, color) = active_palette(ui.ctx()).badge(scheme.tone(text), dark);
    badge(ui, text, fill, color);
}

/// Chart labels keep the first 15 characters.
pub fn chart_label(name: &str) -> String {
    if name.chars().count() > 15 {
        let head: String = name.chars().take(15).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

pub struct MarksPage {
    stager: FileStager,
    accept: AcceptFilter,
    file: Option<StagedFile>,
    pending: Option<Pending<MarksAnalysis>>,
    analysis: Option<MarksAnalysis>,
    rows: Vec<Record>,
    table: SortableTable,
    notice: Option<Notice>,
}

impl Default for MarksPage {
    fn default() -> Self {
        Self {
            stager: FileStager::new(),
            accept: AcceptFilter::parse(".csv"),
            file: None,
            pending: None,
            analysis: None,
            rows: Vec::new(),
            table: SortableTable::default(),
            notice: None,
        }
    }
}

impl MarksPage {
    pub fn show(&mut self, ui: &mut Ui, env: &PageEnv) -> Option<PageEvent> {
        let mut event = None;
        if let Some(result) = take_ready(&mut self.pending) {
            let outcome = settle(result, env.demo_fallback, demo::marks_analysis);
            self.notice = Some(notice_for(&outcome, "Analysis complete!"));
            if let Some(data) = outcome.into_data() {
                self.rows = data.student_records();
                self.table.reset_sort();
                event = Some(PageEvent::MarksAnalyzed(data.clone()));
                self.analysis = Some(data);
            }
        }

        page_header(
            ui,
            "Marks Analysis",
            "Upload a CSV of student marks for class insights",
        );

        card(ui, |ui| {
            if let Some(intent) = file_stager(
                ui,
                &mut self.stager,
                &self.accept,
                self.file.as_ref(),
                "CSV with name, score and grade columns",
            ) {
                apply_intent(&mut self.file, intent);
            }
            ui.add_space(8.0);
            let idle = self.pending.is_none();
            if ui
                .add_enabled(idle, egui::Button::new("Analyze Marks"))
                .clicked()
            {
                match &self.file {
                    None => {
                        self.notice = Some(Notice::Error("Please upload a CSV file first.".into()))
                    }
                    Some(file) => {
                        let client = env.client.clone();
                        let file = file.clone();
                        self.notice = None;
                        self.pending = Some(spawn_request(env.ctx, async move {
                            client.analyze_marks(&file).await
                        }));
                    }
                }
            }
            if !idle {
                busy(ui, "Analyzing...");
            }
            if let Some(n) = &self.notice {
                n.show(ui);
            }
        });

        let Some(analysis) = &self.analysis else {
            return event;
        };
        ui.add_space(12.0);

        let (health, health_accent) = class_health(analysis.average_score);
        stat_row(
            ui,
            &[
                StatCard::new(
                    "Average Score",
                    format!("{}%", format_number(analysis.average_score)),
                    Accent::Blue,
                ),
                StatCard::new(
                    "Weak Topics",
                    analysis.weak_topics.len().to_string(),
                    Accent::Amber,
                ),
                StatCard::new(
                    "At-Risk Students",
                    analysis.risk_students.len().to_string(),
                    Accent::Rose,
                ),
                StatCard::new("Class Health", health, health_accent),
            ],
        );

        ui.add_space(12.0);
        ui.columns(2, |cols| {
            card(&mut cols[0], |ui| {
                ui.label(RichText::new("Weak Topics").strong());
                for topic in &analysis.weak_topics {
                    ui.label(format!("• {topic}"));
                }
            });
            card(&mut cols[1], |ui| {
                ui.label(RichText::new("At-Risk Students").strong());
                ui.horizontal_wrapped(|ui| {
                    for name in &analysis.risk_students {
                        scheme_badge(ui, BadgeScheme::Status, "At-Risk");
                        ui.label(name);
                    }
                });
            });
        });

        if !analysis.strategy.is_empty() {
            ui.add_space(12.0);
            card(ui, |ui| {
                ui.label(RichText::new("AI Teaching Strategy").strong());
                ui.label(&analysis.strategy);
            });
        }

        ui.add_space(12.0);
        ui.label(RichText::new("Student Performance").strong());
        sortable_table(ui, "marks_students", &mut self.table, &self.rows);
        event
    }
}

pub struct SyllabusPage {
    stager: FileStager,
    accept: AcceptFilter,
    file: Option<StagedFile>,
    pending: Option<Pending<SyllabusAnalysis>>,
    analysis: Option<SyllabusAnalysis>,
    rows: Vec<Record>,
    table: SortableTable,
    notice: Option<Notice>,
}

impl Default for SyllabusPage {
    fn default() -> Self {
        Self {
            stager: FileStager::new(),
            accept: AcceptFilter::parse(".pdf"),
            file: None,
            pending: None,
            analysis: None,
            rows: Vec::new(),
            table: SortableTable::new(SyllabusAnalysis::topic_columns()),
            notice: None,
        }
    }
}

impl SyllabusPage {
    pub fn show(&mut self, ui: &mut Ui, env: &PageEnv) -> Option<PageEvent> {
        let mut event = None;
        if let Some(result) = take_ready(&mut self.pending) {
            let outcome = settle(result, env.demo_fallback, demo::syllabus_analysis);
            self.notice = Some(notice_for(&outcome, "Syllabus analyzed successfully!"));
            if let Some(data) = outcome.into_data() {
                self.rows = data.topic_records();
                self.table.reset_sort();
                event = Some(PageEvent::SyllabusAnalyzed {
                    file: self.file.as_ref().map(|f| f.name.clone()).unwrap_or_default(),
                    topics: data.topics.len(),
                });
                self.analysis = Some(data);
            }
        }

        page_header(
            ui,
            "Learning Gap Analysis",
            "Upload a syllabus PDF to find topics that need attention",
        );

        card(ui, |ui| {
            if let Some(intent) = file_stager(
                ui,
                &mut self.stager,
                &self.accept,
                self.file.as_ref(),
                "PDF syllabus",
            ) {
                apply_intent(&mut self.file, intent);
            }
            ui.add_space(8.0);
            let idle = self.pending.is_none();
            if ui
                .add_enabled(idle, egui::Button::new("Analyze Syllabus"))
                .clicked()
            {
                match &self.file {
                    None => {
                        self.notice =
                            Some(Notice::Error("Please upload a PDF syllabus first.".into()))
                    }
                    Some(file) => {
                        let client = env.client.clone();
                        let file = file.clone();
                        self.notice = None;
                        self.pending = Some(spawn_request(env.ctx, async move {
                            client.analyze_syllabus(&file).await
                        }));
                    }
                }
            }
            if !idle {
                busy(ui, "Analyzing Syllabus...");
            }
            if let Some(n) = &self.notice {
                n.show(ui);
            }
        });

        let Some(analysis) = &self.analysis else {
            return event;
        };

        ui.add_space(12.0);
        card(ui, |ui| {
            ui.label(RichText::new("Topic Weightage").strong());
            let max = analysis.max_weight();
            egui::Grid::new("syllabus_weights")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for topic in &analysis.topics {
                        ui.label(chart_label(&topic.name)).on_hover_text(&topic.name);
                        let fraction = if max > 0.0 {
                            (topic.weight / max) as f32
                        } else {
                            0.0
                        };
                        ui.add(
                            ProgressBar::new(fraction)
                                .desired_width(ui.available_width().min(360.0))
                                .text(format!("{}%", format_number(topic.weight))),
                        );
                        ui.end_row();
                    }
                });
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Topics").strong());
        sortable_table(ui, "syllabus_topics", &mut self.table, &self.rows);

        if !analysis.focus_areas.is_empty() {
            ui.add_space(12.0);
            ui.label(RichText::new("Focus Areas").strong());
            for area in &analysis.focus_areas {
                card(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&area.topic).strong());
                        scheme_badge(ui, BadgeScheme::Priority, &area.priority);
                    });
                    ui.label(RichText::new(&area.reason).weak());
                });
                ui.add_space(4.0);
            }
        }
        event
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssessmentSource {
    Topic,
    Pdf,
}

pub struct AssessmentPage {
    source: AssessmentSource,
    form: AssessmentRequest,
    stager: FileStager,
    accept: AcceptFilter,
    pdf: Option<StagedFile>,
    pending: Option<(AssessmentRequest, Pending<Assessment>)>,
    assessment: Option<Assessment>,
    notice: Option<Notice>,
}

impl Default for AssessmentPage {
    fn default() -> Self {
        Self {
            source: AssessmentSource::Topic,
            form: AssessmentRequest::default(),
            stager: FileStager::new(),
            accept: AcceptFilter::parse(".pdf"),
            pdf: None,
            pending: None,
            assessment: None,
            notice: None,
        }
    }
}

impl AssessmentPage {
    fn poll(&mut self, env: &PageEnv) -> Option<PageEvent> {
        let result = self.pending.as_ref()?.1.poll()?;
        let (req, _) = self.pending.take()?;
        let outcome = match settle(result, env.demo_fallback, || demo::assessment(&req)) {
            Outcome::Live(mut a) => {
                a.fill_from(&req);
                Outcome::Live(a)
            }
            other => other,
        };
        self.notice = Some(notice_for(&outcome, "Assessment generated successfully!"));
        let data = outcome.into_data()?;
        let event = PageEvent::AssessmentGenerated {
            subject: data.subject.clone(),
            unit: data.unit.clone(),
        };
        self.assessment = Some(data);
        Some(event)
    }

    fn submit(&mut self, env: &PageEnv) {
        let client = env.client.clone();
        match self.source {
            AssessmentSource::Topic => {
                if self.form.subject.trim().is_empty() || self.form.unit.trim().is_empty() {
                    self.notice = Some(Notice::Error("Fill all fields.".into()));
                    return;
                }
                let req = self.form.clone();
                let body = req.clone();
                let pending =
                    spawn_request(env.ctx, async move { client.generate_assessment(&body).await });
                self.pending = Some((req, pending));
            }
            AssessmentSource::Pdf => {
                let Some(pdf) = self.pdf.clone() else {
                    self.notice = Some(Notice::Error("Please upload a PDF first.".into()));
                    return;
                };
                let subject = Path::new(&pdf.name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| pdf.name.clone());
                let req = AssessmentRequest {
                    subject,
                    unit: "From PDF".to_string(),
                    ..self.form.clone()
                };
                let (difficulty, count) = (req.difficulty, req.num_questions);
                let pending = spawn_request(env.ctx, async move {
                    client
                        .generate_assessment_from_pdf(&pdf, difficulty, count)
                        .await
                });
                self.pending = Some((req, pending));
            }
        }
        self.notice = None;
    }

    pub fn show(&mut self, ui: &mut Ui, env: &PageEnv) -> Option<PageEvent> {
        let event = self.poll(env);

        page_header(
            ui,
            "AI Assessment Generator",
            "Generate tailored assessments aligned with Bloom's Taxonomy",
        );

        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.source, AssessmentSource::Topic, "From topic");
                ui.selectable_value(&mut self.source, AssessmentSource::Pdf, "From PDF");
            });
            ui.add_space(6.0);

            egui::Grid::new("assessment_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    if self.source == AssessmentSource::Topic {
                        ui.label("Subject");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form.subject)
                                .hint_text("e.g. Data Structures"),
                        );
                        ui.end_row();
                        ui.label("Unit / Topic");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form.unit)
                                .hint_text("e.g. Trees & Graphs"),
                        );
                        ui.end_row();
                    }
                    ui.label("Difficulty");
                    ComboBox::from_id_source("assessment_difficulty")
                        .selected_text(self.form.difficulty.label())
                        .show_ui(ui, |ui| {
                            for d in Difficulty::ALL {
                                ui.selectable_value(&mut self.form.difficulty, d, d.label());
                            }
                        });
                    ui.end_row();
                    ui.label("Number of Questions");
                    ui.add(egui::DragValue::new(&mut self.form.num_questions).clamp_range(1..=50));
                    ui.end_row();
                });

            if self.source == AssessmentSource::Pdf {
                ui.add_space(6.0);
                if let Some(intent) = file_stager(
                    ui,
                    &mut self.stager,
                    &self.accept,
                    self.pdf.as_ref(),
                    "Lecture notes or syllabus PDF",
                ) {
                    apply_intent(&mut self.pdf, intent);
                }
            }

            ui.add_space(8.0);
            let idle = self.pending.is_none();
            if ui
                .add_enabled(idle, egui::Button::new("Generate Assessment"))
                .clicked()
            {
                self.submit(env);
            }
            if !idle {
                busy(ui, "Generating with AI...");
            }
            if let Some(n) = &self.notice {
                n.show(ui);
            }
        });

        if let Some(assessment) = &self.assessment {
            ui.add_space(12.0);
            if let Some(n) = show_assessment(ui, env, assessment) {
                self.notice = Some(n);
            }
        }
        event
    }
}

fn show_assessment(ui: &mut Ui, env: &PageEnv, a: &Assessment) -> Option<Notice> {
    let mut notice = None;
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(format!("{} — {}", a.subject, a.unit)).strong().size(17.0));
                ui.horizontal(|ui| {
                    ui.label("Difficulty:");
                    let dark = ui.visuals().dark_mode;
                    let (fill, color) =
                        active_palette(ui.ctx()).badge(crate::table::BadgeTone::Purple, dark);
                    badge(ui, &a.difficulty, fill, color);
                });
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Download").clicked() {
                    notice = save_text(
                        env.exports_dir,
                        &export_file_name("assessment", &a.subject),
                        &assessment_text(a),
                    );
                }
                if ui.button("Copy").clicked() {
                    match serde_json::to_string_pretty(a) {
                        Ok(json) => {
                            env.ctx.output_mut(|o| o.copied_text = json);
                            notice = Some(Notice::Success("Assessment copied to clipboard!".into()));
                        }
                        Err(e) => notice = Some(Notice::Error(format!("Copy failed: {e}"))),
                    }
                }
            });
        });
    });

    ui.add_space(8.0);
    ui.label(RichText::new(format!("Multiple Choice Questions ({})", a.mcqs.len())).strong());
    for (i, q) in a.mcqs.iter().enumerate() {
        card(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(format!("Q{}.", i + 1)).strong());
                ui.label(&q.question);
                scheme_badge(ui, BadgeScheme::Bloom, &q.bloom_level);
            });
            for (j, opt) in q.options.iter().enumerate() {
                let text = format!("{}) {}", option_letter(j), opt);
                if *opt == q.answer {
                    ui.label(
                        RichText::new(format!("{text}  ✓"))
                            .color(Color32::from_rgb(0x10, 0xb9, 0x81))
                            .strong(),
                    );
                } else {
                    ui.label(text);
                }
            }
        });
        ui.add_space(4.0);
    }

    ui.add_space(8.0);
    ui.label(RichText::new(format!("Short Answer Questions ({})", a.short_answer.len())).strong());
    for (i, q) in a.short_answer.iter().enumerate() {
        card(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(format!("Q{}.", i + 1)).strong());
                ui.label(&q.question);
            });
            ui.horizontal(|ui| {
                scheme_badge(ui, BadgeScheme::Bloom, &q.bloom_level);
                ui.label(RichText::new(format!("{} marks", q.marks)).weak());
            });
        });
        ui.add_space(4.0);
    }
    notice
}

/// `draft` holds the name and topics as typed; the score stays text until
/// the form is submitted.
#[derive(Default)]
pub struct ReportsPage {
    draft: FeedbackRequest,
    score: String,
    topic_input: String,
    pending: Option<(FeedbackRequest, Pending<FeedbackReport>)>,
    report: Option<FeedbackReport>,
    notice: Option<Notice>,
}

impl ReportsPage {
    /// `None` until both the name and a numeric score are filled in.
    fn request(&self) -> Option<FeedbackRequest> {
        let name = self.draft.student_name.trim();
        let score: f64 = self.score.trim().parse().ok()?;
        if name.is_empty() {
            return None;
        }
        Some(FeedbackRequest {
            student_name: name.to_string(),
            score,
            weak_topics: self.draft.weak_topics.clone(),
        })
    }

    fn add_topic(&mut self) {
        self.draft.add_topic(&self.topic_input);
        self.topic_input.clear();
    }

    fn poll(&mut self, env: &PageEnv) -> Option<PageEvent> {
        let result = self.pending.as_ref()?.1.poll()?;
        let (req, _) = self.pending.take()?;
        let outcome = settle(result, env.demo_fallback, || demo::feedback_report(&req));
        self.notice = Some(notice_for(&outcome, "Feedback generated!"));
        let report = outcome.into_data()?;
        let event = PageEvent::ReportGenerated {
            student: req.student_name.clone(),
            score: req.score,
        };
        self.report = Some(report);
        Some(event)
    }

    pub fn show(&mut self, ui: &mut Ui, env: &PageEnv) -> Option<PageEvent> {
        let event = self.poll(env);

        page_header(
            ui,
            "Student Feedback Reports",
            "Generate personalized feedback for individual students",
        );

        card(ui, |ui| {
            egui::Grid::new("report_form")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Student Name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.draft.student_name)
                            .hint_text("e.g. Rahul Sharma"),
                    );
                    ui.end_row();
                    ui.label("Score (%)");
                    ui.add(egui::TextEdit::singleline(&mut self.score).hint_text("e.g. 68"));
                    ui.end_row();
                    ui.label("Weak Topics");
                    ui.horizontal(|ui| {
                        let input = ui.add(
                            egui::TextEdit::singleline(&mut self.topic_input)
                                .hint_text("Add a topic and press Enter"),
                        );
                        let entered =
                            input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if ui.button("Add").clicked() || entered {
                            self.add_topic();
                        }
                    });
                    ui.end_row();
                });
            if let Some(idx) = topic_pills(ui, &self.draft.weak_topics) {
                self.draft.remove_topic(idx);
            }

            ui.add_space(8.0);
            let idle = self.pending.is_none();
            if ui
                .add_enabled(idle, egui::Button::new("Generate Report"))
                .clicked()
            {
                match self.request() {
                    None => self.notice = Some(Notice::Error("Fill all fields.".into())),
                    Some(req) => {
                        let client = env.client.clone();
                        let body = req.clone();
                        self.notice = None;
                        let pending = spawn_request(env.ctx, async move {
                            client.generate_feedback(&body).await
                        });
                        self.pending = Some((req, pending));
                    }
                }
            }
            if !idle {
                busy(ui, "Generating...");
            }
            if let Some(n) = &self.notice {
                n.show(ui);
            }
        });

        if let Some(report) = &self.report {
            ui.add_space(12.0);
            let mut download = false;
            card(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&report.student_name).strong().size(17.0));
                    scheme_badge(
                        ui,
                        BadgeScheme::Status,
                        if report.score >= 70.0 { "Good" } else { "At-Risk" },
                    );
                    ui.label(format!("{}%", format_number(report.score)));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        download = ui.button("Download").clicked();
                    });
                });
                for (title, body) in [
                    ("Strengths", &report.strengths),
                    ("Areas to Improve", &report.weak_areas),
                    ("Improvement Plan", &report.improvement_plan),
                    ("Motivation", &report.motivational_message),
                ] {
                    ui.add_space(6.0);
                    ui.label(RichText::new(title).strong());
                    ui.label(body);
                }
            });
            if download {
                if let Some(n) = save_text(
                    env.exports_dir,
                    &export_file_name("report", &report.student_name),
                    &report_text(report),
                ) {
                    self.notice = Some(n);
                }
            }
        }
        event
    }
}

pub struct MaterialsPage {
    stager: FileStager,
    accept: AcceptFilter,
    file: Option<StagedFile>,
    pending: Option<Pending<Value>>,
    response: Option<Value>,
    notice: Option<Notice>,
}

impl Default for MaterialsPage {
    fn default() -> Self {
        Self {
            stager: FileStager::new(),
            accept: AcceptFilter::parse(".txt,.pdf,.docx"),
            file: None,
            pending: None,
            response: None,
            notice: None,
        }
    }
}

impl MaterialsPage {
    /// The stager forwards anything; this page only keeps accepted types.
    fn select(&mut self, intent: StagerIntent) {
        match intent {
            StagerIntent::Select(file) if !self.accept.matches(&file) => {
                self.notice = Some(Notice::Error(
                    "Please select a valid text, PDF, or DOCX file".into(),
                ));
            }
            StagerIntent::Select(file) => {
                self.notice = Some(Notice::Success("File selected".into()));
                self.file = Some(file);
            }
            StagerIntent::Clear => apply_intent(&mut self.file, StagerIntent::Clear),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, env: &PageEnv) -> Option<PageEvent> {
        let mut event = None;
        if let Some(result) = take_ready(&mut self.pending) {
            match result {
                Ok(value) => {
                    self.notice = Some(Notice::Success("Material uploaded successfully!".into()));
                    event = self
                        .file
                        .as_ref()
                        .map(|f| PageEvent::MaterialUploaded(f.name.clone()));
                    self.response = Some(value);
                }
                Err(e) => {
                    log::warn!("material upload failed: {e}");
                    self.notice = Some(Notice::Error(e.to_string()));
                }
            }
        }

        page_header(
            ui,
            "Teaching Materials",
            "Upload notes or handouts (.txt, .pdf, .docx) for analysis",
        );

        card(ui, |ui| {
            if let Some(intent) = file_stager(
                ui,
                &mut self.stager,
                &self.accept,
                self.file.as_ref(),
                "TXT, PDF or DOCX",
            ) {
                self.select(intent);
            }
            ui.add_space(8.0);
            let idle = self.pending.is_none();
            if ui.add_enabled(idle, egui::Button::new("Upload")).clicked() {
                match &self.file {
                    None => self.notice = Some(Notice::Error("Please select a file first".into())),
                    Some(file) => {
                        let client = env.client.clone();
                        let file = file.clone();
                        self.notice = None;
                        self.pending = Some(spawn_request(env.ctx, async move {
                            client.upload_text_material(&file).await
                        }));
                    }
                }
            }
            if !idle {
                busy(ui, "Uploading...");
            }
            if let Some(n) = &self.notice {
                n.show(ui);
            }
        });

        if let Some(value) = &self.response {
            ui.add_space(12.0);
            card(ui, |ui| {
                ui.label(RichText::new("Response").strong());
                let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                ScrollArea::vertical()
                    .max_height(320.0)
                    .id_source("material_response")
                    .show(ui, |ui| {
                        ui.label(RichText::new(pretty).monospace());
                    });
            });
        }
        event
    }
}
