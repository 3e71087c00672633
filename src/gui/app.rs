use chrono::{Local, Timelike};
use eframe::{
    egui::{
        self, menu, scroll_area::ScrollBarVisibility, Align, CentralPanel, Context, Layout,
        RichText, ScrollArea, TopBottomPanel, Ui,
    },
    App, CreationContext,
};
use std::path::PathBuf;

use super::pages::{
    AssessmentPage, MarksPage, MaterialsPage, PageEnv, PageEvent, ReportsPage, SyllabusPage,
};
use super::widgets::{card, stat_card, Notice};
use crate::api::{ApiClient, ApiResult};
use crate::payloads::{AuthResponse, MarksAnalysis};
use crate::session::{Session, SessionStore};
use crate::settings::{save_settings, Settings};
use crate::stats::{dashboard_cards, greeting, relative_time, Accent, Activity};
use crate::table::format_number;
use crate::tasks::{self, Pending};
use crate::theme::{
    apply_theme, ensure_theme_files, load_presets, load_theme, save_theme,
    toggled_preset, ThemeConfig,
};

const MAX_ACTIVITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Marks,
    LearningGap,
    Assessment,
    Reports,
    Materials,
    Settings,
}

impl Page {
    const ALL: [Page; 7] = [
        Page::Dashboard,
        Page::Marks,
        Page::LearningGap,
        Page::Assessment,
        Page::Reports,
        Page::Materials,
        Page::Settings,
    ];

    fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Marks => "Marks Analysis",
            Page::LearningGap => "Learning Gap",
            Page::Assessment => "Assessment",
            Page::Reports => "Reports",
            Page::Materials => "Materials",
            Page::Settings => "Settings",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Marks => "marks",
            Page::LearningGap => "learning_gap",
            Page::Assessment => "assessment",
            Page::Reports => "reports",
            Page::Materials => "materials",
            Page::Settings => "settings",
        }
    }

    fn from_key(key: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// What the dashboard knows about this session's work.
#[derive(Debug, Default)]
struct Timeline {
    activity: Vec<Activity>,
    last_marks: Option<MarksAnalysis>,
    assessments_created: usize,
}

impl Timeline {
    fn record(&mut self, event: PageEvent) {
        let entry = match event {
            PageEvent::MarksAnalyzed(analysis) => {
                let entry = Activity::now(
                    "Analyzed marks",
                    format!(
                        "{} students, Avg: {}%",
                        analysis.students.len(),
                        format_number(analysis.average_score)
                    ),
                    Accent::Blue,
                );
                self.last_marks = Some(analysis);
                entry
            }
            PageEvent::SyllabusAnalyzed { file, topics } => {
                Activity::now("Syllabus analyzed", format!("{file}, {topics} topics"), Accent::Cyan)
            }
            PageEvent::AssessmentGenerated { subject, unit } => {
                self.assessments_created += 1;
                Activity::now("Generated assessment", format!("{subject} — {unit}"), Accent::Purple)
            }
            PageEvent::ReportGenerated { student, score } => Activity::now(
                "Feedback generated",
                format!("Student: {student} — {}%", format_number(score)),
                Accent::Emerald,
            ),
            PageEvent::MaterialUploaded(name) => {
                Activity::now("Material uploaded", name, Accent::Amber)
            }
        };
        log::info!("{}: {}", entry.action, entry.detail);
        self.activity.insert(0, entry);
        self.activity.truncate(MAX_ACTIVITY);
    }

    fn insight(&self) -> String {
        match self.last_marks.as_ref().and_then(|m| m.weak_topics.first()) {
            Some(topic) => format!(
                "Based on recent analysis, {topic} shows the highest learning gap. \
Consider a revision session or targeted assessment before the next exam."
            ),
            None => "Analyze a marks sheet to see which topic needs attention first.".to_string(),
        }
    }
}

#[derive(Default)]
struct LoginForm {
    register: bool,
    name: String,
    email: String,
    password: String,
    pending: Option<(String, Option<String>, Pending<AuthResponse>)>,
    notice: Option<Notice>,
}

impl LoginForm {
    fn is_complete(&self) -> bool {
        let name_ok = !self.register || !self.name.trim().is_empty();
        name_ok && !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

pub struct MentorApp {
    settings: Settings,
    stored_url: String,
    base_path: PathBuf,
    theme: ThemeConfig,
    presets: Vec<ThemeConfig>,
    store: SessionStore,
    session: Option<Session>,
    client: Option<ApiClient>,
    page: Page,
    login: LoginForm,
    marks: MarksPage,
    syllabus: SyllabusPage,
    assessment: AssessmentPage,
    reports: ReportsPage,
    materials: MaterialsPage,
    timeline: Timeline,
    status: Option<Notice>,
}

impl MentorApp {
    pub fn new(
        cc: &CreationContext<'_>,
        base_path: PathBuf,
        settings: Settings,
        stored_url: String,
    ) -> Self {
        if let Err(e) = ensure_theme_files(&base_path) {
            log::warn!(target: "theme", "could not write theme files: {e}");
        }
        let presets = load_presets(&base_path);
        let theme = load_theme(&base_path, settings.ui.last_theme.as_deref());
        apply_theme(&theme, &cc.egui_ctx);

        let store = SessionStore::new(&base_path);
        let session = store.load().unwrap_or_else(|e| {
            log::warn!(target: "session", "could not read saved session: {e}");
            None
        });
        let page = settings
            .ui
            .last_page
            .as_deref()
            .and_then(Page::from_key)
            .unwrap_or(Page::Dashboard);
        let login = LoginForm {
            email: settings.last_email.clone(),
            ..LoginForm::default()
        };

        let mut app = Self {
            settings,
            stored_url,
            base_path,
            theme,
            presets,
            store,
            session,
            client: None,
            page,
            login,
            marks: MarksPage::default(),
            syllabus: SyllabusPage::default(),
            assessment: AssessmentPage::default(),
            reports: ReportsPage::default(),
            materials: MaterialsPage::default(),
            timeline: Timeline::default(),
            status: None,
        };
        app.rebuild_client();
        app
    }

    fn rebuild_client(&mut self) {
        let token = self.session.as_ref().map(|s| s.token.clone());
        self.client = match ApiClient::from_config(&self.settings.api) {
            Ok(client) => Some(client.with_token(token)),
            Err(e) => {
                log::error!(target: "api", "could not build HTTP client: {e}");
                self.status = Some(Notice::Error(format!("HTTP client unavailable: {e}")));
                None
            }
        };
    }

    /// Writes settings to disk. A `--api-url` override is left out until the
    /// settings page saves it explicitly.
    fn save_settings(&mut self) {
        let mut on_disk = self.settings.clone();
        on_disk.api.base_url = self.stored_url.clone();
        if let Err(e) = save_settings(&on_disk, &self.base_path) {
            log::error!(target: "settings", "could not save settings: {e}");
            self.status = Some(Notice::Error(format!("Could not save settings: {e}")));
        }
    }

    fn switch_theme(&mut self, name: &str, ctx: &Context) {
        self.theme = load_theme(&self.base_path, Some(name));
        apply_theme(&self.theme, ctx);
        self.settings.ui.last_theme = Some(self.theme.name.clone());
        if let Err(e) = save_theme(&self.base_path, &self.theme) {
            log::warn!(target: "theme", "could not save theme: {e}");
        }
        self.save_settings();
    }

    fn open_page(&mut self, page: Page, ctx: &Context) {
        if self.page == page {
            return;
        }
        self.page = page;
        self.settings.ui.last_page = Some(page.key().to_string());
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.ui.window_size = Some((rect.width(), rect.height()));
        }
        self.save_settings();
    }

    fn sign_in(&mut self, session: Session, greeting: &str) {
        if let Err(e) = self.store.save(&session) {
            log::warn!(target: "session", "could not save session: {e}");
        }
        log::info!(target: "session", "signed in as {}", session.user.email);
        self.settings.last_email = session.user.email.clone();
        self.save_settings();
        self.status = Some(Notice::Success(greeting.to_string()));
        self.session = Some(session);
        self.login.password.clear();
        self.page = Page::Dashboard;
        self.rebuild_client();
    }

    fn sign_out(&mut self) {
        if let Err(e) = self.store.clear() {
            log::warn!(target: "session", "could not remove session file: {e}");
        }
        log::info!(target: "session", "signed out");
        self.session = None;
        self.marks = MarksPage::default();
        self.syllabus = SyllabusPage::default();
        self.assessment = AssessmentPage::default();
        self.reports = ReportsPage::default();
        self.materials = MaterialsPage::default();
        self.timeline = Timeline::default();
        self.status = None;
        self.rebuild_client();
    }

    fn submit_login(&mut self, ctx: &Context) {
        if !self.login.is_complete() {
            self.login.notice = Some(Notice::Error("Fill all fields.".into()));
            return;
        }
        let Some(client) = self.client.clone() else {
            self.sign_in(
                Session::demo(self.login.email.trim(), None),
                "Welcome to MentorAI demo!",
            );
            return;
        };
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        let name = self
            .login
            .register
            .then(|| self.login.name.trim().to_string());

        let (req_email, req_name) = (email.clone(), name.clone());
        let fut = async move {
            match req_name {
                Some(name) => client.register(&name, &req_email, &password).await,
                None => client.login(&req_email, &password).await,
            }
        };
        let repaint = ctx.clone();
        let pending = tasks::spawn(fut, move || repaint.request_repaint());
        self.login.notice = None;
        self.login.pending = Some((email, name, pending));
    }

    fn poll_login(&mut self) {
        let Some(result) = self
            .login
            .pending
            .as_ref()
            .and_then(|(_, _, pending)| pending.poll())
        else {
            return;
        };
        let Some((email, name, _)) = self.login.pending.take() else {
            return;
        };
        self.finish_login(result, &email, name.as_deref());
    }

    fn finish_login(&mut self, result: ApiResult<AuthResponse>, email: &str, name: Option<&str>) {
        match result {
            Ok(resp) => {
                let welcome = if name.is_some() {
                    "Account created successfully!"
                } else {
                    "Welcome back!"
                };
                self.sign_in(Session::from_auth(resp, email, name), welcome);
            }
            Err(e) => {
                log::warn!(target: "session", "auth failed, using demo mode: {e}");
                self.sign_in(
                    Session::demo(email, name),
                    &format!("{e}. Signed in with a demo session."),
                );
            }
        }
    }

    fn render_login(&mut self, ctx: &Context, ui: &mut Ui) {
        self.poll_login();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.12);
            ui.set_max_width(380.0);
            card(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("MentorAI").size(28.0).strong());
                    ui.label(RichText::new("AI-powered teaching intelligence").weak());
                });
                ui.add_space(12.0);

                if self.login.register {
                    ui.label("Full name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.login.name)
                            .hint_text("Dr. Priya Sharma")
                            .desired_width(f32::INFINITY),
                    );
                }
                ui.label("Email");
                ui.add(
                    egui::TextEdit::singleline(&mut self.login.email)
                        .hint_text("teacher@school.edu")
                        .desired_width(f32::INFINITY),
                );
                ui.label("Password");
                let pw = ui.add(
                    egui::TextEdit::singleline(&mut self.login.password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                let entered = pw.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(10.0);
                let idle = self.login.pending.is_none();
                let label = if self.login.register {
                    "Create Account"
                } else {
                    "Sign In"
                };
                let clicked = ui
                    .add_enabled(
                        idle,
                        egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0)),
                    )
                    .clicked();
                if idle && (clicked || entered) {
                    self.submit_login(ctx);
                }
                if !idle {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label("Signing in...");
                    });
                }
                if let Some(n) = &self.login.notice {
                    n.show(ui);
                }

                ui.add_space(6.0);
                let toggle = if self.login.register {
                    "Already have an account? Sign in"
                } else {
                    "Don't have an account? Register"
                };
                if ui.link(toggle).clicked() {
                    self.login.register = !self.login.register;
                    self.login.notice = None;
                }
                ui.separator();
                if ui
                    .add_enabled(
                        idle,
                        egui::Button::new("Try Demo")
                            .min_size(egui::vec2(ui.available_width(), 28.0)),
                    )
                    .clicked()
                {
                    self.sign_in(Session::demo_teacher(), "Welcome to MentorAI demo!");
                }
            });
        });
    }

    fn render_menu_bar(&mut self, ctx: &Context, ui: &mut Ui) {
        menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                ui.label(format!("Exports: {}", self.settings.exports_dir().display()));
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let preset_names: Vec<String> =
                    self.presets.iter().map(|p| p.name.clone()).collect();
                for name in preset_names {
                    let selected = self.theme.name == name;
                    if ui.selectable_label(selected, name.clone()).clicked() {
                        self.switch_theme(&name, ctx);
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui.button("Toggle dark / light").clicked() {
                    let next = toggled_preset(&self.theme);
                    self.switch_theme(next, ctx);
                    ui.close_menu();
                }
            });

            ui.menu_button("Account", |ui| {
                if let Some(session) = &self.session {
                    ui.label(RichText::new(&session.user.name).strong());
                    ui.label(RichText::new(&session.user.email).weak());
                    if session.demo {
                        ui.label(RichText::new("Demo session").small());
                    }
                }
                ui.separator();
                if ui.button("Sign out").clicked() {
                    self.sign_out();
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                ui.label(format!("MentorAI Desk {}", env!("CARGO_PKG_VERSION")));
                ui.label(format!("Base path: {}", self.base_path.display()));
                ui.label(format!("Backend: {}", self.settings.api.base_url));
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if self.settings.api.offline {
                    ui.label(RichText::new("offline").small().weak());
                }
                if let Some(session) = &self.session {
                    ui.label(RichText::new(session.user.first_name()).weak());
                }
            });
        });
    }

    fn render_page_bar(&mut self, ctx: &Context, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            for page in Page::ALL {
                if ui.selectable_label(self.page == page, page.title()).clicked() {
                    self.open_page(page, ctx);
                }
            }
        });
    }

    fn render_dashboard(&mut self, ctx: &Context, ui: &mut Ui) {
        let first_name = self
            .session
            .as_ref()
            .map(|s| s.user.first_name().to_string())
            .unwrap_or_else(|| "Teacher".to_string());

        card(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "Good {}, {first_name} 👋",
                            greeting(Local::now().hour())
                        ))
                        .size(24.0)
                        .strong(),
                    );
                    ui.label(
                        RichText::new("Here's your teaching intelligence overview for today.")
                            .weak(),
                    );
                });
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Quick Assessment").clicked() {
                        self.open_page(Page::Assessment, ctx);
                    }
                });
            });
        });

        ui.add_space(12.0);
        let cards = dashboard_cards(
            self.timeline.last_marks.as_ref(),
            self.timeline.assessments_created,
        );
        ui.columns(cards.len(), |cols| {
            for (col, stat) in cols.iter_mut().zip(&cards) {
                stat_card(col, stat);
            }
        });

        ui.add_space(12.0);
        let mut target = None;
        ui.columns(2, |cols| {
            cols[0].label(RichText::new("Quick Actions").strong());
            for (page, desc) in [
                (Page::Marks, "Upload CSV and get AI insights"),
                (Page::Assessment, "Create AI-powered quizzes"),
                (Page::LearningGap, "Upload PDF syllabus for insights"),
                (Page::Reports, "Generate personalized reports"),
                (Page::Materials, "Share notes and handouts"),
            ] {
                card(&mut cols[0], |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(page.title()).strong());
                            ui.label(RichText::new(desc).small().weak());
                        });
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.button("→").clicked() {
                                target = Some(page);
                            }
                        });
                    });
                });
                cols[0].add_space(4.0);
            }

            cols[1].label(RichText::new("Recent Activity").strong());
            card(&mut cols[1], |ui| {
                if self.timeline.activity.is_empty() {
                    ui.label(RichText::new("No activity yet this session.").weak());
                }
                let now = Local::now();
                for entry in &self.timeline.activity {
                    ui.horizontal(|ui| {
                        ui.colored_label(self.theme.palette.accent(entry.accent), "●");
                        ui.vertical(|ui| {
                            ui.label(RichText::new(&entry.action).strong());
                            ui.label(RichText::new(&entry.detail).small().weak());
                        });
                        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                            ui.label(RichText::new(relative_time(now, entry.at)).small().weak());
                        });
                    });
                }
            });
        });
        if let Some(page) = target {
            self.open_page(page, ctx);
        }

        ui.add_space(12.0);
        card(ui, |ui| {
            ui.label(
                RichText::new("AI Insight")
                    .strong()
                    .color(self.theme.palette.accent(Accent::Purple)),
            );
            ui.label(self.timeline.insight());
        });
    }

    fn render_settings(&mut self, ctx: &Context, ui: &mut Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);

        card(ui, |ui| {
            ui.label(RichText::new("Backend").strong());
            egui::Grid::new("settings_api")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("API URL");
                    ui.text_edit_singleline(&mut self.settings.api.base_url);
                    ui.end_row();
                    ui.label("Timeout (seconds)");
                    ui.add(
                        egui::DragValue::new(&mut self.settings.api.timeout_secs)
                            .clamp_range(1..=600),
                    );
                    ui.end_row();
                    ui.label("Demo data");
                    ui.checkbox(
                        &mut self.settings.api.demo_fallback,
                        "Show demo data when a request fails",
                    );
                    ui.end_row();
                });
            if self.settings.api.offline {
                ui.label(RichText::new("Offline mode is on for this run (--offline).").weak());
            }
        });

        ui.add_space(8.0);
        card(ui, |ui| {
            ui.label(RichText::new("Appearance").strong());
            let current = self.theme.name.clone();
            let mut chosen = None;
            egui::ComboBox::from_id_source("settings_theme")
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    for preset in &self.presets {
                        if ui.selectable_label(preset.name == current, &preset.name).clicked() {
                            chosen = Some(preset.name.clone());
                        }
                    }
                });
            if let Some(name) = chosen {
                self.switch_theme(&name, ctx);
            }
        });

        ui.add_space(8.0);
        card(ui, |ui| {
            ui.label(RichText::new("Storage").strong());
            ui.label(format!("Base path: {}", self.base_path.display()));
            ui.label(format!("Exports: {}", self.settings.exports_dir().display()));
            ui.label(format!("Session file: {}", self.store.path().display()));
        });

        ui.add_space(8.0);
        if ui.button("Save settings").clicked() {
            self.stored_url = self.settings.api.base_url.clone();
            self.save_settings();
            self.rebuild_client();
            if self.client.is_some() {
                self.status = Some(Notice::Success("Settings saved".into()));
            }
        }
    }

    fn render_page(&mut self, ctx: &Context, ui: &mut Ui) {
        match self.page {
            Page::Dashboard => return self.render_dashboard(ctx, ui),
            Page::Settings => return self.render_settings(ctx, ui),
            _ => {}
        }

        let exports_dir = self.settings.exports_dir();
        let Some(client) = &self.client else {
            Notice::Error(
                "The backend client could not be created. Check the API URL in Settings.".into(),
            )
            .show(ui);
            return;
        };
        let env = PageEnv {
            ctx,
            client,
            demo_fallback: self.settings.api.demo_fallback,
            exports_dir: &exports_dir,
        };
        let event = match self.page {
            Page::Marks => self.marks.show(ui, &env),
            Page::LearningGap => self.syllabus.show(ui, &env),
            Page::Assessment => self.assessment.show(ui, &env),
            Page::Reports => self.reports.show(ui, &env),
            Page::Materials => self.materials.show(ui, &env),
            Page::Dashboard | Page::Settings => None,
        };
        if let Some(event) = event {
            self.timeline.record(event);
        }
    }
}

impl App for MentorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        apply_theme(&self.theme, ctx);

        if self.session.is_none() {
            CentralPanel::default().show(ctx, |ui| self.render_login(ctx, ui));
            return;
        }

        TopBottomPanel::top("menu_bar").show(ctx, |ui| self.render_menu_bar(ctx, ui));
        TopBottomPanel::top("pages").show(ctx, |ui| self.render_page_bar(ctx, ui));

        if let Some(status) = self.status.clone() {
            TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    status.show(ui);
                    if ui.small_button("✕").clicked() {
                        self.status = None;
                    }
                });
            });
        }

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false; 2])
                .scroll_bar_visibility(ScrollBarVisibility::VisibleWhenNeeded)
                .show(ui, |ui| self.render_page(ctx, ui));
        });
    }
}

pub fn launch_gui(
    base_path: PathBuf,
    settings: Settings,
    stored_url: String,
) -> eframe::Result<()> {
    let size = settings.ui.window_size.unwrap_or((1180.0, 780.0));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MentorAI")
            .with_inner_size([size.0, size.1])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "MentorAI",
        native_options,
        Box::new(move |cc| Box::new(MentorApp::new(cc, base_path, settings, stored_url))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_keys_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_key(page.key()), Some(page));
        }
        assert_eq!(Page::from_key("engagement"), None);
    }

    #[test]
    fn timeline_keeps_newest_first_and_caps_length() {
        let mut timeline = Timeline::default();
        for i in 0..(MAX_ACTIVITY + 3) {
            timeline.record(PageEvent::MaterialUploaded(format!("notes_{i}.txt")));
        }
        assert_eq!(timeline.activity.len(), MAX_ACTIVITY);
        assert_eq!(timeline.activity[0].detail, format!("notes_{}.txt", MAX_ACTIVITY + 2));
    }

    #[test]
    fn marks_and_assessments_feed_the_dashboard() {
        let mut timeline = Timeline::default();
        assert!(timeline.insight().starts_with("Analyze a marks sheet"));

        timeline.record(PageEvent::MarksAnalyzed(crate::demo::marks_analysis()));
        timeline.record(PageEvent::AssessmentGenerated {
            subject: "Data Structures".into(),
            unit: "Trees".into(),
        });
        assert_eq!(timeline.assessments_created, 1);
        assert_eq!(timeline.activity[1].detail, "10 students, Avg: 72%");
        assert!(timeline.insight().contains("Unit 2 — Recursion"));
    }

    #[test]
    fn login_form_requires_name_only_when_registering() {
        let mut form = LoginForm {
            email: "priya@mentorai.edu".into(),
            password: "secret".into(),
            ..LoginForm::default()
        };
        assert!(form.is_complete());
        form.register = true;
        assert!(!form.is_complete());
        form.name = "Priya".into();
        assert!(form.is_complete());
        form.password.clear();
        assert!(!form.is_complete());
    }
}
