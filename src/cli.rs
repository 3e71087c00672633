use std::io::{self, Write};
use std::path::{Path, PathBuf};

use reqwest::StatusCode;

use crate::api::{ApiClient, ApiError};
use crate::demo::{self, settle, Outcome};
use crate::export::{assessment_text, export_file_name, report_text, write_export};
use crate::payloads::{AssessmentRequest, Difficulty, FeedbackRequest, SyllabusAnalysis};
use crate::session::{Session, SessionStore};
use crate::settings::{save_settings, Settings};
use crate::stager::{AcceptFilter, StagedFile};
use crate::stats::class_health;
use crate::table::{format_number, truncate_for_table, Record, SortableTable};
use crate::tasks::block_on;

const MARKS_ACCEPT: &str = ".csv";
const SYLLABUS_ACCEPT: &str = ".pdf";
const MATERIAL_ACCEPT: &str = ".txt,.pdf,.docx";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Login,
    Register,
    Demo,
    Logout,
    WhoAmI,
    Marks(PathBuf),
    Sort(String),
    Syllabus(PathBuf),
    Quiz,
    Feedback,
    Material(PathBuf),
    Help,
    Exit,
    Empty,
    Usage(&'static str),
    Unknown(String),
}

fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (input, ""),
    };
    let path_arg = |usage: &'static str, make: fn(PathBuf) -> Command| {
        if rest.is_empty() {
            Command::Usage(usage)
        } else {
            make(PathBuf::from(rest))
        }
    };

    match head.to_lowercase().as_str() {
        "" => Command::Empty,
        "login" => Command::Login,
        "register" => Command::Register,
        "demo" => Command::Demo,
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "marks" => path_arg("marks <file.csv>", Command::Marks),
        "syllabus" => path_arg("syllabus <file.pdf>", Command::Syllabus),
        "material" => path_arg("material <file.txt|.pdf|.docx>", Command::Material),
        "sort" if rest.is_empty() => Command::Usage("sort <column key>"),
        "sort" => Command::Sort(rest.to_string()),
        "quiz" => Command::Quiz,
        "feedback" => Command::Feedback,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        _ => Command::Unknown(input.to_string()),
    }
}

fn needs_session(cmd: &Command) -> bool {
    matches!(
        cmd,
        Command::Marks(_)
            | Command::Sort(_)
            | Command::Syllabus(_)
            | Command::Quiz
            | Command::Feedback
            | Command::Material(_)
    )
}

/// Stages a file from the command line the way the drop zone would, then
/// checks it against the page's accept list.
fn stage_path(path: &Path, accept: &AcceptFilter) -> Result<StagedFile, String> {
    let file = StagedFile::from_path(path).map_err(|e| format!("Cannot open {}: {e}", path.display()))?;
    if !accept.matches(&file) {
        return Err(format!(
            "{} is not an accepted file ({})",
            file.name,
            accept.as_str()
        ));
    }
    Ok(file)
}

struct Console<'a> {
    settings: &'a mut Settings,
    base_path: &'a Path,
    store: SessionStore,
    session: Option<Session>,
    student_rows: Vec<Record>,
    student_table: SortableTable,
}

pub fn run_cli(settings: &mut Settings, base_path: &Path) {
    println!("MentorAI {} console", env!("CARGO_PKG_VERSION"));
    println!("Base path: {}", base_path.display());
    println!("Backend: {}", settings.api.base_url);
    if settings.api.offline {
        println!("Offline mode: every request uses demo data.");
    }

    let store = SessionStore::new(base_path);
    let session = match store.load() {
        Ok(s) => s,
        Err(e) => {
            log::warn!(target: "session", "could not read saved session: {e}");
            None
        }
    };

    let mut console = Console {
        settings,
        base_path,
        store,
        session,
        student_rows: Vec::new(),
        student_table: SortableTable::default(),
    };

    match &console.session {
        Some(s) => println!("Signed in as {} <{}>", s.user.name, s.user.email),
        None => println!("Not signed in. Use 'login', 'register' or 'demo'."),
    }
    println!("Type 'help' for commands, 'exit' to quit.\n");

    loop {
        print!("mentor> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                println!("Error reading input ({e}). Exiting.");
                break;
            }
        }

        let cmd = parse_command(&input);
        if needs_session(&cmd) && console.session.is_none() {
            println!("Sign in first ('login', 'register' or 'demo').\n");
            continue;
        }

        match cmd {
            Command::Exit => {
                println!("Goodbye");
                break;
            }
            Command::Empty => continue,
            Command::Help => print_help(),
            Command::Usage(usage) => println!("Usage: {usage}"),
            Command::Unknown(raw) => println!("Unknown command: {raw}. Type 'help'."),
            other => {
                if let Err(e) = console.dispatch(other) {
                    println!("Input error: {e}");
                }
            }
        }
        println!();
    }
}

fn print_help() {
    println!("Commands:");
    println!("  login | register | demo   sign in (demo uses a sample teacher)");
    println!("  logout | whoami");
    println!("  marks <file.csv>          analyze student marks");
    println!("  sort <key>                re-sort the last student table (name, score, grade, status)");
    println!("  syllabus <file.pdf>       find focus areas in a syllabus");
    println!("  quiz                      generate an assessment");
    println!("  feedback                  write a student report");
    println!("  material <file>           upload .txt, .pdf or .docx teaching material");
    println!("  exit");
}

impl Console<'_> {
    fn dispatch(&mut self, cmd: Command) -> io::Result<()> {
        match cmd {
            Command::Login => self.login(false)?,
            Command::Register => self.login(true)?,
            Command::Demo => self.sign_in(Session::demo_teacher()),
            Command::Logout => self.logout(),
            Command::WhoAmI => self.whoami(),
            Command::Marks(path) => self.marks(&path),
            Command::Sort(key) => self.sort(&key),
            Command::Syllabus(path) => self.syllabus(&path),
            Command::Quiz => self.quiz()?,
            Command::Feedback => self.feedback()?,
            Command::Material(path) => self.material(&path),
            _ => {}
        }
        Ok(())
    }

    fn client(&self) -> Result<ApiClient, ApiError> {
        let token = self.session.as_ref().map(|s| s.token.clone());
        Ok(ApiClient::from_config(&self.settings.api)?.with_token(token))
    }

    fn fallback(&self) -> bool {
        self.settings.api.demo_fallback
    }

    fn login(&mut self, register: bool) -> io::Result<()> {
        let name = if register {
            Some(prompt("Name", "")?)
        } else {
            None
        };
        let email = prompt("Email", &self.settings.last_email)?;
        let password = prompt("Password", "")?;
        if email.is_empty() || password.is_empty() || name.as_deref() == Some("") {
            println!("Fill all fields.");
            return Ok(());
        }

        let result = self.client().and_then(|client| {
            block_on(async {
                match &name {
                    Some(name) => client.register(name, &email, &password).await,
                    None => client.login(&email, &password).await,
                }
            })
        });

        let session = match result {
            Ok(resp) => Session::from_auth(resp, &email, name.as_deref()),
            Err(e) => {
                log::warn!(target: "session", "sign-in failed, continuing with a demo session: {e}");
                println!("Backend unavailable ({e}). Signed in with a demo session.");
                Session::demo(&email, name.as_deref())
            }
        };
        self.settings.last_email = email;
        if let Err(e) = save_settings(self.settings, self.base_path) {
            println!("Could not save settings: {e}");
        }
        self.sign_in(session);
        Ok(())
    }

    fn sign_in(&mut self, session: Session) {
        if let Err(e) = self.store.save(&session) {
            println!("Could not save session: {e}");
        }
        println!("Welcome, {}!", session.user.first_name());
        self.session = Some(session);
    }

    fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            println!("Could not remove session file: {e}");
        }
        self.session = None;
        self.student_rows.clear();
        self.student_table.reset_sort();
        println!("Signed out.");
    }

    /// Prints the signed-in user, refreshed from the backend for live sessions.
    fn whoami(&mut self) {
        let demo = match &self.session {
            Some(s) => s.demo,
            None => return println!("Not signed in."),
        };
        if !demo {
            self.refresh_profile();
        }
        if let Some(s) = &self.session {
            let role = s.user.role.as_deref().unwrap_or("teacher");
            let demo = if s.demo { " (demo)" } else { "" };
            println!("{} <{}> [{role}]{demo}", s.user.name, s.user.email);
        }
    }

    fn refresh_profile(&mut self) {
        let client = match self.client() {
            Ok(c) if c.is_offline() => return,
            Ok(c) => c,
            Err(e) => return log::warn!(target: "session", "could not build client: {e}"),
        };
        match block_on(async { client.profile().await }) {
            Ok(user) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                session.user = user;
                if let Err(e) = self.store.save(session) {
                    log::warn!(target: "session", "could not save session: {e}");
                }
            }
            Err(e) if session_expired(&e) => println!("Session expired. Run `login` again."),
            Err(e) => log::warn!(target: "session", "could not refresh profile: {e}"),
        }
    }

    fn marks(&mut self, path: &Path) {
        let file = match stage_path(path, &AcceptFilter::parse(MARKS_ACCEPT)) {
            Ok(f) => f,
            Err(msg) => return println!("{msg}"),
        };
        println!("Analyzing {} ({})...", file.name, file.size_label());
        let result = self
            .client()
            .and_then(|client| block_on(async { client.analyze_marks(&file).await }));
        let outcome = settle(result, self.fallback(), demo::marks_analysis);
        println!("{}", outcome.message("Analysis complete!"));
        let Some(data) = outcome.into_data() else {
            return;
        };

        let (health, _) = class_health(data.average_score);
        println!(
            "Class average: {}% ({health})",
            format_number(data.average_score)
        );
        println!("Weak topics: {}", join_or_none(&data.weak_topics));
        println!("At-risk students: {}", join_or_none(&data.risk_students));
        if !data.strategy.is_empty() {
            println!("\nTeaching strategy:\n{}", data.strategy);
        }

        self.student_rows = data.student_records();
        self.student_table.reset_sort();
        println!();
        print!("{}", self.student_table.render_text(&self.student_rows));
    }

    fn sort(&mut self, key: &str) {
        if !self.student_table.columns().iter().any(|c| c.key == key) {
            let keys: Vec<&str> = self
                .student_table
                .columns()
                .iter()
                .map(|c| c.key.as_str())
                .collect();
            println!("No column '{key}'. Columns: {}", keys.join(", "));
            return;
        }
        self.student_table.toggle_sort(key);
        print!("{}", self.student_table.render_text(&self.student_rows));
    }

    fn syllabus(&mut self, path: &Path) {
        let file = match stage_path(path, &AcceptFilter::parse(SYLLABUS_ACCEPT)) {
            Ok(f) => f,
            Err(msg) => return println!("{msg}"),
        };
        println!("Analyzing {} ({})...", file.name, file.size_label());
        let result = self
            .client()
            .and_then(|client| block_on(async { client.analyze_syllabus(&file).await }));
        let outcome = settle(result, self.fallback(), demo::syllabus_analysis);
        println!("{}", outcome.message("Syllabus analyzed!"));
        let Some(data) = outcome.into_data() else {
            return;
        };

        let table = SortableTable::new(SyllabusAnalysis::topic_columns());
        print!("{}", table.render_text(&data.topic_records()));

        let max = data.max_weight();
        if max > 0.0 {
            println!("\nTopic weightage:");
            for t in &data.topics {
                let width = ((t.weight / max) * 30.0).round() as usize;
                println!(
                    "  {:<18} {} {}%",
                    truncate_for_table(&t.name, 18),
                    "#".repeat(width),
                    format_number(t.weight)
                );
            }
        }

        if !data.focus_areas.is_empty() {
            println!("\nFocus areas:");
            for f in &data.focus_areas {
                println!("  [{}] {}: {}", f.priority, f.topic, f.reason);
            }
        }
    }

    fn quiz(&mut self) -> io::Result<()> {
        let subject = prompt("Subject", "")?;
        let unit = prompt("Unit / topic", "")?;
        if subject.is_empty() || unit.is_empty() {
            println!("Fill all fields.");
            return Ok(());
        }
        let difficulty = match prompt("Difficulty (easy/medium/hard)", "medium")?
            .to_lowercase()
            .as_str()
        {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        };
        let num_questions = prompt("Number of questions", "10")?.parse().unwrap_or(10);
        let req = AssessmentRequest {
            subject,
            unit,
            difficulty,
            num_questions,
        };

        println!("Generating...");
        let result = self
            .client()
            .and_then(|client| block_on(async { client.generate_assessment(&req).await }));
        let outcome = match settle(result, self.fallback(), || demo::assessment(&req)) {
            Outcome::Live(mut a) => {
                a.fill_from(&req);
                Outcome::Live(a)
            }
            other => other,
        };
        println!("{}", outcome.message("Assessment generated!"));
        let Some(assessment) = outcome.into_data() else {
            return Ok(());
        };

        let text = assessment_text(&assessment);
        println!("\n{text}");
        self.offer_export(&export_file_name("assessment", &assessment.subject), &text)
    }

    fn feedback(&mut self) -> io::Result<()> {
        let student_name = prompt("Student name", "")?;
        let score: Option<f64> = prompt("Score (%)", "")?.parse().ok();
        let (Some(score), false) = (score, student_name.is_empty()) else {
            println!("Fill all fields.");
            return Ok(());
        };
        let mut req = FeedbackRequest {
            student_name,
            score,
            weak_topics: Vec::new(),
        };
        for topic in prompt("Weak topics (comma separated)", "")?.split(',') {
            req.add_topic(topic);
        }

        println!("Generating...");
        let result = self
            .client()
            .and_then(|client| block_on(async { client.generate_feedback(&req).await }));
        let outcome = settle(result, self.fallback(), || demo::feedback_report(&req));
        println!("{}", outcome.message("Report generated!"));
        let Some(report) = outcome.into_data() else {
            return Ok(());
        };

        let text = report_text(&report);
        println!("\n{text}");
        self.offer_export(&export_file_name("report", &report.student_name), &text)
    }

    fn material(&mut self, path: &Path) {
        let file = match stage_path(path, &AcceptFilter::parse(MATERIAL_ACCEPT)) {
            Ok(f) => f,
            Err(_) => return println!("Please select a valid text, PDF, or DOCX file"),
        };
        println!("Uploading {} ({})...", file.name, file.size_label());
        let result = self
            .client()
            .and_then(|client| block_on(async { client.upload_text_material(&file).await }));
        match result {
            Ok(value) => {
                println!("Material uploaded!");
                match serde_json::to_string_pretty(&value) {
                    Ok(pretty) => println!("{pretty}"),
                    Err(_) => println!("{value}"),
                }
            }
            Err(e) => println!("Upload failed: {e}"),
        }
    }

    fn offer_export(&self, file_name: &str, text: &str) -> io::Result<()> {
        if !prompt("Save to exports? (y/n)", "n")?
            .to_lowercase()
            .starts_with('y')
        {
            return Ok(());
        }
        match write_export(&self.settings.exports_dir(), file_name, text) {
            Ok(path) => println!("Saved {}", path.display()),
            Err(e) => println!("Failed to save: {e}"),
        }
        Ok(())
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn prompt(field: &str, default_val: &str) -> io::Result<String> {
    if default_val.is_empty() {
        print!("{field}: ");
    } else {
        print!("{field} [{default_val}]: ");
    }
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        Ok(default_val.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn session_expired(err: &ApiError) -> bool {
    err.status() == Some(StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unauthorized_means_the_session_expired() {
        let expired = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            detail: "Invalid token".into(),
        };
        assert!(session_expired(&expired));
        let server = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "boom".into(),
        };
        assert!(!session_expired(&server));
        assert!(!session_expired(&ApiError::Offline));
    }

    #[test]
    fn commands_take_paths_with_spaces() {
        assert_eq!(
            parse_command("marks  My Class/term 1.csv "),
            Command::Marks(PathBuf::from("My Class/term 1.csv"))
        );
        assert_eq!(parse_command("SORT score"), Command::Sort("score".into()));
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command("quit"), Command::Exit);
    }

    #[test]
    fn missing_arguments_show_usage() {
        assert!(matches!(parse_command("marks"), Command::Usage(_)));
        assert!(matches!(parse_command("sort"), Command::Usage(_)));
        assert!(matches!(parse_command("dance"), Command::Unknown(_)));
    }

    #[test]
    fn analysis_commands_need_a_session() {
        assert!(needs_session(&Command::Quiz));
        assert!(needs_session(&Command::Sort("name".into())));
        assert!(!needs_session(&Command::Login));
        assert!(!needs_session(&Command::Help));
    }

    #[test]
    fn staging_checks_the_accept_list() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("marks.csv");
        let pdf = dir.path().join("notes.pdf");
        std::fs::write(&csv, "name,score\nRahul,85\n").unwrap();
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let accept = AcceptFilter::parse(MARKS_ACCEPT);
        let staged = stage_path(&csv, &accept).unwrap();
        assert_eq!(staged.name, "marks.csv");
        assert!(stage_path(&pdf, &accept).is_err());
        assert!(stage_path(&dir.path().join("gone.csv"), &accept).is_err());
    }

    #[test]
    fn empty_lists_read_as_none() {
        assert_eq!(join_or_none(&[]), "none");
        assert_eq!(join_or_none(&["a".into(), "b".into()]), "a, b");
    }
}
