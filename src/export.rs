//! Plain-text exports of generated assessments and feedback reports.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::payloads::{Assessment, FeedbackReport};
use crate::table::format_number;

pub fn assessment_text(a: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ASSESSMENT: {} — {}", a.subject, a.unit);
    let _ = writeln!(out, "Difficulty: {}", a.difficulty.to_uppercase());
    let _ = writeln!(out, "{}\n", "=".repeat(60));

    let _ = writeln!(
        out,
        "SECTION A: MULTIPLE CHOICE QUESTIONS\n{}\n",
        "─".repeat(40)
    );
    for (i, q) in a.mcqs.iter().enumerate() {
        let _ = writeln!(out, "Q{}. {} [{}]", i + 1, q.question, q.bloom_level);
        for (j, opt) in q.options.iter().enumerate() {
            let _ = writeln!(out, "   {}) {}", option_letter(j), opt);
        }
        let _ = writeln!(out, "   Answer: {}\n", q.answer);
    }

    let _ = writeln!(
        out,
        "\nSECTION B: SHORT ANSWER QUESTIONS\n{}\n",
        "─".repeat(40)
    );
    for (i, q) in a.short_answer.iter().enumerate() {
        let _ = writeln!(
            out,
            "Q{}. {} [{}] [{} marks]\n",
            i + 1,
            q.question,
            q.bloom_level,
            q.marks
        );
    }
    out
}

pub fn report_text(r: &FeedbackReport) -> String {
    format!(
        "STUDENT REPORT\n{}\nStudent: {}\nScore: {}%\n\n\
STRENGTHS\n{}\n\nAREAS TO IMPROVE\n{}\n\n\
IMPROVEMENT PLAN\n{}\n\nMOTIVATION\n{}\n",
        "=".repeat(50),
        r.student_name,
        format_number(r.score),
        r.strengths,
        r.weak_areas,
        r.improvement_plan,
        r.motivational_message
    )
}

/// A, B, C... for option lists.
pub fn option_letter(idx: usize) -> char {
    char::from_u32('A' as u32 + idx as u32).unwrap_or('?')
}

const UNSAFE_IN_FILE_NAMES: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `prefix_<subject>.txt`. Every whitespace run becomes one `_`, and so does
/// any character a file name cannot hold.
pub fn export_file_name(prefix: &str, subject: &str) -> String {
    let mut name = format!("{prefix}_");
    let mut in_space = false;
    for c in subject.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if UNSAFE_IN_FILE_NAMES.contains(&c) || c.is_control() {
            name.push('_');
        } else {
            name.push(c);
        }
    }
    name.push_str(".txt");
    name
}

pub fn write_export(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::{MultipleChoice, ShortAnswer};

    fn sample() -> Assessment {
        Assessment {
            subject: "Data Structures".into(),
            unit: "Trees".into(),
            difficulty: "medium".into(),
            mcqs: vec![MultipleChoice {
                question: "Which traversal gives sorted order?".into(),
                options: vec!["Pre-order".into(), "In-order".into()],
                answer: "In-order".into(),
                bloom_level: "Remembering".into(),
            }],
            short_answer: vec![ShortAnswer {
                question: "Explain BST deletion.".into(),
                bloom_level: "Applying".into(),
                marks: 5,
            }],
        }
    }

    #[test]
    fn assessment_export_layout() {
        let text = assessment_text(&sample());
        let expected = format!(
            "ASSESSMENT: Data Structures — Trees\nDifficulty: MEDIUM\n{}\n\n\
SECTION A: MULTIPLE CHOICE QUESTIONS\n{}\n\n\
Q1. Which traversal gives sorted order? [Remembering]\n   A) Pre-order\n   B) In-order\n   Answer: In-order\n\n\
\nSECTION B: SHORT ANSWER QUESTIONS\n{}\n\n\
Q1. Explain BST deletion. [Applying] [5 marks]\n\n",
            "=".repeat(60),
            "─".repeat(40),
            "─".repeat(40)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn report_export_layout() {
        let report = FeedbackReport {
            student_name: "Rahul Sharma".into(),
            score: 68.0,
            strengths: "Logic".into(),
            weak_areas: "Graphs".into(),
            improvement_plan: "1. Practice".into(),
            motivational_message: "Keep going".into(),
        };
        let text = report_text(&report);
        assert!(text.starts_with(&format!("STUDENT REPORT\n{}\n", "=".repeat(50))));
        assert!(text.contains("Student: Rahul Sharma\nScore: 68%\n\n"));
        assert!(text.ends_with("MOTIVATION\nKeep going\n"));
    }

    #[test]
    fn file_names_collapse_whitespace_runs() {
        assert_eq!(
            export_file_name("assessment", "Data   Structures"),
            "assessment_Data_Structures.txt"
        );
        assert_eq!(export_file_name("report", "Rahul Sharma"), "report_Rahul_Sharma.txt");
        assert_eq!(export_file_name("report", "Solo"), "report_Solo.txt");
    }

    #[test]
    fn file_names_never_carry_path_separators() {
        assert_eq!(
            export_file_name("assessment", "AI/ML Basics"),
            "assessment_AI_ML_Basics.txt"
        );
        assert_eq!(
            export_file_name("report", r#"a\b:c*d?e"f<g>h|i"#),
            "report_a_b_c_d_e_f_g_h_i.txt"
        );

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let name = export_file_name("assessment", "AI/ML Basics");
        let path = write_export(&target, &name, "quiz").unwrap();
        assert_eq!(path.parent(), Some(target.as_path()));
        assert_eq!(fs::read_to_string(path).unwrap(), "quiz");
    }

    #[test]
    fn option_letters() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
    }

    #[test]
    fn write_export_creates_the_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_export(&target, "report_x.txt", "hello").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
