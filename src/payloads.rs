use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::table::{BadgeScheme, ColumnSpec, Record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl User {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("Teacher")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarksAnalysis {
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub weak_topics: Vec<String>,
    #[serde(default)]
    pub risk_students: Vec<String>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub students: Vec<Map<String, Value>>,
}

impl MarksAnalysis {
    pub fn student_records(&self) -> Vec<Record> {
        self.students.iter().map(Record::from_json_object).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyllabusTopic {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub coverage: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FocusArea {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyllabusAnalysis {
    #[serde(default)]
    pub topics: Vec<SyllabusTopic>,
    #[serde(default)]
    pub focus_areas: Vec<FocusArea>,
}

impl SyllabusAnalysis {
    pub fn topic_columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("name", "Topic"),
            ColumnSpec::new("weight", "Weight (%)"),
            ColumnSpec::badge("coverage", "Coverage", BadgeScheme::Coverage),
        ]
    }

    pub fn topic_records(&self) -> Vec<Record> {
        self.topics
            .iter()
            .map(|t| {
                Record::new()
                    .with("name", t.name.as_str())
                    .with("weight", t.weight)
                    .with("coverage", t.coverage.as_str())
            })
            .collect()
    }

    pub fn max_weight(&self) -> f64 {
        self.topics.iter().map(|t| t.weight).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRequest {
    pub subject: String,
    pub unit: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

impl Default for AssessmentRequest {
    fn default() -> Self {
        Self {
            subject: String::new(),
            unit: String::new(),
            difficulty: Difficulty::Medium,
            num_questions: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipleChoice {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub bloom_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortAnswer {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub bloom_level: String,
    #[serde(default)]
    pub marks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub mcqs: Vec<MultipleChoice>,
    #[serde(default)]
    pub short_answer: Vec<ShortAnswer>,
}

impl Assessment {
    /// Backends do not always echo the request fields back.
    pub fn fill_from(&mut self, req: &AssessmentRequest) {
        if self.subject.is_empty() {
            self.subject = req.subject.clone();
        }
        if self.unit.is_empty() {
            self.unit = req.unit.clone();
        }
        if self.difficulty.is_empty() {
            self.difficulty = req.difficulty.as_str().to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackRequest {
    pub student_name: String,
    pub score: f64,
    pub weak_topics: Vec<String>,
}

impl FeedbackRequest {
    /// Appends a trimmed topic. Blank and duplicate topics are ignored.
    pub fn add_topic(&mut self, topic: &str) -> bool {
        let topic = topic.trim();
        if topic.is_empty() || self.weak_topics.iter().any(|t| t == topic) {
            return false;
        }
        self.weak_topics.push(topic.to_string());
        true
    }

    pub fn remove_topic(&mut self, idx: usize) {
        if idx < self.weak_topics.len() {
            self.weak_topics.remove(idx);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedbackReport {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weak_areas: String,
    #[serde(default)]
    pub improvement_plan: String,
    #[serde(default)]
    pub motivational_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;

    #[test]
    fn marks_analysis_tolerates_missing_fields() {
        let parsed: MarksAnalysis = serde_json::from_str(r#"{"average_score": 64.5}"#).unwrap();
        assert_eq!(parsed.average_score, 64.5);
        assert!(parsed.students.is_empty());
        assert!(parsed.strategy.is_empty());
    }

    #[test]
    fn students_become_records() {
        let parsed: MarksAnalysis = serde_json::from_str(
            r#"{"students":[{"name":"Rahul","score":85,"grade":"A","status":"Excellent"}]}"#,
        )
        .unwrap();
        let records = parsed.student_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("score"), &CellValue::Number(85.0));
    }

    #[test]
    fn weak_topics_skip_blanks_and_duplicates() {
        let mut req = FeedbackRequest {
            student_name: "Rahul".into(),
            score: 68.0,
            weak_topics: Vec::new(),
        };
        assert!(req.add_topic(" Graphs "));
        assert!(!req.add_topic("Graphs"));
        assert!(!req.add_topic("   "));
        assert!(req.add_topic("DP"));
        assert_eq!(req.weak_topics, vec!["Graphs", "DP"]);
        req.remove_topic(0);
        req.remove_topic(5);
        assert_eq!(req.weak_topics, vec!["DP"]);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let req = AssessmentRequest {
            subject: "Data Structures".into(),
            unit: "Trees".into(),
            difficulty: Difficulty::Hard,
            num_questions: 5,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["num_questions"], 5);
    }

    #[test]
    fn assessment_fills_in_request_fields() {
        let mut a: Assessment = serde_json::from_str(r#"{"mcqs": []}"#).unwrap();
        let req = AssessmentRequest {
            subject: "Networks".into(),
            unit: "TCP".into(),
            ..AssessmentRequest::default()
        };
        a.fill_from(&req);
        assert_eq!(a.subject, "Networks");
        assert_eq!(a.unit, "TCP");
        assert_eq!(a.difficulty, "medium");
    }

    #[test]
    fn syllabus_topics_use_coverage_badges() {
        let cols = SyllabusAnalysis::topic_columns();
        assert_eq!(
            cols[2].kind,
            crate::table::ColumnKind::Badge(BadgeScheme::Coverage)
        );
    }

    #[test]
    fn first_name_falls_back_to_teacher() {
        let user = User::default();
        assert_eq!(user.first_name(), "Teacher");
        let user = User {
            name: "Priya Sharma".into(),
            ..User::default()
        };
        assert_eq!(user.first_name(), "Priya");
    }
}
