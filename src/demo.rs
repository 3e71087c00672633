//! Sample payloads shown when the backend is unreachable and demo fallback is
//! switched on.

use serde_json::json;

use crate::api::{ApiError, ApiResult};

use crate::payloads::{
    Assessment, AssessmentRequest, FeedbackReport, FeedbackRequest, FocusArea, MarksAnalysis,
    MultipleChoice, ShortAnswer, SyllabusAnalysis, SyllabusTopic,
};
use crate::table::format_number;

/// What a page ends up showing once a request settles.
#[derive(Debug)]
pub enum Outcome<T> {
    Live(T),
    Demo { data: T, reason: String },
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn message(&self, success: &str) -> String {
        match self {
            Outcome::Live(_) => success.to_string(),
            Outcome::Demo { reason, .. } => format!("{reason}. Using demo data."),
            Outcome::Failed(reason) => reason.clone(),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Live(data) | Outcome::Demo { data, .. } => Some(data),
            Outcome::Failed(_) => None,
        }
    }
}

/// Offline mode always falls back, whatever the setting says.
pub fn settle<T>(result: ApiResult<T>, demo_fallback: bool, demo: impl FnOnce() -> T) -> Outcome<T> {
    match result {
        Ok(data) => Outcome::Live(data),
        Err(e) if demo_fallback || matches!(e, ApiError::Offline) => {
            log::warn!(target: "demo", "falling back to demo data: {e}");
            Outcome::Demo {
                data: demo(),
                reason: e.to_string(),
            }
        }
        Err(e) => {
            log::error!(target: "demo", "request failed: {e}");
            Outcome::Failed(e.to_string())
        }
    }
}

pub fn marks_analysis() -> MarksAnalysis {
    let students = [
        ("Rahul Sharma", 85, "A", "Excellent"),
        ("Priya Nair", 52, "D", "At-Risk"),
        ("Amit Kumar", 45, "F", "At-Risk"),
        ("Sneha Patil", 58, "D", "At-Risk"),
        ("Vikram Singh", 78, "B", "Good"),
        ("Ananya Desai", 92, "A+", "Excellent"),
        ("Rohan Das", 48, "F", "At-Risk"),
        ("Meera Joshi", 74, "B", "Good"),
        ("Karthik Reddy", 81, "A", "Excellent"),
        ("Divya Menon", 67, "C", "Average"),
    ];

    MarksAnalysis {
        average_score: 72.0,
        weak_topics: vec![
            "Unit 2 — Recursion".to_string(),
            "Unit 4 — Dynamic Programming".to_string(),
            "Unit 6 — Graph Algorithms".to_string(),
        ],
        risk_students: vec![
            "Amit Kumar".to_string(),
            "Sneha Patil".to_string(),
            "Rohan Das".to_string(),
            "Priya Nair".to_string(),
        ],
        strategy: "Based on the analysis, it is recommended to conduct a focused revision \
workshop on Recursion and Dynamic Programming. Use visual aids and step-by-step problem \
solving. Pair at-risk students with high-performing peers for collaborative learning. \
Consider a supplementary assessment with easier difficulty to build confidence before the \
final exam."
            .to_string(),
        students: students
            .iter()
            .filter_map(|(name, score, grade, status)| {
                json!({ "name": name, "score": score, "grade": grade, "status": status })
                    .as_object()
                    .cloned()
            })
            .collect(),
    }
}

pub fn syllabus_analysis() -> SyllabusAnalysis {
    let topics = [
        ("Introduction to Computing", 10.0, "High"),
        ("Data Types & Variables", 8.0, "High"),
        ("Control Structures", 12.0, "Medium"),
        ("Functions & Recursion", 15.0, "Low"),
        ("Arrays & Strings", 12.0, "Medium"),
        ("Pointers & Memory", 18.0, "Low"),
        ("Structures & Unions", 10.0, "Medium"),
        ("File Handling", 8.0, "Low"),
        ("Dynamic Memory Allocation", 7.0, "Low"),
    ];
    let focus = [
        (
            "Functions & Recursion",
            "High weight (15%) with low student coverage. Recursion concepts need deeper practice.",
            "Critical",
        ),
        (
            "Pointers & Memory",
            "Highest weight (18%) in syllabus but lowest understanding. Core concept for advanced topics.",
            "Critical",
        ),
        (
            "File Handling",
            "Often neglected but appears in practical exams. Needs dedicated lab sessions.",
            "Important",
        ),
        (
            "Dynamic Memory Allocation",
            "Builds on pointers knowledge. Students struggle with malloc/calloc/free concepts.",
            "Important",
        ),
    ];

    SyllabusAnalysis {
        topics: topics
            .iter()
            .map(|(name, weight, coverage)| SyllabusTopic {
                name: name.to_string(),
                weight: *weight,
                coverage: coverage.to_string(),
            })
            .collect(),
        focus_areas: focus
            .iter()
            .map(|(topic, reason, priority)| FocusArea {
                topic: topic.to_string(),
                reason: reason.to_string(),
                priority: priority.to_string(),
            })
            .collect(),
    }
}

pub fn assessment(req: &AssessmentRequest) -> Assessment {
    let mcq = |question: &str, options: [&str; 4], answer: &str, bloom: &str| MultipleChoice {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        bloom_level: bloom.to_string(),
    };
    let short = |question: &str, bloom: &str, marks: u32| ShortAnswer {
        question: question.to_string(),
        bloom_level: bloom.to_string(),
        marks,
    };

    Assessment {
        subject: req.subject.clone(),
        unit: req.unit.clone(),
        difficulty: req.difficulty.as_str().to_string(),
        mcqs: vec![
            mcq(
                "What is the time complexity of inserting an element at the root of a Binary Search Tree?",
                ["O(1)", "O(log n)", "O(n)", "O(n log n)"],
                "O(log n)",
                "Understanding",
            ),
            mcq(
                "Which traversal of a BST gives elements in sorted order?",
                ["Pre-order", "In-order", "Post-order", "Level-order"],
                "In-order",
                "Remembering",
            ),
            mcq(
                "What is the worst-case height of an unbalanced BST with n nodes?",
                ["O(1)", "O(log n)", "O(n)", "O(n²)"],
                "O(n)",
                "Analyzing",
            ),
            mcq(
                "Which of the following is NOT a self-balancing BST?",
                ["AVL Tree", "Red-Black Tree", "B-Tree", "Binary Heap"],
                "Binary Heap",
                "Analyzing",
            ),
            mcq(
                "In a complete binary tree with 15 nodes, what is the height?",
                ["3", "4", "5", "7"],
                "3",
                "Applying",
            ),
        ],
        short_answer: vec![
            short(
                "Explain the difference between a Binary Tree and a Binary Search Tree with examples.",
                "Understanding",
                5,
            ),
            short(
                "Write the algorithm for deleting a node with two children from a BST.",
                "Applying",
                5,
            ),
            short(
                "Compare AVL trees and Red-Black trees in terms of balancing strategy and performance.",
                "Evaluating",
                10,
            ),
        ],
    }
}

pub fn feedback_report(req: &FeedbackRequest) -> FeedbackReport {
    let name = &req.student_name;
    let topics = if req.weak_topics.is_empty() {
        "advanced topics".to_string()
    } else {
        req.weak_topics.join(", ")
    };
    FeedbackReport {
        student_name: name.clone(),
        score: req.score,
        strengths: format!(
            "{name} shows solid understanding of foundational concepts and consistent improvement. \
Strong analytical skills observed in labs."
        ),
        weak_areas: format!(
            "Needs improvement in {topics}. Struggles with complex multi-step reasoning."
        ),
        improvement_plan: "1. Daily 30-min practice on weak topics\n2. Work through 3-5 problems weekly\n\
3. Form study groups\n4. Review notes and past papers\n5. Attend office hours"
            .to_string(),
        motivational_message: format!(
            "{name}, your score of {}% is a stepping stone! Keep pushing, your consistency will pay off! 🌟",
            format_number(req.score)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_results_pass_through() {
        let outcome = settle(Ok(3), true, || 0);
        assert_eq!(outcome.message("Done!"), "Done!");
        assert_eq!(outcome.into_data(), Some(3));
    }

    #[test]
    fn failures_use_demo_data_when_enabled() {
        let outcome = settle(Err(ApiError::Interrupted), true, || 9);
        assert_eq!(
            outcome.message("Done!"),
            "request ended without a result. Using demo data."
        );
        assert_eq!(outcome.into_data(), Some(9));
    }

    #[test]
    fn failures_surface_when_fallback_is_off() {
        let outcome: Outcome<i32> = settle(Err(ApiError::Interrupted), false, || 9);
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(outcome.into_data(), None);
    }

    #[test]
    fn offline_always_falls_back() {
        let outcome = settle(Err(ApiError::Offline), false, || 1);
        assert_eq!(outcome.into_data(), Some(1));
    }

    #[test]
    fn demo_marks_match_the_risk_list() {
        let data = marks_analysis();
        let records = data.student_records();
        assert_eq!(records.len(), 10);
        let at_risk = records
            .iter()
            .filter(|r| r.get("status").coerce() == "At-Risk")
            .count();
        assert_eq!(at_risk, data.risk_students.len());
    }

    #[test]
    fn demo_feedback_mentions_weak_topics() {
        let req = FeedbackRequest {
            student_name: "Rahul".into(),
            score: 68.0,
            weak_topics: vec!["Graphs".into(), "DP".into()],
        };
        let report = feedback_report(&req);
        assert!(report.weak_areas.contains("Graphs, DP"));
        assert!(report.motivational_message.contains("68%"));

        let bare = FeedbackRequest {
            weak_topics: Vec::new(),
            ..req
        };
        assert!(feedback_report(&bare).weak_areas.contains("advanced topics"));
    }

    #[test]
    fn demo_assessment_echoes_request() {
        let req = AssessmentRequest {
            subject: "Data Structures".into(),
            unit: "Trees".into(),
            ..AssessmentRequest::default()
        };
        let a = assessment(&req);
        assert_eq!(a.subject, "Data Structures");
        assert_eq!(a.mcqs.len(), 5);
        assert!(a.mcqs.iter().all(|q| q.options.contains(&q.answer)));
    }
}
