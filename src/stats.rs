//! Stat-card helpers shared by the dashboard and the analysis pages.

use chrono::{DateTime, Local};

use crate::payloads::MarksAnalysis;
use crate::table::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTrend {
    Positive,
    Negative,
    Neutral,
}

impl ChangeTrend {
    /// Sign of a delta label such as "+12" or "-2".
    pub fn parse(change: &str) -> Self {
        let change = change.trim();
        if change.starts_with('+') {
            ChangeTrend::Positive
        } else if change.starts_with('-') || change.starts_with('−') {
            ChangeTrend::Negative
        } else {
            ChangeTrend::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Purple,
    Emerald,
    Amber,
    Rose,
    Cyan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub change: Option<String>,
    pub accent: Accent,
}

impl StatCard {
    pub fn new(label: &str, value: impl Into<String>, accent: Accent) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
            change: None,
            accent,
        }
    }

    pub fn with_change(mut self, change: &str) -> Self {
        self.change = Some(change.to_string());
        self
    }

    pub fn trend(&self) -> Option<ChangeTrend> {
        self.change.as_deref().map(ChangeTrend::parse)
    }
}

/// Class health label shown next to the average score.
pub fn class_health(average_score: f64) -> (&'static str, Accent) {
    if average_score >= 70.0 {
        ("Good", Accent::Emerald)
    } else {
        ("Needs Attention", Accent::Amber)
    }
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Morning"
    } else if hour < 17 {
        "Afternoon"
    } else {
        "Evening"
    }
}

/// Dashboard cards. Until marks are analysed in this session the cards show
/// the sample class with week-on-week deltas.
pub fn dashboard_cards(analysis: Option<&MarksAnalysis>, assessments: usize) -> Vec<StatCard> {
    match analysis {
        None => vec![
            StatCard::new("Total Students", "156", Accent::Blue).with_change("+12"),
            StatCard::new("Avg Score", "72%", Accent::Emerald).with_change("+3%"),
            StatCard::new("At-Risk Students", "8", Accent::Rose).with_change("-2"),
            StatCard::new("Assessments Created", (24 + assessments).to_string(), Accent::Purple)
                .with_change(&format!("+{}", 5 + assessments)),
        ],
        Some(a) => {
            let (_, health) = class_health(a.average_score);
            vec![
                StatCard::new("Total Students", a.students.len().to_string(), Accent::Blue),
                StatCard::new("Avg Score", format!("{}%", format_number(a.average_score)), health),
                StatCard::new("At-Risk Students", a.risk_students.len().to_string(), Accent::Rose),
                StatCard::new("Assessments Created", assessments.to_string(), Accent::Purple),
            ]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub action: String,
    pub detail: String,
    pub at: DateTime<Local>,
    pub accent: Accent,
}

impl Activity {
    pub fn now(action: &str, detail: impl Into<String>, accent: Accent) -> Self {
        Self {
            action: action.to_string(),
            detail: detail.into(),
            at: Local::now(),
            accent,
        }
    }
}

pub fn relative_time(now: DateTime<Local>, then: DateTime<Local>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86_399 => plural(secs / 3600, "hour"),
        _ => plural(secs / 86_400, "day"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_prefixed_change_is_positive() {
        assert_eq!(ChangeTrend::parse("+12"), ChangeTrend::Positive);
        assert_eq!(ChangeTrend::parse("+3%"), ChangeTrend::Positive);
    }

    #[test]
    fn minus_is_negative_but_zero_is_not_painted_as_a_drop() {
        assert_eq!(ChangeTrend::parse("-2"), ChangeTrend::Negative);
        assert_eq!(ChangeTrend::parse(" -15%"), ChangeTrend::Negative);
        assert_eq!(ChangeTrend::parse("−4"), ChangeTrend::Negative);
        // "-2" and "0" must not share a colour.
        assert_ne!(ChangeTrend::parse("0"), ChangeTrend::parse("-2"));
        assert_eq!(ChangeTrend::parse("0"), ChangeTrend::Neutral);
    }

    #[test]
    fn unsigned_change_is_neutral() {
        assert_eq!(ChangeTrend::parse("0"), ChangeTrend::Neutral);
        assert_eq!(ChangeTrend::parse("steady"), ChangeTrend::Neutral);
    }

    #[test]
    fn card_without_change_has_no_trend() {
        let card = StatCard::new("Total Students", "156", Accent::Blue);
        assert_eq!(card.trend(), None);
        let card = card.with_change("+12");
        assert_eq!(card.trend(), Some(ChangeTrend::Positive));
    }

    #[test]
    fn class_health_threshold_is_seventy() {
        assert_eq!(class_health(70.0).0, "Good");
        assert_eq!(class_health(69.9).0, "Needs Attention");
    }

    #[test]
    fn dashboard_uses_analysis_once_available() {
        let sample = dashboard_cards(None, 0);
        assert_eq!(sample[2].value, "8");
        assert_eq!(sample[2].trend(), Some(ChangeTrend::Negative));

        let analysis = crate::demo::marks_analysis();
        let live = dashboard_cards(Some(&analysis), 2);
        assert_eq!(live[0].value, "10");
        assert_eq!(live[1].value, "72%");
        assert_eq!(live[1].accent, Accent::Emerald);
        assert_eq!(live[2].value, "4");
        assert_eq!(live[3].value, "2");
        assert!(live.iter().all(|c| c.change.is_none()));
    }

    #[test]
    fn relative_times_round_down() {
        let now = Local::now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now, now - chrono::Duration::seconds(90)), "1 minute ago");
        assert_eq!(relative_time(now, now - chrono::Duration::hours(5)), "5 hours ago");
        assert_eq!(relative_time(now, now - chrono::Duration::days(2)), "2 days ago");
        assert_eq!(relative_time(now, now + chrono::Duration::seconds(5)), "just now");
    }

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(9), "Morning");
        assert_eq!(greeting(12), "Afternoon");
        assert_eq!(greeting(17), "Evening");
    }
}
