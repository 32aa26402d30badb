//! Separates a day's free text from its discrete activities
//!
//! A line is an activity when it carries a 12-hour time token, or when it is a
//! bullet that is not one of the structural `Cost:` / `Transportation:` labels.
//! Everything else (apart from an optional emphasized heading) is description.

use regex::{Match, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, trace};

use super::segmenter::DaySegment;
use crate::models::{Activity, Cost, DaySchedule};

static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        // A range may leave the meridiem off its start ("9:00-11:00 AM")
        r"\b\d{1,2}:[0-5]\d(?:\s*[AaPp][Mm]\b)?\s*(?:-|–|—|to)\s*\d{1,2}:[0-5]\d\s*[AaPp][Mm]\b|\b\d{1,2}:[0-5]\d\s*[AaPp][Mm]\b",
    )
    .expect("valid time token regex")
});

static COST_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcost:\s*(\p{Sc})\s*(\d{1,3}(?:,\d{3})+|\d+)(\.\d+)?")
        .expect("valid cost token regex")
});

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+•]\s+|\d+[.)]\s+)").expect("valid bullet regex")
});

static STRUCTURAL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:cost|transportation):").expect("valid label regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Heading(String),
    Activity,
    Description,
}

pub struct ActivityExtractor;

impl ActivityExtractor {
    /// Turn one day segment into a `DaySchedule`
    #[must_use]
    pub fn extract(segment: &DaySegment) -> DaySchedule {
        let mut heading: Option<String> = None;
        let mut description_lines: Vec<&str> = Vec::new();
        let mut activities: Vec<Activity> = Vec::new();
        let mut seen_activity_line = false;

        for line in segment.text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match Self::classify(line, heading.is_none() && !seen_activity_line) {
                LineKind::Heading(text) => heading = Some(text),
                LineKind::Activity => {
                    seen_activity_line = true;
                    match Self::parse_activity(line) {
                        Some(activity) => activities.push(activity),
                        None => trace!("Dropping empty activity line: {}", line),
                    }
                }
                LineKind::Description => description_lines.push(line),
            }
        }

        debug!(
            "Day {}: {} activities, {} description lines",
            segment.day_number,
            activities.len(),
            description_lines.len()
        );

        DaySchedule {
            day_number: segment.day_number,
            heading,
            description: description_lines.join("\n"),
            activities,
        }
    }

    fn classify(line: &str, heading_allowed: bool) -> LineKind {
        if Self::is_activity_line(line) {
            return LineKind::Activity;
        }

        if heading_allowed && (line.contains("**") || line.contains("__")) {
            let text = clean_heading(line);
            if !text.is_empty() {
                return LineKind::Heading(text);
            }
        }

        LineKind::Description
    }

    /// Time-stamped lines are always activities; bullets are unless they are labels
    fn is_activity_line(line: &str) -> bool {
        TIME_TOKEN.is_match(line)
            || (BULLET.is_match(line) && !STRUCTURAL_LABEL.is_match(line))
    }

    /// Parse an activity line, or `None` when nothing is left after cleanup
    fn parse_activity(line: &str) -> Option<Activity> {
        let time = TIME_TOKEN.find(line);
        let cost_caps = COST_TOKEN.captures(line);

        let cost = cost_caps.as_ref().and_then(|caps| parse_cost(caps));

        let mut removals: Vec<Range<usize>> = Vec::new();
        if let Some(bullet) = BULLET.find(line) {
            removals.push(bullet.range());
        }
        if let Some(time) = time {
            removals.push(time.range());
        }
        // A label without a parsable amount stays in the text
        if cost.is_some() {
            if let Some(whole) = cost_caps.as_ref().and_then(|caps| caps.get(0)) {
                removals.push(whole.range());
            }
        }

        let description = clean_description(line, removals);
        if description.is_empty() {
            return None;
        }

        Some(Activity {
            time_range: time.map(|m: Match<'_>| collapse_whitespace(m.as_str())),
            description,
            cost,
        })
    }
}

fn parse_cost(caps: &regex::Captures<'_>) -> Option<Cost> {
    let symbol = caps.get(1)?.as_str();
    let integer = caps.get(2)?.as_str().replace(',', "");
    let fraction = caps.get(3).map_or("", |m| m.as_str());

    let amount = format!("{integer}{fraction}").parse::<f64>().ok()?;
    Some(Cost {
        amount,
        currency_symbol: symbol.to_string(),
    })
}

fn clean_description(line: &str, mut removals: Vec<Range<usize>>) -> String {
    // Remove from the back so earlier ranges stay valid
    removals.sort_by_key(|r| std::cmp::Reverse(r.start));

    let mut text = line.to_string();
    let mut last_start = usize::MAX;
    for range in removals {
        if range.end > last_start {
            continue;
        }
        last_start = range.start;
        text.replace_range(range, " ");
    }

    let text = text.replace("**", " ").replace("__", " ");
    let text = collapse_whitespace(&text);

    text.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | '*' | '+' | '•' | ':' | '–' | '—' | '|' | ',' | '.')
    })
    .trim_end_matches(|c: char| {
        c.is_whitespace() || matches!(c, '-' | ':' | '–' | '—' | '|' | ',')
    })
    .to_string()
}

fn clean_heading(line: &str) -> String {
    let text = line.replace("**", "").replace("__", "");
    text.trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
