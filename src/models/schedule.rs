//! Day-by-day schedule models

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// One day of a parsed itinerary
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Day number as written in the itinerary, always positive
    pub day_number: u32,
    pub heading: Option<String>,
    /// Free text of the day; may keep inline emphasis markers
    pub description: String,
    /// Activities in the order they appear in the text
    pub activities: Vec<Activity>,
}

/// A single timed or bulleted line item within a day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// `H:MM AM/PM`, `H:MM AM/PM - H:MM AM/PM` or `H:MM - H:MM AM/PM`
    pub time_range: Option<String>,
    pub description: String,
    pub cost: Option<Cost>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub amount: f64,
    pub currency_symbol: String,
}

impl Activity {
    /// Start of the time range as a clock time
    #[must_use]
    pub fn start_time(&self) -> Option<NaiveTime> {
        let range = self.time_range.as_deref()?;
        range_times(range).0
    }

    /// End of the time range, when the activity carries a range
    #[must_use]
    pub fn end_time(&self) -> Option<NaiveTime> {
        let range = self.time_range.as_deref()?;
        range_times(range).1
    }
}

impl DaySchedule {
    /// Whether the timed activities of this day never go back in time
    #[must_use]
    pub fn is_chronological(&self) -> bool {
        let times: Vec<NaiveTime> = self
            .activities
            .iter()
            .filter_map(Activity::start_time)
            .collect();
        times.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

fn range_times(range: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let (start, end) = split_range(range);
    let end = end.and_then(parse_clock);
    let start = parse_clock(start).or_else(|| {
        // Bare start clock: take the end's meridiem unless that lands after the end
        let end = end?;
        let (same, other) = if end.hour() >= 12 { ("PM", "AM") } else { ("AM", "PM") };
        let guess = parse_clock(&format!("{start} {same}"))?;
        if guess <= end {
            Some(guess)
        } else {
            parse_clock(&format!("{start} {other}"))
        }
    });
    (start, end)
}

fn split_range(range: &str) -> (&str, Option<&str>) {
    // The separator follows the minutes of the first clock
    let from = range.find(':').map_or(0, |i| i + 1);
    let tail = &range[from..];
    let separator = tail
        .char_indices()
        .find(|(_, c)| matches!(c, '-' | '–' | '—'))
        .map(|(i, c)| (i, c.len_utf8()))
        .or_else(|| tail.find(" to ").map(|i| (i, " to ".len())));

    match separator {
        Some((i, len)) => {
            let start = range[..from + i].trim();
            let end = range[from + i + len..].trim();
            (start, (!end.is_empty()).then_some(end))
        }
        None => (range, None),
    }
}

fn parse_clock(token: &str) -> Option<NaiveTime> {
    let normalized = token.trim().to_ascii_uppercase();
    NaiveTime::parse_from_str(&normalized, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(&normalized, "%I:%M%p"))
        .ok()
}

impl Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.time_range {
            Some(time) => write!(f, "⏰ {time} {}", self.description)?,
            None => write!(f, "• {}", self.description)?,
        }
        if let Some(cost) = &self.cost {
            write!(f, " ({}{})", cost.currency_symbol, cost.amount)?;
        }
        Ok(())
    }
}

impl Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.heading {
            Some(heading) => writeln!(f, "📅 Day {}: {heading}", self.day_number)?,
            None => writeln!(f, "📅 Day {}", self.day_number)?,
        }

        for line in self.description.lines() {
            writeln!(f, "   {line}")?;
        }

        for activity in &self.activities {
            writeln!(f, "   {activity}")?;
        }
        Ok(())
    }
}
