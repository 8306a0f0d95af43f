//! Active-document holder and schedule queries.
//!
//! The engine is pull-driven: a host re-queries on its own cadence
//! (nominally once a second) and nothing here spawns timers on its
//! behalf. The only shared mutable state is the active document
//! reference, swapped in a single assignment so a query sees either the
//! fully-old or the fully-new document, never a mix.

use std::sync::{Arc, RwLock};

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::clock;
use crate::error::{CoreError, Result};
use crate::schedule::{Block, ScheduleDocument};
use crate::template;

/// Everything a host needs to render one block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockDetails {
    pub name: String,
    /// Rendered description lines, trimmed and non-empty.
    pub lines: Vec<String>,
    /// 12-hour display text.
    pub starts_at: String,
    pub ends_at: String,
    /// Countdown to the block's end; only set for the current block.
    pub remaining: Option<String>,
}

/// Query engine over the active [`ScheduleDocument`].
///
/// Construct one per host and pass it by handle; there is no global
/// instance. Queries before the first successful load fail with
/// [`CoreError::NotLoaded`].
pub struct Engine {
    active: RwLock<Option<Arc<ScheduleDocument>>>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
        }
    }

    /// Install a freshly loaded document, atomically superseding the
    /// previous one.
    pub fn replace(&self, doc: ScheduleDocument) {
        *self.active.write().expect("document lock poisoned") = Some(Arc::new(doc));
    }

    pub fn is_loaded(&self) -> bool {
        self.active.read().expect("document lock poisoned").is_some()
    }

    /// The active document, or `NotLoaded` before the first successful
    /// load.
    pub fn document(&self) -> Result<Arc<ScheduleDocument>> {
        self.active
            .read()
            .expect("document lock poisoned")
            .clone()
            .ok_or(CoreError::NotLoaded)
    }

    /// Today's blocks in authored order; empty when today is absent from
    /// the document.
    pub fn todays_blocks(&self, moment: NaiveDateTime) -> Result<Vec<Block>> {
        let doc = self.document()?;
        Ok(doc.blocks_for(weekday_name(moment.weekday())).to_vec())
    }

    /// The first of today's blocks whose interval contains the moment
    /// (start inclusive, end exclusive).
    pub fn current_block(&self, moment: NaiveDateTime) -> Result<Option<Block>> {
        let doc = self.document()?;
        let m = minute_of_day(moment);
        for block in doc.blocks_for(weekday_name(moment.weekday())) {
            if block.start_minutes()? <= m && m < block.end_minutes()? {
                return Ok(Some(block.clone()));
            }
        }
        Ok(None)
    }

    /// The first of today's blocks starting after the moment.
    ///
    /// This is a first-match scan over the list as authored, not a
    /// chronological minimum: with an out-of-order list the result may
    /// not be the nearest block. Lists are expected to be authored in
    /// time order.
    pub fn next_block(&self, moment: NaiveDateTime) -> Result<Option<Block>> {
        let doc = self.document()?;
        let m = minute_of_day(moment);
        for block in doc.blocks_for(weekday_name(moment.weekday())) {
            if block.start_minutes()? > m {
                return Ok(Some(block.clone()));
            }
        }
        Ok(None)
    }

    /// Whole minutes until the next block starts.
    pub fn minutes_until_next(&self, moment: NaiveDateTime) -> Result<Option<i64>> {
        match self.next_block(moment)? {
            Some(block) => {
                Ok(Some(block.start_minutes()? as i64 - minute_of_day(moment) as i64))
            }
            None => Ok(None),
        }
    }

    /// Minutes between the end of the current block and the start of the
    /// next; `None` unless both exist. Hosts use this to decide whether
    /// to preview the next block while one is still running.
    pub fn gap_to_next(&self, moment: NaiveDateTime) -> Result<Option<i64>> {
        let (current, next) = (self.current_block(moment)?, self.next_block(moment)?);
        match (current, next) {
            (Some(current), Some(next)) => {
                Ok(Some(next.start_minutes()? as i64 - current.end_minutes()? as i64))
            }
            _ => Ok(None),
        }
    }

    /// The one-line summary a host shows for the moment.
    ///
    /// Three states, no memory between calls: counting down the current
    /// block's end, counting down an imminent next block (within the
    /// configured threshold), or the idle text.
    pub fn display_time(&self, moment: NaiveDateTime) -> Result<String> {
        let doc = self.document()?;

        if let Some(current) = self.current_block(moment)? {
            let remaining = seconds_until(current.end_minutes()?, moment);
            return Ok(format!("Done In: {}", clock::format_countdown(remaining)));
        }

        if let Some(next) = self.next_block(moment)? {
            let start = next.start_minutes()?;
            let minutes_away = start as i64 - minute_of_day(moment) as i64;
            if minutes_away <= doc.config.countdown_threshold_minutes as i64 {
                let remaining = seconds_until(start, moment);
                return Ok(format!("Next In: {}", clock::format_countdown(remaining)));
            }
        }

        Ok(doc.config.no_class_text.clone())
    }

    /// Render-ready details of the current block, countdown included.
    pub fn current_details(&self, moment: NaiveDateTime) -> Result<Option<BlockDetails>> {
        let Some(block) = self.current_block(moment)? else {
            return Ok(None);
        };
        let remaining = clock::format_countdown(seconds_until(block.end_minutes()?, moment));
        Ok(Some(self.details_of(&block, Some(remaining))?))
    }

    /// Render-ready details of the next block.
    pub fn next_details(&self, moment: NaiveDateTime) -> Result<Option<BlockDetails>> {
        let Some(block) = self.next_block(moment)? else {
            return Ok(None);
        };
        Ok(Some(self.details_of(&block, None)?))
    }

    fn details_of(&self, block: &Block, remaining: Option<String>) -> Result<BlockDetails> {
        Ok(BlockDetails {
            name: block.block_name.clone(),
            lines: template::render(block)?,
            starts_at: clock::display_12h(&block.start_time)?,
            ends_at: clock::display_12h(&block.end_time)?,
            remaining,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Full English weekday name, matching the document's day keys.
fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn minute_of_day(moment: NaiveDateTime) -> u32 {
    moment.hour() * 60 + moment.minute()
}

/// Signed seconds from the moment to a minute-of-day target.
fn seconds_until(target_minutes: u32, moment: NaiveDateTime) -> i64 {
    let elapsed =
        moment.hour() as i64 * 3600 + moment.minute() as i64 * 60 + moment.second() as i64;
    target_minutes as i64 * 60 - elapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduleConfig;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn block(name: &str, start: &str, end: &str) -> Block {
        Block {
            block_name: name.to_string(),
            description: String::new(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    fn engine_with(day: &str, blocks: Vec<Block>) -> Engine {
        let mut schedule = HashMap::new();
        schedule.insert(day.to_string(), blocks);
        let engine = Engine::new();
        engine.replace(ScheduleDocument {
            config: ScheduleConfig::default(),
            schedule,
        });
        engine
    }

    /// 2026-01-05 is a Monday.
    fn monday(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn unloaded_engine_fails_predictably() {
        let engine = Engine::new();
        assert!(matches!(
            engine.display_time(monday(9, 0, 0)),
            Err(CoreError::NotLoaded)
        ));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn current_block_matches_interval() {
        let engine = engine_with("Monday", vec![block("A", "9:00 AM", "10:05 AM")]);
        let found = engine.current_block(monday(9, 30, 0)).unwrap().unwrap();
        assert_eq!(found.block_name, "A");
    }

    #[test]
    fn current_block_boundaries_are_start_inclusive_end_exclusive() {
        let engine = engine_with("Monday", vec![block("A", "9:00 AM", "10:05 AM")]);
        assert!(engine.current_block(monday(9, 0, 0)).unwrap().is_some());
        assert!(engine.current_block(monday(10, 4, 59)).unwrap().is_some());
        assert!(engine.current_block(monday(10, 5, 0)).unwrap().is_none());
        assert!(engine.current_block(monday(8, 59, 0)).unwrap().is_none());
    }

    #[test]
    fn absent_day_has_no_blocks() {
        let engine = engine_with("Monday", vec![block("A", "9:00 AM", "10:05 AM")]);
        // 2026-01-04 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert!(engine.todays_blocks(sunday).unwrap().is_empty());
        assert!(engine.current_block(sunday).unwrap().is_none());
    }

    #[test]
    fn next_block_is_first_future_start() {
        let engine = engine_with(
            "Monday",
            vec![
                block("A", "9:00 AM", "10:05 AM"),
                block("B", "10:10 AM", "11:00 AM"),
            ],
        );
        let next = engine.next_block(monday(9, 30, 0)).unwrap().unwrap();
        assert_eq!(next.block_name, "B");
        assert_eq!(engine.minutes_until_next(monday(9, 30, 0)).unwrap(), Some(40));
    }

    #[test]
    fn next_block_scan_preserves_authored_order() {
        // Out-of-order list: the first future start in list order wins,
        // not the chronologically nearest one.
        let engine = engine_with(
            "Monday",
            vec![
                block("Late", "1:00 PM", "2:00 PM"),
                block("Early", "9:00 AM", "10:00 AM"),
            ],
        );
        let next = engine.next_block(monday(8, 0, 0)).unwrap().unwrap();
        assert_eq!(next.block_name, "Late");
    }

    #[test]
    fn display_counts_down_the_current_block() {
        let engine = engine_with("Monday", vec![block("A", "9:00 AM", "10:05 AM")]);
        assert_eq!(
            engine.display_time(monday(9, 30, 0)).unwrap(),
            "Done In: 35:00"
        );
    }

    #[test]
    fn display_ignores_a_distant_next_block() {
        let engine = engine_with("Monday", vec![block("A", "10:15 AM", "11:00 AM")]);
        // Next starts in 45 minutes, threshold is 30: idle text.
        assert_eq!(engine.display_time(monday(9, 30, 0)).unwrap(), ":)");
    }

    #[test]
    fn display_counts_down_an_imminent_next_block() {
        let engine = engine_with("Monday", vec![block("A", "9:40 AM", "11:00 AM")]);
        assert_eq!(
            engine.display_time(monday(9, 30, 0)).unwrap(),
            "Next In: 10:00"
        );
    }

    #[test]
    fn display_falls_back_to_idle_text_after_the_day() {
        let engine = engine_with("Monday", vec![block("A", "9:00 AM", "10:05 AM")]);
        assert_eq!(engine.display_time(monday(18, 0, 0)).unwrap(), ":)");
    }

    #[test]
    fn gap_to_next_needs_both_blocks() {
        let engine = engine_with(
            "Monday",
            vec![
                block("A", "9:00 AM", "10:05 AM"),
                block("B", "10:15 AM", "11:00 AM"),
            ],
        );
        assert_eq!(engine.gap_to_next(monday(9, 30, 0)).unwrap(), Some(10));
        // After the last block ends there is no current block.
        assert_eq!(engine.gap_to_next(monday(11, 30, 0)).unwrap(), None);
    }

    #[test]
    fn current_details_carry_countdown_and_display_times() {
        let mut b = block("A1", "09:00", "10:05");
        b.description = "$Block ($Duration)\n$StartTime-$EndTime".to_string();
        let engine = engine_with("Monday", vec![b]);
        let details = engine.current_details(monday(9, 30, 0)).unwrap().unwrap();
        assert_eq!(details.name, "A1");
        assert_eq!(details.lines, vec!["A1 (1:05)", "9:00 AM-10:05 AM"]);
        assert_eq!(details.starts_at, "9:00 AM");
        assert_eq!(details.ends_at, "10:05 AM");
        assert_eq!(details.remaining.as_deref(), Some("35:00"));
    }

    #[test]
    fn replace_swaps_the_whole_document() {
        let engine = engine_with("Monday", vec![block("Old", "9:00 AM", "10:00 AM")]);
        let mut schedule = HashMap::new();
        schedule.insert(
            "Monday".to_string(),
            vec![block("New", "9:00 AM", "10:00 AM")],
        );
        engine.replace(ScheduleDocument {
            config: ScheduleConfig::default(),
            schedule,
        });
        let found = engine.current_block(monday(9, 30, 0)).unwrap().unwrap();
        assert_eq!(found.block_name, "New");
    }
}
