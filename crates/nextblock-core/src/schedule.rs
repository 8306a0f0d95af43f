//! Schedule document types and YAML loading.
//!
//! A [`ScheduleDocument`] is built once per successful load and never
//! mutated afterwards; a reload constructs an entirely new document that
//! replaces the old one wholesale (see [`crate::engine::Engine::replace`]).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{CoreError, Result};

/// Display configuration carried inside a schedule document.
///
/// Both fields are optional in the source file and fall back to their
/// defaults at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Minutes before an upcoming block's start within which its countdown
    /// is shown instead of the idle text.
    #[serde(default = "default_countdown_threshold")]
    pub countdown_threshold_minutes: u32,
    /// Idle text shown when nothing is running or coming up soon.
    #[serde(default = "default_no_class_text")]
    pub no_class_text: String,
}

fn default_countdown_threshold() -> u32 {
    30
}

fn default_no_class_text() -> String {
    ":)".to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            countdown_threshold_minutes: default_countdown_threshold(),
            no_class_text: default_no_class_text(),
        }
    }
}

/// One scheduled time interval.
///
/// `start_time` and `end_time` accept either 12-hour-with-marker or
/// 24-hour notation. `start < end` within the day is assumed, not
/// validated; a block that violates it simply never matches as current.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub block_name: String,
    /// Multi-line display template, may be empty. See [`crate::template`].
    #[serde(default)]
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl Block {
    /// Start of the block as minutes since midnight.
    pub fn start_minutes(&self) -> Result<u32> {
        clock::minutes_of_day(&self.start_time)
    }

    /// End of the block as minutes since midnight. The block ends exactly
    /// here: the end minute itself is outside the interval.
    pub fn end_minutes(&self) -> Result<u32> {
        clock::minutes_of_day(&self.end_time)
    }

    /// Block length in minutes (negative if the times are out of order).
    pub fn duration_minutes(&self) -> Result<i64> {
        Ok(self.end_minutes()? as i64 - self.start_minutes()? as i64)
    }
}

/// A full parsed schedule: config plus per-weekday ordered block lists.
///
/// Weekday keys are full English names (`"Monday"`); days may be absent.
/// Order within a day is significant -- current/next lookups scan the
/// list as authored and take the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub config: ScheduleConfig,
    pub schedule: HashMap<String, Vec<Block>>,
}

impl ScheduleDocument {
    /// Parse and validate a YAML schedule document.
    ///
    /// Two-pass: the raw value is shape-checked first (top level, `config`
    /// and `schedule` must all be mappings), then deserialized into typed
    /// form. Every block time must parse, so a malformed time string fails
    /// the load that carried it rather than surfacing mid-query.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        if !value.is_mapping() {
            return Err(CoreError::Validation(
                "top level must be a mapping".to_string(),
            ));
        }
        for key in ["config", "schedule"] {
            match value.get(key) {
                Some(section) if section.is_mapping() => {}
                Some(_) => {
                    return Err(CoreError::Validation(format!("'{key}' must be a mapping")));
                }
                None => {
                    return Err(CoreError::Validation(format!("missing '{key}' section")));
                }
            }
        }

        let doc: ScheduleDocument = serde_yaml::from_value(value)?;
        for blocks in doc.schedule.values() {
            for block in blocks {
                block.start_minutes()?;
                block.end_minutes()?;
            }
        }
        Ok(doc)
    }

    /// Blocks for the given weekday name, in authored order; empty when
    /// the day is absent from the document.
    pub fn blocks_for(&self, day: &str) -> &[Block] {
        self.schedule.get(day).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = indoc::indoc! {r#"
        config:
          countdownThresholdMinutes: 20
          noClassText: "free"
        schedule:
          Monday:
            - blockName: "Period 1"
              description: "$Block ($Duration)"
              startTime: "9:00 AM"
              endTime: "10:05 AM"
            - blockName: "Period 2"
              startTime: "10:10"
              endTime: "11:00"
          Friday: []
    "#};

    #[test]
    fn parses_a_complete_document() {
        let doc = ScheduleDocument::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(doc.config.countdown_threshold_minutes, 20);
        assert_eq!(doc.config.no_class_text, "free");
        let monday = doc.blocks_for("Monday");
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].block_name, "Period 1");
        assert_eq!(monday[0].start_minutes().unwrap(), 540);
        assert_eq!(monday[1].description, "");
    }

    #[test]
    fn absent_day_yields_empty_list() {
        let doc = ScheduleDocument::from_yaml_str(SAMPLE).unwrap();
        assert!(doc.blocks_for("Sunday").is_empty());
        assert!(doc.blocks_for("Friday").is_empty());
    }

    #[test]
    fn config_fields_fall_back_to_defaults() {
        let doc = ScheduleDocument::from_yaml_str(indoc::indoc! {r#"
            config: {}
            schedule: {}
        "#})
        .unwrap();
        assert_eq!(doc.config.countdown_threshold_minutes, 30);
        assert_eq!(doc.config.no_class_text, ":)");
    }

    #[test]
    fn rejects_non_mapping_top_level() {
        let err = ScheduleDocument::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_missing_sections() {
        let err = ScheduleDocument::from_yaml_str("config: {}\n").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = ScheduleDocument::from_yaml_str("schedule: {}\n").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_non_mapping_sections() {
        let err = ScheduleDocument::from_yaml_str(indoc::indoc! {r#"
            config: 7
            schedule: {}
        "#})
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn malformed_block_time_fails_the_load() {
        let err = ScheduleDocument::from_yaml_str(indoc::indoc! {r#"
            config: {}
            schedule:
              Monday:
                - blockName: "Broken"
                  startTime: "9 AM"
                  endTime: "10:00 AM"
        "#})
        .unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
    }
}
