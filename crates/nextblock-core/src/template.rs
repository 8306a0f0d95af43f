//! Block description rendering.
//!
//! A block's description is a multi-line template over exactly four
//! tokens: `$Block`, `$Duration`, `$StartTime` and `$EndTime`. Nothing
//! else is substituted.

use crate::clock;
use crate::error::Result;
use crate::schedule::Block;

/// Expand the template tokens in a block's description and return the
/// trimmed, non-empty lines in order. A blank description renders to an
/// empty list.
pub fn render(block: &Block) -> Result<Vec<String>> {
    let duration = clock::format_duration(block.duration_minutes()?);
    let rendered = block
        .description
        .replace("$Block", &block.block_name)
        .replace("$Duration", &duration)
        .replace("$StartTime", &clock::display_12h(&block.start_time)?)
        .replace("$EndTime", &clock::display_12h(&block.end_time)?);

    Ok(rendered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(description: &str) -> Block {
        Block {
            block_name: "A1".to_string(),
            description: description.to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:05".to_string(),
        }
    }

    #[test]
    fn expands_all_four_tokens() {
        let lines = render(&block("$Block ($Duration)\n$StartTime-$EndTime")).unwrap();
        assert_eq!(lines, vec!["A1 (1:05)", "9:00 AM-10:05 AM"]);
    }

    #[test]
    fn short_blocks_use_bare_minute_durations() {
        let mut b = block("$Duration min");
        b.end_time = "09:45".to_string();
        assert_eq!(render(&b).unwrap(), vec!["45 min"]);
    }

    #[test]
    fn unknown_tokens_pass_through() {
        let lines = render(&block("$Block $Room")).unwrap();
        assert_eq!(lines, vec!["A1 $Room"]);
    }

    #[test]
    fn trims_lines_and_drops_empty_ones() {
        let lines = render(&block("  first  \n\n   \nsecond")).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn blank_description_renders_to_nothing() {
        assert!(render(&block("")).unwrap().is_empty());
    }

    #[test]
    fn substitutes_every_occurrence() {
        let lines = render(&block("$Block and $Block again")).unwrap();
        assert_eq!(lines, vec!["A1 and A1 again"]);
    }
}
