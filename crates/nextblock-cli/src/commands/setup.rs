use std::fs;

use nextblock_core::ScheduleSource;

const STARTER_FILE: &str = "schedule.yml";

const STARTER_SCHEDULE: &str = r#"# nextblock schedule
#
# The most recently modified .yml/.yaml file in this folder is the one
# nextblock reads. Times accept "9:00 AM" or "14:30". Descriptions may
# use $Block, $Duration, $StartTime and $EndTime.

config:
  countdownThresholdMinutes: 30
  noClassText: ":)"

schedule:
  Monday:
    - blockName: "Period 1"
      description: |
        $Block ($Duration)
        $StartTime-$EndTime
      startTime: "9:00 AM"
      endTime: "10:05 AM"
    - blockName: "Period 2"
      description: |
        $Block ($Duration)
        $StartTime-$EndTime
      startTime: "10:15 AM"
      endTime: "11:20 AM"
  Tuesday: []
  Wednesday: []
  Thursday: []
  Friday: []
"#;

pub fn folder() -> Result<(), Box<dyn std::error::Error>> {
    let source = ScheduleSource::new(ScheduleSource::default_folder());
    source.ensure_folder()?;
    println!("{}", source.folder().display());
    Ok(())
}

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let source = ScheduleSource::new(ScheduleSource::default_folder());
    source.ensure_folder()?;
    if source.has_candidate() {
        println!(
            "schedule already present in {}",
            source.folder().display()
        );
        return Ok(());
    }
    let path = source.folder().join(STARTER_FILE);
    fs::write(&path, STARTER_SCHEDULE)?;
    println!("wrote {}", path.display());
    Ok(())
}
