pub mod query;
pub mod setup;
pub mod watch;

use nextblock_core::{CoreError, ScheduleService, ScheduleSource};

/// Build a service over the default schedule folder and perform the
/// initial load. A missing schedule file exits with a setup hint rather
/// than a generic failure.
pub(crate) fn loaded_service() -> Result<ScheduleService, Box<dyn std::error::Error>> {
    let service = ScheduleService::new(ScheduleSource::new(ScheduleSource::default_folder()));
    match service.reload() {
        Ok(()) => Ok(service),
        Err(CoreError::MissingSource(folder)) => {
            eprintln!("no schedule file in {}", folder.display());
            eprintln!("run `nextblock init` to create a starter schedule");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
