use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;

/// Live view: a 1-second tick re-evaluates the display summary, and the
/// watch reloads the document on file change. Prints only when the line
/// changes. Runs until interrupted.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut service = super::loaded_service()?;

    let reloaded = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reloaded);
    service.watch_with(move || {
        flag.store(true, Ordering::SeqCst);
    })?;

    let engine = service.engine();
    let mut last = String::new();
    loop {
        if reloaded.swap(false, Ordering::SeqCst) {
            println!("schedule reloaded");
            last.clear();
        }
        let line = engine.display_time(Local::now().naive_local())?;
        if line != last {
            println!("{line}");
            last = line;
        }
        thread::sleep(Duration::from_secs(1));
    }
}
