use chrono::Local;
use nextblock_core::BlockDetails;

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let service = super::loaded_service()?;
    let now = Local::now().naive_local();
    println!("{}", service.engine().display_time(now)?);
    Ok(())
}

pub fn now(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = super::loaded_service()?;
    let moment = Local::now().naive_local();
    match service.engine().current_details(moment)? {
        Some(details) => print_details(&details, json)?,
        None => println!("no block right now"),
    }
    Ok(())
}

pub fn next(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = super::loaded_service()?;
    let moment = Local::now().naive_local();
    match service.engine().next_details(moment)? {
        Some(details) => print_details(&details, json)?,
        None => println!("nothing else today"),
    }
    Ok(())
}

pub fn today(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = super::loaded_service()?;
    let moment = Local::now().naive_local();
    let blocks = service.engine().todays_blocks(moment)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }
    if blocks.is_empty() {
        println!("nothing scheduled today");
        return Ok(());
    }
    for block in &blocks {
        println!(
            "{} - {}  {}",
            nextblock_core::clock::display_12h(&block.start_time)?,
            nextblock_core::clock::display_12h(&block.end_time)?,
            block.block_name
        );
    }
    Ok(())
}

fn print_details(details: &BlockDetails, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(details)?);
        return Ok(());
    }
    println!("{} ({} - {})", details.name, details.starts_at, details.ends_at);
    if let Some(remaining) = &details.remaining {
        println!("remaining: {remaining}");
    }
    for line in &details.lines {
        println!("  {line}");
    }
    Ok(())
}
