//! Runs the date extractor over text from the arguments (or stdin when none)
//! and prints what it resolved. Handy for checking raw OCR output by hand.

use std::io::Read;

use lunch_menu_notifier::{telemetry, Clock, DateExtractor, DateResolution, SystemClock};

fn main() -> anyhow::Result<()> {
    telemetry::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.join(" ")
    };

    let today = SystemClock.today();
    match DateExtractor::korean().resolve(&text, today) {
        DateResolution::Resolved { date, pattern } => {
            println!("pattern:  {pattern}");
            println!("date:     {date}");
            println!("is_today: {}", date == today);
        }
        DateResolution::NoMatch => println!("no date found"),
        DateResolution::EmptyText => println!("empty input"),
    }

    Ok(())
}
