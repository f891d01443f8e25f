//! Human-readable rendering of session results

use lapline_shared::*;

/// Format milliseconds as `mm:ss.mmm`. Minutes are not wrapped into hours.
pub fn format_lap_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}

pub fn format_optional_lap_time(ms: Option<u64>) -> String {
    ms.map(format_lap_time)
        .unwrap_or_else(|| "--:--.---".to_string())
}

pub fn print_session(report: &SessionReport) {
    let config = &report.config;
    println!();
    println!("=== Session Result ===");
    println!("Track:      {}", config.track);
    println!("Driver:     {}", config.driver);
    println!(
        "Final tick: {} ({:.1}s)",
        report.final_tick,
        report.final_tick as f32 / TICK_RATE as f32
    );
    println!("Ended by:   {:?}", report.reason);
    println!("Collisions: {}", report.collisions);
    println!();

    if report.laps.is_empty() {
        println!("No laps completed.");
        return;
    }

    println!("{:>4} {:>10} {:>6}", "Lap", "Time", "Best");
    println!("{:-<4} {:-<10} {:-<6}", "", "", "");
    for lap in &report.laps {
        println!(
            "{:>4} {:>10} {:>6}",
            lap.lap,
            format_lap_time(lap.duration_ms),
            if lap.personal_best { "*" } else { "" }
        );
    }
    println!();
    println!("Best lap:   {}", format_optional_lap_time(report.best_lap_ms));
}

pub fn print_comparison(reports: &[SessionReport]) {
    println!();
    println!("=== Track Comparison ===");
    println!(
        "{:<12} {:>5} {:>10} {:>11} {:>8}",
        "Track", "Laps", "Best", "Collisions", "Ticks"
    );
    println!("{:-<12} {:-<5} {:-<10} {:-<11} {:-<8}", "", "", "", "", "");
    for report in reports {
        println!(
            "{:<12} {:>5} {:>10} {:>11} {:>8}",
            report.config.track.name(),
            report.laps.len(),
            format_optional_lap_time(report.best_lap_ms),
            report.collisions,
            report.final_tick
        );
    }
}
