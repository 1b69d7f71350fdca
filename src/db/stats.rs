use crate::db::pool::DbPool;
use ansi_term::Colour::{Cyan, Green, Yellow};
use ansi_term::Style;
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: [(&str, &str); 6] = [
    ("brothers", "Brothers"),
    ("lodge_positions", "Active positions"),
    ("lodge_position_history", "Archived tenures"),
    ("session_records", "Sessions"),
    ("attendance_records", "Attendance marks"),
    ("visitor_attendances", "Visitors"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{} {}", Cyan.paint("• File:"), Yellow.paint(db_path));
    println!("{} {:.1} KB", Cyan.paint("• Size:"), file_kb);

    //
    // 2) ROW COUNTS
    //
    for (table, label) in COUNTED_TABLES {
        let count: i64 =
            pool.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        println!(
            "{} {}",
            Cyan.paint(format!("• {label}:")),
            Green.paint(count.to_string())
        );
    }

    //
    // 3) SESSION DATE RANGE
    //
    let range: Option<(Option<String>, Option<String>)> = pool
        .conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM session_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let dim = Style::new().dimmed();
    let (first, last) = range.unwrap_or((None, None));
    println!("{}", Cyan.paint("• Session range:"));
    println!(
        "    from: {}",
        first.unwrap_or_else(|| dim.paint("--").to_string())
    );
    println!(
        "    to:   {}",
        last.unwrap_or_else(|| dim.paint("--").to_string())
    );

    println!();
    Ok(())
}
