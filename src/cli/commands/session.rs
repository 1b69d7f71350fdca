use crate::cli::commands::{Context, resolve_session};
use crate::cli::parser::SessionAction;
use crate::db::log::audit;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::parse_optional_date;
use crate::utils::table::{Column, Table};

pub fn handle(action: &SessionAction, ctx: &Context) -> AppResult<()> {
    let mut engine = ctx.attendance_engine()?;

    match action {
        SessionAction::Start { event_id, date } => {
            let date = parse_optional_date(date.as_ref())
                .ok_or_else(|| AppError::InvalidDate(date.clone().unwrap_or_default()))?;

            if let Some(existing) = engine.session_for_event(event_id) {
                info(format!(
                    "Session already started for event {}: {} ({}, {})",
                    existing.event_id,
                    existing.id,
                    existing.date,
                    existing.status.to_db_str()
                ));
                return Ok(());
            }

            let session = engine.start_session(event_id, date)?;
            audit(ctx.conn(), "session_start", &session.event_id, "Session started");
            success(format!(
                "Session started for event {} on {}: {}",
                session.event_id, session.date, session.id
            ));
        }

        SessionAction::List => {
            if engine.sessions().is_empty() {
                info("No sessions yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("Event", 20),
                Column::new("Date", 10),
                Column::new("Status", 10),
                Column::new("Present", 7),
                Column::new("Visitors", 8),
                Column::new("Id", 36),
            ]);
            for s in engine.sessions() {
                let present = engine
                    .attendance_for(s.id)
                    .iter()
                    .filter(|r| r.status.counts_as_present())
                    .count();
                table.add_row(vec![
                    s.event_id.clone(),
                    s.date.to_string(),
                    s.status.to_db_str().to_string(),
                    present.to_string(),
                    engine.visitors_for(s.id).len().to_string(),
                    s.id.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        SessionAction::Finalize {
            session,
            charity,
            notes,
        } => {
            let record = resolve_session(&engine, session)?;
            if !record.is_open() {
                info(format!("Session {} is already finalized.", record.event_id));
                return Ok(());
            }

            let closed = engine.finalize_session(record.id, *charity, notes.clone())?;
            audit(ctx.conn(), "session_finalize", &closed.event_id, "Session finalized");
            success(format!("Session {} finalized.", closed.event_id));
        }

        SessionAction::Quorum {
            session,
            members,
            json,
        } => {
            let record = resolve_session(&engine, session)?;
            let members = match members {
                Some(n) => *n,
                None => queries::count_active_brothers(ctx.conn())?,
            };
            let quorum = engine.compute_quorum(record.id, members);

            if *json {
                let out = serde_json::to_string_pretty(&quorum)
                    .map_err(|e| AppError::Other(e.to_string()))?;
                println!("{out}");
            } else {
                println!(
                    "👥 Quorum for {}: {}/{} ({:.1}%)",
                    record.event_id,
                    quorum.present_count,
                    quorum.active_member_count,
                    quorum.percentage
                );
            }
        }
    }

    Ok(())
}
