use crate::cli::commands::{Context, resolve_brother, resolve_session};
use crate::cli::parser::AttendanceAction;
use crate::db::log::audit;
use crate::db::queries;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::table::{Column, Table};

pub fn handle(action: &AttendanceAction, ctx: &Context) -> AppResult<()> {
    let mut engine = ctx.attendance_engine()?;

    match action {
        AttendanceAction::Toggle { session, brother } => {
            let record = resolve_session(&engine, session)?;
            let member = resolve_brother(ctx.conn(), brother)?;

            let status = engine.toggle_attendance(record.id, member.id)?;
            audit(
                ctx.conn(),
                "attendance_toggle",
                &record.event_id,
                &format!("{}: {}", member.name, status.to_db_str()),
            );
            success(format!("{}: {}", member.name, status.to_db_str()));
        }

        AttendanceAction::Justify { session, brother } => {
            let record = resolve_session(&engine, session)?;
            let member = resolve_brother(ctx.conn(), brother)?;

            let status = engine.justify_absence(record.id, member.id)?;
            audit(
                ctx.conn(),
                "attendance_justify",
                &record.event_id,
                &format!("{}: {}", member.name, status.to_db_str()),
            );
            success(format!("{}: {}", member.name, status.to_db_str()));
        }

        AttendanceAction::List { session } => {
            let record = resolve_session(&engine, session)?;
            let members = queries::load_brothers(ctx.conn(), false)?;
            if members.is_empty() {
                info("No active brothers.");
                return Ok(());
            }

            header(format!("Attendance of {} ({})", record.event_id, record.date));
            let mut table = Table::new(vec![Column::new("Name", 28), Column::new("Status", 12)]);
            for m in &members {
                table.add_row(vec![
                    m.name.clone(),
                    engine.status_of(record.id, m.id).to_db_str().to_string(),
                ]);
            }
            print!("{}", table.render());

            let quorum = engine.compute_quorum(record.id, members.len());
            println!(
                "\n👥 {}/{} present ({:.1}%)",
                quorum.present_count, quorum.active_member_count, quorum.percentage
            );
        }
    }

    Ok(())
}
