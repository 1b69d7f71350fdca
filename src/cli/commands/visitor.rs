use crate::cli::commands::{Context, parse_uuid, resolve_session};
use crate::cli::parser::VisitorAction;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::visitor::VisitorDraft;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(action: &VisitorAction, ctx: &Context) -> AppResult<()> {
    let mut engine = ctx.attendance_engine()?;

    match action {
        VisitorAction::Add {
            session,
            name,
            degree,
            lodge,
            lodge_number,
            obedience,
            masonic_number,
        } => {
            let record = resolve_session(&engine, session)?;
            let draft = VisitorDraft {
                name: name.clone(),
                degree: degree.clone(),
                lodge: lodge.clone(),
                lodge_number: lodge_number.clone(),
                obedience: obedience.clone(),
                masonic_number: masonic_number.clone(),
            };

            let visitor = engine.add_visitor(record.id, &draft)?;
            let total = engine.save_session_visitors(record.id)?;
            audit(
                ctx.conn(),
                "visitor_save",
                &record.event_id,
                &format!("{} visitor(s) saved", total),
            );
            success(format!(
                "Visitor added: {} ({} nº {}) [{}]",
                visitor.name, visitor.lodge, visitor.lodge_number, visitor.id
            ));
        }

        VisitorAction::Remove { session, visitor } => {
            let record = resolve_session(&engine, session)?;
            let visitor_id = parse_uuid(visitor)?;

            if !engine
                .visitors_for(record.id)
                .iter()
                .any(|v| v.id == visitor_id)
            {
                return Err(AppError::NotFound(format!("Visitor {visitor_id}")));
            }
            if !record.is_open() {
                return Err(AppError::SessionClosed(record.event_id));
            }

            let removed = engine.remove_visitor(visitor_id);
            let total = engine.save_session_visitors(record.id)?;
            audit(
                ctx.conn(),
                "visitor_save",
                &record.event_id,
                &format!("{} visitor(s) saved", total),
            );
            if let Some(v) = removed {
                success(format!("Visitor removed: {}", v.name));
            }
        }

        VisitorAction::List { session } => {
            let record = resolve_session(&engine, session)?;
            let visitors = engine.visitors_for(record.id);
            if visitors.is_empty() {
                info(format!("No visitors in session {}.", record.event_id));
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("Name", 28),
                Column::new("Degree", 10),
                Column::new("Lodge", 24),
                Column::new("Nº", 6),
                Column::new("Obedience", 12),
                Column::new("Id", 36),
            ]);
            for v in visitors {
                table.add_row(vec![
                    v.name.clone(),
                    v.degree.clone(),
                    v.lodge.clone(),
                    v.lodge_number.clone(),
                    v.obedience.clone(),
                    v.id.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
