use crate::cli::commands::{Context, parse_uuid, resolve_brother};
use crate::cli::parser::PositionAction;
use crate::db::log::audit;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::position_type::PositionType;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::{parse_date, parse_optional_date};
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;
use uuid::Uuid;

fn date_arg(raw: &str) -> AppResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| AppError::InvalidDate(raw.to_string()))
}

fn date_or_today(raw: Option<&String>) -> AppResult<NaiveDate> {
    parse_optional_date(raw).ok_or_else(|| AppError::InvalidDate(raw.cloned().unwrap_or_default()))
}

/// Brother names by id, inactive members included.
fn names(conn: &Connection) -> AppResult<HashMap<Uuid, String>> {
    Ok(queries::load_brothers(conn, true)?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect())
}

fn holder_name(names: &HashMap<Uuid, String>, user_id: Option<Uuid>) -> String {
    match user_id {
        Some(id) => names.get(&id).cloned().unwrap_or_else(|| id.to_string()),
        None => "(vacant)".to_string(),
    }
}

pub fn handle(action: &PositionAction, ctx: &mut Context) -> AppResult<()> {
    match action {
        PositionAction::Assign {
            position,
            holder,
            from,
            to,
        } => {
            let position_type = PositionType::from_code(position)
                .ok_or_else(|| AppError::InvalidPosition(position.clone()))?;
            let holder = holder
                .as_deref()
                .map(|h| resolve_brother(ctx.conn(), h))
                .transpose()?;

            let assigned = ctx.resolver.assign_position(
                position_type,
                holder.as_ref().map(|b| b.id),
                date_arg(from)?,
                date_arg(to)?,
            )?;

            let who = holder
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_else(|| "(vacant)".to_string());
            audit(
                ctx.conn(),
                "position_assign",
                position_type.code(),
                &format!("{} assigned to {}", position_type.label(), who),
            );

            success(format!(
                "{} assigned to {} ({} → {}) [{}]",
                position_type.label(),
                who,
                assigned.start_date,
                assigned.end_date,
                assigned.id
            ));
        }

        PositionAction::Remove { id } => {
            let removed = ctx.resolver.remove_position(parse_uuid(id)?)?;
            audit(
                ctx.conn(),
                "position_remove",
                removed.position_type.code(),
                "Position record archived",
            );
            success(format!(
                "{} record removed and archived.",
                removed.position_type.label()
            ));
        }

        PositionAction::List { history, date } => {
            let names = names(ctx.conn())?;

            if *history {
                let entries = ctx.resolver.history()?;
                if entries.is_empty() {
                    info("No archived tenures.");
                    return Ok(());
                }
                let mut table = Table::new(vec![
                    Column::new("Office", 22),
                    Column::new("Holder", 28),
                    Column::new("From", 10),
                    Column::new("To", 10),
                    Column::new("Archived", 25),
                ]);
                for e in &entries {
                    table.add_row(vec![
                        e.position_type.label().to_string(),
                        holder_name(&names, e.user_id),
                        e.start_date.to_string(),
                        e.end_date.to_string(),
                        e.archived_at.clone(),
                    ]);
                }
                print!("{}", table.render());
                return Ok(());
            }

            let as_of = date_or_today(date.as_ref())?;
            let mut positions = ctx.resolver.active_positions().to_vec();
            if positions.is_empty() {
                info("No positions assigned.");
                return Ok(());
            }
            positions.sort_by_key(|p| (p.position_type, p.start_date));

            let mut table = Table::new(vec![
                Column::new("Office", 22),
                Column::new("Holder", 28),
                Column::new("From", 10),
                Column::new("To", 10),
                Column::new("Now", 3),
                Column::new("Id", 36),
            ]);
            for p in &positions {
                table.add_row(vec![
                    p.position_type.label().to_string(),
                    holder_name(&names, p.user_id),
                    p.start_date.to_string(),
                    p.end_date.to_string(),
                    if p.covers(as_of) { "✔" } else { "" }.to_string(),
                    p.id.to_string(),
                ]);
            }
            print!("{}", table.render());

            for conflict in ctx.resolver.conflicts(as_of) {
                warning(format!(
                    "{} has more than one record covering {}",
                    conflict.label(),
                    as_of
                ));
            }
        }

        PositionAction::Whoami { date } => {
            let as_of = date_or_today(date.as_ref())?;
            let identity = &ctx.identity;

            if ctx.resolver.policy().is_privileged(identity) {
                info("Privileged identity: every module is available.");
                return Ok(());
            }

            let Some(user_id) = identity.user_id else {
                info("Unknown user: no position, no modules.");
                return Ok(());
            };

            match ctx.resolver.current_record(user_id, as_of) {
                Some(record) => {
                    let modules = ctx.resolver.permissions(user_id, as_of);
                    println!("🏛️  Office  : {}", record.position_type.label());
                    println!("📅 Tenure  : {} → {}", record.start_date, record.end_date);
                    println!("🔑 Modules : {}", modules.codes().join(", "));
                }
                None => info(format!("No position held on {as_of}.")),
            }
        }
    }

    Ok(())
}
