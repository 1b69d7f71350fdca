use crate::cli::commands::{Context, resolve_brother};
use crate::cli::parser::BrotherAction;
use crate::db::log::audit;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::brother::Brother;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(action: &BrotherAction, ctx: &Context) -> AppResult<()> {
    match action {
        BrotherAction::Add { name, email } => {
            if name.trim().is_empty() {
                return Err(AppError::Validation(vec![
                    "Nome do irmao e obrigatorio.".to_string(),
                ]));
            }
            let email = email.as_deref().map(str::trim).filter(|e| !e.is_empty());
            if let Some(e) = email
                && queries::find_brother_by_email(ctx.conn(), e)?.is_some()
            {
                return Err(AppError::Validation(vec![format!(
                    "E-mail {e} ja cadastrado."
                )]));
            }

            let brother = Brother::new(name, email);
            queries::insert_brother(ctx.conn(), &brother)?;
            audit(ctx.conn(), "brother_add", &brother.name, "Brother added");

            success(format!("Brother added: {} ({})", brother.name, brother.id));
        }

        BrotherAction::List { all } => {
            let brothers = queries::load_brothers(ctx.conn(), *all)?;
            if brothers.is_empty() {
                info("No brothers registered.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("Name", 28),
                Column::new("E-mail", 30),
                Column::new("Active", 6),
                Column::new("Id", 36),
            ]);
            for b in &brothers {
                table.add_row(vec![
                    b.name.clone(),
                    b.email.clone().unwrap_or_else(|| "--".to_string()),
                    if b.active { "yes" } else { "no" }.to_string(),
                    b.id.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        BrotherAction::Deactivate { brother } => {
            let found = resolve_brother(ctx.conn(), brother)?;
            if !found.active {
                info(format!("{} is already inactive.", found.name));
                return Ok(());
            }
            queries::set_brother_active(ctx.conn(), found.id, false)?;
            audit(ctx.conn(), "brother_deactivate", &found.name, "Brother deactivated");

            success(format!("Brother deactivated: {}", found.name));
        }
    }

    Ok(())
}
