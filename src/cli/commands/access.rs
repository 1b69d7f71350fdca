use crate::cli::commands::Context;
use crate::core::permissions::Module;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date::parse_optional_date;

/// `access <module>`: exit status tells whether the current user may open it.
pub fn handle(module: &str, date: Option<&String>, ctx: &Context) -> AppResult<()> {
    let module =
        Module::from_code(module).ok_or_else(|| AppError::InvalidModule(module.to_string()))?;
    let as_of = parse_optional_date(date)
        .ok_or_else(|| AppError::InvalidDate(date.cloned().unwrap_or_default()))?;

    ctx.resolver.require(&ctx.identity, module, as_of)?;
    success(format!("Access to '{}' granted on {}", module.code(), as_of));
    Ok(())
}
