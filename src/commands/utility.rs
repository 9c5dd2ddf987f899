//! Utility command handlers (config file).

use super::{CommandResult, Context};

/// Print the effective configuration as TOML
pub fn config_show(ctx: &Context) -> CommandResult {
    println!("# {}", ctx.config_path.display());
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

/// Write the default configuration file
pub fn config_init(ctx: &Context, force: bool) -> CommandResult {
    if ctx.config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            ctx.config_path.display()
        );
    }
    virt_driver::DriverConfig::default().save(&ctx.config_path)?;
    println!("Wrote {}", ctx.config_path.display());
    Ok(())
}
