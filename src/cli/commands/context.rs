use clap::Subcommand;
use serde_json::json;

use crate::cli::config::open_session;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::console::TenantSelector;

#[derive(Subcommand)]
pub enum ContextCommands {
    #[command(about = "Show the tenant requests are sent for")]
    Current,

    #[command(about = "Adopt the logged-in user's own tenant")]
    Init,

    #[command(about = "Switch to a tenant by ID")]
    Use {
        #[arg(help = "Tenant ID")]
        id: i64,
    },

    #[command(about = "Pick a tenant interactively")]
    Select,

    #[command(about = "Forget the current tenant")]
    Clear,
}

pub async fn handle(cmd: ContextCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = open_session().await?;

    match cmd {
        ContextCommands::Current => output_current_tenant(&output_format, session.context.current_tenant().as_ref()),
        ContextCommands::Init => {
            let tenants = session.context.initialize_tenant_context().await;
            match tenants.first() {
                Some(tenant) => output_success(
                    &output_format,
                    &format!("Tenant context set to {} ({})", tenant.name, tenant.id),
                    Some(json!({ "current_tenant": tenant })),
                ),
                None => anyhow::bail!("No tenant available for the current user"),
            }
        }
        ContextCommands::Use { id } => {
            let mut selector = TenantSelector::new(session.api.clone(), session.context.clone(), Vec::new());
            selector.init().await;
            if let Some(error) = selector.error.take() {
                anyhow::bail!(error);
            }

            let tenant = selector
                .tenants
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Tenant {} is not available to you", id))?;
            selector.select_tenant(&tenant);

            let tenant = selector
                .confirm()
                .ok_or_else(|| anyhow::anyhow!("Tenant '{}' is inactive", tenant.name))?;
            output_success(
                &output_format,
                &format!("Switched to tenant {} ({})", tenant.name, tenant.id),
                Some(json!({ "current_tenant": tenant })),
            )
        }
        ContextCommands::Select => {
            let mut selector = TenantSelector::new(session.api.clone(), session.context.clone(), Vec::new());
            selector.init().await;
            if let Some(error) = selector.error.take() {
                anyhow::bail!(error);
            }

            println!("{}", selector.title);
            println!("{}", selector.message);
            for (index, tenant) in selector.tenants.iter().enumerate() {
                let status = if tenant.is_active { "" } else { " (inactive)" };
                println!("  {}. {} [{}]{}", index + 1, tenant.name, tenant.identifier, status);
            }

            let Some(choice) = choose_prompt("Tenant", selector.tenants.len())? else {
                selector.cancel();
                return output_success(&output_format, "Cancelled", None);
            };
            let picked = selector.tenants[choice].clone();
            selector.select_tenant(&picked);

            match selector.confirm() {
                Some(tenant) => output_success(
                    &output_format,
                    &format!("Switched to tenant {} ({})", tenant.name, tenant.id),
                    Some(json!({ "current_tenant": tenant })),
                ),
                None => anyhow::bail!("Tenant '{}' is inactive", picked.name),
            }
        }
        ContextCommands::Clear => {
            session.context.clear_tenant();
            output_success(&output_format, "Tenant context cleared", None)
        }
    }
}
