use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::config::open_session;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::TenantSession;
use crate::console::{Confirmation, FieldError, TenantEditDialog, TenantManagement, Toasts};
use crate::models::Tenant;

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List tenants")]
    List(ListArgs),

    #[command(about = "Show tenant details")]
    Show {
        #[arg(help = "Tenant ID")]
        id: i64,
    },

    #[command(about = "Create a tenant")]
    Create {
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "URL-safe identifier (lowercase letters, digits, hyphens)")]
        identifier: String,
        #[arg(long, help = "Create the tenant inactive")]
        inactive: bool,
    },

    #[command(about = "Update a tenant")]
    Update {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        identifier: Option<String>,
        #[arg(long, help = "true or false")]
        active: Option<bool>,
    },

    #[command(about = "Activate a tenant")]
    Activate {
        #[arg(help = "Tenant ID")]
        id: i64,
    },

    #[command(about = "Deactivate a tenant")]
    Deactivate {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Soft delete a tenant")]
    Delete {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(about = "Permanently delete a tenant")]
    HardDelete {
        #[arg(help = "Tenant ID")]
        id: i64,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
    #[arg(long, help = "Match name or identifier")]
    pub search: Option<String>,
    #[arg(long, conflicts_with = "inactive", help = "Only active tenants")]
    pub active: bool,
    #[arg(long, help = "Only inactive tenants")]
    pub inactive: bool,
}

impl ListArgs {
    fn status(&self) -> Option<bool> {
        match (self.active, self.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = open_session().await?;
    require_super_admin(&session).await?;

    let toasts = Toasts::new();
    let mut management = TenantManagement::new(session.api.clone(), toasts.clone());

    match cmd {
        TenantCommands::List(args) => {
            management.page = args.page.max(1);
            if let Some(page_size) = args.page_size {
                management.page_size = page_size;
            }
            management.search_filter = args.search.clone().unwrap_or_default();
            management.status_filter = args.status();

            management.init().await;
            fail_on_error_toast(&toasts)?;

            output_tenants(
                &output_format,
                &management.tenants,
                management.collection_size,
                session.context.current_tenant_id(),
            )
        }
        TenantCommands::Show { id } => {
            let tenant = session.api.get(id).await?;
            output_tenant(&output_format, &tenant)
        }
        TenantCommands::Create { name, identifier, inactive } => {
            let mut dialog = management.open_create_dialog();
            dialog.form.name.set(name);
            dialog.form.identifier.set(identifier);
            dialog.form.is_active.set(!inactive);

            let tenant = save_dialog(&mut dialog).await?;
            output_success(
                &output_format,
                &format!("Tenant '{}' created with ID {}", tenant.identifier, tenant.id),
                Some(json!({ "tenant": tenant })),
            )
        }
        TenantCommands::Update { id, name, identifier, active } => {
            let existing = session.api.get(id).await?;
            let mut dialog = management.open_edit_dialog(&existing);
            if let Some(name) = name {
                dialog.form.name.set(name);
            }
            if let Some(identifier) = identifier {
                dialog.form.identifier.set(identifier);
            }
            if let Some(active) = active {
                dialog.form.is_active.set(active);
            }

            let tenant = save_dialog(&mut dialog).await?;
            output_success(
                &output_format,
                &format!("Tenant {} updated", tenant.id),
                Some(json!({ "tenant": tenant })),
            )
        }
        TenantCommands::Activate { id } => {
            let tenant = session.api.get(id).await?;
            management.activate_tenant(&tenant).await;
            fail_on_error_toast(&toasts)?;
            output_success(&output_format, &format!("Tenant {} activated", id), None)
        }
        TenantCommands::Deactivate { id, yes } => {
            let tenant = session.api.get(id).await?;
            let confirmation = management.deactivate_tenant(&tenant);
            run_confirmed(&mut management, &toasts, confirmation, yes, &output_format).await
        }
        TenantCommands::Delete { id, yes } => {
            let tenant = session.api.get(id).await?;
            let confirmation = management.delete_tenant(&tenant);
            run_confirmed(&mut management, &toasts, confirmation, yes, &output_format).await
        }
        TenantCommands::HardDelete { id, yes } => hard_delete(&session, id, yes, &output_format).await,
    }
}

/// Submit the dialog, turning local validation and server errors into one message.
async fn save_dialog(dialog: &mut TenantEditDialog) -> anyhow::Result<Tenant> {
    if let Some(tenant) = dialog.save().await {
        return Ok(tenant);
    }

    if !dialog.form.is_valid() {
        let mut problems = Vec::new();
        if let Some(error) = dialog.form.name_error() {
            problems.push(format!("name: {}", describe(error)));
        }
        if let Some(error) = dialog.form.identifier_error() {
            problems.push(format!("identifier: {}", describe(error)));
        }
        anyhow::bail!("Invalid tenant: {}", problems.join("; "));
    }

    let message = dialog
        .error_message()
        .unwrap_or_else(|| "An error occurred".to_string());
    anyhow::bail!("{}: {}", dialog.title(), message)
}

fn describe(error: FieldError) -> &'static str {
    match error {
        FieldError::Required => "this field is required",
        FieldError::Pattern => "use lowercase letters, numbers and hyphens only",
    }
}

async fn run_confirmed(
    management: &mut TenantManagement,
    toasts: &Toasts,
    confirmation: Confirmation,
    yes: bool,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    if !yes {
        println!("{}", confirmation.title);
        println!("{}", confirmation.message);
        if !confirm_prompt(&confirmation.message_bold)? {
            return output_success(output_format, "Cancelled", None);
        }
    }

    let id = confirmation.tenant().id;
    let caption = confirmation.btn_caption.clone();
    management.confirm(confirmation).await;
    fail_on_error_toast(toasts)?;

    output_success(output_format, &format!("{} tenant {}: done", caption, id), None)
}

async fn hard_delete(session: &TenantSession, id: i64, yes: bool, output_format: &OutputFormat) -> anyhow::Result<()> {
    let tenant = session.api.get(id).await?;
    if !yes {
        let question = format!(
            "Permanently delete \"{}\"? This cannot be undone.",
            tenant.name
        );
        if !confirm_prompt(&question)? {
            return output_success(output_format, "Cancelled", None);
        }
    }

    session.api.hard_delete(id).await?;
    if session.context.current_tenant_id() == Some(id) {
        session.context.clear_tenant();
    }
    output_success(output_format, &format!("Tenant {} permanently deleted", id), None)
}
