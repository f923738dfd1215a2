use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::console::{GuardDecision, SuperAdminGuard, Toast, ToastLevel, Toasts};
use crate::client::TenantSession;
use crate::models::Tenant;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

pub fn output_tenants(output_format: &OutputFormat, tenants: &[Tenant], count: u64, current: Option<i64>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "count": count, "results": tenants }))?
            );
        }
        OutputFormat::Text => {
            if tenants.is_empty() {
                println!("No tenants found");
                return Ok(());
            }
            println!("{:<7} {:<30} {:<25} {}", "ID", "NAME", "IDENTIFIER", "STATUS");
            println!("{}", "-".repeat(72));
            for tenant in tenants {
                let marker = if current == Some(tenant.id) { "*" } else { " " };
                println!(
                    "{}{:<6} {:<30} {:<25} {}",
                    marker,
                    tenant.id,
                    tenant.name,
                    tenant.identifier,
                    status_label(tenant)
                );
            }
            println!("\n{} tenant(s) total", count);
        }
    }
    Ok(())
}

pub fn output_tenant(output_format: &OutputFormat, tenant: &Tenant) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tenant)?),
        OutputFormat::Text => {
            println!("ID:         {}", tenant.id);
            println!("Name:       {}", tenant.name);
            println!("Identifier: {}", tenant.identifier);
            println!("Status:     {}", status_label(tenant));
            if let Some(created_at) = tenant.created_at {
                println!("Created:    {}", created_at.format("%Y-%m-%d %H:%M"));
            }
        }
    }
    Ok(())
}

/// Print the current tenant, or that there is none.
pub fn output_current_tenant(output_format: &OutputFormat, tenant: Option<&Tenant>) -> anyhow::Result<()> {
    match (output_format, tenant) {
        (OutputFormat::Json, _) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "current_tenant": tenant }))?);
        }
        (OutputFormat::Text, Some(tenant)) => {
            println!("Current tenant: {} ({})", tenant.name, tenant.id);
        }
        (OutputFormat::Text, None) => println!("No current tenant set"),
    }
    Ok(())
}

fn status_label(tenant: &Tenant) -> &'static str {
    if tenant.is_active {
        "active"
    } else {
        "inactive"
    }
}

/// Fail with the last error toast, if one was shown.
pub fn fail_on_error_toast(toasts: &Toasts) -> anyhow::Result<()> {
    match toasts.last() {
        Some(Toast {
            level: ToastLevel::Error,
            message,
        }) => Err(anyhow::anyhow!(message)),
        _ => Ok(()),
    }
}

/// Super admin screens are refused the same way the console redirects.
pub async fn require_super_admin(session: &TenantSession) -> anyhow::Result<()> {
    match SuperAdminGuard::check(session.api.as_ref()).await {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(_) => Err(anyhow::anyhow!("Super admin access required")),
    }
}

/// Ask a yes/no question on stdin; anything but "y"/"yes" declines.
pub fn confirm_prompt(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Ask for a 1-based choice among `count` items.
pub fn choose_prompt(question: &str, count: usize) -> anyhow::Result<Option<usize>> {
    print!("{} [1-{}] ", question, count);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1))
}
