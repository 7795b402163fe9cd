use clap::Subcommand;
use serde_json::json;

use crate::cli::config::ConsoleEnv;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::pages::{DashboardPage, MountOutcome};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List all users")]
    List,

    #[command(about = "Create a user")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (optional)")]
        password: Option<String>,
    },

    #[command(about = "Edit a user; omitted fields keep their current value")]
    Edit {
        #[arg(help = "User ID")]
        id: i64,
        #[arg(long, help = "New username")]
        username: Option<String>,
        #[arg(long, help = "New email")]
        email: Option<String>,
        #[arg(long, help = "New password (unchanged if omitted)")]
        password: Option<String>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User ID")]
        id: i64,
    },
}

/// Mount the dashboard, failing when there is no session.
async fn open_dashboard(env: &ConsoleEnv) -> anyhow::Result<DashboardPage> {
    let mut page = DashboardPage::new(env.context.clone());
    match page.mount().await? {
        MountOutcome::Ready => Ok(page),
        MountOutcome::Unauthenticated => {
            anyhow::bail!("Not logged in. Run `admin auth login <username>` first.")
        }
    }
}

pub async fn handle(
    cmd: UserCommands,
    env: &ConsoleEnv,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List => {
            let page = open_dashboard(env).await?;
            output_users(&output_format, page.users())
        }
        UserCommands::Add { username, email, password } => {
            let mut page = open_dashboard(env).await?;
            page.set_username(username);
            page.set_email(email);
            page.set_password(password.unwrap_or_default());
            page.submit().await?;

            let added = page.users().last().cloned();
            output_success(
                &output_format,
                &format!(
                    "User '{}' added",
                    added.as_ref().map(|u| u.username.as_str()).unwrap_or_default()
                ),
                Some(json!({ "user": added })),
            )
        }
        UserCommands::Edit { id, username, email, password } => {
            let mut page = open_dashboard(env).await?;
            if !page.begin_edit_by_id(id) {
                anyhow::bail!("User {} not found", id);
            }

            if let Some(username) = username {
                page.set_username(username);
            }
            if let Some(email) = email {
                page.set_email(email);
            }
            if let Some(password) = password {
                page.set_password(password);
            }
            page.submit().await?;

            let updated = page.users().iter().find(|u| u.id == id).cloned();
            output_success(
                &output_format,
                &format!("User {} updated", id),
                Some(json!({ "user": updated })),
            )
        }
        UserCommands::Delete { id } => {
            let mut page = open_dashboard(env).await?;
            page.delete_user(id).await?;
            output_success(
                &output_format,
                &format!("User {} deleted", id),
                Some(json!({ "id": id })),
            )
        }
    }
}
