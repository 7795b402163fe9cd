use clap::Subcommand;
use serde_json::json;

use crate::cli::config::ConsoleEnv;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::navigation::Route;
use crate::pages::{DashboardPage, LoginPage, RegisterPage};
use crate::session::SessionStore;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout (forgets the stored token)")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(
    cmd: AuthCommands,
    env: &ConsoleEnv,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = resolve_password(password, "Password")?;

            let mut page = LoginPage::new(env.context.clone());
            page.set_username(username.as_str());
            page.set_password(password);
            page.submit().await?;

            if !env.landed_on(Route::Dashboard) {
                anyhow::bail!("login did not complete");
            }

            output_success(
                &output_format,
                &format!("Logged in as '{}'", username),
                Some(json!({ "username": username })),
            )
        }
        AuthCommands::Register { username, email, password } => {
            let password = resolve_password(password, "Password")?;

            let mut page = RegisterPage::new(env.context.clone());
            page.set_username(username.as_str());
            page.set_email(email.as_str());
            page.set_password(password);
            page.submit().await?;

            if let (OutputFormat::Text, Some(view)) = (&output_format, page.popup()) {
                println!("{}", view);
            }

            page.complete_redirect().await?;

            output_success(
                &output_format,
                &format!("Registered '{}'; you can now log in", username),
                Some(json!({ "username": username, "email": email })),
            )
        }
        AuthCommands::Logout => {
            let mut page = DashboardPage::new(env.context.clone());
            page.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let logged_in = env.session.get_token()?.is_some();
            let since = env.session.token_updated_at()?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "logged_in": logged_in,
                            "since": since,
                            "storage": env.session.path().display().to_string(),
                        }))?
                    );
                }
                OutputFormat::Text => match since {
                    Some(since) if logged_in => {
                        println!("Logged in (token stored {})", since.format("%Y-%m-%d %H:%M"));
                    }
                    _ => println!("Not logged in"),
                },
            }
            Ok(())
        }
    }
}
