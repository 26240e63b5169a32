//! Authentication commands.

use super::restore_session;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use opsdesk_auth::{LoginFlow, LoginStep};
use std::io::{self, Write};

/// Sign in with email and password.
pub async fn login(format: &OutputFormat) -> Result<()> {
    let session = restore_session().await?;

    if let Some(identity) = session.identity() {
        output::print_success(&format!("Already logged in as {}", identity.email), format);
        return Ok(());
    }

    let mut flow = LoginFlow::new(session.clone());

    while !flow.step().is_terminal() {
        match flow.step() {
            LoginStep::Email => {
                let email = prompt("Email: ")?;
                if email.is_empty() {
                    output::print_error("Email is required", format);
                    continue;
                }
                flow.set_email(&email);
                flow.submit_email().await;
            }
            LoginStep::Password => {
                let password =
                    rpassword::prompt_password("Password (empty to go back): ")?;
                if password.is_empty() {
                    flow.back();
                    continue;
                }
                flow.set_password(&password);
                flow.submit_password().await;
            }
            LoginStep::CreatePassword => {
                println!("An account was created for you. Set a password to continue.");
                let password =
                    rpassword::prompt_password("New password (empty to go back): ")?;
                if password.is_empty() {
                    flow.back();
                    continue;
                }
                let confirm = rpassword::prompt_password("Confirm password: ")?;
                flow.set_password(&password);
                flow.set_confirm_password(&confirm);
                flow.submit_create_password().await;
            }
            LoginStep::Complete => break,
        }

        if let Some(message) = flow.error() {
            output::print_error(message, format);
        }
    }

    match session.identity() {
        Some(identity) => {
            output::print_success(&format!("Logged in as {}", identity.email), format);
        }
        None => {
            output::print_error("Login did not complete", format);
        }
    }

    Ok(())
}

/// Sign out and clear the local session.
pub async fn logout(format: &OutputFormat) -> Result<()> {
    let session = restore_session().await?;

    if !session.is_authenticated() {
        output::print_success("Not logged in", format);
        return Ok(());
    }

    session.sign_out().await?;
    output::print_success("Logged out successfully", format);

    Ok(())
}

/// Show authentication status.
pub async fn status(format: &OutputFormat) -> Result<()> {
    let session = restore_session().await?;

    match (session.identity(), session.user_view()) {
        (Some(identity), Some(view)) => match format {
            OutputFormat::Text => {
                output::print_row("Auth", "logged in");
                output::print_row("User ID", &identity.id);
                output::print_row("Email", &identity.email);
                output::print_row(
                    "Name",
                    &format!("{} {}", view.profile.first_name, view.profile.last_name),
                );
                output::print_row("Role", &view.role);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "logged_in": true,
                    "user_id": identity.id,
                    "email": identity.email,
                    "role": view.role,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        },
        _ => match format {
            OutputFormat::Text => {
                output::print_row("Auth", "not logged in");
            }
            OutputFormat::Json => {
                println!(r#"{{"logged_in":false}}"#);
            }
        },
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
