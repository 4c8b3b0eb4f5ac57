use super::ui;
use crate::controller::Controller;
use crate::core::session::{OAuthProvider, User};
use crate::core::validation::{LoginForm, SignupForm};
use crate::core::view::{View, ViewEvent};
use anyhow::Result;

/// Opens the sign-in form, then submits it.
pub async fn login(
    controller: &mut Controller,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    controller.dispatch(ViewEvent::ShowSignIn);
    submit_login(controller, email, password).await
}

pub async fn submit_login(
    controller: &mut Controller,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    if let Err(notification) = controller.auth_form_ready(&[View::SignIn]) {
        ui::print_notification(&notification);
        return Ok(());
    }
    let form = LoginForm {
        email: ui::prompt_or(email, "Email")?,
        password: ui::prompt_secret_or(password, "Password")?,
    };

    let notification = ui::with_spinner("Signing in...", controller.login(&form)).await;
    ui::print_notification(&notification);
    Ok(())
}

/// Values given on the command line; anything missing is prompted for.
pub struct SignupArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub agree_terms: Option<bool>,
}

/// Opens the sign-up form, then submits it.
pub async fn signup(controller: &mut Controller, args: SignupArgs) -> Result<()> {
    controller.dispatch(ViewEvent::ShowSignUp);
    submit_signup(controller, args).await
}

pub async fn submit_signup(controller: &mut Controller, args: SignupArgs) -> Result<()> {
    if let Err(notification) = controller.auth_form_ready(&[View::SignUp]) {
        ui::print_notification(&notification);
        return Ok(());
    }
    let name = ui::prompt_or(args.name, "Full name")?;
    let email = ui::prompt_or(args.email, "Email")?;
    let (password, confirm_password) = match args.password {
        Some(p) => (p.clone(), p),
        None => (
            ui::prompt_secret_or(None, "Password")?,
            ui::prompt_secret_or(None, "Confirm password")?,
        ),
    };
    let form = SignupForm {
        name,
        email,
        password,
        confirm_password,
        agreed_to_terms: ui::confirm_or(args.agree_terms, "Agree to the terms and conditions?")?,
    };

    let notification = ui::with_spinner("Creating account...", controller.signup(&form)).await;
    ui::print_notification(&notification);
    Ok(())
}

pub async fn oauth(controller: &mut Controller, provider: OAuthProvider) -> Result<()> {
    controller.dispatch(ViewEvent::ShowSignIn);
    submit_oauth(controller, provider).await
}

pub async fn submit_oauth(controller: &mut Controller, provider: OAuthProvider) -> Result<()> {
    let message = format!("Signing in with {provider}...");
    let notification = ui::with_spinner(&message, controller.oauth(provider)).await;
    ui::print_notification(&notification);
    Ok(())
}

pub fn logout(controller: &mut Controller) {
    let notification = controller.logout();
    ui::print_notification(&notification);
}

pub fn format_user(user: &User) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Field"), ui::header_cell("Value")]);
    table.add_row(vec!["Name", user.name.as_str()]);
    table.add_row(vec!["Email", user.email.as_str()]);
    table.add_row(vec!["Id", user.id.as_str()]);
    if let Some(provider) = user.provider {
        table.add_row(vec!["Provider".to_string(), format!("{provider:?}")]);
    }
    if let Some(avatar) = &user.avatar {
        table.add_row(vec!["Avatar", avatar.as_str()]);
    }
    table.to_string()
}

pub fn whoami(controller: &Controller) {
    match controller.current_user() {
        Some(user) => println!(
            "{}\n\n{}",
            ui::style_text(&format!("Welcome, {}", user.name), ui::StyleType::Title),
            format_user(&user)
        ),
        None if controller.is_authenticated() => println!(
            "{}",
            ui::style_text("Signed in, but no profile is stored", ui::StyleType::Subtle)
        ),
        None => println!("{}", ui::style_text("Not signed in", ui::StyleType::Subtle)),
    }
}
