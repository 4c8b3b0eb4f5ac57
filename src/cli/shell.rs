//! Interactive loop over the view controller.

use super::{auth, funds, saved, ui};
use crate::controller::Controller;
use crate::core::session::OAuthProvider;
use crate::core::view::{View, ViewEvent};
use anyhow::{Result, anyhow, bail};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    Start,
    SignIn,
    SignUp,
    Login { email: Option<String> },
    Register,
    OAuth(OAuthProvider),
    Logout,
    WhoAmI,
    Search(String),
    Fund(String),
    Save(String),
    Remove(String),
    Saved { refresh: bool },
}

fn required_arg(arg: &str, usage: &str) -> Result<String> {
    if arg.is_empty() {
        bail!("Usage: {usage}");
    }
    Ok(arg.to_string())
}

pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "start" => ShellCommand::Start,
        "signin" => ShellCommand::SignIn,
        "signup" => ShellCommand::SignUp,
        "login" => ShellCommand::Login {
            email: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "register" => ShellCommand::Register,
        "oauth" => ShellCommand::OAuth(required_arg(rest, "oauth <google|github>")?.parse()?),
        "logout" => ShellCommand::Logout,
        "whoami" => ShellCommand::WhoAmI,
        "search" => ShellCommand::Search(rest.to_string()),
        "fund" => ShellCommand::Fund(required_arg(rest, "fund <scheme code>")?),
        "save" => ShellCommand::Save(required_arg(rest, "save <scheme code>")?),
        "remove" => ShellCommand::Remove(required_arg(rest, "remove <scheme code>")?),
        "saved" => ShellCommand::Saved {
            refresh: rest == "--refresh",
        },
        "" => return Err(anyhow!("Type `help` to list commands")),
        other => return Err(anyhow!("Unknown command: {other}")),
    };
    Ok(command)
}

fn view_label(view: View) -> &'static str {
    match view {
        View::Welcome => "welcome",
        View::SignIn => "sign-in",
        View::SignUp => "sign-up",
        View::Dashboard => "dashboard",
    }
}

fn help_text(view: View) -> String {
    let screen = match view {
        View::Welcome => "  start | signin | signup       open the sign-in or sign-up form",
        View::SignIn => {
            "  login [email]                 sign in (demo@fundwise.com / password123)\n  oauth <google|github>         sign in with a provider\n  signup                        switch to the sign-up form"
        }
        View::SignUp => {
            "  register                      create an account\n  oauth <google|github>         sign up with a provider\n  signin                        switch to the sign-in form"
        }
        View::Dashboard => "  whoami                        show your profile\n  logout                        sign out",
    };
    format!(
        "{screen}\n  search [query]                find funds by name\n  fund <code>                   show fund details\n  save <code> | remove <code>   manage saved funds\n  saved [--refresh]             list saved funds\n  help | quit"
    )
}

async fn execute(controller: &mut Controller, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Help => println!("{}", help_text(controller.view())),
        ShellCommand::Quit => {}
        ShellCommand::Start => {
            controller.dispatch(ViewEvent::GetStarted);
        }
        ShellCommand::SignIn => {
            controller.dispatch(ViewEvent::ShowSignIn);
        }
        ShellCommand::SignUp => {
            controller.dispatch(ViewEvent::ShowSignUp);
        }
        ShellCommand::Login { email } => auth::submit_login(controller, email, None).await?,
        ShellCommand::Register => {
            let args = auth::SignupArgs {
                name: None,
                email: None,
                password: None,
                agree_terms: None,
            };
            auth::submit_signup(controller, args).await?
        }
        ShellCommand::OAuth(provider) => auth::submit_oauth(controller, provider).await?,
        ShellCommand::Logout => auth::logout(controller),
        ShellCommand::WhoAmI => auth::whoami(controller),
        ShellCommand::Search(query) => funds::search(controller, &query).await?,
        ShellCommand::Fund(code) => funds::show(controller, &code).await?,
        ShellCommand::Save(code) => funds::save(controller, &code).await?,
        ShellCommand::Remove(code) => funds::remove(controller, &code),
        ShellCommand::Saved { refresh } => saved::run(controller, refresh).await?,
    }
    Ok(())
}

pub async fn run(controller: &mut Controller) -> Result<()> {
    println!(
        "{}\n{}",
        ui::style_text("FundWise", ui::StyleType::Title),
        ui::style_text("Discover, view and bookmark mutual funds", ui::StyleType::Subtle)
    );
    println!("{}", help_text(controller.view()));

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        let view = controller.view();
        eprint!("{} > ", view_label(view));
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }

        execute(controller, command).await?;
        if controller.view() != view {
            ui::print_separator();
            println!("{}", help_text(controller.view()));
        }
    }
    Ok(())
}
