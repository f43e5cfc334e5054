use std::{future::Future, sync::Arc};

use anyhow::Result;
use poll::{
    api::ApiClient,
    controller::{Controller, Outcome},
    entry::Entry,
    error::WizardError,
    state::State,
    views,
    wizard::{Step, Wizard},
};
use tracing::debug;

use crate::prompt::{Prompt, spinner, with_spinner};

const HELP: &str = "Commands: back, reset, dismiss, quit";

enum Flow {
    Continue,
    Quit,
}

pub async fn run(state: Arc<State>, poll_id: &str) -> Result<()> {
    let backend = Arc::new(state.client.clone());
    let mut prompt = Prompt::new();

    let wizard = loop {
        let entry = with_spinner("Loading poll...", Entry::load(backend.as_ref(), poll_id)).await;

        match entry {
            Entry::Ready(wizard) => break wizard,
            Entry::NotFound => {
                println!("{}", views::not_found());
                return Ok(());
            }
            Entry::Inactive(poll) => {
                println!("{}", views::inactive(&poll, &state.config.public_url));
                return Ok(());
            }
            Entry::Failed(message) => {
                println!("{}", views::load_failed(&message));
                if prompt.ask("> ").await?.as_deref() != Some("retry") {
                    return Ok(());
                }
            }
        }
    };

    println!("{}", wizard.poll().title);
    println!("{HELP}");

    let controller = Controller::new(wizard, backend);

    loop {
        let wizard = controller.snapshot();

        println!("\n{}", views::step_header(wizard.step()));
        if let Some(banner) = views::error_banner(wizard.error()) {
            println!("{banner}");
        }

        let flow = match wizard.step() {
            Step::Info => info_step(&controller, &mut prompt, &wizard).await?,
            Step::Otp => otp_step(&controller, &mut prompt, &wizard).await?,
            Step::Vote => vote_step(&controller, &mut prompt, &wizard).await?,
            Step::Results => results_step(&controller, &mut prompt, &wizard).await?,
        };

        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

/// Handles the inputs that work on every step.
fn command(controller: &Controller<ApiClient>, input: &str) -> Option<Flow> {
    match input {
        "quit" | "exit" => Some(Flow::Quit),
        "back" => {
            if controller.back().is_err() {
                println!("Nothing to go back to.");
            }
            Some(Flow::Continue)
        }
        "reset" => {
            controller.reset();
            Some(Flow::Continue)
        }
        "dismiss" => {
            controller.update(Wizard::dismiss_error);
            Some(Flow::Continue)
        }
        _ => None,
    }
}

fn report(controller: &Controller<ApiClient>, error: WizardError) {
    // Failures that already set the banner show up on the next render.
    let shown = controller.snapshot().error() == Some(error.to_string().as_str());
    if !shown {
        println!("! {error}");
    }
}

/// Runs a request in the background while still listening for `back`,
/// `reset` and `quit`. Whatever the request returns after one of those is
/// dropped by the wizard.
async fn submit<F, Fut>(
    controller: &Controller<ApiClient>,
    prompt: &mut Prompt,
    message: &str,
    action: F,
) -> Result<Flow>
where
    F: FnOnce(Controller<ApiClient>) -> Fut,
    Fut: Future<Output = Result<Outcome, WizardError>> + Send + 'static,
{
    let mut task = tokio::spawn(action(controller.clone()));
    let pb = spinner(message);

    let joined = loop {
        tokio::select! {
            joined = &mut task => break joined,
            line = prompt.line() => {
                let Some(input) = line? else {
                    pb.finish_and_clear();
                    return Ok(Flow::Quit);
                };

                if matches!(input.as_str(), "back" | "reset" | "quit" | "exit") {
                    pb.finish_and_clear();
                    return Ok(command(controller, &input).unwrap_or(Flow::Continue));
                }

                pb.println("Request in progress, please wait...");
            }
        }
    };
    pb.finish_and_clear();

    match joined? {
        Ok(Outcome::Applied) => {}
        Ok(Outcome::Discarded) => debug!("Response arrived after the wizard moved on"),
        Err(e) => report(controller, e),
    }

    Ok(Flow::Continue)
}

async fn info_step(
    controller: &Controller<ApiClient>,
    prompt: &mut Prompt,
    wizard: &Wizard,
) -> Result<Flow> {
    let voter = wizard.voter();

    let Some(name) = prompt.ask(&format!("Full name [{}]: ", voter.name)).await? else {
        return Ok(Flow::Quit);
    };
    if let Some(flow) = command(controller, &name) {
        return Ok(flow);
    }

    let Some(email) = prompt.ask(&format!("Email address [{}]: ", voter.email)).await? else {
        return Ok(Flow::Quit);
    };
    if let Some(flow) = command(controller, &email) {
        return Ok(flow);
    }

    let edited = controller.update(|wizard| {
        if !name.is_empty() {
            wizard.set_name(&name)?;
        }
        if !email.is_empty() {
            wizard.set_email(&email)?;
        }
        Ok::<_, WizardError>(())
    });
    if let Err(e) = edited {
        report(controller, e);
        return Ok(Flow::Continue);
    }

    submit(controller, prompt, "Sending code...", |c| async move {
        c.submit_info().await
    })
    .await
}

async fn otp_step(
    controller: &Controller<ApiClient>,
    prompt: &mut Prompt,
    wizard: &Wizard,
) -> Result<Flow> {
    println!("{}", views::code_sent(wizard));

    let Some(code) = prompt.ask("Code: ").await? else {
        return Ok(Flow::Quit);
    };
    if let Some(flow) = command(controller, &code) {
        return Ok(flow);
    }

    if let Err(e) = controller.update(|wizard| wizard.set_code(&code)) {
        report(controller, e);
        return Ok(Flow::Continue);
    }

    submit(controller, prompt, "Verifying...", |c| async move {
        c.submit_code().await
    })
    .await
}

async fn vote_step(
    controller: &Controller<ApiClient>,
    prompt: &mut Prompt,
    wizard: &Wizard,
) -> Result<Flow> {
    print!("{}", views::ballot(wizard));

    if wizard.has_voted_conflict() {
        println!("Enter 'reset' to start over or 'quit' to exit.");
        let Some(input) = prompt.ask("> ").await? else {
            return Ok(Flow::Quit);
        };
        return Ok(command(controller, &input).unwrap_or(Flow::Continue));
    }

    let count = wizard.poll().options.len();
    let Some(choice) = prompt.ask(&format!("Choose an option (1-{count}): ")).await? else {
        return Ok(Flow::Quit);
    };
    if let Some(flow) = command(controller, &choice) {
        return Ok(flow);
    }

    let picked = choice
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| wizard.poll().options.get(index))
        .map(|option| option.id.clone());

    if let Some(option_id) = picked {
        if let Err(e) = controller.update(|wizard| wizard.select_option(&option_id)) {
            report(controller, e);
            return Ok(Flow::Continue);
        }
    } else if !choice.is_empty() {
        println!("! Enter a number between 1 and {count}.");
        return Ok(Flow::Continue);
    }

    submit(controller, prompt, "Submitting vote...", |c| async move {
        c.submit_vote().await
    })
    .await
}

async fn results_step(
    controller: &Controller<ApiClient>,
    prompt: &mut Prompt,
    wizard: &Wizard,
) -> Result<Flow> {
    println!("{}", views::results(wizard));

    if wizard.error().is_some() {
        println!("Enter 'retry' to reload the results.");
    }
    println!("Enter 'reset' to start over or 'quit' to exit.");

    let Some(input) = prompt.ask("> ").await? else {
        return Ok(Flow::Quit);
    };

    if input == "retry" {
        return submit(controller, prompt, "Loading results...", |c| async move {
            c.reload_results().await
        })
        .await;
    }

    Ok(command(controller, &input).unwrap_or(Flow::Continue))
}
