use anyhow::Result;
use console::style;
use dialoguer::{Input, Password, Select};
use taskpilot_core::{AVAILABLE_PROVIDERS, Config, DEFAULT_OBJECTIVE};

const TOTAL_STEPS: usize = 4;

fn print_step(step: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, TOTAL_STEPS, title))
            .cyan()
            .bold()
    );
    println!();
}

fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "openrouter" => "openai/gpt-4o-mini",
        "ollama" => "llama3.1",
        _ => "gpt-4o-mini",
    }
}

pub fn run_init() -> Result<Config> {
    println!("{}", style("taskpilot setup").cyan().bold());

    print_step(1, "Provider");
    let selection = Select::new()
        .with_prompt("Which chat-completion provider should the agent use?")
        .items(AVAILABLE_PROVIDERS)
        .default(0)
        .interact()?;
    let provider = AVAILABLE_PROVIDERS[selection];

    print_step(2, "Model");
    let model: String = Input::new()
        .with_prompt("Model")
        .default(default_model_for(provider).to_string())
        .interact_text()?;

    print_step(3, "API key");
    println!(
        "{}",
        style("Leave empty to read the key from the provider's environment variable.").dim()
    );
    let api_key = Password::new()
        .with_prompt("API key")
        .allow_empty_password(true)
        .interact()?;

    print_step(4, "Objective");
    let objective: String = Input::new()
        .with_prompt("What should the agent work towards?")
        .default(DEFAULT_OBJECTIVE.to_string())
        .interact_text()?;

    println!();
    println!("{}", style("Setup complete.").green().bold());

    Ok(Config {
        provider: Some(provider.to_string()),
        api_key,
        model,
        objective,
        ..Config::default()
    })
}
