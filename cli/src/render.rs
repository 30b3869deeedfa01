use console::style;
use taskpilot_core::{AgentError, ChatMessage, RunOutcome};

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner() {
    println!("{}", rule());
    println!("{}", style("taskpilot").cyan().bold());
    println!("{}", rule());
    println!("Type 'exit', 'quit', or press Ctrl+D to exit.");
    println!("Enter your message to interact with the agent.");
    println!("{}", rule());
}

pub fn markdown(text: &str) {
    println!("\n{}", rule());
    termimad::MadSkin::default().print_text(text);
    println!("{}\n", rule());
}

pub fn reply(message: &ChatMessage) {
    if message.requested_tool_calls().is_empty() {
        markdown(message.text());
    } else {
        exhausted();
    }
}

pub fn outcome(outcome: &RunOutcome) {
    match outcome.answer() {
        Some(answer) => markdown(answer),
        None => exhausted(),
    }
}

fn exhausted() {
    eprintln!(
        "{}",
        style("Turn budget exhausted before the agent produced a final answer.").yellow()
    );
}

pub fn error(error: &AgentError) {
    failure(&error.to_string());
    if error.is_retryable() {
        eprintln!("{}", style("The request can be retried.").dim());
    }
}

pub fn failure(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}
