use crate::render;
use anyhow::{Context, Result};
use console::style;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::Path;
use taskpilot_core::Agent;
use tracing::warn;

const PROMPT: &str = "\nYou: ";

fn ensure_history_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::write(path, "")
            .with_context(|| format!("Failed to create history file {}", path.display()))?;
    }
    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}

pub async fn run(mut agent: Agent, history_path: &Path, history_size: usize) -> Result<()> {
    let editor_config = EditorConfig::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = expand_home(history_path);
    match ensure_history_file(&history_path) {
        Ok(()) => {
            if let Err(e) = editor.load_history(&history_path) {
                warn!(path = %history_path.display(), error = %e, "Could not load history");
            }
        }
        Err(e) => warn!(error = %e, "History disabled"),
    }

    render::banner();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if is_exit_command(input) {
                    println!("Goodbye!");
                    break;
                }

                if let Err(e) = editor.add_history_entry(input) {
                    warn!(error = %e, "Could not record history entry");
                }

                println!("\n{}", style("Agent is thinking...").dim());
                match agent.send_message(input).await {
                    Ok(reply) => render::reply(&reply),
                    Err(e) => render::error(&e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nOperation interrupted. Type 'exit' to quit.");
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => {
                save_history(&mut editor, &history_path);
                return Err(e.into());
            }
        }
    }

    save_history(&mut editor, &history_path);
    Ok(())
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Err(e) = editor.save_history(path) {
        warn!(path = %path.display(), error = %e, "Could not save history");
    }
}

fn expand_home(path: &Path) -> std::path::PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
