use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_tutor::app::App;
use git_tutor::config::TutorConfig;
use git_tutor::persist::store::FileStore;

/// Interactive Git tutorial on a simulated repository.
#[derive(Debug, Parser)]
#[command(name = "git-tutor", version, about)]
struct Cli {
    /// Override the state file location.
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Run without reading or writing any saved state.
    #[arg(long)]
    no_save: bool,

    /// Run commands from a file instead of the interactive prompt.
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = TutorConfig::load()?;
    if let Some(path) = cli.state_file {
        config.state_path = path;
    }

    let mut app = if cli.no_save {
        App::new()
    } else {
        App::with_store(Box::new(FileStore::new(&config.state_path)), config.autosave)?
    };

    match cli.script {
        Some(path) => run_script(&mut app, &path),
        None => run_interactive(&mut app, &config.prompt),
    }
}

fn run_script(app: &mut App, path: &PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let outcome = app.run_command(line);
        print_outcome(&outcome.result.stdout, &outcome.result.stderr, &outcome.notes);
    }
    Ok(())
}

fn run_interactive(app: &mut App, prompt: &str) -> Result<()> {
    println!("Welcome to Git Tutor. Type 'help' for commands, 'lessons' to begin.");
    for line in app.current_step_lines() {
        println!("{line}");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();

        match trimmed {
            "" => continue,
            "exit" | "quit" => break,
            "clear" => {
                // The engine treats clear as a no-op; the screen is ours.
                print!("\x1b[2J\x1b[H");
                continue;
            }
            "lessons" => {
                for l in app.lesson_overview() {
                    println!("{l}");
                }
                continue;
            }
            "step" => {
                for l in app.current_step_lines() {
                    println!("{l}");
                }
                continue;
            }
            "badges" => {
                for l in app.badge_overview() {
                    println!("{l}");
                }
                continue;
            }
            "reset" => {
                if app.reset_step() {
                    println!("Repository restored to the current step's checkpoint.");
                } else {
                    println!("Nothing to reset.");
                }
                continue;
            }
            _ => {}
        }

        if let Some(id) = trimmed.strip_prefix("lesson ") {
            match app.activate_lesson(id.trim()) {
                Ok(intro) => {
                    for l in intro {
                        println!("{l}");
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
            continue;
        }
        if trimmed == "quiz" {
            for l in app.quiz_lines() {
                println!("{l}");
            }
            continue;
        }
        if let Some(answer) = trimmed.strip_prefix("quiz ") {
            match answer.trim().parse::<usize>() {
                Ok(choice) => {
                    for l in app.answer_quiz(choice) {
                        println!("{l}");
                    }
                }
                Err(_) => eprintln!("usage: quiz <number>"),
            }
            continue;
        }
        if let Some(path) = trimmed.strip_prefix("edit ") {
            let content = read_editor_buffer(&mut lines, path.trim())?;
            let outcome = app.apply_edit(path.trim(), &content);
            print_outcome(&outcome.result.stdout, &outcome.result.stderr, &outcome.notes);
            continue;
        }

        let outcome = app.run_command(trimmed);
        print_outcome(&outcome.result.stdout, &outcome.result.stderr, &outcome.notes);
    }
    Ok(())
}

/// Minimal inline editor: read lines until a single `.` on its own line.
fn read_editor_buffer(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    path: &str,
) -> Result<String> {
    println!("Editing {path}; finish with a single '.' on its own line.");
    let mut buffer = Vec::new();
    for line in lines.by_ref() {
        let line = line?;
        if line == "." {
            break;
        }
        buffer.push(line);
    }
    Ok(buffer.join("\n"))
}

fn print_outcome(stdout: &[String], stderr: &[String], notes: &[String]) {
    for line in stdout {
        println!("{line}");
    }
    for line in stderr {
        eprintln!("{line}");
    }
    for line in notes {
        println!("{line}");
    }
}
