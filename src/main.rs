use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::path::PathBuf;
use std::process;
use todostore::{Backend, Config, Filter, IdStrategy, Provider, TodoStore, render};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Todo list with local key-value persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/todostore/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the stored todos (overrides the config file)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Storage backend: file or sqlite (overrides the config file)
    #[arg(short, long)]
    backend: Option<Backend>,

    /// Id strategy for new todos: uuid or timestamp (overrides the config file)
    #[arg(long)]
    id_strategy: Option<IdStrategy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a todo
    Add {
        /// Todo text (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Toggle a todo between active and completed
    Toggle { id: String },

    /// Delete a todo
    Delete { id: String },

    /// Remove all completed todos
    ClearCompleted,

    /// List todos, newest first
    List {
        /// Which todos to show: all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Show counts
    Stats,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Setup tracing on stderr so it never mixes with list output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(store_path) = cli.store_path {
        config.store_path = store_path;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(id_strategy) = cli.id_strategy {
        config.id_strategy = id_strategy;
    }

    let provider = config.open_provider()?;
    let mut store = TodoStore::open_with(provider, config.store_options());

    match cli.command {
        Commands::Add { text } => match store.add(&text.join(" "))? {
            Some(id) => println!("Added {}", id),
            None => println!("Nothing to add"),
        },
        Commands::Toggle { id } => {
            if store.toggle(&id)?.is_changed() {
                print_todo(&store, &id);
            } else {
                println!("No todo with id {}", id);
            }
        }
        Commands::Delete { id } => {
            if store.delete(&id)?.is_changed() {
                println!("Deleted {}", id);
            } else {
                println!("No todo with id {}", id);
            }
        }
        Commands::ClearCompleted => {
            let removed = store.clear_completed()?;
            println!("Removed {} completed task{}", removed, if removed == 1 { "" } else { "s" });
        }
        Commands::List { filter } => {
            let _ = store.set_filter(filter.parse::<Filter>()?);
            for line in render::view_lines(&store.view(), store.filter()) {
                println!("{}", line);
            }
            println!();
            print_footer(&store);
        }
        Commands::Stats => {
            let stats = store.stats();
            println!("total:     {}", stats.total);
            println!("active:    {}", stats.active);
            println!("completed: {}", stats.completed);
            println!();
            print_footer(&store);
        }
    }

    Ok(())
}

fn print_todo<P: Provider>(store: &TodoStore<P>, id: &str) {
    if let Some(todo) = store.get(id) {
        println!("{}", render::todo_line(todo));
    }
}

fn print_footer<P: Provider>(store: &TodoStore<P>) {
    for line in render::footer_lines(&store.stats()) {
        println!("{}", line);
    }
}
