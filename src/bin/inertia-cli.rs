use clap::{Parser, Subcommand};
use url::Url;

use inertia_server::client::{Navigator, Outcome, Visit};

#[derive(Parser)]
#[command(name = "inertia-cli")]
#[command(about = "Navigate an inertia-server and print page objects", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Visit a path and print the resulting page object
    Visit {
        path: String,
        /// Partial reload keeping only these props (comma separated)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
        /// Replace the history entry instead of pushing
        #[arg(long)]
        replace: bool,
    },
    /// Search the user directory
    Users {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let navigator = Navigator::new(cli.url);

    let outcome = match cli.command {
        Commands::Visit {
            path,
            only,
            replace,
        } => {
            let outcome = navigator.visit(Visit::get(path).replace(replace)).await?;
            if only.is_empty() {
                outcome
            } else {
                navigator.reload(only).await?
            }
        }
        Commands::Users { q, role, page } => {
            let mut visit = Visit::get("/users");
            if let Some(q) = q {
                visit = visit.query("q", q);
            }
            if let Some(role) = role {
                visit = visit.query("role", role);
            }
            if let Some(page) = page {
                visit = visit.query("page", page.to_string());
            }
            navigator.visit(visit).await?
        }
    };

    print_outcome(&outcome)
}

fn print_outcome(outcome: &Outcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Rendered { page, status } => {
            if !status.is_success() {
                eprintln!("Server answered {}", status);
            }
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        Outcome::Reloaded { page } => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        Outcome::Superseded => eprintln!("Visit superseded"),
    }
    Ok(())
}
