use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

/// FruitPunchFS - interactive client for a remote virtual-storage service
#[derive(Parser, Debug)]
#[command(name = "fruitpunch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base address of the FruitPunchFS service (or FRUITPUNCH_URL)
    #[arg(long)]
    url: Option<String>,

    /// Force vi editing mode
    #[arg(long)]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Set edit mode override if specified
    if args.vi {
        std::env::set_var("FRUITPUNCH_EDIT_MODE", "vi");
    } else if args.emacs {
        std::env::set_var("FRUITPUNCH_EDIT_MODE", "emacs");
    }

    let url = args
        .url
        .or_else(|| std::env::var("FRUITPUNCH_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let ctx = match fruitpunch_repl::AppContext::new(&url) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fruitpunch_repl::run(ctx) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
