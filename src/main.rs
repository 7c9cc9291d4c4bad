use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use typewriter_sounds::app::App;
use typewriter_sounds::logging::init_logging;

#[derive(Parser)]
#[command(name = "typewriter-sounds")]
#[command(version, about = "Plays mechanical typewriter sounds while you type")]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    println!("TypeWriter Sounds Emulator. v{}", env!("CARGO_PKG_VERSION"));
    let mut app = App::new(cli.config)?;
    println!("type now and enjoy the vintage experience!...");
    app.run().await
}
