//! Main entry point for the Polingo demo.

use anyhow::Result;
use clap::Parser;
use polingo_common::init_logging;
use polingo_demo::{Args, DemoApp};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_dir) = args.load_config()?;

    init_logging(&config.logging)?;
    info!("Starting Polingo demo with locale {}", config.locale);

    let app = DemoApp::new(config, config_dir.as_deref())?;
    app.ready().await;
    print_screen(&app);

    if args.toggle {
        app.toggle().await?;
        println!();
        print_screen(&app);
    }

    Ok(())
}

fn print_screen(app: &DemoApp) {
    for line in app.render() {
        println!("{line}");
    }
}
