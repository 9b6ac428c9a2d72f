use std::process;

use clap::Parser;

use asset_serve::{server, ServeConfig};

fn main() {
    env_logger::init();
    let config = ServeConfig::parse();
    if let Err(e) = serve(&config) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn serve(config: &ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(server::run(config))?;
    Ok(())
}
