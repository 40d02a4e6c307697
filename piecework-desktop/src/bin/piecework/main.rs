//! Binary which assembles a demo structure and writes it out.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use anyhow::Context as _;
use clap::Parser as _;

use piecework_content::demo_pools;
use piecework_desktop::{config_files, default_params, fill, generate, logging, map_layer};

mod command_options;
use command_options::PieceworkArgs;

fn main() -> Result<(), anyhow::Error> {
    // Destructure as a check that we're using all the args
    let PieceworkArgs {
        seed,
        size,
        start_pool,
        config,
        output,
        map,
        logging: logging_args,
    } = PieceworkArgs::parse();

    logging::install(&logging_args)?;

    let mut params = match &config {
        Some(path) => config_files::read_or_create_default_json_file(
            "assembly parameters",
            path,
            default_params,
        ),
        None => default_params(),
    };
    if let Some(size) = size {
        params.size = size;
    }
    if let Some(pool) = start_pool {
        params.start_pool = pool.name();
    }

    let seed = seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let pools = demo_pools().context("invalid demo pools")?;
    let Some(structure) = generate(&pools, &params, seed)? else {
        log::warn!("the start pool {} produced nothing", params.start_pool);
        return Ok(());
    };
    println!(
        "{count} pieces, {bounds:?}",
        count = structure.pieces().len(),
        bounds = structure.bounding_box(),
    );

    if let Some(path) = &output {
        config_files::write_json_file(path, &structure)?;
        log::info!("wrote structure to {path}", path = path.to_string_lossy());
    }

    if map {
        println!("{}", fill(&structure).layer_map(map_layer(&structure)));
    }

    Ok(())
}
