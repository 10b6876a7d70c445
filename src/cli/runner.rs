use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pixtweak::FilterParams;
use pixtweak::api::edit_file_to_path;

use super::args::{ApplyArgs, CliArgs, Command};
use super::errors::AppError;

#[cfg(feature = "server")]
use super::args::ServeArgs;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn apply_single_file(args: ApplyArgs) -> Result<(), AppError> {
    if !args.input.is_file() {
        return Err(AppError::MissingInput {
            path: args.input.display().to_string(),
        });
    }
    if !(1..=100).contains(&args.quality) {
        return Err(AppError::InvalidQuality {
            quality: args.quality,
        });
    }

    let params = FilterParams {
        brightness: args.brightness,
        contrast: args.contrast,
        grayscale: args.grayscale,
        rotate: args.rotate,
        flip: args.flip,
    };
    debug!("Parameters: {:?}", params);

    edit_file_to_path(&args.input, &args.output, &params, args.format, args.quality)?;
    info!("Successfully edited: {:?} -> {:?}", args.input, args.output);
    Ok(())
}

#[cfg(feature = "server")]
fn serve(args: ServeArgs) -> Result<(), AppError> {
    use pixtweak::ServerConfig;

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_json_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.upload_dir {
        config.upload_dir = dir;
    }
    if let Some(limit) = args.max_upload_bytes {
        config.max_upload_bytes = limit;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.unique_names {
        config.unique_names = true;
    }

    let server = pixtweak::server::bind(config)?;
    println!("pixtweak listening on http://{}", server.addr());
    server.run()?;
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        init_logging();
    }

    match args.command {
        #[cfg(feature = "server")]
        Command::Serve(serve_args) => serve(serve_args)?,
        Command::Apply(apply_args) => apply_single_file(apply_args)?,
    }

    Ok(())
}
