use clap::Parser;
use epd7color::convert_image;
use epd7color::export::{self, BufferFormat};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Convert image to a 7-color e-paper display buffer
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path
    img: PathBuf,

    /// Preview PNG path
    #[arg(short, long, default_value = "preview.png")]
    preview: PathBuf,

    /// Write the packed display buffer to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Display buffer format
    #[arg(short, long, value_enum, default_value_t = BufferFormat::Raw)]
    format: BufferFormat,

    /// Array name for the c-array format
    #[arg(long, default_value = "gImage_7in3f")]
    name: String,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let codes = convert_image(&args.img, &args.preview)?;
    if let Some(output) = &args.output {
        export::write_buffer(&codes, output, args.format, &args.name)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}: {e}", args.img.to_string_lossy());
            ExitCode::FAILURE
        }
    }
}
