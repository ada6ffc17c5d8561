mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use favicon_forge::{
    Error, FaviconGenerator, FaviconManifest, Result, SvgSource, read_directory, write_all,
};

use crate::logging::{LogFormat, LogLevel, init_logging};

#[derive(Parser, Debug)]
#[command(name = "favicon-forge", version, about = "Generate website favicons from an SVG")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render PNG favicons and the ICO file.
    Generate {
        /// SVG logo to rasterize.
        #[arg(long, short, value_name = "SVG")]
        source: PathBuf,

        /// Directory the assets are written to.
        #[arg(long, short, value_name = "DIR", default_value = "public")]
        out: PathBuf,

        /// JSON manifest; the default website set is used when omitted.
        #[arg(long, short, value_name = "JSON")]
        manifest: Option<PathBuf>,
    },

    /// Print the directory of an ICO file.
    Inspect {
        /// The ICO file.
        path: PathBuf,
    },

    /// Print the default manifest as JSON.
    Manifest,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate {
            source,
            out,
            manifest,
        } => {
            let manifest = match manifest {
                Some(path) => FaviconManifest::load(path)?,
                None => FaviconManifest::default(),
            };
            let source = SvgSource::from_file(&source)?;
            let mut generator = FaviconGenerator::new(source, manifest)?;
            let assets = generator.generate()?;
            for path in write_all(&assets, &out)? {
                println!("{}", path.display());
            }
        }
        Command::Inspect { path } => {
            let bytes = std::fs::read(&path).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            let entries = read_directory(&bytes)?;
            println!("{}: {} image(s)", path.display(), entries.len());
            for (i, entry) in entries.iter().enumerate() {
                let size = entry.edge_length();
                println!(
                    "  [{i}] {size}x{size} {}bpp {} bytes @ {}",
                    entry.bits_per_pixel, entry.data_size, entry.data_offset
                );
            }
        }
        Command::Manifest => {
            println!("{}", FaviconManifest::default().to_json_pretty()?);
        }
    }
    Ok(())
}
