mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::convert::Method;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "svgvault")]
#[command(about = "Svgvault - Pack video payloads into standalone SVG containers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a video file into an SVG container
    Convert {
        /// Input video file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output SVG file
        #[arg(short, long)]
        output: String,

        /// Container strategy
        #[arg(short, long, value_enum, default_value = "polyglot")]
        method: Method,

        /// Canvas width in pixels
        #[arg(long, default_value = "640")]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value = "360")]
        height: u32,

        /// Declared frame rate
        #[arg(long, default_value = "30.0")]
        fps: f64,

        /// Chunk size for the qr-chunked strategy
        #[arg(long, default_value = "1024")]
        chunk_size: usize,

        /// Reject payloads larger than this many bytes
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Extract the original payload from an SVG container
    Extract {
        /// Input SVG file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the recovered payload
        #[arg(short, long)]
        output: String,

        /// Write the payload even when verification fails
        #[arg(long)]
        skip_verify: bool,
    },

    /// Detect which container strategy produced an SVG file
    Detect {
        /// Input SVG file ("-" for stdin)
        #[arg(short, long)]
        input: String,
    },

    /// Verify container integrity and print a report
    Verify {
        /// Input SVG file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Emit the integrity report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build every strategy and compare container sizes
    Compare {
        /// Input video file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Chunk size for the qr-chunked strategy
        #[arg(long, default_value = "1024")]
        chunk_size: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            method,
            width,
            height,
            fps,
            chunk_size,
            max_size,
        } => commands::convert::execute(
            &input, &output, method, width, height, fps, chunk_size, max_size,
        ),

        Commands::Extract {
            input,
            output,
            skip_verify,
        } => commands::extract::execute(&input, &output, skip_verify),

        Commands::Detect { input } => commands::detect::execute(&input),

        Commands::Verify { input, json } => commands::verify::execute(&input, json),

        Commands::Compare { input, chunk_size } => {
            commands::compare::execute(&input, chunk_size)
        }
    }
}
