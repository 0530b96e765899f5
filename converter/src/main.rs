use anyhow::Context;
use cascadecore::emit::{binary, header, report};
use cascadecore::parse::CascadeDocument;
use cascadecore::quant;
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

mod output;

#[derive(Parser)]
#[command(author, version, about = "Haar cascade converter for the embedded detection runtime")]
struct Args {
    /// OpenCV XML cascade file path
    file: PathBuf,
    /// Print cascade info and exit
    #[arg(short, long, default_value_t = false)]
    info: bool,
    /// Generate a C header instead of a binary cascade
    #[arg(short = 'c', long, default_value_t = false)]
    header: bool,
    /// Set the cascade name (output file stem and C identifier prefix)
    #[arg(short, long)]
    name: Option<String>,
    /// Set the maximum number of stages (0 = all)
    #[arg(short, long, default_value_t = 0)]
    stages: usize,
    /// Print the info summary as JSON (info mode only)
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    let document = CascadeDocument::from_file(&args.file)
        .with_context(|| format!("loading cascade {}", args.file.display()))?;

    if args.info {
        print!("{}", render_info(&document, args.json)?);
        return Ok(());
    }

    let name = args.name.unwrap_or_else(|| default_name(&args.file));
    let descriptor = document
        .build(args.stages)
        .with_context(|| format!("selecting stages from {}", args.file.display()))?;
    let quantized = quant::quantize(&descriptor);
    let summary = descriptor.summary();

    if args.header {
        let prefix = header::sanitize_identifier(&name);
        let rendered = header::render(&quantized, &prefix);
        let path = PathBuf::from(format!("{}.h", name));
        output::write_atomic(&path, rendered.as_bytes())
            .with_context(|| format!("writing header {}", path.display()))?;
        info!("wrote {} ({} bytes)", path.display(), rendered.len());
        print!("{}", report::render(&summary));
        println!("C header cascade generated");
    } else {
        let bytes = binary::encode(&quantized);
        let path = PathBuf::from(format!("{}.cascade", name));
        output::write_atomic(&path, &bytes)
            .with_context(|| format!("writing binary cascade {}", path.display()))?;
        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        print!("{}", report::render(&summary));
        println!("binary cascade generated");
    }

    Ok(())
}

/// Info mode is read-only: it renders the whole-document summary and
/// never touches the filesystem.
fn render_info(document: &CascadeDocument, json: bool) -> anyhow::Result<String> {
    let summary = document.build(0)?.summary();
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&summary)?))
    } else {
        Ok(report::render(&summary))
    }
}

/// Output name derived from the source document when no override is
/// given: the file name up to its first dot, matching the training
/// tool's convention.
fn default_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "cascade".to_string())
}
