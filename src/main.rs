#[macro_use]
extern crate log;

use std::{
    fs::File,
    io::{stdout, BufWriter, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use sgff::{codec::scheme, Container, Header, Reader, SequenceTag};

mod cli;

use cli::{input_path, Cli, Commands};

#[derive(serde::Serialize)]
struct ParsedFile<'a> {
    header: Header,
    blocks: &'a sgff::Blocks,
}

fn load(input: &str) -> Result<Container> {
    let container = Reader::from_optional_path(input_path(input))
        .and_then(Reader::into_container)
        .with_context(|| format!("failed to read {input}"))?;
    debug!("Decoded {} block types from {input}", container.counts().len());
    Ok(container)
}

fn parse(input: &str, output: Option<&str>) -> Result<()> {
    let container = load(input)?;
    let parsed = ParsedFile {
        header: container.header(),
        blocks: container.blocks(),
    };
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &parsed)?;
            writer.flush()?;
            info!("Wrote JSON to {path}");
        }
        None => {
            let mut writer = BufWriter::new(stdout().lock());
            serde_json::to_writer_pretty(&mut writer, &parsed)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn info(input: &str) -> Result<()> {
    let container = load(input)?;
    let header = container.header();

    println!("File: {input}");
    println!(
        "Type: {} (export v{}, import v{})",
        header.sequence_kind, header.export_version, header.import_version
    );
    match container.sequence() {
        Some(sequence) => println!(
            "Sequence: {} {:?} ({})",
            sequence.len(),
            sequence.alphabet,
            if sequence.flags.circular() {
                "circular"
            } else {
                "linear"
            }
        ),
        None => println!("Sequence: none"),
    }
    println!("Blocks:");
    for (block_type, count) in container.counts() {
        println!("  Type {block_type:>2}: {count} block(s)");
    }
    Ok(())
}

fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(row, bytes)| {
            let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
            format!("{:08x}  {}", row * 16, hex.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check(input: &str, examine: bool) -> Result<()> {
    let reader = Reader::from_optional_path(input_path(input))
        .with_context(|| format!("failed to read {input}"))?;

    let mut found: std::collections::BTreeMap<u8, Vec<Vec<u8>>> = Default::default();
    for block in reader {
        let block = block?;
        if block.is_truncated() {
            warn!("Block type {} is truncated", block.block_type);
        }
        found.entry(block.block_type).or_default().push(block.data);
    }

    let unknown: Vec<u8> = found
        .keys()
        .copied()
        .filter(|&t| !scheme::is_known(t))
        .collect();
    for (block_type, blocks) in &found {
        let marker = if scheme::is_known(*block_type) { "" } else { " [NEW]" };
        println!("{block_type:>2}: {:>2}{marker}", blocks.len());
    }

    if !unknown.is_empty() {
        println!();
        if examine {
            for block_type in &unknown {
                for data in &found[block_type] {
                    println!("Type: {block_type}, Length: {}", data.len());
                    println!("{}", hex_dump(data));
                    println!();
                }
            }
        } else {
            println!("Unknown block types: {unknown:?}");
        }
    }
    Ok(())
}

fn filter(input: &str, keep: &[u8], output: &str) -> Result<()> {
    let mut container = load(input)?;
    container.retain_types(keep);
    container
        .to_path(output)
        .with_context(|| format!("failed to write {output}"))?;
    println!("Filtered file written to {output}");
    Ok(())
}

/// Returns false when the file has no history.
fn history(input: &str, verbose: bool) -> Result<bool> {
    let container = load(input)?;
    let history = container.history();
    if history.is_empty() {
        eprintln!("No history found in {input}");
        return Ok(false);
    }

    if let Some(tree) = &history.tree {
        println!("History tree: {} bytes of XML", tree.len());
    }
    println!("History nodes: {}", history.nodes.len());
    for node in &history.nodes {
        let content = match (node.tag, node.symbols()) {
            (SequenceTag::ModifierOnly, _) => "modifiers only".to_string(),
            (_, Some(symbols)) => format!("{} symbols", symbols.len()),
            (tag, None) => format!("{tag:?}"),
        };
        println!("  Node {:>3}: {content}", node.index);
        if verbose {
            for (block_type, payloads) in &node.info {
                let kinds: Vec<&str> = payloads.iter().map(|p| p.kind()).collect();
                println!("      Type {block_type:>2}: {}", kinds.join(", "));
            }
        }
    }
    Ok(true)
}

fn try_main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse { input, output } => parse(input, output.as_deref())?,
        Commands::Info { input } => info(input)?,
        Commands::Check { input, examine } => check(input, *examine)?,
        Commands::Filter {
            input,
            keep,
            output,
        } => filter(input, keep, output)?,
        Commands::History { input, verbose } => {
            if !history(input, *verbose)? {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
