use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_tree_core::{
    CheckSet, CommandKind, CommandNode, CommandTree, MappingTarget, Node, Parameter, Parent,
    search, validate_tree,
};
use command_tree_manifest::{DescriptorSet, EngineConfig, ManifestFormat, load_remote_records};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

impl From<CliOutputFormat> for ManifestFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "command-tree")]
#[command(about = "Build, dispatch, export and map hierarchical command trees")]
struct Cli {
    /// Log build and dispatch decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the tree from manifests and report any violation.
    Validate(ValidateArgs),
    /// Export the declarative command schema.
    Export(ExportArgs),
    /// Resolve a text invocation to a command.
    Search(SearchArgs),
    /// Map remote command records onto local commands.
    Map(MapArgs),
    /// Print the built tree.
    Tree(TreeArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Manifest files and/or directories containing manifests.
    #[arg(long = "manifest", required = true)]
    manifests: Vec<PathBuf>,
    /// Path to an engine config YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Also run the checks the declarative schema requires.
    #[arg(long)]
    export: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Text to resolve, e.g. "admin ban alice".
    text: String,
}

#[derive(Debug, Args)]
struct MapArgs {
    #[command(flatten)]
    input: InputArgs,
    /// JSON or YAML file with the records returned by the platform.
    #[arg(long)]
    remote: PathBuf,
}

#[derive(Debug, Args)]
struct TreeArgs {
    #[command(flatten)]
    input: InputArgs,
}

/// One mapping entry, with command handles resolved to dotted paths.
#[derive(Debug, Serialize)]
struct MappedRecord {
    command_id: String,
    group_id: Option<String>,
    grouped: bool,
    paths: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Export(args) => run_export(args),
        Command::Search(args) => run_search(args),
        Command::Map(args) => run_map(args),
        Command::Tree(args) => run_tree(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(input: &InputArgs) -> Result<EngineConfig, String> {
    match &input.config {
        Some(path) => EngineConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_tree(input: &InputArgs, config: &EngineConfig) -> Result<(DescriptorSet, CommandTree), String> {
    let set = input
        .manifests
        .iter()
        .fold(DescriptorSet::builder(), |builder, path| builder.with_path(path))
        .load()
        .map_err(|err| err.to_string())?;
    let tree = set.build_tree(config).map_err(|err| err.to_string())?;
    Ok((set, tree))
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let config = load_config(&args.input)?;
    let (set, tree) = load_tree(&args.input, &config)?;
    if args.export {
        validate_tree(&tree, CheckSet::Export).map_err(|err| err.to_string())?;
    }

    println!(
        "Validated {} descriptor(s) from {} manifest(s): {} node(s), {} command(s).",
        set.len(),
        set.manifests().len(),
        tree.len(),
        tree.commands().count()
    );
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), String> {
    let config = load_config(&args.input)?;
    let (_, tree) = load_tree(&args.input, &config)?;
    let schema = tree.export().map_err(|err| err.to_string())?;

    let format: ManifestFormat = args.format.into();
    let raw = format
        .render(&schema)
        .map_err(|err| format!("Failed to serialize schema: {err}"))?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Exported {} top-level command(s) to '{}'.",
                schema.len(),
                path.display()
            );
        }
        None => println!("{raw}"),
    }
    Ok(())
}

fn run_search(args: SearchArgs) -> Result<(), String> {
    let config = load_config(&args.input)?;
    let (_, tree) = load_tree(&args.input, &config)?;
    let options = config.tokenizer_options();

    let command = search(&tree, &args.text, &options).map_err(|err| err.to_string())?;
    println!("{}", tree.dotted_path(command.id));
    Ok(())
}

fn run_map(args: MapArgs) -> Result<(), String> {
    let config = load_config(&args.input)?;
    let (_, tree) = load_tree(&args.input, &config)?;
    let records = load_remote_records(&args.remote).map_err(|err| {
        format!(
            "Failed to load remote records '{}': {err}",
            args.remote.display()
        )
    })?;

    let mapped: Vec<MappedRecord> = tree
        .map_remote(&records)
        .into_iter()
        .map(|entry| MappedRecord {
            command_id: entry.key.command_id.to_string(),
            group_id: entry.key.group_id.as_ref().map(ToString::to_string),
            grouped: matches!(entry.target, MappingTarget::Group(_)),
            paths: entry
                .commands()
                .into_iter()
                .map(|id| tree.dotted_path(id))
                .collect(),
        })
        .collect();

    let raw = serde_json::to_string_pretty(&mapped)
        .map_err(|err| format!("Failed to serialize mapping: {err}"))?;
    println!("{raw}");

    let skipped = records.len() - mapped.len();
    if skipped > 0 {
        eprintln!("{skipped} remote record(s) have no local command.");
    }
    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<(), String> {
    let config = load_config(&args.input)?;
    let (_, tree) = load_tree(&args.input, &config)?;

    let mut lines = Vec::new();
    render_level(&tree, Parent::Root, 0, &mut lines);
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn render_level(tree: &CommandTree, level: Parent, indent: usize, lines: &mut Vec<String>) {
    for node in tree.children(level) {
        let pad = "  ".repeat(indent);
        match node {
            Node::Group(group) => {
                lines.push(format!("{pad}{}/", group.key));
                render_level(tree, Parent::Group(group.id), indent + 1, lines);
            }
            Node::Command(command) => lines.push(format!("{pad}{}", command_signature(command))),
        }
    }
}

fn command_signature(command: &CommandNode) -> String {
    match command.kind {
        CommandKind::User => return format!("{} (user context menu)", command.key),
        CommandKind::Message => return format!("{} (message context menu)", command.key),
        CommandKind::ChatInput => {}
    }

    let mut parts = vec![command.key.clone()];
    parts.extend(command.parameters.iter().map(parameter_signature));
    parts.join(" ")
}

fn parameter_signature(parameter: &Parameter) -> String {
    let name = if parameter.is_switch {
        format!("--{}", parameter.name)
    } else if parameter.is_collection {
        format!("{}...", parameter.name)
    } else {
        parameter.name.clone()
    };

    if parameter.required && !parameter.is_switch {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    }
}
