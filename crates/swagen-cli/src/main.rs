mod ui;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use swagen_core::compile::compile_operation;
use swagen_core::config::{self, CONFIG_FILE_NAME, Config, ConfigOverrides, INTERFACE_IMPORT, Lang};
use swagen_core::parse::{self, operation::HttpMethod, spec::SwaggerSpec};
use swagen_core::pipeline::{self, OperationSelector, Pipeline};
use swagen_core::transform::group::operation_count;
use swagen_core::transform::name_normalizer::function_name;
use swagen_core::transform::{GroupedOperations, group_by_tag, normalize};
use swagen_mock::generate_mocks;

#[derive(Parser)]
#[command(name = "swagen", about = "Swagger 2.0 request-function generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate request modules from a Swagger document
    Generate {
        /// Path to the Swagger document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language
        #[arg(long)]
        lang: Option<LangArg>,

        /// Only emit the interface/typedef file
        #[arg(long)]
        type_only: bool,

        /// Only generate these tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Pick tags interactively
        #[arg(long, conflicts_with = "tags")]
        interactive: bool,
    },

    /// Generate mock handlers from a Swagger document
    Mock {
        /// Path to the Swagger document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Mock output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a Swagger document by compiling every operation
    Validate {
        /// Path to the Swagger document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the operations of a document grouped by tag
    Inspect {
        /// Path to the Swagger document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Compile a single operation and print it
    Compile {
        /// Path to the Swagger document
        #[arg(short, long)]
        input: PathBuf,

        /// Operation url as written in the document, e.g. /pets/{id}
        #[arg(long)]
        url: String,

        /// HTTP method
        #[arg(long, value_parser = HttpMethod::from_str)]
        method: HttpMethod,

        /// Target language
        #[arg(long)]
        lang: Option<LangArg>,
    },

    /// Initialize a new swagen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    Ts,
    Js,
}

impl From<LangArg> for Lang {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::Ts => Lang::Ts,
            LangArg::Js => Lang::Js,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            lang,
            type_only,
            tags,
            interactive,
        } => {
            let overrides = ConfigOverrides {
                source: input.map(|p| p.to_string_lossy().into_owned()),
                root: output.map(|p| p.to_string_lossy().into_owned()),
                lang: lang.map(Lang::from),
                type_only: type_only.then_some(true),
                ..ConfigOverrides::default()
            };
            cmd_generate(overrides, tags, interactive)
        }

        Commands::Mock { input, output } => {
            let overrides = ConfigOverrides {
                source: input.map(|p| p.to_string_lossy().into_owned()),
                mock_root: output.map(|p| p.to_string_lossy().into_owned()),
                ..ConfigOverrides::default()
            };
            cmd_mock(overrides)
        }

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Compile {
            input,
            url,
            method,
            lang,
        } => cmd_compile(input, &url, method, lang),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swagen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config from the current directory and apply overrides.
fn resolve_config(overrides: ConfigOverrides) -> Result<Config> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let loaded = config::load_config(&config_path)?;
    if loaded.is_none() {
        debug!("no {CONFIG_FILE_NAME} found, using defaults");
    }
    Ok(loaded.unwrap_or_default().merge(overrides))
}

fn load_spec(path: &Path) -> Result<SwaggerSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse::from_str_with_path(&content, path)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Try to run prettier over the output directory.
fn try_run_prettier(output_dir: &Path) {
    match Command::new("npx")
        .args(["prettier", "--write", "."])
        .current_dir(output_dir)
        .output()
    {
        Ok(result) if result.status.success() => {
            eprintln!("  formatted with prettier");
        }
        Ok(_) => {
            eprintln!("  warning: prettier exited with an error, output is left unformatted");
        }
        Err(_) => {
            eprintln!(
                "  note: prettier not found, run `npx prettier --write .` in {} to format",
                output_dir.display()
            );
        }
    }
}

/// Tags of the document with their operation counts, in group order.
fn tag_choices(spec: &SwaggerSpec) -> Result<Vec<(String, usize)>> {
    let groups = group_by_tag(&normalize(spec)?);
    Ok(groups
        .into_iter()
        .map(|(tag, ops)| (tag, ops.len()))
        .collect())
}

fn cmd_generate(overrides: ConfigOverrides, tags: Vec<String>, interactive: bool) -> Result<()> {
    let cfg = resolve_config(overrides)?;
    let source = PathBuf::from(&cfg.source);
    let spec = load_spec(&source)?;

    let tags = if interactive {
        ui::select_tags(&tag_choices(&spec)?)?
    } else {
        tags
    };
    let keep_tags = |groups: GroupedOperations| -> GroupedOperations {
        groups
            .into_iter()
            .filter(|(tag, _)| tags.contains(tag))
            .collect()
    };
    let selector: Option<&dyn OperationSelector> =
        (interactive || !tags.is_empty()).then_some(&keep_tags as &dyn OperationSelector);

    let spinner = ui::spinner(&format!("Generating from {}...", source.display()));
    let result = pipeline::generate(&cfg, &spec, selector);
    spinner.finish_and_clear();

    let files = match result {
        Ok(files) => files,
        Err(err) => {
            eprintln!("Generation failed.");
            return Err(err.into());
        }
    };

    let output_dir = PathBuf::from(&cfg.root);
    for file in &files {
        eprintln!("  wrote {}", output_dir.join(&file.path).display());
    }
    if cfg.format {
        try_run_prettier(&output_dir);
    }
    eprintln!("Generated {} files in {}", files.len(), output_dir.display());
    Ok(())
}

fn cmd_mock(overrides: ConfigOverrides) -> Result<()> {
    let cfg = resolve_config(overrides)?;
    let source = PathBuf::from(&cfg.source);
    let spec = load_spec(&source)?;

    let spinner = ui::spinner("Generating mock handlers...");
    let result = generate_mocks(&spec, &cfg.mock);
    spinner.finish_and_clear();
    let files = result?;

    let mock_root = PathBuf::from(&cfg.mock.root);
    pipeline::write_files(&mock_root, &files)?;
    eprintln!("Generated {} mock files in {}", files.len(), mock_root.display());
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = load_spec(&input)?;
    let spec = normalize(&parsed)?;

    eprintln!(
        "Valid Swagger {} document: {}",
        spec.version_marker(),
        spec.info.title
    );
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Definitions: {}", spec.definitions.len());

    // Compile everything in memory, in both targets.
    let groups = group_by_tag(&spec);
    for lang in [Lang::Ts, Lang::Js] {
        let cfg = Config {
            lang,
            ..Config::default()
        };
        Pipeline::new(&cfg).run(&parsed, None)?;
    }
    eprintln!("  Tags: {}", groups.len());
    eprintln!("  Operations: {}", operation_count(&groups));

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let spec = normalize(&load_spec(&input)?)?;
    let summary = build_inspect_summary(&spec, &group_by_tag(&spec));

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(spec: &SwaggerSpec, groups: &GroupedOperations) -> serde_json::Value {
    let tags: Vec<serde_json::Value> = groups
        .iter()
        .map(|(tag, ops)| {
            let operations: Vec<serde_json::Value> = ops
                .iter()
                .map(|op| {
                    let summary = spec
                        .operation(&op.url, op.method)
                        .and_then(|o| o.summary.clone());
                    serde_json::json!({
                        "name": function_name(op.method, &op.url),
                        "method": op.method.as_str(),
                        "url": op.url,
                        "summary": summary,
                    })
                })
                .collect();
            serde_json::json!({
                "name": tag,
                "description": spec.tag_description(tag),
                "operations": operations,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": spec.info.title,
            "version": spec.info.version,
        },
        "tags": tags,
        "definitions": spec.definitions.keys().collect::<Vec<_>>(),
    })
}

fn cmd_compile(input: PathBuf, url: &str, method: HttpMethod, lang: Option<LangArg>) -> Result<()> {
    let cfg = resolve_config(ConfigOverrides {
        lang: lang.map(Lang::from),
        ..ConfigOverrides::default()
    })?;
    let spec = normalize(&load_spec(&input)?)?;
    let fragment = compile_operation(&cfg, &spec, url, method)?;

    if !fragment.imports.is_empty() {
        println!(
            "import {{ {} }} from \"{INTERFACE_IMPORT}\";\n",
            fragment.imports.join(", ")
        );
    }
    println!("{}", fragment.body());
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
