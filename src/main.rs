use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use logos_actions::OutputSink;
use logos_core::{LogosConfig, OutputFormat, ResponseMode};
use logos_pm::pipeline::AgentPipeline;
use logos_pm::render::{ProposalBundle, RenderedOutput};
use logos_pm::router::TaskTemplate;

#[derive(Parser)]
#[command(
    name = "logos",
    version,
    about = "Logos — an AI project-manager agent for GitHub Actions",
    long_about = "Logos reacts to labeled issues from a GitHub Actions workflow: it routes the\n\
                   event, composes a prompt from its persona document and the issue, makes one\n\
                   completion call, and writes the result to GITHUB_OUTPUT for later steps.\n\n\
                   Examples:\n  \
                     logos run                     Handle the triggering event (CI entrypoint)\n  \
                     logos run --dry-run           Print the composed prompt without calling out\n  \
                     logos run --mode free_text    Reply with a plain comment instead of a proposal\n  \
                     logos init                    Scaffold .logos.toml and a starter persona\n  \
                     logos doctor                  Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .logos.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Human-readable output (default)\n  \
                         json  Machine-readable JSON"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Handle the triggering CI event (route, compose, call, write output)
    #[command(long_about = "Handle the triggering CI event.\n\n\
        Reads GITHUB_EVENT_NAME, INPUT_TRIGGERING_LABEL, and the ISSUE_* variables,\n\
        selects a task, composes a prompt from the persona document and the issue,\n\
        makes one completion call, and appends the rendered result to the file\n\
        named by GITHUB_OUTPUT. Exits 0 without calling out when no task matches.\n\n\
        Examples:\n  logos run\n  logos run --mode free_text\n  logos run --dry-run")]
    Run {
        /// Response mode override: free_text or structured
        #[arg(
            long,
            long_help = "Override the configured response mode.\n\n\
                Modes:\n  \
                  structured  Ask for a JSON proposal; write it under the 'proposal' key\n  \
                  free_text   Ask for prose; write it under the 'comment_body' key"
        )]
        mode: Option<ResponseMode>,

        /// Compose and print the prompt, then exit without calling the model
        #[arg(long)]
        dry_run: bool,
    },
    /// Check your Logos setup and environment
    #[command(long_about = "Check your Logos setup and environment.\n\n\
        Runs diagnostics for the config file, persona document, API key, and the\n\
        CI variables a run would need. Use --format json for machine-readable output.")]
    Doctor,
    /// Create a default .logos.toml and a starter persona document
    #[command(long_about = "Create a default .logos.toml and a starter persona document.\n\n\
        Generates a commented config template and prompts/logos_pm.md.\n\
        Existing files are left untouched.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        // Bold/bright header
        println!("\x1b[1m\x1b[33m🗼\x1b[0m \x1b[1mlogos\x1b[0m v{version} — the project manager that never sleeps\n");

        println!("Quick start:");
        println!("  \x1b[36mlogos init\x1b[0m       Create .logos.toml and a starter persona");
        println!("  \x1b[36mlogos doctor\x1b[0m     Check your setup and environment");
        println!("  \x1b[36mlogos run\x1b[0m        Handle the triggering event (CI entrypoint)\n");

        println!("All commands:");
        println!("  \x1b[32mrun\x1b[0m     Route the event, call the model, write GITHUB_OUTPUT");
        println!("  \x1b[32mdoctor\x1b[0m  Check your setup and environment");
        println!("  \x1b[32minit\x1b[0m    Create default configuration and persona\n");
    } else {
        println!("logos v{version} — the project manager that never sleeps\n");

        println!("Quick start:");
        println!("  logos init       Create .logos.toml and a starter persona");
        println!("  logos doctor     Check your setup and environment");
        println!("  logos run        Handle the triggering event (CI entrypoint)\n");

        println!("All commands:");
        println!("  run     Route the event, call the model, write GITHUB_OUTPUT");
        println!("  doctor  Check your setup and environment");
        println!("  init    Create default configuration and persona\n");
    }

    println!("Run 'logos <command> --help' for details.");
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &LogosConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    if std::path::Path::new(".logos.toml").exists() {
        checks.push(CheckResult::pass("config_file", ".logos.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".logos.toml not found",
            "run 'logos init' to create a default config",
        ));
    }

    // 2. Persona document
    match std::fs::metadata(&config.agent.persona_path) {
        Ok(meta) => checks.push(CheckResult::pass(
            "persona_document",
            format!(
                "{} ({} bytes)",
                config.agent.persona_path.display(),
                meta.len()
            ),
        )),
        Err(_) => checks.push(CheckResult::fail(
            "persona_document",
            format!("{} not found", config.agent.persona_path.display()),
            "run 'logos init' to scaffold a starter persona",
        )),
    }

    // 3. LLM provider + API key
    let provider = &config.llm.provider;
    let model = &config.llm.model;
    checks.push(CheckResult::pass(
        "llm_provider",
        format!("{provider} (model: {model})"),
    ));
    let env_var = config.llm.credential_env_var();
    if config.llm.api_key.is_some() {
        let detail = if std::env::var(env_var).is_ok() {
            format!("{env_var} set")
        } else {
            "api_key set in config file".to_string()
        };
        checks.push(CheckResult::pass("llm_api_key", detail));
    } else {
        checks.push(CheckResult::fail(
            "llm_api_key",
            format!("{env_var} not set"),
            format!("export {env_var}=... or set api_key in .logos.toml"),
        ));
    }

    // 4. Trigger environment
    match std::env::var(logos_actions::EVENT_NAME_VAR) {
        Ok(event) => {
            let label = std::env::var(logos_actions::TRIGGERING_LABEL_VAR).unwrap_or_default();
            let detail = if label.is_empty() {
                format!("event: {event} (no triggering label)")
            } else {
                format!("event: {event}, label: {label}")
            };
            checks.push(CheckResult::pass("trigger_event", detail));
        }
        Err(_) => checks.push(CheckResult::info(
            "trigger_event",
            "GITHUB_EVENT_NAME not set (normal outside a workflow)",
        )),
    }

    // 5. Output sink
    match std::env::var(logos_actions::OUTPUT_PATH_VAR) {
        Ok(path) if !path.is_empty() => checks.push(CheckResult::pass(
            "output_sink",
            format!("GITHUB_OUTPUT -> {path}"),
        )),
        _ => checks.push(CheckResult::info(
            "output_sink",
            "GITHUB_OUTPUT not set (normal outside a workflow)",
        )),
    }

    // 6. Response mode
    checks.push(CheckResult::info(
        "response_mode",
        format!(
            "{} (signature: {})",
            config.agent.response_mode, config.agent.signature
        ),
    ));

    // Output
    match format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Text => {
            let version = env!("CARGO_PKG_VERSION");
            println!("Logos v{version} — Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                // Pad the name for alignment
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<20} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

async fn run_agent(config: &LogosConfig, dry_run: bool, verbose: bool) -> Result<()> {
    let ctx = logos_actions::trigger_from_env()?;

    if verbose {
        eprintln!(
            "trigger: event={} label={} issue={}",
            ctx.event,
            ctx.label.as_deref().unwrap_or("-"),
            ctx.issue_number
                .map_or_else(|| "-".to_string(), |n| format!("#{n}")),
        );
        eprintln!(
            "agent: model={} mode={} persona={}",
            config.llm.model,
            config.agent.response_mode,
            config.agent.persona_path.display(),
        );
    }

    let pipeline = AgentPipeline::from_config(config)?;

    if dry_run {
        let Some((task, request)) = pipeline.compose_for(&ctx)? else {
            eprintln!("No matching task for this trigger; nothing to compose.");
            return Ok(());
        };
        let TaskTemplate::InitiateProposal { issue_number, .. } = &task;
        println!(
            "task: {} (issue {})",
            task.name(),
            issue_number.map_or_else(|| "?".to_string(), |n| format!("#{n}")),
        );
        println!(
            "mode: {} (temperature {}, max_tokens {})",
            pipeline.mode(),
            request.params.temperature,
            request.params.max_tokens,
        );
        println!("\n--- system ---\n{}", request.system);
        println!("--- user ---\n{}", request.user);
        return Ok(());
    }

    eprintln!(
        "Logos run starting (event: {}, label: {})",
        ctx.event,
        ctx.label.as_deref().unwrap_or("none"),
    );

    let is_tty = std::io::stderr().is_terminal();
    let spinner = if is_tty {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})").unwrap(),
        );
        pb.set_message(format!("Consulting {}...", pipeline.model()));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let output = pipeline.run(&ctx).await.inspect_err(|_e| {
        if let Some(pb) = &spinner {
            pb.finish_with_message("Failed");
        }
    })?;

    match output {
        None => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            eprintln!("No matching task for this trigger; exiting cleanly.");
        }
        Some(output) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            let sink = OutputSink::from_env()?;
            match &output {
                RenderedOutput::Comment { body } => {
                    sink.append_multiline("comment_body", body)?;
                    eprintln!("Logos finished; wrote comment_body to GITHUB_OUTPUT.");
                }
                RenderedOutput::Proposal {
                    title,
                    body,
                    status_document,
                } => {
                    sink.append_json(
                        "proposal",
                        &ProposalBundle {
                            pull_request_title: title,
                            pull_request_body: body,
                            status_document,
                        },
                    )?;
                    eprintln!("Logos finished; wrote proposal to GITHUB_OUTPUT.");
                }
            }
        }
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Logos Configuration
# See: https://github.com/logos-pm/logos-agent

[llm]
# provider = "openai"
# model = "gpt-4o"
# base_url = "https://api.openai.com"
# api_key = "..."        # prefer the OPENAI_API_KEY environment variable

[agent]
# persona_path = "prompts/logos_pm.md"
# signature = "🗼 Logos"
# response_mode = "structured"    # or "free_text" for a plain comment reply
"#;

const DEFAULT_PERSONA: &str = include_str!("../prompts/logos_pm.md");

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let mut config = LogosConfig::load(cli.config.as_deref())?;

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
        }
        Some(Command::Run { mode, dry_run }) => {
            if let Some(mode) = mode {
                config.agent.response_mode = mode;
            }
            run_agent(&config, dry_run, cli.verbose).await?;
        }
        Some(Command::Doctor) => {
            run_doctor(&config, cli.format, use_color)?;
        }
        Some(Command::Init) => {
            let config_path = std::path::Path::new(".logos.toml");
            let persona_path = std::path::Path::new("prompts/logos_pm.md");
            if config_path.exists() && persona_path.exists() {
                miette::bail!(".logos.toml and prompts/logos_pm.md already exist");
            }
            if config_path.exists() {
                println!(".logos.toml already exists, skipping");
            } else {
                std::fs::write(config_path, DEFAULT_CONFIG).into_diagnostic()?;
                println!("Created .logos.toml with default configuration");
            }
            if persona_path.exists() {
                println!("prompts/logos_pm.md already exists, skipping");
            } else {
                std::fs::create_dir_all("prompts").into_diagnostic()?;
                std::fs::write(persona_path, DEFAULT_PERSONA).into_diagnostic()?;
                println!("Created prompts/logos_pm.md starter persona");
            }
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "logos", &mut std::io::stdout());
        }
    }

    Ok(())
}
