use {
    clap::{Parser, Subcommand},
    skilldeck_gateway::services::{CatalogPaths, CatalogService, LiveCatalogService},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "skilldeck", about = "Skilldeck — skill catalog manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/skilldeck/).
    #[arg(long, global = true, env = "SKILLDECK_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,

    /// Custom data directory (overrides default data dir).
    #[arg(long, global = true, env = "SKILLDECK_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the full catalog index over every configured repository.
    Index,
    /// Fetch one repository and refresh its records.
    Fetch {
        /// Source in owner/repo format or a GitHub URL.
        source: String,
    },
    /// List all indexed skills.
    List,
    /// Repository management.
    Repos {
        #[command(subcommand)]
        action: RepoAction,
    },
    /// Install a skill by id (owner/repo/name).
    Install {
        id: String,
        /// Install method: copy or cli (defaults to the configured setting).
        #[arg(long)]
        method: Option<String>,
    },
    /// Uninstall a skill by name.
    Uninstall { name: String },
    /// Favorites management.
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum RepoAction {
    /// List configured repositories.
    List,
    /// Add a custom repository (owner/repo format or GitHub URL).
    Add { source: String },
    /// Remove a custom repository and its working copy.
    Remove { source: String },
    /// Show a repository's README.
    Readme { source: String },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Show favorited skills and repositories.
    List,
    /// Toggle a favorite skill by id.
    Skill { id: String },
    /// Toggle a favorite repository by owner/repo key.
    Repo { source: String },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(ref dir) = cli.config_dir {
        skilldeck_config::set_config_dir(dir.clone());
    }
    if let Some(ref dir) = cli.data_dir {
        skilldeck_config::set_data_dir(dir.clone());
    }
    init_telemetry(&cli);

    let service = LiveCatalogService::new(CatalogPaths::from_env());
    run(cli.command, &service).await
}

async fn run(command: Commands, service: &LiveCatalogService) -> anyhow::Result<()> {
    match command {
        Commands::Index => {
            let report = service.build_index().await?;
            println!(
                "Indexed {} skills across {} repositories.",
                report["skills"], report["repositories"]
            );
            if let Some(outcomes) = report["outcomes"].as_array() {
                for outcome in outcomes.iter().filter(|o| o["success"] == false) {
                    println!(
                        "  failed: {} ({})",
                        outcome["repo"].as_str().unwrap_or("?"),
                        outcome["detail"].as_str().unwrap_or("unknown error"),
                    );
                }
            }
        },
        Commands::Fetch { source } => {
            let (owner, repo) = skilldeck_catalog::sources::parse_source(&source)?;
            let payload = service
                .fetch_repo(serde_json::json!({ "owner": owner, "repo": repo }))
                .await?;
            println!("{}", payload["message"].as_str().unwrap_or("Fetched."));
        },
        Commands::List => {
            let payload = service.skills_list().await?;
            let skills = payload.as_array().cloned().unwrap_or_default();
            if skills.is_empty() {
                println!("No skills indexed. Run `skilldeck index` first.");
            }
            for skill in &skills {
                let installed = if skill["isInstalled"] == true { " [installed]" } else { "" };
                let favorite = if skill["isFavorite"] == true { " ★" } else { "" };
                println!(
                    "  {} — {}{}{}",
                    skill["id"].as_str().unwrap_or("?"),
                    skill["description"].as_str().unwrap_or(""),
                    installed,
                    favorite,
                );
            }
        },
        Commands::Repos { action } => run_repos(action, service).await?,
        Commands::Install { id, method } => {
            let mut params = serde_json::json!({ "id": id });
            if let Some(method) = method {
                params["method"] = serde_json::Value::String(method);
            }
            let payload = service.skill_install(params).await?;
            println!("{}", payload["message"].as_str().unwrap_or("Installed."));
        },
        Commands::Uninstall { name } => {
            service
                .skill_uninstall(serde_json::json!({ "name": name }))
                .await?;
            println!("Uninstalled '{name}'.");
        },
        Commands::Favorites { action } => run_favorites(action, service).await?,
    }
    Ok(())
}

async fn run_repos(action: RepoAction, service: &LiveCatalogService) -> anyhow::Result<()> {
    match action {
        RepoAction::List => {
            let payload = service.repos_list().await?;
            for repo in payload.as_array().cloned().unwrap_or_default() {
                let fetched = if repo["isFetched"] == true { "fetched" } else { "not fetched" };
                println!(
                    "  {}/{} — {} skills ({})",
                    repo["owner"].as_str().unwrap_or("?"),
                    repo["repo"].as_str().unwrap_or("?"),
                    repo["skillCount"],
                    fetched,
                );
            }
        },
        RepoAction::Add { source } => {
            let payload = service
                .repos_add(serde_json::json!({ "source": source }))
                .await?;
            println!("{}", payload["message"].as_str().unwrap_or("Added."));
        },
        RepoAction::Remove { source } => {
            let (owner, repo) = skilldeck_catalog::sources::parse_source(&source)?;
            service
                .repos_remove(serde_json::json!({ "owner": owner, "repo": repo }))
                .await?;
            println!("Removed '{owner}/{repo}'.");
        },
        RepoAction::Readme { source } => {
            let (owner, repo) = skilldeck_catalog::sources::parse_source(&source)?;
            let payload = service
                .repo_readme(serde_json::json!({ "owner": owner, "repo": repo }))
                .await?;
            println!("{}", payload["content"].as_str().unwrap_or(""));
        },
    }
    Ok(())
}

async fn run_favorites(action: FavoriteAction, service: &LiveCatalogService) -> anyhow::Result<()> {
    match action {
        FavoriteAction::List => {
            let payload = service.favorites_get().await?;
            println!("Skills:");
            for id in payload["skills"].as_array().cloned().unwrap_or_default() {
                println!("  {}", id.as_str().unwrap_or("?"));
            }
            println!("Repositories:");
            for key in payload["repos"].as_array().cloned().unwrap_or_default() {
                println!("  {}", key.as_str().unwrap_or("?"));
            }
        },
        FavoriteAction::Skill { id } => {
            let payload = service
                .favorite_skill_toggle(serde_json::json!({ "id": id }))
                .await?;
            let on = payload["skills"]
                .as_array()
                .is_some_and(|s| s.iter().any(|v| v == id.as_str()));
            println!("{} '{id}'.", if on { "Favorited" } else { "Unfavorited" });
        },
        FavoriteAction::Repo { source } => {
            let (owner, repo) = skilldeck_catalog::sources::parse_source(&source)?;
            let key = format!("{owner}/{repo}");
            let payload = service
                .favorite_repo_toggle(serde_json::json!({ "repo": key }))
                .await?;
            let on = payload["repos"]
                .as_array()
                .is_some_and(|r| r.iter().any(|v| v == key.as_str()));
            println!("{} '{key}'.", if on { "Favorited" } else { "Unfavorited" });
        },
    }
    Ok(())
}
