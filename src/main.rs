use clap::Parser;
use protected_nav::config::cli::{Cli, Command, OutputFormat};
use protected_nav::utils::error::{ErrorSeverity, NavError};
use protected_nav::utils::logger;
use protected_nav::utils::validation::Validate;
use protected_nav::{
    create_client, AppConfig, ExecutionContext, Sidebar, SidebarBuilder, UrlResolver,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: &Cli) -> Result<(), NavError> {
    let config = cli.load_config()?;
    config.validate()?;

    match &cli.command {
        Command::Sidebar { format, .. } => {
            let sidebar = sidebar(cli, &config).await?;
            print_sidebar(&sidebar, *format)?;
        }
        Command::BaseUrl { origin } => {
            println!("{}", resolver(origin, &config).base_url());
        }
        Command::FullUrl { path, origin } => {
            println!("{}", resolver(origin, &config).full_url(path));
        }
    }

    Ok(())
}

async fn sidebar(cli: &Cli, config: &AppConfig) -> Result<Sidebar, NavError> {
    let store = cli.session_store()?;
    let state = create_client(&config.entitlements, store)?;
    if !state.is_enabled() {
        tracing::info!("Entitlements not configured, paid content stays disabled");
    }
    SidebarBuilder::from_config(&config.sidebar).build(&state).await
}

fn resolver(origin: &Option<String>, config: &AppConfig) -> UrlResolver {
    let context = match origin {
        Some(origin) => ExecutionContext::browser(origin.clone()),
        None => ExecutionContext::Server,
    };
    UrlResolver::new(context, config.urls.clone())
}

fn print_sidebar(sidebar: &Sidebar, format: OutputFormat) -> Result<(), NavError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(sidebar)?),
        OutputFormat::Text => {
            for (item, link) in sidebar.items.iter().zip(sidebar.links()) {
                let marker = if item.disabled { "✗" } else { "✓" };
                println!("{} {:<14} {}", marker, item.label, link);
            }
        }
    }
    Ok(())
}
