use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use pos_core::domain::{default_navigation, NavigationItem, RoleName};
use pos_core::services::{
    filter_navigation, resolve_breadcrumbs, Notifier, PermissionMatrixService, SessionContext,
    SidebarKeys, SidebarPreferences,
};
use pos_infrastructure::{HttpPosApi, JsonFilePreferenceStore};
use pos_shared::config::AppConfig;

#[derive(Parser)]
#[command(name = "pos-console", about = "Operator console for the POS navigation and access layer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the breadcrumb trail for a route
    Breadcrumbs { path: String },
    /// Print the sidebar visible to the given roles, or to the signed-in user
    Nav {
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Print the role x permission matrix
    Matrix,
    /// Flip one permission for one role
    Toggle { role_id: Uuid, permission_id: Uuid },
    /// Show or change the stored sidebar preferences
    Sidebar {
        #[arg(long)]
        collapse: bool,
        #[arg(long = "expand")]
        expand: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    pos_shared::telemetry::init_telemetry("info,pos_core=debug,pos_infrastructure=debug");

    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("{} ({}) starting", config.app.name, config.app.env);

    match cli.command {
        Command::Breadcrumbs { path } => {
            let trail: Vec<String> = resolve_breadcrumbs(&path)
                .into_iter()
                .map(|item| match item.path {
                    Some(link) => format!("{} ({})", item.label, link),
                    None => item.label.into_owned(),
                })
                .collect();
            println!("{}", trail.join(" > "));
        }
        Command::Nav { roles } => {
            let items = if roles.is_empty() {
                let api = HttpPosApi::new(&config.api)?;
                let mut session = SessionContext::default();
                session.refresh(&api).await?;
                session.visible_navigation()?
            } else {
                let roles: Vec<RoleName> = roles.iter().map(|r| RoleName::parse(r)).collect();
                filter_navigation(&default_navigation(), &roles)
            };
            print_navigation(&items, 0);
        }
        Command::Matrix => {
            let service = matrix_service(&config)?;
            service.load().await?;
            let matrix = service.matrix();
            let header: Vec<&str> = matrix.roles.iter().map(|r| r.name.as_str()).collect();
            println!("{:<32} {}", "", header.join("  "));
            for group in &matrix.groups {
                println!("[{}]", group.module);
                for row in &group.rows {
                    let cells: Vec<&str> = row
                        .cells
                        .iter()
                        .map(|c| match (c.assigned, c.editable) {
                            (true, true) => "x",
                            (true, false) => "#",
                            (false, _) => ".",
                        })
                        .collect();
                    println!("  {:<30} {}", row.permission.name, cells.join("  "));
                }
            }
        }
        Command::Toggle { role_id, permission_id } => {
            let service = matrix_service(&config)?;
            service.load().await?;
            let mut notifications = service.notifier().subscribe();
            let result = service.toggle(role_id, permission_id).await;
            if let Ok(n) = notifications.try_recv() {
                println!("{}", n.message);
            }
            let confirmed = result?;
            println!("Role {} now has {} permissions", role_id, confirmed.len());
        }
        Command::Sidebar { collapse, expand } => {
            let store = Arc::new(JsonFilePreferenceStore::open(&config.storage.path)?);
            let keys = SidebarKeys {
                collapsed: config.storage.sidebar_collapsed_key.clone(),
                expanded: config.storage.sidebar_expanded_key.clone(),
            };
            let mut prefs = SidebarPreferences::load(store, keys);
            if collapse {
                prefs.toggle_collapsed()?;
            }
            for node in &expand {
                prefs.toggle_expanded(node)?;
            }
            println!("collapsed: {}", prefs.is_collapsed());
            let expanded: Vec<&str> = prefs.expanded().iter().map(String::as_str).collect();
            println!("expanded: [{}]", expanded.join(", "));
        }
    }

    Ok(())
}

fn matrix_service(config: &AppConfig) -> anyhow::Result<Arc<PermissionMatrixService<HttpPosApi>>> {
    let api = Arc::new(HttpPosApi::new(&config.api)?);
    let notifier = Notifier::new(config.notifications.capacity);
    Ok(Arc::new(PermissionMatrixService::new(api, notifier, config.api.page_size)))
}

fn print_navigation(items: &[NavigationItem], depth: usize) {
    for item in items {
        println!("{}{:<24} {}", "  ".repeat(depth), item.name, item.path);
        print_navigation(&item.children, depth + 1);
    }
}
