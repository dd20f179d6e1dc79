//! CLI command implementations

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::CommandFactory;
use clap_complete::Shell;

use crate::categories::{Category, CategoryStore, MeetingList, MeetingListRef};
use crate::cli::args::{
    CategoriesCommand, Cli, ConfigCommand, DbCommand, MaintenanceCommand, MruCommand,
};
use crate::config::Settings;
use crate::storage::{DeleteOutcome, MruRecord, Preferences, RecencyStore, Repository};

/// Handle recently viewed item subcommands
pub fn mru_command(settings: &Settings, store: &mut RecencyStore, cmd: MruCommand) -> Result<()> {
    let mut repo = Repository::new(store, settings.storage.mru_capacity);

    match cmd {
        MruCommand::Add {
            title,
            id_ref,
            start,
        } => {
            let record = repo.record_visit(title, id_ref, start.unwrap_or_else(Utc::now))?;
            println!("Recorded: {} (id {})", record.title, record.id);
        }
        MruCommand::List { limit } => {
            let records = repo.recent(limit)?;
            print_records(&records);
        }
        MruCommand::Open { id } => {
            if !repo.reopen(id)? {
                anyhow::bail!("No recent item with id {}", id);
            }
            println!("Moved {} to the front", id);
        }
        MruCommand::Remove { id } => {
            if !repo.forget_item(id)? {
                anyhow::bail!("No recent item with id {}", id);
            }
            println!("Removed {}", id);
        }
        MruCommand::Prune { keep } => {
            let removed = repo.prune(keep)?;
            println!("Removed {} item(s)", removed);
        }
    }

    Ok(())
}

/// Handle database lifecycle subcommands
pub fn db_command(store: &mut RecencyStore, cmd: DbCommand) -> Result<()> {
    match cmd {
        DbCommand::Create => {
            let version = store.create()?.schema_version()?;
            println!(
                "Database ready at {} (schema v{})",
                store.path().display(),
                version
            );
        }
        DbCommand::Reset => {
            store.reset_tables()?;
            println!("Database tables recreated");
        }
        DbCommand::Delete => match store.delete_database()? {
            DeleteOutcome::Deleted => println!("Database deleted"),
            DeleteOutcome::AlreadyAbsent => println!("No database to delete"),
            DeleteOutcome::ResetInPlace => {
                println!("Database file could not be removed, tables were reset instead")
            }
        },
        DbCommand::Status => {
            let path = store.path().to_path_buf();
            if !path.exists() {
                println!("Database: {} (not created)", path.display());
                return Ok(());
            }

            let stats = store.database()?.get_stats()?;
            println!("Database: {}", path.display());
            println!("Schema version: {}", stats.schema_version);
            println!("Recent items: {}", stats.total_items);
            if let Some(at) = stats.last_looked_at {
                println!("Last opened: {}", format_local(at));
            }
        }
    }

    Ok(())
}

/// Handle category subcommands
pub fn categories_command(settings: &Settings, cmd: CategoriesCommand) -> Result<()> {
    let store = CategoryStore::new(Preferences::new(settings.preferences_path()));

    match cmd {
        CategoriesCommand::List { json } => {
            let categories = store.load_categories()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
                return Ok(());
            }

            if categories.is_empty() {
                println!("No categories configured");
                return Ok(());
            }

            println!("{:<30} {:<6} {}", "Title", "Home", "Meeting list");
            println!("{}", "-".repeat(70));
            for category in categories {
                println!(
                    "{:<30} {:<6} {}",
                    truncate(&category.category_title, 28),
                    if category.display_on_home_page { "yes" } else { "no" },
                    category.meeting_list_ref.describe()
                );
            }
        }
        CategoriesCommand::Add {
            title,
            home,
            server,
            category,
            search,
            url,
            favorites,
        } => {
            let reference = meeting_list_from_args(server, category, search, url, favorites)?;
            let categories = store.add_category(Category::new(title, home, reference))?;
            println!("{} categories configured", categories.len());
        }
        CategoriesCommand::Remove { title } => {
            if !store.remove_category(&title)? {
                anyhow::bail!("No category titled {}", title);
            }
            println!("Removed {}", title);
        }
        CategoriesCommand::Clear => {
            store.clear()?;
            println!("All categories removed");
        }
    }

    Ok(())
}

/// Handle maintenance subcommands
pub async fn maintenance_command(settings: &Settings, cmd: MaintenanceCommand) -> Result<()> {
    match cmd {
        MaintenanceCommand::Run => {
            settings.ensure_dirs()?;
            let task = crate::daemon::maintenance_task(settings);
            tokio::task::spawn_blocking(move || task.run()).await?;
            println!("Maintenance finished");
        }
        MaintenanceCommand::Watch => {
            crate::daemon::run_foreground(settings).await?;
        }
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the completion script for `shell` to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

// Helper functions

fn meeting_list_from_args(
    server: Option<String>,
    category: Option<String>,
    search: Option<String>,
    url: Option<String>,
    favorites: bool,
) -> Result<MeetingListRef> {
    if favorites {
        return Ok(MeetingListRef::Favorites);
    }
    if let Some(url) = url {
        return Ok(MeetingListRef::Url { url });
    }

    let server = server.context("--server is required for --category and --search")?;
    match (category, search) {
        (Some(category_id), _) => Ok(MeetingListRef::Category {
            server,
            category_id,
        }),
        (None, Some(query)) => Ok(MeetingListRef::Search { server, query }),
        (None, None) => anyhow::bail!("No meeting list given"),
    }
}

fn print_records(records: &[MruRecord]) {
    if records.is_empty() {
        println!("No recently viewed items");
        return;
    }

    println!(
        "{:<6} {:<42} {:<17} {:<17}",
        "ID", "Title", "Starts", "Last opened"
    );
    println!("{}", "-".repeat(84));

    for record in records {
        println!(
            "{:<6} {:<42} {:<17} {:<17}",
            record.id,
            record.title,
            format_local(record.start_time),
            format_local(record.last_looked_at)
        );
    }
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
