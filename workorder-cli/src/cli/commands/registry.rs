//! `registry` command: canonical collaborator and service names

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use sqlx::SqlitePool;

use super::open_database;
use crate::config::Config;
use crate::config::repository::registry;

#[derive(Debug, Subcommand)]
pub enum RegistryCommands {
    /// List active collaborators and services
    List,
    /// Register collaborators (technicians, supervisors, salespeople)
    AddCollaborator {
        /// Canonical names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Register services
    AddService {
        /// Canonical names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Stop resolving references to a collaborator
    DeactivateCollaborator {
        name: String,
    },
}

/// Handle the registry command
pub async fn handle_registry_command(command: RegistryCommands, config: &Config) -> Result<()> {
    let pool = open_database(config).await?;
    let result = run_registry_command(command, &pool).await;
    pool.close().await;
    result
}

async fn run_registry_command(command: RegistryCommands, pool: &SqlitePool) -> Result<()> {
    match command {
        RegistryCommands::List => {
            println!("{}", "Collaborators".bold());
            for name in registry::list_collaborators(pool).await? {
                println!("  {}", name);
            }
            println!("{}", "Services".bold());
            for name in registry::list_services(pool).await? {
                println!("  {}", name);
            }
        }
        RegistryCommands::AddCollaborator { names } => {
            for name in non_blank(&names) {
                registry::add_collaborator(pool, name).await?;
                println!("{} {}", "added".green(), name);
            }
        }
        RegistryCommands::AddService { names } => {
            for name in non_blank(&names) {
                registry::add_service(pool, name).await?;
                println!("{} {}", "added".green(), name);
            }
        }
        RegistryCommands::DeactivateCollaborator { name } => {
            if !registry::deactivate_collaborator(pool, &name).await? {
                anyhow::bail!("No collaborator named '{}'", name.trim());
            }
            println!("{} {}", "deactivated".yellow(), name.trim());
        }
    }
    Ok(())
}

fn non_blank(names: &[String]) -> impl Iterator<Item = &str> {
    names.iter().map(|n| n.trim()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::repository::connect_in_memory;

    #[tokio::test]
    async fn test_added_names_reach_the_snapshot() {
        let pool = connect_in_memory().await.unwrap();

        run_registry_command(
            RegistryCommands::AddCollaborator {
                names: vec!["Juan Pérez".to_string(), "  ".to_string()],
            },
            &pool,
        )
        .await
        .unwrap();
        run_registry_command(
            RegistryCommands::AddService {
                names: vec!["Mantención Preventiva".to_string()],
            },
            &pool,
        )
        .await
        .unwrap();

        let snapshot = registry::load_snapshot(&pool).await.unwrap();
        assert_eq!(snapshot.collaborators.len(), 1);
        assert_eq!(snapshot.collaborators.match_name("juan perez"), "Juan Pérez");
        assert_eq!(
            snapshot.services.match_exact("MANTENCION PREVENTIVA"),
            "Mantención Preventiva"
        );
    }

    #[tokio::test]
    async fn test_deactivate_unknown_collaborator_fails() {
        let pool = connect_in_memory().await.unwrap();
        let result = run_registry_command(
            RegistryCommands::DeactivateCollaborator {
                name: "Nobody".to_string(),
            },
            &pool,
        )
        .await;
        assert!(result.is_err());
    }
}
