use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use registry_admin::registry::prelude::*;
use registry_admin::registry::{Collection, Draft, ReferenceData, ReferenceKind};
use registry_admin::{CurrentUser, EntityId, RegistryConfig, SessionStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "registry", version, about = "Manage academic records over the registry REST API")]
struct Cli {
    /// Configuration file (defaults to ./registry.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overriding configuration and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in, sign out or show who is signed in.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
    /// Lists a collection as a table.
    List {
        resource: ResourceKind,
        /// Only rows matching FIELD=VALUE (e.g. provincia=3)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Shows one record.
    Show { resource: ResourceKind, id: EntityId },
    /// Prints the choices for a selection input.
    Options { collection: CollectionKind },
    /// Creates a record from FIELD=VALUE pairs.
    Create {
        resource: ResourceKind,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Edits a record; unspecified fields keep their current value.
    Edit {
        resource: ResourceKind,
        id: EntityId,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        fields: Vec<String>,
    },
    /// Deletes a record after confirmation.
    Delete {
        resource: ResourceKind,
        id: EntityId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
    Students,
    Institutions,
    Provinces,
    Cities,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollectionKind {
    Cities,
    Institutions,
    Provinces,
}

impl From<CollectionKind> for ReferenceKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Cities => ReferenceKind::Cities,
            CollectionKind::Institutions => ReferenceKind::Institutions,
            CollectionKind::Provinces => ReferenceKind::Provinces,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = RegistryConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    log::debug!("Using API at {}", config.api.base_url);

    let mut session = SessionStore::init(&config.session.path);

    let command = match cli.command {
        Commands::Session { action } => return run_session(&mut session, action),
        command => command,
    };

    if !session.is_authenticated() {
        bail!("Not signed in. Run `registry session login --username <USER>` first.");
    }

    let base_url = config.api.base_url.as_str();
    match command.resource() {
        Some(ResourceKind::Students) => run::<Students>(base_url, command).await,
        Some(ResourceKind::Institutions) => run::<Institutions>(base_url, command).await,
        Some(ResourceKind::Provinces) => run::<Provinces>(base_url, command).await,
        Some(ResourceKind::Cities) => run::<Cities>(base_url, command).await,
        None => run_options(base_url, command).await,
    }
}

impl Commands {
    fn resource(&self) -> Option<ResourceKind> {
        match self {
            Commands::List { resource, .. }
            | Commands::Show { resource, .. }
            | Commands::Create { resource, .. }
            | Commands::Edit { resource, .. }
            | Commands::Delete { resource, .. } => Some(*resource),
            Commands::Session { .. } | Commands::Options { .. } => None,
        }
    }
}

fn run_session(session: &mut SessionStore, action: SessionCommand) -> Result<()> {
    match action {
        SessionCommand::Login { username, name } => {
            session.update(CurrentUser {
                username,
                display_name: name,
            })?;
            if let Some(user) = session.current_user() {
                println!("✅ Signed in as {}", user.label());
            }
        }
        SessionCommand::Logout => {
            session.clear()?;
            println!("Signed out");
        }
        SessionCommand::Show => match session.current_user() {
            Some(user) => println!("Signed in as {} ({})", user.label(), user.username),
            None => println!("Not signed in"),
        },
    }
    Ok(())
}

async fn run_options(base_url: &str, command: Commands) -> Result<()> {
    let Commands::Options { collection } = command else {
        return Ok(());
    };

    let backend = registry_admin::HttpBackend::new(base_url)?;
    let kind = ReferenceKind::from(collection);
    let references = ReferenceData::load(&backend, &[kind])
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", kind.resource(), e.user_message()))?;

    for (id, label) in references.options(kind) {
        println!("{:>6}  {}", id, label);
    }
    Ok(())
}

async fn run<R: Resource>(base_url: &str, command: Commands) -> Result<()> {
    let mut manager = CrudManager::<R>::connect(base_url)?;

    match command {
        Commands::List { filter, .. } => {
            let filter = filter.as_deref().map(parse_filter).transpose()?;
            step(&mut manager, CrudAction::SetFilter { filter }).await?;
            print!("{}", manager.state().table());
        }
        Commands::Show { id, .. } => {
            let entity = Collection::<R::Entity>::new(manager.backend())
                .get(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load {} {}: {}", R::NOUN, id, e.user_message()))?;
            let draft = R::Draft::hydrate(&entity);
            println!("{} {}", R::TITLE, id);
            for field in R::Draft::FIELDS {
                println!("  {:<18} {}", field, draft.field(field).unwrap_or_default());
            }
        }
        Commands::Create { fields, .. } => {
            step(&mut manager, CrudAction::Mount).await?;
            step(&mut manager, CrudAction::OpenCreate).await?;
            submit(&mut manager, &fields).await?;
        }
        Commands::Edit { id, fields, .. } => {
            step(&mut manager, CrudAction::Mount).await?;
            step(&mut manager, CrudAction::OpenEdit { id }).await?;
            submit(&mut manager, &fields).await?;
        }
        Commands::Delete { id, yes, .. } => {
            step(&mut manager, CrudAction::Mount).await?;
            step(&mut manager, CrudAction::RequestDelete { id }).await?;

            let prompt = manager.state().delete_prompt().unwrap_or_default();
            if yes || confirm(&prompt)? {
                step(&mut manager, CrudAction::ConfirmDelete).await?;
                report(&manager);
            } else {
                step(&mut manager, CrudAction::CancelDelete).await?;
                println!("Cancelled");
            }
        }
        Commands::Session { .. } | Commands::Options { .. } => {}
    }
    Ok(())
}

/// Runs one action to completion and turns an error banner into a failure.
async fn step<R: Resource>(manager: &mut CrudManager<R>, action: CrudAction) -> Result<()> {
    manager.dispatch(action);
    manager.run_pending().await;

    match &manager.state().error {
        Some(error) => bail!("{}", error),
        None => Ok(()),
    }
}

async fn submit<R: Resource>(manager: &mut CrudManager<R>, fields: &[String]) -> Result<()> {
    for pair in fields {
        let (name, value) = split_pair(pair)?;
        step(manager, CrudAction::set_field(name, value)).await?;
    }
    if !manager.state().can_submit() {
        bail!("The {} form is not ready to submit", R::NOUN);
    }
    step(manager, CrudAction::Submit).await?;
    report(manager);
    print!("{}", manager.state().table());
    Ok(())
}

fn report<R: Resource>(manager: &CrudManager<R>) {
    if let Some(message) = &manager.state().success {
        println!("✅ {}", message);
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .with_context(|| format!("expected FIELD=VALUE, got `{}`", pair))
}

fn parse_filter(raw: &str) -> Result<ListFilter> {
    let (field, value) = split_pair(raw)?;
    if field.is_empty() || value.trim().is_empty() {
        bail!("filter needs both a field and a value, got `{}`", raw);
    }
    Ok(ListFilter::new(field, value.trim()))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pair_keeps_value_verbatim() {
        assert_eq!(split_pair("nombre=Ana María").unwrap(), ("nombre", "Ana María"));
        assert_eq!(split_pair("correo=").unwrap(), ("correo", ""));
        assert_eq!(split_pair("url=a=b").unwrap(), ("url", "a=b"));
        assert!(split_pair("nombre").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("provincia=3").unwrap(),
            ListFilter::new("provincia", "3")
        );
        assert!(parse_filter("provincia=").is_err());
        assert!(parse_filter("=3").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "registry",
            "--base-url",
            "http://api.local",
            "create",
            "cities",
            "--set",
            "ciudad=Loja",
            "--set",
            "provincia_id=11",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://api.local"));
        match cli.command {
            Commands::Create { resource, fields } => {
                assert!(matches!(resource, ResourceKind::Cities));
                assert_eq!(fields, vec!["ciudad=Loja", "provincia_id=11"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["registry", "show", "students", "abc"]).is_err());
    }
}
