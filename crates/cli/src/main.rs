//! `grimoire` -- terminal front end for the fan-site data core.
//!
//! Loads characters and spells from the configured source, then runs one
//! command against them the same way the web UI would: by dispatching UI
//! events to a [`Session`] and rendering the resulting view updates.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                           |
//! |--------------------------|----------|-----------------------------------|
//! | `GRIMOIRE_API_URL`       | no       | `https://hp-api.onrender.com/api` |
//! | `GRIMOIRE_STATIC_URL`    | no       | --                                |
//! | `GRIMOIRE_SOURCE`        | no       | `remote` (or `static` if a static URL is set) |
//! | `GRIMOIRE_FEATURED_ONLY` | no       | `false`                           |
//! | `GRIMOIRE_STORE_PATH`    | no       | `grimoire-store.json`             |
//! | `REQUEST_TIMEOUT_SECS`   | no       | `30`                              |

mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grimoire_client::{
    ClientConfig, Loader, LocalStore, QuizClient, RequestHandle, Session, UiEvent,
};
use grimoire_core::contact::{ContactForm, FieldError};
use grimoire_core::quiz::score_quiz;
use grimoire_core::theme::Theme;
use grimoire_core::{DataStore, SortOrder};
use grimoire_events::EventBus;

#[derive(Debug, Parser)]
#[command(name = "grimoire", about = "Browse characters, spells, and trivia")]
struct Cli {
    /// Print view models as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List characters, optionally filtered and sorted.
    Characters {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        house: String,
        #[arg(long, default_value = "asc")]
        sort: SortOrder,
    },
    /// Show the details view for one character id.
    Details { id: String },
    /// List spells grouped by category.
    Spells {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Print the quiz, or score it when answers are given.
    Quiz {
        /// Answers in question order, comma separated; empty entries are skipped questions.
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,
    },
    /// Validate a contact message and save it locally.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        house: String,
        #[arg(long)]
        message: String,
    },
    /// Show, set, or toggle the saved theme.
    Theme {
        /// `dark`, `light`, or `toggle`. Omit to show the current theme.
        value: Option<String>,
        /// Treat the system as preferring dark mode when nothing is saved.
        #[arg(long)]
        system_dark: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grimoire=info,grimoire_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("invalid configuration")?;

    tracing::info!(
        source = ?config.source,
        api_url = %config.api_url,
        static_url = ?config.static_url,
        "Starting grimoire",
    );

    let api = config.api_client()?;
    let bus = Arc::new(EventBus::default());
    let mut notifications = bus.subscribe();
    let local = LocalStore::open(&config.store_path);

    match cli.command {
        Command::Characters { search, house, sort } => {
            let mut session = load_session(&config, api, bus.clone()).await?;
            session.dispatch(UiEvent::HouseFilterChanged(house)).await;
            if sort == SortOrder::Descending {
                session.dispatch(UiEvent::SortToggled).await;
            }
            let update = session.dispatch(UiEvent::SearchChanged(search)).await;
            render::view_update(&update, cli.json)?;
        }
        Command::Details { id } => {
            let mut session = load_session(&config, api, bus.clone()).await?;
            let update = session.dispatch(UiEvent::DetailsRequested(id)).await;
            render::view_update(&update, cli.json)?;
        }
        Command::Spells { search, category } => {
            let mut session = load_session(&config, api, bus.clone()).await?;
            session.dispatch(UiEvent::SpellSearchChanged(search)).await;
            let update = session.dispatch(UiEvent::SpellCategoryChanged(category)).await;
            render::view_update(&update, cli.json)?;
        }
        Command::Quiz { answers } => {
            let quiz = QuizClient::new(api);
            let questions = quiz.fetch_questions(&RequestHandle::new()).await;
            match answers {
                None => render::questions(&questions, cli.json)?,
                Some(answers) => {
                    let answers: Vec<Option<String>> = answers
                        .into_iter()
                        .map(|a| Some(a.trim().to_string()).filter(|a| !a.is_empty()))
                        .collect();
                    render::quiz_result(&score_quiz(&questions, &answers), cli.json)?;
                }
            }
        }
        Command::Contact {
            name,
            email,
            house,
            message,
        } => {
            let form = ContactForm {
                name,
                email,
                house,
                message,
            };
            match submit_contact(&local, form)? {
                Ok(total) => println!("Thank you for your message! ({total} saved)"),
                Err(errors) => {
                    render::field_errors(&errors);
                    std::process::exit(2);
                }
            }
        }
        Command::Theme { value, system_dark } => {
            let current = Theme::resolve(local.theme(), system_dark);
            let next = match value.as_deref() {
                None => current,
                Some("toggle") => current.toggle(),
                Some(raw) => raw.parse()?,
            };
            if value.is_some() {
                if let Err(e) = local.set_theme(next) {
                    tracing::warn!(error = %e, "Failed to save theme");
                }
            }
            println!("{next}");
        }
    }

    render::drain_notifications(&mut notifications);
    Ok(())
}

/// Validate and save a contact form. The outer error is a storage failure;
/// the inner one carries the form's field errors.
fn submit_contact(
    local: &LocalStore,
    form: ContactForm,
) -> anyhow::Result<Result<usize, Vec<FieldError>>> {
    let submission = match form.into_submission(chrono::Utc::now()) {
        Ok(submission) => submission,
        Err(errors) => return Ok(Err(errors)),
    };
    let total = local
        .append_submission(submission)
        .context("failed to save contact submission")?;
    Ok(Ok(total))
}

/// Build the loader, run the initial load, and hand back a session over it.
async fn load_session(
    config: &ClientConfig,
    api: grimoire_client::ApiClient,
    bus: Arc<EventBus>,
) -> anyhow::Result<Session> {
    let source = config.build_source(api)?;
    let store = Arc::new(RwLock::new(DataStore::new()));
    let loader = Arc::new(Loader::new(source, store, bus));

    let (characters, spells) = loader.load().await.into_lists();
    tracing::debug!(
        characters = characters.len(),
        spells = spells.len(),
        "Initial load finished"
    );

    Ok(Session::new(loader))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Cedric Diggory".into(),
            email: "cedric@hogwarts.ac.uk".into(),
            house: "Hufflepuff".into(),
            message: "Fair play in the tournament".into(),
        }
    }

    #[test]
    fn valid_contact_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path().join("store.json"));
        assert_eq!(submit_contact(&local, form()).unwrap().unwrap(), 1);
        assert_eq!(local.submissions().len(), 1);
    }

    #[test]
    fn invalid_contact_returns_field_errors() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path().join("store.json"));
        let mut bad = form();
        bad.email = "not-an-email".into();
        let errors = submit_contact(&local, bad).unwrap().unwrap_err();
        assert_eq!(errors[0].field, "email");
        assert!(local.submissions().is_empty());
    }

    #[test]
    fn save_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the store file should be makes the write fail.
        let local = LocalStore::open(dir.path());
        let err = submit_contact(&local, form()).unwrap_err();
        assert!(err.to_string().contains("failed to save contact submission"));
    }
}
