//! CLI runner - executes commands

use crate::auth::{AuthConfig, Credentials};
use crate::cli::commands::{Cli, Commands};
use crate::config::Settings;
use crate::contacts::ContactsClient;
use crate::error::{Result, ResultExt};
use crate::export::Exporter;
use crate::http::{HttpClient, HttpClientConfig};
use crate::import::{ImportReport, Importer, RestDestination};
use crate::meetings::{filter_by_date, notify_meetings, MeetingsClient, WebhookNotifier};
use crate::snapshot::SnapshotStore;
use crate::transcript::{format_transcript, Sentence, Transcript};
use chrono::NaiveDate;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
#[derive(Debug)]
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = self.load_settings()?;

        match &self.cli.command {
            Commands::Export { collections } => self.export(&settings, collections).await,
            Commands::Import => self.import(&settings).await,
            Commands::Meetings { date } => self.meetings(&settings, *date).await,
            Commands::Contacts { owner } => self.contacts(&settings, owner).await,
            Commands::Transcript { file } => self.transcript(file).await,
        }
    }

    /// Load settings and apply command-line overrides
    fn load_settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.cli.config.as_deref())?;
        if let Some(dir) = &self.cli.snapshot_dir {
            settings.snapshot_dir.clone_from(dir);
        }
        debug!("Settings: {settings:?}");
        Ok(settings)
    }

    /// Authenticated client for the relational backend
    fn backend_client(&self, settings: &Settings) -> Result<HttpClient> {
        let base_url = settings
            .backend
            .resolve_base_url(self.cli.base_url.as_deref())?;
        let key = Credentials::from_env(&settings.backend.key_env)?;
        info!("Backend {base_url} (key from {})", key.source());

        let config = HttpClientConfig::builder().base_url(base_url).build();
        HttpClient::with_auth(config, AuthConfig::supabase(key))
    }

    /// Export command
    async fn export(&self, settings: &Settings, collections: &[String]) -> Result<()> {
        let client = self.backend_client(settings)?;
        let store = SnapshotStore::new(&settings.snapshot_dir);
        let collections = if collections.is_empty() {
            settings.backend.collections.as_slice()
        } else {
            collections
        };

        let start = Instant::now();
        let exporter =
            Exporter::new(&client, &store).with_config(settings.backend.export_config());
        let written = exporter.export_all(collections).await?;

        for snapshot in collections.iter().filter_map(|name| written.get(name)) {
            println!(
                "Exported {} {} records to {}",
                snapshot.records,
                snapshot.collection,
                snapshot.path.display()
            );
        }
        info!(
            "Export finished: {} collections in {} ms",
            written.len(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Import command
    async fn import(&self, settings: &Settings) -> Result<()> {
        let client = self.backend_client(settings)?;
        let destination = RestDestination::new(client).with_rest_path(&settings.backend.rest_path);
        let store = SnapshotStore::new(&settings.snapshot_dir);

        let importer =
            Importer::new(&destination, &store).with_config(settings.backend.import_config());
        let report = importer.import_all(&settings.backend.import_plan).await?;

        print_import_report(&report);
        Ok(())
    }

    /// Meetings command
    async fn meetings(&self, settings: &Settings, date: Option<NaiveDate>) -> Result<()> {
        let transcripts = &settings.transcripts;
        let token = Credentials::from_env(&transcripts.token_env)?;
        let team_id = transcripts.resolve_team_id()?;
        let notifier =
            WebhookNotifier::new(transcripts.require_webhook_url()?, transcripts.webhook_interval())?;

        let config = HttpClientConfig::builder()
            .base_url(&transcripts.base_url)
            .user_agent(&transcripts.user_agent)
            .build();
        let http = HttpClient::with_auth(config, AuthConfig::bearer(token))?;
        let client = MeetingsClient::new(http, team_id).with_page_size(transcripts.page_size);

        let mut meetings = client.list_meetings().await?;
        match date {
            Some(date) => {
                meetings = filter_by_date(meetings, date);
                println!("Filtered to {} meetings on {date}\n", meetings.len());
            }
            None => println!("Fetched {} meetings\n", meetings.len()),
        }

        let outcomes = notify_meetings(&client, &notifier, &meetings).await;
        for outcome in &outcomes {
            println!("{outcome}");
        }

        let failed = outcomes.iter().filter(|o| !o.is_notified()).count();
        info!(
            "Meetings finished: {} notified, {failed} failed",
            outcomes.len() - failed
        );
        Ok(())
    }

    /// Contacts command
    async fn contacts(&self, settings: &Settings, owner: &str) -> Result<()> {
        let crm = &settings.crm;
        let token = Credentials::from_env(&crm.token_env)?;

        let config = HttpClientConfig::builder().base_url(&crm.base_url).build();
        let http = HttpClient::with_auth(config, AuthConfig::bearer(token))?;
        let client = ContactsClient::new(http).with_page_size(crm.page_size);

        let contacts = client.contacts_for_owner(owner).await?;

        println!("Total contacts for owner {owner}: {}\n", contacts.len());
        for contact in &contacts {
            println!("  {contact}");
        }
        Ok(())
    }

    /// Transcript command
    async fn transcript(&self, file: &Path) -> Result<()> {
        let text = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Cannot read transcript {}", file.display()))?;
        let sentences: Vec<Sentence> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid transcript {}", file.display()))?;

        let output = Transcript {
            transcript: format_transcript(&sentences),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Print per-collection counts and every recorded failure
fn print_import_report(report: &ImportReport) {
    for collection in &report.collections {
        println!(
            "{}: {} of {} inserted, {} skipped, {} failed, {} unmapped",
            collection.collection,
            collection.inserted,
            collection.total,
            collection.skipped,
            collection.failed,
            collection.unmapped
        );
        for failure in &collection.failures {
            println!("  {failure}");
        }
    }
    println!("Total inserted: {}", report.total_inserted());
}

