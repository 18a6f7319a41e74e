//! Run settings
//!
//! Settings are read from an optional YAML file. Every field has a default,
//! so an empty file (or no file) is valid. Secrets never live here: the
//! settings only name the environment variables that hold them.

use crate::contacts::DEFAULT_CONTACTS_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::export::{ExportConfig, DEFAULT_PAGE_SIZE, DEFAULT_REST_PATH};
use crate::import::{CollectionSpec, ImportConfig, DEFAULT_BATCH_SIZE};
use crate::meetings::{DEFAULT_MEETINGS_PAGE_SIZE, DEFAULT_WEBHOOK_INTERVAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted for the backend URL
pub const BACKEND_URL_ENV: &str = "SUPABASE_URL";

/// Environment variable consulted for the meetings team id
pub const TEAM_ID_ENV: &str = "MEETGEEK_TEAM_ID";

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete settings loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Relational backend (export source and import destination)
    #[serde(default)]
    pub backend: BackendSettings,

    /// Directory holding `{collection}.json` snapshots
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Meetings API and webhook
    #[serde(default)]
    pub transcripts: TranscriptSettings,

    /// CRM API
    #[serde(default)]
    pub crm: CrmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            snapshot_dir: default_snapshot_dir(),
            transcripts: TranscriptSettings::default(),
            crm: CrmSettings::default(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Settings {
    /// Load settings from a YAML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::config(format!("Cannot read settings {}: {e}", path.display()))
                })?;
                Self::from_yaml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse settings from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

// ============================================================================
// Backend
// ============================================================================

/// Relational backend exposed over PostgREST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Project URL; falls back to `SUPABASE_URL`
    #[serde(default)]
    pub base_url: Option<String>,

    /// REST path prefix
    #[serde(default = "default_rest_path")]
    pub rest_path: String,

    /// Variables holding the API key, first non-empty wins
    #[serde(default = "default_backend_key_env")]
    pub key_env: Vec<String>,

    /// Records per exported page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Records per batched insert
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Collections exported by default
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,

    /// Ordered import plan
    #[serde(default = "default_import_plan")]
    pub import_plan: Vec<CollectionSpec>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            rest_path: DEFAULT_REST_PATH.to_string(),
            key_env: default_backend_key_env(),
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            collections: default_collections(),
            import_plan: default_import_plan(),
        }
    }
}

fn default_rest_path() -> String {
    DEFAULT_REST_PATH.to_string()
}

fn default_backend_key_env() -> Vec<String> {
    vec![
        "SUPABASE_SERVICE_ROLE_KEY".to_string(),
        "SUPABASE_ANON_KEY".to_string(),
    ]
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_collections() -> Vec<String> {
    ["notes", "attendees", "profiles"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Notes keep their relationships through an id remap, attendees follow
/// them, profiles carry stable UUIDs.
pub fn default_import_plan() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::identity_remap("notes"),
        CollectionSpec::regenerate("attendees").depends_on("notes", "note_id"),
        CollectionSpec::pass_through("profiles"),
    ]
}

impl BackendSettings {
    /// Base URL from the flag, the file, then the environment
    pub fn resolve_base_url(&self, flag: Option<&str>) -> Result<String> {
        self.resolve_base_url_with(flag, |name| std::env::var(name).ok())
    }

    /// Same as [`Self::resolve_base_url`] with an explicit lookup
    pub fn resolve_base_url_with<F>(&self, flag: Option<&str>, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup(BACKEND_URL_ENV);
        [flag.map(String::from), self.base_url.clone(), from_env]
            .into_iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "No backend URL: pass --base-url, set backend.base_url or {BACKEND_URL_ENV}"
                ))
            })
    }

    /// Exporter configuration
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            rest_path: self.rest_path.clone(),
            page_size: self.page_size,
        }
    }

    /// Importer configuration
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig::default().with_batch_size(self.batch_size)
    }
}

// ============================================================================
// Transcripts
// ============================================================================

/// Meetings API and the webhook meetings are forwarded to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSettings {
    /// API root
    #[serde(default = "default_transcripts_url")]
    pub base_url: String,

    /// Team whose meetings are listed; falls back to `MEETGEEK_TEAM_ID`
    #[serde(default)]
    pub team_id: Option<String>,

    /// Meetings per listing page
    #[serde(default = "default_meetings_page_size")]
    pub page_size: u32,

    /// Variables holding the API token
    #[serde(default = "default_transcripts_token_env")]
    pub token_env: Vec<String>,

    /// User agent sent to the API
    #[serde(default = "default_transcripts_user_agent")]
    pub user_agent: String,

    /// Webhook receiving `?id={meeting_id}`
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Minimum seconds between webhook calls
    #[serde(default = "default_webhook_interval_secs")]
    pub webhook_interval_secs: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            base_url: default_transcripts_url(),
            team_id: None,
            page_size: DEFAULT_MEETINGS_PAGE_SIZE,
            token_env: default_transcripts_token_env(),
            user_agent: default_transcripts_user_agent(),
            webhook_url: None,
            webhook_interval_secs: default_webhook_interval_secs(),
        }
    }
}

fn default_transcripts_url() -> String {
    "https://api.meetgeek.ai/v1".to_string()
}

fn default_meetings_page_size() -> u32 {
    DEFAULT_MEETINGS_PAGE_SIZE
}

fn default_transcripts_token_env() -> Vec<String> {
    vec!["MEETGEEK_API_TOKEN".to_string()]
}

fn default_transcripts_user_agent() -> String {
    // The API rejects some default client agents
    "curl/8.0".to_string()
}

fn default_webhook_interval_secs() -> u64 {
    DEFAULT_WEBHOOK_INTERVAL.as_secs()
}

impl TranscriptSettings {
    /// Team id from the file, then the environment
    pub fn resolve_team_id(&self) -> Result<String> {
        self.resolve_team_id_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::resolve_team_id`] with an explicit lookup
    pub fn resolve_team_id_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        [self.team_id.clone(), lookup(TEAM_ID_ENV)]
            .into_iter()
            .flatten()
            .map(|id| id.trim().to_string())
            .find(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "No meetings team: set transcripts.team_id or {TEAM_ID_ENV}"
                ))
            })
    }

    /// Webhook URL, required by the `meetings` command
    pub fn require_webhook_url(&self) -> Result<&str> {
        self.webhook_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::config("No webhook: set transcripts.webhook_url"))
    }

    /// Minimum gap between webhook calls
    pub fn webhook_interval(&self) -> Duration {
        Duration::from_secs(self.webhook_interval_secs)
    }
}

// ============================================================================
// CRM
// ============================================================================

/// CRM search API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmSettings {
    /// API root
    #[serde(default = "default_crm_url")]
    pub base_url: String,

    /// Variables holding the private app token
    #[serde(default = "default_crm_token_env")]
    pub token_env: Vec<String>,

    /// Contacts per search page
    #[serde(default = "default_contacts_page_size")]
    pub page_size: u32,
}

impl Default for CrmSettings {
    fn default() -> Self {
        Self {
            base_url: default_crm_url(),
            token_env: default_crm_token_env(),
            page_size: DEFAULT_CONTACTS_PAGE_SIZE,
        }
    }
}

fn default_crm_url() -> String {
    "https://api.hubapi.com".to_string()
}

fn default_crm_token_env() -> Vec<String> {
    vec!["HUBSPOT_API_KEY".to_string()]
}

fn default_contacts_page_size() -> u32 {
    DEFAULT_CONTACTS_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::KeyStrategy;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.snapshot_dir, PathBuf::from("."));
        assert_eq!(settings.backend.rest_path, "rest/v1");
        assert_eq!(settings.backend.page_size, 1000);
        assert_eq!(settings.backend.batch_size, 500);
        assert_eq!(
            settings.backend.key_env,
            vec!["SUPABASE_SERVICE_ROLE_KEY", "SUPABASE_ANON_KEY"]
        );
        assert_eq!(settings.backend.collections, vec!["notes", "attendees", "profiles"]);
        assert_eq!(settings.transcripts.page_size, 500);
        assert_eq!(settings.transcripts.user_agent, "curl/8.0");
        assert_eq!(settings.transcripts.webhook_interval(), Duration::from_secs(8));
        assert_eq!(settings.crm.base_url, "https://api.hubapi.com");
        assert_eq!(settings.crm.page_size, 100);
    }

    #[test]
    fn test_empty_yaml_equals_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_default_import_plan() {
        let plan = Settings::default().backend.import_plan;
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].strategy, KeyStrategy::IdentityRemap);
        assert_eq!(plan[1].strategy, KeyStrategy::Regenerate);
        let dep = plan[1].depends_on.as_ref().unwrap();
        assert_eq!((dep.parent.as_str(), dep.field.as_str()), ("notes", "note_id"));
        assert_eq!(plan[2].strategy, KeyStrategy::PassThrough);
        assert!(crate::import::validate_plan(&plan).is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
snapshot_dir: /var/backups/rowferry
backend:
  base_url: "https://project.supabase.co"
  page_size: 250
  collections: [notes]
  import_plan:
    - name: notes
      strategy: pass-through
transcripts:
  team_id: "1843"
  webhook_url: "https://hooks.example/webhook/supa-from-id"
  webhook_interval_secs: 2
crm:
  page_size: 50
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.snapshot_dir, PathBuf::from("/var/backups/rowferry"));
        assert_eq!(settings.backend.page_size, 250);
        assert_eq!(settings.backend.batch_size, 500);
        assert_eq!(settings.backend.collections, vec!["notes"]);
        assert_eq!(settings.backend.import_plan, vec![CollectionSpec::pass_through("notes")]);
        assert_eq!(settings.transcripts.team_id.as_deref(), Some("1843"));
        assert_eq!(settings.transcripts.webhook_interval(), Duration::from_secs(2));
        assert_eq!(settings.transcripts.base_url, "https://api.meetgeek.ai/v1");
        assert_eq!(settings.crm.page_size, 50);
        assert_eq!(settings.crm.token_env, vec!["HUBSPOT_API_KEY"]);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Settings::from_yaml("backend: [not, a, map]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend:\n  batch_size: 20").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.backend.batch_size, 20);
        assert_eq!(settings.backend.import_config().batch_size, 20);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/rowferry.yaml"))).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_base_url_precedence() {
        let mut backend = BackendSettings::default();
        let lookup = env(&[("SUPABASE_URL", "https://env.supabase.co")]);

        assert_eq!(
            backend.resolve_base_url_with(None, &lookup).unwrap(),
            "https://env.supabase.co"
        );

        backend.base_url = Some("https://file.supabase.co".to_string());
        assert_eq!(
            backend.resolve_base_url_with(None, &lookup).unwrap(),
            "https://file.supabase.co"
        );
        assert_eq!(
            backend
                .resolve_base_url_with(Some("https://flag.supabase.co"), &lookup)
                .unwrap(),
            "https://flag.supabase.co"
        );
    }

    #[test]
    fn test_base_url_missing() {
        let backend = BackendSettings::default();
        let err = backend
            .resolve_base_url_with(None, env(&[("SUPABASE_URL", "   ")]))
            .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_team_id_and_webhook() {
        let transcripts = TranscriptSettings::default();
        assert!(transcripts.resolve_team_id_with(env(&[])).is_err());
        assert_eq!(
            transcripts
                .resolve_team_id_with(env(&[("MEETGEEK_TEAM_ID", "77")]))
                .unwrap(),
            "77"
        );
        assert!(transcripts.require_webhook_url().is_err());
    }
}
