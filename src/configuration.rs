use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Environment variables with this prefix override file settings,
/// e.g. `VSONG__API_SETTINGS__API_BASE_URL`.
const ENV_PREFIX: &str = "VSONG";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_settings: ApiSettings,
    #[serde(default)]
    pub session_settings: SessionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base of the versioned API (`/main`, `/api/v1/vtubers/...`).
    pub api_base_url: String,
    /// Origin serving the site-relative endpoints (`/api/main`, `/api/login/userinfo`, `/api/logout`).
    pub site_base_url: String,
    pub oauth_authorization_url: String,
    /// Raw `Cookie` header value carrying an existing backend session.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl ApiSettings {
    pub fn new(api_base_url: &str, site_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            site_base_url: site_base_url.trim_end_matches('/').to_string(),
            oauth_authorization_url: format!(
                "{}/oauth2/authorization/google",
                api_base_url.trim_end_matches('/')
            ),
            session_cookie: None,
        }
    }
}

/// How far a persisted identity is trusted before the backend is asked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SessionPolicy {
    pub persist: bool,
    pub revalidate_on_focus: bool,
    /// Zero means a persisted identity never expires.
    pub max_age_seconds: u64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            persist: true,
            revalidate_on_focus: false,
            max_age_seconds: 0,
        }
    }
}

pub fn get_configuration(cfg_file: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(cfg_file, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub session_db: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> io::Result<Self> {
        let home_dir = env::var("HOME").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "HOME environment variable is not set")
        })?;

        Ok(Self::in_home(Path::new(&home_dir)))
    }

    pub fn in_home(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(".vsong");
        Self {
            config_file: config_dir.join("config.yaml"),
            session_db: config_dir.join("session_db"),
            config_dir,
        }
    }
}

pub fn create_config(cfg_folder: &ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");
    let config_dir = &cfg_folder.config_dir;

    if config_dir.exists() && !confirm("The configuration folder already exists.\nDo you want to overwrite it? Your saved login will be lost. (y/N)")? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    write_config(cfg_folder)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> ~/.vsong/config.yaml");
    println!("Session store created at:");
    println!("  -> ~/.vsong/session_db");
    println!("\x1b[0mPlease edit the configuration file with your backend URLs.");

    Ok(())
}

fn write_config(cfg_folder: &ConfigFolder) -> io::Result<()> {
    if cfg_folder.session_db.exists() {
        fs::remove_dir_all(&cfg_folder.session_db)?;
    }
    fs::create_dir_all(&cfg_folder.config_dir)?;
    fs::create_dir_all(&cfg_folder.session_db)?;

    let config_content = include_str!("config_template.yaml");
    fs::write(&cfg_folder.config_file, config_content)
}

/// Asks a yes/no question on stdin. Anything but `y` is a no.
pub fn confirm(question: &str) -> Result<bool, io::Error> {
    println!("\x1b[31m{}\x1b[0m", question);

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
