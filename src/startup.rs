/// # The Command Driver
///
/// Loads the configuration, opens the session store, builds the backend client and
/// runs one [`Action`] against it, printing the rendered view.
///
/// # Steps:
/// 1. Loads the configuration
/// 2. Opens the local session store
/// 3. Resolves the login state
/// 4. Mounts the requested view, waits for its data and renders it
///
use crate::api_client::{Backend, HttpBackend};
use crate::configuration::{self, ConfigFolder, SessionPolicy, Settings};
use crate::foundation::database;
use crate::foundation::models::{ChartKind, GenderFilter, SearchParams};
use crate::foundation::utils::normalize_query;
use crate::render;
use crate::routes::Route;
use crate::session::SessionResolver;
use crate::view::{ChartPanel, FilterContext, Header, MainPage, SearchPage, VtuberDetailPage};
use anyhow::{anyhow, Context};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// What the user asked the binary to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Main { gender: GenderFilter },
    Chart { kind: ChartKind, play: Option<usize> },
    Search { term: String, channel_id: Option<String> },
    Vtuber { channel_id: String, play: Option<usize> },
    Open { path: String },
    WhoAmI,
    Login,
    Logout,
}

pub async fn run(cfg_folder: &ConfigFolder, action: Action) -> anyhow::Result<()> {
    if !cfg_folder.config_dir.exists() || !cfg_folder.config_file.exists() {
        eprintln!(
            "\x1b[1m\x1b[31mConfiguration folder or config.yaml not found. Please run 'vsong config' first.\x1b[0m"
        );
        return Ok(());
    }

    let config_file = cfg_folder
        .config_file
        .to_str()
        .ok_or_else(|| anyhow!("Failed to convert the configuration path to a string"))?;
    let settings =
        configuration::get_configuration(config_file).context("Unable to parse configuration file")?;

    let db_path = cfg_folder
        .session_db
        .to_str()
        .ok_or_else(|| anyhow!("Failed to convert the session store path to a string"))?;
    let db = database::open_database(db_path).context("Unable to open the session store")?;

    let app = App::new(settings, db)?;
    app.dispatch(action).await
}

struct App {
    backend: Arc<dyn Backend>,
    filter: FilterContext,
    session: SessionResolver,
}

impl App {
    fn new(settings: Settings, db: sled::Db) -> anyhow::Result<Self> {
        let login_url = settings.api_settings.oauth_authorization_url.clone();
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(settings.api_settings)?);
        Ok(Self::with_backend(
            backend,
            db,
            settings.session_settings,
            &login_url,
        ))
    }

    fn with_backend(
        backend: Arc<dyn Backend>,
        db: sled::Db,
        policy: SessionPolicy,
        login_url: &str,
    ) -> Self {
        let session = SessionResolver::new(Arc::clone(&backend), db, policy, login_url);
        Self {
            backend,
            filter: FilterContext::default(),
            session,
        }
    }

    /// A view turned away with 401 means the saved login is no longer valid.
    fn check_rejected(&mut self, unauthorized: bool) {
        if unauthorized {
            self.session.handle_unauthorized();
            eprintln!("\x1b[33mYour session has expired. Run 'vsong login' to log in again.\x1b[0m");
        }
    }

    async fn dispatch(mut self, action: Action) -> anyhow::Result<()> {
        match action {
            Action::Main { gender } => {
                self.print_session_header().await;
                self.show_main(gender).await
            }
            Action::Chart { kind, play } => self.show_chart(kind, play).await,
            Action::Search { term, channel_id } => {
                self.print_session_header().await;
                self.show_search(&term, channel_id).await
            }
            Action::Vtuber { channel_id, play } => {
                self.print_session_header().await;
                self.show_vtuber(&channel_id, play).await
            }
            Action::Open { path } => self.open(&path).await,
            Action::WhoAmI => {
                let state = self.session.resolve().await;
                print!("{}", render::render_session(state));
                Ok(())
            }
            Action::Login => {
                println!("\x1b[1m\x1b[34mOpen this address in your browser to log in:\x1b[0m");
                println!("  {}", self.session.login_url());
                println!("\x1b[33mAfterwards copy the session cookie into ~/.vsong/config.yaml (session_cookie).\x1b[0m");
                Ok(())
            }
            Action::Logout => self.logout().await,
        }
    }

    async fn print_session_header(&mut self) {
        let state = self.session.resolve().await;
        print!("{}", render::render_session(state));
        println!();
    }

    async fn open(&mut self, path: &str) -> anyhow::Result<()> {
        let route = Route::parse(path);
        debug!(?route, "opening path");
        match route {
            Route::Home => {
                let gender = gender_from_path(path);
                self.print_session_header().await;
                self.show_main(gender).await
            }
            Route::Search(params) => {
                self.print_session_header().await;
                self.show_search_params(params).await
            }
            Route::Vtuber { channel_id } => {
                self.print_session_header().await;
                self.show_vtuber(&channel_id, None).await
            }
            other => {
                if let Some(text) = render::render_static(&other) {
                    print!("{}", text);
                }
                Ok(())
            }
        }
    }

    async fn show_main(&mut self, gender: GenderFilter) -> anyhow::Result<()> {
        self.filter.set(gender);
        let mut page = MainPage::mount(Arc::clone(&self.backend), &self.filter);
        with_spinner("Loading songs...", page.settled()).await;
        self.check_rejected(page.unauthorized());

        println!(
            "\x1b[1m\x1b[34mShowing: {}\x1b[0m\n",
            page.gender()
        );
        print!("{}", render::render_sections(page.sections().as_deref()));
        Ok(())
    }

    async fn show_chart(&mut self, kind: ChartKind, play: Option<usize>) -> anyhow::Result<()> {
        let mut panel = ChartPanel::mount(Arc::clone(&self.backend));
        with_spinner("Loading charts...", panel.settled()).await;
        self.check_rejected(panel.unauthorized());

        panel.select(kind);
        print!("{}", render::render_chart(&panel.display()));

        if let Some(rank) = play {
            if panel.play_rank(rank) {
                print_player(panel.modal().embed_url());
            } else {
                eprintln!("\x1b[31mNo entry at rank {} in this chart.\x1b[0m", rank);
            }
        }
        Ok(())
    }

    async fn show_search(&mut self, term: &str, channel_id: Option<String>) -> anyhow::Result<()> {
        // a channel search may come without any term
        if let Some(channel_id) = channel_id.filter(|id| !id.trim().is_empty()) {
            let query = normalize_query(term);
            let params = SearchParams {
                query: (!query.is_empty()).then_some(query),
                channel_id: Some(channel_id),
            };
            return self.show_search_params(params).await;
        }

        let header = Header::new(self.filter.clone());
        let path = match header.submit_search(term) {
            Ok(path) => path,
            Err(message) => {
                eprintln!("\x1b[31m{}\x1b[0m", message);
                return Ok(());
            }
        };

        let params = match Route::parse(&path) {
            Route::Search(params) => params,
            _ => SearchParams::by_query(term),
        };
        self.show_search_params(params).await
    }

    async fn show_search_params(&mut self, params: SearchParams) -> anyhow::Result<()> {
        let mut page = SearchPage::mount(Arc::clone(&self.backend), params);
        with_spinner("Searching...", page.settled()).await;
        self.check_rejected(page.unauthorized());

        print!("{}", render::render_search(&page));

        while page.load_more_offered() {
            if !configuration::confirm("Load more songs? (y/N)")? {
                break;
            }
            let before = page.visible_songs().len();
            page.load_more();
            for song in page.visible_songs().iter().skip(before) {
                print!("{}", render::render_song_card(song, true));
            }
            println!(
                "\x1b[2mShowing {} of {}\x1b[0m",
                page.visible_songs().len(),
                page.total_songs()
            );
        }
        Ok(())
    }

    async fn show_vtuber(&mut self, channel_id: &str, play: Option<usize>) -> anyhow::Result<()> {
        let mut page = VtuberDetailPage::mount(Arc::clone(&self.backend), channel_id);
        with_spinner("Loading channel...", page.settled()).await;
        self.check_rejected(page.unauthorized());

        print!("{}", render::render_vtuber(&page));

        if let Some(position) = play {
            if page.play(position) {
                print_player(page.modal().embed_url());
            } else {
                eprintln!("\x1b[31mNo song at position {}.\x1b[0m", position);
            }
        }
        Ok(())
    }

    async fn logout(&mut self) -> anyhow::Result<()> {
        if !self.session.resolve().await.is_logged_in() {
            println!("\x1b[33mNot logged in.\x1b[0m");
            return Ok(());
        }

        match self.session.logout().await {
            Ok(next) => {
                println!("\x1b[32mLogged out.\x1b[0m");
                debug!(path = %next.to_path(), "navigating after logout");
                Ok(())
            }
            Err(e) => {
                eprintln!("\x1b[31m{}\x1b[0m", e);
                Ok(())
            }
        }
    }
}

/// The landing page accepts `?gender=` like the web front end does.
fn gender_from_path(path: &str) -> GenderFilter {
    path.split_once('?')
        .map(|(_, query)| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "gender")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap_or_default()
        })
        .unwrap_or_default()
}

fn print_player(embed_url: Option<String>) {
    if let Some(url) = embed_url {
        println!("\n\x1b[1m\x1b[32mNow playing:\x1b[0m {}", url);
    }
}

async fn with_spinner<F: Future<Output = ()>>(message: &'static str, work: F) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    work.await;

    spinner.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{ApiError, MockBackend};
    use crate::foundation::database::{load_identity, store_identity, unix_now};
    use crate::foundation::models::SessionIdentity;
    use mockall::predicate::eq;
    use reqwest::StatusCode;
    use tempfile::TempDir;

    fn temp_db() -> sled::Db {
        sled::Config::new().temporary(true).open().unwrap()
    }

    fn app(mock: MockBackend, db: sled::Db) -> App {
        App::with_backend(
            Arc::new(mock),
            db,
            SessionPolicy::default(),
            "http://api.test/oauth2/authorization/google",
        )
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            name: "Alice".to_string(),
            picture: String::new(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_rejected_view_clears_saved_login() {
        let db = temp_db();
        store_identity(&db, &identity(), unix_now()).unwrap();

        let mut mock = MockBackend::new();
        mock.expect_user_info().times(0);
        mock.expect_vtuber_details().returning(|_| {
            Err(ApiError::status(
                StatusCode::UNAUTHORIZED,
                "http://api.test/api/v1/vtubers/UCx/details",
            ))
        });
        mock.expect_vtuber_songs().returning(|_| Ok(Vec::new()));

        let mut app = app(mock, db.clone());
        app.print_session_header().await;
        assert!(app.session.state().is_logged_in());

        app.show_vtuber("UCx", None).await.unwrap();

        assert!(!app.session.state().is_logged_in());
        assert!(load_identity(&db).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_failures_keep_saved_login() {
        let db = temp_db();
        store_identity(&db, &identity(), unix_now()).unwrap();

        let mut mock = MockBackend::new();
        mock.expect_fetch_charts().returning(|| {
            Err(ApiError::status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "http://site.test/api/main",
            ))
        });

        let mut app = app(mock, db.clone());
        app.show_chart(ChartKind::Weekly, None).await.unwrap();

        assert!(load_identity(&db).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_channel_search_needs_no_term() {
        let mut mock = MockBackend::new();
        mock.expect_search()
            .with(eq(SearchParams {
                query: None,
                channel_id: Some("UC1".to_string()),
            }))
            .times(1)
            .returning(|_| Ok(Default::default()));

        let mut app = app(mock, temp_db());
        app.show_search("", Some("UC1".to_string())).await.unwrap();
    }

    #[tokio::test]
    async fn test_short_term_without_channel_is_rejected() {
        let mut mock = MockBackend::new();
        mock.expect_search().times(0);

        let mut app = app(mock, temp_db());
        app.show_search("a", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_config_is_reported_not_failed() {
        let home = TempDir::new().unwrap();
        let folder = ConfigFolder::in_home(home.path());
        assert!(run(&folder, Action::WhoAmI).await.is_ok());
    }

    #[test]
    fn test_gender_from_path() {
        assert_eq!(gender_from_path("/"), GenderFilter::All);
        assert_eq!(gender_from_path("/?gender=female"), GenderFilter::Female);
        assert_eq!(gender_from_path("/?gender=bogus"), GenderFilter::All);
    }
}
