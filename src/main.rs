//! Command-line driver for the roster client.
//!
//! Loads a seed file into the in-memory school API, signs in, applies the
//! requested search, filters, sort and page through the same event handler an
//! interactive front end would use, and prints the resulting student screen.
//!
//! ```text
//! CLI args ──► Events ──► handle_event ──► Actions
//!                  ▲                          │
//!                  │          Dispatch ──► ApiWorker thread
//!                  └── ApiResponse ◄──────────┘
//! ```
//!
//! The sort order picked on the command line is saved to the preference file
//! in the data directory and restored on the next run.
//!
//! # Examples
//!
//! ```text
//! roster seed.json --status ativo --sort idade --order desc
//! roster seed.json --search "ana" --fuzzy --page 2
//! roster seed.json --class 3 --export csv --out /tmp
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use roster::app::schema::STUDENT_LIST;
use roster::app::{Notification, NotificationLevel};
use roster::domain::{Role, StudentStatus, User};
use roster::export::{ExportFile, ExportFormat};
use roster::infrastructure::paths;
use roster::listview::{SortDirection, SortSpec};
use roster::service::{ApiWorker, MemorySchoolApi, Seed, WorkerHandle};
use roster::storage::{JsonPreferenceStore, PreferenceStore};
use roster::ui::{render, render_notification, Style};
use roster::{handle_event, initialize, Action, AppState, Config, Event, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Browse the student list of a school seed file")]
struct Cli {
    /// JSON seed with `alunos`, `turmas`, `responsaveis` and `notas`, or a bare student array.
    seed: PathBuf,

    /// Search text matched against student names.
    #[arg(long)]
    search: Option<String>,

    /// Only students of this class id.
    #[arg(long = "class", value_name = "ID")]
    class_id: Option<i64>,

    /// Only students with this status.
    #[arg(long, value_parser = parse_status, value_name = "ativo|inativo")]
    status: Option<StudentStatus>,

    /// Sort field (nome, idade, status, turma, data_nascimento, email, id).
    #[arg(long)]
    sort: Option<String>,

    /// Sort direction.
    #[arg(long, value_parser = parse_direction, value_name = "asc|desc")]
    order: Option<SortDirection>,

    /// Page to show (1-based, clamped to the last page).
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Records per page.
    #[arg(long)]
    page_size: Option<usize>,

    /// Fuzzy name search instead of substring search.
    #[arg(long)]
    fuzzy: bool,

    /// Delete a student before listing (administrators only).
    #[arg(long, value_name = "ID")]
    delete: Option<i64>,

    /// Export the filtered set.
    #[arg(long, value_parser = parse_format, value_name = "csv|json")]
    export: Option<ExportFormat>,

    /// Directory for export files.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for preferences and traces.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Name of the signed-in user.
    #[arg(long, default_value = "secretaria")]
    user: String,

    /// Sign in as administrator.
    #[arg(long)]
    admin: bool,

    /// Print the view model as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Disable colors.
    #[arg(long)]
    no_color: bool,
}

fn parse_status(value: &str) -> std::result::Result<StudentStatus, String> {
    StudentStatus::parse(value).ok_or_else(|| format!("unknown status `{value}`"))
}

fn parse_direction(value: &str) -> std::result::Result<SortDirection, String> {
    SortDirection::parse(value).ok_or_else(|| format!("unknown direction `{value}`"))
}

fn parse_format(value: &str) -> std::result::Result<ExportFormat, String> {
    ExportFormat::parse(value).ok_or_else(|| format!("unknown export format `{value}`"))
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => match paths::default_config_file().filter(|p| p.exists()) {
                Some(path) => Config::from_toml_file(&path)?,
                None => Config::default(),
            },
        };

        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if self.fuzzy {
            config.fuzzy_search = true;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        Ok(config)
    }

    fn user(&self) -> User {
        User {
            id: 1,
            username: self.user.clone(),
            display_name: None,
            role: if self.admin { Role::Admin } else { Role::User },
        }
    }
}

/// Owns the state and executes the actions it produces.
struct Runtime {
    state: AppState,
    worker: WorkerHandle,
    store: Option<JsonPreferenceStore>,
    style: Style,
    out_dir: PathBuf,
    in_flight: usize,
}

impl Runtime {
    fn apply(&mut self, event: &Event) -> Result<()> {
        let (_render, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            self.execute(action)?;
        }
        Ok(())
    }

    fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Dispatch(request) => {
                self.worker.send(request)?;
                self.in_flight += 1;
            }
            Action::SaveSortPreference(spec) => self.save_sort(&spec),
            Action::Notify(notification) => self.notify(&notification),
            Action::WriteExport(file) => self.write_export(&file)?,
        }
        Ok(())
    }

    /// Feeds responses back until no request is outstanding.
    fn settle(&mut self) -> Result<()> {
        while self.in_flight > 0 {
            let response = self.worker.recv()?;
            self.in_flight -= 1;
            self.apply(&Event::ApiResponse(response))?;
        }
        Ok(())
    }

    fn save_sort(&mut self, spec: &SortSpec) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(e) = store.save_sort(STUDENT_LIST, spec) {
            tracing::warn!(error = %e, "failed to save sort preference");
            self.notify(&Notification::warning(format!("Sort order not saved: {e}")));
        }
    }

    fn notify(&self, notification: &Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "notification");
        if notification.level != NotificationLevel::Info {
            eprintln!("{}", render_notification(notification, &self.style));
        }
    }

    fn write_export(&self, file: &ExportFile) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(&file.file_name);
        std::fs::write(&path, &file.contents)?;
        tracing::info!(path = %path.display(), records = file.record_count, "export written");
        eprintln!("{}", self.style.dim(&format!("wrote {}", path.display())));
        Ok(())
    }
}

fn open_store(config: &Config) -> Option<JsonPreferenceStore> {
    let opened = paths::resolve_data_dir(config.data_dir.as_deref())
        .and_then(|dir| JsonPreferenceStore::new(paths::preferences_path(&dir)));
    match opened {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "preferences unavailable");
            None
        }
    }
}

fn spawn_api(seed: &Path) -> Result<WorkerHandle> {
    let seed = Seed::from_path(seed)?;
    ApiWorker::new(Box::new(MemorySchoolApi::new(seed))).spawn()
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    if let Err(e) = roster::observability::init_tracing(&config) {
        eprintln!("tracing disabled: {e}");
    }
    let _span = tracing::info_span!("roster_cli").entered();

    let state = initialize(&config)?;
    let store = open_store(&config);
    let style = if cli.no_color || cli.json || !std::io::stdout().is_terminal() {
        Style::plain()
    } else {
        Style::ansi()
    };

    let mut runtime = Runtime {
        state,
        worker: spawn_api(&cli.seed)?,
        store,
        style,
        out_dir: cli.out.clone(),
        in_flight: 0,
    };

    let restored = runtime
        .store
        .as_ref()
        .and_then(|store| store.load_sort(STUDENT_LIST).ok().flatten());
    if let Some(spec) = restored {
        runtime.apply(&Event::SortRestored(spec))?;
    }

    runtime.apply(&Event::LoggedIn(cli.user()))?;
    runtime.settle()?;

    if let Some(id) = cli.delete {
        runtime.apply(&Event::RequestDelete(id))?;
        runtime.apply(&Event::ConfirmDelete)?;
        runtime.settle()?;
    }

    if let Some(search) = &cli.search {
        runtime.apply(&Event::SearchChanged(search.clone()))?;
    }
    if cli.class_id.is_some() {
        runtime.apply(&Event::ClassFilterChanged(cli.class_id))?;
    }
    if cli.status.is_some() {
        runtime.apply(&Event::StatusFilterChanged(cli.status))?;
    }
    if let Some(field) = &cli.sort {
        runtime.apply(&Event::SortFieldChanged(field.clone()))?;
    }
    if let Some(direction) = cli.order {
        if runtime.state.list.sort().direction != direction {
            runtime.apply(&Event::SortDirectionToggled)?;
        }
    }
    runtime.apply(&Event::GoToPage(cli.page))?;

    if let Some(format) = cli.export {
        runtime.apply(&Event::ExportRequested(format))?;
    }
    runtime.settle()?;

    let vm = runtime.state.compute_viewmodel();
    if cli.json {
        let json = serde_json::to_string_pretty(&vm)
            .map_err(|e| roster::RosterError::Export(format!("failed to serialize view: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", render(&vm, &runtime.style));
    }

    runtime.worker.shutdown()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "roster failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
