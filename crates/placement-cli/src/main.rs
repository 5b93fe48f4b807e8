use std::io::{BufRead, Write};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use placement_core::config_file::{Settings, load_config};
use placement_core::token_store::{FileTokenStore, TokenStore};
use placement_core::view::derive;
use placement_core::{
    ApiClient, ApiError, CtcFilter, PlacementApi, Process, RecordDraft, SortConfig,
    SortDirection, SortKey, ViewState,
};

mod output;

use output::ColorMode;

/// Placement Tracker - browse and administer campus placement records
#[derive(Parser, Debug)]
#[command(name = "placement", version, about, long_about = None)]
struct Cli {
    /// Base URL of the placement API (e.g. http://localhost:8000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Admin token for this invocation (overrides env and stored token)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List records with optional search, CTC filter and sort
    List {
        /// Case-insensitive substring of the company name
        #[arg(long)]
        search: Option<String>,

        /// Minimum CTC in lakh, or "all"
        #[arg(long, default_value = "all")]
        min_ctc: CtcFilter,

        /// Sort column (e.g. company_name, notification_date, students_selected)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Print the derived rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record
    Show {
        id: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate statistics
    Stats {
        /// Compute from the record list instead of asking the server
        #[arg(long)]
        local: bool,
    },

    /// Admin token checks against the server
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Create a record (admin)
    Add(RecordFields),

    /// Update a record (admin); only the given fields change
    Update {
        id: u32,

        #[command(flatten)]
        fields: RecordFields,
    },

    /// Delete a record (admin)
    Delete {
        id: u32,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Manage the stored admin token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug)]
enum AuthAction {
    /// Ask the server whether the admin token is valid
    Check,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Store a token for later sessions
    Set { value: String },
    /// Remove the stored token
    Clear,
    /// Show where the token is stored and a masked copy of it
    Show,
}

#[derive(Args, Debug, Default)]
struct RecordFields {
    /// Notification date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    date: Option<String>,

    /// Company name
    #[arg(long)]
    company: Option<String>,

    /// Type of offer (e.g. FTE, Intern, Intern + FTE, PPO)
    #[arg(long)]
    offer: Option<String>,

    /// Branches allowed (empty string clears)
    #[arg(long)]
    branches: Option<String>,

    /// Eligibility CGPA (empty string clears)
    #[arg(long)]
    cgpa: Option<String>,

    /// Job roles
    #[arg(long)]
    roles: Option<String>,

    /// CTC / stipend text, e.g. "CTC: ₹12,00,000"
    #[arg(long)]
    ctc: Option<String>,

    /// Number of students selected
    #[arg(long)]
    selected: Option<String>,

    /// Process status
    #[arg(long, value_enum)]
    process: Option<ProcessArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ProcessArg {
    Completed,
    Pending,
}

impl From<ProcessArg> for Process {
    fn from(arg: ProcessArg) -> Self {
        match arg {
            ProcessArg::Completed => Process::Completed,
            ProcessArg::Pending => Process::Pending,
        }
    }
}

impl RecordFields {
    /// Overwrite the draft's fields with every flag that was given.
    fn apply(self, draft: &mut RecordDraft) {
        let slots = [
            (self.date, &mut draft.notification_date),
            (self.company, &mut draft.company_name),
            (self.offer, &mut draft.type_of_offer),
            (self.branches, &mut draft.branches_allowed),
            (self.cgpa, &mut draft.eligibility_cgpa),
            (self.roles, &mut draft.job_roles),
            (self.ctc, &mut draft.ctc_stipend),
            (self.selected, &mut draft.students_selected),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(process) = self.process {
            draft.process = process.into();
        }
    }
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env("PLACEMENT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut settings = Settings::resolve(&load_config());
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }
    if let Some(token) = cli.token {
        settings.admin_token = Some(token);
    }
    let color = ColorMode(!cli.no_color);
    let mut out = std::io::stdout().lock();

    let api = ApiClient::new(&settings.api_url, settings.timeout)?;
    tracing::debug!(api_url = %api.base_url(), "using placement API");

    match cli.command {
        Command::List {
            search,
            min_ctc,
            sort,
            desc,
            json,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let state = ViewState::default()
                .with_search(search.unwrap_or_default())
                .with_ctc_filter(min_ctc)
                .with_sort(sort.map(|key| SortConfig { key, direction }));
            let records = api.list_companies().await?;
            let rows = derive(&records, &state);
            if json {
                serde_json::to_writer_pretty(&mut out, &rows)?;
                writeln!(out)?;
            } else {
                output::print_records(&mut out, &rows, records.len(), &state, color)?;
            }
        }
        Command::Show { id, json } => {
            let record = api.get_company(id).await?;
            if json {
                serde_json::to_writer_pretty(&mut out, &record)?;
                writeln!(out)?;
            } else {
                output::print_record(&mut out, &record, color)?;
            }
        }
        Command::Stats { local } => {
            let stats = if local {
                let records = api.list_companies().await?;
                placement_core::stats::summarize(&records)
            } else {
                api.fetch_stats().await?
            };
            output::print_stats(&mut out, &stats, settings.batch_size, local, color)?;
        }
        Command::Auth {
            action: AuthAction::Check,
        } => {
            let token = admin_token(&settings)?;
            match api.check_auth(&token).await {
                Ok(()) => writeln!(out, "Admin token accepted")?,
                Err(e) if e.is_unauthorized() => anyhow::bail!("Invalid admin token"),
                Err(e) => {
                    return Err(e).context("Could not validate admin token");
                }
            }
        }
        Command::Add(fields) => {
            let token = admin_token(&settings)?;
            let mut draft = RecordDraft::empty();
            fields.apply(&mut draft);
            let input = draft.to_input()?;
            let record = api
                .create_company(&token, &input)
                .await
                .map_err(|e| mutation_error(e, "saving"))?;
            writeln!(out, "Created record {} ({})", record.id, record.company_name)?;
        }
        Command::Update { id, fields } => {
            let token = admin_token(&settings)?;
            let current = api.get_company(id).await?;
            let mut draft = RecordDraft::from_record(&current);
            fields.apply(&mut draft);
            let input = draft.to_input()?;
            let record = api
                .update_company(&token, id, &input)
                .await
                .map_err(|e| mutation_error(e, "saving"))?;
            writeln!(out, "Updated record {} ({})", record.id, record.company_name)?;
        }
        Command::Delete { id, yes } => {
            let token = admin_token(&settings)?;
            if !yes {
                let record = api.get_company(id).await?;
                let prompt = format!("Delete {} (#{})? [y/N] ", record.company_name, id);
                if !confirm(&prompt)? {
                    writeln!(out, "Aborted")?;
                    return Ok(());
                }
            }
            api.delete_company(&token, id)
                .await
                .map_err(|e| mutation_error(e, "deleting"))?;
            writeln!(out, "Deleted record {}", id)?;
        }
        Command::Token { action } => token_command(action, &mut out)?,
    }

    Ok(())
}

fn token_command(action: TokenAction, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = FileTokenStore::default_location()?;
    match action {
        TokenAction::Set { value } => {
            let value = value.trim();
            if value.is_empty() {
                anyhow::bail!("Refusing to store an empty token; use `placement token clear`");
            }
            store.save(value)?;
            writeln!(out, "Token saved to {}", store.path().display())?;
        }
        TokenAction::Clear => {
            store.clear()?;
            writeln!(out, "Token cleared")?;
        }
        TokenAction::Show => match store.load()? {
            Some(token) => writeln!(
                out,
                "{} ({})",
                output::mask_token(&token),
                store.path().display()
            )?,
            None => writeln!(out, "No token stored ({})", store.path().display())?,
        },
    }
    Ok(())
}

/// The token to send: flag or env (already folded into `settings`), else the store.
fn admin_token(settings: &Settings) -> anyhow::Result<String> {
    if let Some(token) = settings.admin_token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }
    let stored = match FileTokenStore::default_location() {
        Ok(store) => store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored admin token");
            None
        }),
        Err(_) => None,
    };
    stored.context(
        "No admin token: pass --token, set PLACEMENT_ADMIN_TOKEN or run `placement token set`",
    )
}

/// Authorization failures get the same hint the TUI shows.
fn mutation_error(err: ApiError, verb: &str) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow::anyhow!("Admin authorization failed or error {verb}. Check admin token. ({err})")
    } else {
        anyhow::Error::new(err).context(format!("Error {verb} record"))
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}
