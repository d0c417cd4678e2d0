use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use case_core::{
    dashboard::DashboardSummary,
    derive::{next_hearing_for_writ, ProceedingFilter},
    CaseApi, CaseBoard, CaseClient, FormScope, ProceedingForm, SearchCoordinator, SearchOutcome,
    Session, WritForm,
};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shared::{
    domain::{ProceedingKind, WritId},
    protocol::{AttachmentUpload, NewProceeding, NewWrit},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "casedesk", about = "Track writ petitions and their court proceedings")]
struct Args {
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    token: Option<String>,
    /// Print raw JSON instead of text lines.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the access token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List writs, optionally filtered by a search query.
    Writs {
        #[arg(long, default_value = "")]
        query: String,
    },
    Writ {
        id: String,
    },
    Proceedings {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[arg(long)]
        writ: Option<String>,
    },
    Timeline {
        writ: String,
    },
    Upcoming,
    /// Writs with an open draft, and writs ready for a new proceeding.
    Drafts,
    Dashboard {
        /// Use the server-side counters instead of counting fetched writs.
        #[arg(long)]
        remote: bool,
    },
    CreateWrit {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
    CreateProceeding {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        attachment: Option<PathBuf>,
        #[arg(long)]
        draft: bool,
        /// Finish (or re-save) the writ's open draft with this payload.
        #[arg(long)]
        continue_draft: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    NoticeOfMotion,
    ToFileReply,
    Argument,
    Decision,
    AnyOther,
}

impl From<KindArg> for ProceedingKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::NoticeOfMotion => ProceedingKind::NoticeOfMotion,
            KindArg::ToFileReply => ProceedingKind::ToFileReply,
            KindArg::Argument => ProceedingKind::Argument,
            KindArg::Decision => ProceedingKind::Decision,
            KindArg::AnyOther => ProceedingKind::AnyOther,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in '{}'", path.display()))
}

fn read_attachment(path: &Path) -> Result<AttachmentUpload> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read attachment '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(AttachmentUpload {
        filename,
        mime_type,
        bytes,
    })
}

async fn run(command: Command, client: Arc<CaseClient>, json: bool) -> Result<()> {
    let mut board = CaseBoard::new(client.clone());
    match command {
        Command::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            if json {
                print_json(&response)?;
            } else {
                println!("{}", response.token);
            }
        }
        Command::Writs { query } => {
            let coordinator = SearchCoordinator::new(Duration::ZERO);
            if let SearchOutcome::Results(writs) = coordinator.search(client.as_ref(), &query).await? {
                if json {
                    print_json(&writs)?;
                } else {
                    writs.iter().for_each(|writ| println!("{}", render::writ_line(writ)));
                }
            }
        }
        Command::Writ { id } => {
            let writ_id = WritId::new(id);
            let writ = client.get_writ(&writ_id).await?;
            let proceedings = client.list_proceedings_for_writ(&writ_id).await?;
            if json {
                print_json(&writ)?;
            } else {
                println!("{}", render::writ_line(&writ));
                match next_hearing_for_writ(&proceedings, &writ_id, Utc::now()) {
                    Some(date) => println!("Next hearing: {}", date.format("%Y-%m-%d")),
                    None => println!("Next hearing: not scheduled"),
                }
            }
        }
        Command::Proceedings { query, kind, writ } => {
            board.refresh_writs().await?;
            board.refresh_proceedings().await?;
            let filter = ProceedingFilter {
                query,
                kind: kind.map(ProceedingKind::from),
                writ_id: writ.map(WritId::new),
            };
            let listing = board.listing(&filter);
            if json {
                print_json(&listing)?;
            } else {
                listing
                    .iter()
                    .for_each(|proceeding| println!("{}", render::proceeding_line(proceeding)));
            }
        }
        Command::Timeline { writ } => {
            let writ_id = WritId::new(writ);
            board.refresh_writ_proceedings(&writ_id).await?;
            let timeline = board.timeline(&writ_id);
            if json {
                print_json(&timeline)?;
            } else {
                timeline
                    .iter()
                    .for_each(|proceeding| println!("{}", render::proceeding_line(proceeding)));
            }
        }
        Command::Upcoming => {
            board.refresh_proceedings().await?;
            let upcoming = board.upcoming(Utc::now());
            if json {
                let proceedings: Vec<_> = upcoming.iter().map(|hearing| hearing.proceeding).collect();
                print_json(&proceedings)?;
            } else if upcoming.is_empty() {
                println!("No upcoming hearings");
            } else {
                upcoming
                    .iter()
                    .for_each(|hearing| println!("{}", render::upcoming_line(hearing)));
            }
        }
        Command::Drafts => {
            board.refresh_writs().await?;
            let resumable = board.resume_draft_writs();
            let startable = board.new_proceeding_writs();
            if json {
                print_json(&serde_json::json!({
                    "resumeDraft": resumable,
                    "newProceeding": startable,
                }))?;
            } else {
                println!("Open drafts:");
                resumable.iter().for_each(|writ| println!("  {}", render::writ_line(writ)));
                println!("Ready for a new proceeding:");
                startable.iter().for_each(|writ| println!("  {}", render::writ_line(writ)));
            }
        }
        Command::Dashboard { remote } => {
            let summary = if remote {
                let metrics = client.dashboard_metrics().await?;
                let graph = client.graph().await?;
                if json {
                    return print_json(&serde_json::json!({ "metrics": metrics, "graph": graph }));
                }
                graph
                    .iter()
                    .for_each(|point| println!("{:<24} {:>5}", point.label, point.count));
                DashboardSummary::from_metrics(&metrics)
            } else {
                board.refresh_writs().await?;
                board.dashboard()
            };
            render::dashboard_lines(&summary)
                .iter()
                .for_each(|line| println!("{line}"));
        }
        Command::CreateWrit { file, attachment } => {
            let payload: NewWrit = read_json(&file)?;
            let mut form = WritForm::new(payload);
            if let Some(path) = attachment {
                form.attach(read_attachment(&path)?)?;
            }
            let created = board.submit_writ(&form).await?;
            if json {
                print_json(created)?;
            } else {
                println!("{}", render::writ_line(created));
            }
        }
        Command::CreateProceeding {
            file,
            attachment,
            draft,
            continue_draft,
        } => {
            let payload: NewProceeding = read_json(&file)?;
            let writ = client.get_writ(&payload.fir).await?;
            let mut form = ProceedingForm::from_payload(&writ, &payload);
            form.save_as_draft |= draft;
            match board.load_draft(&writ.id).await {
                Some(existing) if continue_draft => {
                    info!(writ_id = %writ.id, draft_id = %existing.id, "continuing open draft");
                    form.continue_draft(existing.id);
                }
                Some(existing) => {
                    info!(
                        writ_id = %writ.id,
                        draft_id = %existing.id,
                        "writ has an open draft; pass --continue-draft to finish it"
                    );
                }
                None if continue_draft => bail!("writ {} has no open draft", writ.id),
                None => {}
            }
            if let Some(path) = attachment {
                form.attach(read_attachment(&path)?)?;
            }
            let created = board.submit_proceeding(&mut form, FormScope::Writ).await?;
            if json {
                print_json(created)?;
            } else {
                println!("{}", render::proceeding_line(created));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(token) = args.token {
        settings.token = Some(token);
    }

    let session = Session::with_invalidation(|| {
        warn!("access token rejected; run `casedesk login` and retry");
    });
    if let Some(token) = &settings.token {
        session.sign_in(token.clone(), None);
    }
    let client = Arc::new(
        CaseClient::new(settings.client_config(), session).context("failed to build HTTP client")?,
    );
    info!(api_url = %settings.api_url, "using case service");

    run(args.command, client, args.json).await
}
