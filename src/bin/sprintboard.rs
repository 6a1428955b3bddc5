//! Command-line front end for sprintboard.
//!
//! Every command acts as the identity given by `--identity` or the
//! `SPRINTBOARD_IDENTITY` environment variable and prints its result as JSON
//! on stdout. Logs go to stderr.
//!
//! ```text
//! sprintboard migrate
//! sprintboard --identity ada@example.com project create --title Alpha
//! sprintboard --identity ada@example.com board move <sprint> --from todo --drag 0 --to done --hover 2
//! ```

use clap::{Args, Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use serde::Serialize;
use sprintboard::{
    board::{
        adapters::ServiceTaskGateway,
        domain::{BoardError, Column, ParseColumnError},
        services::{BoardSession, BoardSnapshot},
    },
    config::TrackerConfig,
    telemetry,
    tracker::{
        adapters::postgres::{PostgresTrackerRepository, TrackerPgPool, apply_schema},
        domain::{OwnerIdentity, ProjectId, RequestContext, SprintId, TaskId},
        services::{
            CreateProjectRequest, CreateSprintRequest, CreateTaskRequest, TrackerService,
            UpdateProjectRequest, UpdateSprintRequest, UpdateTaskRequest,
        },
    },
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;


type Service = TrackerService<PostgresTrackerRepository, DefaultClock>;
type Gateway = ServiceTaskGateway<PostgresTrackerRepository, DefaultClock>;

/// Project, sprint, and task tracking with a kanban board.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file [default: ./sprintboard.toml when present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Identity to act as
    #[arg(long, env = "SPRINTBOARD_IDENTITY", global = true)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the tracker tables if they do not exist
    Migrate,
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage sprints
    #[command(subcommand)]
    Sprint(SprintCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Work with a sprint's kanban board
    #[command(subcommand)]
    Board(BoardCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// List your projects
    List,
    /// Create a project
    Create {
        /// Project title
        #[arg(long)]
        title: String,
        /// Project description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a project and its sprints
    Show {
        /// Project identifier
        id: ProjectId,
    },
    /// Update a project
    Update(ProjectUpdateArgs),
    /// Delete a project with all its sprints and tasks
    Delete {
        /// Project identifier
        id: ProjectId,
    },
}

#[derive(Args, Debug)]
struct ProjectUpdateArgs {
    /// Project identifier
    id: ProjectId,
    /// New title
    #[arg(long)]
    title: Option<String>,
    /// New description
    #[arg(long)]
    description: Option<String>,
    /// New image URL
    #[arg(long, conflicts_with = "clear_image_url")]
    image_url: Option<String>,
    /// Remove the image URL
    #[arg(long)]
    clear_image_url: bool,
}

#[derive(Subcommand, Debug)]
enum SprintCommand {
    /// Plan a sprint in a project
    Create {
        /// Parent project
        #[arg(long)]
        project: ProjectId,
        /// Sprint title
        #[arg(long)]
        title: String,
        /// First day, `YYYY-MM-DD` or RFC 3339
        #[arg(long)]
        start: String,
        /// Last day, `YYYY-MM-DD` or RFC 3339
        #[arg(long)]
        end: String,
        /// Notes written when planning
        #[arg(long, default_value = "")]
        starting_thoughts: String,
    },
    /// Show a sprint with its project title and tasks
    Show {
        /// Sprint identifier
        id: SprintId,
    },
    /// Update a sprint
    Update(SprintUpdateArgs),
    /// Delete a sprint with all its tasks
    Delete {
        /// Sprint identifier
        id: SprintId,
    },
}

#[derive(Args, Debug)]
struct SprintUpdateArgs {
    /// Sprint identifier
    id: SprintId,
    /// New title
    #[arg(long)]
    title: Option<String>,
    /// Retrospective notes
    #[arg(long, conflicts_with = "clear_ending_thoughts")]
    ending_thoughts: Option<String>,
    /// Remove the retrospective notes
    #[arg(long)]
    clear_ending_thoughts: bool,
    /// PLANNED, IN_PROGRESS, or COMPLETED
    #[arg(long)]
    status: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Add a task to a sprint
    Create {
        /// Parent sprint
        #[arg(long)]
        sprint: SprintId,
        /// Task title
        #[arg(long)]
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a task
    Show {
        /// Task identifier
        id: TaskId,
    },
    /// Update a task
    Update(TaskUpdateArgs),
    /// Delete a task
    Delete {
        /// Task identifier
        id: TaskId,
    },
}

#[derive(Args, Debug)]
struct TaskUpdateArgs {
    /// Task identifier
    id: TaskId,
    /// New title
    #[arg(long)]
    title: Option<String>,
    /// New description
    #[arg(long, conflicts_with = "clear_description")]
    description: Option<String>,
    /// Remove the description
    #[arg(long)]
    clear_description: bool,
    /// TODO, IN_PROGRESS, or DONE
    #[arg(long)]
    status: Option<String>,
    /// Explicit start timestamp (RFC 3339)
    #[arg(long, conflicts_with = "clear_started_at")]
    started_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Remove the start timestamp
    #[arg(long)]
    clear_started_at: bool,
    /// Explicit finish timestamp (RFC 3339)
    #[arg(long, conflicts_with = "clear_finished_at")]
    finished_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Remove the finish timestamp
    #[arg(long)]
    clear_finished_at: bool,
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Show the columns of a sprint board
    Show {
        /// Sprint identifier
        sprint: SprintId,
    },
    /// Drag a card to a position in a column
    Move {
        /// Sprint identifier
        sprint: SprintId,
        /// Source column: todo, in-progress, or done
        #[arg(long, value_parser = parse_column)]
        from: Column,
        /// Index of the card in the source column
        #[arg(long)]
        drag: usize,
        /// Target column: todo, in-progress, or done
        #[arg(long, value_parser = parse_column)]
        to: Column,
        /// Position in the target column
        #[arg(long)]
        hover: usize,
    },
    /// Add a card to the To Do column
    Add {
        /// Sprint identifier
        sprint: SprintId,
        /// Task title
        #[arg(long)]
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a card
    Delete {
        /// Sprint identifier
        sprint: SprintId,
        /// Task identifier
        task: TaskId,
    },
}

fn parse_column(value: &str) -> Result<Column, ParseColumnError> {
    Column::try_from(value)
}

#[derive(Serialize)]
struct BoardView<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    board: BoardSnapshot,
}

/// Pairs a gesture's outcome with the board it left behind.
///
/// The error, if any, is handed back so the caller can still exit non-zero
/// after printing the view.
fn board_view<T: Serialize>(
    board: BoardSnapshot,
    outcome: Result<T, BoardError>,
) -> (BoardView<T>, Option<BoardError>) {
    match outcome {
        Ok(result) => (
            BoardView {
                result: Some(result),
                error: None,
                board,
            },
            None,
        ),
        Err(err) => (
            BoardView {
                result: None,
                error: Some(err.to_string()),
                board,
            },
            Some(err),
        ),
    }
}

#[derive(Serialize)]
struct Deleted {
    deleted: String,
}

fn emit(value: &impl Serialize) -> eyre::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn build_pool(config: &TrackerConfig) -> eyre::Result<TrackerPgPool> {
    let url = config
        .database
        .url
        .as_deref()
        .ok_or_else(|| eyre!("database URL is not configured; set SPRINTBOARD_DATABASE_URL"))?;
    Pool::builder()
        .max_size(config.database.max_connections)
        .build(ConnectionManager::<PgConnection>::new(url))
        .wrap_err("failed to connect to PostgreSQL")
}

fn request_context(identity: Option<&str>) -> eyre::Result<RequestContext> {
    identity.map_or_else(
        || Ok(RequestContext::anonymous()),
        |raw| Ok(RequestContext::authenticated(OwnerIdentity::new(raw)?)),
    )
}

async fn migrate(pool: TrackerPgPool) -> eyre::Result<()> {
    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut connection = pool.get()?;
        apply_schema(&mut connection)?;
        Ok(())
    })
    .await??;
    info!("tracker schema applied");
    emit(&serde_json::json!({ "migrated": true }))
}

async fn run_project(
    service: &Service,
    ctx: &RequestContext,
    command: ProjectCommand,
) -> eyre::Result<()> {
    match command {
        ProjectCommand::List => emit(&service.list_projects(ctx).await?),
        ProjectCommand::Create { title, description } => emit(
            &service
                .create_project(ctx, CreateProjectRequest::new(title, description))
                .await?,
        ),
        ProjectCommand::Show { id } => emit(&service.get_project(ctx, id).await?),
        ProjectCommand::Update(args) => {
            let mut request = UpdateProjectRequest::new();
            if let Some(title) = args.title {
                request = request.with_title(title);
            }
            if let Some(description) = args.description {
                request = request.with_description(description);
            }
            if let Some(image_url) = args.image_url {
                request = request.with_image_url(image_url);
            } else if args.clear_image_url {
                request = request.clear_image_url();
            }
            emit(&service.update_project(ctx, args.id, request).await?)
        }
        ProjectCommand::Delete { id } => {
            service.delete_project(ctx, id).await?;
            emit(&Deleted {
                deleted: id.to_string(),
            })
        }
    }
}

async fn run_sprint(
    service: &Service,
    ctx: &RequestContext,
    command: SprintCommand,
) -> eyre::Result<()> {
    match command {
        SprintCommand::Create {
            project,
            title,
            start,
            end,
            starting_thoughts,
        } => {
            let request = CreateSprintRequest::new(project, title, start, end)
                .with_starting_thoughts(starting_thoughts);
            emit(&service.create_sprint(ctx, request).await?)
        }
        SprintCommand::Show { id } => emit(&service.get_sprint(ctx, id).await?),
        SprintCommand::Update(args) => {
            let mut request = UpdateSprintRequest::new();
            if let Some(title) = args.title {
                request = request.with_title(title);
            }
            if let Some(thoughts) = args.ending_thoughts {
                request = request.with_ending_thoughts(thoughts);
            } else if args.clear_ending_thoughts {
                request = request.clear_ending_thoughts();
            }
            if let Some(status) = args.status {
                request = request.with_status(status);
            }
            emit(&service.update_sprint(ctx, args.id, request).await?)
        }
        SprintCommand::Delete { id } => {
            service.delete_sprint(ctx, id).await?;
            emit(&Deleted {
                deleted: id.to_string(),
            })
        }
    }
}

fn task_update_request(args: TaskUpdateArgs) -> UpdateTaskRequest {
    let mut request = UpdateTaskRequest::new();
    if let Some(title) = args.title {
        request = request.with_title(title);
    }
    if let Some(description) = args.description {
        request = request.with_description(description);
    } else if args.clear_description {
        request = request.clear_description();
    }
    if let Some(status) = args.status {
        request = request.with_status(status);
    }
    if let Some(started_at) = args.started_at {
        request = request.with_started_at(started_at);
    } else if args.clear_started_at {
        request = request.clear_started_at();
    }
    if let Some(finished_at) = args.finished_at {
        request = request.with_finished_at(finished_at);
    } else if args.clear_finished_at {
        request = request.clear_finished_at();
    }
    request
}

async fn run_task(
    service: &Service,
    ctx: &RequestContext,
    command: TaskCommand,
) -> eyre::Result<()> {
    match command {
        TaskCommand::Create {
            sprint,
            title,
            description,
        } => {
            let mut request = CreateTaskRequest::new(sprint, title);
            if let Some(text) = description {
                request = request.with_description(text);
            }
            emit(&service.create_task(ctx, request).await?)
        }
        TaskCommand::Show { id } => emit(&service.get_task(ctx, id).await?),
        TaskCommand::Update(args) => {
            let id = args.id;
            emit(&service.update_task(ctx, id, task_update_request(args)).await?)
        }
        TaskCommand::Delete { id } => {
            service.delete_task(ctx, id).await?;
            emit(&Deleted {
                deleted: id.to_string(),
            })
        }
    }
}

async fn open_board(
    service: &Service,
    ctx: &RequestContext,
    sprint: SprintId,
) -> eyre::Result<BoardSession<Gateway, DefaultClock>> {
    let gateway = Arc::new(ServiceTaskGateway::new(service.clone(), ctx.clone()));
    Ok(BoardSession::open(sprint, gateway, Arc::new(DefaultClock)).await?)
}

fn emit_board<T: Serialize>(
    board: &mut BoardSession<Gateway, DefaultClock>,
    outcome: Result<T, BoardError>,
) -> eyre::Result<()> {
    let (view, failure) = board_view(board.snapshot(), outcome);
    emit(&view)?;
    failure.map_or(Ok(()), |err| Err(err.into()))
}

async fn run_board(
    service: &Service,
    ctx: &RequestContext,
    command: BoardCommand,
) -> eyre::Result<()> {
    match command {
        BoardCommand::Show { sprint } => {
            let mut board = open_board(service, ctx, sprint).await?;
            emit_board(&mut board, Ok::<_, BoardError>(sprint))
        }
        BoardCommand::Move {
            sprint,
            from,
            drag,
            to,
            hover,
        } => {
            let mut board = open_board(service, ctx, sprint).await?;
            let outcome = board.move_task(drag, hover, from, to).await;
            emit_board(&mut board, outcome)
        }
        BoardCommand::Add {
            sprint,
            title,
            description,
        } => {
            let mut board = open_board(service, ctx, sprint).await?;
            let outcome = board.add_task(&title, description).await;
            emit_board(&mut board, outcome)
        }
        BoardCommand::Delete { sprint, task } => {
            let mut board = open_board(service, ctx, sprint).await?;
            let outcome = board.delete_task(task).await;
            emit_board(&mut board, outcome)
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::load_or_default(cli.config.as_deref())?.with_process_env()?;
    telemetry::init_tracing(&config.logging)?;

    let pool = build_pool(&config)?;
    if matches!(cli.command, Command::Migrate) {
        return migrate(pool).await;
    }

    let ctx = request_context(cli.identity.as_deref())?;
    let service: Service = TrackerService::new(
        Arc::new(PostgresTrackerRepository::new(pool)),
        Arc::new(DefaultClock),
    );

    match cli.command {
        Command::Migrate => Ok(()),
        Command::Project(command) => run_project(&service, &ctx, command).await,
        Command::Sprint(command) => run_sprint(&service, &ctx, command).await,
        Command::Task(command) => run_task(&service, &ctx, command).await,
        Command::Board(command) => run_board(&service, &ctx, command).await,
    }
}
