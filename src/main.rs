mod app;
mod clock;
mod domain;
mod input;
mod lifecycle;
mod logging;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use clock::{Clock, DefaultClock};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{
    format_countdown, format_duration, format_hms, status_badge, visible_tasks, NotePad, Priority, Task, TaskDraft,
    TaskFilter, TaskId, TaskStatus,
};
use lifecycle::LifecycleController;
use notifications::{deliver_all, DesktopNotifier};
use persistence::{
    ensure_data_dir, init_local_data_dir, load_notes, load_settings, load_tasks, log_file, save_notes, save_tasks,
    Settings, META_FILE_NAME,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Terminal task timer with estimates, breaks and a live countdown", long_about = None)]
struct Cli {
    /// Verbose logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskflow directory in the current directory
    Init,
    /// Add a task
    Add {
        title: String,
        /// Estimate in minutes. Defaults to the configured estimate.
        #[arg(short, long)]
        estimate: Option<u32>,
        /// low, medium, high or urgent
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date, YYYY-MM-DD or RFC 3339
        #[arg(long)]
        due: Option<String>,
        /// Tag, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List tasks, running work first
    List {
        /// not-started, in-progress, paused or completed
        #[arg(short, long)]
        status: Option<TaskStatus>,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Case-insensitive match on title, description and tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Start or resume a task (pauses the running one)
    Start { id: String },
    /// Pause the running task
    Pause { id: String },
    /// Mark a task completed
    Complete { id: String },
    /// Delete a task
    Delete { id: String },
    /// Show totals
    Stats,
    /// Write a markdown report
    Report {
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scratch-pad notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Add a note
    Add { content: Vec<String> },
    /// List notes, newest first
    List,
    /// Replace a note's content
    Edit { id: String, content: Vec<String> },
    /// Remove a note
    Rm { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(cli.debug),
        Some(command) => {
            logging::init_stderr(cli.debug);
            run_command(command)
        }
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized taskflow directory: {}", data_dir.display());
            println!();
            println!("Taskflow will now use this local directory for storage.");
            println!("Run 'taskflow' to start tracking tasks.");
            Ok(())
        }
        Commands::Add {
            title,
            estimate,
            priority,
            description,
            due,
            tags,
        } => {
            let dir = ensure_data_dir()?;
            let settings = load_settings(dir.join(META_FILE_NAME))?;
            let mut draft = TaskDraft::new(title, estimate.unwrap_or(settings.default_estimate_minutes));
            draft.priority = priority.unwrap_or(settings.default_priority);
            draft.description = description.unwrap_or_default();
            draft.due_date = due.as_deref().map(parse_due).transpose()?;
            draft.tags = tags;
            let draft = draft.validate()?;

            let mut controller = open_controller(&dir, &settings)?;
            let id = controller.create_task(draft);
            save_tasks(&dir, controller.tasks())?;
            println!("Added {} ({})", id.short(), controller.task(id).map(|t| t.title.as_str()).unwrap_or(""));
            Ok(())
        }
        Commands::List {
            status,
            priority,
            search,
        } => {
            let dir = ensure_data_dir()?;
            let controller = open_controller(&dir, &load_settings(dir.join(META_FILE_NAME))?)?;
            let filter = TaskFilter {
                status,
                priority,
                search: search.unwrap_or_default(),
            };
            let rows = visible_tasks(controller.tasks(), &filter);
            if rows.is_empty() {
                println!("No tasks.");
            }
            for task in rows {
                let live = (controller.active_task_id() == Some(task.id))
                    .then(|| controller.live_counters())
                    .flatten()
                    .map(|c| c.elapsed);
                println!("{}", task_row(task, live));
            }
            Ok(())
        }
        Commands::Start { id } => transition(&id, "Started", |c, id| c.start_task(id)),
        Commands::Pause { id } => transition(&id, "Paused", |c, id| c.pause_task(id)),
        Commands::Complete { id } => transition(&id, "Completed", |c, id| c.complete_task(id)),
        Commands::Delete { id } => {
            let dir = ensure_data_dir()?;
            let mut controller = open_controller(&dir, &load_settings(dir.join(META_FILE_NAME))?)?;
            let task_id = resolve_task(&controller, &id)?;
            let title = controller.task(task_id).map(|t| t.title.clone()).unwrap_or_default();
            controller.delete_task(task_id);
            save_tasks(&dir, controller.tasks())?;
            println!("Deleted {} ({})", task_id.short(), title);
            Ok(())
        }
        Commands::Stats => {
            let dir = ensure_data_dir()?;
            let controller = open_controller(&dir, &load_settings(dir.join(META_FILE_NAME))?)?;
            let stats = controller.stats();
            println!("Tasks:       {}", stats.total_tasks);
            println!("Completed:   {} ({}%)", stats.completed_tasks, stats.completion_rate());
            println!("Planned:     {}", format_hms(stats.total_estimated_minutes * 60));
            println!("Spent:       {}", format_hms(stats.total_active_secs));
            println!("Break time:  {}", format_hms(stats.total_break_secs));
            println!("Over est.:   {}", stats.over_estimate_tasks);
            if let (Some(task), Some(counters)) = (controller.active_task(), controller.live_counters()) {
                println!();
                println!(
                    "Running:     {} ({} elapsed, {} left)",
                    task.title,
                    format_hms(counters.elapsed.max(0) as u64),
                    format_countdown(counters.remaining)
                );
            }
            Ok(())
        }
        Commands::Report { output } => {
            let dir = ensure_data_dir()?;
            let tasks = load_tasks(&dir)?;
            let report_path = report::generate_report(&tasks, output)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        Commands::Note { command } => run_note_command(command),
    }
}

fn run_note_command(command: NoteCommands) -> Result<()> {
    let dir = ensure_data_dir()?;
    let mut pad = NotePad::new(load_notes(&dir)?);

    match command {
        NoteCommands::Add { content } => {
            let id = pad
                .add(&content.join(" "), DefaultClock.utc())
                .context("Note content is empty")?;
            save_notes(&dir, &pad.notes)?;
            println!("Added note {}", &id.simple().to_string()[..8]);
        }
        NoteCommands::List => {
            if pad.notes.is_empty() {
                println!("No notes.");
            }
            for note in &pad.notes {
                println!(
                    "{}  {}  {}",
                    &note.id.simple().to_string()[..8],
                    note.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    note.content
                );
            }
        }
        NoteCommands::Edit { id, content } => {
            let note_id = pad.resolve(&id).with_context(|| format!("No unique note matches '{}'", id))?;
            if !pad.edit(note_id, &content.join(" ")) {
                anyhow::bail!("Note content is empty");
            }
            save_notes(&dir, &pad.notes)?;
            println!("Updated note {}", id);
        }
        NoteCommands::Rm { id } => {
            let note_id = pad.resolve(&id).with_context(|| format!("No unique note matches '{}'", id))?;
            pad.remove(note_id);
            save_notes(&dir, &pad.notes)?;
            println!("Removed note {}", id);
        }
    }
    Ok(())
}

/// Load tasks and rebuild the controller; a task stored as running keeps running
fn open_controller(dir: &Path, settings: &Settings) -> Result<LifecycleController<DefaultClock>> {
    let tasks = load_tasks(dir)?;
    let mut controller = LifecycleController::restore(tasks, DefaultClock);
    controller.set_notifications_enabled(settings.notifications_enabled);
    Ok(controller)
}

fn resolve_task<C: Clock>(controller: &LifecycleController<C>, prefix: &str) -> Result<TaskId> {
    controller
        .resolve(prefix)
        .with_context(|| format!("No unique task matches '{}'", prefix))
}

/// Run one lifecycle operation from the command line, save, and deliver alerts
fn transition(
    prefix: &str,
    verb: &str,
    op: impl FnOnce(&mut LifecycleController<DefaultClock>, TaskId) -> bool,
) -> Result<()> {
    let dir = ensure_data_dir()?;
    let mut controller = open_controller(&dir, &load_settings(dir.join(META_FILE_NAME))?)?;
    let id = resolve_task(&controller, prefix)?;

    if op(&mut controller, id) {
        save_tasks(&dir, controller.tasks())?;
        if let Some(task) = controller.task(id) {
            println!("{} {} ({})", verb, id.short(), task.title);
        }
    } else if let Some(task) = controller.task(id) {
        println!("Nothing to do: {} is {}", task.title, task.status().label());
    }

    deliver_all(&DesktopNotifier::new(), &controller.drain_events());
    Ok(())
}

/// One line of `taskflow list`
fn task_row(task: &Task, live_elapsed: Option<i64>) -> String {
    let elapsed = live_elapsed.map(|e| e.max(0) as u64).unwrap_or(task.active_secs);
    let mut row = format!(
        "{}  {:<10} {:<7} {}  {} / {}",
        task.id.short(),
        status_badge(task),
        task.priority.label(),
        task.title,
        format_hms(elapsed),
        format_duration(task.estimated_secs().unsigned_abs()),
    );
    for tag in &task.tags {
        row.push_str(&format!(" #{}", tag));
    }
    row
}

/// Accept RFC 3339, or a bare date meaning the end of that local day
fn parse_due(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid due date '{}'. Use YYYY-MM-DD: {}", value, e))?;
    let end_of_day = date.and_hms_opt(23, 59, 59).context("Invalid due date")?;
    let local = Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .context("Due date does not exist in the local timezone")?;
    Ok(local.with_timezone(&Utc))
}

fn run_tui(debug: bool) -> Result<()> {
    let data_dir = ensure_data_dir()?;
    logging::init_file(&log_file()?, debug)?;
    tracing::info!(dir = %data_dir.display(), "starting");

    // Show which directory we're using
    eprintln!("Using taskflow directory: {}", data_dir.display());

    let settings = load_settings(data_dir.join(META_FILE_NAME))?;
    let controller = LifecycleController::restore(load_tasks(&data_dir)?, DefaultClock);
    let notes = load_notes(&data_dir)?;
    let mut app = AppState::new(
        controller,
        notes,
        settings,
        Box::new(DesktopNotifier::new()),
        Some(data_dir),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit; a running task stays running until the next session
    if let Err(e) = app.save() {
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = &result {
        tracing::error!(error = %err, "event loop failed");
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let poll = ticker::poll_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());

        // Autosave if needed
        if app.is_dirty() {
            app.save()?;
        }
    }
}
