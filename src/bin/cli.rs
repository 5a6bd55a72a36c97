//! VLMS workload CLI
//!
//! Drives the workload view models against the backend from a terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vlms::{
    api::HttpApi,
    error::{AppError, Result},
    models::{ActivityId, Config, Credentials},
    services::{ActivityCatalog, ChecklistView, LecturerLookup, Navigator, View, WorkloadEntryForm},
};

/// VLMS - Visiting Lecturer workload client
#[derive(Parser, Debug)]
#[command(
    name = "vlms",
    version,
    about = "Workload entry and verification for visiting lecturers"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "vlms.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Login username (overrides [session].username)
    #[arg(short, long, env = "VLMS_USERNAME")]
    username: Option<String>,

    /// Login password
    #[arg(long, env = "VLMS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration file
    Validate,

    /// List the views available to the logged-in role
    Views,

    /// Show the logged-in user's profile
    Profile,

    /// Look up a lecturer and their tutor reference numbers
    Lecturer {
        /// National identity card number
        nic: String,
    },

    /// List workload activity types
    Activities,

    /// Enter a workload record
    Enter {
        #[arg(long)]
        reference: String,

        /// Group name, repeat once per group
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Activity ID or name
        #[arg(long)]
        activity: String,

        #[arg(long)]
        activity_number: u32,

        #[arg(long)]
        hours: u32,
    },

    /// Show the workload checklist for a reference number
    Checklist { reference: String },

    /// Toggle verification of a checklist entry (1-based group/entry)
    Verify {
        reference: String,
        group: usize,
        entry: usize,
    },

    /// Delete a checklist entry (1-based group/entry)
    Delete {
        reference: String,
        group: usize,
        entry: usize,
    },
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK ({})", config.api.base_url()?);
        return Ok(());
    }

    config.validate()?;
    let mut api = HttpApi::new(&config.api)?;

    let username = cli.username.clone().or(config.session.username.clone());
    match (username, cli.password.clone()) {
        (Some(username), Some(password)) => {
            api.login(&Credentials::new(username, password)).await?;
        }
        _ => {
            log::error!("Username and password are required (--username / VLMS_PASSWORD)");
            return Err(AppError::Unauthenticated);
        }
    }

    let navigator = Navigator::for_session(api.session());
    let result = run(&api, &navigator, cli.command).await;
    api.logout();
    result
}

async fn run(api: &HttpApi, navigator: &Navigator, command: Command) -> Result<()> {
    let needs_workload_view = !matches!(command, Command::Views | Command::Profile);
    if needs_workload_view && !navigator.permits(View::WorkloadVerification) {
        return Err(AppError::Forbidden(format!(
            "{} is not available to this role",
            View::WorkloadVerification.title()
        )));
    }

    match command {
        Command::Validate => {}

        Command::Views => {
            if let Some(role) = navigator.role() {
                println!("Welcome, {}", role.display_name());
            }
            for view in navigator.menu() {
                println!("  {:<28} {}", view.title(), view.path());
            }
        }

        Command::Profile => {
            let profile = api.fetch_profile().await?;
            if let Some(role) = navigator.role() {
                for (label, value) in profile.rows(role) {
                    println!("{label}: {value}");
                }
            }
        }

        Command::Lecturer { nic } => {
            let mut lookup = LecturerLookup::new();
            let mut catalog = ActivityCatalog::new();

            // Independent fetches; a failing catalog does not hide the lecturer.
            let (found, activities) =
                futures::join!(lookup.search(api, &nic), catalog.load(api));
            if let Err(e) = activities {
                log::warn!("{}", e);
            }

            let lecturer = found?;
            println!("NIC: {}", lecturer.nic);
            println!("Full Name: {}", lecturer.full_name);
            println!("Assigned Reference Numbers:");
            for course in lecturer.online_tutor_courses() {
                println!(
                    "  {}  {}  {}",
                    course.reference_number, course.course_code, course.service_type
                );
            }
            println!("Activities available: {}", catalog.activities().len());
        }

        Command::Activities => {
            let mut catalog = ActivityCatalog::new();
            for activity in catalog.load(api).await? {
                println!("{:>4}  {}", activity.id, activity.name);
            }
        }

        Command::Enter {
            reference,
            groups,
            activity,
            activity_number,
            hours,
        } => {
            let mut catalog = ActivityCatalog::new();
            catalog.load(api).await?;
            let activity_id = resolve_activity(&catalog, &activity)?;

            let mut form = WorkloadEntryForm::new();
            form.set_reference_number(reference);
            form.set_group_count(groups.len());
            for (i, name) in groups.into_iter().enumerate() {
                form.set_group_name(i, name)?;
            }
            form.set_activity(Some(activity_id));
            form.set_activity_number(Some(activity_number));
            form.set_hours(Some(hours));

            let ack = form.submit(api).await?;
            log::info!("Workload entered successfully! {}", ack.trim());
        }

        Command::Checklist { reference } => {
            let mut view = ChecklistView::new();
            view.load(api, &reference).await?;
            print_checklist(&view);
        }

        Command::Verify {
            reference,
            group,
            entry,
        } => {
            let mut view = ChecklistView::new();
            view.load(api, &reference).await?;
            let (g, e) = zero_based(group, entry)?;
            let status = view.toggle_verification(api, g, e).await?;
            log::info!("Entry {}.{} is now {}", group, entry, status);
            print_checklist(&view);
        }

        Command::Delete {
            reference,
            group,
            entry,
        } => {
            let mut view = ChecklistView::new();
            view.load(api, &reference).await?;
            let (g, e) = zero_based(group, entry)?;
            view.delete_entry(api, g, e).await?;
            if let Some(notice) = view.notice() {
                log::info!("{}", notice);
            }
            print_checklist(&view);
        }
    }

    Ok(())
}

/// Accept either an activity ID, in whatever form the backend uses, or a name.
fn resolve_activity(catalog: &ActivityCatalog, input: &str) -> Result<ActivityId> {
    catalog
        .find_by_key(input)
        .or_else(|| catalog.find_by_name(input))
        .map(|a| a.id.clone())
        .ok_or_else(|| AppError::lookup(format!("Unknown activity '{input}'")))
}

fn zero_based(group: usize, entry: usize) -> Result<(usize, usize)> {
    match (group.checked_sub(1), entry.checked_sub(1)) {
        (Some(g), Some(e)) => Ok((g, e)),
        _ => Err(AppError::lookup("Group and entry numbers start at 1")),
    }
}

fn print_checklist(view: &ChecklistView) {
    let groups = view.groups();
    if groups.is_empty() {
        println!("No workload checklist available.");
        return;
    }

    for group in groups {
        println!();
        println!("{}", group.name);
        println!(
            "  {:<4} {:<24} {:>5}  {:<16} {}",
            "#", "Activity", "Hours", "Status", "Verified By"
        );
        for row in group.rows {
            println!(
                "  {:<4} {:<24} {:>5}  {:<16} {}",
                row.entry_index + 1,
                row.activity,
                row.hours,
                row.status_label,
                row.verifier
            );
        }
    }
}
