//! `schoolbook` - CLI for registering and browsing schools
//!
//! Each subcommand renders one page of the application: the landing page,
//! the add-school form, or the school listing.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;

use schoolbook::cli::{AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat};
use schoolbook::routes::LANDING_CARDS;
use schoolbook::{
    init_logging, AddSchoolForm, Config, DemoSeed, Field, KeyValueArea, NoSeed, Route,
    SchoolGallery, SchoolRecord, SeedProvider, SqliteRecordStore, SubmitOutcome,
};

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Home => {
            print_home();
            Ok(ExitCode::SUCCESS)
        }
        Command::Add(add_cmd) => handle_add(&config, &add_cmd).await,
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Routes { path } => Ok(handle_routes(path.as_deref())),
        Command::Reset { yes } => handle_reset(&config, yes),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config) -> schoolbook::Result<SqliteRecordStore> {
    SqliteRecordStore::open(config.database_path(), config.storage.key.clone())
}

fn print_home() {
    println!("{}", Route::Home.title());
    println!("{}", "=".repeat(Route::Home.title().len()));
    println!();
    println!("{}", Route::Home.subtitle());
    for card in &LANDING_CARDS {
        println!();
        println!("[{}]", card.title);
        println!("  {}", card.description);
        println!("  {} -> schoolbook {}", card.action, command_for(card.route));
    }
}

fn handle_routes(path: Option<&str>) -> ExitCode {
    let Some(path) = path else {
        Route::ALL.into_iter().for_each(print_route);
        return ExitCode::SUCCESS;
    };

    match Route::from_path(path) {
        Some(route) => {
            print_route(route);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No page at {path}");
            ExitCode::FAILURE
        }
    }
}

fn print_route(route: Route) {
    println!(
        "{:<15} {:<25} schoolbook {}",
        route.path(),
        route.title(),
        command_for(route)
    );
}

fn command_for(route: Route) -> &'static str {
    match route {
        Route::Home => "home",
        Route::AddSchool => "add",
        Route::ShowSchools => "list",
    }
}

async fn handle_add(config: &Config, cmd: &AddCommand) -> CliResult {
    let store = open_store(config)?;
    let mut form = AddSchoolForm::with_input(&config.form, cmd.to_input());

    let outcome = form.submit(&store).await;
    let notification = form.notification().cloned();

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&errors_json(&errors))?);
            } else {
                eprintln!("School was not added:");
                for (field, message) in errors.iter() {
                    eprintln!("  {}: {message}", field_name(field));
                }
            }
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Added(record) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                if let Some(toast) = notification {
                    println!("{} {}", toast.title, toast.description);
                }
                println!("ID: {}", record.id);
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Failed(error) => {
            if let Some(toast) = notification {
                eprintln!("{}: {}", toast.title, toast.description);
            }
            eprintln!("  {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn field_name(field: Field) -> &'static str {
    field.label().trim_end_matches(" *")
}

fn errors_json(errors: &schoolbook::FieldErrors) -> serde_json::Value {
    let map = errors
        .iter()
        .map(|(field, message)| {
            (
                field.as_str().to_string(),
                serde_json::Value::from(message),
            )
        })
        .collect::<serde_json::Map<String, serde_json::Value>>();
    serde_json::json!({ "errors": map })
}

fn handle_list(config: &Config, cmd: &ListCommand) -> CliResult {
    let store = open_store(config)?;
    let seed: &dyn SeedProvider = if cmd.no_demo || !config.seed.demo_records {
        &NoSeed
    } else {
        &DemoSeed
    };

    let mut gallery = SchoolGallery::load(&store, seed);
    gallery.set_search_term(cmd.search.clone());
    let schools = gallery.filtered();

    if cmd.format == OutputFormat::Json {
        let output = serde_json::json!({
            "total": gallery.total(),
            "demo": gallery.is_seeded(),
            "schools": schools,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", Route::ShowSchools.title());
    println!("{}", Route::ShowSchools.subtitle());
    if gallery.is_seeded() {
        println!("(demonstration schools; nothing registered yet)");
    }
    if let Some(summary) = gallery.summary() {
        println!("{summary}");
    }
    println!();

    if let Some(empty) = gallery.empty_state() {
        println!("{}", empty.heading());
        println!("{}", empty.message());
        if empty.offers_add_link() {
            println!("Add one with: schoolbook add");
        }
        return Ok(ExitCode::SUCCESS);
    }

    match cmd.format {
        OutputFormat::Table => print_table(&schools),
        _ => print_plain(&schools),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_plain(schools: &[&SchoolRecord]) {
    for (i, school) in schools.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", school.name);
        println!("  {}", school.address);
        println!("  {}", school.location());
        println!("  {}", school.contact);
        println!("  {}", school.email_id);
    }
}

fn print_table(schools: &[&SchoolRecord]) {
    let name_width = column_width("Name", schools.iter().map(|s| s.name.as_str()));
    let location: Vec<String> = schools.iter().map(|s| s.location()).collect();
    let location_width = column_width("Location", location.iter().map(String::as_str));

    println!(
        "{:<name_width$}  {:<location_width$}  {:<10}  Email",
        "Name", "Location", "Contact"
    );
    println!(
        "{}  {}  {}  {}",
        "-".repeat(name_width),
        "-".repeat(location_width),
        "-".repeat(10),
        "-".repeat(5)
    );
    for (school, location) in schools.iter().zip(&location) {
        println!(
            "{:<name_width$}  {:<location_width$}  {:<10}  {}",
            school.name, location, school.contact, school.email_id
        );
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

fn handle_reset(config: &Config, yes: bool) -> CliResult {
    if !yes {
        println!("This will remove every registered school.");
        println!("Use --yes to confirm.");
        return Ok(ExitCode::FAILURE);
    }

    let store = open_store(config)?;
    if store.clear()? {
        println!("Removed all registered schools.");
    } else {
        println!("Nothing to remove.");
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Form]");
                println!("  Placeholder image:  {}", config.form.placeholder_image);
                println!("  Max image bytes:    {}", config.form.max_image_bytes);
                println!();
                println!("[Seed]");
                println!("  Demo records:       {}", config.seed.demo_records);

                let path = config.database_path();
                if path.exists() {
                    let keys = KeyValueArea::open(&path)?.keys()?;
                    println!();
                    println!("[Stored keys]");
                    if keys.is_empty() {
                        println!("  (none)");
                    }
                    for key in keys {
                        println!("  {key}");
                    }
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
