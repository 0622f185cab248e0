//! `roster` command-line entry point.
//!
//! # Responsibility
//! - Drive the core roster flows against the configured SQLite store.
//! - Keep output line-oriented and deterministic for scripting.

mod args;

use args::{Cli, Command, RecordFieldArgs};
use clap::Parser;
use log::warn;
use roster_core::db::open_db;
use roster_core::{
    init_logging, FormField, Record, RecordRepository, RosterConfig, RosterService,
    SqliteDocumentStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Version = cli.command {
        println!("roster_core version={}", roster_core::core_version());
        return Ok(());
    }

    let config = RosterConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path).map_err(|err| format!("database open failed: {err}"))?;
    let store = SqliteDocumentStore::try_new(&conn).map_err(|err| err.to_string())?;
    let repo = RecordRepository::new(store, config.collection.as_str());
    let mut session = RosterService::new(repo, config.page_size);
    session.load().map_err(|err| err.to_string())?;

    match cli.command {
        Command::List {
            search,
            bucket,
            sort,
            page,
        } => {
            session.set_search(search.unwrap_or_default());
            session.set_bucket(bucket);
            session.set_sort(sort);
            session.go_to_page(page);
            print_page(&session);
        }
        Command::Add(fields) => {
            session.open_form();
            apply_fields(session.form_mut(), &fields);
            let id = session.submit_form().map_err(|err| err.to_string())?;
            println!("created {id}");
            warn_if_stale(session.repository().is_stale());
        }
        Command::Edit { id, fields } => {
            session.edit(&id).map_err(|err| err.to_string())?;
            apply_fields(session.form_mut(), &fields);
            session.submit_form().map_err(|err| err.to_string())?;
            println!("updated {id}");
            warn_if_stale(session.repository().is_stale());
        }
        Command::Delete { id, yes } => {
            let record = session.request_delete(&id).map_err(|err| err.to_string())?;
            let label = record.name.clone();
            if !yes {
                session.cancel_delete();
                return Err(format!(
                    "refusing to delete `{label}` ({id}) without --yes"
                ));
            }
            session.confirm_delete().map_err(|err| err.to_string())?;
            println!("deleted {id}");
            warn_if_stale(session.repository().is_stale());
        }
        Command::Version => {}
    }

    Ok(())
}

fn apply_fields(form: &mut roster_core::FormController, fields: &RecordFieldArgs) {
    let updates = [
        (FormField::Name, fields.name.as_ref()),
        (FormField::Age, fields.age.as_ref()),
        (FormField::Address, fields.address.as_ref()),
        (FormField::Email, fields.email.as_ref()),
        (FormField::Phone, fields.phone.as_ref()),
    ];
    for (field, value) in updates {
        if let Some(value) = value {
            form.set_field(field, value.clone());
        }
    }
}

fn print_page<S, C>(session: &RosterService<S, C>)
where
    S: roster_core::RemoteStore,
    C: roster_core::Clock,
{
    let page = session.current_page();
    let state = session.view_state();
    println!(
        "total={} matches={} page={}/{} search={:?} bucket={} sort={}",
        session.total_records(),
        page.total_matches,
        page.page,
        page.total_pages,
        state.search,
        state.bucket,
        state.sort
    );
    for record in page.records {
        println!("{}", format_record(record));
    }
}

fn format_record(record: &Record) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.id,
        record.name,
        record.age,
        record.address,
        record.email.as_deref().unwrap_or("-"),
        record.phone.as_deref().unwrap_or("-"),
    )
}

fn warn_if_stale(stale: bool) {
    if stale {
        warn!("event=cli_refresh module=cli status=stale");
        eprintln!("warning: saved, but the record list could not be reloaded");
    }
}
