use clap::Subcommand;
use pausely_core::journal;
use pausely_core::timer::format_hms;
use pausely_core::Database;

#[derive(Subcommand)]
pub enum JournalAction {
    /// List noted sessions, newest first
    List,
    /// Replace the note at a journal index
    Edit {
        /// Index as shown by `journal list`
        index: usize,
        /// New note text
        note: String,
    },
    /// Delete the session at a journal index
    Delete {
        /// Index as shown by `journal list`
        index: usize,
    },
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        JournalAction::List => {
            let view = journal::journal_view(&db)?;
            if view.is_empty() {
                println!("no noted sessions");
                return Ok(());
            }
            for (i, session) in view.iter().enumerate() {
                let local = session.start.with_timezone(&chrono::Local);
                println!(
                    "[{i}] {}  {} mode, work {}",
                    local.format("%Y-%m-%d %H:%M"),
                    session.mode.as_str(),
                    format_hms(session.work_seconds)
                );
                println!("    {}", session.note);
            }
        }
        JournalAction::Edit { index, note } => {
            journal::update_note_by_index(&db, index, &note)?;
            println!("note updated");
        }
        JournalAction::Delete { index } => {
            let removed = journal::delete_by_index(&db, index)?;
            let local = removed.start.with_timezone(&chrono::Local);
            println!("deleted session from {}", local.format("%Y-%m-%d %H:%M"));
        }
    }
    Ok(())
}
