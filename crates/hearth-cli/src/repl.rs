//! REPL – Read-Eval-Print Loop for the hearth interactive shell.
//!
//! Supported slash-commands:
//!   /help                          – show this list
//!   /members                       – list the household by generation
//!   /spouse <name>                 – show a member's spouse
//!   /children <name>               – list a member's children
//!   /parents <name>                – list a member's parents
//!   /memories [name]               – list memories, newest first
//!   /add <name> <YYYY-MM-DD> <title> – record a new memory
//!   /edit <id>                     – edit a memory (id prefix is enough)
//!   /delete <id>                   – delete a memory
//!   /clear                         – erase every memory
//!   /check                         – audit household relationships
//!   /quit | /exit                  – exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hearth_family::FamilyGraph;
use hearth_memory::{MemoryEventStore, SlotStore};
use hearth_types::{EventId, FamilyMember, MemoryEvent, parse_date};

/// Everything the shell reads from and writes to.
pub struct App<S: SlotStore> {
    pub graph: FamilyGraph,
    pub store: MemoryEventStore<S>,
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run<S: SlotStore>(app: &mut App<S>, shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "hearth>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, args) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "/help" => cmd_help(),
            "/members" => cmd_members(app),
            "/spouse" => cmd_spouse(app, args),
            "/children" => cmd_relatives(app, args, Relation::Children),
            "/parents" => cmd_relatives(app, args, Relation::Parents),
            "/memories" => cmd_memories(app, args),
            "/add" => cmd_add(app, args),
            "/edit" => cmd_edit(app, args),
            "/delete" => cmd_delete(app, args),
            "/clear" => cmd_clear(app),
            "/check" => cmd_check(app),
            "/quit" | "/exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "hearth Commands".bold().underline());
    println!("  {}                       – list the household", "/members".bold().cyan());
    println!("  {}                – show a member's spouse", "/spouse <name>".bold().cyan());
    println!("  {}              – list a member's children", "/children <name>".bold().cyan());
    println!("  {}               – list a member's parents", "/parents <name>".bold().cyan());
    println!("  {}              – list memories, newest first", "/memories [name]".bold().cyan());
    println!("  {} – record a new memory", "/add <name> <YYYY-MM-DD> <title>".bold().cyan());
    println!("  {}                    – edit a memory", "/edit <id>".bold().cyan());
    println!("  {}                  – delete a memory", "/delete <id>".bold().cyan());
    println!("  {}                         – erase every memory", "/clear".bold().cyan());
    println!("  {}                         – audit relationships", "/check".bold().cyan());
    println!("  {}                   – exit the CLI", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_members<S: SlotStore>(app: &App<S>) {
    let Some(youngest) = app.graph.members().map(|m| m.generation).max() else {
        println!("  {}", "The household is empty.".dimmed());
        return;
    };

    for generation in 0..=youngest {
        let row = app.graph.generation(generation);
        if row.is_empty() {
            continue;
        }
        println!("{}", format!("Generation {generation}").bold().underline());
        for m in row {
            let born = m
                .birth_year
                .map(|y| format!(" b.{y}"))
                .unwrap_or_default();
            let spouse = app
                .graph
                .get_spouse(m.id)
                .map(|s| format!(" ♥ {}", s.name))
                .unwrap_or_default();
            println!(
                "  {} ({}{}){}  {}  {} memories",
                m.name.bold(),
                m.gender,
                born,
                spouse.magenta(),
                m.trait_label.dimmed(),
                app.store.count_for(&m.name).to_string().yellow()
            );
        }
    }
}

fn cmd_spouse<S: SlotStore>(app: &App<S>, name: &str) {
    let Some(member) = require_member(app, name) else {
        return;
    };
    match app.graph.get_spouse(member.id) {
        Some(spouse) => println!("  {} ♥ {}", member.name.bold(), spouse.name.bold().magenta()),
        None => println!("  {} has no spouse recorded.", member.name.bold()),
    }
}

enum Relation {
    Children,
    Parents,
}

fn cmd_relatives<S: SlotStore>(app: &App<S>, name: &str, relation: Relation) {
    let Some(member) = require_member(app, name) else {
        return;
    };
    let (label, relatives) = match relation {
        Relation::Children => ("children", app.graph.get_children(member.id)),
        Relation::Parents => ("parents", app.graph.get_parents(member.id)),
    };
    if relatives.is_empty() {
        println!("  {} has no {} recorded.", member.name.bold(), label);
        return;
    }
    println!("  {} {}:", member.name.bold(), label);
    for r in relatives {
        println!("    • {} (generation {})", r.name.bold(), r.generation);
    }
}

fn cmd_memories<S: SlotStore>(app: &App<S>, subject: &str) {
    let events = if subject.is_empty() {
        app.store.all_events()
    } else {
        app.store.events_for(subject)
    };
    if events.is_empty() {
        println!("  {}", "No memories recorded.".dimmed());
        return;
    }
    for e in events {
        print_event(e);
    }
}

fn cmd_add<S: SlotStore>(app: &mut App<S>, args: &str) {
    let mut parts = args.splitn(3, char::is_whitespace);
    let (Some(subject), Some(raw_date), Some(title)) = (parts.next(), parts.next(), parts.next())
    else {
        println!("  Usage: {}", "/add <name> <YYYY-MM-DD> <title>".bold());
        return;
    };
    let date = match parse_date(raw_date) {
        Ok(d) => d,
        Err(e) => {
            println!("  {}", e.to_string().red());
            return;
        }
    };
    if app.graph.find_by_name(subject).is_none() {
        println!(
            "  {} '{}' is not in the household; saving anyway.",
            "Warning:".yellow(),
            subject
        );
    }
    let content = prompt_str("  Content: ", "");

    let event = MemoryEvent::new(subject, date, title.trim(), content);
    let id = event.id();
    report_persist(app.store.add_event(event));
    println!("{} {}", "✓ Recorded memory".green(), short_id(id).bold());
}

fn cmd_edit<S: SlotStore>(app: &mut App<S>, prefix: &str) {
    let Some(id) = require_event(app, prefix) else {
        return;
    };
    let Some(mut event) = app.store.get(id).cloned() else {
        return;
    };

    event.title = prompt_str(&format!("  Title [{}]: ", event.title), &event.title);
    let raw_date = prompt_str(&format!("  Date  [{}]: ", event.date), &event.date.to_string());
    match parse_date(&raw_date) {
        Ok(d) => event.date = d,
        Err(e) => println!("  {} {}, keeping {}", "Warning:".yellow(), e, event.date),
    }
    event.content = prompt_str("  Content [keep]: ", &event.content);

    match app.store.update_event(event) {
        Ok(true) => println!("{}", "✓ Memory updated".green()),
        Ok(false) => println!("  {}", "Memory no longer exists.".yellow()),
        Err(e) => persist_warning(&e),
    }
}

fn cmd_delete<S: SlotStore>(app: &mut App<S>, prefix: &str) {
    let Some(id) = require_event(app, prefix) else {
        return;
    };
    match app.store.delete_event(id) {
        Ok(_) => println!("{} {}", "✓ Deleted memory".green(), short_id(id).bold()),
        Err(e) => persist_warning(&e),
    }
}

fn cmd_clear<S: SlotStore>(app: &mut App<S>) {
    let answer = prompt_str(
        &format!("  Erase all {} memories? [y/N]: ", app.store.len()),
        "n",
    );
    if !answer.eq_ignore_ascii_case("y") {
        println!("  Cancelled.");
        return;
    }
    report_persist(app.store.clear_all());
    println!(
        "{}",
        "✓ All memories erased. Sample memories return on next start.".green()
    );
}

fn cmd_check<S: SlotStore>(app: &App<S>) {
    let issues = app.graph.check_integrity();
    if issues.is_empty() {
        println!("  {} relationships are consistent.", "🟢".green());
        return;
    }
    println!("  {} {} issue(s):", "🔴".red(), issues.len());
    for issue in issues {
        println!("    • {}", issue);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn require_member<'a, S: SlotStore>(app: &'a App<S>, name: &str) -> Option<&'a FamilyMember> {
    if name.is_empty() {
        println!("  {}", "A member name is required.".yellow());
        return None;
    }
    let member = app.graph.find_by_name(name);
    if member.is_none() {
        println!("{} '{}'", "Unknown member:".red(), name.yellow());
    }
    member
}

fn require_event<S: SlotStore>(app: &App<S>, prefix: &str) -> Option<EventId> {
    let ids: Vec<EventId> = app.store.all_events().iter().map(|e| e.id()).collect();
    match resolve_prefix(&ids, prefix) {
        Ok(id) => Some(id),
        Err(msg) => {
            println!("  {}", msg.yellow());
            None
        }
    }
}

/// Find the single identifier starting with `prefix`.
fn resolve_prefix(ids: &[EventId], prefix: &str) -> Result<EventId, String> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Err("A memory id is required.".to_string());
    }
    let matches: Vec<EventId> = ids
        .iter()
        .copied()
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("No memory matches '{prefix}'.")),
        _ => Err(format!("'{prefix}' matches {} memories; type more of the id.", matches.len())),
    }
}

fn short_id(id: EventId) -> String {
    id.to_string().chars().take(8).collect()
}

fn print_event(e: &MemoryEvent) {
    println!(
        "  {}  {}  {}  {}",
        short_id(e.id()).dimmed(),
        e.date.to_string().yellow(),
        e.subject.bold(),
        e.title
    );
    if !e.content.is_empty() {
        println!("            {}", e.content.dimmed());
    }
}

fn report_persist<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        persist_warning(&e);
    }
}

fn persist_warning(e: &dyn std::fmt::Display) {
    println!(
        "  {} change kept in memory but not saved: {}",
        "Warning:".yellow(),
        e
    );
}

/// Prompt for a string value.  Returns `default` when the user presses Enter.
pub(crate) fn prompt_str(msg: &str, default: &str) -> String {
    print!("{}", msg);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed
            }
        }
        Err(_) => default.to_string(),
    }
}
