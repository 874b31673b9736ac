//! Shell command parsing and dispatch.
//!
//! Commands:
//! - `login <partitionId> <username> <password>` - Authenticate the session
//! - `logout` - Reset the session
//! - `status` - Show session, view and script state
//! - `disks` - List disks
//! - `partitions <diskId>` - List the partitions of a disk
//! - `fs <partitionId>` - Open a partition's filesystem view (searches `/`)
//! - `search <path>` - Search a path in the open view
//! - `load <file>` - Load a local `.smia` script
//! - `run` - Execute the loaded script remotely
//! - `output` - Show the last execution output
//! - `save [dir]` - Write the output to `output.smia`
//! - `help` - Show help
//! - `exit` - Exit the shell
//!
//! Listing failures degrade to an alert plus the empty-set display; login
//! failures alert and leave the session unauthenticated; execution failures
//! are already rendered as output text by the client.

use std::path::Path;

use nu_ansi_term::{Color, Style};
use tracing::warn;

use fruitpunch_client::{Credentials, EntryKind, Error, ExecState, FilesystemView, FsEntry};

use crate::context::AppContext;

/// Result of executing a command.
pub enum CommandResult {
    /// Command succeeded, optionally with output to display.
    Ok(Option<String>),
    /// Command failed with an error message.
    Error(String),
    /// User requested to exit.
    Exit,
    /// Show help.
    Help,
}

impl CommandResult {
    fn display(text: impl Into<String>) -> Self {
        CommandResult::Ok(Some(text.into()))
    }

    fn none() -> Self {
        CommandResult::Ok(None)
    }
}

/// Parse and execute a command.
pub fn execute(input: &str, ctx: &mut AppContext) -> CommandResult {
    let input = input.trim();

    if input.is_empty() {
        return CommandResult::none();
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match command.to_lowercase().as_str() {
        "help" | "?" => CommandResult::Help,
        "exit" | "quit" | "q" => CommandResult::Exit,
        "login" => cmd_login(args, ctx),
        "logout" => cmd_logout(ctx),
        "status" => cmd_status(ctx),
        "disks" => cmd_disks(ctx),
        "partitions" => cmd_partitions(args, ctx),
        "fs" => cmd_fs(args, ctx),
        "search" => cmd_search(args, ctx),
        "load" => cmd_load(args, ctx),
        "run" => cmd_run(ctx),
        "output" => cmd_output(ctx),
        "save" => cmd_save(args, ctx),
        _ => CommandResult::Error(format!(
            "Unknown command: '{}'. Type 'help' for available commands.",
            command
        )),
    }
}

/// Format help text.
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("FruitPunchFS Shell Commands")
    ));

    let commands = [
        (
            "login",
            "<partition> <user> <password>",
            "Authenticate against the service",
        ),
        ("logout", "", "Reset the session (local only)"),
        ("status", "", "Show session, view and script state"),
        ("", "", ""),
        ("disks", "", "List disks"),
        ("partitions", "<diskId>", "List the partitions of a disk"),
        (
            "fs",
            "<partitionId>",
            "Open a partition's filesystem (searches '/')",
        ),
        ("search", "<path>", "Search a path in the open filesystem"),
        ("", "", ""),
        ("load", "<file.smia>", "Load a local script"),
        ("run", "", "Execute the loaded script remotely"),
        ("output", "", "Show the last execution output"),
        ("save", "[dir]", "Write the output to output.smia"),
        ("", "", ""),
        ("help", "", "Show this help message (alias: ?)"),
        ("exit", "", "Exit the shell (alias: quit, q)"),
    ];

    for (cmd, args, desc) in commands {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<12} {:<32} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help
}

/// Listing failures degrade: the raw error is alerted and the display falls
/// back to the empty-set line, never an inconsistent state.
fn degrade_listing(error: &Error, empty_line: &str) -> CommandResult {
    warn!(error = %error, "listing failed; degrading to empty display");
    CommandResult::display(format!(
        "{} {}\n{}",
        Color::Red.bold().paint("Error:"),
        error,
        Color::Yellow.paint(empty_line)
    ))
}

fn cmd_login(args: &str, ctx: &mut AppContext) -> CommandResult {
    let mut parts = args.split_whitespace();
    let (partition_id, username, password) = match (parts.next(), parts.next(), parts.next()) {
        (Some(p), Some(u), Some(w)) if parts.next().is_none() => (p, u, w),
        _ => {
            return CommandResult::Error(
                "Usage: login <partitionId> <username> <password>".to_string(),
            )
        }
    };

    let credentials = Credentials {
        partition_id: partition_id.to_string(),
        username: username.to_string(),
        password: password.to_string(),
    };

    match ctx.session.login(&ctx.client, credentials) {
        Ok(()) => CommandResult::display(format!(
            "{} {}",
            Color::Green.paint("logged in"),
            Color::Yellow.paint(format!("(partition {})", partition_id))
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_logout(ctx: &mut AppContext) -> CommandResult {
    ctx.session.logout();
    ctx.view = None;
    CommandResult::display(format!("{}", Color::Green.paint("logged out")))
}

fn cmd_status(ctx: &mut AppContext) -> CommandResult {
    let mut lines = Vec::new();

    let session = if ctx.session.is_authenticated() {
        match ctx.session.partition_scope() {
            Some(scope) => format!(
                "{} (partition {})",
                Color::Green.paint("authenticated"),
                scope
            ),
            None => format!("{}", Color::Green.paint("authenticated")),
        }
    } else {
        format!("{}", Color::Yellow.paint("not authenticated"))
    };
    lines.push(format!("  session:  {}", session));

    let view = match &ctx.view {
        Some(view) => format!(
            "{} at {} ({} entries)",
            view.partition_id(),
            Color::Yellow.paint(view.path()),
            view.entries().len()
        ),
        None => format!("{}", Color::Yellow.paint("no filesystem open")),
    };
    lines.push(format!("  view:     {}", view));

    let script = match ctx.exec.payload() {
        Some(payload) => {
            let state = match ctx.exec.state() {
                ExecState::Empty => "empty",
                ExecState::Loaded => "loaded",
                ExecState::Executed => "executed",
            };
            format!("{} ({})", payload.file_name, state)
        }
        None => format!("{}", Color::Yellow.paint("no script loaded")),
    };
    lines.push(format!("  script:   {}", script));

    lines.push(format!(
        "  output:   {} bytes",
        ctx.exec.output_text().len()
    ));

    CommandResult::display(lines.join("\n"))
}

fn cmd_disks(ctx: &mut AppContext) -> CommandResult {
    match ctx.navigator.list_disks(&ctx.client, &ctx.session) {
        Ok(disks) if disks.is_empty() => {
            CommandResult::display(format!("{}", Color::Yellow.paint("No disks found.")))
        }
        Ok(disks) => {
            let mut output = String::new();
            for disk in &disks {
                output.push_str(&format!(
                    "  {}  {}\n",
                    Color::Cyan.paint(&disk.id),
                    disk.name
                ));
            }
            CommandResult::display(output.trim_end().to_string())
        }
        Err(e @ Error::Api(_)) => degrade_listing(&e, "No disks found."),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_partitions(args: &str, ctx: &mut AppContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: partitions <diskId>".to_string());
    }

    match ctx.navigator.list_partitions(&ctx.client, &ctx.session, args) {
        Ok(partitions) if partitions.is_empty() => {
            CommandResult::display(format!("{}", Color::Yellow.paint("No partitions found.")))
        }
        Ok(partitions) => {
            let mut output = String::new();
            for partition in &partitions {
                output.push_str(&format!(
                    "  {}  {:<16} {}\n",
                    Color::Cyan.paint(&partition.id),
                    partition.name,
                    Color::Yellow.paint(&partition.file_system)
                ));
            }
            CommandResult::display(output.trim_end().to_string())
        }
        Err(e @ Error::Api(_)) => degrade_listing(&e, "No partitions found."),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_fs(args: &str, ctx: &mut AppContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: fs <partitionId>".to_string());
    }

    match FilesystemView::open(&ctx.navigator, &ctx.client, &ctx.session, args) {
        Ok(view) => {
            let output = format_entries(view.partition_id(), view.path(), view.entries());
            ctx.view = Some(view);
            CommandResult::display(output)
        }
        Err(e @ Error::Api(_)) => degrade_listing(&e, "No entries found."),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_search(args: &str, ctx: &mut AppContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: search <path>".to_string());
    }

    let view = match ctx.view.as_mut() {
        Some(view) => view,
        None => {
            return CommandResult::Error(
                "No filesystem open. Use 'fs <partitionId>' first.".to_string(),
            )
        }
    };

    match view.search(&ctx.navigator, &ctx.client, &ctx.session, args) {
        Ok(_) => CommandResult::display(format_entries(
            view.partition_id(),
            view.path(),
            view.entries(),
        )),
        Err(e @ Error::Api(_)) => degrade_listing(&e, "No entries found."),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn format_entries(partition_id: &str, path: &str, entries: &[FsEntry]) -> String {
    let mut output = format!(
        "{} {}\n",
        Color::Cyan.paint(partition_id),
        Color::Yellow.paint(path)
    );

    if entries.is_empty() {
        output.push_str(&format!("{}", Color::Yellow.paint("No entries found.")));
        return output;
    }

    for entry in entries {
        let kind = match entry.kind {
            EntryKind::Folder => Color::Blue.bold().paint("folder"),
            EntryKind::File => Color::White.paint("file  "),
        };
        output.push_str(&format!("  {}  {}\n", kind, entry.name));
    }
    output.trim_end().to_string()
}

fn cmd_load(args: &str, ctx: &mut AppContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file.smia>".to_string());
    }

    match ctx.exec.load_path(Path::new(args)) {
        Ok(payload) => CommandResult::display(format!(
            "{} {} ({} bytes)",
            Color::Green.paint("loaded"),
            payload.file_name,
            payload.content.len()
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_run(ctx: &mut AppContext) -> CommandResult {
    match ctx.exec.execute(&ctx.client) {
        // Failures arrive as rendered output text, not as errors.
        Ok(outcome) => CommandResult::display(outcome.text().to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_output(ctx: &mut AppContext) -> CommandResult {
    let output = ctx.exec.output_text();
    if output.is_empty() {
        CommandResult::display(format!("{}", Color::Yellow.paint("(no output)")))
    } else {
        CommandResult::display(output.to_string())
    }
}

fn cmd_save(args: &str, ctx: &mut AppContext) -> CommandResult {
    let dir = if args.is_empty() { "." } else { args };

    match ctx.exec.save_output_to(Path::new(dir)) {
        Ok(target) => CommandResult::display(format!(
            "{} {}",
            Color::Green.paint("saved"),
            target.display()
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AppContext {
        AppContext::new("http://localhost:5000").unwrap()
    }

    #[test]
    fn empty_input_is_silent() {
        let mut ctx = context();
        assert!(matches!(execute("", &mut ctx), CommandResult::Ok(None)));
        assert!(matches!(execute("   ", &mut ctx), CommandResult::Ok(None)));
    }

    #[test]
    fn unknown_command_is_error() {
        let mut ctx = context();
        assert!(matches!(
            execute("mount /dev/sda1", &mut ctx),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn exit_and_help_aliases() {
        let mut ctx = context();
        assert!(matches!(execute("exit", &mut ctx), CommandResult::Exit));
        assert!(matches!(execute("q", &mut ctx), CommandResult::Exit));
        assert!(matches!(execute("help", &mut ctx), CommandResult::Help));
        assert!(matches!(execute("?", &mut ctx), CommandResult::Help));
    }

    #[test]
    fn login_requires_three_arguments() {
        let mut ctx = context();
        assert!(matches!(
            execute("login A1 root", &mut ctx),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            execute("login A1 root 123 extra", &mut ctx),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn listing_without_login_is_error_not_degradation() {
        // NotAuthenticated is a local gate, reported as an error before any
        // request is issued.
        let mut ctx = context();
        assert!(matches!(execute("disks", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(
            execute("partitions A1", &mut ctx),
            CommandResult::Error(_)
        ));
        assert!(matches!(execute("fs P1", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn search_requires_an_open_view() {
        let mut ctx = context();
        match execute("search /home", &mut ctx) {
            CommandResult::Error(msg) => assert!(msg.contains("fs <partitionId>")),
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn run_without_load_is_error() {
        let mut ctx = context();
        assert!(matches!(execute("run", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn load_rejects_wrong_extension() {
        let mut ctx = context();
        match execute("load script.txt", &mut ctx) {
            CommandResult::Error(msg) => assert!(msg.contains(".smia")),
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn load_then_save_without_run() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("noop.smia");
        std::fs::write(&script, "pause").unwrap();

        let mut ctx = context();
        assert!(matches!(
            execute(&format!("load {}", script.display()), &mut ctx),
            CommandResult::Ok(Some(_))
        ));

        match execute(&format!("save {}", dir.path().display()), &mut ctx) {
            CommandResult::Ok(Some(msg)) => assert!(msg.contains("output.smia")),
            _ => panic!("expected saved path"),
        }
        assert_eq!(
            std::fs::read(dir.path().join("output.smia")).unwrap(),
            b""
        );
    }

    #[test]
    fn status_reports_without_network() {
        let mut ctx = context();
        match execute("status", &mut ctx) {
            CommandResult::Ok(Some(text)) => {
                assert!(text.contains("not authenticated"));
                assert!(text.contains("no script loaded"));
            }
            _ => panic!("expected status output"),
        }
    }

    #[test]
    fn format_entries_renders_kinds_and_empty_set() {
        let entries = vec![
            FsEntry {
                kind: EntryKind::Folder,
                name: "Documents".to_string(),
            },
            FsEntry {
                kind: EntryKind::File,
                name: "README.txt".to_string(),
            },
        ];
        let text = format_entries("P1", "/", &entries);
        assert!(text.contains("Documents"));
        assert!(text.contains("README.txt"));

        let empty = format_entries("P1", "/nope", &[]);
        assert!(empty.contains("No entries found."));
    }
}
