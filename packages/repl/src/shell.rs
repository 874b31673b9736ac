//! Interactive terminal loop using Reedline.
//!
//! Line editing (Vi and Emacs modes), command history, and a prompt that
//! reflects the session's authentication state and the open filesystem view.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use nu_ansi_term::Color;
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    EditMode, Emacs, FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, Reedline, Signal, Vi,
};

use crate::commands::{self, CommandResult};
use crate::context::AppContext;

/// Run the shell loop until the operator exits or the input stream ends.
pub fn run(mut ctx: AppContext) -> io::Result<()> {
    let mut line_editor = build_line_editor();

    println!("{}", Color::Cyan.paint(BANNER));
    println!(
        "Connected to {}",
        Color::Yellow.paint(ctx.client.base_url().as_str())
    );

    loop {
        let prompt = ShellPrompt::from_context(&ctx);

        match line_editor.read_line(&prompt)? {
            Signal::Success(line) => {
                match commands::execute(&line, &mut ctx) {
                    CommandResult::Ok(None) => {}
                    CommandResult::Ok(Some(output)) => println!("{}", output),
                    CommandResult::Error(msg) => {
                        println!("{} {}", Color::Red.bold().paint("Error:"), msg)
                    }
                    CommandResult::Help => println!("{}", commands::format_help()),
                    CommandResult::Exit => {
                        println!("{}", Color::Cyan.paint("Goodbye!"));
                        return Ok(());
                    }
                }
                io::stdout().flush()?;
            }
            Signal::CtrlC => {
                println!("{}", Color::Cyan.paint("^C (use 'exit' to quit)"));
            }
            Signal::CtrlD => {
                println!("{}", Color::Cyan.paint("Goodbye!"));
                return Ok(());
            }
        }
    }
}

fn build_line_editor() -> Reedline {
    let edit_mode: Box<dyn EditMode> = if should_use_vi_mode() {
        Box::new(Vi::new(
            default_vi_insert_keybindings(),
            default_vi_normal_keybindings(),
        ))
    } else {
        Box::new(Emacs::new(default_emacs_keybindings()))
    };

    let mut line_editor = Reedline::create().with_edit_mode(edit_mode);

    if let Some(history_path) = get_history_path() {
        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(history) = FileBackedHistory::with_file(1000, history_path) {
            line_editor = line_editor.with_history(Box::new(history));
        }
    }

    line_editor
}

fn get_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("fruitpunch").join("history.txt"))
}

/// Check if vi mode should be used based on environment configuration.
fn should_use_vi_mode() -> bool {
    if let Ok(mode) = std::env::var("FRUITPUNCH_EDIT_MODE") {
        let mode = mode.to_lowercase();
        return mode == "vi" || mode == "vim";
    }

    if let Ok(editor) = std::env::var("EDITOR") {
        let editor = editor.to_lowercase();
        return editor.contains("vim") || editor == "vi";
    }

    false
}

/// Prompt showing the authentication state and the open view's path.
struct ShellPrompt {
    authenticated: bool,
    location: Option<String>,
}

impl ShellPrompt {
    fn from_context(ctx: &AppContext) -> Self {
        Self {
            authenticated: ctx.session.is_authenticated(),
            location: ctx
                .view
                .as_ref()
                .map(|view| format!("{}:{}", view.partition_id(), view.path())),
        }
    }
}

impl Prompt for ShellPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let auth = if self.authenticated {
            Color::Green.bold().paint("logged in").to_string()
        } else {
            Color::Yellow.paint("logged out").to_string()
        };

        match &self.location {
            Some(location) => Cow::Owned(format!(
                "{} {}",
                auth,
                Color::Yellow.paint(location)
            )),
            None => Cow::Owned(auth),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => {
                Cow::Owned(format!("{} ", Color::Green.bold().paint(">")))
            }
            PromptEditMode::Vi(vi_mode) => {
                let indicator = match vi_mode {
                    reedline::PromptViMode::Normal => Color::Blue.bold().paint("[N]>"),
                    reedline::PromptViMode::Insert => Color::Green.bold().paint("[I]>"),
                };
                Cow::Owned(format!("{} ", indicator))
            }
            PromptEditMode::Custom(s) => Cow::Owned(format!("({})> ", s)),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

const BANNER: &str = r#"
  ___         _ _   ___             _    ___ ___
 | __| _ _  _(_) |_| _ \_  _ _ _  __| |_ | __/ __|
 | _| '_| || | |  _|  _/ || | ' \/ _| ' \| _|\__ \
 |_||_|  \_,_|_|\__|_|  \_,_|_||_\__|_||_|_| |___/

Type 'help' for available commands, 'exit' to quit.
"#;
