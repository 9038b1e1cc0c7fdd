//! templateman CLI - render a template, prompting for its variables

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use templateman::{FixSuggestion, PromptMode, Runner, SearchPath, StdinPrompter, TemplatemanError};

/// Render TEMPLATE_NAME to OUTPUT_FILE or stdout.
///
/// TEMPLATE_NAME must be a Jinja2 template file either included with this
/// program or located in any of the template search directories.
///
/// Templates are looked for in the following locations:
///   1. Directories specified with the -d option
///   2. ~/.templateman/ (or --user-dir)
///   3. Built-in templates included with the program
#[derive(Parser)]
#[command(name = "templateman")]
#[command(about = "Create new files from templates interactively")]
#[command(version, verbatim_doc_comment)]
struct Cli {
    /// Template to render
    #[arg(required_unless_present = "list")]
    template_name: Option<String>,

    /// Where to write the result (stdout when omitted or "-")
    output_file: Option<PathBuf>,

    /// Directory used to find template files (repeatable)
    #[arg(short = 'd', long = "template-dir", value_name = "DIR")]
    template_dirs: Vec<PathBuf>,

    /// Look for built-in templates before looking in other directories
    #[arg(long)]
    builtin: bool,

    /// Interactively prompt for template values (default)
    #[arg(long, visible_alias = "interactive", overrides_with = "no_prompt")]
    prompt: bool,

    /// Use default values for all fields without prompting
    #[arg(long, visible_alias = "batch", overrides_with = "prompt")]
    no_prompt: bool,

    /// Per-user template directory
    #[arg(long, env = "TEMPLATEMAN_DIR", value_name = "DIR")]
    user_dir: Option<PathBuf>,

    /// List available templates and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// What one invocation does
#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    List,
    Render(&'a str),
}

impl Cli {
    /// clap only accepts a missing name together with `--list`
    fn action(&self) -> Action<'_> {
        match (self.list, self.template_name.as_deref()) {
            (false, Some(name)) => Action::Render(name),
            _ => Action::List,
        }
    }

    fn mode(&self) -> PromptMode {
        if self.no_prompt {
            PromptMode::Batch
        } else {
            PromptMode::Interactive
        }
    }

    fn search_path(&self) -> SearchPath {
        let user_dir = self.user_dir.clone().or_else(SearchPath::default_user_dir);
        SearchPath::new(&self.template_dirs, user_dir, self.builtin)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.action() {
        Action::List => list_templates(&cli.search_path()),
        Action::Render(name) => render_template(&cli, name),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        for location in e.searched_locations() {
            eprintln!("  {} {}", "searched".dimmed(), location);
        }
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries rendered output
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn render_template(cli: &Cli, name: &str) -> Result<(), TemplatemanError> {
    let runner = Runner::new(cli.search_path(), cli.mode());
    let mut prompter = StdinPrompter::new();
    let mut rendered = runner.run(name, &mut prompter)?;
    rendered.push('\n');

    match cli.output_file.as_ref().filter(|path| path.as_os_str() != "-") {
        Some(path) => {
            debug!(path = %path.display(), "writing output file");
            fs::write(path, rendered)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn list_templates(search_path: &SearchPath) -> Result<(), TemplatemanError> {
    let mut stdout = io::stdout().lock();
    for (name, location) in search_path.list()? {
        writeln!(stdout, "{name}\t{}", location.to_string().dimmed())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prompt_flags_last_one_wins() {
        let cli = Cli::parse_from(["templateman", "t", "--no-prompt", "--prompt"]);
        assert_eq!(cli.mode(), PromptMode::Interactive);
        let cli = Cli::parse_from(["templateman", "t", "--prompt", "--batch"]);
        assert_eq!(cli.mode(), PromptMode::Batch);
        let cli = Cli::parse_from(["templateman", "t"]);
        assert_eq!(cli.mode(), PromptMode::Interactive);
    }

    #[test]
    fn template_dirs_keep_order() {
        let cli = Cli::parse_from(["templateman", "-d", "/a", "--template-dir", "/b", "t"]);
        assert_eq!(cli.template_dirs, [PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn name_required_without_list() {
        assert!(Cli::try_parse_from(["templateman"]).is_err());
        assert!(Cli::try_parse_from(["templateman", "--list"]).is_ok());
    }

    #[test]
    fn action_follows_list_flag_and_name() {
        let cli = Cli::parse_from(["templateman", "--list"]);
        assert_eq!(cli.action(), Action::List);
        let cli = Cli::parse_from(["templateman", "readme.md"]);
        assert_eq!(cli.action(), Action::Render("readme.md"));
        let cli = Cli::parse_from(["templateman", "--list", "readme.md"]);
        assert_eq!(cli.action(), Action::List);
    }
}
