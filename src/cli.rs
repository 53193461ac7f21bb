use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "altfix")]
#[command(author, version)]
#[command(about = "Find and fix missing, empty and poor image alt text")]
#[command(
    long_about = "altfix scans HTML, JSX/TSX, Vue, Svelte and Astro files for image tags whose \
    alt text is missing, empty or unhelpful (a bare file name, the word \"image\"), and rewrites \
    the offending tags with the alt text you provide. It also runs as a language server."
)]
#[command(after_help = "\
EXAMPLES:

    # Lint every supported file below the current directory
    altfix lint

    # Lint from stdin
    cat page.tsx | altfix lint --language typescriptreact

    # Fail CI when issues exist
    altfix lint --check src/

    # Apply file-name suggestions in place
    altfix lint --fix src/

    # Set alt text for the image on line 12
    altfix fix src/App.vue --line 12 --alt \"Team photo at the 2024 offsite\"

CONFIGURATION:

altfix looks for configuration files in this order:
  1. Explicit --config path
  2. altfix.toml or .altfix.toml in current/parent directories
  3. ~/.config/altfix/config.toml (XDG)
  4. Built-in defaults

Example .altfix.toml:

    supported-tags = [\"img\", \"Image\", \"v-img\", \"Avatar\"]
    translation-placeholder = \"{{ $t('image.alt') }}\"
    exclude = [\"dist/**\"]")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, altfix will \
        search for .altfix.toml or altfix.toml in the current directory and its parents, \
        then fall back to ~/.config/altfix/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MessageFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report image tags with missing, empty or poor alt text
    #[command(
        long_about = "Scan files for supported image tags and report alt text issues. \
        Directories are walked recursively, honouring .gitignore, and only files with a \
        supported extension (.html, .htm, .jsx, .tsx, .vue, .svelte, .astro) are visited."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Lint a directory
    altfix lint src/

    # Machine-readable output
    altfix lint --message-format json src/

    # Preview file-name based fixes without writing
    altfix lint --fix --diff index.html

RULES:

  missing-alt (error)    the tag has no alt attribute
  empty-alt   (warning)  alt is empty or whitespace, or {} in JSX
  poor-alt    (warning)  alt ends in .png/.jpg/.jpeg/.gif/.svg or \"image\"")]
    Lint {
        /// Files or directories (stdin if not provided)
        #[arg(help = "Files or directories to lint")]
        paths: Vec<PathBuf>,

        /// Language of stdin input
        #[arg(long, value_name = "ID")]
        #[arg(
            long_help = "Language identifier for stdin input or for files with an unknown \
            extension: html, javascriptreact, typescriptreact, vue, svelte or astro. \
            Stdin defaults to html."
        )]
        language: Option<String>,

        /// Exit with code 1 if any issue is found
        #[arg(long)]
        check: bool,

        /// Apply file-name based alt text suggestions
        #[arg(long)]
        #[arg(
            long_help = "Rewrite each flagged tag with alt text derived from the image file \
            name (company-logo.png becomes \"Company logo\"), or with the configured \
            placeholder. Issues without a usable suggestion are left for manual fixing. \
            Files are modified in place; stdin input is printed fixed to stdout."
        )]
        fix: bool,

        /// With --fix, print a diff instead of writing files
        #[arg(long, requires = "fix")]
        diff: bool,

        /// Output format for reported issues
        #[arg(long, value_enum, default_value_t = MessageFormat::Text)]
        message_format: MessageFormat,
    },
    /// Set alt text for the image tag on one line
    #[command(
        long_about = "Rewrite the image tag on the given line so it carries exactly one alt \
        attribute with the supplied text. The file is modified in place unless --stdout is given."
    )]
    Fix {
        #[arg(help = "File to modify")]
        file: PathBuf,

        /// 1-based line of the tag
        #[arg(long)]
        line: usize,

        /// Alt text to insert
        #[arg(long)]
        alt: String,

        /// Tag name (default: first supported tag on the line, then img)
        #[arg(long)]
        tag: Option<String>,

        /// Language identifier when the extension is not recognised
        #[arg(long, value_name = "ID")]
        language: Option<String>,

        /// Print the result instead of writing the file
        #[arg(long)]
        stdout: bool,
    },
    /// Print the tags the scanner sees, for debugging
    Scan {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,

        /// Language identifier for stdin input
        #[arg(long, value_name = "ID")]
        language: Option<String>,
    },
    /// Start the Language Server Protocol server
    #[command(
        long_about = "Start the altfix Language Server Protocol (LSP) server for editor \
        integration. The server publishes alt text diagnostics and offers quick fixes."
    )]
    #[command(after_help = "\
The LSP server communicates via stdin/stdout and is typically launched automatically by your \
editor's LSP client. You generally don't need to run this command manually.")]
    Lsp,
}
