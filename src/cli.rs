use clap::Parser;
use std::path::PathBuf;

/// Apply the publisher's house style to a DOCX manuscript
#[derive(Parser, Debug)]
#[command(name = "housestyle", version, about)]
pub struct Cli {
    /// Path to the manuscript DOCX. The file name's prefix before the first
    /// underscore is the book identifier (e.g. BK01_chapter3.docx).
    pub input: PathBuf,

    /// DOCX whose style definitions supply the house styles
    #[arg(short, long)]
    pub template: PathBuf,

    /// Output file. Defaults to styled_<input name> next to the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file overriding style names and the layout format
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Layout placeholder format using {book}, {chapter} and {figure}
    #[arg(long)]
    pub layout_format: Option<String>,

    /// Book identifier to use instead of the one in the file name
    #[arg(long)]
    pub book_id: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
