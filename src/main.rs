use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use weft::config::SiteConfig;
use weft::pipeline::{self, BuildOptions};

#[derive(Parser)]
#[command(name = "weft", version, about = "Localized landing-page builder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every configured language and write the site tree
    Build {
        /// Site root: contains build/, receives index.html and urls.txt
        #[arg(long, default_value = ".")]
        root: Utf8PathBuf,
        /// Config file (defaults to <root>/weft.toml)
        #[arg(long)]
        config: Option<Utf8PathBuf>,
        /// Treat template warnings as build failures
        #[arg(long)]
        strict: bool,
    },
    /// Expand one template against a JSON document, to stdout
    Render {
        template: Utf8PathBuf,
        data: Utf8PathBuf,
        /// Treat template warnings as failures
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> miette::Result<()> {
    weft::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            root,
            config,
            strict,
        } => {
            let config_path = config.unwrap_or_else(|| root.join("weft.toml"));
            let config = SiteConfig::load(&config_path)?;
            pipeline::build(&BuildOptions { root, strict }, &config)?;
        }
        Command::Render {
            template,
            data,
            strict,
        } => {
            let text = pipeline::render_file(&template, &data, strict)?;
            print!("{text}");
        }
    }
    Ok(())
}
