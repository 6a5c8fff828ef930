//! bookforge command-line interface.
//!
//! Commands map one-to-one onto pipeline stages; `build` chains them. Every
//! command resolves the project context once, up front, and all errors are
//! reported with their stage prefix before exiting non-zero.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use bookforge::build::{run_build, run_ingest};
use bookforge::context::ProjectContext;
use bookforge::manifest::{self, BookManifest, STARTER_MANIFEST};
use bookforge::serve::PreviewServer;
use bookforge::site::STARTER_CSS;
use bookforge::{fsops, naming};

#[derive(Parser)]
#[command(
    name = "bookforge",
    version,
    about = "Deterministic book-build pipeline: dropzone to dated output tree"
)]
struct Cli {
    /// Project root (directory containing book.toml)
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scaffold a new project in the project root
    Init,
    /// Scan the dropzone and write the draft outline
    Ingest,
    /// Run the full pipeline into outputs/<slug>/<date>/
    Build,
    /// Start a new chapter file in the dropzone
    New {
        /// Chapter name, e.g. "ch3-advanced-topics"
        name: String,
    },
    /// Serve today's built site over local HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    let (stage, result) = match &cli.command {
        Command::Init => ("init", cmd_init(&cli)),
        Command::Ingest => ("ingest", cmd_ingest(&cli)),
        Command::Build => ("build", cmd_build(&cli)),
        Command::New { name } => ("new", cmd_new(&cli, name)),
        Command::Serve { host, port } => ("serve", cmd_serve(&cli, host, *port)),
    };
    if let Err(e) = result {
        eprintln!("[{stage}] error: {e}");
        process::exit(1);
    }
}

fn load_project(cli: &Cli) -> Result<(ProjectContext, BookManifest), Box<dyn Error>> {
    // Resolve once with the default dropzone to find book.toml, then again
    // with the manifest's configured dropzone.
    let bootstrap = ProjectContext::resolve(&cli.project, "dropzone")?;
    let manifest = BookManifest::load(&bootstrap.manifest_path())?;
    let ctx = ProjectContext::resolve(&cli.project, &manifest.dropzone)?;
    Ok((ctx, manifest))
}

fn cmd_init(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let ctx = ProjectContext::resolve(&cli.project, "dropzone")?;

    for dir in [
        ctx.dropzone.clone(),
        ctx.dropzone.join("images"),
        ctx.workspace.clone(),
        ctx.outputs.clone(),
        ctx.themes.clone(),
    ] {
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(".gitkeep"), "")?;
        println!("[init] dir: {}", dir.display());
    }

    if fsops::write_text_if_absent(&ctx.manifest_path(), STARTER_MANIFEST)? {
        println!("[init] wrote: {}", ctx.manifest_path().display());
    } else {
        println!("[init] kept existing: {}", ctx.manifest_path().display());
    }
    if fsops::write_text_if_absent(&ctx.theme_css(), STARTER_CSS)? {
        println!("[init] wrote: {}", ctx.theme_css().display());
    } else {
        println!("[init] kept existing: {}", ctx.theme_css().display());
    }
    println!("[init] done. Drop manuscript files into {}", ctx.dropzone.display());
    Ok(())
}

fn cmd_ingest(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (ctx, manifest) = load_project(cli)?;
    run_ingest(&ctx, &manifest)?;
    Ok(())
}

fn cmd_build(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let (ctx, manifest) = load_project(cli)?;
    run_build(&ctx, &manifest)?;
    Ok(())
}

/// Strip a trailing markdown extension so `new ch3-advanced.md` and
/// `new ch3-advanced` name the same chapter.
fn strip_markdown_ext(name: &str) -> &str {
    for ext in [".md", ".markdown"] {
        if name.len() > ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}

fn cmd_new(cli: &Cli, name: &str) -> Result<(), Box<dyn Error>> {
    let (ctx, _manifest) = load_project(cli)?;
    let slug = naming::slugify(strip_markdown_ext(name));
    let path = ctx.dropzone.join("chapters").join(format!("{slug}.md"));
    if path.exists() {
        return Err(format!("chapter already exists: {}", path.display()).into());
    }
    let label = naming::chapter_label(&format!("{slug}.md"));
    let boilerplate = format!(
        "# {label}\n\n\
         <!-- Write your chapter here. It will be picked up on the next build. -->\n\n\
         ## Section\n\nYour text.\n"
    );
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, boilerplate)?;
    println!("[new] wrote: {}", path.display());
    Ok(())
}

fn cmd_serve(cli: &Cli, host: &str, port: u16) -> Result<(), Box<dyn Error>> {
    let (ctx, manifest) = load_project(cli)?;
    let site_root = ctx
        .build_root(&manifest.slug(), &manifest::utc_build_date())
        .join("site");
    let server = PreviewServer::bind(&site_root, host, port)?;
    println!(
        "[serve] serving {} at http://{host}:{port}/ (Ctrl-C to stop)",
        site_root.display()
    );
    server.run()
}
