use ai_staging::{GeminiClient, GeminiConfig};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use exporters::WatermarkMode;
use identity::{IdentityClient, IdentityConfig};
use project::{NewProject, ProjectStore};
use staging::{catalog, ImageData, StagingGenerator, StagingType, WorkflowSession};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "oneroof")]
#[command(about = "One Roof virtual staging - headless staging workflow")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the style catalog
    Styles {
        /// Filter by staging category (interior, exterior)
        #[arg(long)]
        category: Option<String>,
    },

    /// Stage a property photo
    Stage {
        /// Source photo (JPEG or PNG)
        image: PathBuf,

        /// Style id from the catalog
        #[arg(short, long)]
        style: String,

        /// Free-text guidelines appended to the generation directive
        #[arg(short, long, default_value = "")]
        guidelines: String,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Listing manifest to save the result into
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Project id within the manifest
        #[arg(long)]
        project: Option<String>,
    },

    /// Apply targeted edits to an already-staged image
    Refine {
        /// Image to edit
        image: PathBuf,

        /// Adjustment instructions, e.g. "make the sofa blue"
        instructions: String,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Composite a provenance watermark onto an image
    Watermark {
        /// Image to watermark
        image: PathBuf,

        /// Watermark mode (staged, enhanced, custom)
        #[arg(long, default_value = "staged")]
        mode: String,

        /// Text for custom mode (up to 100 characters)
        #[arg(long)]
        text: Option<String>,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage listings
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Manage the signed-in account
    #[command(subcommand)]
    Account(AccountCommands),
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a listing
    New {
        street: String,
        city: String,
        state: String,
        zip: String,

        /// Features to highlight
        #[arg(long, default_value = "")]
        features: String,

        /// Listing manifest path
        #[arg(long)]
        manifest: PathBuf,
    },

    /// List projects in a manifest
    List {
        #[arg(long)]
        manifest: PathBuf,
    },

    /// Add photos to a listing
    AddImage {
        /// Photos to add (JPEG or PNG)
        files: Vec<PathBuf>,

        #[arg(long)]
        manifest: PathBuf,

        /// Project id
        #[arg(long)]
        project: String,
    },

    /// Bundle a listing's photos into a ZIP archive
    Export {
        #[arg(long)]
        manifest: PathBuf,

        /// Project id
        #[arg(long)]
        project: String,

        /// Output archive path; defaults next to the manifest
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create an account and sign in
    Register {
        email: String,
        password: String,
        name: String,
    },

    /// Sign in
    Login { email: String, password: String },

    /// Show the signed-in account
    Whoami,

    /// Sign out
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Styles { category } => styles_command(category),
        Commands::Stage {
            image,
            style,
            guidelines,
            output,
            manifest,
            project,
        } => stage_command(image, style, guidelines, output, manifest, project).await,
        Commands::Refine {
            image,
            instructions,
            output,
        } => refine_command(image, instructions, output).await,
        Commands::Watermark {
            image,
            mode,
            text,
            output,
        } => watermark_command(image, mode, text, output),
        Commands::Project(command) => project_command(command),
        Commands::Account(command) => account_command(command).await,
    }
}

fn styles_command(category: Option<String>) -> Result<()> {
    let styles: Vec<_> = match category.as_deref() {
        Some("interior") => catalog().for_type(StagingType::Interior),
        Some("exterior") => catalog().for_type(StagingType::Exterior),
        Some(other) => bail!("unknown category: {other} (expected interior or exterior)"),
        None => catalog().all().iter().collect(),
    };
    for style in styles {
        println!(
            "{:32} [{}] {} - {}",
            style.id, style.staging_type, style.name, style.description
        );
    }
    Ok(())
}

async fn stage_command(
    image_path: PathBuf,
    style_id: String,
    guidelines: String,
    output: PathBuf,
    manifest: Option<PathBuf>,
    project_id: Option<String>,
) -> Result<()> {
    let style = catalog()
        .by_id(&style_id)
        .with_context(|| format!("unknown style: {style_id} (see `oneroof styles`)"))?
        .clone();
    let upload = read_upload(&image_path)?;
    let generator = gemini_client()?;

    let mut session = WorkflowSession::new();
    session.select_image(upload.clone());
    session.advance();
    session.select_staging_type(style.staging_type);
    session.advance();
    session.select_style(style)?;
    session.advance();
    session.set_guidelines(guidelines);

    info!("generating staged image");
    session.generate(&generator).await;

    if let Some(message) = session.error() {
        bail!("{message}");
    }
    let staged = session
        .generated_image()
        .context("generation produced no image")?;
    write_image(&output, staged)?;
    println!("Staged image written to {}", output.display());

    if let (Some(manifest), Some(project_id)) = (manifest, project_id) {
        let mut store = load_store(&manifest)?;
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        store.save_result(
            &project_id,
            &upload.to_data_uri(),
            &staged.to_data_uri(),
            name,
        )?;
        save_store(&manifest, &store)?;
        println!("Saved result into listing {project_id}");
    }
    Ok(())
}

async fn refine_command(image_path: PathBuf, instructions: String, output: PathBuf) -> Result<()> {
    let image = read_image(&image_path)?;
    let generator = gemini_client()?;

    info!("refining image");
    let refined = generator.refine(&image, &instructions).await?;
    write_image(&output, &refined)?;
    println!("Refined image written to {}", output.display());
    Ok(())
}

fn watermark_command(
    image_path: PathBuf,
    mode: String,
    text: Option<String>,
    output: PathBuf,
) -> Result<()> {
    let mode = match mode.as_str() {
        "staged" => WatermarkMode::VirtuallyStaged,
        "enhanced" => WatermarkMode::DigitallyEnhanced,
        "custom" => {
            let text = text.context("custom mode requires --text")?;
            WatermarkMode::custom(text)
        }
        other => bail!("unknown watermark mode: {other} (expected staged, enhanced or custom)"),
    };

    let image = read_image(&image_path)?;
    let marked = exporters::apply_watermark(&image, &mode)?;
    write_image(&output, &marked)?;
    println!("Watermarked image written to {}", output.display());
    Ok(())
}

fn project_command(command: ProjectCommands) -> Result<()> {
    match command {
        ProjectCommands::New {
            street,
            city,
            state,
            zip,
            features,
            manifest,
        } => {
            let mut store = load_store_or_default(&manifest)?;
            let created = store.create(NewProject {
                street,
                city,
                state,
                zip,
                features,
                ..Default::default()
            })?;
            save_store(&manifest, &store)?;
            println!("Created listing {} ({})", created.id, created.display_address());
            Ok(())
        }
        ProjectCommands::List { manifest } => {
            let store = load_store(&manifest)?;
            for project in store.list() {
                println!(
                    "{}  {}  ({} photos, {} staged)",
                    project.id,
                    project.display_address(),
                    project.images.len(),
                    project.staged_count()
                );
            }
            Ok(())
        }
        ProjectCommands::AddImage {
            files,
            manifest,
            project,
        } => {
            let mut store = load_store(&manifest)?;
            for file in &files {
                let upload = read_upload(file)?;
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                store.add_image(&project, &upload.to_data_uri(), &name)?;
                info!("added {} to {project}", file.display());
            }
            save_store(&manifest, &store)?;
            println!("Added {} photo(s) to listing {project}", files.len());
            Ok(())
        }
        ProjectCommands::Export {
            manifest,
            project,
            output,
        } => {
            let store = load_store(&manifest)?;
            let listing = store
                .get(&project)
                .with_context(|| format!("no such project: {project}"))?;
            let bytes = exporters::bundle_project(listing)
                .context(exporters::ARCHIVE_FAILED_MESSAGE)?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(exporters::archive_file_name(listing)));
            fs::write(&path, bytes)?;
            println!("Archive written to {}", path.display());
            Ok(())
        }
    }
}

async fn account_command(command: AccountCommands) -> Result<()> {
    let client = identity_client()?;
    match command {
        AccountCommands::Register {
            email,
            password,
            name,
        } => {
            let session = client.register(&email, &password, &name).await?;
            store_session_secret(&session.secret)?;
            println!("Signed in as {email}");
            Ok(())
        }
        AccountCommands::Login { email, password } => {
            let session = client.login(&email, &password).await?;
            store_session_secret(&session.secret)?;
            println!("Signed in as {email}");
            Ok(())
        }
        AccountCommands::Whoami => {
            let Some(secret) = load_session_secret()? else {
                println!("Not signed in");
                return Ok(());
            };
            match client.current_user(&secret).await? {
                Some(user) => println!("{} <{}>", user.name, user.email),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        AccountCommands::Logout => {
            if let Some(secret) = load_session_secret()? {
                client.logout(&secret).await?;
                let _ = fs::remove_file(session_file());
            }
            println!("Signed out");
            Ok(())
        }
    }
}

fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
    base.join("oneroof")
}

fn session_file() -> PathBuf {
    app_data_dir().join("session")
}

fn store_session_secret(secret: &str) -> Result<()> {
    let dir = app_data_dir();
    fs::create_dir_all(&dir)?;
    fs::write(session_file(), secret)?;
    Ok(())
}

fn load_session_secret() -> Result<Option<String>> {
    match fs::read_to_string(session_file()) {
        Ok(secret) if !secret.trim().is_empty() => Ok(Some(secret.trim().to_string())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn identity_client() -> Result<IdentityClient> {
    let project_id = std::env::var("ONEROOF_IDENTITY_PROJECT")
        .context("set ONEROOF_IDENTITY_PROJECT to the identity project id")?;
    let mut config = IdentityConfig::new(project_id);
    if let Ok(endpoint) = std::env::var("ONEROOF_IDENTITY_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }
    Ok(IdentityClient::new(config)?)
}

fn gemini_client() -> Result<GeminiClient> {
    let api_key =
        std::env::var("GEMINI_API_KEY").context("set GEMINI_API_KEY to enable generation")?;
    Ok(GeminiClient::new(GeminiConfig::new(api_key))?)
}

/// Read a photo and validate it against the upload boundary (JPEG/PNG only).
fn read_upload(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mime = sniff_mime(&bytes);
    Ok(staging::accept_upload(mime, &bytes)?)
}

/// Read an already-generated image without the upload restrictions.
fn read_image(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ImageData::from_bytes(sniff_mime(&bytes), &bytes))
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Png) => "image/png",
        _ => "application/octet-stream",
    }
}

fn write_image(path: &Path, image: &ImageData) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, image.decode()?)?;
    Ok(())
}

fn load_store(path: &Path) -> Result<ProjectStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_store_or_default(path: &Path) -> Result<ProjectStore> {
    if path.exists() {
        load_store(path)
    } else {
        Ok(ProjectStore::new())
    }
}

fn save_store(path: &Path, store: &ProjectStore) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(store)?)?;
    Ok(())
}
