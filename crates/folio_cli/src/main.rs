//! Folio content CLI.
//!
//! # Responsibility
//! - Inspect and administer the portfolio document from a terminal.
//! - Wire config, logging, database, cache and auth the same way a site
//!   server would.

use clap::{Parser, Subcommand};
use folio_core::config::CONFIG_FILE_NAME;
use folio_core::db::open_db;
use folio_core::editor::set_photo_focal_point;
use folio_core::{
    init_logging, parse_image_ref, render_root_stylesheet, upload_file, with_focal_point,
    AdminAuth, ContentStore, FileCache, FocalPoint, FolioConfig, SaveOutcome,
    SqliteContentBackend, SqliteObjectStore,
};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio content store", version)]
struct Cli {
    /// Path to config file (default: folio.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the document and report where it came from
    Load,

    /// Load as admin, writing the defaults when no document exists yet
    Init {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Check admin credentials
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Print the merged document, or one top-level section, as JSON
    Show {
        /// Section key, e.g. `profile` or `portfolioPage`
        section: Option<String>,
    },

    /// Print the theme as a `:root` stylesheet
    Css,

    /// Parse an image URL, or re-encode it with a focal point
    Focal {
        url: String,

        /// Horizontal focal point in percent
        #[arg(long, requires = "y")]
        x: Option<f64>,

        /// Vertical focal point in percent
        #[arg(long, requires = "x")]
        y: Option<f64>,
    },

    /// Set the focal point of a stored photo
    SetFocal {
        album: String,
        photo: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Upload an image or PDF to the media bucket and print its URL
    Upload {
        file: PathBuf,

        /// Content type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,

        /// Apply the photo size limit
        #[arg(long)]
        photo: bool,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Replace all content with the defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,

        #[command(flatten)]
        credentials: Credentials,
    },
}

#[derive(clap::Args)]
struct Credentials {
    /// Admin email (default: from config)
    #[arg(long)]
    email: Option<String>,

    /// Admin password (default: from config)
    #[arg(long)]
    password: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = match FolioConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    if let Some(log_dir) = &config.log_dir {
        if let Err(e) = init_logging(&config.log_level, log_dir) {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Load => run_load(&config),
        Commands::Init { credentials } => run_init(&config, &credentials),
        Commands::Login { credentials } => run_login(&config, &credentials),
        Commands::Show { section } => run_show(&config, section.as_deref()),
        Commands::Css => run_css(&config),
        Commands::Focal { url, x, y } => {
            run_focal(&url, x.zip(y));
            Ok(())
        }
        Commands::SetFocal {
            album,
            photo,
            x,
            y,
            credentials,
        } => run_set_focal(&config, &credentials, &album, &photo, FocalPoint::new(x, y)),
        Commands::Upload {
            file,
            content_type,
            photo,
            credentials,
        } => run_upload(&config, &credentials, &file, content_type.as_deref(), photo),
        Commands::Reset { yes, credentials } => run_reset(&config, &credentials, yes),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run_load(config: &FolioConfig) -> Result<(), String> {
    let conn = connect(config)?;
    let mut store = anonymous_store(&conn, config);
    let source = store.load();
    println!("source={}", source.as_str());
    println!("albums={}", store.document().albums.len());
    println!("writings={}", store.document().writings.len());
    println!("testimonials={}", store.document().testimonials.len());
    Ok(())
}

fn run_init(config: &FolioConfig, credentials: &Credentials) -> Result<(), String> {
    let conn = connect(config)?;
    let auth = Arc::new(AdminAuth::new(&config.admin.email, &config.admin.password));
    let session = sign_in(&auth, config, credentials)?;

    let mut backend = SqliteContentBackend::new(&conn, Arc::clone(&auth));
    backend.set_session(Some(session.clone()));
    let mut store = ContentStore::new(backend, FileCache::new(&config.cache_dir));
    let source = store.load();
    auth.sign_out(&session);

    println!("source={}", source.as_str());
    Ok(())
}

fn run_login(config: &FolioConfig, credentials: &Credentials) -> Result<(), String> {
    let auth = AdminAuth::new(&config.admin.email, &config.admin.password);
    let session = sign_in(&auth, config, credentials)?;
    auth.sign_out(&session);
    println!("signed_in email={}", session.email);
    Ok(())
}

fn run_show(config: &FolioConfig, section: Option<&str>) -> Result<(), String> {
    let conn = connect(config)?;
    let mut store = anonymous_store(&conn, config);
    store.load();

    let value = serde_json::to_value(store.document()).map_err(|e| e.to_string())?;
    let value = match section {
        Some(key) => value
            .get(key)
            .cloned()
            .ok_or_else(|| format!("unknown section `{key}`"))?,
        None => value,
    };
    let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn run_css(config: &FolioConfig) -> Result<(), String> {
    let conn = connect(config)?;
    let mut store = anonymous_store(&conn, config);
    store.load();
    print!("{}", render_root_stylesheet(&store.document().theme));
    Ok(())
}

fn run_focal(url: &str, point: Option<(f64, f64)>) {
    match point {
        Some((x, y)) => println!("{}", with_focal_point(url, FocalPoint::new(x, y))),
        None => {
            let parsed = parse_image_ref(url);
            println!("src={}", parsed.src);
            match parsed.focal {
                Some(point) => println!("focal={point}"),
                None => println!("focal=none"),
            }
            println!("position={}", parsed.css_position());
        }
    }
}

fn run_set_focal(
    config: &FolioConfig,
    credentials: &Credentials,
    album_id: &str,
    photo_id: &str,
    point: FocalPoint,
) -> Result<(), String> {
    let conn = connect(config)?;
    let auth = Arc::new(AdminAuth::new(&config.admin.email, &config.admin.password));
    let session = sign_in(&auth, config, credentials)?;

    let mut backend = SqliteContentBackend::new(&conn, Arc::clone(&auth));
    backend.set_session(Some(session));
    let mut store = ContentStore::new(backend, FileCache::new(&config.cache_dir));
    store.load();

    let mut albums = store.document().albums.clone();
    if !set_photo_focal_point(&mut albums, album_id, photo_id, point) {
        return Err(format!("photo `{photo_id}` not found in album `{album_id}`"));
    }
    report_save(store.update_albums(albums))
}

fn run_upload(
    config: &FolioConfig,
    credentials: &Credentials,
    file: &Path,
    content_type: Option<&str>,
    photo: bool,
) -> Result<(), String> {
    let bytes = std::fs::read(file).map_err(|e| format!("cannot read `{}`: {e}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");
    let content_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(file_name).to_string());

    let conn = connect(config)?;
    let auth = Arc::new(AdminAuth::new(&config.admin.email, &config.admin.password));
    let session = sign_in(&auth, config, credentials)?;

    let mut objects = SqliteObjectStore::new(
        &conn,
        config.storage.bucket.as_str(),
        config.storage.public_base_url.as_str(),
        auth,
    );
    objects.set_session(Some(session));

    let limit = photo.then_some(config.storage.photo_upload_limit_bytes);
    let url = upload_file(&objects, file_name, &content_type, &bytes, limit)
        .map_err(|e| e.user_message())?;
    println!("{url}");
    Ok(())
}

fn run_reset(config: &FolioConfig, credentials: &Credentials, confirmed: bool) -> Result<(), String> {
    if !confirmed {
        return Err("reset replaces all content with the defaults; pass --yes to confirm".to_string());
    }

    let conn = connect(config)?;
    let auth = Arc::new(AdminAuth::new(&config.admin.email, &config.admin.password));
    let session = sign_in(&auth, config, credentials)?;

    let mut backend = SqliteContentBackend::new(&conn, Arc::clone(&auth));
    backend.set_session(Some(session));
    let mut store = ContentStore::new(backend, FileCache::new(&config.cache_dir));
    store.load();
    report_save(store.reset_data())
}

fn connect(config: &FolioConfig) -> Result<Connection, String> {
    open_db(&config.database_path).map_err(|e| {
        format!(
            "cannot open database `{}`: {e}",
            config.database_path.display()
        )
    })
}

fn anonymous_store<'conn>(
    conn: &'conn Connection,
    config: &FolioConfig,
) -> ContentStore<SqliteContentBackend<'conn>, FileCache> {
    let auth = Arc::new(AdminAuth::new(&config.admin.email, &config.admin.password));
    ContentStore::new(
        SqliteContentBackend::new(conn, auth),
        FileCache::new(&config.cache_dir),
    )
}

fn sign_in(
    auth: &AdminAuth,
    config: &FolioConfig,
    credentials: &Credentials,
) -> Result<folio_core::Session, String> {
    let email = credentials.email.as_deref().unwrap_or(&config.admin.email);
    let password = credentials
        .password
        .as_deref()
        .unwrap_or(&config.admin.password);
    auth.sign_in(email, password).map_err(|e| e.to_string())
}

fn report_save(outcome: SaveOutcome) -> Result<(), String> {
    match outcome {
        SaveOutcome::Saved => {
            info!("event=cli_save module=cli status=ok");
            println!("saved");
            Ok(())
        }
        SaveOutcome::Failed(failure) => Err(failure.message),
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
