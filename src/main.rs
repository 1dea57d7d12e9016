use albumview::access::{UserAccess, hash_password};
use albumview::catalog::Catalog;
use albumview::config::{self, GalleryConfig};
use albumview::render::{PhotoPage, Renderer};
use albumview::{access, output, server};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "albumview")]
#[command(about = "Serves a directory of photo and video albums as browsable HTML")]
#[command(long_about = "\
Serves a directory of photo and video albums as browsable HTML

Your filesystem is the data source. Every subdirectory of the albums root is
an album; every file inside it is a photo or video, listed by name.

Content structure:

  albums/
  ├── birthdays/
  │   ├── cake.jpg
  │   ├── candles.JPG
  │   └── song.mp4                 # Video (by extension)
  ├── vacation/
  │   ├── beach.jpg
  │   └── beach.xmp                # Ignored (by extension)
  └── work/

Access:
  admin   sees every album and may reset the catalog cache
  guests  see the albums listed in their config entry (\"*\" for all)
  With no accounts configured, every visitor is admin.

Run 'albumview gen-config' to generate a documented albumview.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "albumview.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// List the albums a user may see
    Albums {
        /// Account to filter for (default: admin view)
        #[arg(long)]
        user: Option<String>,
    },
    /// Render an album's photo list page to stdout
    Album {
        album: String,
    },
    /// Render a photo page to stdout
    Photo {
        album: String,
        photo: String,
        /// Render the full-screen variant
        #[arg(long)]
        full_screen: bool,
    },
    /// Scan every album and print the inventory
    Check,
    /// Print a stock albumview.toml with all options documented
    GenConfig,
    /// Print the SHA-256 digest of a password for the config file
    HashPassword {
        password: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Serve => {
            let config = config::load_config(&cli.config)?;
            tokio::runtime::Runtime::new()?.block_on(server::serve(config))?;
        }
        Command::Albums { user } => {
            let config = config::load_config(&cli.config)?;
            let catalog = Catalog::from_config(&config);
            let access = match &user {
                Some(name) => {
                    let identity = access::Authenticator::from_config(&config.access)
                        .identity(name)
                        .ok_or_else(|| format!("unknown user '{name}'"))?;
                    UserAccess::from_identity(&identity)
                }
                None => UserAccess::admin(),
            };
            let albums = access.visible_albums(&catalog.list_all_albums());
            output::print_albums_output(&albums, user.as_deref());
        }
        Command::Album { album } => {
            let config = config::load_config(&cli.config)?;
            let catalog = Catalog::from_config(&config);
            let photos = catalog.list_photos(&album);
            print!(
                "{}",
                Renderer::from_config(&config).render_album_photos(&album, &photos)
            );
        }
        Command::Photo {
            album,
            photo,
            full_screen,
        } => {
            let config = config::load_config(&cli.config)?;
            let catalog = Catalog::from_config(&config);
            let photos = catalog.list_photos(&album);
            let html = Renderer::from_config(&config).render_photo(&PhotoPage {
                album: &album,
                photo: Some(photo.as_str()),
                photos: &photos,
                full_screen,
            })?;
            print!("{}", html);
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            run_check(&config);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}

/// Preload every album in parallel, then print the inventory.
fn run_check(config: &GalleryConfig) {
    let catalog = Catalog::from_config(config);
    let albums = catalog.list_all_albums();
    catalog.preload(&albums, &config.catalog);

    let inventory: Vec<(String, Vec<_>)> = albums
        .into_iter()
        .map(|album| {
            let photos = catalog.list_photos(&album).to_vec();
            (album, photos)
        })
        .collect();
    output::print_check_output(
        catalog.root(),
        &inventory,
        &config.extensions.video_set(),
    );
}

/// Log to stderr so rendered pages on stdout stay clean.
///
/// `RUST_LOG` overrides the default `albumview=info`.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("albumview=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
