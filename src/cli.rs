use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;

use crate::client::ApiClient;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::error::ApiResult;
use crate::humanize::time_ago;
use crate::models::{Album, Photo};
use crate::services::auth;
use crate::services::photos::UploadFile;
use crate::views::album_manager::AlbumManagerView;
use crate::views::dashboard::{icon_name, DashboardView, COLOR_OPTIONS};
use crate::views::gallery::{AlbumViewer, GalleryView};
use crate::views::guard::{GuardState, SessionGuard};
use crate::views::login::LoginView;
use crate::views::{Toast, ToastKind};

#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"), version, about)]
pub struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log every request.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LANTERN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LANTERN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session token.
    Logout,
    /// List the public albums.
    Gallery,
    /// Show the public photos of an album.
    View { album_id: i64 },
    /// List all albums.
    Albums,
    Stats,
    Create {
        title: String,
        #[arg(long, value_parser = PossibleValuesParser::new(COLOR_OPTIONS))]
        color: Option<String>,
    },
    Publish { album_id: i64 },
    Hide { album_id: i64 },
    DeleteAlbum {
        album_id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Upload files into an album, one after another.
    Upload {
        album_id: i64,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the photos of an album.
    Photos {
        album_id: i64,
        #[arg(long)]
        search: Option<String>,
    },
    DeletePhotos {
        album_id: i64,
        #[arg(required = true)]
        photo_ids: Vec<i64>,
        #[arg(long)]
        yes: bool,
    },
    TogglePhoto { album_id: i64, photo_id: i64 },
    Caption {
        album_id: i64,
        photo_id: i64,
        text: String,
    },
}

impl Command {
    fn is_protected(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. }
                | Command::Register { .. }
                | Command::Logout
                | Command::Gallery
                | Command::View { .. }
        )
    }
}

pub async fn run(command: Command, client: &ApiClient) -> ApiResult<ExitCode> {
    if command.is_protected() {
        let mut guard = SessionGuard::new();
        if let GuardState::Redirect(route) = guard.check(client.session()) {
            eprintln!(
                "{}",
                format!("Not signed in ({route}). Run `lantern login` first.").red()
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    match command {
        Command::Login { email, password } => {
            let mut view = LoginView::new(email, password);
            match view.submit(client).await {
                Some(_) => Ok(report(&Toast::success("Signed in."))),
                None => Ok(report(&Toast::error(view.error.unwrap_or_default()))),
            }
        }
        Command::Register { email, password } => {
            match auth::register(client, &email, &password).await {
                Ok(()) => Ok(report(&Toast::success(
                    "Account created. You can sign in now.",
                ))),
                Err(err) => Ok(report(&Toast::error(err.message()))),
            }
        }
        Command::Logout => {
            client.session().clear()?;
            Ok(report(&Toast::success("Signed out.")))
        }
        Command::Gallery => {
            let mut view = GalleryView::default();
            view.load(client).await;
            if let Some(error) = view.error {
                return Ok(report(&Toast::error(error)));
            }
            for album in &view.albums {
                print_album(album);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::View { album_id } => {
            let mut viewer = AlbumViewer::new(album_id);
            viewer.load(client).await;
            if let Some(error) = viewer.error {
                return Ok(report(&Toast::error(error)));
            }
            println!("{}", viewer.title.as_str().bold());
            for photo in &viewer.photos {
                print_photo(photo);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Albums => {
            let view = load_dashboard(client).await;
            for album in &view.albums {
                print_album(album);
            }
            Ok(toast_or_success(&view.toast))
        }
        Command::Stats => {
            let view = load_dashboard(client).await;
            let stats = view.stats();
            println!(
                "Albums:  {} ({} public, {} private)",
                stats.total_albums, stats.public_albums, stats.private_albums
            );
            println!("Photos:  {}", stats.total_photos);
            println!("Views:   {}", stats.total_views);
            println!("Likes:   {}", stats.total_likes);
            Ok(toast_or_success(&view.toast))
        }
        Command::Create { title, color } => {
            let mut view = DashboardView::new();
            view.new_album_title = title;
            if let Some(color) = color {
                view.selected_color = color;
            }
            view.create_album(client).await;
            match &view.toast {
                Some(toast) => Ok(report(toast)),
                None => Ok(report(&Toast::error("An album needs a title."))),
            }
        }
        Command::Publish { album_id } => set_album_visibility(client, album_id, true).await,
        Command::Hide { album_id } => set_album_visibility(client, album_id, false).await,
        Command::DeleteAlbum { album_id, yes } => {
            if !yes && !confirm(&format!("Delete album #{album_id} and its photos?"))? {
                return Ok(ExitCode::SUCCESS);
            }
            let mut view = DashboardView::new();
            view.delete_album(client, album_id).await;
            Ok(toast_or_success(&view.toast))
        }
        Command::Upload { album_id, files } => {
            let mut view = DashboardView::new();
            view.upload_album_id = Some(album_id);
            for path in &files {
                view.selected_files.push(UploadFile::from_path(path).await?);
            }
            view.upload_photos(client).await;
            Ok(toast_or_success(&view.toast))
        }
        Command::Photos { album_id, search } => {
            let mut view = AlbumManagerView::new(album_id);
            view.load(client).await;
            if let Some(error) = view.error {
                return Ok(report(&Toast::error(error)));
            }
            view.search_term = search.unwrap_or_default();
            println!("{}", view.album_title.as_str().bold());
            for photo in view.filtered_photos() {
                print_photo(photo);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::DeletePhotos {
            album_id,
            photo_ids,
            yes,
        } => {
            if !yes && !confirm(&format!("Delete {} photo(s)?", photo_ids.len()))? {
                return Ok(ExitCode::SUCCESS);
            }
            let mut view = AlbumManagerView::new(album_id);
            view.load_photos(client).await;
            for photo_id in &photo_ids {
                if !view.is_selected(*photo_id) {
                    view.toggle_selection(*photo_id);
                }
            }
            let removed = view.delete_selected(client).await;
            let toast = if removed == photo_ids.len() {
                Toast::success(format!("Deleted {removed} photo(s)."))
            } else {
                Toast::error(format!("Deleted {removed} of {} photo(s).", photo_ids.len()))
            };
            Ok(report(&toast))
        }
        Command::TogglePhoto { album_id, photo_id } => {
            let mut view = AlbumManagerView::new(album_id);
            view.load_photos(client).await;
            let before = view.photo(photo_id).map(|photo| photo.is_public);
            view.toggle_photo_privacy(client, photo_id).await;
            let after = view.photo(photo_id).map(|photo| photo.is_public);
            match after {
                Some(is_public) if before != after => Ok(report(&Toast::success(format!(
                    "Photo #{photo_id} is now {}.",
                    visibility(is_public)
                )))),
                _ => Ok(report(&Toast::error(format!(
                    "Could not change photo #{photo_id}."
                )))),
            }
        }
        Command::Caption {
            album_id,
            photo_id,
            text,
        } => {
            let mut view = AlbumManagerView::new(album_id);
            view.load_photos(client).await;
            view.set_caption(client, photo_id, &text).await;
            match view.photo(photo_id) {
                Some(photo) if photo.caption() == text => {
                    Ok(report(&Toast::success("Caption updated.")))
                }
                _ => Ok(report(&Toast::error(format!(
                    "Could not change photo #{photo_id}."
                )))),
            }
        }
    }
}

async fn load_dashboard(client: &ApiClient) -> DashboardView {
    let mut view = DashboardView::new();
    view.fetch_albums(client).await;
    view
}

async fn set_album_visibility(
    client: &ApiClient,
    album_id: i64,
    public: bool,
) -> ApiResult<ExitCode> {
    let mut view = load_dashboard(client).await;
    if let Some(toast) = &view.toast {
        return Ok(report(toast));
    }
    let Some(album) = view.album(album_id) else {
        return Ok(report(&Toast::error(format!("Album #{album_id} not found."))));
    };
    if album.is_public != public {
        view.toggle_album_privacy(client, album_id).await;
    }
    match view.album(album_id) {
        Some(album) if album.is_public == public => Ok(report(&Toast::success(format!(
            "Album #{album_id} is {}.",
            visibility(public)
        )))),
        _ => Ok(report(&Toast::error(format!(
            "Could not change album #{album_id}."
        )))),
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report(toast: &Toast) -> ExitCode {
    match toast.kind {
        ToastKind::Success => {
            println!("{}", toast.message.as_str().green());
            ExitCode::SUCCESS
        }
        ToastKind::Error => {
            eprintln!("{}", toast.message.as_str().red());
            ExitCode::FAILURE
        }
    }
}

fn toast_or_success(toast: &Option<Toast>) -> ExitCode {
    toast.as_ref().map(report).unwrap_or(ExitCode::SUCCESS)
}

fn visibility(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "private"
    }
}

fn print_album(album: &Album) {
    println!(
        "#{:<4} {} [{}] {} · {} photo(s), {} view(s), updated {}",
        album.id,
        album.title.as_str().bold(),
        icon_name(album.icon.as_deref()),
        visibility(album.is_public),
        album.photo_count(),
        album.views,
        time_ago(Some(album.last_activity()), Utc::now())
    );
}

fn print_photo(photo: &Photo) {
    let caption = match photo.caption() {
        "" => "(no caption)",
        caption => caption,
    };
    println!(
        "#{:<4} {} {} · {} like(s), uploaded {} · {}",
        photo.id,
        caption,
        visibility(photo.is_public),
        photo.likes,
        photo.upload_date.format("%Y-%m-%d"),
        photo.src
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_delete_photos() {
        let cli =
            Cli::try_parse_from(["lantern", "delete-photos", "7", "1", "2", "--yes"]).unwrap();
        match cli.command {
            Command::DeletePhotos {
                album_id,
                photo_ids,
                yes,
            } => {
                assert_eq!(album_id, 7);
                assert_eq!(photo_ids, vec![1, 2]);
                assert!(yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("lantern.config"));
    }

    #[test]
    fn test_rejects_unknown_color() {
        assert!(Cli::try_parse_from(["lantern", "create", "Trips", "--color", "plaid"]).is_err());
        let color = COLOR_OPTIONS[2];
        assert!(Cli::try_parse_from(["lantern", "create", "Trips", "--color", color]).is_ok());
    }

    #[test]
    fn test_protected_commands() {
        assert!(Command::Albums.is_protected());
        assert!(Command::Upload {
            album_id: 1,
            files: vec![]
        }
        .is_protected());
        assert!(!Command::Gallery.is_protected());
        assert!(!Command::Logout.is_protected());
    }

    #[tokio::test]
    async fn test_protected_command_without_session_makes_no_request() {
        let backend = crate::test_utils::MockBackend::start().await;
        let client = backend.client(crate::session::Session::in_memory());

        let code = run(Command::Albums, &client).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_album_fails() {
        let backend = crate::test_utils::MockBackend::start().await;
        let client = backend.client(crate::session::Session::in_memory());
        let code = run(Command::View { album_id: 404 }, &client).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        let (_backend, client) = crate::test_utils::signed_in("abc").await;
        let command = Command::Photos {
            album_id: 404,
            search: None,
        };
        assert_eq!(run(command, &client).await.unwrap(), ExitCode::FAILURE);
    }
}
