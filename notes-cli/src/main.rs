use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use notes_client::text_codec::{self, PREVIEW_CHARS};
use notes_client::{AppContext, AppError, CookieFileStore, HttpClient, Note, NotesView, User};
use tracing::debug;

mod logging;
mod settings;

use logging::init_logging;
use settings::Settings;

type NotesContext = AppContext<HttpClient, CookieFileStore>;

#[derive(Debug, Parser)]
#[command(name = "notes-cli", version, about = "CLI клиент для сервиса заметок")]
struct Cli {
    /// Адрес API (по умолчанию NOTES_API_URL или http://localhost:8000).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать результат в JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя (без входа).
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Вход: сохраняет токен и показывает пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Текущий пользователь.
    Me,
    /// Список заметок.
    List {
        /// Заметки всех пользователей (только для администратора).
        #[arg(long)]
        all: bool,
    },
    /// Заметка по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание заметки.
    Create {
        #[command(flatten)]
        input: NoteInput,
    },
    /// Обновление заметки.
    ///
    /// Не указанные заголовок или текст берутся из текущей заметки.
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        input: NoteInput,
    },
    /// Удаление заметки.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct NoteInput {
    /// Заголовок.
    #[arg(long, conflicts_with_all = ["raw", "file"])]
    title: Option<String>,
    /// Текст заметки.
    #[arg(long, conflicts_with_all = ["raw", "file"])]
    text: Option<String>,
    /// Свободный текст: первая строка станет заголовком.
    #[arg(long, conflicts_with = "file")]
    raw: Option<String>,
    /// Файл со свободным текстом.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct NoteFields {
    title: Option<String>,
    text: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let server = normalize_server(cli.server.unwrap_or_else(|| settings.api_url.clone()));
    debug!(server = server.as_str(), "using notes API");

    let api = HttpClient::with_timeouts(
        server.as_str(),
        settings.connect_timeout,
        settings.request_timeout,
    )
    .context("не удалось создать HTTP клиент")?;
    let store = CookieFileStore::new(&settings.token_file, server.starts_with("https://"));
    let mut ctx = AppContext::new(api, store);
    let json = cli.json;

    match cli.command {
        Command::Register { username, password } => {
            ctx.register(&username, &password)
                .await
                .map_err(map_app_error)?;
            println!("Регистрация успешна, теперь выполните `notes-cli login`");
        }
        Command::Login { username, password } => {
            ctx.login(&username, &password)
                .await
                .map_err(map_app_error)?;
            match ctx.auth().user() {
                Some(user) => print_user("Вход выполнен", user, json)?,
                None => println!("Вход выполнен"),
            }
        }
        Command::Logout => {
            ctx.logout().map_err(map_app_error)?;
            println!("Выход выполнен");
        }
        Command::Me => {
            restore_session(&mut ctx).await?;
            let user = ctx.auth().user().ok_or_else(not_logged_in)?;
            print_user("Пользователь", user, json)?;
        }
        Command::List { all } => {
            restore_session(&mut ctx).await?;
            let requested = if all { NotesView::All } else { NotesView::Mine };
            let view = ctx.list_notes(requested).await.map_err(map_app_error)?;
            if requested != view {
                eprintln!("Все заметки доступны только администратору, показаны ваши");
            }
            print_list(ctx.notes().items(), view, json)?;
        }
        Command::Get { id } => {
            restore_session(&mut ctx).await?;
            ctx.open_note(id).await.map_err(map_app_error)?;
            let note = ctx.notes().selected_note().ok_or_else(not_found)?;
            print_note(note, json)?;
        }
        Command::Create { input } => {
            restore_session(&mut ctx).await?;
            let fields = read_note_input(input)?;
            let title = fields
                .title
                .ok_or_else(|| anyhow!("укажите --title или --raw/--file"))?;
            let text = fields.text.unwrap_or_default();

            ctx.create_note(&title, &text)
                .await
                .map_err(map_app_error)?;
            let note = ctx.notes().items().last().ok_or_else(not_found)?;
            print_note(note, json)?;
        }
        Command::Update { id, input } => {
            restore_session(&mut ctx).await?;
            let fields = read_note_input(input)?;

            // Недостающие поля берём из текущей версии заметки.
            let (title, text) = match fields {
                NoteFields {
                    title: Some(title),
                    text: Some(text),
                } => (title, text),
                NoteFields { title, text } => {
                    ctx.open_note(id).await.map_err(map_app_error)?;
                    let current = ctx.notes().selected_note().ok_or_else(not_found)?;
                    (
                        title.unwrap_or_else(|| current.title.clone()),
                        text.unwrap_or_else(|| current.text.clone()),
                    )
                }
            };

            ctx.update_note(id, &title, &text)
                .await
                .map_err(map_app_error)?;
            match ctx.notes().selected_note() {
                Some(note) if note.id == id => print_note(note, json)?,
                _ => println!("Заметка обновлена: id={id}"),
            }
        }
        Command::Delete { id } => {
            restore_session(&mut ctx).await?;
            ctx.delete_note(id).await.map_err(map_app_error)?;
            println!("Заметка удалена: id={id}");
        }
    }

    Ok(())
}

async fn restore_session(ctx: &mut NotesContext) -> Result<()> {
    ctx.bootstrap().await.map_err(map_app_error)?;
    if !ctx.auth().is_authenticated() {
        return Err(not_logged_in());
    }
    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn read_note_input(input: NoteInput) -> Result<NoteFields> {
    let raw = match (input.raw, input.file) {
        (Some(raw), _) => Some(raw),
        (None, Some(path)) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("не удалось прочитать {}", path.display()))?,
        ),
        (None, None) => None,
    };

    Ok(note_fields(raw, input.title, input.text))
}

fn note_fields(raw: Option<String>, title: Option<String>, text: Option<String>) -> NoteFields {
    match raw {
        Some(raw) => {
            let parts = text_codec::split(&raw);
            NoteFields {
                title: Some(parts.title),
                text: Some(parts.body),
            }
        }
        None => NoteFields { title, text },
    }
}

fn not_logged_in() -> anyhow::Error {
    anyhow!("требуется авторизация: выполните `notes-cli login ...`")
}

fn not_found() -> anyhow::Error {
    anyhow!("заметка не найдена")
}

fn map_app_error(err: AppError) -> anyhow::Error {
    match err {
        AppError::NotAuthenticated => not_logged_in(),
        AppError::Session(err) => anyhow!("не удалось сохранить сессию: {err}"),
        other => anyhow!("{other}"),
    }
}

fn print_user(title: &str, user: &User, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
        return Ok(());
    }

    println!("{title}");
    println!("id: {}", user.id);
    println!("username: {}", user.username);
    if user.is_admin() {
        println!("role: admin");
    }
    Ok(())
}

fn print_note(note: &Note, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
        return Ok(());
    }

    println!("[{}] (user_id={})", note.id, note.user_id);
    println!("{}", text_codec::compose(&note.title, &note.text));
    Ok(())
}

fn print_list(notes: &[Note], view: NotesView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(notes)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("Заметок пока нет. Создайте первую.");
        return Ok(());
    }

    println!("Заметок: {}", notes.len());
    for note in notes {
        println!("{}", list_line(note, view));
    }
    Ok(())
}

fn list_line(note: &Note, view: NotesView) -> String {
    let preview = text_codec::preview(&note.text, PREVIEW_CHARS).replace('\n', " ");
    match (view, note.username.as_deref()) {
        (NotesView::All, Some(author)) => {
            format!("- [{}] {} ({author}): {preview}", note.id, note.title)
        }
        (NotesView::All, None) => {
            format!("- [{}] {} (user_id={}): {preview}", note.id, note.title, note.user_id)
        }
        (NotesView::Mine, _) => format!("- [{}] {}: {preview}", note.id, note.title),
    }
}
