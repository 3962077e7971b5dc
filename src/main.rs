use clap::{Parser, Subcommand};
use masterclass_core::app::{blank_fields, StudioEditor, Widget};
use masterclass_core::config::Config;
use masterclass_core::error::{ErrorKind, Result};
use masterclass_core::interface::HttpClient;
use masterclass_core::model::structs::StudentId;
use masterclass_core::runtime::XBlockRuntime;
use masterclass_core::NoWasmClient;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Talk to a masterclass registration block")]
struct Args {
    /// YAML config file
    #[arg(short, long, env = "MASTERCLASS_CONFIG")]
    config: Option<PathBuf>,

    /// Handler base URL, overrides the config file
    #[arg(long, env = "MASTERCLASS_HANDLER_BASE")]
    handler_base: Option<String>,

    #[arg(long, env = "MASTERCLASS_CSRF_TOKEN")]
    csrf_token: Option<String>,

    #[arg(long, env = "MASTERCLASS_SESSION_COOKIE")]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current registration status
    Status,
    /// Register, or unregister if already registered
    Register,
    /// Approve, unapprove or remove a registrant
    Approve { student_id: String },
    /// Mail every approved registrant
    Mail {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        text: String,
    },
    /// Download the registrant CSV
    Csv {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Save studio settings; every field must be given, e.g. `--set capacity=40`
    Save {
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got {s:?}"))
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match (&args.config, &args.handler_base) {
        (Some(path), _) => Config::load(path)?,
        (None, Some(base)) => Config::new(base.clone()),
        (None, None) => {
            return Err(ErrorKind::ParseError(
                "either --config or --handler-base is required".to_string(),
            )
            .into())
        }
    };
    if let Some(base) = &args.handler_base {
        config.handler_base = base.clone();
    }
    if args.csrf_token.is_some() {
        config.csrf_token = args.csrf_token.clone();
    }
    if args.session_cookie.is_some() {
        config.session_cookie = args.session_cookie.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let client = NoWasmClient::new(&config).await?;

    match args.command {
        Command::Status => {
            let widget = Widget::new(client, config.show_counter);
            widget.load().await?;
            print!("{}", widget.snapshot().await);
        }
        Command::Register => {
            let widget = Widget::new(client, config.show_counter);
            widget.load().await?;
            widget.click_register().await?;
            print!("{}", widget.snapshot().await);
        }
        Command::Approve { student_id } => {
            let widget = Widget::new(client, config.show_counter);
            let student_id = StudentId::from(student_id.as_str());
            widget.add_registrant(student_id.clone(), "").await;
            widget.click_approval(&student_id).await?;
            print!("{}", widget.snapshot().await);
        }
        Command::Mail { subject, text } => {
            let widget = Widget::new(client, config.show_counter);
            widget.toggle_mail_panel().await;
            widget.set_mail_subject(subject).await;
            widget.set_mail_text(text).await;
            widget.submit_mail().await?;
            println!("mail sent");
        }
        Command::Csv { out } => {
            let csv = client.fetch_csv().await?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, csv).await?;
                    log::info!("wrote {}", path.display());
                }
                None => print!("{csv}"),
            }
        }
        Command::Save { set } => {
            let runtime = XBlockRuntime::new();
            let mut editor =
                StudioEditor::new(client, runtime, blank_fields(), config.reload_after_save);
            for (name, value) in set {
                editor.set(&name, value)?;
            }
            editor.save().await?;
            println!("settings saved");
        }
    }

    Ok(())
}
