use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rxpad_core::form::today;
use rxpad_core::{
    core_config_from_env_values, CoreConfig, DispatchOutcome, DocumentComposer, EnvValues,
    FileSlot, FileSurface, FormField, FormState, PrintDispatcher, ProfileField, Session,
    SettingsStore,
};

#[derive(Parser)]
#[command(name = "rxpad")]
#[command(about = "Prescription pad: doctor settings, patient form and print documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the stored doctor settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Form utilities
    Form {
        #[command(subcommand)]
        action: FormAction,
    },
    /// Compose the print document
    Compose {
        #[command(flatten)]
        input: FormInput,
        /// Write the document here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compose the print document and send it to the print surface
    Print {
        #[command(flatten)]
        input: FormInput,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the settings as JSON
    Show,
    /// Set one field, e.g. `set degreesEn "MBBS\nFCPS"` (line-list fields take one entry per line)
    Set {
        /// Field key (nameEn, nameBn, degreesEn, degreesBn, regNoEn, regNoBn, footerText, showSignature)
        field: ProfileField,
        value: String,
    },
    /// Restore the default settings
    Reset,
}

#[derive(Subcommand)]
enum FormAction {
    /// Print a blank form, dated today, as JSON
    Template,
}

#[derive(clap::Args)]
struct FormInput {
    /// JSON form file (see `rxpad form template`)
    #[arg(long)]
    form: Option<PathBuf>,
    /// Field edits applied on top of the form, e.g. `--set patient.name="Jane Doe"`
    #[arg(long = "set", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    key.parse::<FormField>().map_err(|e| e.to_string())?;
    Ok((key.to_owned(), value.replace("\\n", "\n")))
}

/// Read the form from `input`, blank (dated today) when no file is given, then apply the edits.
fn build_form(input: &FormInput) -> anyhow::Result<FormState> {
    let mut form = match &input.form {
        Some(path) => read_form(path)?,
        None => FormState::new(today()),
    };
    form.apply(input.set.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    Ok(form)
}

fn read_form(path: &Path) -> anyhow::Result<FormState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read form file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse form file {}", path.display()))
}

fn open_session(cfg: &CoreConfig, form: FormState) -> Session<FileSlot> {
    let store = SettingsStore::new(FileSlot::new(cfg.data_dir()));
    let mut session = Session::open(store, DocumentComposer::new(cfg.date_style()), today());
    session.replace_form(form);
    session
}

fn run_settings(cfg: &CoreConfig, action: SettingsAction) -> anyhow::Result<()> {
    let store = SettingsStore::new(FileSlot::new(cfg.data_dir()));
    match action {
        SettingsAction::Show => {
            let profile = store.load_or_default();
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        SettingsAction::Set { field, value } => {
            let mut profile = store.load_or_default();
            let value = value.replace("\\n", "\n");
            store.update(&mut profile, |p| p.apply_edit(field, &value))?;
            println!("Updated {}: {}", field, profile.edit_value(field));
        }
        SettingsAction::Reset => {
            store.reset()?;
            println!("Settings restored to defaults.");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxpad_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = core_config_from_env_values(EnvValues::from_process_env())?;

    match cli.command {
        Some(Commands::Settings { action }) => run_settings(&cfg, action)?,
        Some(Commands::Form {
            action: FormAction::Template,
        }) => {
            println!("{}", serde_json::to_string_pretty(&FormState::new(today()))?);
        }
        Some(Commands::Compose { input, out }) => {
            let session = open_session(&cfg, build_form(&input)?);
            let document = session.compose();
            match out {
                Some(path) => {
                    fs::write(&path, document)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        Some(Commands::Print { input }) => {
            let session = open_session(&cfg, build_form(&input)?);
            let surface = FileSurface::new(
                cfg.output_dir().to_path_buf(),
                cfg.print_command().cloned(),
            );
            let dispatcher = PrintDispatcher::new(surface, cfg.print_delay());
            match session.print(&dispatcher) {
                DispatchOutcome::Scheduled(handle) => {
                    let location = handle.location().to_owned();
                    handle.wait()?;
                    println!("Printed {location}");
                }
                DispatchOutcome::Blocked => {
                    eprintln!(
                        "Print surface unavailable ({}); nothing was printed.",
                        cfg.output_dir().display()
                    );
                }
            }
        }
        None => {
            println!("Use 'rxpad --help' for commands");
        }
    }

    Ok(())
}
