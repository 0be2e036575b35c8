//! Command-line front end for the registration form.

use std::path::{Path, PathBuf};

use member_db::Database;
use photo_engine::{FilterType, fit_crop_bytes};
use registration_form::{Field, FormData, FormState, RuleSet};

use crate::config::{AppConfig, SettingsManager};
use crate::services::build_registrar;
use crate::services::records::RecordStore;
use crate::services::registrar::{ALREADY_REGISTERED, SubmitError, SubmitOutcome};

pub const USAGE: &str = "\
Usage: member-registration <command>

Commands:
  submit <form.json> <photo>            Register a member from a JSON form and a photo
  exists <aadhaar>                      Check whether an Aadhaar number is registered
  crop <input> <output> [width height]  Fit a photo to the profile size
  list                                  Print stored registrations as JSON
  config list                           Print all settings as JSON (secrets masked)
  config get <key>                      Print one setting
  config set <key> <value>              Change a setting (applies from the next run)
  help                                  Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit { form: PathBuf, photo: PathBuf },
    Exists { aadhaar: String },
    Crop {
        input: PathBuf,
        output: PathBuf,
        size: Option<(u32, u32)>,
    },
    List,
    Config(ConfigCommand),
    Help,
}

/// Operator access to the stored settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    List,
    Get { key: String },
    Set { key: String, value: String },
}

impl Command {
    /// Parse arguments, excluding the program name.
    pub fn parse<I>(args: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        match (name.as_str(), rest) {
            ("submit", [form, photo]) => Ok(Command::Submit {
                form: form.into(),
                photo: photo.into(),
            }),
            ("exists", [aadhaar]) => Ok(Command::Exists {
                aadhaar: aadhaar.clone(),
            }),
            ("crop", [input, output]) => Ok(Command::Crop {
                input: input.into(),
                output: output.into(),
                size: None,
            }),
            ("crop", [input, output, w, h]) => Ok(Command::Crop {
                input: input.into(),
                output: output.into(),
                size: Some((parse_dimension(w)?, parse_dimension(h)?)),
            }),
            ("list", []) => Ok(Command::List),
            ("config", [sub]) if sub == "list" => Ok(Command::Config(ConfigCommand::List)),
            ("config", [sub, key]) if sub == "get" => {
                Ok(Command::Config(ConfigCommand::Get { key: key.clone() }))
            }
            ("config", [sub, key, value]) if sub == "set" => {
                Ok(Command::Config(ConfigCommand::Set {
                    key: key.clone(),
                    value: value.clone(),
                }))
            }
            ("help" | "-h" | "--help", _) => Ok(Command::Help),
            (other, _) => anyhow::bail!("invalid arguments for '{other}'\n\n{USAGE}"),
        }
    }

    /// Whether the command needs the database and settings.
    pub fn needs_foundation(&self) -> bool {
        !matches!(self, Command::Help)
    }
}

fn parse_dimension(raw: &str) -> Result<u32, anyhow::Error> {
    let value: u32 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("dimension must be a positive integer: {raw}"))?;
    if value == 0 {
        anyhow::bail!("dimension must be a positive integer: {raw}");
    }
    Ok(value)
}

/// Run a command against an initialized database and config.
pub async fn run(
    command: Command,
    db: Database,
    config: &AppConfig,
    data_dir: &Path,
) -> Result<(), anyhow::Error> {
    match command {
        Command::Submit { form, photo } => submit(&form, &photo, db, config, data_dir).await,
        Command::Exists { aadhaar } => {
            let registered = db.contains(Field::Aadhaar, &aadhaar).await?;
            println!("{}", if registered { "registered" } else { "not registered" });
            Ok(())
        }
        Command::Crop {
            input,
            output,
            size,
        } => {
            let (w, h) = size.unwrap_or((config.photo_width, config.photo_height));
            crop(&input, &output, w, h).await
        }
        Command::List => {
            let registrations = db.list_registrations()?;
            println!("{}", serde_json::to_string_pretty(&registrations)?);
            Ok(())
        }
        Command::Config(cmd) => {
            println!("{}", settings(&SettingsManager::new(db), cmd)?);
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

async fn submit(
    form_path: &Path,
    photo_path: &Path,
    db: Database,
    config: &AppConfig,
    data_dir: &Path,
) -> Result<(), anyhow::Error> {
    let raw = tokio::fs::read_to_string(form_path).await?;
    let data: FormData = serde_json::from_str(&raw)?;
    let rules = RuleSet::standard(config.identity_length()?)?;
    let mut form = FormState::with_data(rules, data);

    ensure_image(photo_path)?;
    let file_name = photo_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = tokio::fs::read(photo_path).await?;

    let registrar = build_registrar(db, config, data_dir)?;
    if registrar
        .select_photo(&mut form, &file_name, bytes)
        .await
        .is_err()
    {
        print_errors(&form);
        anyhow::bail!("photo could not be processed");
    }

    match registrar.submit(&mut form).await {
        Ok(SubmitOutcome::Registered { id, photo_url }) => {
            let out = serde_json::json!({ "id": id, "photoUrl": photo_url });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Ok(SubmitOutcome::AlreadyRegistered) => {
            println!("{ALREADY_REGISTERED}");
            Ok(())
        }
        Err(SubmitError::Validation(_)) => {
            print_errors(&form);
            anyhow::bail!("form is invalid");
        }
        Err(e) => {
            print_errors(&form);
            Err(e.into())
        }
    }
}

/// Reject files whose name does not look like an image.
fn ensure_image(path: &Path) -> Result<(), anyhow::Error> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_().as_str() != "image" {
        anyhow::bail!("not an image file: {} ({mime})", path.display());
    }
    Ok(())
}

/// Run a settings command and return what to print.
fn settings(sm: &SettingsManager, cmd: ConfigCommand) -> Result<String, anyhow::Error> {
    match cmd {
        ConfigCommand::List => {
            let mut all: Vec<_> = sm.get_all_settings()?.into_values().collect();
            all.sort_by(|a, b| a.key.cmp(&b.key));
            Ok(serde_json::to_string_pretty(&all)?)
        }
        ConfigCommand::Get { key } => {
            let info = sm
                .get_all_settings()?
                .remove(&key)
                .ok_or_else(|| anyhow::anyhow!("unknown setting key: {key}"))?;
            Ok(info.value)
        }
        ConfigCommand::Set { key, value } => {
            sm.set_setting(&key, &value)?;
            Ok(format!("{key} updated"))
        }
    }
}

fn print_errors(form: &FormState) {
    for (field, message) in form.errors() {
        eprintln!("{}: {message}", field.label());
    }
}

async fn crop(input: &Path, output: &Path, width: u32, height: u32) -> Result<(), anyhow::Error> {
    let bytes = tokio::fs::read(input).await?;
    let photo = tokio::task::spawn_blocking(move || {
        fit_crop_bytes(&bytes, width, height, FilterType::Lanczos3)
    })
    .await??;

    let expected = mime_guess::from_path(output).first_raw();
    if expected.is_some_and(|m| m != photo.format.mime_type()) {
        tracing::warn!(
            "Output name suggests {}, but the photo is written as {}",
            expected.unwrap_or_default(),
            photo.format.mime_type()
        );
    }

    tokio::fs::write(output, &photo.bytes).await?;
    tracing::info!(
        width = photo.width,
        height = photo.height,
        "Cropped photo written to {}",
        output.display()
    );
    Ok(())
}
