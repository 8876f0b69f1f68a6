//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Binaries collect the raw values with [`EnvValues::from_process_env`]
//! and resolve them with [`core_config_from_env_values`]; the `*_from_env_value` helpers keep
//! parsing testable without mutating process-wide environment variables.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_PRINT_DELAY_MS, PRINTS_DIR_NAME};
use crate::{NonEmptyText, PrescriptionError, PrescriptionResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// How the patient band renders the visit date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// `1/15/2024`
    #[default]
    MonthDayYear,
    /// `15/1/2024`
    DayMonthYear,
    /// `2024-01-15`
    Iso,
}

impl DateStyle {
    /// The `chrono` format string for this style.
    pub fn pattern(self) -> &'static str {
        match self {
            DateStyle::MonthDayYear => "%-m/%-d/%Y",
            DateStyle::DayMonthYear => "%-d/%-m/%Y",
            DateStyle::Iso => "%Y-%m-%d",
        }
    }
}

impl FromStr for DateStyle {
    type Err = PrescriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mdy" | "en-us" => Ok(DateStyle::MonthDayYear),
            "dmy" | "en-gb" | "bn-bd" => Ok(DateStyle::DayMonthYear),
            "iso" | "ymd" => Ok(DateStyle::Iso),
            other => Err(PrescriptionError::InvalidInput(format!(
                "unknown date style '{other}' (expected mdy, dmy or iso)"
            ))),
        }
    }
}

/// External program invoked to print a written document.
///
/// The document path is appended as the final argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintCommand {
    program: NonEmptyText,
    args: Vec<String>,
}

impl PrintCommand {
    pub fn new(program: NonEmptyText, args: Vec<String>) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &str {
        self.program.as_str()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    output_dir: PathBuf,
    print_delay: Duration,
    date_style: DateStyle,
    print_command: Option<PrintCommand>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// When `output_dir` is `None` printed documents go to `<data_dir>/prints`.
    pub fn new(
        data_dir: PathBuf,
        output_dir: Option<PathBuf>,
        print_delay: Duration,
        date_style: DateStyle,
        print_command: Option<PrintCommand>,
    ) -> PrescriptionResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(PrescriptionError::InvalidInput(
                "data_dir cannot be empty".into(),
            ));
        }

        let output_dir = output_dir.unwrap_or_else(|| data_dir.join(PRINTS_DIR_NAME));

        Ok(Self {
            data_dir,
            output_dir,
            print_delay,
            date_style,
            print_command,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn print_delay(&self) -> Duration {
        self.print_delay
    }

    pub fn date_style(&self) -> DateStyle {
        self.date_style
    }

    pub fn print_command(&self) -> Option<&PrintCommand> {
        self.print_command.as_ref()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the print delay (milliseconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default of 250ms.
pub fn print_delay_from_env_value(value: Option<String>) -> PrescriptionResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_millis(DEFAULT_PRINT_DELAY_MS));
    };

    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| PrescriptionError::InvalidInput(format!("invalid print delay '{value}': {e}")))
}

/// Parse the date style from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DateStyle::MonthDayYear`].
pub fn date_style_from_env_value(value: Option<String>) -> PrescriptionResult<DateStyle> {
    non_blank(value)
        .map(|v| v.parse::<DateStyle>())
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parse a whitespace-separated print command (`program arg1 arg2 ...`).
///
/// Returns `None` when no command is configured.
pub fn print_command_from_env_value(value: Option<String>) -> Option<PrintCommand> {
    let value = non_blank(value)?;
    let mut parts = value.split_whitespace().map(str::to_owned);
    let program = NonEmptyText::new(parts.next()?).ok()?;
    Some(PrintCommand::new(program, parts.collect()))
}

/// Raw configuration values, one per `RXPAD_*` environment variable.
#[derive(Clone, Debug, Default)]
pub struct EnvValues {
    pub data_dir: Option<String>,
    pub output_dir: Option<String>,
    pub print_delay_ms: Option<String>,
    pub date_style: Option<String>,
    pub print_command: Option<String>,
}

impl EnvValues {
    pub fn from_process_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            data_dir: var("RXPAD_DATA_DIR"),
            output_dir: var("RXPAD_OUTPUT_DIR"),
            print_delay_ms: var("RXPAD_PRINT_DELAY_MS"),
            date_style: var("RXPAD_DATE_STYLE"),
            print_command: var("RXPAD_PRINT_COMMAND"),
        }
    }
}

/// Resolve a [`CoreConfig`] from raw environment values, applying defaults for anything unset.
pub fn core_config_from_env_values(values: EnvValues) -> PrescriptionResult<CoreConfig> {
    let data_dir = non_blank(values.data_dir).unwrap_or_else(|| DEFAULT_DATA_DIR.into());
    CoreConfig::new(
        PathBuf::from(data_dir),
        non_blank(values.output_dir).map(PathBuf::from),
        print_delay_from_env_value(values.print_delay_ms)?,
        date_style_from_env_value(values.date_style)?,
        print_command_from_env_value(values.print_command),
    )
}
