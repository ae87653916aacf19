//! Command line arguments

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Print instead of posting to the webhook
    pub dry_run: bool,
    /// Read source payloads from `<dir>/<source>.json`
    pub fixtures: Option<PathBuf>,
    /// Append notifications to `<dir>/notifications.jsonl`
    pub out: Option<PathBuf>,
    /// Evaluate as of this RFC 3339 instant instead of now
    pub at: Option<String>,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, skipping the program name
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => cli.help = true,
                "--dry-run" => cli.dry_run = true,
                "--fixtures" => cli.fixtures = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--out" => cli.out = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--at" => cli.at = Some(value(&mut args, &arg)?),
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(cli)
    }
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

pub fn usage() -> &'static str {
    r#"wxtreme - weather extreme notifier

USAGE:
    wxtreme [OPTIONS]

OPTIONS:
    --dry-run           Print the notification instead of posting it
    --fixtures <DIR>    Read source payloads from DIR instead of the network
    --out <DIR>         Append notifications to DIR/notifications.jsonl
    --at <TIME>         Evaluate as of an RFC 3339 time
    -h, --help          Print this help

ENVIRONMENT (also read from ./.env):
    WXTREME_CONFIG      Path to TOML configuration (default: wxtreme.toml)
    STATION_URL_TEMP, STATION_URL_RAIN, STATION_URL_HUMIDITY,
    STATION_URL_WIND, PREDICTION_URL, DISCORD_WEBHOOK, TAG_ID
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        CliArgs::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_flags_and_values() {
        let cli = parse(&["--dry-run", "--fixtures", "fx", "--at", "2024-06-15T13:00:00Z"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.fixtures, Some(PathBuf::from("fx")));
        assert_eq!(cli.at.as_deref(), Some("2024-06-15T13:00:00Z"));
        assert!(cli.out.is_none());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert_eq!(parse(&["--out"]).unwrap_err(), "--out requires a value");
        assert!(parse(&["--verbose"]).is_err());
    }
}
