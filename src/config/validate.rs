// src/config/validate.rs

use std::time::Duration;

use encoding_rs::Encoding;

use crate::config::model::{ConfigFile, GitSettings, RawConfigFile, RawGitSection};
use crate::errors::{Result, StashwatchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StashwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_repositories(&raw)?;
        let git = validate_git(raw.git)?;
        Ok(ConfigFile {
            repositories: raw.repositories,
            git,
            debug: raw.debug,
        })
    }
}

fn validate_repositories(cfg: &RawConfigFile) -> Result<()> {
    if let Some(empty) = cfg.repositories.iter().position(|p| p.as_os_str().is_empty()) {
        return Err(StashwatchError::ConfigError(format!(
            "repositories[{empty}] is an empty path"
        )));
    }
    Ok(())
}

fn validate_git(raw: RawGitSection) -> Result<GitSettings> {
    let binary = raw.binary.trim().to_string();
    if binary.is_empty() {
        return Err(StashwatchError::ConfigError(
            "[git].binary must not be empty".to_string(),
        ));
    }

    let timeout = match raw.timeout.as_deref() {
        Some(s) => {
            let timeout = parse_duration(s).map_err(|e| {
                StashwatchError::ConfigError(format!("[git].timeout = {s:?}: {e}"))
            })?;
            if timeout.is_zero() {
                return Err(StashwatchError::ConfigError(
                    "[git].timeout must be greater than zero".to_string(),
                ));
            }
            Some(timeout)
        }
        None => None,
    };

    if let Some(label) = raw.encoding.as_deref() {
        if Encoding::for_label(label.trim().as_bytes()).is_none() {
            return Err(StashwatchError::ConfigError(format!(
                "[git].encoding: unknown encoding label {label:?}"
            )));
        }
    }

    Ok(GitSettings {
        binary,
        timeout,
        encoding: raw.encoding.map(|label| label.trim().to_string()),
    })
}

/// Parse a duration like `"500ms"`, `"30s"`, `"2m"` or `"1h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::DebugSection;

    fn raw_git(binary: &str, timeout: Option<&str>, encoding: Option<&str>) -> RawConfigFile {
        RawConfigFile {
            repositories: vec![".".into()],
            git: RawGitSection {
                binary: binary.to_string(),
                timeout: timeout.map(str::to_string),
                encoding: encoding.map(str::to_string),
            },
            debug: DebugSection::default(),
        }
    }

    #[test]
    fn durations_with_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration(" 30s "), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1H"), Ok(Duration::from_secs(3600)));
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("3d").is_err());
    }

    #[test]
    fn oversized_durations_are_errors() {
        let err = parse_duration("18446744073709551615h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("18446744073709551615m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
        assert!(ConfigFile::try_from(raw_git("git", Some("18446744073709551615h"), None)).is_err());
    }

    #[test]
    fn valid_git_section_is_carried_over() {
        let cfg = ConfigFile::try_from(raw_git(" /usr/bin/git ", Some("5s"), Some("latin1")))
            .expect("valid config");
        assert_eq!(cfg.git.binary, "/usr/bin/git");
        assert_eq!(cfg.git.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.git.encoding.as_deref(), Some("latin1"));
    }

    #[test]
    fn rejects_empty_binary() {
        let err = ConfigFile::try_from(raw_git("  ", None, None)).unwrap_err();
        assert!(matches!(err, StashwatchError::ConfigError(msg) if msg.contains("binary")));
    }

    #[test]
    fn rejects_zero_or_malformed_timeout() {
        assert!(ConfigFile::try_from(raw_git("git", Some("0s"), None)).is_err());
        assert!(ConfigFile::try_from(raw_git("git", Some("soon"), None)).is_err());
    }

    #[test]
    fn rejects_unknown_encoding() {
        let err = ConfigFile::try_from(raw_git("git", None, Some("klingon-8"))).unwrap_err();
        assert!(err.to_string().contains("klingon-8"));
    }

    #[test]
    fn rejects_empty_repository_path() {
        let mut raw = raw_git("git", None, None);
        raw.repositories.push("".into());
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
