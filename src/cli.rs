//! Command-line interface parsing for the ENEM question-bank browser
//!
//! This module handles parsing of CLI arguments using clap: the initial
//! year/discipline/language filters, the page size, and the --search flag
//! that starts the auto-paginating search instead of a single page fetch.

use clap::Parser;
use thiserror::Error;

use crate::api::QuestionsQuery;
use crate::data::{Discipline, Language};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified discipline is not recognized
    #[error("Invalid discipline: '{0}'. Valid areas: matematica, linguagens, humanas, natureza")]
    InvalidDiscipline(String),

    /// The specified language is not recognized
    #[error("Invalid language: '{0}'. Valid languages: ingles, espanhol")]
    InvalidLanguage(String),

    /// The specified year is not a four-digit year
    #[error("Invalid year: '{0}'. Expected a four-digit year such as 2023")]
    InvalidYear(String),
}

/// ENEM question bank browser - browse, filter and practice exam questions
#[derive(Parser, Debug)]
#[command(name = "enembank")]
#[command(about = "Browse and practice ENEM exam questions from the terminal")]
#[command(version)]
pub struct Cli {
    /// Exam year to browse (e.g. 2023)
    #[arg(long, value_name = "YEAR")]
    pub year: Option<String>,

    /// Subject area filter
    ///
    /// Valid areas: matematica, linguagens, humanas, natureza
    #[arg(long, value_name = "AREA")]
    pub discipline: Option<String>,

    /// Foreign-language filter for linguagens questions
    ///
    /// Valid languages: ingles, espanhol
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Questions per page, up to the provider maximum of 50
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,

    /// Auto-fetch pages until enough matching questions are collected
    #[arg(long)]
    pub search: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Initial query the first fetch uses
    pub query: QuestionsQuery,
    /// Whether to start with an auto-paginating search
    pub auto_search: bool,
}

/// Parses a discipline string argument into a Discipline enum.
pub fn parse_discipline_arg(s: &str) -> Result<Discipline, CliError> {
    Discipline::from_str(s).ok_or_else(|| CliError::InvalidDiscipline(s.to_string()))
}

/// Parses a language string argument into a Language enum.
pub fn parse_language_arg(s: &str) -> Result<Language, CliError> {
    Language::from_str(s).ok_or_else(|| CliError::InvalidLanguage(s.to_string()))
}

/// Validates a year argument (four ASCII digits).
pub fn parse_year_arg(s: &str) -> Result<String, CliError> {
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        Ok(s.to_string())
    } else {
        Err(CliError::InvalidYear(s.to_string()))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut query = QuestionsQuery::default();

        if let Some(year) = &cli.year {
            query.year = parse_year_arg(year)?;
        }
        if let Some(discipline) = &cli.discipline {
            query.discipline = Some(parse_discipline_arg(discipline)?);
        }
        if let Some(language) = &cli.language {
            query.language = Some(parse_language_arg(language)?);
        }
        if let Some(limit) = cli.limit {
            query.limit = limit;
        }

        Ok(StartupConfig {
            query,
            auto_search: cli.search,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discipline_arg_aliases() {
        assert_eq!(
            parse_discipline_arg("matematica").unwrap(),
            Discipline::Matematica
        );
        assert_eq!(parse_discipline_arg("mat").unwrap(), Discipline::Matematica);
        assert_eq!(
            parse_discipline_arg("linguagens").unwrap(),
            Discipline::Linguagens
        );
        assert_eq!(parse_discipline_arg("hum").unwrap(), Discipline::Humanas);
        assert_eq!(parse_discipline_arg("nat").unwrap(), Discipline::Natureza);
    }

    #[test]
    fn test_parse_discipline_arg_invalid() {
        let result = parse_discipline_arg("quimica");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid discipline"));
        assert!(err.to_string().contains("quimica"));
    }

    #[test]
    fn test_parse_language_arg() {
        assert_eq!(parse_language_arg("ingles").unwrap(), Language::Ingles);
        assert_eq!(parse_language_arg("espanhol").unwrap(), Language::Espanhol);
        assert!(parse_language_arg("frances").is_err());
    }

    #[test]
    fn test_parse_year_arg() {
        assert_eq!(parse_year_arg("2023").unwrap(), "2023");
        assert!(parse_year_arg("23").is_err());
        assert!(parse_year_arg("twenty").is_err());
        assert!(parse_year_arg("20233").is_err());
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.query.year, "2023");
        assert_eq!(config.query.limit, 10);
        assert!(!config.auto_search);
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["enembank"]);
        assert!(cli.year.is_none());
        assert!(cli.discipline.is_none());
        assert!(cli.language.is_none());
        assert!(cli.limit.is_none());
        assert!(!cli.search);
    }

    #[test]
    fn test_cli_parse_all_filters() {
        let cli = Cli::parse_from([
            "enembank",
            "--year",
            "2022",
            "--discipline",
            "matematica",
            "--language",
            "ingles",
            "--limit",
            "20",
            "--search",
        ]);
        assert_eq!(cli.year.as_deref(), Some("2022"));
        assert_eq!(cli.discipline.as_deref(), Some("matematica"));
        assert_eq!(cli.language.as_deref(), Some("ingles"));
        assert_eq!(cli.limit, Some(20));
        assert!(cli.search);
    }

    #[test]
    fn test_startup_config_from_cli_defaults() {
        let cli = Cli::parse_from(["enembank"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.query, QuestionsQuery::default());
        assert!(!config.auto_search);
    }

    #[test]
    fn test_startup_config_from_cli_full() {
        let cli = Cli::parse_from([
            "enembank",
            "--year",
            "2021",
            "--discipline",
            "nat",
            "--language",
            "espanhol",
            "--limit",
            "30",
            "--search",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.query.year, "2021");
        assert_eq!(config.query.discipline, Some(Discipline::Natureza));
        assert_eq!(config.query.language, Some(Language::Espanhol));
        assert_eq!(config.query.limit, 30);
        assert!(config.auto_search);
    }

    #[test]
    fn test_startup_config_from_cli_invalid_discipline() {
        let cli = Cli::parse_from(["enembank", "--discipline", "fisica"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_startup_config_from_cli_invalid_year() {
        let cli = Cli::parse_from(["enembank", "--year", "202"]);
        assert!(StartupConfig::from_cli(&cli).is_err());
    }

    #[test]
    fn test_startup_config_keeps_oversized_limit_for_clamping() {
        // The request layer clamps; the CLI passes the value through
        let cli = Cli::parse_from(["enembank", "--limit", "200"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.query.limit, 200);
        assert_eq!(config.query.effective_limit(), 50);
    }
}
