//! Command-line parsing
//!
//! ```text
//! levelgate [path] <pathId>
//! levelgate level <pathId> <levelId> [exerciseId]
//! levelgate payment <paymentId>
//! levelgate logout
//! ```
//!
//! With no arguments the path id is taken from `LEVELGATE_PATH_ID`.

use anyhow::{anyhow, bail, Result};

use levelgate_domain::{ExerciseId, LevelId, PathId, PaymentId};

pub const PATH_ID_ENV: &str = "LEVELGATE_PATH_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Path(PathId),
    Level {
        path_id: PathId,
        level_id: LevelId,
        exercise_id: Option<ExerciseId>,
    },
    Payment(PaymentId),
    Logout,
}

impl Command {
    pub fn parse(args: &[String], default_path: Option<String>) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match args.as_slice() {
            [] => default_path
                .filter(|p| !p.trim().is_empty())
                .map(|p| Command::Path(PathId::new(p)))
                .ok_or_else(|| anyhow!("no path id given and {} is not set", PATH_ID_ENV)),
            ["path", path_id] => Ok(Command::Path(PathId::new(*path_id))),
            ["level", path_id, level_id] => Ok(Command::Level {
                path_id: PathId::new(*path_id),
                level_id: LevelId::new(*level_id),
                exercise_id: None,
            }),
            ["level", path_id, level_id, exercise_id] => Ok(Command::Level {
                path_id: PathId::new(*path_id),
                level_id: LevelId::new(*level_id),
                exercise_id: Some(ExerciseId::new(*exercise_id)),
            }),
            ["payment", payment_id] => Ok(Command::Payment(PaymentId::new(*payment_id))),
            ["logout"] => Ok(Command::Logout),
            [path_id] if !matches!(*path_id, "path" | "level" | "payment") => {
                Ok(Command::Path(PathId::new(*path_id)))
            }
            other => bail!("unrecognized arguments: {}", other.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bare_path_id() {
        assert_eq!(
            Command::parse(&args(&["p1"]), None).unwrap(),
            Command::Path(PathId::new("p1"))
        );
    }

    #[test]
    fn test_path_from_environment() {
        assert_eq!(
            Command::parse(&[], Some("p9".into())).unwrap(),
            Command::Path(PathId::new("p9"))
        );
        assert!(Command::parse(&[], None).is_err());
        assert!(Command::parse(&[], Some("  ".into())).is_err());
    }

    #[test]
    fn test_level_with_exercise() {
        assert_eq!(
            Command::parse(&args(&["level", "p1", "l1", "e1"]), None).unwrap(),
            Command::Level {
                path_id: PathId::new("p1"),
                level_id: LevelId::new("l1"),
                exercise_id: Some(ExerciseId::new("e1")),
            }
        );
    }

    #[test]
    fn test_payment_and_logout() {
        assert_eq!(
            Command::parse(&args(&["payment", "pay_1"]), None).unwrap(),
            Command::Payment(PaymentId::new("pay_1"))
        );
        assert_eq!(Command::parse(&args(&["logout"]), None).unwrap(), Command::Logout);
    }

    #[test]
    fn test_incomplete_subcommand_is_rejected() {
        assert!(Command::parse(&args(&["level", "p1"]), None).is_err());
        assert!(Command::parse(&args(&["payment"]), None).is_err());
    }
}
