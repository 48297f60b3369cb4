use crate::xfade::{Controls, Variant};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub in_a: [String; 2],
    pub in_b: [String; 2],
    pub out: [String; 2],
    // (source, destination) port pairs connected after activation
    pub connect: Vec<(String, String)>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub variant: Variant,
    pub client: Client,
    pub controls: Controls,
}

#[derive(Error, Debug)]
pub struct ParseError {
    pub filename: String,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse {}: {}", self.filename, self.message)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ParseError(ParseError),

    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),

    #[error(transparent)]
    IOError(#[from] io::Error),
}

pub static FILENAME: &str = "xfade.toml";

impl Default for Client {
    fn default() -> Client {
        Client {
            name: String::from("xfade"),
            in_a: [String::from("in_a_left"), String::from("in_a_right")],
            in_b: [String::from("in_b_left"), String::from("in_b_right")],
            out: [String::from("out_left"), String::from("out_right")],
            connect: vec![],
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            variant: Variant::Extended,
            client: Client::default(),
            controls: Controls::default(),
        }
    }
}

/// `xfade.toml` in the platform config directory, or in the working directory
/// if there is no home to put it in.
pub fn default_path() -> PathBuf {
    match directories::ProjectDirs::from("", "", "xfade") {
        Some(dirs) => dirs.config_dir().join(FILENAME),
        None => PathBuf::from(FILENAME),
    }
}

impl Config {
    pub fn parse(filename: &str, contents: &str) -> Result<Config, Error> {
        match toml::from_str(contents) {
            Ok(config) => Ok(config),
            Err(error) if error.line_col().is_some() => Err(Error::ParseError(ParseError {
                filename: String::from(filename),
                message: format!("{}", error),
            })),
            Err(error) => Err(Error::TomlDeError(error)),
        }
    }

    // If no file is found, returns default config instead of error
    pub fn load(path: &Path) -> Result<Config, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(error) => return Err(Error::IOError(error)),
        };
        let config = Config::parse(&path.display().to_string(), &contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/xfade/xfade.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config = Config::parse(
            "test.toml",
            r#"
variant = "basic"

[controls]
position = -0.5
"#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Basic);
        assert_eq!(config.controls.position, -0.5);
        assert_eq!(config.controls.shape, 1.0);
        assert_eq!(config.client, Client::default());
    }

    #[test]
    fn full_file() {
        let config = Config::parse(
            "test.toml",
            r#"
variant = "extended"

[client]
name = "deck"
in_a = ["a_l", "a_r"]
in_b = ["b_l", "b_r"]
out = ["l", "r"]
connect = [["system:capture_1", "deck:a_l"], ["deck:l", "system:playback_1"]]

[controls]
position = 0.25
shape = 0.0
mode = 1.0
"#,
        )
        .unwrap();
        assert_eq!(config.client.name, "deck");
        assert_eq!(config.client.out, [String::from("l"), String::from("r")]);
        assert_eq!(
            config.client.connect[1],
            (String::from("deck:l"), String::from("system:playback_1"))
        );
        assert_eq!(config.controls.mode, 1.0);
    }

    #[test]
    fn bad_file_names_the_file() {
        match Config::parse("broken.toml", "[controls\nposition = 1.0\n") {
            Err(Error::ParseError(error)) => {
                assert_eq!(error.filename, "broken.toml");
                assert!(error.to_string().starts_with("Failed to parse broken.toml"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
