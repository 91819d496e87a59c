use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use tcsave_core::{Circuit, CircuitError, SaveCodec};

/// File holding a schematic's circuit inside its directory.
pub const CIRCUIT_FILE: &str = "circuit.data";
/// Subdirectory of the save root holding per-level schematics.
pub const SCHEMATICS_DIR: &str = "schematics";

const APP_DIR: &str = "Turing Complete";

#[derive(Error, Debug)]
pub enum SaveIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error("No save directory found (searched {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing: unsupported platform".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Root of a game save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDirectory {
    root: PathBuf,
}

impl SaveDirectory {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform-specific places the save directory usually lives, most likely first.
    pub fn candidates() -> Vec<PathBuf> {
        let var = |name: &str| std::env::var_os(name).map(PathBuf::from);
        match std::env::consts::OS {
            "windows" => var("APPDATA")
                .map(|appdata| appdata.join("Godot").join("app_userdata").join(APP_DIR))
                .into_iter()
                .collect(),
            "macos" => var("HOME")
                .map(|home| {
                    home.join("Library")
                        .join("Application Support")
                        .join("Godot")
                        .join("app_userdata")
                        .join(APP_DIR)
                })
                .into_iter()
                .collect(),
            "linux" => {
                let mut paths = Vec::new();
                if let Some(home) = var("HOME") {
                    paths.push(
                        home.join(".local")
                            .join("share")
                            .join("godot")
                            .join("app_userdata")
                            .join(APP_DIR),
                    );
                }
                // Windows install seen from WSL
                if let Some(user) = std::env::var_os("USER") {
                    paths.push(
                        PathBuf::from("/mnt/c/Users")
                            .join(user)
                            .join("AppData")
                            .join("Roaming")
                            .join("godot")
                            .join("app_userdata")
                            .join(APP_DIR),
                    );
                }
                paths
            }
            _ => Vec::new(),
        }
    }

    /// First existing directory among [`SaveDirectory::candidates`].
    pub fn discover() -> Result<Self, SaveIoError> {
        Self::discover_in(&Self::candidates())
    }

    pub fn discover_in(candidates: &[PathBuf]) -> Result<Self, SaveIoError> {
        match candidates.iter().find(|p| p.is_dir()) {
            Some(root) => {
                log::info!("Using save directory: {}", root.display());
                Ok(Self::at(root.clone()))
            }
            None => {
                log::warn!("No save directory found among {} candidates", candidates.len());
                Err(SaveIoError::NotFound {
                    searched: candidates.to_vec(),
                })
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn schematics(&self) -> PathBuf {
        self.root.join(SCHEMATICS_DIR)
    }

    pub fn level_dir(&self, level: &str) -> PathBuf {
        self.schematics().join(level)
    }

    pub fn circuit_path(&self, level: &str, schematic: &str) -> PathBuf {
        self.level_dir(level).join(schematic).join(CIRCUIT_FILE)
    }

    /// Names of the schematics saved for `level`, sorted. A missing level yields none.
    pub fn list_schematics(&self, level: &str) -> Result<Vec<String>, SaveIoError> {
        let dir = self.level_dir(level);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.path().join(CIRCUIT_FILE).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load<C: SaveCodec>(
        &self,
        level: &str,
        schematic: &str,
        codec: &C,
    ) -> Result<Circuit, SaveIoError> {
        read_circuit(self.circuit_path(level, schematic), codec)
    }

    pub fn store<C: SaveCodec>(
        &self,
        level: &str,
        schematic: &str,
        circuit: &Circuit,
        codec: &C,
    ) -> Result<PathBuf, SaveIoError> {
        let path = self.circuit_path(level, schematic);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_circuit(&path, circuit, codec)?;
        Ok(path)
    }
}

/// Read and decode a circuit file.
pub fn read_circuit<C: SaveCodec>(path: impl AsRef<Path>, codec: &C) -> Result<Circuit, SaveIoError> {
    let path = path.as_ref();
    log::info!("Reading circuit: {}", path.display());
    let bytes = fs::read(path)?;
    Ok(Circuit::parse(&bytes, codec)?)
}

/// Encode a circuit and write it to `path`.
pub fn write_circuit<C: SaveCodec>(
    path: impl AsRef<Path>,
    circuit: &Circuit,
    codec: &C,
) -> Result<(), SaveIoError> {
    let path = path.as_ref();
    let bytes = circuit.serialize(codec)?;
    fs::write(path, &bytes)?;
    log::info!("Wrote circuit: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
