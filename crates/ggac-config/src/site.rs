use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  #[default]
  X86_64,
  Aarch64,
  Ppc64le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsType {
  Linux,
  Macosx,
}

/// Role of a storage directory on a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectoryKind {
  SharedScratch,
  SharedStorage,
  LocalScratch,
  LocalStorage,
}

/// Operations a file server accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  #[default]
  All,
  Get,
  Put,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileServerDef {
  /// Server URL, e.g. "scp://cronos.mines.edu/data_fast/cnatzke"
  pub url: String,
  #[serde(default)]
  pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDef {
  #[serde(rename = "type")]
  pub kind: DirectoryKind,
  pub path: PathBuf,
  #[serde(default)]
  pub file_servers: Vec<FileServerDef>,
}

/// A site definition before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDef {
  pub name: String,
  #[serde(default)]
  pub arch: Arch,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub os_type: Option<OsType>,
  #[serde(default)]
  pub directories: Vec<DirectoryDef>,
  #[serde(default)]
  pub profiles: Vec<Profile>,
}

impl SiteDef {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      arch: Arch::default(),
      os_type: None,
      directories: Vec::new(),
      profiles: Vec::new(),
    }
  }

  pub fn with_os(mut self, os_type: OsType) -> Self {
    self.os_type = Some(os_type);
    self
  }

  pub fn with_directory(mut self, directory: DirectoryDef) -> Self {
    self.directories.push(directory);
    self
  }

  pub fn with_profile(mut self, profile: Profile) -> Self {
    self.profiles.push(profile);
    self
  }
}

impl DirectoryDef {
  pub fn new(kind: DirectoryKind, path: impl Into<PathBuf>) -> Self {
    Self {
      kind,
      path: path.into(),
      file_servers: Vec::new(),
    }
  }

  pub fn with_file_server(mut self, url: impl Into<String>) -> Self {
    self.file_servers.push(FileServerDef {
      url: url.into(),
      operation: Operation::All,
    });
    self
  }
}
