use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use ggac_config::{Arch, DirectoryDef, DirectoryKind, Operation, OsType, Profile, SiteDef};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::CatalogError;

/// Why a site is referenced by the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteRole {
  Execution,
  Output,
}

impl fmt::Display for SiteRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SiteRole::Execution => f.write_str("execution"),
      SiteRole::Output => f.write_str("output"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileServer {
  pub url: String,
  pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
  #[serde(rename = "type")]
  pub kind: DirectoryKind,
  pub path: PathBuf,
  pub file_servers: Vec<FileServer>,
}

/// A validated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
  pub name: String,
  pub arch: Arch,
  #[serde(rename = "os.type", skip_serializing_if = "Option::is_none")]
  pub os_type: Option<OsType>,
  pub directories: Vec<Directory>,
  pub profiles: Vec<Profile>,
}

/// Sites the planner may stage to and run on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteCatalog {
  sites: Vec<Site>,
}

impl SiteCatalog {
  pub fn sites(&self) -> &[Site] {
    &self.sites
  }

  pub fn get(&self, name: &str) -> Option<&Site> {
    self.sites.iter().find(|s| s.name == name)
  }

  /// Look up a site the submission depends on.
  pub fn require(&self, name: &str, role: SiteRole) -> Result<&Site, CatalogError> {
    self.get(name).ok_or_else(|| CatalogError::UnknownSite {
      role,
      name: name.to_string(),
    })
  }
}

/// Build the site catalog from configuration.
///
/// Every file server must serve the path of the directory it belongs to, and
/// shared scratch must be reachable through at least one file server.
pub fn build_site_catalog(defs: &[SiteDef]) -> Result<SiteCatalog, CatalogError> {
  let mut names = HashSet::new();
  let mut sites = Vec::with_capacity(defs.len());

  for def in defs {
    if !names.insert(def.name.as_str()) {
      return Err(CatalogError::DuplicateSite(def.name.clone()));
    }

    let directories = def
      .directories
      .iter()
      .map(|d| build_directory(&def.name, d))
      .collect::<Result<Vec<_>, _>>()?;

    debug!(site = %def.name, directories = directories.len(), "registered site");

    sites.push(Site {
      name: def.name.clone(),
      arch: def.arch,
      os_type: def.os_type,
      directories,
      profiles: def.profiles.clone(),
    });
  }

  Ok(SiteCatalog { sites })
}

fn build_directory(site: &str, def: &DirectoryDef) -> Result<Directory, CatalogError> {
  if def.kind == DirectoryKind::SharedScratch && def.file_servers.is_empty() {
    return Err(CatalogError::MissingFileServer {
      site: site.to_string(),
      path: def.path.clone(),
    });
  }

  for server in &def.file_servers {
    let url = parse_server_url(&server.url).ok_or_else(|| CatalogError::MalformedFileServerUrl {
      site: site.to_string(),
      url: server.url.clone(),
    })?;

    if !serves_path(&url, &def.path) {
      return Err(CatalogError::FileServerPathMismatch {
        site: site.to_string(),
        url: server.url.clone(),
        path: def.path.clone(),
      });
    }
  }

  Ok(Directory {
    kind: def.kind,
    path: def.path.clone(),
    file_servers: def
      .file_servers
      .iter()
      .map(|s| FileServer {
        url: s.url.clone(),
        operation: s.operation,
      })
      .collect(),
  })
}

/// Parse a file-server URL. The URL must carry an absolute path.
/// Example: "scp://host/data" and "file:///tmp/x" parse, "scp://host" does not.
fn parse_server_url(url: &str) -> Option<Url> {
  Url::parse(url).ok().filter(|u| u.path().starts_with('/'))
}

/// Whether `url` serves the directory at `path`, ignoring trailing slashes.
///
/// `file` URLs are decoded back into a filesystem path. For remote schemes the
/// directory path is encoded the way the URL encodes its own path, so spaces
/// and non-ASCII characters compare equal on both sides.
fn serves_path(url: &Url, path: &Path) -> bool {
  if !path.is_absolute() {
    return false;
  }

  if url.scheme() == "file" {
    return url.to_file_path().is_ok_and(|served| served == path);
  }

  let mut expected = url.clone();
  expected.set_path(&path.to_string_lossy());
  expected.path().trim_end_matches('/') == url.path().trim_end_matches('/')
}
