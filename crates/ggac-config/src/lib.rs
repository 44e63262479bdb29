//! GGAC Config
//!
//! This crate contains the serializable run configuration for a GGAC surface
//! campaign. These types describe the campaign before it is turned into
//! catalogs and a workflow graph.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `--config=campaign.json`)
//! - The built-in defaults for the surface campaign
//!
//! Site directory paths and file-server URLs may contain the `${WORK_DIR}`
//! placeholder, which is expanded by [`RunConfig::resolved_sites`].

mod profile;
mod run;
mod site;
mod stage;

pub use profile::{Namespace, Profile};
pub use run::{GroupDef, PlannerProperties, RunConfig, WORK_DIR_PLACEHOLDER};
pub use site::{Arch, DirectoryDef, DirectoryKind, FileServerDef, Operation, OsType, SiteDef};
pub use stage::{StageDef, StagesDef};
