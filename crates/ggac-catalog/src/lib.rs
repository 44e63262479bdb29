//! GGAC Catalog
//!
//! The three flat catalogs handed to the planner alongside the workflow:
//!
//! - [`SiteCatalog`] - where jobs run and where files are stored
//! - [`TransformationCatalog`] - one executable per pipeline stage
//! - [`ReplicaCatalog`] - the pre-existing input files
//!
//! Catalogs are immutable once built. Building them is the last point at which
//! configuration errors are reported; nothing here is retried.

mod error;
mod replica;
mod site;
mod transformation;

pub use error::CatalogError;
pub use replica::{LOCAL_SITE, Replica, ReplicaCatalog, build_replica_catalog};
pub use site::{Directory, FileServer, Site, SiteCatalog, SiteRole, build_site_catalog};
pub use transformation::{Transformation, TransformationCatalog, build_transformation_catalog};
