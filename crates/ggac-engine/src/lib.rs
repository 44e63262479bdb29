//! GGAC Engine
//!
//! Adapter between the assembled workflow and the external planner.
//!
//! # Architecture
//!
//! ```text
//! Workflow + SiteCatalog + TransformationCatalog + ReplicaCatalog
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    WorkflowEngine::plan                     │
//! │  - writes sites/transformations/replicas/workflow documents │
//! │  - writes pegasus.properties                                │
//! │  - runs pegasus-plan (PegasusPlanner) or stops (DryRun)     │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                 PlanResult / EngineError, unchanged
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ggac_engine::{PegasusPlanner, PlanOptions, PlanRequest, WorkflowEngine};
//!
//! let engine = PegasusPlanner::new("pegasus-plan", &work_dir);
//! let result = engine
//!   .plan(PlanRequest {
//!     workflow: &workflow,
//!     sites: &sites,
//!     transformations: &transformations,
//!     replicas: &replicas,
//!     execution_sites: &execution_sites,
//!     output_site: "remote",
//!     options: &options,
//!   })
//!   .await?;
//! ```

mod documents;
mod engine;
mod error;
mod properties;
mod request;

pub use documents::{
  PROPERTIES_FILE, PlanDocuments, REPLICAS_FILE, SITES_FILE, TRANSFORMATIONS_FILE, WORKFLOW_FILE,
  write_documents,
};
pub use engine::{DryRunEngine, PegasusPlanner, WorkflowEngine, planner_args};
pub use error::EngineError;
pub use properties::render_properties;
pub use request::{PlanOptions, PlanRequest, PlanResult};
