//! GGAC Inputs
//!
//! Writes the physics-parameter files the simulation reads for a two-gamma
//! cascade `(Z, A, g1, g2)`:
//!
//! - `Multipole_z{Z+1}.a{A}` - level multipolarities
//! - `z{Z}.a{A}` - beta decay of the parent
//! - `z{Z+1}.a{A}` - photon evaporation levels of the daughter

mod error;
mod records;
mod writer;

pub use error::InputFileError;
pub use records::{Cascade, Decay, Evaporation, Level, Multipole, ParameterFile};
pub use writer::{WriteReport, write_input_files};
