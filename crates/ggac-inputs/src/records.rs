//! Typed records for the three parameter files.
//!
//! The simulation parses these files positionally, so field order, the fixed
//! constants and the daughter-nucleus `Z + 1` in the file names must not
//! change. Energies are in keV.

use std::fmt;

/// Scalar description of one two-gamma cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cascade {
  /// Element (atomic) number of the parent.
  pub z: u32,
  /// Isotope (mass) number.
  pub a: u32,
  /// First gamma energy in the cascade.
  pub gamma_1: f64,
  /// Second gamma energy in the cascade.
  pub gamma_2: f64,
}

impl Cascade {
  /// Excitation of the upper level, fed by the beta decay.
  pub fn top_level(&self) -> f64 {
    self.gamma_1 + self.gamma_2
  }

  pub fn multipole(&self) -> Multipole {
    Multipole {
      daughter_z: self.z + 1,
      a: self.a,
      levels: self.levels(),
    }
  }

  pub fn decay(&self) -> Decay {
    Decay {
      parent_z: self.z,
      a: self.a,
      fed_level: self.top_level(),
    }
  }

  pub fn evaporation(&self) -> Evaporation {
    Evaporation {
      daughter_z: self.z + 1,
      a: self.a,
      levels: self.levels(),
    }
  }

  /// Lower level first: it decays by gamma 2, the upper one by gamma 1.
  fn levels(&self) -> [Level; 2] {
    [
      Level {
        energy: self.gamma_2,
        gamma: self.gamma_2,
      },
      Level {
        energy: self.top_level(),
        gamma: self.gamma_1,
      },
    ]
  }
}

/// An excited level and the gamma it emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
  pub energy: f64,
  pub gamma: f64,
}

/// A file the simulation reads from its input directory.
pub trait ParameterFile: fmt::Display {
  fn file_name(&self) -> String;
}

/// Gamma multipolarities of the daughter levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Multipole {
  pub daughter_z: u32,
  pub a: u32,
  pub levels: [Level; 2],
}

impl ParameterFile for Multipole {
  fn file_name(&self) -> String {
    format!("Multipole_z{}.a{}", self.daughter_z, self.a)
  }
}

impl fmt::Display for Multipole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for level in &self.levels {
      writeln!(f, "{} {} 2 0 0", float(level.energy), float(level.gamma))?;
    }
    Ok(())
  }
}

/// Beta decay of the parent into the upper cascade level.
#[derive(Debug, Clone, PartialEq)]
pub struct Decay {
  pub parent_z: u32,
  pub a: u32,
  pub fed_level: f64,
}

impl ParameterFile for Decay {
  fn file_name(&self) -> String {
    format!("z{}.a{}", self.parent_z, self.a)
  }
}

impl fmt::Display for Decay {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "#  Excitation  Halflife    Mode    Daughter    Ex  Intensity   Q"
    )?;
    writeln!(f, "P  0.000000    1.0000e+02")?;
    writeln!(f, "   BetaMinus   0.0000  1.0000e+00")?;
    writeln!(
      f,
      "   BetaMinus   {}    1.0000e+00  10.0",
      float(self.fed_level)
    )
  }
}

/// Photon evaporation levels of the daughter.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaporation {
  pub daughter_z: u32,
  pub a: u32,
  pub levels: [Level; 2],
}

/// Intensity, spin-parity, lifetime, multipolarity, then eleven conversion
/// coefficients.
const EVAPORATION_TAIL: &str = "100.0 2+ 1.0e-12 2.00 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0";

impl ParameterFile for Evaporation {
  fn file_name(&self) -> String {
    format!("z{}.a{}", self.daughter_z, self.a)
  }
}

impl fmt::Display for Evaporation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for level in &self.levels {
      writeln!(
        f,
        "{} {} {EVAPORATION_TAIL}",
        float(level.energy),
        float(level.gamma)
      )?;
    }
    Ok(())
  }
}

/// Shortest round-trip rendering that always keeps a fractional part,
/// e.g. `200.0`, `0.30000000000000004`.
///
/// Scientific notation kicks in below `1e-4` and from `1e16` up. The exponent
/// carries a sign and at least two digits (`1e+16`, `1.5e-07`), which is what
/// the simulation's parameter readers were written against.
fn float(value: f64) -> String {
  if value.is_nan() {
    return "nan".to_string();
  }

  let text = format!("{value:?}");
  let Some((mantissa, exponent)) = text.split_once('e') else {
    return text;
  };

  let (sign, digits) = match exponent.strip_prefix('-') {
    Some(digits) => ('-', digits),
    None => ('+', exponent),
  };
  format!("{mantissa}e{sign}{digits:0>2}")
}
