mod cubemap;
mod mrt;
mod triangle;

use std::fmt;

use anyhow::{bail, Result};

use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Sample {
    Triangle,
    Cubemap,
    Mrt,
}

impl Sample {
    const ALL: [Sample; 3] = [Sample::Triangle, Sample::Cubemap, Sample::Mrt];

    fn name(self) -> &'static str {
        match self {
            Sample::Triangle => "triangle",
            Sample::Cubemap => "cubemap",
            Sample::Mrt => "mrt",
        }
    }

    /// No argument selects `mrt`.
    fn from_arg(arg: Option<&str>) -> Result<Self> {
        let Some(arg) = arg else {
            return Ok(Sample::Mrt);
        };
        match Self::ALL.into_iter().find(|s| s.name() == arg) {
            Some(sample) => Ok(sample),
            None => {
                let valid: Vec<&str> = Self::ALL.iter().map(|s| s.name()).collect();
                bail!("unknown sample '{arg}'; expected one of: {}", valid.join(", "))
            }
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let sample = Sample::from_arg(std::env::args().nth(1).as_deref())?;
    log::info!("running sample: {sample}");

    let config = RuntimeConfig {
        title: format!("tessera: {sample}"),
        ..RuntimeConfig::default()
    };

    match sample {
        Sample::Triangle => Runtime::run(config, GpuInit::default(), triangle::TriangleApp::default()),
        Sample::Cubemap => Runtime::run(config, GpuInit::default(), cubemap::CubemapApp::default()),
        // The composite copies unorm texels; a linear surface keeps them byte-exact.
        Sample::Mrt => Runtime::run(config, GpuInit::linear(), mrt::MrtApp::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mrt() {
        assert_eq!(Sample::from_arg(None).unwrap(), Sample::Mrt);
    }

    #[test]
    fn parses_every_name() {
        for s in Sample::ALL {
            assert_eq!(Sample::from_arg(Some(s.name())).unwrap(), s);
        }
    }

    #[test]
    fn unknown_name_lists_valid_ones() {
        let err = Sample::from_arg(Some("shadow")).unwrap_err().to_string();
        assert!(err.contains("shadow"));
        assert!(err.contains("triangle, cubemap, mrt"));
    }
}
