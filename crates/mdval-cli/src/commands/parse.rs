use crate::cli::ParseArgs;
use crate::display::tables;
use crate::error::{CliError, Result};
use mdvalidate::core::energy::breakdown::EnergyBreakdown;
use mdvalidate::core::energy::canonical::{Engine, canonicalize};
use mdvalidate::core::io::{mdout::MdoutFile, traits::EnergyFile, xvg::XvgFile};
use std::io;
use std::path::Path;
use tracing::{debug, info};

fn infer_engine(path: &Path) -> Engine {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xvg") => Engine::Gromacs,
        _ => Engine::Amber,
    }
}

fn read_raw(path: &Path, engine: Engine) -> Result<EnergyBreakdown> {
    let parsed = match engine {
        Engine::Gromacs => XvgFile::read_from_path(path).map_err(anyhow::Error::from),
        Engine::Amber => MdoutFile::read_from_path(path).map_err(anyhow::Error::from),
    };
    parsed.map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })
}

pub fn run(args: ParseArgs) -> Result<()> {
    let engine = args.engine.unwrap_or_else(|| infer_engine(&args.file));
    info!("Parsing {:?} as {} output", args.file, engine);

    let raw = read_raw(&args.file, engine)?;
    debug!("Read {} raw term(s)", raw.len());

    let (title, breakdown) = if args.raw {
        (format!("{} raw terms", engine), raw)
    } else {
        (format!("{} canonical terms", engine), canonicalize(&raw, engine))
    };
    tables::print_breakdown(&mut io::stdout().lock(), &title, &breakdown)?;
    Ok(())
}
