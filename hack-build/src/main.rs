//! hack-build - combined VM-to-Hack driver
//!
//! Chains the VM translator and the assembler in one process: translate a
//! `.vm` file or directory to Hack assembly, then assemble that assembly to
//! binary, writing both the intermediate `.asm` and the final `.hack`.
//!
//! # Usage
//!
//! ```bash
//! hack-build SimpleAdd.vm
//! hack-build FibonacciElement/
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use hack_assembler::assemble;
use vm_translator::{VMError, output_path, translate_directory, translate_file};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "hack-build v{} - VM translation + assembly in one pass",
            env!("CARGO_PKG_VERSION")
        );
        eprintln!();
        eprintln!("Usage: hack-build <file.vm | directory> [-v]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -v, --verbose    Show detailed output");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  hack-build SimpleAdd.vm          # Single file -> SimpleAdd.hack");
        eprintln!("  hack-build FibonacciElement/     # Directory with bootstrap");
        process::exit(1);
    }

    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let input_path = Path::new(&args[1]);

    if !input_path.exists() {
        eprintln!("Error: Path not found: {}", input_path.display());
        process::exit(1);
    }

    let start = Instant::now();

    match build(input_path, verbose) {
        Ok(hack_path) => {
            let elapsed = start.elapsed();
            log::info!("built {} in {:.2}ms", hack_path.display(), elapsed.as_secs_f64() * 1000.0);
            if verbose {
                println!(
                    "Built -> {} ({:.2}ms)",
                    hack_path.display(),
                    elapsed.as_secs_f64() * 1000.0
                );
            } else {
                println!("{}", hack_path.display());
            }
        }
        Err(e) => {
            log::error!("build failed for {}: {}", input_path.display(), e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[derive(Debug)]
enum BuildError {
    Translate(VMError),
    Assemble(hack_assembler::error::AsmError),
    Io(String, std::io::Error),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Translate(e) => write!(f, "translation failed: {}", e),
            BuildError::Assemble(e) => write!(f, "assembly failed: {}", e),
            BuildError::Io(path, e) => write!(f, "I/O error on {}: {}", path, e),
        }
    }
}

fn build(input: &Path, verbose: bool) -> Result<std::path::PathBuf, BuildError> {
    if verbose {
        eprintln!("Translating: {}", input.display());
    }

    let asm = if input.is_dir() {
        translate_directory(input)
    } else {
        translate_file(input)
    }
    .map_err(BuildError::Translate)?;

    let asm_path = output_path(input);
    fs::write(&asm_path, &asm).map_err(|e| BuildError::Io(asm_path.display().to_string(), e))?;
    log::info!("wrote {}", asm_path.display());

    if verbose {
        eprintln!("Assembling: {}", asm_path.display());
    }

    let hack = assemble(&asm).map_err(BuildError::Assemble)?;
    let hack_path = asm_path.with_extension("hack");
    fs::write(&hack_path, &hack).map_err(|e| BuildError::Io(hack_path.display().to_string(), e))?;
    log::info!("wrote {}", hack_path.display());

    Ok(hack_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let vm_path = dir.path().join("Add.vm");
        fs::write(&vm_path, "push constant 7\npush constant 8\nadd").unwrap();

        let hack_path = build(&vm_path, false).unwrap();
        assert_eq!(hack_path, dir.path().join("Add.hack"));

        let contents = fs::read_to_string(&hack_path).unwrap();
        assert_eq!(contents.lines().count(), 19);
        assert!(contents.lines().all(|l| l.len() == 16));
    }

    #[test]
    fn test_build_directory_with_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Sys.vm"),
            "function Sys.init 0\ncall Sys.init 0\nreturn",
        )
        .unwrap();

        let hack_path = build(dir.path(), false).unwrap();
        let contents = fs::read_to_string(&hack_path).unwrap();
        assert!(contents.lines().all(|l| l.len() == 16));
    }
}
