//! Scans a directory of packs and prints every discovered type.
//!
//! Usage: `cargo run --example discover -- <path> [supertype]`

use typack_core::PackLoader;
use typack_core::ScanError;

fn main() -> Result<(), ScanError> {
    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "plugins".to_string());
    let supertype = args.next();

    let mut loader = PackLoader::new();
    loader.include(&root);
    println!("located {} pack(s) under {root}", loader.located_archives().len());

    loader.build();
    let registry = loader.registry()?;
    let report = loader.report()?;
    println!(
        "loaded {} type(s) from {} pack(s), {} dropped",
        report.types_loaded,
        report.archives_scanned,
        report.names_dropped()
    );

    let mut query = registry.query();
    if let Some(supertype) = supertype {
        query = query.that_extend_or_implement([supertype]);
    }

    for handle in query.iter() {
        println!(
            "  {:<40} [{:?}] from {}",
            handle.qualified_name(),
            handle.kind(),
            handle.origin()
        );
    }

    Ok(())
}
