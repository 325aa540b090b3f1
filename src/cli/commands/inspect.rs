//! Inspect command
//!
//! Prints header fields and the block table of a container without
//! decoding it.

use std::path::Path;

use crate::cpr::inspect_container;

pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let info = inspect_container(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Inspecting container: {}", path.display());
    println!();
    println!("Container Information");
    println!("=====================");
    println!("Signature:          {}", info.signature);
    println!("Version:            {}", info.version);
    println!("Flag:               {}", info.flag);
    println!("Compression mode:   {}", info.compression_mode);
    println!("File size:          {} bytes", info.file_size);
    println!("Uncompressed size:  {} bytes", info.total_uncompressed_size);
    println!("Blocks:             {}", info.num_blocks);

    if !info.blocks.is_empty() {
        println!();
        println!("Blocks:");
        println!("-------");
        for block in &info.blocks {
            println!(
                "  [{:2}] {:#08x} .. {:#08x} ({} bytes)",
                block.index, block.start, block.end, block.compressed_size
            );
        }
    }

    Ok(())
}
