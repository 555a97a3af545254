use super::ExportedModel;
use crate::core::Result;
use crate::io;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Serialize the export to pretty JSON, to a file or stdout
pub fn output_json(export: &ExportedModel, output_file: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(export)?;
    if let Some(path) = output_file {
        if let Some(parent) = path.parent() {
            io::ensure_dir(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
    } else {
        println!("{json}");
    }
    Ok(())
}
