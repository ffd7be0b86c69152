//! Reading instance data and module definitions from disk or stdin.
//!
//! Data files may be gzip-compressed: a `.gz` suffix on a path, or the gzip
//! magic bytes on stdin, switch on decompression.

use crate::document::DataFormat;
use crate::schema::{ModuleDef, SchemaContext, SchemaDef};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Reads an instance data file, decompressing it when the name ends in `.gz`.
///
/// # Examples
///
/// ```no_run
/// use yangtree::file::loader::read_data_file;
///
/// let xml = read_data_file("running.xml.gz").unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid gzip (for
/// `.gz` files) or is not valid UTF-8.
pub fn read_data_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_gzipped {
        read_gzipped_file(path_ref)
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))
    }
}

/// Reads instance data from standard input until EOF.
///
/// Input starting with the gzip magic bytes (0x1f 0x8b) is decompressed.
pub fn read_data_from_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    decode_bytes(buffer)
}

/// Turns raw input bytes into text, gunzipping them first if they carry
/// the gzip magic bytes.
pub fn decode_bytes(buffer: Vec<u8>) -> Result<String> {
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")
    }
}

/// Deduces the data format from a file name, ignoring a `.gz` suffix.
///
/// - `running.xml` → `Xml`
/// - `state.json.gz` → `Json`
/// - `data.txt` → `None`
pub fn format_from_path<P: AsRef<Path>>(path: P) -> Option<DataFormat> {
    let path_str = path.as_ref().to_string_lossy().to_lowercase();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

    if base.ends_with(".xml") {
        Some(DataFormat::Xml)
    } else if base.ends_with(".json") {
        Some(DataFormat::Json)
    } else {
        None
    }
}

/// Loads module definition files and compiles them into one context.
///
/// Each file is a YAML document with a `modules` list; the lists are merged
/// in argument order, so a module defined in two files is an error.
pub fn load_schema_files<P: AsRef<Path>>(paths: &[P]) -> Result<SchemaContext> {
    let mut modules: Vec<ModuleDef> = Vec::new();

    for path in paths {
        let path_ref = path.as_ref();
        let content = read_data_file(path_ref)?;
        let def: SchemaDef = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid module definitions in {}", path_ref.display()))?;
        modules.extend(def.modules);
    }

    SchemaContext::new(modules).context("Failed to compile module definitions")
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
