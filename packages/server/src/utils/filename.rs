/// Derive the lowercase extension from a client-supplied filename.
///
/// Returns `None` when there is no usable extension (no dot, empty stem, or
/// empty extension). The rest of the client filename is never used anywhere.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.trim();
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
