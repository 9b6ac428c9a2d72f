use std::ffi::OsStr;
use std::path::Path;

/// Content types registered on top of the `mime_guess` table. Entries here
/// win over the platform defaults for the same extension; browsers refuse
/// to instantiate wasm or parse module scripts served with a generic type,
/// and glTF assets have no entry in most platform tables at all.
const ASSET_TYPES: &[(&str, &str)] = &[
    ("glb", "model/gltf-binary"),
    ("gltf", "model/gltf+json"),
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("json", "application/json"),
    ("wasm", "application/wasm"),
];

/// Resolve the `Content-Type` for a file path. Extension matching is
/// case-insensitive; unknown extensions fall back to `mime_guess` and
/// finally to `application/octet-stream`.
pub fn content_type(path: &Path) -> String {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        let ext = ext.to_ascii_lowercase();
        if let Some((_, ty)) = ASSET_TYPES.iter().find(|(e, _)| *e == ext) {
            return (*ty).to_string();
        }
    }
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
