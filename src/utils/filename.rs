use crate::utils::constants::OUTPUT_EXTENSION;
use std::path::Path;

/// Derive the name the conversion service stores its result under:
/// same base name, `.out` extension (e.g. `latlons.in` -> `latlons.out`)
pub fn derive_output_filename(input_filename: &str) -> String {
    Path::new(input_filename)
        .with_extension(OUTPUT_EXTENSION)
        .to_string_lossy()
        .into_owned()
}
