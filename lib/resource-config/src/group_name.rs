//! Random resource group names.

use rand::Rng;

/// Length of the random suffix appended to generated group names.
pub const SUFFIX_LEN: usize = 5;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Builds `base-` plus each non-empty affix followed by `-`, then a random
/// lowercase alphanumeric suffix of [`SUFFIX_LEN`] characters.
///
/// ```
/// use entra_samples_resource_config::generate_group_name;
///
/// let name = generate_group_name("samples", &["web", "east"]);
/// assert!(name.starts_with("samples-web-east-"));
/// assert_eq!(name.len(), "samples-web-east-".len() + 5);
/// ```
#[must_use]
pub fn generate_group_name(base: &str, affixes: &[&str]) -> String {
    let mut name = format!("{base}-");
    for affix in affixes.iter().filter(|a| !a.is_empty()) {
        name.push_str(affix);
        name.push('-');
    }

    let mut rng = rand::rng();
    let suffix = (0..SUFFIX_LEN).map(|_| {
        let idx = rng.random_range(0..SUFFIX_CHARSET.len());
        char::from(SUFFIX_CHARSET[idx])
    });
    name.extend(suffix);
    name
}
