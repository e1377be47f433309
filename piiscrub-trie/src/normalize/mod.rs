// piiscrub-trie/src/normalize/mod.rs

/// Case-folds a name for insertion or lookup.
///
/// Surrounding whitespace is ignored and every character is mapped through
/// `char::to_lowercase`, which may expand a single character into several.
pub fn fold(name: &str) -> impl Iterator<Item = char> + '_ {
    name.trim().chars().flat_map(char::to_lowercase)
}
