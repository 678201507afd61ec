//! Slug derivation from post titles.

/// Turns a title into a URL-friendly slug.
///
/// Lowercases, maps runs of non-alphanumeric characters to single
/// hyphens, and trims leading/trailing hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_titles() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust: 2026 Edition!"), "rust-2026-edition");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn collapses_symbol_runs() {
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn non_ascii_becomes_separator() {
        assert_eq!(slugify("café au lait"), "caf-au-lait");
    }
}
