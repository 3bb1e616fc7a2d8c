use std::path::Path;

/// File name safe version of a tag string.
pub fn sanitize_file_name(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Relative path of an exported sheet, `images/007-name.png`.
pub fn sheet_file_name(index: usize, name: &str) -> String {
    let name = sanitize_file_name(name.trim());
    let name = if name.is_empty() {
        "sheet"
    } else {
        name.as_str()
    };

    format!("images/{index:03}-{name}.png")
}

/// Relative path of an exported sprite, `sprites/012.png`.
pub fn sprite_file_name(index: usize) -> String {
    format!("sprites/{index:03}.png")
}

/// Display name of an input file, which is its stem.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string())
}

#[macro_export]
macro_rules! err {
    ($e: ident) => {{
        use eyre::eyre;

        Err(eyre!($e))
    }};

    ($format_string: literal) => {{
        use eyre::eyre;

        Err(eyre!($format_string))
    }};

    ($($arg:tt)*) => {{
        use eyre::eyre;

        Err(eyre!($($arg)*))
    }};
}
