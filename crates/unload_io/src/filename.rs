use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 60;
const FALLBACK_STEM: &str = "unload";

/// Deterministic, Windows-safe base name for a manifest's report:
/// `{sanitized_stem}--{short_hash(codes)}`.
///
/// The hash covers the manifest's primary codes in order, so exporting the
/// same manifest again replaces the previous report instead of piling up.
pub fn report_basename<'a, I>(stem: &str, codes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    format!("{}--{}", sanitize_stem(stem), short_hash(codes))
}

fn sanitize_stem(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        let mapped = if is_forbidden(c) || c.is_whitespace() { '_' } else { c };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let mut stem: String = out
        .trim_matches(&['_', '.'][..])
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash<'a, I>(codes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    for code in codes {
        hasher.update(code.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
