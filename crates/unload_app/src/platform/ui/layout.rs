use std::path::Path;

use crate::platform::input::COMMAND_PREFIX;

/// Lines printed once at start-up.
pub fn banner(output_dir: &Path, replay: Option<&Path>) -> Vec<String> {
    let mut lines = vec![
        format!("unload {}", env!("CARGO_PKG_VERSION")),
        format!("Reports go to {}", output_dir.display()),
    ];
    match replay {
        Some(path) => lines.push(format!("Replaying scans from {}", path.display())),
        None => lines.push(format!(
            "Scan barcodes, or type {COMMAND_PREFIX}help for commands."
        )),
    }
    lines
}

pub fn help_lines() -> Vec<String> {
    [
        ("load <file>", "load a manifest CSV (replaces the current session)"),
        ("export", "write the completion report"),
        ("status", "show every manifest line"),
        ("pause", "stop accepting scans"),
        ("resume", "accept scans again"),
        ("help", "show this list"),
        ("quit", "leave"),
    ]
    .iter()
    .map(|(command, about)| format!("  {COMMAND_PREFIX}{command:<12} {about}"))
    .collect()
}
