use indicatif::ProgressStyle;

/// Spinner style used while resolving remote metadata.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.yellow} {wide_msg}")
        .unwrap()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Style used when a phase finishes successfully.
/// - Green check mark followed by the final message.
pub fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").unwrap()
}

/// Byte-denominated bar for the jar download; the total length is the size
/// declared by the remote probe.
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.yellow} {wide_msg} [{bar:24}] {bytes}/{total_bytes} ({bytes_per_sec})",
    )
    .unwrap()
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
