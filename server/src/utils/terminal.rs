//! Terminal output helpers

/// Render a URL in cyan, wrapped in an OSC 8 hyperlink when stdout supports it
pub fn terminal_link(url: &str) -> String {
    let colored = format!("\x1b[36m{}\x1b[0m", url);
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, colored)
    } else {
        colored
    }
}
