use colored::Colorize;
use similar::TextDiff;
use std::path::Path;

/// Unified diff of a file before and after the rename, three lines of context
pub fn unified_diff(file_path: &Path, old_content: &str, new_content: &str) -> String {
    let name = file_path.display().to_string();
    TextDiff::from_lines(old_content, new_content)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}

/// Prints [`unified_diff`] with colored hunks
pub fn print_unified_diff(file_path: &Path, old_content: &str, new_content: &str) {
    for line in unified_diff(file_path, old_content, new_content).lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
