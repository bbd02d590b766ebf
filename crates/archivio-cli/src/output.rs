//! Console output helpers for CLI commands.

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print a failure message.
pub fn print_failure(msg: &str) {
    println!("✗ {}", msg);
}
