use colored::Colorize;

/// Print a success message in green.
pub fn success(message: &str) {
    println!("{}", message.green());
}

/// Print an error message with a red `Error:` prefix to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}
