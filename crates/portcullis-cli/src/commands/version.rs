//! Version command.

/// Prints the version string.
pub fn run() {
    println!("portcullis {}", env!("CARGO_PKG_VERSION"));
}
