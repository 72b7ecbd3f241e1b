fn main() {
    if let Err(e) = pkgrestore_cli::run_cli() {
        pkgrestore_logger::error(&e.to_string());
        std::process::exit(1);
    }
}
