fn main() {
    if let Err(e) = deployscope_cli::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
