fn main() {
    if let Err(err) = tabtype::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
