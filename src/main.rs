fn main() {
    if let Err(e) = spin_cubes::app::run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
