fn main() {
    if let Err(err) = storymap_board::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
