fn main() {
    era::app::cli::run();
}
