fn main() {
    strsum::cli::run();
}
