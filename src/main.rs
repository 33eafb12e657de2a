fn main() {
    penney_cli::cli::run();
}
