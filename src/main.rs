fn main() -> anyhow::Result<()> {
    category_notes::cli::run()
}
