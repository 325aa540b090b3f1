fn main() -> anyhow::Result<()> {
    cprnav::cli::run_cli()
}
