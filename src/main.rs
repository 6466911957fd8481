fn main() -> anyhow::Result<()> {
    vitrine::start()
}
