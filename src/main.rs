#[tokio::main]
async fn main() -> anyhow::Result<()> {
    casa_suggest::run(std::env::args().skip(1).collect()).await
}
