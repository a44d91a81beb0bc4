mod cli;
mod crawler;
mod extractors;
mod file_handler;
mod filter;
mod retriever;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::entry().await
}
