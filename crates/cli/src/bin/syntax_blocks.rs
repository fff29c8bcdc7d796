use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    syntax_blocks_cli::main_entry().await
}
