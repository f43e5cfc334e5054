#[tokio::main]
async fn main() -> std::io::Result<()> {
    poll_tester::start_server().await
}
