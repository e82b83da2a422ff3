use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    plugseek::app::startup::startup().await
}
