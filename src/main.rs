mod app;
mod config;
mod credentials;
mod logging;
mod output;
mod pipeline;
mod prompt;
mod transcription;

#[tokio::main]
async fn main() {
    let code = match app::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };
    std::process::exit(code);
}
