//! Connectivity check: send one prompt through the configured OpenRouter
//! model and print the reply. Verifies the API key and the model name
//! without touching the chat session or the sheet.
//!
//! Usage: cargo run --bin health_check -- --prompt "Reply with the word ok"

use anyhow::Result;
use clap::Parser;

use openrouter_client::{ChatRequest, Message, OpenRouterClient};

const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

#[derive(Parser)]
struct Args {
    /// Prompt to send through the model.
    #[arg(long, default_value = "Reply with the single word: ok")]
    prompt: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let api_key = std::env::var("OPENROUTER_API_KEY").expect("OPENROUTER_API_KEY required");
    let model =
        std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    println!("Model: {model}");
    println!("Prompt: {}", args.prompt);

    let client = OpenRouterClient::new(&api_key);
    let request = ChatRequest::new(&model, vec![Message::user(&args.prompt)]);
    let reply = client.chat_text(&request).await?;

    println!("Reply: {reply}");
    Ok(())
}
